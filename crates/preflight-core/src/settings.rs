//! Settings domain types and validation.
//!
//! These are pure configuration types with no infrastructure dependencies.
//! The CLI layers them: defaults, then an optional JSON file, then flags.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Library the DCGM exporter links against.
pub const DCGM_LIBRARY: &str = "libdcgm.so.4";

/// Operator instruction shown when [`DCGM_LIBRARY`] is missing.
pub const DCGM_INSTALL_HINT: &str = "Install Data Center GPU Manager (DCGM).";

/// The real ldconfig binary on Debian/Ubuntu, where `/sbin/ldconfig` is a wrapper script.
pub const LDCONFIG_REAL_PATH: &str = "/sbin/ldconfig.real";

/// Fallback ldconfig location.
pub const DEFAULT_LDCONFIG_PATH: &str = "/sbin/ldconfig";

/// Argument that makes ldconfig print the cache contents.
pub const LDCONFIG_LIST_ARG: &str = "-p";

/// The running process's own executable image.
pub const SELF_IMAGE_PATH: &str = "/proc/self/exe";

/// A shared library that must be present and architecture-compatible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequiredLibrary {
    /// Bare shared-object name as listed by the linker cache.
    pub name: String,
    /// What the operator should do when the library is missing.
    pub install_hint: String,
}

impl RequiredLibrary {
    /// Create a new required library.
    pub fn new(name: impl Into<String>, install_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            install_hint: install_hint.into(),
        }
    }

    /// Create a required library with a generic install hint.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        let install_hint = format!("Install the package that provides {name}.");
        Self { name, install_hint }
    }

    /// The DCGM library with the DCGM install instruction.
    pub fn dcgm() -> Self {
        Self::new(DCGM_LIBRARY, DCGM_INSTALL_HINT)
    }
}

/// Prerequisite validation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PreflightSettings {
    /// Explicit ldconfig binary. `None` means auto-detect.
    pub ldconfig_path: Option<PathBuf>,

    /// Image whose architecture the libraries must match.
    pub self_image_path: PathBuf,

    /// Libraries to check, in order.
    pub libraries: Vec<RequiredLibrary>,

    /// Upper bound on the ldconfig run, in seconds. `None` waits forever.
    pub command_timeout_secs: Option<u64>,
}

impl Default for PreflightSettings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl PreflightSettings {
    /// Settings that check for DCGM only, with no timeout.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            ldconfig_path: None,
            self_image_path: PathBuf::from(SELF_IMAGE_PATH),
            libraries: vec![RequiredLibrary::dcgm()],
            command_timeout_secs: None,
        }
    }

    /// The command timeout as a `Duration`.
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// Apply an update, only touching fields that are `Some`.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref path) = other.ldconfig_path {
            self.ldconfig_path = Some(path.clone());
        }
        if let Some(ref path) = other.self_image_path {
            self.self_image_path.clone_from(path);
        }
        if let Some(ref libraries) = other.libraries {
            self.libraries.clone_from(libraries);
        }
        if let Some(secs) = other.command_timeout_secs {
            self.command_timeout_secs = Some(secs);
        }
    }
}

/// Partial settings update (`None` = keep current value).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub ldconfig_path: Option<PathBuf>,
    pub self_image_path: Option<PathBuf>,
    pub libraries: Option<Vec<RequiredLibrary>>,
    pub command_timeout_secs: Option<u64>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("At least one required library must be configured")]
    NoLibraries,

    #[error("Invalid library name {0:?}: expected a bare shared-object file name")]
    InvalidLibraryName(String),

    #[error("ldconfig path must be absolute, got {}", .0.display())]
    RelativeLdconfigPath(PathBuf),

    #[error("Self image path must not be empty")]
    EmptySelfImagePath,

    #[error("Command timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Validate settings before building rules from them.
pub fn validate_settings(settings: &PreflightSettings) -> Result<(), SettingsError> {
    if settings.libraries.is_empty() {
        return Err(SettingsError::NoLibraries);
    }

    for library in &settings.libraries {
        let name = library.name.as_str();
        if name.is_empty() || name.contains('/') || name.contains(char::is_whitespace) {
            return Err(SettingsError::InvalidLibraryName(library.name.clone()));
        }
    }

    if let Some(ref path) = settings.ldconfig_path {
        if !path.is_absolute() {
            return Err(SettingsError::RelativeLdconfigPath(path.clone()));
        }
    }

    if settings.self_image_path.as_os_str().is_empty() {
        return Err(SettingsError::EmptySelfImagePath);
    }

    if settings.command_timeout_secs == Some(0) {
        return Err(SettingsError::ZeroTimeout);
    }

    Ok(())
}
