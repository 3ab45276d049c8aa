//! Core domain for dcgm-preflight.
//!
//! This crate holds everything needed to decide whether a host satisfies the
//! runtime prerequisites of the GPU telemetry agent, without touching the
//! process table or the filesystem directly:
//!
//! - [`ports`]: the two seams to the outside world (`ProcessRunner`, `BinaryInspector`)
//! - [`linker_cache`]: parsing of the dynamic linker cache listing
//! - [`rules`]: the `PrerequisiteRule` trait and the concrete `LibraryExistsRule`
//! - [`runner`]: ordered, fail-fast execution of a rule set
//! - [`settings`]: configuration types and validation
//!
//! Adapters live in `preflight-elf` (ELF header inspection) and
//! `preflight-runtime` (process execution, default rule set).

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod linker_cache;
pub mod ports;
pub mod rules;
pub mod runner;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{LibraryRecord, Machine};
pub use error::{FailureKind, PrerequisiteError};
pub use linker_cache::{LinkerCache, LinkerCacheParseError};
pub use ports::{BinaryInspector, ExecutionError, OpenError, OpenErrorKind, ProcessRunner};
pub use rules::{LibraryExistsRule, PrerequisiteRule};
pub use runner::RuleRunner;
pub use settings::{
    DCGM_INSTALL_HINT, DCGM_LIBRARY, DEFAULT_LDCONFIG_PATH, LDCONFIG_LIST_ARG,
    LDCONFIG_REAL_PATH, PreflightSettings, RequiredLibrary, SELF_IMAGE_PATH, SettingsError,
    SettingsUpdate, validate_settings,
};
