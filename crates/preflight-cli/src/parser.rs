//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use preflight_core::{RequiredLibrary, SettingsUpdate};

/// Verify that the shared libraries the DCGM exporter loads at runtime are
/// installed and built for this machine's architecture.
///
/// Prints nothing and exits 0 when every prerequisite holds. Otherwise prints
/// one line to stderr and exits non-zero.
#[derive(Debug, Parser)]
#[command(name = "dcgm-preflight")]
#[command(version)]
pub struct Cli {
    /// JSON settings file, applied on top of the defaults
    #[arg(long, env = "DCGM_PREFLIGHT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// ldconfig binary to list the linker cache with (auto-detected if unset)
    #[arg(long, env = "DCGM_PREFLIGHT_LDCONFIG", value_name = "PATH")]
    pub ldconfig: Option<PathBuf>,

    /// Binary whose architecture libraries must match
    #[arg(long = "self-image", env = "DCGM_PREFLIGHT_SELF_IMAGE", value_name = "PATH")]
    pub self_image: Option<PathBuf>,

    /// Required library as NAME or NAME=INSTALL_HINT; repeat to require several.
    /// Replaces the configured list.
    #[arg(long = "library", value_name = "NAME[=HINT]", value_parser = parse_library)]
    pub libraries: Vec<RequiredLibrary>,

    /// Kill ldconfig if it runs longer than this many seconds
    #[arg(
        long = "command-timeout",
        env = "DCGM_PREFLIGHT_COMMAND_TIMEOUT",
        value_name = "SECS"
    )]
    pub command_timeout: Option<u64>,

    /// Print the effective settings as JSON and exit without checking
    #[arg(long = "print-config")]
    pub print_config: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// The overrides carried by flags and environment variables.
    pub fn settings_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            ldconfig_path: self.ldconfig.clone(),
            self_image_path: self.self_image.clone(),
            libraries: (!self.libraries.is_empty()).then(|| self.libraries.clone()),
            command_timeout_secs: self.command_timeout,
        }
    }
}

fn parse_library(value: &str) -> Result<RequiredLibrary, String> {
    let (name, hint) = match value.split_once('=') {
        Some((name, hint)) => (name.trim(), Some(hint.trim())),
        None => (value.trim(), None),
    };
    if name.is_empty() {
        return Err("library name must not be empty".to_string());
    }
    Ok(match hint {
        Some(hint) if !hint.is_empty() => RequiredLibrary::new(name, hint),
        _ => RequiredLibrary::named(name),
    })
}
