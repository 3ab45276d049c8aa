//! CLI-specific error types and mappings.
//!
//! Maps prerequisite failures and configuration problems to exit codes.
//! Invalid arguments never reach this type: clap reports them and exits 2.

use preflight_core::{FailureKind, PrerequisiteError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A prerequisite rule failed.
    #[error(transparent)]
    Prerequisite(#[from] PrerequisiteError),

    /// Settings could not be loaded or are invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Codes follow sysexits.h where one fits:
    /// - 1: Library built for another architecture
    /// - 65: Linker cache listing unusable (EX_DATAERR)
    /// - 69: Library not installed (EX_UNAVAILABLE)
    /// - 71: ldconfig could not be run (EX_OSERR)
    /// - 74: Binary could not be opened or read (EX_IOERR)
    /// - 78: Bad configuration (EX_CONFIG)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Prerequisite(err) => match err.kind() {
                FailureKind::ArchitectureMismatch => 1,
                FailureKind::Parse => 65,
                FailureKind::NotFound => 69,
                FailureKind::Execution => 71,
                FailureKind::Open => 74,
            },
            Self::Config(_) => 78,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}
