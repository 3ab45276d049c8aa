//! Process runner port.
//!
//! Abstracts running an external command and capturing its standard output.
//! The runtime implementation lives in `preflight-runtime`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running an external command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// The program does not exist.
    #[error("failed to run {}: command not found", program.display())]
    NotFound { program: PathBuf },

    /// The program could not be spawned or its output could not be collected.
    #[error("failed to run {}: {reason}", program.display())]
    Io { program: PathBuf, reason: String },

    /// The program ran but exited unsuccessfully.
    #[error("{} failed with {status}: {stderr}", program.display())]
    ExitStatus {
        program: PathBuf,
        status: String,
        stderr: String,
    },

    /// The program did not finish within the configured deadline.
    #[error("{} did not finish within {timeout:?}", program.display())]
    TimedOut { program: PathBuf, timeout: Duration },
}

impl ExecutionError {
    /// The program this error refers to.
    pub fn program(&self) -> &Path {
        match self {
            Self::NotFound { program }
            | Self::Io { program, .. }
            | Self::ExitStatus { program, .. }
            | Self::TimedOut { program, .. } => program,
        }
    }
}

/// Port for running external commands.
///
/// # Example
///
/// ```ignore
/// use preflight_core::ports::ProcessRunner;
///
/// fn list_cache(runner: &dyn ProcessRunner) -> Vec<u8> {
///     runner
///         .output(Path::new("/sbin/ldconfig"), &["-p".to_string()])
///         .unwrap_or_default()
/// }
/// ```
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` to completion and return its stdout.
    ///
    /// Blocks the calling thread. A non-zero exit status is an error.
    fn output(&self, program: &Path, args: &[String]) -> Result<Vec<u8>, ExecutionError>;
}
