//! Binary inspector port.
//!
//! This port abstracts reading the machine architecture out of a binary's
//! header, allowing different implementations (the ELF reader in
//! `preflight-elf`, mocks for testing).
//!
//! Implementations must read the header only. Loading, mapping for execution
//! or running the binary is not allowed.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::Machine;

/// Why a binary could not be inspected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OpenErrorKind {
    /// The file does not exist.
    #[error("file not found")]
    NotFound,

    /// The file exists but cannot be read by this process.
    #[error("permission denied")]
    PermissionDenied,

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// The file is not a binary we can parse.
    #[error("invalid binary format: {0}")]
    InvalidFormat(String),
}

/// A binary file could not be opened or its header could not be read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot open {}: {kind}", path.display())]
pub struct OpenError {
    /// Path that was being inspected.
    pub path: PathBuf,
    /// Failure reason.
    pub kind: OpenErrorKind,
}

impl OpenError {
    /// Create a new open error for `path`.
    pub fn new(path: impl Into<PathBuf>, kind: OpenErrorKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Port for reading the architecture identifier of a binary.
///
/// # Port Signature Rules
///
/// - Only `preflight-core` types appear in signatures
/// - Implementations release the file handle before returning, on every path
pub trait BinaryInspector: Send + Sync {
    /// Read the machine architecture recorded in the header of `path`.
    fn machine(&self, path: &Path) -> Result<Machine, OpenError>;
}
