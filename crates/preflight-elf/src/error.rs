//! Internal error types for ELF header reading.
//!
//! More detailed than `OpenErrorKind`; converted at the port boundary.

use std::io;

use preflight_core::OpenErrorKind;
use thiserror::Error;

/// Internal errors that can occur while reading an ELF header.
#[derive(Debug, Error)]
pub(crate) enum ElfInternalError {
    #[error("file not found")]
    FileNotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    #[error("file is too short for an ELF header ({0} bytes)")]
    Truncated(usize),

    #[error("not an ELF file")]
    NotElf,

    #[error("malformed ELF header: {0}")]
    Malformed(String),
}

impl ElfInternalError {
    /// Classify an error from `File::open` or `read`.
    pub(crate) fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err),
        }
    }
}

/// Convert internal errors to the domain-facing port error kind.
impl From<ElfInternalError> for OpenErrorKind {
    fn from(err: ElfInternalError) -> Self {
        match err {
            ElfInternalError::FileNotFound => Self::NotFound,
            ElfInternalError::PermissionDenied => Self::PermissionDenied,
            ElfInternalError::Io(e) => Self::Io(e.to_string()),
            other @ (ElfInternalError::Truncated(_)
            | ElfInternalError::NotElf
            | ElfInternalError::Malformed(_)) => Self::InvalidFormat(other.to_string()),
        }
    }
}

/// Result type for internal ELF operations.
pub(crate) type ElfResult<T> = Result<T, ElfInternalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_classified() {
        let err = ElfInternalError::from_io(io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(OpenErrorKind::from(err), OpenErrorKind::NotFound);

        let err = ElfInternalError::from_io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(OpenErrorKind::from(err), OpenErrorKind::PermissionDenied);

        let err = ElfInternalError::from_io(io::Error::other("disk on fire"));
        assert_eq!(
            OpenErrorKind::from(err),
            OpenErrorKind::Io("disk on fire".to_string())
        );
    }

    #[test]
    fn test_format_errors_map_to_invalid_format() {
        assert_eq!(
            OpenErrorKind::from(ElfInternalError::Truncated(3)),
            OpenErrorKind::InvalidFormat("file is too short for an ELF header (3 bytes)".to_string())
        );
        assert!(matches!(
            OpenErrorKind::from(ElfInternalError::NotElf),
            OpenErrorKind::InvalidFormat(_)
        ));
    }
}
