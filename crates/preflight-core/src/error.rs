//! Prerequisite failure taxonomy.
//!
//! Every variant is fatal to startup. Messages are written for the operator
//! and name the missing or mismatched entity explicitly.

use std::fmt;

use thiserror::Error;

use crate::domain::Machine;
use crate::linker_cache::LinkerCacheParseError;
use crate::ports::{ExecutionError, OpenError};

/// A prerequisite rule failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrerequisiteError {
    /// The linker cache listing command could not be run.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// The linker cache listing had no usable entries.
    #[error(transparent)]
    Parse(#[from] LinkerCacheParseError),

    /// The library is not in the linker cache.
    #[error("the {library} library was not found. {install_hint}")]
    NotFound {
        library: String,
        install_hint: String,
    },

    /// The running process's own image could not be inspected.
    #[error("unable to determine the architecture of the running process: {0}")]
    ProcessImage(#[source] OpenError),

    /// The resolved library file could not be inspected.
    #[error("unable to determine the architecture of the {library} library: {source}")]
    LibraryImage {
        library: String,
        #[source]
        source: OpenError,
    },

    /// The library was built for a different architecture than this process.
    #[error(
        "the {library} library architecture mismatch with the system; wanted: {wanted}, received: {received}"
    )]
    ArchitectureMismatch {
        library: String,
        wanted: Machine,
        received: Machine,
    },
}

/// Coarse failure category, used for exit codes and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Execution,
    Parse,
    NotFound,
    Open,
    ArchitectureMismatch,
}

impl PrerequisiteError {
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Execution(_) => FailureKind::Execution,
            Self::Parse(_) => FailureKind::Parse,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::ProcessImage(_) | Self::LibraryImage { .. } => FailureKind::Open,
            Self::ArchitectureMismatch { .. } => FailureKind::ArchitectureMismatch,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Execution => "execution",
            Self::Parse => "parse",
            Self::NotFound => "not_found",
            Self::Open => "open",
            Self::ArchitectureMismatch => "architecture_mismatch",
        })
    }
}
