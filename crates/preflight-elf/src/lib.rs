//! ELF header inspection.
//!
//! Implements [`preflight_core::BinaryInspector`] by reading only the first
//! bytes of a file (identification plus file header) and returning its
//! `e_machine` value. Nothing is mapped or executed.

#![deny(unused_crate_dependencies)]

mod error;
mod header;
mod inspector;

/// The ELF inspector implementation.
pub use inspector::ElfInspector;

pub use header::{ElfClass, ElfHeader, read_header};

// Re-export the port and domain types for convenience
pub use preflight_core::{BinaryInspector, Machine, OpenError, OpenErrorKind};
