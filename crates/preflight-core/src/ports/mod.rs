//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the rules expect from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process or filesystem implementation details in any signature
//! - Implementations are injected through rule constructors, never through globals
//! - Both ports are synchronous: validation runs once, before anything concurrent starts

pub mod binary_inspector;
pub mod process_runner;

pub use binary_inspector::{BinaryInspector, OpenError, OpenErrorKind};
pub use process_runner::{ExecutionError, ProcessRunner};
