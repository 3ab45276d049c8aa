//! Prerequisite rules.
//!
//! A rule is a single self-contained startup check with a pass/fail outcome.
//! Rules hold only injected ports and immutable configuration, so a rule can
//! be validated any number of times without side effects on shared state.

mod library_exists;

pub use library_exists::LibraryExistsRule;

use crate::error::PrerequisiteError;

/// A single prerequisite check.
pub trait PrerequisiteRule: Send + Sync {
    /// Short identifier used in logs (e.g. `library-exists:libdcgm.so.4`).
    fn name(&self) -> &str;

    /// Run the check against the current state of the host.
    fn validate(&self) -> Result<(), PrerequisiteError>;
}
