//! Runtime adapters for dcgm-preflight.
//!
//! - [`SystemProcessRunner`]: `ProcessRunner` backed by `std::process::Command`
//! - [`ldconfig`]: locating the linker cache tool on the host
//! - [`default_runner`]: the rule set built from `PreflightSettings`

#![deny(unsafe_code)]

pub mod ldconfig;
mod process;
mod rules;

// Re-export the main ProcessRunner implementation
pub use process::SystemProcessRunner;

// Re-export rule wiring
pub use rules::{default_runner, default_runner_with};

// Re-export the inspector so the composition root needs only this crate
pub use preflight_elf::ElfInspector;
