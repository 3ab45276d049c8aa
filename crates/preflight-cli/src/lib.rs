//! dcgm-preflight command-line front end.
//!
//! The binary is the composition root: it resolves settings, builds the
//! default rule set with the host adapters and maps failures to exit codes.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only
use dotenvy as _;

pub mod config;
pub mod error;
pub mod logging;
pub mod parser;

use tracing::info;

pub use config::{load_settings, read_config_file};
pub use error::CliError;
pub use logging::init_logging;
pub use parser::Cli;

/// Run one invocation.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = load_settings(cli)?;

    if cli.print_config {
        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| CliError::Config(format!("cannot serialise settings: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let runner = preflight_runtime::default_runner(&settings)?;
    info!(rules = ?runner.rule_names(), "Checking prerequisites");
    runner.run()?;
    Ok(())
}
