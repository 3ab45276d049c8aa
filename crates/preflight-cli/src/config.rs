//! Effective settings: defaults, then the JSON file, then flags/env.

use std::fs;
use std::path::Path;

use preflight_core::{PreflightSettings, validate_settings};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Resolve and validate the settings for this invocation.
pub fn load_settings(cli: &Cli) -> Result<PreflightSettings, CliError> {
    let mut settings = match cli.config {
        Some(ref path) => read_config_file(path)?,
        None => PreflightSettings::default(),
    };
    settings.merge(&cli.settings_update());
    validate_settings(&settings)?;
    debug!(?settings, "Effective settings");
    Ok(settings)
}

/// Read a settings file. Fields missing from the file keep their defaults.
pub fn read_config_file(path: &Path) -> Result<PreflightSettings, CliError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| CliError::Config(format!("invalid settings in {}: {e}", path.display())))
}
