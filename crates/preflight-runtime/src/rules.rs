//! Default rule set wiring.

use std::sync::Arc;

use preflight_core::{
    BinaryInspector, LibraryExistsRule, PreflightSettings, ProcessRunner, RuleRunner,
    SettingsError, validate_settings,
};
use preflight_elf::ElfInspector;
use tracing::debug;

use crate::ldconfig::resolve_ldconfig;
use crate::process::SystemProcessRunner;

/// Build the rule runner for `settings` using the host adapters.
pub fn default_runner(settings: &PreflightSettings) -> Result<RuleRunner, SettingsError> {
    let processes = SystemProcessRunner::new().with_timeout(settings.command_timeout());
    default_runner_with(settings, Arc::new(processes), Arc::new(ElfInspector::new()))
}

/// Build the rule runner for `settings` with caller-supplied adapters.
///
/// One [`LibraryExistsRule`] is registered per configured library, in
/// configuration order. All rules share the same adapters.
pub fn default_runner_with(
    settings: &PreflightSettings,
    processes: Arc<dyn ProcessRunner>,
    inspector: Arc<dyn BinaryInspector>,
) -> Result<RuleRunner, SettingsError> {
    validate_settings(settings)?;

    let ldconfig = resolve_ldconfig(settings.ldconfig_path.as_deref());
    let mut runner = RuleRunner::new();
    for library in &settings.libraries {
        let rule = LibraryExistsRule::new(
            library.clone(),
            ldconfig.clone(),
            Arc::clone(&processes),
            Arc::clone(&inspector),
        )
        .with_self_image(settings.self_image_path.clone());
        runner.push(Box::new(rule));
    }

    debug!(
        ldconfig = %ldconfig.display(),
        rules = runner.len(),
        "Built prerequisite rules"
    );
    Ok(runner)
}
