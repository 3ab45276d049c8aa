//! Ordered, fail-fast execution of prerequisite rules.

use tracing::{debug, info, warn};

use crate::error::PrerequisiteError;
use crate::rules::PrerequisiteRule;

/// Runs a sequence of rules in insertion order.
///
/// The first failure stops the run: checks after an unmet prerequisite are
/// not trustworthy, and the operator should see the earliest cause.
#[derive(Default)]
pub struct RuleRunner {
    rules: Vec<Box<dyn PrerequisiteRule>>,
}

impl RuleRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule (builder style).
    #[must_use]
    pub fn with_rule(mut self, rule: impl PrerequisiteRule + 'static) -> Self {
        self.push(Box::new(rule));
        self
    }

    /// Append an already boxed rule.
    pub fn push(&mut self, rule: Box<dyn PrerequisiteRule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of the registered rules, in run order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Validate every rule, stopping at the first failure.
    pub fn run(&self) -> Result<(), PrerequisiteError> {
        for rule in &self.rules {
            debug!(rule = rule.name(), "Validating prerequisite");
            if let Err(err) = rule.validate() {
                warn!(rule = rule.name(), kind = %err.kind(), "Prerequisite not met: {err}");
                return Err(err);
            }
        }
        info!(rules = self.rules.len(), "All prerequisites met");
        Ok(())
    }
}
