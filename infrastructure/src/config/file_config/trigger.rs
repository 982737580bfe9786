//! Confirmation trigger configuration from TOML (`[trigger]` section)
//!
//! ```toml
//! [trigger]
//! affirmations = ["yes", "do it", "kör", "stemmer"]
//! notify_on_failure = true
//! ```

use super::{ConfigIssue, ConfigValidationError, Severity};
use council_application::TriggerParams;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTriggerConfig {
    /// Whole-message tokens that confirm a pending question
    pub affirmations: Vec<String>,
    /// Push a notification when the confirmed action fails
    pub notify_on_failure: bool,
}

impl Default for FileTriggerConfig {
    fn default() -> Self {
        let params = TriggerParams::default();
        Self {
            affirmations: params.affirmations,
            notify_on_failure: params.notify_on_failure,
        }
    }
}

impl FileTriggerConfig {
    pub fn to_params(&self, memory_context_limit: usize) -> TriggerParams {
        TriggerParams::default()
            .with_affirmations(self.affirmations.iter().cloned())
            .with_notify_on_failure(self.notify_on_failure)
            .with_memory_context_limit(memory_context_limit)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        if self.affirmations.iter().all(|a| a.trim().is_empty()) {
            return vec![ConfigIssue::new(
                Severity::Warning,
                ConfigValidationError::EmptyAffirmations,
            )];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_affirmations() {
        let toml_str = r#"
[trigger]
affirmations = ["Go ahead", "kör"]
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let matcher = config.trigger.to_params(5).matcher();
        assert!(matcher.is_affirmative("go ahead!"));
        assert!(!matcher.is_affirmative("yes"));
        assert!(config.trigger.notify_on_failure);
    }

    #[test]
    fn test_empty_affirmations_warn() {
        let config = FileTriggerConfig {
            affirmations: vec!["  ".into()],
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }
}
