//! Deliberation configuration from TOML (`[deliberation]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [deliberation]
//! max_stage_retries = 2
//! stage_timeout_secs = 30
//! retry_backoff_ms = 500
//! memory_context_limit = 5
//! ```

use super::{ConfigIssue, ConfigValidationError, Severity};
use council_application::DeliberationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    /// Retries after a failed stage attempt
    pub max_stage_retries: usize,
    /// Timeout for one reasoning call
    pub stage_timeout_secs: u64,
    /// First retry delay; doubles on each further retry
    pub retry_backoff_ms: u64,
    /// Memory fragments offered to each stage as insight context
    pub memory_context_limit: usize,
}

impl Default for FileDeliberationConfig {
    fn default() -> Self {
        let params = DeliberationParams::default();
        Self {
            max_stage_retries: params.max_stage_retries,
            stage_timeout_secs: params.stage_timeout.as_secs(),
            retry_backoff_ms: params.retry_backoff.as_millis() as u64,
            memory_context_limit: params.memory_context_limit,
        }
    }
}

impl FileDeliberationConfig {
    pub fn to_params(&self) -> DeliberationParams {
        DeliberationParams::default()
            .with_max_stage_retries(self.max_stage_retries)
            .with_stage_timeout(Duration::from_secs(self.stage_timeout_secs))
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
            .with_memory_context_limit(self.memory_context_limit)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.stage_timeout_secs == 0 {
            issues.push(ConfigIssue::new(
                Severity::Error,
                ConfigValidationError::ZeroTimeout,
            ));
        }
        if self.max_stage_retries > 10 {
            issues.push(ConfigIssue::new(
                Severity::Warning,
                ConfigValidationError::ExcessiveRetries(self.max_stage_retries),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let config = FileDeliberationConfig::default();
        assert_eq!(config.max_stage_retries, 2);
        assert_eq!(config.stage_timeout_secs, 30);
        assert_eq!(config.retry_backoff_ms, 500);
        assert_eq!(config.to_params(), DeliberationParams::default());
    }

    #[test]
    fn test_deserialize_section() {
        let toml_str = r#"
[deliberation]
max_stage_retries = 0
stage_timeout_secs = 90
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let params = config.deliberation.to_params();
        assert_eq!(params.max_attempts(), 1);
        assert_eq!(params.stage_timeout, Duration::from_secs(90));
        assert_eq!(params.retry_backoff, Duration::from_millis(500));
    }

    #[test]
    fn test_zero_timeout_is_an_error() {
        let config = FileDeliberationConfig {
            stage_timeout_secs: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }
}
