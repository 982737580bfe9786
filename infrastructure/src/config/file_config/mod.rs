//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the application's
//! typed parameters with [`FileConfig::to_council_config`].

mod deliberation;
mod logging;
mod memory;
mod notifications;
mod output;
mod reasoning;
mod trigger;

pub use deliberation::FileDeliberationConfig;
pub use logging::FileLoggingConfig;
pub use memory::FileMemoryConfig;
pub use notifications::FileNotificationsConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use reasoning::{DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL, FileReasoningConfig};
pub use trigger::FileTriggerConfig;

use council_application::CouncilConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// What is wrong with a configuration value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("deliberation.stage_timeout_secs cannot be 0")]
    ZeroTimeout,

    #[error("deliberation.max_stage_retries = {0} will make failing stages very slow")]
    ExcessiveRetries(usize),

    #[error("memory.capacity cannot be 0")]
    ZeroCapacity,

    #[error("trigger.affirmations is empty; no message will ever confirm an action")]
    EmptyAffirmations,

    #[error("reasoning.roles: unknown role '{0}'")]
    UnknownRole(String),

    #[error("{0}: model name cannot be empty")]
    EmptyModelName(String),

    #[error("{field}: '{value}' is not an http(s) URL")]
    InvalidUrl { field: String, value: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub error: ConfigValidationError,
    pub message: String,
}

impl ConfigIssue {
    pub fn new(severity: Severity, error: ConfigValidationError) -> Self {
        let message = error.to_string();
        Self {
            severity,
            error,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Stage pipeline control
    pub deliberation: FileDeliberationConfig,
    /// Memory bank sizing
    pub memory: FileMemoryConfig,
    /// Confirmation trigger settings, read by hosts that embed the trigger
    pub trigger: FileTriggerConfig,
    /// Reasoning backend and role routing
    pub reasoning: FileReasoningConfig,
    /// Push notification delivery for the confirmation trigger
    pub notifications: FileNotificationsConfig,
    /// Transcript and diagnostic log locations
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.validate_deliberation();
        issues.extend(self.trigger.validate());
        issues.extend(self.notifications.validate());
        issues
    }

    /// Validate only the sections a one-shot deliberation reads.
    ///
    /// `[trigger]` and `[notifications]` are skipped; they configure the
    /// confirmation trigger, which the CLI does not run.
    pub fn validate_deliberation(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.deliberation.validate());
        issues.extend(self.memory.validate());
        issues.extend(self.reasoning.validate());
        issues
    }

    /// Typed application parameters
    pub fn to_council_config(&self) -> CouncilConfig {
        let deliberation = self.deliberation.to_params();
        let trigger = self
            .trigger
            .to_params(deliberation.memory_context_limit);
        CouncilConfig::default()
            .with_deliberation(deliberation)
            .with_trigger(trigger)
            .with_memory_capacity(self.memory.capacity)
    }
}
