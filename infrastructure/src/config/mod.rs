//! Configuration file loading for hive-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `COUNCIL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. Global: `$XDG_CONFIG_HOME/hive-council/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigValidationError, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL,
    FileConfig, FileDeliberationConfig, FileLoggingConfig, FileMemoryConfig,
    FileNotificationsConfig, FileOutputConfig, FileOutputFormat, FileReasoningConfig,
    FileTriggerConfig, Severity,
};
pub use loader::ConfigLoader;
