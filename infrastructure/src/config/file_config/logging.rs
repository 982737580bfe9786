//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of every deliberation event
    pub conversation_log: Option<String>,
    /// Directory for the daily rolling diagnostic log
    pub log_dir: Option<String>,
}
