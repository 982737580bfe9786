//! Memory bank configuration from TOML (`[memory]` section)

use super::{ConfigIssue, ConfigValidationError, Severity};
use council_domain::memory::DEFAULT_MEMORY_CAPACITY;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMemoryConfig {
    /// Maximum fragments kept; the oldest is evicted beyond this
    pub capacity: usize,
}

impl Default for FileMemoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_MEMORY_CAPACITY,
        }
    }
}

impl FileMemoryConfig {
    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        if self.capacity == 0 {
            return vec![ConfigIssue::new(
                Severity::Error,
                ConfigValidationError::ZeroCapacity,
            )];
        }
        Vec::new()
    }
}
