//! Notification configuration from TOML (`[notifications]` section)

use super::{ConfigIssue, ConfigValidationError, Severity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNotificationsConfig {
    /// Webhook receiving `{user_id, title, body}` as JSON.
    /// Without one, notifications only go to the log.
    pub webhook_url: Option<String>,
}

impl FileNotificationsConfig {
    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        match &self.webhook_url {
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                vec![ConfigIssue::new(
                    Severity::Error,
                    ConfigValidationError::InvalidUrl {
                        field: "notifications.webhook_url".to_string(),
                        value: url.clone(),
                    },
                )]
            }
            _ => Vec::new(),
        }
    }
}
