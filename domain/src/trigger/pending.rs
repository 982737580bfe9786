//! Pending questions awaiting a yes/no reply

use super::message::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a deferred action (e.g. `send_report`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionRef(String);

impl ActionRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for ActionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The last question an agent asked a user, with the action a "yes" unlocks.
///
/// Written by the conversational agent; the trigger engine only reads and
/// clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub user_id: UserId,
    pub question_text: String,
    pub action_ref: ActionRef,
    pub created_at: DateTime<Utc>,
}

impl PendingQuestion {
    pub fn new(
        user_id: impl Into<UserId>,
        question_text: impl Into<String>,
        action_ref: impl Into<ActionRef>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            question_text: question_text.into(),
            action_ref: action_ref.into(),
            created_at: Utc::now(),
        }
    }
}
