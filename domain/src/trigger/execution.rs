//! Action execution records and outcomes

use super::message::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload produced by a successful action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// One-line human summary, used for the notification body
    pub summary: String,
    /// Knowledge items worth remembering; each becomes a memory fragment
    pub items: Vec<String>,
}

impl ActionResult {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Memory contents for this result: the items, or the summary when there are none
    pub fn memory_contents(&self) -> Vec<String> {
        let contents: Vec<String> = self
            .items
            .iter()
            .filter(|i| !i.trim().is_empty())
            .cloned()
            .collect();
        if contents.is_empty() && !self.summary.trim().is_empty() {
            vec![self.summary.clone()]
        } else {
            contents
        }
    }
}

/// Terminal outcome of an attempted action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ActionOutcome {
    Succeeded { result: ActionResult },
    Failed { error: String },
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded { .. })
    }

    /// Short reference stored on the execution record
    pub fn result_ref(&self) -> String {
        match self {
            ActionOutcome::Succeeded { result } => format!("succeeded: {}", result.summary),
            ActionOutcome::Failed { error } => format!("failed: {}", error),
        }
    }
}

/// Idempotency guard for one inbound message.
///
/// `executed` flips to true when the message claims its action, before the
/// action runs. A claimed message is never executed again, even if the
/// process dies before `result_ref` is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionExecutionRecord {
    pub message_id: MessageId,
    pub executed: bool,
    pub result_ref: Option<String>,
    pub claimed_at: DateTime<Utc>,
}

impl ActionExecutionRecord {
    /// A freshly claimed record (executed, no result yet)
    pub fn claimed(message_id: MessageId) -> Self {
        Self {
            message_id,
            executed: true,
            result_ref: None,
            claimed_at: Utc::now(),
        }
    }
}
