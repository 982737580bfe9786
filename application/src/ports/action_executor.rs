//! Action executor port
//!
//! Runs the deferred action a user just confirmed (lead search, report
//! delivery, ...). Adapters live in the infrastructure layer.

use async_trait::async_trait;
use council_domain::{ActionRef, ActionResult, MessageId, UserId};
use thiserror::Error;

/// Errors from executing a confirmed action
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Action failed: {0}")]
    Failed(String),

    #[error("Action timed out")]
    Timeout,
}

/// Everything an action gets to know about its confirmation
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub action_ref: ActionRef,
    pub user_id: UserId,
    pub message_id: MessageId,
    /// The question the user said yes to
    pub question_text: String,
    /// Recent successful knowledge from the memory bank, if any
    pub memory_context: Option<String>,
}

#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, request: &ActionRequest) -> Result<ActionResult, ActionError>;
}
