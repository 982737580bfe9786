//! Trigger state ports
//!
//! Persistence for the two pieces of state the confirmation trigger relies
//! on: the pending question per user, and the execution record per inbound
//! message.

use async_trait::async_trait;
use council_domain::{ActionExecutionRecord, MessageId, PendingQuestion, UserId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Last question asked per user.
///
/// The conversational agent writes with [`put`](Self::put); the trigger
/// reads and clears.
#[async_trait]
pub trait PendingQuestionStore: Send + Sync {
    async fn current(&self, user_id: &UserId) -> Result<Option<PendingQuestion>, StoreError>;

    /// Replace the user's pending question
    async fn put(&self, question: PendingQuestion) -> Result<(), StoreError>;

    /// Remove the user's pending question only if it is still `question`.
    ///
    /// Returns false when a newer question has replaced it in the meantime.
    async fn clear_if(&self, question: &PendingQuestion) -> Result<bool, StoreError>;
}

/// Idempotency records keyed by inbound message id
#[async_trait]
pub trait ExecutionRecordStore: Send + Sync {
    async fn get(&self, message_id: &MessageId)
    -> Result<Option<ActionExecutionRecord>, StoreError>;

    /// Atomically create an executed record for `message_id`.
    ///
    /// Returns true for exactly one caller per message id; every later (or
    /// concurrent) caller gets false.
    async fn claim(&self, message_id: &MessageId) -> Result<bool, StoreError>;

    /// Attach the result reference to a claimed record
    async fn record_result(&self, message_id: &MessageId, result_ref: &str)
    -> Result<(), StoreError>;
}
