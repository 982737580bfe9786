//! ExecutionRecordStore in-memory implementation.

use async_trait::async_trait;
use council_application::ports::trigger_state::{ExecutionRecordStore, StoreError};
use council_domain::{ActionExecutionRecord, MessageId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

/// Execution records keyed by message id.
///
/// `claim` checks and inserts under one write lock, which makes it the
/// atomic idempotency guard the trigger relies on.
#[derive(Default)]
pub struct InMemoryExecutionRecords {
    records: RwLock<HashMap<MessageId, ActionExecutionRecord>>,
}

impl InMemoryExecutionRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ExecutionRecordStore for InMemoryExecutionRecords {
    async fn get(
        &self,
        message_id: &MessageId,
    ) -> Result<Option<ActionExecutionRecord>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(records.get(message_id).cloned())
    }

    async fn claim(&self, message_id: &MessageId) -> Result<bool, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        match records.entry(message_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(ActionExecutionRecord::claimed(message_id.clone()));
                Ok(true)
            }
        }
    }

    async fn record_result(
        &self,
        message_id: &MessageId,
        result_ref: &str,
    ) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let record = records
            .get_mut(message_id)
            .ok_or_else(|| StoreError::NotFound(message_id.to_string()))?;
        record.result_ref = Some(result_ref.to_string());
        Ok(())
    }
}
