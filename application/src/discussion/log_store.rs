//! DiscussionLogStore - append-only task logs with live fan-out.
//!
//! Every task gets one [`Discussion`] guarded by a mutex, plus a broadcast
//! channel. Appends and consensus changes publish their delta while still
//! holding the lock, so channel order always equals sequence order, and a
//! subscriber that snapshots and subscribes under the same lock sees every
//! change after its snapshot exactly once.

use super::subscription::DiscussionSubscription;
use council_domain::{
    Discussion, DiscussionSnapshot, DiscussionUpdate, EntryKind, LogEntry, Role, TaskId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Updates buffered per subscriber before it is considered lagging
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscussionError {
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    #[error("Discussion for task {0} is closed")]
    Sealed(TaskId),
}

struct LogState {
    discussion: Discussion,
    /// `None` once the task is terminal; dropping the sender ends subscriptions
    tx: Option<broadcast::Sender<DiscussionUpdate>>,
}

/// One task's log and its publisher
pub(crate) struct TaskLog {
    state: Mutex<LogState>,
}

impl TaskLog {
    fn new(task_id: TaskId, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            state: Mutex::new(LogState {
                discussion: Discussion::new(task_id),
                tx: Some(tx),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> DiscussionSnapshot {
        self.lock().discussion.snapshot()
    }

    /// Snapshot and receiver taken atomically with respect to appends
    pub(crate) fn snapshot_and_subscribe(
        &self,
    ) -> (DiscussionSnapshot, Option<broadcast::Receiver<DiscussionUpdate>>) {
        let state = self.lock();
        let rx = state.tx.as_ref().map(|tx| tx.subscribe());
        (state.discussion.snapshot(), rx)
    }
}

fn publish(state: &LogState, update: DiscussionUpdate) {
    // No receiver is fine: the log itself is the source of truth.
    if let Some(tx) = &state.tx {
        let _ = tx.send(update);
    }
}

/// Registry of all task discussions in this process
pub struct DiscussionLogStore {
    logs: RwLock<HashMap<TaskId, Arc<TaskLog>>>,
    channel_capacity: usize,
}

impl Default for DiscussionLogStore {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl DiscussionLogStore {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Create the (empty) log for a task. Returns false if it already exists.
    pub fn open(&self, task_id: &TaskId) -> bool {
        let mut logs = self.logs.write().unwrap_or_else(PoisonError::into_inner);
        if logs.contains_key(task_id) {
            return false;
        }
        logs.insert(
            task_id.clone(),
            Arc::new(TaskLog::new(task_id.clone(), self.channel_capacity)),
        );
        true
    }

    fn log(&self, task_id: &TaskId) -> Result<Arc<TaskLog>, DiscussionError> {
        self.logs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(task_id)
            .cloned()
            .ok_or_else(|| DiscussionError::UnknownTask(task_id.clone()))
    }

    /// Append an entry with the next sequence number and publish it.
    pub fn append(
        &self,
        task_id: &TaskId,
        role: Role,
        kind: EntryKind,
        message: impl Into<String>,
    ) -> Result<LogEntry, DiscussionError> {
        let log = self.log(task_id)?;
        let mut state = log.lock();
        if state.tx.is_none() {
            return Err(DiscussionError::Sealed(task_id.clone()));
        }
        let entry = state.discussion.append(role, kind, message);
        let consensus = state.discussion.consensus();
        debug!(task_id = %task_id, sequence = entry.sequence, role = %role, "Appended log entry");
        publish(
            &state,
            DiscussionUpdate::Delta {
                task_id: task_id.clone(),
                entry: Some(entry.clone()),
                consensus,
            },
        );
        Ok(entry)
    }

    /// Set the consensus marker. Returns false if it was already set.
    pub fn mark_consensus(&self, task_id: &TaskId) -> Result<bool, DiscussionError> {
        let log = self.log(task_id)?;
        let mut state = log.lock();
        if !state.discussion.mark_consensus() {
            return Ok(false);
        }
        let consensus = state.discussion.consensus();
        publish(
            &state,
            DiscussionUpdate::Delta {
                task_id: task_id.clone(),
                entry: None,
                consensus,
            },
        );
        Ok(true)
    }

    /// Current ordered view of a task's log, if the task is known
    pub fn snapshot(&self, task_id: &TaskId) -> Option<DiscussionSnapshot> {
        self.log(task_id).ok().map(|log| log.snapshot())
    }

    /// Observe a task: a full snapshot first, then every later change.
    pub fn subscribe(&self, task_id: &TaskId) -> Result<DiscussionSubscription, DiscussionError> {
        let log = self.log(task_id)?;
        Ok(DiscussionSubscription::open(log))
    }

    /// Close the log once its task is terminal.
    ///
    /// Live subscriptions drain what was already published and then end.
    pub fn seal(&self, task_id: &TaskId) -> Result<(), DiscussionError> {
        let log = self.log(task_id)?;
        log.lock().tx = None;
        Ok(())
    }

    pub fn is_sealed(&self, task_id: &TaskId) -> bool {
        self.log(task_id)
            .map(|log| log.lock().tx.is_none())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> TaskId {
        TaskId::new("task-1")
    }

    fn store_with_task() -> DiscussionLogStore {
        let store = DiscussionLogStore::default();
        assert!(store.open(&task()));
        store
    }

    #[test]
    fn test_open_is_idempotent() {
        let store = store_with_task();
        assert!(!store.open(&task()));
        assert_eq!(store.snapshot(&task()).unwrap().entries.len(), 0);
    }

    #[test]
    fn test_append_assigns_gap_free_sequences() {
        let store = store_with_task();
        for role in Role::PIPELINE {
            store
                .append(&task(), role, EntryKind::Contribution, role.as_str())
                .unwrap();
        }
        let snapshot = store.snapshot(&task()).unwrap();
        let sequences: Vec<u64> = snapshot.entries.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
        assert_eq!(snapshot.entries[2].role, Role::Critic);
    }

    #[test]
    fn test_unknown_task() {
        let store = DiscussionLogStore::default();
        let other = TaskId::new("nope");
        assert!(store.snapshot(&other).is_none());
        assert_eq!(
            store
                .append(&other, Role::Architect, EntryKind::Contribution, "x")
                .unwrap_err(),
            DiscussionError::UnknownTask(other.clone())
        );
        assert!(store.subscribe(&other).is_err());
    }

    #[test]
    fn test_consensus_marks_once() {
        let store = store_with_task();
        assert!(store.mark_consensus(&task()).unwrap());
        let first = store.snapshot(&task()).unwrap().consensus;
        assert!(!store.mark_consensus(&task()).unwrap());
        assert_eq!(store.snapshot(&task()).unwrap().consensus, first);
    }

    #[test]
    fn test_sealed_log_rejects_appends() {
        let store = store_with_task();
        store
            .append(&task(), Role::InputProcessor, EntryKind::Contribution, "ok")
            .unwrap();
        store.seal(&task()).unwrap();
        assert!(store.is_sealed(&task()));
        assert_eq!(
            store
                .append(&task(), Role::Architect, EntryKind::Contribution, "late")
                .unwrap_err(),
            DiscussionError::Sealed(task())
        );
        assert_eq!(store.snapshot(&task()).unwrap().entries.len(), 1);
    }
}
