//! Discussion log types
//!
//! A [`Discussion`] is the append-only, gap-free log of one task plus its
//! consensus marker. Observers see it as a [`DiscussionSnapshot`] followed by
//! [`DiscussionUpdate::Delta`]s.

use super::role::Role;
use super::task::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Output of a successful stage
    Contribution,
    /// A stage exhausted its retries
    Failure,
    /// The task was cancelled before this role ran
    Cancellation,
}

/// One immutable append to a task's discussion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub task_id: TaskId,
    /// Strictly increasing per task, starting at 0, no gaps
    pub sequence: u64,
    pub role: Role,
    pub kind: EntryKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn is_failure(&self) -> bool {
        matches!(self.kind, EntryKind::Failure | EntryKind::Cancellation)
    }
}

/// Consensus flag of a task; flips false -> true at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsensusMarker {
    reached_at: Option<DateTime<Utc>>,
}

impl ConsensusMarker {
    pub fn is_reached(&self) -> bool {
        self.reached_at.is_some()
    }

    pub fn reached_at(&self) -> Option<DateTime<Utc>> {
        self.reached_at
    }

    /// Set the marker. Returns false if it was already set.
    pub fn mark(&mut self, at: DateTime<Utc>) -> bool {
        if self.reached_at.is_some() {
            return false;
        }
        self.reached_at = Some(at);
        true
    }
}

/// Ordered log of one task (Entity)
#[derive(Debug, Clone)]
pub struct Discussion {
    task_id: TaskId,
    entries: Vec<LogEntry>,
    consensus: ConsensusMarker,
}

impl Discussion {
    pub fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            entries: Vec::new(),
            consensus: ConsensusMarker::default(),
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn consensus(&self) -> ConsensusMarker {
        self.consensus
    }

    pub fn next_sequence(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Append an entry with the next sequence number and return a copy of it.
    pub fn append(&mut self, role: Role, kind: EntryKind, message: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            task_id: self.task_id.clone(),
            sequence: self.next_sequence(),
            role,
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Set the consensus marker. Returns false if already set.
    pub fn mark_consensus(&mut self) -> bool {
        self.consensus.mark(Utc::now())
    }

    pub fn snapshot(&self) -> DiscussionSnapshot {
        DiscussionSnapshot {
            task_id: self.task_id.clone(),
            entries: self.entries.clone(),
            consensus: self.consensus,
        }
    }
}

/// Full ordered view of a discussion at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionSnapshot {
    pub task_id: TaskId,
    pub entries: Vec<LogEntry>,
    pub consensus: ConsensusMarker,
}

impl DiscussionSnapshot {
    pub fn empty(task_id: TaskId) -> Self {
        Self {
            task_id,
            entries: Vec::new(),
            consensus: ConsensusMarker::default(),
        }
    }

    pub fn consensus_reached(&self) -> bool {
        self.consensus.is_reached()
    }

    /// Sequence number of the newest entry
    pub fn last_sequence(&self) -> Option<u64> {
        self.entries.last().map(|e| e.sequence)
    }

    /// Last successful contribution, i.e. the current final message
    pub fn final_message(&self) -> Option<&LogEntry> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.kind == EntryKind::Contribution)
    }
}

/// What a subscriber receives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscussionUpdate {
    /// Full log; always the first item of a subscription, and again after a resync
    Snapshot(DiscussionSnapshot),
    /// A change after the snapshot. `entry` is `None` when only the consensus flag changed.
    Delta {
        task_id: TaskId,
        entry: Option<LogEntry>,
        consensus: ConsensusMarker,
    },
}

impl DiscussionUpdate {
    pub fn task_id(&self) -> &TaskId {
        match self {
            DiscussionUpdate::Snapshot(s) => &s.task_id,
            DiscussionUpdate::Delta { task_id, .. } => task_id,
        }
    }

    pub fn consensus(&self) -> ConsensusMarker {
        match self {
            DiscussionUpdate::Snapshot(s) => s.consensus,
            DiscussionUpdate::Delta { consensus, .. } => *consensus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_contiguous_sequences() {
        let mut discussion = Discussion::new(TaskId::new("t1"));
        let a = discussion.append(Role::InputProcessor, EntryKind::Contribution, "a");
        let b = discussion.append(Role::Architect, EntryKind::Contribution, "b");
        let c = discussion.append(Role::Critic, EntryKind::Failure, "c");

        assert_eq!((a.sequence, b.sequence, c.sequence), (0, 1, 2));
        assert_eq!(discussion.next_sequence(), 3);
        assert!(c.is_failure());
    }

    #[test]
    fn test_consensus_marker_is_set_once() {
        let mut discussion = Discussion::new(TaskId::new("t1"));
        assert!(!discussion.consensus().is_reached());
        assert!(discussion.mark_consensus());
        let first = discussion.consensus().reached_at();
        assert!(!discussion.mark_consensus());
        assert_eq!(discussion.consensus().reached_at(), first);
    }

    #[test]
    fn test_snapshot_final_message_skips_failures() {
        let mut discussion = Discussion::new(TaskId::new("t1"));
        discussion.append(Role::Synthesizer, EntryKind::Contribution, "answer");
        discussion.append(Role::OutputGuard, EntryKind::Failure, "guard down");

        let snapshot = discussion.snapshot();
        assert_eq!(snapshot.last_sequence(), Some(1));
        assert_eq!(snapshot.final_message().unwrap().message, "answer");
    }

    #[test]
    fn test_update_serializes_with_type_tag() {
        let update = DiscussionUpdate::Snapshot(DiscussionSnapshot::empty(TaskId::new("t1")));
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "snapshot");
        assert_eq!(json["task_id"], "t1");
    }
}
