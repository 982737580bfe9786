//! Client-side rendering cache for a live discussion
//!
//! Subscriptions deliver a snapshot followed by deltas, and a resync can
//! repeat entries the client already has. The view keeps entries keyed by
//! sequence number so duplicates collapse and order is always by sequence.

use council_domain::{ConsensusMarker, DiscussionUpdate, LogEntry, TaskId};
use std::collections::BTreeMap;

/// Entries and consensus flag as seen by one observer
#[derive(Debug, Clone)]
pub struct DiscussionView {
    task_id: TaskId,
    entries: BTreeMap<u64, LogEntry>,
    consensus: ConsensusMarker,
}

impl DiscussionView {
    pub fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            entries: BTreeMap::new(),
            consensus: ConsensusMarker::default(),
        }
    }

    /// Merge an update and return the entries this view had not seen yet,
    /// in sequence order. Updates for another task are ignored.
    pub fn apply(&mut self, update: DiscussionUpdate) -> Vec<LogEntry> {
        if update.task_id() != &self.task_id {
            return Vec::new();
        }
        let consensus = update.consensus();
        let incoming = match update {
            DiscussionUpdate::Snapshot(snapshot) => snapshot.entries,
            DiscussionUpdate::Delta { entry, .. } => entry.into_iter().collect(),
        };

        // The flag only moves forward; a stale snapshot never clears it.
        if consensus.is_reached() && !self.consensus.is_reached() {
            self.consensus = consensus;
        }

        let mut fresh: Vec<LogEntry> = incoming
            .into_iter()
            .filter(|entry| !self.entries.contains_key(&entry.sequence))
            .collect();
        fresh.sort_by_key(|e| e.sequence);
        fresh.dedup_by_key(|e| e.sequence);
        for entry in &fresh {
            self.entries.insert(entry.sequence, entry.clone());
        }
        fresh
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn consensus_reached(&self) -> bool {
        self.consensus.is_reached()
    }

    /// True when sequences run 0..n without holes
    pub fn is_contiguous(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(i, seq)| *seq == i as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Discussion, EntryKind, Role};

    fn discussion() -> Discussion {
        let mut d = Discussion::new(TaskId::new("t1"));
        d.append(Role::InputProcessor, EntryKind::Contribution, "a");
        d.append(Role::Architect, EntryKind::Contribution, "b");
        d
    }

    fn delta(entry: Option<LogEntry>, consensus: ConsensusMarker) -> DiscussionUpdate {
        DiscussionUpdate::Delta {
            task_id: TaskId::new("t1"),
            entry,
            consensus,
        }
    }

    #[test]
    fn test_snapshot_then_delta() {
        let mut d = discussion();
        let mut view = DiscussionView::new(TaskId::new("t1"));

        let fresh = view.apply(DiscussionUpdate::Snapshot(d.snapshot()));
        assert_eq!(fresh.len(), 2);

        let entry = d.append(Role::Critic, EntryKind::Contribution, "c");
        let fresh = view.apply(delta(Some(entry), d.consensus()));
        assert_eq!(fresh[0].sequence, 2);
        assert_eq!(view.len(), 3);
        assert!(view.is_contiguous());
    }

    #[test]
    fn test_resync_snapshot_dedupes() {
        let mut d = discussion();
        let mut view = DiscussionView::new(TaskId::new("t1"));
        view.apply(DiscussionUpdate::Snapshot(d.snapshot()));

        d.append(Role::Critic, EntryKind::Contribution, "c");
        let fresh = view.apply(DiscussionUpdate::Snapshot(d.snapshot()));
        assert_eq!(fresh.iter().map(|e| e.sequence).collect::<Vec<_>>(), vec![2]);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_out_of_order_deltas_are_sorted() {
        let mut d = discussion();
        let c = d.append(Role::Critic, EntryKind::Contribution, "c");
        let s = d.append(Role::Synthesizer, EntryKind::Contribution, "s");
        let mut view = DiscussionView::new(TaskId::new("t1"));

        view.apply(delta(Some(s.clone()), ConsensusMarker::default()));
        view.apply(delta(Some(s), ConsensusMarker::default()));
        view.apply(delta(Some(c), ConsensusMarker::default()));

        let order: Vec<u64> = view.entries().map(|e| e.sequence).collect();
        assert_eq!(order, vec![2, 3]);
        assert!(!view.is_contiguous());
    }

    #[test]
    fn test_consensus_only_moves_forward() {
        let mut d = discussion();
        let stale = d.snapshot();
        d.mark_consensus();
        let mut view = DiscussionView::new(TaskId::new("t1"));

        assert!(view.apply(delta(None, d.consensus())).is_empty());
        assert!(view.consensus_reached());

        view.apply(DiscussionUpdate::Snapshot(stale));
        assert!(view.consensus_reached());
    }

    #[test]
    fn test_other_task_ignored() {
        let mut view = DiscussionView::new(TaskId::new("t2"));
        assert!(view.apply(DiscussionUpdate::Snapshot(discussion().snapshot())).is_empty());
        assert!(view.is_empty());
    }
}
