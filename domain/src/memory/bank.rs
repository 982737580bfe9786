//! Bounded, deduplicated memory bank
//!
//! Pure data structure; callers that share it across tasks wrap it in a
//! single lock so the dedup check and the insert happen together.

use super::fragment::{Contributor, MemoryFragment, TAG_SUCCESS};
use std::collections::HashSet;

/// Default number of fragments retained
pub const DEFAULT_MEMORY_CAPACITY: usize = 100;

/// Result of adding a fragment
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// Stored; `evicted` is the fragment pushed out by the capacity bound
    Added {
        fragment: MemoryFragment,
        evicted: Option<MemoryFragment>,
    },
    /// A fragment with identical content already exists
    Duplicate,
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

/// Recency-ordered store of memory fragments
#[derive(Debug, Clone)]
pub struct MemoryBank {
    capacity: usize,
    /// Insertion order
    fragments: Vec<MemoryFragment>,
    contents: HashSet<String>,
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CAPACITY)
    }
}

impl MemoryBank {
    /// Create a bank holding at most `capacity` fragments (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            fragments: Vec::new(),
            contents: HashSet::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn contains_content(&self, content: &str) -> bool {
        self.contents.contains(content)
    }

    /// Add a new fragment built from its parts.
    pub fn add(
        &mut self,
        contributor: Contributor,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> AddOutcome {
        self.insert(MemoryFragment::new(contributor, content, tags))
    }

    /// Insert a prepared fragment (e.g. one restored with its original timestamp).
    ///
    /// Exact-content duplicates are rejected. Beyond capacity the fragment with
    /// the oldest timestamp is evicted; ties go to the earliest inserted.
    pub fn insert(&mut self, fragment: MemoryFragment) -> AddOutcome {
        if self.contains_content(&fragment.content) {
            return AddOutcome::Duplicate;
        }

        self.contents.insert(fragment.content.clone());
        self.fragments.push(fragment.clone());

        let evicted = if self.fragments.len() > self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        AddOutcome::Added { fragment, evicted }
    }

    fn evict_oldest(&mut self) -> Option<MemoryFragment> {
        let index = self
            .fragments
            .iter()
            .enumerate()
            .min_by_key(|(_, f)| f.timestamp)
            .map(|(i, _)| i)?;
        let removed = self.fragments.remove(index);
        self.contents.remove(&removed.content);
        Some(removed)
    }

    /// Up to `limit` fragments, newest first.
    pub fn recent(&self, limit: usize) -> Vec<MemoryFragment> {
        self.recent_matching(limit, |_| true)
    }

    /// Up to `limit` fragments carrying `tag`, newest first.
    pub fn recent_tagged(&self, tag: &str, limit: usize) -> Vec<MemoryFragment> {
        self.recent_matching(limit, |f| f.has_tag(tag))
    }

    fn recent_matching(
        &self,
        limit: usize,
        predicate: impl Fn(&MemoryFragment) -> bool,
    ) -> Vec<MemoryFragment> {
        // Reverse insertion order first so equal timestamps keep newest-inserted first
        let mut matching: Vec<MemoryFragment> = self
            .fragments
            .iter()
            .rev()
            .filter(|f| predicate(f))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit);
        matching
    }

    /// Context paragraph built from recent successful results, for stage prompts.
    ///
    /// Returns `None` when the bank holds no successful results yet.
    pub fn insight_context(&self, limit: usize) -> Option<String> {
        let insights = self.recent_tagged(TAG_SUCCESS, limit);
        if insights.is_empty() {
            return None;
        }
        Some(
            insights
                .iter()
                .map(|f| format!("- ({}) {}", f.contributor, f.content))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}
