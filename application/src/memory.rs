//! Shared access to the process-wide memory bank.
//!
//! The trigger writes fragments after successful actions; the orchestrator
//! and the trigger read recent insights. Every operation is one critical
//! section, so the capacity and uniqueness rules of [`MemoryBank`] hold
//! under concurrent writers.

use council_domain::{AddOutcome, Contributor, MemoryBank, MemoryFragment};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

pub struct SharedMemoryBank {
    inner: Mutex<MemoryBank>,
}

impl Default for SharedMemoryBank {
    fn default() -> Self {
        Self::from_bank(MemoryBank::default())
    }
}

impl SharedMemoryBank {
    pub fn new(capacity: usize) -> Self {
        Self::from_bank(MemoryBank::new(capacity))
    }

    pub fn from_bank(bank: MemoryBank) -> Self {
        Self {
            inner: Mutex::new(bank),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryBank> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(
        &self,
        contributor: Contributor,
        content: impl Into<String>,
        tags: Vec<String>,
    ) -> AddOutcome {
        let outcome = self.lock().add(contributor, content, tags);
        if let AddOutcome::Added {
            evicted: Some(old), ..
        } = &outcome
        {
            debug!(evicted = %old.id, "Memory bank full, evicted oldest fragment");
        }
        outcome
    }

    /// Newest first
    pub fn recent(&self, limit: usize) -> Vec<MemoryFragment> {
        self.lock().recent(limit)
    }

    pub fn recent_tagged(&self, tag: &str, limit: usize) -> Vec<MemoryFragment> {
        self.lock().recent_tagged(tag, limit)
    }

    /// Prompt-ready summary of recent successful knowledge
    pub fn insight_context(&self, limit: usize) -> Option<String> {
        self.lock().insight_context(limit)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_concurrent_writers_respect_capacity_and_uniqueness() {
        let bank = Arc::new(SharedMemoryBank::new(10));
        let mut handles = Vec::new();
        for worker in 0..4 {
            let bank = Arc::clone(&bank);
            handles.push(tokio::spawn(async move {
                for i in 0..10 {
                    // Workers overlap on even numbers to exercise dedup
                    let key = if i % 2 == 0 { i } else { worker * 100 + i };
                    bank.add(
                        Contributor::Action("lead_search".into()),
                        format!("lead {}", key),
                        vec![],
                    );
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let fragments = bank.recent(usize::MAX);
        assert_eq!(fragments.len(), 10);
        let mut contents: Vec<_> = fragments.iter().map(|f| f.content.clone()).collect();
        contents.sort();
        contents.dedup();
        assert_eq!(contents.len(), 10);
    }

    #[test]
    fn test_insight_context_passthrough() {
        let bank = SharedMemoryBank::default();
        assert!(bank.insight_context(5).is_none());
        assert!(bank.is_empty());
        bank.add(
            Contributor::Action("send_report".into()),
            "Board liked the Q3 report",
            vec!["success".into()],
        );
        let context = bank.insight_context(5).unwrap();
        assert!(context.contains("Board liked the Q3 report"));
        assert_eq!(bank.len(), 1);
    }
}
