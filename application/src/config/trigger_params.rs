//! Trigger parameters: confirmation handling control.

use council_domain::AffirmationMatcher;
use council_domain::trigger::affirmation::DEFAULT_AFFIRMATIONS;
use serde::{Deserialize, Serialize};

/// Confirmation trigger parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerParams {
    /// Messages that count as a "yes" (normalized before matching).
    pub affirmations: Vec<String>,
    /// Send a push notification when an action fails.
    pub notify_on_failure: bool,
    /// Memory fragments handed to the action as context.
    pub memory_context_limit: usize,
}

impl Default for TriggerParams {
    fn default() -> Self {
        Self {
            affirmations: DEFAULT_AFFIRMATIONS.iter().map(|s| s.to_string()).collect(),
            notify_on_failure: true,
            memory_context_limit: 5,
        }
    }
}

impl TriggerParams {
    pub fn with_affirmations<I, S>(mut self, affirmations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affirmations = affirmations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_notify_on_failure(mut self, notify: bool) -> Self {
        self.notify_on_failure = notify;
        self
    }

    pub fn with_memory_context_limit(mut self, limit: usize) -> Self {
        self.memory_context_limit = limit;
        self
    }

    /// Build the matcher for the configured tokens
    pub fn matcher(&self) -> AffirmationMatcher {
        AffirmationMatcher::new(&self.affirmations)
    }
}
