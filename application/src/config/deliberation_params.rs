//! Deliberation parameters: stage pipeline control.
//!
//! [`DeliberationParams`] groups the static knobs that control how
//! [`DeliberationOrchestrator`](crate::use_cases::run_deliberation::DeliberationOrchestrator)
//! drives a task through the council: per-stage timeout, retry budget and
//! backoff, and how much memory-bank context each prompt carries.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stage pipeline control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationParams {
    /// Retries after the first failed attempt of a stage.
    pub max_stage_retries: usize,
    /// Upper bound for one reasoning invocation.
    pub stage_timeout: Duration,
    /// Base delay before the first retry; doubles on each further retry.
    pub retry_backoff: Duration,
    /// Number of successful memory fragments offered as insight context.
    pub memory_context_limit: usize,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            max_stage_retries: 2,
            stage_timeout: Duration::from_secs(30),
            retry_backoff: Duration::from_millis(500),
            memory_context_limit: 5,
        }
    }
}

impl DeliberationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_stage_retries(mut self, retries: usize) -> Self {
        self.max_stage_retries = retries;
        self
    }

    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_memory_context_limit(mut self, limit: usize) -> Self {
        self.memory_context_limit = limit;
        self
    }

    // ==================== Derived Values ====================

    /// Total attempts a stage gets before it is declared failed.
    pub fn max_attempts(&self) -> usize {
        self.max_stage_retries + 1
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff_for(&self, retry: usize) -> Duration {
        let exponent = retry.saturating_sub(1).min(16) as u32;
        self.retry_backoff.saturating_mul(2u32.saturating_pow(exponent))
    }
}
