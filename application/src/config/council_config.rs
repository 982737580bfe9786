//! CouncilConfig: container for all application-level settings.

use super::deliberation_params::DeliberationParams;
use super::trigger_params::TriggerParams;
use council_domain::memory::DEFAULT_MEMORY_CAPACITY;

/// Everything the use cases need from configuration.
///
/// Built by the CLI from the merged config file; use cases only see the
/// part that concerns them.
#[derive(Debug, Clone, PartialEq)]
pub struct CouncilConfig {
    pub deliberation: DeliberationParams,
    pub trigger: TriggerParams,
    /// Maximum number of fragments held by the memory bank.
    pub memory_capacity: usize,
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            deliberation: DeliberationParams::default(),
            trigger: TriggerParams::default(),
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
        }
    }
}

impl CouncilConfig {
    pub fn with_deliberation(mut self, params: DeliberationParams) -> Self {
        self.deliberation = params;
        self
    }

    pub fn with_trigger(mut self, params: TriggerParams) -> Self {
        self.trigger = params;
        self
    }

    pub fn with_memory_capacity(mut self, capacity: usize) -> Self {
        self.memory_capacity = capacity;
        self
    }
}
