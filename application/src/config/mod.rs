//! Application-level configuration.
//!
//! These types control how the use cases behave: stage timeouts and retry
//! policy for deliberations, affirmation tokens for the trigger, and memory
//! bank sizing. They are filled from the merged config file by the CLI.

pub mod council_config;
pub mod deliberation_params;
pub mod trigger_params;

pub use council_config::CouncilConfig;
pub use deliberation_params::DeliberationParams;
pub use trigger_params::TriggerParams;
