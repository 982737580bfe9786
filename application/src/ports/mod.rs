//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod action_executor;
pub mod conversation_logger;
pub mod notifier;
pub mod progress;
pub mod reasoning;
pub mod trigger_state;
