//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod confirmation_trigger;
pub mod run_deliberation;
