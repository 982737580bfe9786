//! Domain layer for hive-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A task is deliberated by a fixed pipeline of reasoning roles. Every stage
//! output becomes an entry in the task's append-only discussion log, and the
//! Synthesizer declares consensus through an explicit resolution marker.
//!
//! ## Memory
//!
//! A bounded, deduplicated bank of knowledge fragments shared across roles
//! and triggered actions.
//!
//! ## Trigger
//!
//! A user's "yes" to a pending question executes the deferred action exactly
//! once per message, guarded by an execution record.

pub mod core;
pub mod council;
pub mod memory;
pub mod prompt;
pub mod trigger;

// Re-export commonly used types
pub use core::{error::DomainError, output_format::OutputFormat, string::truncate};
pub use council::{
    ConsensusMarker, Discussion, DiscussionSnapshot, DiscussionUpdate, EntryKind, FailureReason,
    LogEntry, Resolution, Role, Task, TaskId, TaskInput, TaskStatus, parse_resolution,
    strip_resolution,
};
pub use memory::{AddOutcome, Contributor, FragmentId, MemoryBank, MemoryFragment};
pub use prompt::PromptTemplate;
pub use trigger::{
    ActionExecutionRecord, ActionOutcome, ActionRef, ActionResult, AffirmationMatcher,
    InboundMessage, MessageId, PendingQuestion, UserId,
};
