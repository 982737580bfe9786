//! Council deliberation domain
//!
//! A task passes through a fixed pipeline of reasoning roles:
//!
//! ```text
//! InputProcessor -> Architect -> Critic -> Synthesizer -> OutputGuard
//! ```
//!
//! Every stage output is appended to the task's [`Discussion`]. The
//! Synthesizer output decides consensus through an explicit
//! [`resolution`] marker; the OutputGuard always runs last.

pub mod discussion;
pub mod resolution;
pub mod role;
pub mod task;

pub use discussion::{
    ConsensusMarker, Discussion, DiscussionSnapshot, DiscussionUpdate, EntryKind, LogEntry,
};
pub use resolution::{Resolution, parse_resolution, strip_resolution};
pub use role::Role;
pub use task::{FailureReason, Task, TaskId, TaskInput, TaskStatus};
