//! Confirmation trigger domain
//!
//! A user's affirmative reply to a [`PendingQuestion`] unlocks the deferred
//! action it references. Each inbound message moves through a two-state
//! machine, `UNSEEN -> EXECUTED`, guarded by an [`ActionExecutionRecord`].

pub mod affirmation;
pub mod execution;
pub mod message;
pub mod pending;

pub use affirmation::{AffirmationMatcher, DEFAULT_AFFIRMATIONS, normalize};
pub use execution::{ActionExecutionRecord, ActionOutcome, ActionResult};
pub use message::{InboundMessage, MessageId, UserId};
pub use pending::{ActionRef, PendingQuestion};
