//! Application layer for hive-council
//!
//! This crate contains use cases, port definitions, the live discussion log
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod discussion;
pub mod memory;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CouncilConfig, DeliberationParams, TriggerParams};
pub use discussion::{DiscussionError, DiscussionLogStore, DiscussionSubscription};
pub use memory::SharedMemoryBank;
pub use ports::{
    action_executor::{ActionError, ActionExecutor, ActionRequest},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    notifier::{NoNotifications, NotificationDispatcher, NotificationError},
    progress::{NoStageProgress, StageProgressNotifier},
    reasoning::{ReasoningCapability, ReasoningError},
    trigger_state::{ExecutionRecordStore, PendingQuestionStore, StoreError},
};
pub use use_cases::confirmation_trigger::{
    ConfirmationTriggerUseCase, TriggerError, TriggerOutcome,
};
pub use use_cases::run_deliberation::{
    DeliberationError, DeliberationOrchestrator, StartedDeliberation,
};
