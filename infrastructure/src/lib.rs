//! Infrastructure layer for hive-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod actions;
pub mod config;
pub mod logging;
pub mod notifications;
pub mod reasoning;
pub mod stores;

// Re-export commonly used types
pub use actions::{
    ActionHandler, ActionRegistry, REASONING_TASK, ReasoningAction, ReportFileAction, SEND_REPORT,
};
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig,
    FileOutputFormat, FileReasoningConfig, Severity,
};
pub use logging::JsonlConversationLogger;
pub use notifications::{TracingNotifier, WebhookNotifier, dispatcher_from_config};
pub use reasoning::{OpenAiCompatibleReasoning, RoleModelRouter};
pub use stores::{InMemoryExecutionRecords, InMemoryPendingQuestions};
