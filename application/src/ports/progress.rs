//! Stage progress port
//!
//! Defines the interface for reporting progress while a task moves through
//! the council pipeline.

use council_domain::{Role, TaskId, TaskStatus};

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, log lines, web UI).
pub trait StageProgressNotifier: Send + Sync {
    /// Called when a stage starts its first attempt
    fn on_stage_start(&self, task_id: &TaskId, role: Role);

    /// Called when an attempt fails and another one will follow
    fn on_stage_retry(&self, _task_id: &TaskId, _role: Role, _attempt: usize, _error: &str) {}

    /// Called when a stage finishes, successfully or after exhausting retries
    fn on_stage_complete(&self, task_id: &TaskId, role: Role, success: bool);

    /// Called once the task reaches a terminal status
    fn on_deliberation_finished(&self, _task_id: &TaskId, _status: TaskStatus) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoStageProgress;

impl StageProgressNotifier for NoStageProgress {
    fn on_stage_start(&self, _task_id: &TaskId, _role: Role) {}
    fn on_stage_complete(&self, _task_id: &TaskId, _role: Role, _success: bool) {}
}
