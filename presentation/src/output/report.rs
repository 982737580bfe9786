//! Serializable result of one deliberation

use council_domain::{DiscussionSnapshot, FailureReason, LogEntry, Task, TaskId, TaskStatus};
use serde::Serialize;

/// Final view of a task: its terminal status plus the full discussion
#[derive(Debug, Clone, Serialize)]
pub struct DeliberationReport {
    pub task_id: TaskId,
    pub input: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
    pub consensus_reached: bool,
    /// Last successful contribution with resolution markers removed
    pub final_message: Option<String>,
    pub entries: Vec<LogEntry>,
}

impl DeliberationReport {
    pub fn new(task: &Task, discussion: &DiscussionSnapshot) -> Self {
        Self {
            task_id: task.id().clone(),
            input: task.input().content().to_string(),
            status: task.status(),
            failure: task.failure().cloned(),
            consensus_reached: discussion.consensus_reached(),
            final_message: discussion
                .final_message()
                .map(|e| council_domain::strip_resolution(&e.message)),
            entries: discussion.entries.clone(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == TaskStatus::ConsensusReached
    }
}
