//! Deliberation task entity
//!
//! A [`Task`] is one run through the council pipeline. Its status only moves
//! forward: `Pending -> Running -> {ConsensusReached | Failed}`.

use super::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a deliberation.
///
/// Derived from the normalized task input, so the same request always maps
/// to the same id and a repeated start resolves to the existing task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fingerprint a task input (UUIDv5 over the normalized text).
    pub fn fingerprint(input: &TaskInput) -> Self {
        let normalized = input
            .content()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, normalized.as_bytes()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The request a deliberation works on (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    content: String,
}

impl TaskInput {
    /// Returns `None` for empty or whitespace-only input
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for TaskInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// Lifecycle status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    ConsensusReached,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::ConsensusReached | TaskStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Running => "RUNNING",
            TaskStatus::ConsensusReached => "CONSENSUS_REACHED",
            TaskStatus::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a task ended in [`TaskStatus::Failed`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FailureReason {
    /// A stage kept failing after all retries
    StageExhausted {
        role: Role,
        attempts: usize,
        last_error: String,
    },
    /// An external caller cancelled the task
    Cancelled,
    /// The pipeline completed but the Synthesizer did not declare consensus
    NoConsensus,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::StageExhausted {
                role,
                attempts,
                last_error,
            } => write!(f, "{} failed after {} attempts: {}", role, attempts, last_error),
            FailureReason::Cancelled => write!(f, "cancelled"),
            FailureReason::NoConsensus => write!(f, "no consensus reached"),
        }
    }
}

/// A single deliberation (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    input: TaskInput,
    status: TaskStatus,
    current_stage_index: usize,
    created_at: DateTime<Utc>,
    failure: Option<FailureReason>,
}

impl Task {
    pub fn new(id: TaskId, input: TaskInput) -> Self {
        Self {
            id,
            input,
            status: TaskStatus::Pending,
            current_stage_index: 0,
            created_at: Utc::now(),
            failure: None,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn input(&self) -> &TaskInput {
        &self.input
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn current_stage_index(&self) -> usize {
        self.current_stage_index
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        self.failure.as_ref()
    }

    /// `Pending -> Running`. Returns false if the task already left Pending.
    pub fn start(&mut self) -> bool {
        if self.status != TaskStatus::Pending {
            return false;
        }
        self.status = TaskStatus::Running;
        true
    }

    /// Record which stage is being worked on. Ignored once terminal.
    pub fn enter_stage(&mut self, role: Role) {
        if self.status == TaskStatus::Running {
            self.current_stage_index = role.stage_index();
        }
    }

    /// `Running -> ConsensusReached`. Returns false if not running.
    pub fn complete_with_consensus(&mut self) -> bool {
        if self.status != TaskStatus::Running {
            return false;
        }
        self.status = TaskStatus::ConsensusReached;
        true
    }

    /// `Pending | Running -> Failed`. Returns false if already terminal.
    pub fn fail(&mut self, reason: FailureReason) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = TaskStatus::Failed;
        self.failure = Some(reason);
        true
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.failure, Some(FailureReason::Cancelled))
    }
}
