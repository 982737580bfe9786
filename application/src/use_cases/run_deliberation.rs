//! Run Deliberation use case
//!
//! Drives tasks through the council pipeline: InputProcessor, Architect,
//! Critic, Synthesizer, OutputGuard. Each task runs on its own worker; stages
//! within a task run strictly one after another and each sees the full
//! discussion so far.

use crate::config::DeliberationParams;
use crate::discussion::{DiscussionError, DiscussionLogStore, DiscussionSubscription};
use crate::memory::SharedMemoryBank;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoStageProgress, StageProgressNotifier};
use crate::ports::reasoning::{ReasoningCapability, ReasoningError};
use council_domain::{
    DomainError, EntryKind, FailureReason, PromptTemplate, Role, Task, TaskId, TaskInput,
    TaskStatus, parse_resolution, truncate,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors returned to callers of the orchestrator
#[derive(Error, Debug)]
pub enum DeliberationError {
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Discussion(#[from] DiscussionError),
}

/// Answer to a start request
#[derive(Debug, Clone, PartialEq)]
pub struct StartedDeliberation {
    pub task_id: TaskId,
    /// Status at the time of the call
    pub status: TaskStatus,
    /// False when the task already existed and nothing new was started
    pub newly_started: bool,
}

/// Orchestrator-side state of one task
struct TaskSlot {
    task: Mutex<Task>,
    cancel: CancellationToken,
    /// Flips to true once the worker has written its last log entry
    finished: watch::Sender<bool>,
}

impl TaskSlot {
    fn new(task: Task) -> Self {
        let (finished, _) = watch::channel(false);
        Self {
            task: Mutex::new(task),
            cancel: CancellationToken::new(),
            finished,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Task> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one state transition under the task lock
    fn update<T>(&self, transition: impl FnOnce(&mut Task) -> T) -> T {
        transition(&mut *self.lock())
    }

    fn status(&self) -> TaskStatus {
        self.lock().status()
    }
}

enum StageOutcome {
    Completed(String),
    Exhausted { attempts: usize, last_error: String },
}

/// Use case for running council deliberations
///
/// Cloning is cheap and shares all state; spawned workers hold a clone.
pub struct DeliberationOrchestrator<R: ReasoningCapability + 'static> {
    reasoning: Arc<R>,
    log: Arc<DiscussionLogStore>,
    memory: Arc<SharedMemoryBank>,
    params: DeliberationParams,
    progress: Arc<dyn StageProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
    tasks: Arc<Mutex<HashMap<TaskId, Arc<TaskSlot>>>>,
}

impl<R: ReasoningCapability + 'static> Clone for DeliberationOrchestrator<R> {
    fn clone(&self) -> Self {
        Self {
            reasoning: Arc::clone(&self.reasoning),
            log: Arc::clone(&self.log),
            memory: Arc::clone(&self.memory),
            params: self.params.clone(),
            progress: Arc::clone(&self.progress),
            conversation_logger: Arc::clone(&self.conversation_logger),
            tasks: Arc::clone(&self.tasks),
        }
    }
}

impl<R: ReasoningCapability + 'static> DeliberationOrchestrator<R> {
    pub fn new(
        reasoning: Arc<R>,
        log: Arc<DiscussionLogStore>,
        memory: Arc<SharedMemoryBank>,
    ) -> Self {
        Self {
            reasoning,
            log,
            memory,
            params: DeliberationParams::default(),
            progress: Arc::new(NoStageProgress),
            conversation_logger: Arc::new(NoConversationLogger),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_params(mut self, params: DeliberationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn StageProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    fn lock_tasks(&self) -> MutexGuard<'_, HashMap<TaskId, Arc<TaskSlot>>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, task_id: &TaskId) -> Result<Arc<TaskSlot>, DeliberationError> {
        self.lock_tasks()
            .get(task_id)
            .cloned()
            .ok_or_else(|| DeliberationError::UnknownTask(task_id.clone()))
    }

    // ==================== Commands ====================

    /// Register a task and start its pipeline in the background.
    ///
    /// The task id is a fingerprint of the normalized input, so repeating a
    /// request (or racing two identical ones) starts at most one pipeline.
    /// Must be called from within a Tokio runtime.
    pub fn start_deliberation(
        &self,
        input: &str,
    ) -> Result<StartedDeliberation, DeliberationError> {
        let input = TaskInput::try_new(input).ok_or(DomainError::EmptyTaskInput)?;
        let task_id = TaskId::fingerprint(&input);
        self.start_with_id(task_id, input)
    }

    /// Like [`start_deliberation`](Self::start_deliberation) with a
    /// caller-chosen id.
    pub fn start_with_id(
        &self,
        task_id: TaskId,
        input: TaskInput,
    ) -> Result<StartedDeliberation, DeliberationError> {
        let slot = {
            let mut tasks = self.lock_tasks();
            if let Some(existing) = tasks.get(&task_id) {
                let status = existing.status();
                debug!(task_id = %task_id, status = %status, "Task already registered, not starting again");
                return Ok(StartedDeliberation {
                    task_id,
                    status,
                    newly_started: false,
                });
            }
            let slot = Arc::new(TaskSlot::new(Task::new(task_id.clone(), input)));
            tasks.insert(task_id.clone(), Arc::clone(&slot));
            // Open the log before the id is visible to anyone else
            self.log.open(&task_id);
            slot
        };

        let this = self.clone();
        tokio::spawn(async move {
            this.run_pipeline(slot).await;
        });

        Ok(StartedDeliberation {
            task_id,
            status: TaskStatus::Pending,
            newly_started: true,
        })
    }

    /// Request cancellation of a task.
    ///
    /// The status becomes FAILED immediately; the worker stops before the
    /// next stage. A terminal task is left untouched. Returns the status after
    /// the call.
    pub fn cancel(&self, task_id: &TaskId) -> Result<TaskStatus, DeliberationError> {
        let slot = self.slot(task_id)?;
        if slot.update(|task| task.fail(FailureReason::Cancelled)) {
            slot.cancel.cancel();
            info!(task_id = %task_id, "Deliberation cancelled");
        } else {
            debug!(task_id = %task_id, "Cancel ignored, task already terminal");
        }
        Ok(slot.status())
    }

    /// Cancel every task that has not finished yet. Returns how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let slots: Vec<Arc<TaskSlot>> = self.lock_tasks().values().cloned().collect();
        let mut cancelled = 0;
        for slot in slots {
            if slot.update(|task| task.fail(FailureReason::Cancelled)) {
                slot.cancel.cancel();
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            info!(cancelled, "Cancelled running deliberations");
        }
        cancelled
    }

    // ==================== Queries ====================

    pub fn get_status(&self, task_id: &TaskId) -> Option<TaskStatus> {
        self.slot(task_id).ok().map(|slot| slot.status())
    }

    /// Copy of the task entity
    pub fn task(&self, task_id: &TaskId) -> Option<Task> {
        self.slot(task_id).ok().map(|slot| slot.lock().clone())
    }

    /// Observe a task's discussion live
    pub fn subscribe(&self, task_id: &TaskId) -> Result<DiscussionSubscription, DeliberationError> {
        Ok(self.log.subscribe(task_id)?)
    }

    /// Wait until the task's worker is done and return the final task.
    pub async fn wait_for_completion(&self, task_id: &TaskId) -> Result<Task, DeliberationError> {
        let slot = self.slot(task_id)?;
        let mut finished = slot.finished.subscribe();
        // The sender lives in `slot`, which we hold, so this cannot fail
        let _ = finished.wait_for(|done| *done).await;
        Ok(slot.lock().clone())
    }

    /// Start (or join) a deliberation and wait for its outcome
    pub async fn deliberate(&self, input: &str) -> Result<Task, DeliberationError> {
        let started = self.start_deliberation(input)?;
        self.wait_for_completion(&started.task_id).await
    }

    // ==================== Pipeline ====================

    async fn run_pipeline(&self, slot: Arc<TaskSlot>) {
        let (task_id, input) = {
            let task = slot.lock();
            (task.id().clone(), task.input().clone())
        };

        if !slot.update(Task::start) {
            // Cancelled between registration and the worker starting
            self.append(
                &task_id,
                Role::InputProcessor,
                EntryKind::Cancellation,
                "Deliberation cancelled before it started",
            );
            self.finish(&task_id, &slot);
            return;
        }

        info!(task_id = %task_id, "Deliberation started: {}", truncate(input.content(), 80));
        self.conversation_logger.log(ConversationEvent::new(
            "deliberation_started",
            json!({
                "task_id": task_id.as_str(),
                "input": input.content(),
            }),
        ));

        let mut consensus = false;
        for role in Role::PIPELINE {
            if slot.cancel.is_cancelled() {
                info!(task_id = %task_id, role = %role, "Stopping before stage, task cancelled");
                self.append(
                    &task_id,
                    role,
                    EntryKind::Cancellation,
                    format!("Cancelled before {} could speak", role.display_name()),
                );
                self.finish(&task_id, &slot);
                return;
            }

            slot.update(|task| task.enter_stage(role));
            self.progress.on_stage_start(&task_id, role);

            match self.run_stage(&task_id, role, &input).await {
                StageOutcome::Completed(output) => {
                    self.append(&task_id, role, EntryKind::Contribution, output.as_str());
                    self.progress.on_stage_complete(&task_id, role, true);
                    self.conversation_logger.log(ConversationEvent::new(
                        "stage_output",
                        json!({
                            "task_id": task_id.as_str(),
                            "role": role.as_str(),
                            "output": output,
                        }),
                    ));
                    if role == Role::Synthesizer {
                        // A cancelled task never carries the consensus marker
                        consensus = slot.update(|task| {
                            if task.status() == TaskStatus::Running {
                                self.record_resolution(&task_id, &output)
                            } else {
                                debug!(task_id = %task_id, "Task no longer running, resolution ignored");
                                false
                            }
                        });
                    }
                }
                StageOutcome::Exhausted {
                    attempts,
                    last_error,
                } => {
                    warn!(task_id = %task_id, role = %role, attempts, "Stage failed, aborting deliberation: {}", last_error);
                    self.append(
                        &task_id,
                        role,
                        EntryKind::Failure,
                        format!(
                            "{} failed after {} attempt(s): {}",
                            role.display_name(),
                            attempts,
                            last_error
                        ),
                    );
                    self.progress.on_stage_complete(&task_id, role, false);
                    self.conversation_logger.log(ConversationEvent::new(
                        "stage_failed",
                        json!({
                            "task_id": task_id.as_str(),
                            "role": role.as_str(),
                            "attempts": attempts,
                            "error": last_error,
                        }),
                    ));
                    slot.update(|task| {
                        task.fail(FailureReason::StageExhausted {
                            role,
                            attempts,
                            last_error,
                        })
                    });
                    self.finish(&task_id, &slot);
                    return;
                }
            }
        }

        slot.update(|task| {
            if consensus {
                task.complete_with_consensus()
            } else {
                task.fail(FailureReason::NoConsensus)
            }
        });
        self.finish(&task_id, &slot);
    }

    /// Run one stage with timeout, retries and exponential backoff.
    async fn run_stage(&self, task_id: &TaskId, role: Role, input: &TaskInput) -> StageOutcome {
        let history = self
            .log
            .snapshot(task_id)
            .map(|snapshot| snapshot.entries)
            .unwrap_or_default();
        let insights = self
            .memory
            .insight_context(self.params.memory_context_limit);
        let prompt = PromptTemplate::stage_prompt(role, input, &history, insights.as_deref());

        let max_attempts = self.params.max_attempts();
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.params.backoff_for(attempt - 1);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }

            debug!(task_id = %task_id, role = %role, attempt, "Invoking reasoning");
            let result = match tokio::time::timeout(
                self.params.stage_timeout,
                self.reasoning.invoke(role, role.persona(), &prompt),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(ReasoningError::Timeout),
            };

            match result {
                Ok(output) => return StageOutcome::Completed(output),
                Err(e) => {
                    warn!(task_id = %task_id, role = %role, attempt, max_attempts, "Stage attempt failed: {}", e);
                    last_error = e.to_string();
                    if attempt < max_attempts {
                        self.progress
                            .on_stage_retry(task_id, role, attempt, &last_error);
                    }
                }
            }
        }

        StageOutcome::Exhausted {
            attempts: max_attempts,
            last_error,
        }
    }

    /// Interpret the Synthesizer's resolution line; true means consensus
    fn record_resolution(&self, task_id: &TaskId, output: &str) -> bool {
        let resolution = parse_resolution(output);
        if !resolution.is_consensus() {
            info!(task_id = %task_id, resolution = ?resolution, "Synthesizer did not declare consensus");
            return false;
        }

        match self.log.mark_consensus(task_id) {
            Ok(newly_marked) => {
                if newly_marked {
                    info!(task_id = %task_id, "Consensus reached");
                    self.conversation_logger.log(ConversationEvent::new(
                        "consensus_reached",
                        json!({ "task_id": task_id.as_str() }),
                    ));
                }
                true
            }
            Err(e) => {
                warn!(task_id = %task_id, "Could not record consensus: {}", e);
                false
            }
        }
    }

    fn append(&self, task_id: &TaskId, role: Role, kind: EntryKind, message: impl Into<String>) {
        if let Err(e) = self.log.append(task_id, role, kind, message) {
            warn!(task_id = %task_id, role = %role, "Dropping log entry: {}", e);
        }
    }

    fn finish(&self, task_id: &TaskId, slot: &TaskSlot) {
        let (status, failure) = {
            let task = slot.lock();
            (task.status(), task.failure().cloned())
        };

        if let Err(e) = self.log.seal(task_id) {
            warn!(task_id = %task_id, "Could not seal discussion: {}", e);
        }
        self.progress.on_deliberation_finished(task_id, status);
        self.conversation_logger.log(ConversationEvent::new(
            "deliberation_finished",
            json!({
                "task_id": task_id.as_str(),
                "status": status.as_str(),
                "failure": failure.as_ref().map(|f| f.to_string()),
            }),
        ));
        match &failure {
            Some(reason) => info!(task_id = %task_id, status = %status, "Deliberation finished: {}", reason),
            None => info!(task_id = %task_id, status = %status, "Deliberation finished"),
        }

        slot.finished.send_replace(true);
    }
}
