//! Generic reasoning-backed action.
//!
//! Hands the confirmed question and the memory context to the reasoning
//! backend and remembers its answer. Usually installed as the registry's
//! fallback so actions without a dedicated handler still run.

use super::registry::ActionHandler;
use async_trait::async_trait;
use council_application::ports::action_executor::{ActionError, ActionRequest};
use council_application::ports::reasoning::ReasoningCapability;
use council_domain::{ActionResult, Role, truncate};
use std::sync::Arc;
use tracing::debug;

pub const REASONING_TASK: &str = "reasoning_task";

/// Length of the one-line summary taken from the answer
const SUMMARY_LEN: usize = 120;

pub struct ReasoningAction<R: ReasoningCapability> {
    reasoning: Arc<R>,
    /// Routing key for the backend; actions are not council stages
    role: Role,
}

impl<R: ReasoningCapability> ReasoningAction<R> {
    pub fn new(reasoning: Arc<R>) -> Self {
        Self {
            reasoning,
            role: Role::Synthesizer,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    fn persona(request: &ActionRequest) -> String {
        format!(
            "You are {}, an assistant carrying out a request the user has just confirmed.\n\
             Do the work and reply with the result only.",
            request.action_ref
        )
    }

    fn prompt(request: &ActionRequest) -> String {
        let mut prompt = format!("Task: {}", request.question_text);
        if let Some(context) = &request.memory_context {
            prompt.push_str("\n\nContext:\n");
            prompt.push_str(context);
        }
        prompt
    }
}

#[async_trait]
impl<R: ReasoningCapability + 'static> ActionHandler for ReasoningAction<R> {
    fn name(&self) -> &str {
        REASONING_TASK
    }

    async fn run(&self, request: &ActionRequest) -> Result<ActionResult, ActionError> {
        debug!(action = %request.action_ref, role = %self.role, "Delegating action to reasoning backend");
        let answer = self
            .reasoning
            .invoke(self.role, &Self::persona(request), &Self::prompt(request))
            .await
            .map_err(|e| ActionError::Failed(e.to_string()))?;

        let answer = answer.trim();
        let headline = answer.lines().next().unwrap_or_default();
        Ok(ActionResult::new(format!(
            "{}: {}",
            request.action_ref,
            truncate(headline, SUMMARY_LEN)
        ))
        .with_items([answer]))
    }
}
