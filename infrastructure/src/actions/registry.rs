//! Action Registry
//!
//! The [`ActionRegistry`] maps action names to [`ActionHandler`]s and
//! implements [`ActionExecutor`]. A pending question's action reference is
//! resolved by exact name. Unknown names go to the fallback handler when one
//! is set and fail with [`ActionError::UnknownAction`] otherwise.
//!
//! ```ignore
//! let registry = ActionRegistry::new()
//!     .register(ReportFileAction::new("./reports"))
//!     .with_fallback(ReasoningAction::new(reasoning))
//!     .with_timeout(Duration::from_secs(60));
//! ```

use async_trait::async_trait;
use council_application::ports::action_executor::{ActionError, ActionExecutor, ActionRequest};
use council_domain::ActionResult;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// One named deferred action
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Name matched against `PendingQuestion::action_ref`
    fn name(&self) -> &str;

    async fn run(&self, request: &ActionRequest) -> Result<ActionResult, ActionError>;
}

/// Registry of action handlers, keyed by name
#[derive(Default)]
pub struct ActionRegistry {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
    fallback: Option<Arc<dyn ActionHandler>>,
    timeout: Option<Duration>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. A later handler with the same name replaces the earlier one.
    pub fn register(mut self, handler: impl ActionHandler + 'static) -> Self {
        self.handlers
            .insert(handler.name().to_string(), Arc::new(handler));
        self
    }

    /// Run `handler` for action names nothing else is registered under
    pub fn with_fallback(mut self, handler: impl ActionHandler + 'static) -> Self {
        self.fallback = Some(Arc::new(handler));
        self
    }

    /// Bound every action run; an overrun fails with [`ActionError::Timeout`]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered action names, sorted
    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl ActionExecutor for ActionRegistry {
    async fn execute(&self, request: &ActionRequest) -> Result<ActionResult, ActionError> {
        let name = request.action_ref.as_str();
        let handler = match self.handlers.get(name) {
            Some(handler) => handler,
            None => {
                let fallback = self
                    .fallback
                    .as_ref()
                    .ok_or_else(|| ActionError::UnknownAction(name.to_string()))?;
                debug!(action = name, fallback = fallback.name(), "No handler registered, using fallback");
                fallback
            }
        };

        debug!(action = name, message_id = %request.message_id, "Running action");
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, handler.run(request))
                .await
                .map_err(|_| ActionError::Timeout)?,
            None => handler.run(request).await,
        }?;
        info!(action = name, summary = %result.summary, "Action finished");
        Ok(result)
    }
}
