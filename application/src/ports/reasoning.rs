//! Reasoning capability port
//!
//! Defines the interface through which council stages reach a language
//! model (or any other text generator).

use async_trait::async_trait;
use council_domain::Role;
use thiserror::Error;

/// Errors that can occur while invoking the reasoning backend
#[derive(Error, Debug)]
pub enum ReasoningError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Produces the output text for one council stage.
///
/// `role` lets adapters route stages to different backends or models;
/// `persona` is the role's system instructions and `prompt` the stage
/// context (task, insights, discussion so far). Implementations live in the
/// infrastructure layer.
///
/// The orchestrator bounds every call with a timeout and retries failures,
/// so implementations should not retry internally.
#[async_trait]
pub trait ReasoningCapability: Send + Sync {
    async fn invoke(&self, role: Role, persona: &str, prompt: &str)
    -> Result<String, ReasoningError>;
}
