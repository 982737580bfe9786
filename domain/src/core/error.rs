//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Task input cannot be empty")]
    EmptyTaskInput,

    #[error("Unknown council role: {0}")]
    UnknownRole(String),
}
