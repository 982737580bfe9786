//! Prompt domain
//!
//! Builds the per-stage prompt context. Role personas live on
//! [`Role::persona`](crate::council::Role::persona).

mod template;

pub use template::PromptTemplate;
