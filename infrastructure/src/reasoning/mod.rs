//! Reasoning backends
//!
//! [`OpenAiCompatibleReasoning`] implements the
//! [`ReasoningCapability`](council_application::ReasoningCapability) port over
//! HTTP, with [`RoleModelRouter`] choosing the model per council role.

mod openai_compatible;
mod routing;

pub use openai_compatible::OpenAiCompatibleReasoning;
pub use routing::RoleModelRouter;
