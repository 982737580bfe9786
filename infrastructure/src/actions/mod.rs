//! Confirmed-action adapters

mod reasoning_task;
mod registry;
mod report;

pub use reasoning_task::{REASONING_TASK, ReasoningAction};
pub use registry::{ActionHandler, ActionRegistry};
pub use report::{ReportFileAction, SEND_REPORT};
