//! In-process state stores for the confirmation trigger.

mod execution_records;
mod pending_questions;

pub use execution_records::InMemoryExecutionRecords;
pub use pending_questions::InMemoryPendingQuestions;
