//! Presentation layer for hive-council
//!
//! This crate contains CLI definitions, output formatters, progress
//! reporters, and the client-side discussion view.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;
pub mod view;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use config::OutputConfig;
pub use output::{console::ConsoleFormatter, formatter::OutputFormatter, report::DeliberationReport};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use view::discussion_view::DiscussionView;
