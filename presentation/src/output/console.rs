//! Console output formatter for deliberation results

use super::formatter::OutputFormatter;
use super::report::DeliberationReport;
use colored::Colorize;
use council_domain::{EntryKind, LogEntry, TaskStatus, strip_resolution};

/// Formats deliberation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete transcript
    pub fn format(report: &DeliberationReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council Discussion"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Task:".cyan().bold(), report.input));
        output.push_str(&format!(
            "{} {}\n",
            "Id:".cyan().bold(),
            report.task_id.to_string().dimmed()
        ));

        output.push_str(&Self::section_header("Discussion"));
        for entry in &report.entries {
            output.push_str(&Self::format_entry(entry));
            output.push('\n');
        }

        output.push_str(&Self::section_header("Outcome"));
        output.push_str(&Self::status_line(report));
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &DeliberationReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final message only (concise output)
    pub fn format_final_only(report: &DeliberationReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Council Conclusion ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n\n", "Task:".bold(), report.input));

        match (&report.final_message, report.succeeded()) {
            (Some(message), true) => {
                output.push_str(message);
                output.push('\n');
            }
            (Some(message), false) => {
                output.push_str(&Self::status_line(report));
                output.push_str(&format!("\n\n{}\n{}\n", "Last contribution:".dimmed(), message));
            }
            (None, _) => {
                output.push_str(&Self::status_line(report));
                output.push('\n');
            }
        }

        output
    }

    /// One discussion entry, as printed live and in the full transcript
    pub fn format_entry(entry: &LogEntry) -> String {
        let label = format!("[{}] {}", entry.sequence, entry.role.display_name());
        match entry.kind {
            EntryKind::Contribution => format!(
                "\n{}\n{}",
                format!("── {} ──", label).yellow().bold(),
                strip_resolution(&entry.message)
            ),
            EntryKind::Failure => format!(
                "\n{}\nError: {}",
                format!("── {} (failed) ──", label).red().bold(),
                entry.message
            ),
            EntryKind::Cancellation => format!(
                "\n{}\n{}",
                format!("── {} (cancelled) ──", label).red().bold(),
                entry.message.dimmed()
            ),
        }
    }

    fn status_line(report: &DeliberationReport) -> String {
        match (report.status, &report.failure) {
            (TaskStatus::ConsensusReached, _) => {
                format!("{} consensus reached", "v".green().bold())
            }
            (_, Some(reason)) => format!("{} {}", "x".red().bold(), reason),
            (status, None) => format!("{} {}", "-".yellow(), status),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &DeliberationReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &DeliberationReport) -> String {
        Self::format_json(report)
    }

    fn format_final_only(&self, report: &DeliberationReport) -> String {
        Self::format_final_only(report)
    }
}
