//! Output formatter trait

use super::report::DeliberationReport;
use council_domain::OutputFormat;

/// Trait for formatting deliberation results
pub trait OutputFormatter {
    /// Format the full transcript
    fn format(&self, report: &DeliberationReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &DeliberationReport) -> String;

    /// Format the final message only (concise output)
    fn format_final_only(&self, report: &DeliberationReport) -> String;

    fn render(&self, report: &DeliberationReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(report),
            OutputFormat::Final => self.format_final_only(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
