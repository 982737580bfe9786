//! `send_report` action: writes a Markdown report to a directory.

use super::registry::ActionHandler;
use async_trait::async_trait;
use council_application::ports::action_executor::{ActionError, ActionRequest};
use council_domain::ActionResult;
use std::path::PathBuf;

pub const SEND_REPORT: &str = "send_report";

/// Writes one report file per confirmed message.
///
/// The file is named after the message id, so a redelivered confirmation
/// would overwrite rather than duplicate (the execution record prevents the
/// rerun in the first place).
pub struct ReportFileAction {
    dir: PathBuf,
}

impl ReportFileAction {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn render(request: &ActionRequest) -> String {
        let mut report = format!(
            "# Report for {}\n\n**Requested:** {}\n",
            request.user_id, request.question_text
        );
        if let Some(context) = &request.memory_context {
            report.push_str("\n## Known insights\n\n");
            report.push_str(context);
            report.push('\n');
        }
        report
    }
}

#[async_trait]
impl ActionHandler for ReportFileAction {
    fn name(&self) -> &str {
        SEND_REPORT
    }

    async fn run(&self, request: &ActionRequest) -> Result<ActionResult, ActionError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ActionError::Failed(format!("{}: {}", self.dir.display(), e)))?;

        let path = self
            .dir
            .join(format!("report-{}.md", request.message_id.as_str()));
        tokio::fs::write(&path, Self::render(request))
            .await
            .map_err(|e| ActionError::Failed(format!("{}: {}", path.display(), e)))?;

        Ok(ActionResult::new(format!("Report written to {}", path.display()))
            .with_items([format!("Report delivered for: {}", request.question_text)]))
    }
}
