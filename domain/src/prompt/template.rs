//! Prompt templates for council stages

use crate::council::{EntryKind, LogEntry, Role, TaskInput};

/// Builds the prompt context handed to the reasoning capability
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt context for one stage.
    ///
    /// Carries the task input, the full ordered discussion so far and any
    /// memory insights. The role persona travels separately.
    pub fn stage_prompt(
        role: Role,
        input: &TaskInput,
        history: &[LogEntry],
        insights: Option<&str>,
    ) -> String {
        let mut prompt = format!(
            r#"Task from the user:

{}
"#,
            input.content()
        );

        if let Some(insights) = insights.filter(|s| !s.trim().is_empty()) {
            prompt.push_str(&format!("\nInsights from the memory bank:\n{}\n", insights));
        }

        if history.is_empty() {
            prompt.push_str("\nYou are the first council member to speak.\n");
        } else {
            prompt.push_str("\nDiscussion so far:\n");
            for entry in history {
                prompt.push_str(&Self::history_line(entry));
            }
        }

        prompt.push_str(&format!(
            "\nYou speak now as {}. {}",
            role.display_name(),
            Self::stage_instruction(role)
        ));

        prompt
    }

    fn history_line(entry: &LogEntry) -> String {
        let label = match entry.kind {
            EntryKind::Contribution => entry.role.display_name().to_string(),
            EntryKind::Failure => format!("{} (failed)", entry.role.display_name()),
            EntryKind::Cancellation => format!("{} (cancelled)", entry.role.display_name()),
        };
        format!("\n--- [{}] {} ---\n{}\n", entry.sequence, label, entry.message)
    }

    fn stage_instruction(role: Role) -> &'static str {
        match role {
            Role::InputProcessor => "Produce the problem statement.",
            Role::Architect => "Produce the plan.",
            Role::Critic => "Produce the critique.",
            Role::Synthesizer => "Produce the final answer and the RESOLUTION line.",
            Role::OutputGuard => "Return the approved final message.",
        }
    }
}
