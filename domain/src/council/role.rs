//! Council roles
//!
//! The deliberation pipeline is a fixed, ordered list of reasoning roles.
//! Adding a role is an enum change plus an entry in [`Role::PIPELINE`].

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A reasoning role participating in a deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Restates the raw task as a clear problem statement
    InputProcessor,
    /// Breaks the problem down into a concrete plan
    Architect,
    /// Looks for gaps, risks and wrong assumptions in the plan
    Critic,
    /// Merges everything into one answer and declares the resolution
    Synthesizer,
    /// Final safety pass over the synthesized answer
    OutputGuard,
}

impl Role {
    /// The stage order driven by the orchestrator.
    pub const PIPELINE: [Role; 5] = [
        Role::InputProcessor,
        Role::Architect,
        Role::Critic,
        Role::Synthesizer,
        Role::OutputGuard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::InputProcessor => "input_processor",
            Role::Architect => "architect",
            Role::Critic => "critic",
            Role::Synthesizer => "synthesizer",
            Role::OutputGuard => "output_guard",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::InputProcessor => "Input Processor",
            Role::Architect => "The Architect",
            Role::Critic => "The Critic",
            Role::Synthesizer => "The Synthesizer",
            Role::OutputGuard => "Output Guard",
        }
    }

    /// Position of this role in [`Role::PIPELINE`]
    pub fn stage_index(&self) -> usize {
        match self {
            Role::InputProcessor => 0,
            Role::Architect => 1,
            Role::Critic => 2,
            Role::Synthesizer => 3,
            Role::OutputGuard => 4,
        }
    }

    /// Fixed persona handed to the reasoning capability for this role.
    pub fn persona(&self) -> &'static str {
        match self {
            Role::InputProcessor => {
                r#"You are the Input Processor of a deliberation council.
Restate the user's request as a precise problem statement.
List the explicit requirements, the implicit constraints and any ambiguity
the other council members must keep in mind. Do not solve the task."#
            }
            Role::Architect => {
                r#"You are The Architect of a deliberation council.
Using the problem statement and everything said so far, design a plan.
Break the work into at most five concrete steps and explain how they
fit together. Prefer simple designs over clever ones."#
            }
            Role::Critic => {
                r#"You are The Critic of a deliberation council.
Review the plan for missing facts, risks and wrong assumptions.
Be brief and specific. If the plan is sound, say so plainly."#
            }
            Role::Synthesizer => {
                r#"You are The Synthesizer of a deliberation council.
Merge the problem statement, the plan and the critique into one final answer
for the user. Resolve disagreements explicitly.

End your answer with exactly one line of the form:
RESOLUTION: CONSENSUS
if the council agrees on the answer, or
RESOLUTION: OPEN
if important disagreements remain."#
            }
            Role::OutputGuard => {
                r#"You are the Output Guard of a deliberation council.
Check the synthesized answer for unsafe, private or fabricated content.
Return the approved final message, removing anything that must not be sent.
Do not add new content."#
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "input_processor" | "input" => Ok(Role::InputProcessor),
            "architect" => Ok(Role::Architect),
            "critic" => Ok(Role::Critic),
            "synthesizer" => Ok(Role::Synthesizer),
            "output_guard" | "guard" => Ok(Role::OutputGuard),
            _ => Err(DomainError::UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order_matches_stage_index() {
        for (index, role) in Role::PIPELINE.iter().enumerate() {
            assert_eq!(role.stage_index(), index);
        }
    }

    #[test]
    fn test_parse_role() {
        assert_eq!("critic".parse::<Role>().unwrap(), Role::Critic);
        assert_eq!("Output-Guard".parse::<Role>().unwrap(), Role::OutputGuard);
        assert_eq!(
            "input processor".parse::<Role>().unwrap(),
            Role::InputProcessor
        );
        assert!(matches!(
            "moderator".parse::<Role>(),
            Err(DomainError::UnknownRole(name)) if name == "moderator"
        ));
    }

    #[test]
    fn test_as_str_round_trips_through_from_str() {
        for role in Role::PIPELINE {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_synthesizer_persona_declares_marker_contract() {
        assert!(Role::Synthesizer.persona().contains("RESOLUTION: CONSENSUS"));
        assert!(Role::Synthesizer.persona().contains("RESOLUTION: OPEN"));
    }
}
