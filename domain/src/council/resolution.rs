//! Synthesizer resolution marker parsing.
//!
//! The Synthesizer persona ends its answer with one line:
//!
//! ```text
//! RESOLUTION: CONSENSUS
//! ```
//!
//! or `RESOLUTION: OPEN`. Only the last marker line counts. Anything else
//! (no marker, unknown value) is [`Resolution::Ambiguous`], which the pipeline
//! treats as "no consensus".

use serde::{Deserialize, Serialize};

/// Marker prefix, matched case-insensitively at the start of a line
pub const RESOLUTION_PREFIX: &str = "RESOLUTION:";

/// Classification of a Synthesizer output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    Consensus,
    Open,
    Ambiguous,
}

impl Resolution {
    pub fn is_consensus(&self) -> bool {
        matches!(self, Resolution::Consensus)
    }
}

/// Classify a Synthesizer output by its resolution marker.
///
/// # Examples
///
/// ```
/// use council_domain::council::resolution::{parse_resolution, Resolution};
///
/// assert_eq!(parse_resolution("Plan A.\nRESOLUTION: CONSENSUS"), Resolution::Consensus);
/// assert_eq!(parse_resolution("Plan A.\nresolution: open"), Resolution::Open);
/// assert_eq!(parse_resolution("We mostly agree."), Resolution::Ambiguous);
/// ```
pub fn parse_resolution(output: &str) -> Resolution {
    let Some(value) = output.lines().rev().find_map(marker_value) else {
        return Resolution::Ambiguous;
    };

    match value.as_str() {
        "CONSENSUS" => Resolution::Consensus,
        "OPEN" => Resolution::Open,
        _ => Resolution::Ambiguous,
    }
}

/// Remove marker lines so observers see only the answer text.
pub fn strip_resolution(output: &str) -> String {
    output
        .lines()
        .filter(|line| marker_value(line).is_none())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

fn marker_value(line: &str) -> Option<String> {
    let trimmed = line.trim().trim_matches('*').trim();
    let head = trimmed.get(..RESOLUTION_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(RESOLUTION_PREFIX) {
        return None;
    }
    let value = trimmed[RESOLUTION_PREFIX.len()..]
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_uppercase();
    Some(value)
}
