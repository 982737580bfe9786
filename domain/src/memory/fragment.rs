//! Memory fragment value objects

use crate::council::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag for fragments produced by a successful action
pub const TAG_SUCCESS: &str = "success";
/// Tag for fragments produced by a triggered action
pub const TAG_ACTION: &str = "action";

/// Unique identifier of a memory fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentId(String);

impl FragmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FragmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who contributed a fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Contributor {
    /// A council role
    Council(Role),
    /// A triggered action, identified by its action reference
    Action(String),
}

impl std::fmt::Display for Contributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Contributor::Council(role) => write!(f, "{}", role),
            Contributor::Action(name) => write!(f, "action:{}", name),
        }
    }
}

/// A deduplicated knowledge item shared across roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryFragment {
    pub id: FragmentId,
    pub contributor: Contributor,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl MemoryFragment {
    pub fn new(contributor: Contributor, content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            id: FragmentId::generate(),
            contributor,
            content: content.into(),
            timestamp: Utc::now(),
            tags,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
