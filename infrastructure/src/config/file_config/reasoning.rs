//! Reasoning backend configuration from TOML (`[reasoning]` section)
//!
//! The backend is any OpenAI-compatible chat completions endpoint. Each
//! council role can be routed to its own model:
//!
//! ```toml
//! [reasoning]
//! endpoint = "https://api.openai.com/v1/chat/completions"
//! api_key_env = "OPENAI_API_KEY"
//! default_model = "gpt-4o-mini"
//!
//! [reasoning.roles]
//! architect = "gemini-1.5-pro"
//! synthesizer = "gemini-1.5-pro"
//! critic = "gpt-4o"
//! ```

use super::{ConfigIssue, ConfigValidationError, Severity};
use council_domain::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReasoningConfig {
    /// Chat completions URL
    pub endpoint: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Model for roles without an override
    pub default_model: String,
    /// Per-role model overrides, keyed by role name
    pub roles: BTreeMap<String, String>,
    /// Sampling temperature passed to the backend
    pub temperature: Option<f32>,
}

impl Default for FileReasoningConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            roles: BTreeMap::new(),
            temperature: None,
        }
    }
}

impl FileReasoningConfig {
    /// Resolve role overrides, returning the valid ones and issues for the rest.
    pub fn parse_roles(&self) -> (Vec<(Role, String)>, Vec<ConfigIssue>) {
        let mut routes = Vec::new();
        let mut issues = Vec::new();
        for (name, model) in &self.roles {
            match name.parse::<Role>() {
                Ok(role) if !model.trim().is_empty() => routes.push((role, model.trim().to_string())),
                Ok(_) => issues.push(ConfigIssue::new(
                    Severity::Error,
                    ConfigValidationError::EmptyModelName(format!("reasoning.roles.{}", name)),
                )),
                Err(_) => issues.push(ConfigIssue::new(
                    Severity::Warning,
                    ConfigValidationError::UnknownRole(name.clone()),
                )),
            }
        }
        (routes, issues)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_roles().1;
        if self.default_model.trim().is_empty() {
            issues.push(ConfigIssue::new(
                Severity::Error,
                ConfigValidationError::EmptyModelName("reasoning.default_model".to_string()),
            ));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            issues.push(ConfigIssue::new(
                Severity::Error,
                ConfigValidationError::InvalidUrl {
                    field: "reasoning.endpoint".to_string(),
                    value: self.endpoint.clone(),
                },
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_routing_deserialize() {
        let toml_str = r#"
[reasoning]
default_model = "gpt-4o-mini"

[reasoning.roles]
architect = "gemini-1.5-pro"
critic = "gpt-4o"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let (routes, issues) = config.reasoning.parse_roles();
        assert!(issues.is_empty());
        assert!(routes.contains(&(Role::Architect, "gemini-1.5-pro".to_string())));
        assert!(routes.contains(&(Role::Critic, "gpt-4o".to_string())));
        assert_eq!(config.reasoning.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_unknown_role_and_empty_model() {
        let mut config = FileReasoningConfig::default();
        config.roles.insert("oracle".into(), "gpt-4o".into());
        config.roles.insert("critic".into(), " ".into());

        let (routes, issues) = config.parse_roles();
        assert!(routes.is_empty());
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| matches!(
            &i.error,
            ConfigValidationError::UnknownRole(name) if name == "oracle"
        )));
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = FileReasoningConfig {
            endpoint: "localhost:8080".into(),
            ..Default::default()
        };
        assert!(config.validate().iter().any(|i| matches!(
            i.error,
            ConfigValidationError::InvalidUrl { .. }
        )));
    }
}
