//! Role-to-model routing

use crate::config::FileReasoningConfig;
use council_domain::Role;
use std::collections::HashMap;

/// Picks the model for each council role.
///
/// Roles with an explicit override use it; every other role falls back to
/// the default model. This mirrors running different "brains" for
/// different roles: a large-context model for planning and synthesis, a
/// sharper one for critique.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleModelRouter {
    default_model: String,
    overrides: HashMap<Role, String>,
}

impl RoleModelRouter {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            default_model: default_model.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_route(mut self, role: Role, model: impl Into<String>) -> Self {
        self.overrides.insert(role, model.into());
        self
    }

    /// Build from the `[reasoning]` section. Invalid overrides are skipped;
    /// they are reported by `FileConfig::validate`.
    pub fn from_config(config: &FileReasoningConfig) -> Self {
        config
            .parse_roles()
            .0
            .into_iter()
            .fold(Self::new(config.default_model.clone()), |router, (role, model)| {
                router.with_route(role, model)
            })
    }

    pub fn model_for(&self, role: Role) -> &str {
        self.overrides
            .get(&role)
            .map(String::as_str)
            .unwrap_or(&self.default_model)
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_and_fallback() {
        let router = RoleModelRouter::new("gpt-4o-mini")
            .with_route(Role::Architect, "gemini-1.5-pro")
            .with_route(Role::Critic, "gpt-4o");

        assert_eq!(router.model_for(Role::Architect), "gemini-1.5-pro");
        assert_eq!(router.model_for(Role::Critic), "gpt-4o");
        assert_eq!(router.model_for(Role::OutputGuard), "gpt-4o-mini");
    }

    #[test]
    fn test_from_config_skips_unknown_roles() {
        let mut config = FileReasoningConfig {
            default_model: "llama3".into(),
            ..Default::default()
        };
        config.roles.insert("synthesizer".into(), "llama3:70b".into());
        config.roles.insert("oracle".into(), "gpt-4o".into());

        let router = RoleModelRouter::from_config(&config);
        assert_eq!(router.model_for(Role::Synthesizer), "llama3:70b");
        assert_eq!(router.model_for(Role::InputProcessor), "llama3");
        assert_eq!(router.default_model(), "llama3");
    }
}
