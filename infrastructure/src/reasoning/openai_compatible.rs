//! OpenAI-compatible chat completions adapter.
//!
//! Works with any backend that speaks the `/v1/chat/completions` protocol
//! (OpenAI, Azure-style proxies, Ollama, vLLM, ...). The role persona is
//! sent as the system message and the stage prompt as the user message.

use super::routing::RoleModelRouter;
use crate::config::FileReasoningConfig;
use async_trait::async_trait;
use council_application::ports::reasoning::{ReasoningCapability, ReasoningError};
use council_domain::{Role, truncate};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Reasoning capability backed by an HTTP chat completions endpoint
pub struct OpenAiCompatibleReasoning {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    router: RoleModelRouter,
    temperature: Option<f32>,
}

impl OpenAiCompatibleReasoning {
    pub fn new(endpoint: impl Into<String>, router: RoleModelRouter) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: None,
            router,
            temperature: None,
        }
    }

    /// Build from the `[reasoning]` section, reading the key from `api_key_env`.
    ///
    /// A missing key is not an error: local backends usually need none.
    pub fn from_config(config: &FileReasoningConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            debug!("{} not set, calling {} without credentials", config.api_key_env, config.endpoint);
        }
        let mut adapter = Self::new(&config.endpoint, RoleModelRouter::from_config(config));
        adapter.api_key = api_key;
        adapter.temperature = config.temperature;
        adapter
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn router(&self) -> &RoleModelRouter {
        &self.router
    }

    fn build_request(&self, role: Role, persona: &str, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.router.model_for(role).to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: persona.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
        }
    }
}

fn extract_text(response: ChatCompletionResponse) -> Result<String, ReasoningError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or(ReasoningError::EmptyResponse)
}

#[async_trait]
impl ReasoningCapability for OpenAiCompatibleReasoning {
    async fn invoke(
        &self,
        role: Role,
        persona: &str,
        prompt: &str,
    ) -> Result<String, ReasoningError> {
        let body = self.build_request(role, persona, prompt);
        debug!(role = %role, model = %body.model, "Sending chat completion request");

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                ReasoningError::ConnectionError(e.to_string())
            } else if e.is_timeout() {
                ReasoningError::Timeout
            } else {
                ReasoningError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ReasoningError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                truncate(&text, 200)
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ReasoningError::Other(format!("Invalid response body: {}", e)))?;

        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> OpenAiCompatibleReasoning {
        OpenAiCompatibleReasoning::new(
            "http://localhost:11434/v1/chat/completions",
            RoleModelRouter::new("llama3").with_route(Role::Critic, "qwen2"),
        )
    }

    #[test]
    fn test_request_routes_model_and_sends_persona_as_system() {
        let request = adapter().build_request(Role::Critic, "You are the Critic.", "Task: X");
        assert_eq!(request.model, "qwen2");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "You are the Critic.");
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_temperature_is_serialized_when_set() {
        let request = adapter()
            .with_temperature(0.2)
            .build_request(Role::Architect, "p", "q");
        assert_eq!(request.model, "llama3");
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["temperature"].as_f64().is_some());
    }

    #[test]
    fn test_extract_text() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Plan A\nRESOLUTION: CONSENSUS"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            extract_text(response).unwrap(),
            "Plan A\nRESOLUTION: CONSENSUS"
        );
    }

    #[test]
    fn test_extract_text_rejects_empty_responses() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
        ] {
            let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
            assert!(matches!(
                extract_text(response),
                Err(ReasoningError::EmptyResponse)
            ));
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_error() {
        let adapter = OpenAiCompatibleReasoning::new(
            "http://127.0.0.1:9/v1/chat/completions",
            RoleModelRouter::new("llama3"),
        );
        let err = adapter
            .invoke(Role::Architect, "persona", "prompt")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReasoningError::ConnectionError(_) | ReasoningError::RequestFailed(_)
        ));
    }
}
