//! Webhook notification dispatcher

use async_trait::async_trait;
use council_application::ports::notifier::{NotificationDispatcher, NotificationError};
use council_domain::{UserId, truncate};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    user_id: &'a str,
    title: &'a str,
    body: &'a str,
}

/// Posts each notification as JSON (`{user_id, title, body}`) to a fixed URL.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookNotifier {
    async fn send(
        &self,
        user_id: &UserId,
        title: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        let payload = WebhookPayload {
            user_id: user_id.as_str(),
            title,
            body,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NotificationError::DeliveryFailed(format!(
                "HTTP {}: {}",
                status,
                truncate(&text, 200)
            )));
        }
        debug!(user_id = %user_id, "Webhook notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = WebhookPayload {
            user_id: "u1",
            title: "send_report completed",
            body: "Report written",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["title"], "send_report completed");
        assert_eq!(json["body"], "Report written");
    }

    #[tokio::test]
    async fn test_unreachable_url_is_delivery_failure() {
        let notifier = WebhookNotifier::new("http://127.0.0.1:9/hook");
        let err = notifier
            .send(&UserId::new("u1"), "t", "b")
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::DeliveryFailed(_)));
    }
}
