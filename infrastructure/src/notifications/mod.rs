//! Notification dispatchers

mod tracing_notifier;
mod webhook;

use crate::config::FileNotificationsConfig;
use council_application::ports::notifier::NotificationDispatcher;
use std::sync::Arc;

pub use tracing_notifier::TracingNotifier;
pub use webhook::WebhookNotifier;

/// Webhook dispatcher when a URL is configured, log-only otherwise
pub fn dispatcher_from_config(config: &FileNotificationsConfig) -> Arc<dyn NotificationDispatcher> {
    match config.webhook_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Arc::new(WebhookNotifier::new(url)),
        _ => Arc::new(TracingNotifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::UserId;

    #[tokio::test]
    async fn test_blank_webhook_falls_back_to_tracing() {
        let config = FileNotificationsConfig {
            webhook_url: Some("  ".into()),
        };
        let dispatcher = dispatcher_from_config(&config);
        assert!(dispatcher.send(&UserId::new("u1"), "t", "b").await.is_ok());
    }
}
