//! Notification dispatcher that writes to the diagnostic log

use async_trait::async_trait;
use council_application::ports::notifier::{NotificationDispatcher, NotificationError};
use council_domain::UserId;
use tracing::info;

/// Used when no webhook is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationDispatcher for TracingNotifier {
    async fn send(
        &self,
        user_id: &UserId,
        title: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        info!(user_id = %user_id, title, body, "Notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_delivers() {
        assert!(
            TracingNotifier
                .send(&UserId::new("u1"), "done", "ok")
                .await
                .is_ok()
        );
    }
}
