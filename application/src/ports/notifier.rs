//! Notification dispatcher port
//!
//! Delivers push notifications about executed actions to a user.

use async_trait::async_trait;
use council_domain::UserId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("No delivery target for user {0}")]
    NoRecipient(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Sends a titled notification to a user.
///
/// Callers treat delivery as best effort: an error is logged and never
/// undoes the action it reports on.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send(&self, user_id: &UserId, title: &str, body: &str)
    -> Result<(), NotificationError>;
}

/// Dispatcher that drops every notification
pub struct NoNotifications;

#[async_trait]
impl NotificationDispatcher for NoNotifications {
    async fn send(
        &self,
        _user_id: &UserId,
        _title: &str,
        _body: &str,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}
