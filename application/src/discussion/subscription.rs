//! Live discussion subscriptions.

use super::log_store::TaskLog;
use council_domain::{DiscussionSnapshot, DiscussionUpdate};
use futures::Stream;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// An observer's view of one task's discussion.
///
/// Yields a [`DiscussionUpdate::Snapshot`] first, then a
/// [`DiscussionUpdate::Delta`] per change. A subscriber that falls more than
/// the channel capacity behind receives a fresh snapshot instead of the
/// missed deltas. The subscription ends when the task's log is sealed (after
/// draining what was published), when it is cancelled, or when it is dropped.
pub struct DiscussionSubscription {
    log: Arc<TaskLog>,
    pending_snapshot: Option<DiscussionSnapshot>,
    rx: Option<broadcast::Receiver<DiscussionUpdate>>,
    cancel: CancellationToken,
}

impl DiscussionSubscription {
    pub(crate) fn open(log: Arc<TaskLog>) -> Self {
        let (snapshot, rx) = log.snapshot_and_subscribe();
        Self {
            log,
            pending_snapshot: Some(snapshot),
            rx,
            cancel: CancellationToken::new(),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the subscription; the next call to [`next`](Self::next) returns `None`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the next update. `None` means the subscription has ended.
    pub async fn next(&mut self) -> Option<DiscussionUpdate> {
        if self.cancel.is_cancelled() {
            return None;
        }
        if let Some(snapshot) = self.pending_snapshot.take() {
            return Some(DiscussionUpdate::Snapshot(snapshot));
        }

        let rx = self.rx.as_mut()?;
        let received = tokio::select! {
            _ = self.cancel.cancelled() => return None,
            received = rx.recv() => received,
        };

        match received {
            Ok(update) => Some(update),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Discussion subscriber lagged, resending snapshot");
                let (snapshot, rx) = self.log.snapshot_and_subscribe();
                self.rx = rx;
                Some(DiscussionUpdate::Snapshot(snapshot))
            }
            Err(RecvError::Closed) => {
                self.rx = None;
                None
            }
        }
    }

    /// Adapt into a [`Stream`] of updates
    pub fn into_stream(self) -> impl Stream<Item = DiscussionUpdate> + Send {
        futures::stream::unfold(self, |mut subscription| async move {
            subscription
                .next()
                .await
                .map(|update| (update, subscription))
        })
    }
}
