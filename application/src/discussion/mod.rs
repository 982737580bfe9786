//! Live discussion logs
//!
//! [`DiscussionLogStore`] owns the append-only log of every task and fans
//! changes out to [`DiscussionSubscription`]s.

mod log_store;
mod subscription;

pub use log_store::{DEFAULT_CHANNEL_CAPACITY, DiscussionError, DiscussionLogStore};
pub use subscription::DiscussionSubscription;
