//! Channel bus port.
//!
//! The publish/subscribe substrate shared by all server processes. The
//! production implementation rides on Redis pub/sub; tests substitute an
//! in-memory bus behind the same trait.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::topic::Topic;
use crate::shared::error::AppError;

/// Publish/subscribe access to the process-external message bus.
///
/// Delivery is at-most-once per subscription; within one topic the bus
/// preserves publish order to each subscriber. Nothing is guaranteed
/// across topics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelBus: Send + Sync {
    /// Publish a payload on a topic. Fire-and-forget from the caller's
    /// perspective; subscribers on other processes pick it up.
    async fn publish(&self, topic: &Topic, payload: &str) -> Result<(), AppError>;

    /// Open a long-lived subscription to a topic.
    ///
    /// The returned stream yields payloads until the underlying bus
    /// connection fails; it is never closed by this design except at
    /// process shutdown.
    async fn subscribe(&self, topic: &Topic) -> Result<BusStream, AppError>;
}

/// An open read cursor into one bus topic.
pub struct BusStream {
    rx: mpsc::UnboundedReceiver<String>,
}

impl BusStream {
    pub fn new(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self { rx }
    }

    /// Await the next payload. `None` means the bus side of the stream is
    /// gone and no further messages will arrive on this subscription.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}
