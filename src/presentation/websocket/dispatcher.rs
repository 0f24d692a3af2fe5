//! Inbound Dispatcher
//!
//! Takes one valid envelope read off a client socket, persists it, and
//! republishes it onto the bus so every subscribed instance (including
//! this one) can forward it. The two steps are independent best-effort
//! operations with no transactional coupling.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    BroadcastMessage, ChannelBus, DirectMessage, Envelope, GroupMessage, HistoryStore,
};
use crate::infrastructure::metrics;

/// Socket-to-bus pipeline for client-submitted messages.
pub struct InboundDispatcher {
    history: Arc<dyn HistoryStore>,
    bus: Arc<dyn ChannelBus>,
}

impl InboundDispatcher {
    pub fn new(history: Arc<dyn HistoryStore>, bus: Arc<dyn ChannelBus>) -> Self {
        Self { history, bus }
    }

    /// Persist and publish one envelope.
    ///
    /// The envelope is timestamped here, at acceptance; the stored record
    /// carries the timestamp, the republished envelope does not. A
    /// failure in either step is logged and does not affect the other.
    pub async fn dispatch(&self, envelope: &Envelope) {
        let now = Utc::now();
        let key = envelope.history_key();

        let record = match envelope {
            Envelope::Dm { from, to, content } => serde_json::to_string(&DirectMessage {
                from: from.clone(),
                to: to.clone(),
                content: content.clone(),
                timestamp: now,
            }),
            Envelope::Group { from, to, content } => serde_json::to_string(&GroupMessage {
                from: from.clone(),
                group: to.clone(),
                content: content.clone(),
                timestamp: now,
            }),
            Envelope::Broadcast { from, content } => serde_json::to_string(&BroadcastMessage {
                from: from.clone(),
                content: content.clone(),
                timestamp: now,
            }),
        };

        match record {
            Ok(record) => {
                if let Err(e) = self.history.append(&key, &record).await {
                    tracing::warn!(key = %key, error = %e, "History append failed");
                }
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize history record");
            }
        }

        // Publish regardless of the persistence outcome.
        match serde_json::to_string(envelope) {
            Ok(payload) => {
                let topic = envelope.topic();
                if let Err(e) = self.bus.publish(&topic, &payload).await {
                    tracing::warn!(topic = %topic, error = %e, "Bus publish failed");
                } else {
                    metrics::MESSAGES_PUBLISHED_TOTAL
                        .with_label_values(&[envelope.kind()])
                        .inc();
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize envelope for publish");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bus::MockChannelBus;
    use crate::domain::repositories::MockHistoryStore;
    use crate::shared::error::AppError;

    fn dm() -> Envelope {
        Envelope::Dm {
            from: "alice".into(),
            to: "bob".into(),
            content: "hi".into(),
        }
    }

    #[tokio::test]
    async fn dispatch_persists_then_publishes() {
        let mut history = MockHistoryStore::new();
        history
            .expect_append()
            .times(1)
            .withf(|key, entry| {
                key == "dm:alice:bob"
                    && entry.contains("\"content\":\"hi\"")
                    && entry.contains("timestamp")
            })
            .returning(|_, _| Ok(()));

        let mut bus = MockChannelBus::new();
        bus.expect_publish()
            .times(1)
            .withf(|topic, payload| {
                topic.channel() == "user:bob" && !payload.contains("timestamp")
            })
            .returning(|_, _| Ok(()));

        let dispatcher = InboundDispatcher::new(Arc::new(history), Arc::new(bus));
        dispatcher.dispatch(&dm()).await;
    }

    #[tokio::test]
    async fn persistence_failure_does_not_suppress_publish() {
        let mut history = MockHistoryStore::new();
        history
            .expect_append()
            .times(1)
            .returning(|_, _| Err(AppError::Internal("append failed".into())));

        let mut bus = MockChannelBus::new();
        bus.expect_publish().times(1).returning(|_, _| Ok(()));

        let dispatcher = InboundDispatcher::new(Arc::new(history), Arc::new(bus));
        dispatcher.dispatch(&dm()).await;
    }

    #[tokio::test]
    async fn publish_failure_does_not_suppress_persistence() {
        let mut history = MockHistoryStore::new();
        history.expect_append().times(1).returning(|_, _| Ok(()));

        let mut bus = MockChannelBus::new();
        bus.expect_publish()
            .times(1)
            .returning(|_, _| Err(AppError::Internal("bus down".into())));

        let dispatcher = InboundDispatcher::new(Arc::new(history), Arc::new(bus));
        dispatcher.dispatch(&dm()).await;
    }

    #[tokio::test]
    async fn group_and_broadcast_use_their_topics() {
        let mut history = MockHistoryStore::new();
        history.expect_append().times(2).returning(|_, _| Ok(()));

        let mut bus = MockChannelBus::new();
        bus.expect_publish()
            .times(1)
            .withf(|topic, _| topic.channel() == "group:rustaceans")
            .returning(|_, _| Ok(()));
        bus.expect_publish()
            .times(1)
            .withf(|topic, _| topic.channel() == "broadcast")
            .returning(|_, _| Ok(()));

        let dispatcher = InboundDispatcher::new(Arc::new(history), Arc::new(bus));
        dispatcher
            .dispatch(&Envelope::Group {
                from: "alice".into(),
                to: "rustaceans".into(),
                content: "hi".into(),
            })
            .await;
        dispatcher
            .dispatch(&Envelope::Broadcast {
                from: "carol".into(),
                content: "hey all".into(),
            })
            .await;
    }
}
