//! Redis implementation of the channel bus.
//!
//! Publishing goes through the shared multiplexed connection. Each
//! subscription gets its own dedicated pub/sub connection, pumped into an
//! unbounded channel; pub/sub cannot share a multiplexed connection.

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::ConnectionManager;
use redis::Client;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::bus::{BusStream, ChannelBus};
use crate::domain::topic::Topic;
use crate::shared::error::AppError;

/// Channel bus backed by Redis pub/sub.
pub struct RedisBus {
    client: Client,
    conn: ConnectionManager,
}

impl RedisBus {
    pub fn new(client: Client, conn: ConnectionManager) -> Self {
        Self { client, conn }
    }
}

#[async_trait]
impl ChannelBus for RedisBus {
    async fn publish(&self, topic: &Topic, payload: &str) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let receivers: i64 = redis::cmd("PUBLISH")
            .arg(topic.channel())
            .arg(payload)
            .query_async(&mut conn)
            .await?;
        debug!(topic = %topic, receivers, "published to bus");
        Ok(())
    }

    async fn subscribe(&self, topic: &Topic) -> Result<BusStream, AppError> {
        let channel = topic.channel();
        let mut pubsub = self.client.get_async_pubsub().await?;
        pubsub.subscribe(&channel).await?;

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let messages = pubsub.into_on_message();
            futures::pin_mut!(messages);
            while let Some(msg) = messages.next().await {
                let payload: String = match msg.get_payload() {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!(channel = %channel, error = %e, "unreadable bus payload, skipping");
                        continue;
                    }
                };
                if tx.send(payload).is_err() {
                    // Subscriber side dropped; stop pumping.
                    break;
                }
            }
            debug!(channel = %channel, "pub/sub connection closed");
        });

        Ok(BusStream::new(rx))
    }
}
