//! Common Test Utilities
//!
//! In-memory stand-ins for the external collaborators, behind the same
//! traits the production code uses, so the real-time core can be driven
//! end-to-end without a Redis instance.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use chat_system::domain::bus::{BusStream, ChannelBus};
use chat_system::domain::repositories::HistoryStore;
use chat_system::domain::topic::Topic;
use chat_system::shared::error::AppError;

/// In-memory channel bus: every subscriber to a topic gets its own
/// unbounded stream, publishes fan out to all of them in order.
#[derive(Default)]
pub struct MemoryBus {
    topics: Mutex<HashMap<String, Vec<mpsc::UnboundedSender<String>>>>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChannelBus for MemoryBus {
    async fn publish(&self, topic: &Topic, payload: &str) -> Result<(), AppError> {
        let mut topics = self.topics.lock().unwrap();
        if let Some(subscribers) = topics.get_mut(&topic.channel()) {
            subscribers.retain(|tx| tx.send(payload.to_string()).is_ok());
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &Topic) -> Result<BusStream, AppError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.topics
            .lock()
            .unwrap()
            .entry(topic.channel())
            .or_default()
            .push(tx);
        Ok(BusStream::new(rx))
    }
}

/// In-memory append-only history store.
#[derive(Default)]
pub struct MemoryHistory {
    lists: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries currently stored under a key.
    pub fn entries(&self, key: &str) -> Vec<String> {
        self.lists
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn append(&self, key: &str, entry: &str) -> Result<(), AppError> {
        self.lists
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push(entry.to_string());
        Ok(())
    }

    async fn range(&self, key: &str) -> Result<Vec<String>, AppError> {
        Ok(self.entries(key))
    }
}
