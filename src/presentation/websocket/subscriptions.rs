//! Subscription Manager
//!
//! Opens and tracks long-lived bus subscriptions: one per topic per
//! process, created the first time a topic is needed and never torn
//! down afterwards.

use std::sync::Arc;

use dashmap::DashSet;

use crate::domain::{ChannelBus, Envelope, Topic};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

use super::deliverer::OutboundDeliverer;

/// Tracker of open bus subscriptions for this process.
pub struct SubscriptionManager {
    bus: Arc<dyn ChannelBus>,
    deliverer: Arc<OutboundDeliverer>,
    /// Channel names with a running listener. Entries are only ever
    /// added; a subscription outlives every connection that needed it.
    active: DashSet<String>,
}

impl SubscriptionManager {
    pub fn new(bus: Arc<dyn ChannelBus>, deliverer: Arc<OutboundDeliverer>) -> Self {
        Self {
            bus,
            deliverer,
            active: DashSet::new(),
        }
    }

    /// Make sure a listener is running for the topic.
    ///
    /// The first call for a topic opens the bus subscription and spawns
    /// the listener task; later calls are no-ops. The listener blocks on
    /// the bus, hands each decoded envelope to the deliverer, and only
    /// exits when the bus stream itself ends; that end is logged and not
    /// retried.
    pub async fn ensure(&self, topic: Topic) -> Result<(), AppError> {
        let channel = topic.channel();
        if !self.active.insert(channel.clone()) {
            return Ok(());
        }

        let mut stream = match self.bus.subscribe(&topic).await {
            Ok(stream) => stream,
            Err(e) => {
                // Leave no stale entry behind so a later connect retries.
                self.active.remove(&channel);
                return Err(e);
            }
        };

        let deliverer = self.deliverer.clone();
        tokio::spawn(async move {
            tracing::info!(topic = %channel, "Bus subscription opened");
            metrics::BUS_SUBSCRIPTIONS_ACTIVE.inc();

            while let Some(payload) = stream.recv().await {
                match serde_json::from_str::<Envelope>(&payload) {
                    Ok(envelope) => deliverer.deliver(envelope),
                    Err(e) => {
                        // One bad payload must not starve the topic.
                        tracing::warn!(
                            topic = %channel,
                            error = %e,
                            "Discarding malformed bus payload"
                        );
                    }
                }
            }

            metrics::BUS_SUBSCRIPTIONS_ACTIVE.dec();
            tracing::warn!(topic = %channel, "Bus subscription ended; delivery on this topic is halted");
        });

        Ok(())
    }

    /// Subscriptions a connecting user needs: the personal channel plus
    /// every group in the membership set fetched at connect time.
    pub async fn ensure_for_user(&self, user: &str, groups: &[String]) {
        if let Err(e) = self.ensure(Topic::User(user.to_string())).await {
            tracing::warn!(user = %user, error = %e, "Failed to open personal subscription");
        }
        for group in groups {
            if let Err(e) = self.ensure(Topic::Group(group.clone())).await {
                tracing::warn!(group = %group, error = %e, "Failed to open group subscription");
            }
        }
    }

    /// The process-wide broadcast subscription, established once at
    /// startup, independent of any individual connection.
    pub async fn ensure_broadcast(&self) -> Result<(), AppError> {
        self.ensure(Topic::Broadcast).await
    }

    /// Number of open subscriptions (diagnostics only).
    pub fn open_count(&self) -> usize {
        self.active.len()
    }
}
