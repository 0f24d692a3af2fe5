//! Prometheus Metrics Module
//!
//! Application-wide metrics for the real-time delivery subsystem.
//!
//! # Metrics Collected
//! - Active WebSocket connection gauge
//! - Open bus subscription gauge
//! - Messages published to the bus, by kind
//! - Messages delivered to local sockets, by kind

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Active WebSocket connections gauge
pub static CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "websocket_connections_active",
            "Number of active WebSocket connections",
        )
        .namespace("chat_system"),
    )
    .expect("Failed to create CONNECTIONS_ACTIVE metric")
});

/// Open bus subscriptions gauge
pub static BUS_SUBSCRIPTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new(
            "bus_subscriptions_active",
            "Number of open channel bus subscriptions",
        )
        .namespace("chat_system"),
    )
    .expect("Failed to create BUS_SUBSCRIPTIONS_ACTIVE metric")
});

/// Messages published onto the bus, labeled by kind
pub static MESSAGES_PUBLISHED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "messages_published_total",
            "Total messages published onto the channel bus",
        )
        .namespace("chat_system"),
        &["kind"],
    )
    .expect("Failed to create MESSAGES_PUBLISHED_TOTAL metric")
});

/// Messages written to local sockets, labeled by kind
pub static MESSAGES_DELIVERED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "messages_delivered_total",
            "Total messages delivered to local WebSocket connections",
        )
        .namespace("chat_system"),
        &["kind"],
    )
    .expect("Failed to create MESSAGES_DELIVERED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(CONNECTIONS_ACTIVE.clone()))
        .expect("Failed to register CONNECTIONS_ACTIVE");
    registry
        .register(Box::new(BUS_SUBSCRIPTIONS_ACTIVE.clone()))
        .expect("Failed to register BUS_SUBSCRIPTIONS_ACTIVE");
    registry
        .register(Box::new(MESSAGES_PUBLISHED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_PUBLISHED_TOTAL");
    registry
        .register(Box::new(MESSAGES_DELIVERED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_DELIVERED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        // Force lazy initialization
        let _ = &*REGISTRY;
        let _ = &*CONNECTIONS_ACTIVE;
        let _ = &*BUS_SUBSCRIPTIONS_ACTIVE;
        let _ = &*MESSAGES_PUBLISHED_TOTAL;
        let _ = &*MESSAGES_DELIVERED_TOTAL;
    }

    #[test]
    fn test_gather_metrics() {
        MESSAGES_PUBLISHED_TOTAL.with_label_values(&["dm"]).inc();
        let metrics = gather_metrics();
        assert!(metrics.contains("messages_published_total"));
    }
}
