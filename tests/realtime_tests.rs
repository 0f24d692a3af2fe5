//! Real-time delivery integration tests
//!
//! Drive the registry, subscription manager, inbound dispatcher, and
//! outbound deliverer end-to-end over an in-memory channel bus, the
//! same wiring `startup` builds, minus Redis.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::timeout;
use uuid::Uuid;

use chat_system::domain::{ChannelBus, Envelope, Topic};
use chat_system::presentation::websocket::{
    Connection, ConnectionRegistry, InboundDispatcher, OutboundDeliverer, SubscriptionManager,
};
use common::{MemoryBus, MemoryHistory};

struct Harness {
    registry: Arc<ConnectionRegistry>,
    subscriptions: Arc<SubscriptionManager>,
    dispatcher: InboundDispatcher,
    bus: Arc<MemoryBus>,
    history: Arc<MemoryHistory>,
}

fn harness() -> Harness {
    let registry = Arc::new(ConnectionRegistry::new());
    let deliverer = Arc::new(OutboundDeliverer::new(registry.clone()));
    let bus = Arc::new(MemoryBus::new());
    let history = Arc::new(MemoryHistory::new());
    let subscriptions = Arc::new(SubscriptionManager::new(bus.clone(), deliverer));
    let dispatcher = InboundDispatcher::new(history.clone(), bus.clone());
    Harness {
        registry,
        subscriptions,
        dispatcher,
        bus,
        history,
    }
}

/// Register a connection the way the WebSocket handler does: open the
/// needed subscriptions, then record the connection.
async fn connect(harness: &Harness, user: &str, groups: &[&str]) -> UnboundedReceiver<Envelope> {
    let groups: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
    harness.subscriptions.ensure_for_user(user, &groups).await;
    let (tx, rx) = mpsc::unbounded_channel();
    harness
        .registry
        .register(Connection::new(user.to_string(), Uuid::new_v4(), groups, tx));
    rx
}

async fn recv(rx: &mut UnboundedReceiver<Envelope>) -> Envelope {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for delivery")
        .expect("connection channel closed")
}

fn dm(from: &str, to: &str, content: &str) -> Envelope {
    Envelope::Dm {
        from: from.into(),
        to: to.into(),
        content: content.into(),
    }
}

#[tokio::test]
async fn dm_reaches_a_local_recipient_and_is_persisted_once() {
    let harness = harness();
    let mut alice = connect(&harness, "alice", &[]).await;
    let mut bob = connect(&harness, "bob", &[]).await;

    let envelope = dm("alice", "bob", "hi");
    harness.dispatcher.dispatch(&envelope).await;

    assert_eq!(recv(&mut bob).await, envelope);
    assert!(alice.try_recv().is_err());

    let entries = harness.history.entries("dm:alice:bob");
    assert_eq!(entries.len(), 1);
    assert!(entries[0].contains("\"content\":\"hi\""));
    assert!(entries[0].contains("timestamp"));
}

#[tokio::test]
async fn dm_for_a_user_on_another_instance_rides_the_bus() {
    let harness = harness();
    // No local connection for bob; another instance's subscriber listens
    // on his personal topic.
    let mut remote = harness
        .bus
        .subscribe(&Topic::User("bob".into()))
        .await
        .unwrap();

    let envelope = dm("alice", "bob", "hi");
    harness.dispatcher.dispatch(&envelope).await;

    let payload = timeout(Duration::from_secs(1), remote.recv())
        .await
        .expect("timed out")
        .expect("bus stream closed");
    let received: Envelope = serde_json::from_str(&payload).unwrap();
    assert_eq!(received, envelope);
}

#[tokio::test]
async fn both_directions_of_a_conversation_share_one_history_key() {
    let harness = harness();
    let mut alice = connect(&harness, "alice", &[]).await;
    let mut bob = connect(&harness, "bob", &[]).await;

    harness.dispatcher.dispatch(&dm("alice", "bob", "hi")).await;
    harness
        .dispatcher
        .dispatch(&dm("bob", "alice", "hello"))
        .await;

    recv(&mut bob).await;
    recv(&mut alice).await;

    let entries = harness.history.entries("dm:alice:bob");
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn broadcast_reaches_everyone_but_the_sender() {
    let harness = harness();
    harness.subscriptions.ensure_broadcast().await.unwrap();

    let mut alice = connect(&harness, "alice", &[]).await;
    let mut bob = connect(&harness, "bob", &[]).await;
    let mut carol = connect(&harness, "carol", &[]).await;

    let envelope = Envelope::Broadcast {
        from: "carol".into(),
        content: "hey all".into(),
    };
    harness.dispatcher.dispatch(&envelope).await;

    assert_eq!(recv(&mut alice).await, envelope);
    assert_eq!(recv(&mut bob).await, envelope);
    // Delivery to the others already happened in the same fanout pass;
    // nothing was queued for the sender.
    assert!(carol.try_recv().is_err());

    let entries = harness.history.entries("broadcast:messages");
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn group_messages_reach_connected_members_only() {
    let harness = harness();
    let mut alice = connect(&harness, "alice", &["rustaceans"]).await;
    let mut bob = connect(&harness, "bob", &["rustaceans", "ops"]).await;
    let mut carol = connect(&harness, "carol", &["ops"]).await;

    let envelope = Envelope::Group {
        from: "alice".into(),
        to: "rustaceans".into(),
        content: "meeting at noon".into(),
    };
    harness.dispatcher.dispatch(&envelope).await;

    assert_eq!(recv(&mut alice).await, envelope);
    assert_eq!(recv(&mut bob).await, envelope);
    assert!(carol.try_recv().is_err());

    let entries = harness.history.entries("group:rustaceans:messages");
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn a_malformed_bus_payload_does_not_kill_the_subscription() {
    let harness = harness();
    let mut bob = connect(&harness, "bob", &[]).await;

    // Garbage straight onto bob's personal topic, as a buggy producer
    // would publish it.
    harness
        .bus
        .publish(&Topic::User("bob".into()), "{not json")
        .await
        .unwrap();
    harness
        .bus
        .publish(
            &Topic::User("bob".into()),
            r#"{"type":"carrier-pigeon","from":"x","to":"bob","content":"?"}"#,
        )
        .await
        .unwrap();

    let envelope = dm("alice", "bob", "still here");
    harness.dispatcher.dispatch(&envelope).await;

    assert_eq!(recv(&mut bob).await, envelope);
}

#[tokio::test]
async fn reconnecting_does_not_duplicate_subscriptions_or_deliveries() {
    let harness = harness();
    let _first = connect(&harness, "alice", &[]).await;
    let mut second = connect(&harness, "alice", &[]).await;

    // Same topic, one listener.
    assert_eq!(harness.subscriptions.open_count(), 1);
    assert_eq!(harness.registry.len(), 1);

    let envelope = dm("bob", "alice", "hi");
    harness.dispatcher.dispatch(&envelope).await;

    assert_eq!(recv(&mut second).await, envelope);
    assert!(second.try_recv().is_err());
}

#[tokio::test]
async fn unregister_is_idempotent_end_to_end() {
    let harness = harness();
    let _rx = connect(&harness, "alice", &[]).await;
    let id = harness.registry.lookup_local("alice").unwrap().id();

    harness.registry.unregister("alice", id);
    let after_first = harness.registry.len();
    harness.registry.unregister("alice", id);

    assert_eq!(after_first, 0);
    assert_eq!(harness.registry.len(), 0);

    // A dm for alice now falls on the floor locally without error.
    harness.dispatcher.dispatch(&dm("bob", "alice", "gone")).await;
}
