//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use redis::aio::ConnectionManager;
use tokio::net::TcpListener;

use crate::config::Settings;
use crate::domain::ChannelBus;
use crate::infrastructure::repositories::RedisHistoryStore;
use crate::infrastructure::{bus::RedisBus, redis as redis_infra};
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::presentation::websocket::{
    ConnectionRegistry, InboundDispatcher, OutboundDeliverer, SubscriptionManager,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub redis: ConnectionManager,
    pub registry: Arc<ConnectionRegistry>,
    pub subscriptions: Arc<SubscriptionManager>,
    pub dispatcher: Arc<InboundDispatcher>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        // Redis serves both storage and the channel bus
        let client = redis_infra::create_client(&settings.redis)?;
        let redis = redis_infra::create_connection_manager(&client).await?;

        // Real-time core: registry -> deliverer -> subscriptions,
        // history + bus -> dispatcher
        let registry = Arc::new(ConnectionRegistry::new());
        let deliverer = Arc::new(OutboundDeliverer::new(registry.clone()));
        let bus: Arc<dyn ChannelBus> = Arc::new(RedisBus::new(client, redis.clone()));
        let subscriptions = Arc::new(SubscriptionManager::new(bus.clone(), deliverer));
        let history = Arc::new(RedisHistoryStore::new(redis.clone()));
        let dispatcher = Arc::new(InboundDispatcher::new(history, bus));

        // The broadcast channel is subscribed once per process, for the
        // process's entire lifetime.
        subscriptions.ensure_broadcast().await?;
        tracing::info!("Broadcast subscription established");

        crate::presentation::http::handlers::health::init_server_start();

        // Create app state
        let state = AppState {
            redis,
            registry,
            subscriptions,
            dispatcher,
            settings: Arc::new(settings.clone()),
        };

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        // Bind to address
        let addr: SocketAddr = settings.server_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
