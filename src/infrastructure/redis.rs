//! Redis connection management.
//!
//! One `Client` serves two purposes: a multiplexed `ConnectionManager`
//! for commands (storage, publishing), and dedicated pub/sub connections
//! opened per bus subscription.

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Open the Redis client used for pub/sub connections.
pub fn create_client(settings: &RedisSettings) -> Result<Client, redis::RedisError> {
    Client::open(settings.url.as_str())
}

/// Creates a Redis connection manager with automatic reconnection.
///
/// The connection manager handles multiplexing and automatic
/// reconnection when the connection is lost.
#[instrument(skip(client))]
pub async fn create_connection_manager(
    client: &Client,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let manager = ConnectionManager::new(client.clone()).await?;
    info!("Redis connection established");
    Ok(manager)
}
