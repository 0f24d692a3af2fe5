//! Infrastructure Layer
//!
//! External-service implementations: Redis connections, the pub/sub
//! channel bus, repositories, and metrics.

pub mod bus;
pub mod metrics;
pub mod redis;
pub mod repositories;

pub use bus::RedisBus;
