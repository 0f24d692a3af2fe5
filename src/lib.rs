//! # Chat System Library
//!
//! This crate provides a multi-user chat backend with:
//! - RESTful HTTP API for accounts, groups, and message history
//! - WebSocket push for real-time delivery
//! - Redis for storage and for the pub/sub channel bus that fans
//!   messages out across server instances
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core types (envelope, topics, records) and ports
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Redis storage, bus, and metrics
//! - **Presentation Layer**: HTTP handlers and the WebSocket subsystem
//!
//! ## Module Structure
//!
//! ```text
//! chat_system/
//! +-- config/        Configuration management
//! +-- domain/        Core types, ports, and key derivation
//! +-- application/   Application services and DTOs
//! +-- infrastructure/ Redis, channel bus, and metrics
//! +-- presentation/  HTTP routes, middleware, WebSocket core
//! +-- shared/        Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core types and ports
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
