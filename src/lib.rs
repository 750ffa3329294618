//! # VPN Broker Library
//!
//! This crate provides the backend of a consumer VPN dashboard:
//! - A WebSocket control channel per logged-in client
//! - An in-memory registry of active VPN sessions
//! - Synthetic traffic accounting with periodic stats streaming
//! - An HTTP tunnel gateway forwarding to per-session regional targets
//!
//! ## Module Structure
//!
//! ```text
//! vpn_broker/
//! +-- config/         Configuration management
//! +-- domain/         Entities, collaborator traits, regional resolver
//! +-- broker/         Session registry, control protocol, traffic accounting
//! +-- infrastructure/ In-memory collaborator implementations
//! +-- presentation/   HTTP routes, tunnel gateway and WebSocket handler
//! +-- shared/         Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - entities, traits and the regional resolver
pub mod domain;

// Session broker core - registry, protocol, accounting
pub mod broker;

// Infrastructure layer - in-memory collaborator implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
