//! Domain Entities
//!
//! Core entities and the traits through which external collaborators
//! (server directory, history persistence) are consumed.

pub mod connection;
pub mod server;

pub use connection::{ConnectionHistoryStore, ConnectionRecord, NewConnection};
pub use server::{Server, ServerDirectory, ServerStatus};
