//! WebSocket Control Channel
//!
//! One persistent connection per logged-in client, carrying
//! connect/disconnect/stats/error messages.

pub mod handler;

pub use handler::ws_handler;
