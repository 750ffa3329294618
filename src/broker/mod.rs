//! # Session Broker
//!
//! The core of the server: the in-memory connection registry, the live
//! session record with its traffic counters, the control-channel message
//! protocol, and the traffic accountant that turns proxied byte counts into
//! stats samples.

pub mod accounting;
pub mod protocol;
pub mod registry;
pub mod session;

pub use accounting::TrafficAccountant;
pub use protocol::{ClientMessage, ServerMessage};
pub use registry::ConnectionRegistry;
pub use session::{Direction, StatsSample, VpnSession};
