//! Traffic Accountant
//!
//! Observes the two measurement events of every proxied exchange and pushes
//! speed samples over the session's control channel when an accounting
//! window closes. Event-driven: an idle session emits nothing.

use std::time::Duration;

use super::protocol::ServerMessage;
use super::session::{Direction, VpnSession};

/// Converts per-exchange byte counts into periodic stats messages.
#[derive(Debug, Clone, Copy)]
pub struct TrafficAccountant {
    /// Minimum wall-clock span of one accounting window
    stats_window: Duration,
}

impl TrafficAccountant {
    pub fn new(stats_window: Duration) -> Self {
        Self { stats_window }
    }

    /// Outbound request dispatched upstream: count as upload.
    pub fn on_request_sent(&self, session: &VpnSession, byte_length: u64) {
        self.record(session, Direction::Up, byte_length);
    }

    /// Upstream response received: count as download.
    pub fn on_response_received(&self, session: &VpnSession, byte_length: u64) {
        self.record(session, Direction::Down, byte_length);
    }

    fn record(&self, session: &VpnSession, direction: Direction, byte_length: u64) {
        let Some(sample) = session.record_transfer(direction, byte_length, self.stats_window)
        else {
            return;
        };

        tracing::debug!(
            connection_id = session.connection_id,
            download_mbps = sample.download_mbps,
            upload_mbps = sample.upload_mbps,
            "Emitting stats sample"
        );

        // The session may have been removed or its channel closed between the
        // transfer and this send; a dropped receiver just swallows the sample.
        let _ = session.sender.send(ServerMessage::Stats {
            download_speed: sample.download_mbps,
            upload_speed: sample.upload_mbps,
            data_used: sample.data_used_kb,
        });
    }
}
