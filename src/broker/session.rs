//! Live VPN Session
//!
//! A `VpnSession` binds a connection ID to its resolved proxy target, the
//! owning control channel, and the traffic counters mutated on every
//! proxied exchange.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::protocol::ServerMessage;

/// Direction of a proxied transfer, from the client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Request bytes leaving the client
    Up,
    /// Response bytes arriving at the client
    Down,
}

/// Byte counters for the current accounting window plus the running total.
///
/// Guarded by one mutex so counter updates and window resets are serialized
/// per session: the window-reset decision depends on seeing events in order.
#[derive(Debug)]
struct TrafficCounters {
    /// Monotonically increasing lifetime total
    data_used_bytes: u64,
    window_started_at: Instant,
    bytes_down_in_window: u64,
    bytes_up_in_window: u64,
}

/// A speed sample computed when an accounting window closes.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSample {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub data_used_kb: f64,
}

/// An active session in the connection registry.
pub struct VpnSession {
    /// Registry key, supplied by the client from its connection record
    pub connection_id: i64,

    /// Owner, bound from the channel's authenticated identity
    pub user_id: i64,

    pub server_id: i64,

    /// Identifies the control channel that owns this session; channel close
    /// removes every session carrying this ID
    pub channel_id: Uuid,

    /// Outbound half of the control channel
    pub sender: mpsc::UnboundedSender<ServerMessage>,

    pub started_at: DateTime<Utc>,

    /// Resolved once at registration, immutable for the session's life
    pub proxy_target: String,

    counters: Mutex<TrafficCounters>,
}

impl VpnSession {
    pub fn new(
        connection_id: i64,
        user_id: i64,
        server_id: i64,
        channel_id: Uuid,
        sender: mpsc::UnboundedSender<ServerMessage>,
        proxy_target: String,
    ) -> Self {
        Self {
            connection_id,
            user_id,
            server_id,
            channel_id,
            sender,
            started_at: Utc::now(),
            proxy_target,
            counters: Mutex::new(TrafficCounters {
                data_used_bytes: 0,
                window_started_at: Instant::now(),
                bytes_down_in_window: 0,
                bytes_up_in_window: 0,
            }),
        }
    }

    /// Lifetime bytes transferred through this session.
    pub fn data_used_bytes(&self) -> u64 {
        self.counters.lock().data_used_bytes
    }

    /// Record a transfer and, if the accounting window has run its course,
    /// close it and return the speed sample for emission.
    ///
    /// The window is traffic-triggered: with no transfers, no sample is ever
    /// produced, however much wall-clock time passes.
    pub fn record_transfer(
        &self,
        direction: Direction,
        bytes: u64,
        window: Duration,
    ) -> Option<StatsSample> {
        let mut counters = self.counters.lock();

        counters.data_used_bytes += bytes;
        match direction {
            Direction::Up => counters.bytes_up_in_window += bytes,
            Direction::Down => counters.bytes_down_in_window += bytes,
        }

        let now = Instant::now();
        let elapsed = now.duration_since(counters.window_started_at);
        if elapsed < window {
            return None;
        }

        let elapsed_secs = elapsed.as_secs_f64();
        let sample = StatsSample {
            download_mbps: counters.bytes_down_in_window as f64 * 8.0
                / elapsed_secs
                / (1024.0 * 1024.0),
            upload_mbps: counters.bytes_up_in_window as f64 * 8.0
                / elapsed_secs
                / (1024.0 * 1024.0),
            data_used_kb: counters.data_used_bytes as f64 / 1024.0,
        };

        counters.window_started_at = now;
        counters.bytes_down_in_window = 0;
        counters.bytes_up_in_window = 0;

        Some(sample)
    }

    /// Pretend the current window started `by` earlier. Test hook for
    /// exercising window closure without sleeping.
    #[cfg(test)]
    pub fn backdate_window(&self, by: Duration) {
        let mut counters = self.counters.lock();
        counters.window_started_at -= by;
    }

    /// Window counters as (down, up). Test observability only.
    #[cfg(test)]
    pub fn window_counters(&self) -> (u64, u64) {
        let counters = self.counters.lock();
        (counters.bytes_down_in_window, counters.bytes_up_in_window)
    }
}

impl std::fmt::Debug for VpnSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VpnSession")
            .field("connection_id", &self.connection_id)
            .field("user_id", &self.user_id)
            .field("server_id", &self.server_id)
            .field("channel_id", &self.channel_id)
            .field("proxy_target", &self.proxy_target)
            .finish_non_exhaustive()
    }
}
