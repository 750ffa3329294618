//! Control Channel Protocol
//!
//! JSON message types exchanged over the per-client WebSocket. Client
//! messages carry their fields at the top level; server messages wrap
//! payloads under `data`.

use serde::{Deserialize, Serialize};

/// Client -> server control messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Establish a session against a previously-created connection record.
    Connect {
        #[serde(rename = "serverId")]
        server_id: i64,
        #[serde(rename = "connectionId")]
        connection_id: i64,
    },

    /// Tear down a session. Idempotent: disconnecting an unknown connection
    /// is acknowledged with a neutral `disconnected` reply.
    Disconnect {
        #[serde(rename = "connectionId")]
        connection_id: i64,
    },
}

/// Server -> client control messages.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Session established; carries the assigned regional IP.
    Connected {
        #[serde(rename = "remoteIP")]
        remote_ip: String,
    },

    /// Session torn down (or was already gone).
    Disconnected {},

    /// Periodic speed sample, pushed by the traffic accountant.
    Stats {
        /// Mbps
        #[serde(rename = "downloadSpeed")]
        download_speed: f64,
        /// Mbps
        #[serde(rename = "uploadSpeed")]
        upload_speed: f64,
        /// Cumulative usage in KB
        #[serde(rename = "dataUsed")]
        data_used: f64,
    },

    /// Validation failure or malformed input. Non-fatal: the channel stays
    /// open after an error.
    Error { error: String },
}
