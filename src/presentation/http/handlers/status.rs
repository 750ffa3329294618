//! VPN Status Handler
//!
//! Aggregate view of the registry joined against the server directory.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::shared::error::AppError;
use crate::startup::AppState;

/// Aggregate status response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnStatusResponse {
    pub active_connections: usize,
    pub servers: Vec<ServerUsage>,
}

/// Per-server active user count
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerUsage {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub active_users: usize,
}

/// Aggregate active-session statistics across all servers.
pub async fn vpn_status(State(state): State<AppState>) -> Result<Json<VpnStatusResponse>, AppError> {
    // Snapshot the registry first so the counts are from one traversal
    let active_connections = state.registry.active_count();
    let usage = state.registry.usage_by_server();

    let servers = state
        .directory
        .find_all()
        .await?
        .into_iter()
        .map(|server| ServerUsage {
            active_users: usage.get(&server.id).copied().unwrap_or(0),
            id: server.id,
            name: server.name,
            country: server.country,
        })
        .collect();

    Ok(Json(VpnStatusResponse {
        active_connections,
        servers,
    }))
}
