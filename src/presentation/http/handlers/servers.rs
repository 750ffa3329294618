//! Server Listing Handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::domain::Server;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// List all VPN servers.
pub async fn list_servers(State(state): State<AppState>) -> Result<Json<Vec<Server>>, AppError> {
    let servers = state.directory.find_all().await?;
    Ok(Json(servers))
}

/// Fetch a single VPN server.
pub async fn get_server(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Server>, AppError> {
    let server = state
        .directory
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Server not found".into()))?;
    Ok(Json(server))
}
