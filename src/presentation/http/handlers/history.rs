//! Connection History Handlers
//!
//! REST surface for the durable side of a connection: records are created
//! before the control channel registers a session and closed after it ends.
//! All routes require an authenticated caller.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::domain::services::resolver;
use crate::domain::{ConnectionRecord, NewConnection};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// The caller's connection history, most recent first.
pub async fn get_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<ConnectionRecord>>, AppError> {
    let records = state.history.find_by_user(auth.user_id).await?;
    Ok(Json(records))
}

/// Request body for opening a connection record
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub server_id: i64,
}

/// Open a connection record for the caller.
///
/// The assigned IP is resolved here so the record and the later session
/// agree on the address; the live session itself is established separately
/// over the control channel.
pub async fn connect(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ConnectRequest>,
) -> Result<(StatusCode, Json<ConnectionRecord>), AppError> {
    let server = state
        .directory
        .find_by_id(body.server_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Server not found".into()))?;

    let target = resolver::resolve(&server);
    let record = state
        .history
        .create(NewConnection {
            user_id: auth.user_id,
            server_id: server.id,
            ip_address: target.pseudo_ip,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Request body for closing a connection record
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectRequest {
    pub connection_id: i64,
    /// Total bytes transferred, as counted by the traffic accountant
    pub data_used: i64,
}

/// Close the caller's connection record with final duration and usage.
pub async fn disconnect(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<DisconnectRequest>,
) -> Result<Json<ConnectionRecord>, AppError> {
    let record = state
        .history
        .find_by_id(body.connection_id)
        .await?
        .filter(|record| record.user_id == auth.user_id)
        .ok_or_else(|| AppError::NotFound("Connection not found".into()))?;

    let disconnected_at = Utc::now();
    let duration = (disconnected_at - record.connected_at).num_seconds();

    let updated = state
        .history
        .close(record.id, disconnected_at, duration, body.data_used)
        .await?
        .ok_or_else(|| AppError::NotFound("Connection not found".into()))?;

    Ok(Json(updated))
}
