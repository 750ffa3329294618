//! Application Error Types
//!
//! Centralized error handling with Axum integration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not connected to VPN")]
    NotConnected,

    #[error("Connection {0} is already active")]
    DuplicateSession(i64),

    #[error("Upstream forward failed: {0}")]
    UpstreamForward(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::NotConnected => (StatusCode::UNAUTHORIZED, "Not connected to VPN".into()),
            AppError::DuplicateSession(id) => (
                StatusCode::CONFLICT,
                format!("Connection {} is already active", id),
            ),
            AppError::UpstreamForward(msg) => {
                tracing::warn!("Upstream forward failed: {}", msg);
                (StatusCode::BAD_GATEWAY, "Upstream forward failed".into())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        let body = ErrorResponse { error: message };

        (status, Json(body)).into_response()
    }
}
