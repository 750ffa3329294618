//! WebSocket Connection Handler
//!
//! Drives the per-client control channel: connect/disconnect handling,
//! stats push-through, and session cleanup when the channel closes.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::broker::{ClientMessage, ServerMessage, VpnSession};
use crate::domain::services::resolver;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Query parameters accepted on the WebSocket upgrade
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Bearer token for clients that cannot set headers on upgrade
    token: Option<String>,
}

/// WebSocket upgrade handler
///
/// The channel's identity is fixed here, before the upgrade completes:
/// every session created over this channel is owned by the authenticated
/// user, never by a user ID the client sends later.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let header_token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let token = header_token
        .or(params.token.as_deref())
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    let user_id = state.identity.authenticate(token).await?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id)))
}

/// Handle an individual control channel
async fn handle_socket(socket: WebSocket, state: AppState, user_id: i64) {
    let channel_id = Uuid::new_v4();

    tracing::debug!(user_id, channel_id = %channel_id, "Control channel opened");

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();

    // Outgoing messages are funneled through one channel so the stats
    // accountant and the control handler never interleave partial writes
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let sender_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Main message loop
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                handle_message(&text, user_id, channel_id, &tx, &state).await;
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(channel_id = %channel_id, "Channel closed by client");
                break;
            }
            Ok(_) => {
                // Binary and ping/pong frames carry no control messages
            }
            Err(e) => {
                tracing::debug!(channel_id = %channel_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Implicit cleanup: no session outlives its channel
    let removed = state.registry.remove_by_channel(channel_id);
    sender_task.abort();

    tracing::info!(
        user_id,
        channel_id = %channel_id,
        sessions_cleaned = removed.len(),
        "Control channel disconnected"
    );
}

/// Handle one incoming control message
async fn handle_message(
    text: &str,
    user_id: i64,
    channel_id: Uuid,
    tx: &mpsc::UnboundedSender<ServerMessage>,
    state: &AppState,
) {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(m) => m,
        Err(e) => {
            // Errors are non-fatal: reply and keep the channel open
            tracing::debug!(channel_id = %channel_id, error = %e, "Malformed control message");
            let _ = tx.send(ServerMessage::Error {
                error: "Invalid request".to_string(),
            });
            return;
        }
    };

    match message {
        ClientMessage::Connect {
            server_id,
            connection_id,
        } => {
            handle_connect(server_id, connection_id, user_id, channel_id, tx, state).await;
        }

        ClientMessage::Disconnect { connection_id } => {
            // Idempotent: an absent session still gets the neutral reply
            state.registry.remove(connection_id);
            let _ = tx.send(ServerMessage::Disconnected {});
        }
    }
}

/// Validate, resolve and register a new session
async fn handle_connect(
    server_id: i64,
    connection_id: i64,
    user_id: i64,
    channel_id: Uuid,
    tx: &mpsc::UnboundedSender<ServerMessage>,
    state: &AppState,
) {
    let server = match state.directory.find_by_id(server_id).await {
        Ok(Some(server)) => server,
        Ok(None) => {
            let _ = tx.send(ServerMessage::Error {
                error: "Server not found".to_string(),
            });
            return;
        }
        Err(e) => {
            tracing::error!(server_id, error = %e, "Server lookup failed");
            let _ = tx.send(ServerMessage::Error {
                error: "Failed to establish VPN connection".to_string(),
            });
            return;
        }
    };

    let target = resolver::resolve(&server);
    let session = Arc::new(VpnSession::new(
        connection_id,
        user_id,
        server_id,
        channel_id,
        tx.clone(),
        target.proxy_target,
    ));

    match state.registry.register(session) {
        Ok(()) => {
            let _ = tx.send(ServerMessage::Connected {
                remote_ip: target.pseudo_ip,
            });
            tracing::info!(connection_id, server_id, user_id, "VPN connection established");
        }
        Err(AppError::DuplicateSession(id)) => {
            // The live session is untouched; this connect is rejected
            let _ = tx.send(ServerMessage::Error {
                error: format!("Connection {} is already active", id),
            });
        }
        Err(e) => {
            tracing::error!(connection_id, error = %e, "Session registration failed");
            let _ = tx.send(ServerMessage::Error {
                error: "Failed to establish VPN connection".to_string(),
            });
        }
    }
}
