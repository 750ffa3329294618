//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};

use super::handlers;
use crate::presentation::middleware::auth_middleware;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Control channel endpoint
        .route("/ws", get(ws_handler))
        // Tunnel gateway: any method, with or without a sub-path
        .route("/api/vpn-tunnel", any(handlers::tunnel::forward))
        .route("/api/vpn-tunnel/{*path}", any(handlers::tunnel::forward))
        // Reached via the tunnel prefix above
        .route("/ip-check", get(handlers::tunnel::ip_check))
        // Aggregate and reference data
        .route("/api/vpn-status", get(handlers::status::vpn_status))
        .route("/api/servers", get(handlers::servers::list_servers))
        .route("/api/servers/{id}", get(handlers::servers::get_server))
        // Connection history (authenticated)
        .merge(history_routes(state.clone()))
        // Health check endpoint
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
}

/// Connection history routes (require authentication)
fn history_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/connection-history",
            get(handlers::history::get_history),
        )
        .route("/api/connect", post(handlers::history::connect))
        .route("/api/disconnect", post(handlers::history::disconnect))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
