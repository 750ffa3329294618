//! VPN Status API Tests

use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use uuid::Uuid;

use vpn_broker::broker::VpnSession;

use crate::common::{body_json, TestApp};

fn register_session(app: &TestApp, connection_id: i64, server_id: i64) {
    let (tx, _rx) = mpsc::unbounded_channel();
    let session = Arc::new(VpnSession::new(
        connection_id,
        1,
        server_id,
        Uuid::new_v4(),
        tx,
        "http://127.0.0.1:80".to_string(),
    ));
    app.state.registry.register(session).unwrap();
}

#[tokio::test]
async fn empty_registry_reports_zero_connections() {
    let app = TestApp::new();

    let response = app.get("/api/vpn-status").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["activeConnections"], 0);
    assert_eq!(json["servers"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn active_users_are_grouped_by_server() {
    let app = TestApp::new();
    register_session(&app, 1, 7);
    register_session(&app, 2, 7);
    register_session(&app, 3, 3);

    let response = app.get("/api/vpn-status").await;
    let json = body_json(response).await;

    assert_eq!(json["activeConnections"], 3);

    let servers = json["servers"].as_array().unwrap();
    let users_of = |id: i64| {
        servers
            .iter()
            .find(|s| s["id"] == id)
            .map(|s| s["activeUsers"].clone())
            .unwrap()
    };
    assert_eq!(users_of(7), 2);
    assert_eq!(users_of(3), 1);
    assert_eq!(users_of(1), 0);
}

#[tokio::test]
async fn removed_sessions_leave_the_aggregate() {
    let app = TestApp::new();
    register_session(&app, 1, 7);
    register_session(&app, 2, 3);

    app.state.registry.remove(1);

    let response = app.get("/api/vpn-status").await;
    let json = body_json(response).await;
    assert_eq!(json["activeConnections"], 1);
}
