//! Tunnel Gateway Tests
//!
//! Exercises the forwarding path against a local upstream server plus the
//! not-connected rejection paths and the ip-check endpoint.

use std::sync::Arc;

use axum::{body::Body, http::Request, http::StatusCode, routing::any, Router};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use vpn_broker::broker::VpnSession;

use crate::common::{body_json, TestApp};

/// Spawn a trivial upstream echo server on an ephemeral port.
async fn spawn_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let upstream = Router::new().route(
        "/echo",
        any(|body: String| async move { format!("echo:{}", body) }),
    );
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    format!("http://{}", addr)
}

fn register_session(app: &TestApp, connection_id: i64, proxy_target: String) -> Arc<VpnSession> {
    let (tx, _rx) = mpsc::unbounded_channel();
    let session = Arc::new(VpnSession::new(
        connection_id,
        1,
        7,
        Uuid::new_v4(),
        tx,
        proxy_target,
    ));
    app.state.registry.register(Arc::clone(&session)).unwrap();
    session
}

#[tokio::test]
async fn request_without_connection_id_is_rejected() {
    let app = TestApp::new();

    let response = app.get("/api/vpn-tunnel/anything").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Not connected to VPN");
}

#[tokio::test]
async fn unknown_connection_id_never_forwards_or_counts() {
    let app = TestApp::new();
    let session = register_session(&app, 5, "http://127.0.0.1:9".to_string());

    let response = app
        .get_with_header("/api/vpn-tunnel/echo", "x-vpn-connection-id", "999")
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(session.data_used_bytes(), 0);
}

#[tokio::test]
async fn removed_session_is_no_longer_reachable() {
    let app = TestApp::new();
    register_session(&app, 5, "http://127.0.0.1:9".to_string());
    app.state.registry.remove(5);

    let response = app
        .get_with_header("/api/vpn-tunnel/echo", "x-vpn-connection-id", "5")
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forwards_to_the_session_target_and_accounts_traffic() {
    let app = TestApp::new();
    let upstream = spawn_upstream().await;
    let session = register_session(&app, 5, upstream);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/vpn-tunnel/echo")
                .header("x-vpn-connection-id", "5")
                .body(Body::from("hello"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"echo:hello");

    // 5 bytes up, 10 bytes down
    assert_eq!(session.data_used_bytes(), 15);
}

#[tokio::test]
async fn connection_id_is_accepted_via_query_parameter() {
    let app = TestApp::new();
    let upstream = spawn_upstream().await;
    register_session(&app, 6, upstream);

    let response = app.get("/api/vpn-tunnel/echo?connectionId=6").await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn upstream_failure_surfaces_without_dropping_the_session() {
    let app = TestApp::new();
    // Port 9 (discard) is not listening; the dial fails fast
    register_session(&app, 5, "http://127.0.0.1:9".to_string());

    let response = app
        .get_with_header("/api/vpn-tunnel/echo", "x-vpn-connection-id", "5")
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    // The session survives the transient failure
    assert!(app.state.registry.get(5).is_some());
}

#[tokio::test]
async fn ip_check_labels_known_prefixes() {
    let app = TestApp::new();

    let response = app
        .get_with_header("/ip-check", "x-forwarded-for", "130.41.228.8")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["ip"], "130.41.228.8");
    assert_eq!(json["location"], "Germany");
    assert_eq!(json["vpn"], true);
}

#[tokio::test]
async fn ip_check_defaults_to_unknown() {
    let app = TestApp::new();

    let response = app.get("/ip-check").await;

    let json = body_json(response).await;
    assert_eq!(json["ip"], "unknown");
    assert_eq!(json["location"], "Unknown");
}
