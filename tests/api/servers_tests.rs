//! Server Listing API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn lists_the_seeded_fleet() {
    let app = TestApp::new();

    let response = app.get("/api/servers").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let servers = json.as_array().unwrap();
    assert_eq!(servers.len(), 9);
    assert_eq!(servers[0]["name"], "New York");
    assert_eq!(servers[0]["country"], "United States");
}

#[tokio::test]
async fn fetches_a_single_server() {
    let app = TestApp::new();

    let response = app.get("/api/servers/7").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["country"], "Japan");
    assert_eq!(json["status"], "available");
}

#[tokio::test]
async fn unknown_server_is_404() {
    let app = TestApp::new();

    let response = app.get("/api/servers/999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Server not found");
}
