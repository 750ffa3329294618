//! Connection History API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{body_json, TestApp, OTHER_TOKEN, TEST_TOKEN};

#[tokio::test]
async fn history_requires_authentication() {
    let app = TestApp::new();

    let response = app.get("/api/connection-history").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn connect_creates_a_record_with_resolved_ip() {
    let app = TestApp::new();

    let response = app
        .post_json_auth("/api/connect", r#"{"serverId":7}"#, TEST_TOKEN)
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["userId"], 1);
    assert_eq!(json["serverId"], 7);
    // Japan prefix with the id-derived last octet
    assert_eq!(json["ipAddress"], "162.159.135.8");
    assert!(json["disconnectedAt"].is_null());
}

#[tokio::test]
async fn connect_to_unknown_server_is_404() {
    let app = TestApp::new();

    let response = app
        .post_json_auth("/api/connect", r#"{"serverId":404}"#, TEST_TOKEN)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_is_scoped_to_the_caller() {
    let app = TestApp::new();
    app.post_json_auth("/api/connect", r#"{"serverId":1}"#, TEST_TOKEN)
        .await;

    let own = body_json(app.get_auth("/api/connection-history", TEST_TOKEN).await).await;
    let other = body_json(app.get_auth("/api/connection-history", OTHER_TOKEN).await).await;

    assert_eq!(own.as_array().unwrap().len(), 1);
    assert_eq!(other.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn disconnect_closes_the_record() {
    let app = TestApp::new();
    let created = body_json(
        app.post_json_auth("/api/connect", r#"{"serverId":3}"#, TEST_TOKEN)
            .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let body = format!(r#"{{"connectionId":{},"dataUsed":4096000}}"#, id);
    let response = app.post_json_auth("/api/disconnect", &body, TEST_TOKEN).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["dataUsed"], 4096000);
    assert!(json["duration"].as_i64().unwrap() >= 0);
    assert!(!json["disconnectedAt"].is_null());
}

#[tokio::test]
async fn cannot_disconnect_another_users_record() {
    let app = TestApp::new();
    let created = body_json(
        app.post_json_auth("/api/connect", r#"{"serverId":3}"#, TEST_TOKEN)
            .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let body = format!(r#"{{"connectionId":{},"dataUsed":1}}"#, id);
    let response = app
        .post_json_auth("/api/disconnect", &body, OTHER_TOKEN)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
