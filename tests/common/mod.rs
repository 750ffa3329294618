//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use axum::{body::Body, http::Request, Router};
use tower::ServiceExt;

use vpn_broker::config::{
    AuthSettings, CorsSettings, ServerSettings, Settings, StatsSettings, TunnelSettings,
};
use vpn_broker::presentation::http::routes;
use vpn_broker::startup::AppState;

/// Token the test identity provider maps to user 1
pub const TEST_TOKEN: &str = "test-token";

/// Token the test identity provider maps to user 2
pub const OTHER_TOKEN: &str = "other-token";

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application over the in-memory collaborators
    pub fn new() -> Self {
        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            tunnel: TunnelSettings {
                upstream_timeout_secs: 5,
            },
            stats: StatsSettings { window_ms: 1000 },
            auth: AuthSettings {
                tokens: vec![
                    format!("{}=1", TEST_TOKEN),
                    format!("{}=2", OTHER_TOKEN),
                ],
            },
            cors: CorsSettings {
                allowed_origins: vec![],
            },
            environment: "test".to_string(),
        };

        let state = AppState::build(settings).expect("test state");
        let router = routes::create_router(state.clone());

        Self { router, state }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a GET request with an extra header
    pub async fn get_with_header(
        &self,
        uri: &str,
        name: &str,
        value: &str,
    ) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .header(name, value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, uri: &str, token: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make an authenticated POST request with JSON body
    pub async fn post_json_auth(
        &self,
        uri: &str,
        body: &str,
        token: &str,
    ) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Collect a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
