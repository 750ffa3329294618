//! Tunnel Gateway Handlers
//!
//! Forwards HTTP traffic for a registered session to its resolved regional
//! target, instrumenting each exchange for the traffic accountant, plus the
//! ip-check endpoint reachable through the tunnel prefix.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::domain::services::resolver;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Header carrying the connection ID on tunneled requests
pub const CONNECTION_ID_HEADER: &str = "x-vpn-connection-id";

/// Route prefix stripped before forwarding upstream
const TUNNEL_PREFIX: &str = "/api/vpn-tunnel";

/// Upper bound on buffered request/response bodies
const MAX_FORWARD_BODY: usize = 8 * 1024 * 1024;

/// Hop-by-hop headers that must not be forwarded in either direction
const HOP_BY_HOP: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Forward a tunneled request to the session's proxy target.
///
/// The session is looked up before anything is read or counted: an unknown
/// or removed connection ID forwards nothing and mutates no counters.
pub async fn forward(State(state): State<AppState>, request: Request) -> Result<Response, AppError> {
    let connection_id = extract_connection_id(&request).ok_or(AppError::NotConnected)?;
    let session = state.registry.get(connection_id).ok_or(AppError::NotConnected)?;

    let method = request.method().clone();
    let upstream_url = rewrite_url(&session.proxy_target, request.uri().path(), request.uri().query());
    let request_headers = filter_headers(request.headers());

    let body = axum::body::to_bytes(request.into_body(), MAX_FORWARD_BODY)
        .await
        .map_err(|_| AppError::BadRequest("Request body too large".into()))?;

    // Outbound measurement event: request bytes count as upload
    state.accountant.on_request_sent(&session, body.len() as u64);

    tracing::debug!(
        connection_id,
        %method,
        url = %upstream_url,
        "Forwarding tunneled request"
    );

    let upstream_response = state
        .http_client
        .request(method, &upstream_url)
        .headers(request_headers)
        .body(body.to_vec())
        .send()
        .await
        .map_err(|e| AppError::UpstreamForward(e.to_string()))?;

    let status = upstream_response.status();
    let response_headers = filter_headers(upstream_response.headers());
    let response_body = upstream_response
        .bytes()
        .await
        .map_err(|e| AppError::UpstreamForward(e.to_string()))?;

    // Inbound measurement event: response bytes count as download
    state
        .accountant
        .on_response_received(&session, response_body.len() as u64);

    let mut response = Response::builder()
        .status(status)
        .body(Body::from(response_body))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    *response.headers_mut() = response_headers;

    Ok(response)
}

/// Connection ID from the dedicated header, falling back to the query string.
fn extract_connection_id(request: &Request) -> Option<i64> {
    let from_header = request
        .headers()
        .get(CONNECTION_ID_HEADER)
        .and_then(|v| v.to_str().ok());

    let from_query = request.uri().query().and_then(|query| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "connectionId")
            .map(|(_, value)| value)
    });

    from_header.or(from_query)?.parse().ok()
}

/// Strip the gateway prefix and graft path and query onto the proxy target.
fn rewrite_url(proxy_target: &str, path: &str, query: Option<&str>) -> String {
    let rewritten = path.strip_prefix(TUNNEL_PREFIX).unwrap_or(path);
    let rewritten = if rewritten.is_empty() { "/" } else { rewritten };
    match query {
        Some(query) => format!("{}{}?{}", proxy_target, rewritten, query),
        None => format!("{}{}", proxy_target, rewritten),
    }
}

/// Drop hop-by-hop headers plus the ones the client stack regenerates.
fn filter_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::new();
    for (name, value) in headers {
        if HOP_BY_HOP.contains(name) || name == header::HOST || name == header::CONTENT_LENGTH {
            continue;
        }
        filtered.insert(name.clone(), value.clone());
    }
    filtered
}

/// Response body for the ip-check endpoint
#[derive(Debug, Serialize)]
pub struct IpCheckResponse {
    pub ip: String,
    pub location: String,
    pub timestamp: String,
    pub vpn: bool,
}

/// Report the caller's apparent IP and region.
///
/// Reached through the tunnel prefix, so the interesting address is the one
/// in `x-forwarded-for`; it is matched against the same prefix table the
/// resolver assigns from.
pub async fn ip_check(headers: HeaderMap) -> impl IntoResponse {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let location = resolver::country_for_ip(&ip).unwrap_or("Unknown").to_string();

    Json(IpCheckResponse {
        ip,
        location,
        timestamp: Utc::now().to_rfc3339(),
        vpn: true,
    })
}
