//! VPN Server entity and directory trait.
//!
//! Servers are read-only reference data for the broker: they are looked up
//! at connect time to resolve a regional target and joined against the
//! registry for aggregate status reporting. Their CRUD lifecycle lives in an
//! external admin surface, not here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Operational status of a VPN server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    #[default]
    Available,
    Busy,
    Maintenance,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A VPN server as presented on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub id: i64,

    /// Display name, usually the city
    pub name: String,

    /// Full country name, drives regional target resolution
    pub country: String,

    /// ISO 3166-1 alpha-2, lowercase
    pub country_code: String,

    pub city: String,

    /// Advertised latency in milliseconds
    pub ping: i32,

    /// Advertised load percentage (0-100)
    pub load: i32,

    pub status: ServerStatus,
}

/// Lookup provider for VPN servers.
///
/// The broker only reads; seeding and administration are external concerns.
#[async_trait]
pub trait ServerDirectory: Send + Sync {
    /// Find a server by its ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Server>, AppError>;

    /// List all known servers.
    async fn find_all(&self) -> Result<Vec<Server>, AppError>;
}
