//! Connection history entity and persistence trait.
//!
//! A `ConnectionRecord` is the durable counterpart of a live session: created
//! when the client requests a connection, closed with duration and usage when
//! it ends. The broker consumes this through the `ConnectionHistoryStore`
//! trait only; the actual persistence backend is an external collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A single connection history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    pub id: i64,

    pub user_id: i64,

    pub server_id: i64,

    /// The pseudo-IP assigned for this connection
    pub ip_address: String,

    pub connected_at: DateTime<Utc>,

    /// None while the connection is still open
    pub disconnected_at: Option<DateTime<Utc>>,

    /// Duration in seconds, set at close
    pub duration: Option<i64>,

    /// Total bytes transferred, set at close
    pub data_used: Option<i64>,
}

impl ConnectionRecord {
    /// Whether the record is still open (no disconnect recorded).
    pub fn is_open(&self) -> bool {
        self.disconnected_at.is_none()
    }
}

/// Fields supplied when opening a new connection record.
#[derive(Debug, Clone)]
pub struct NewConnection {
    pub user_id: i64,
    pub server_id: i64,
    pub ip_address: String,
}

/// Persistence provider for connection history.
#[async_trait]
pub trait ConnectionHistoryStore: Send + Sync {
    /// All records for a user, most recent first.
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<ConnectionRecord>, AppError>;

    /// Find a single record by its ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<ConnectionRecord>, AppError>;

    /// Open a new record; the store assigns the ID and `connected_at`.
    async fn create(&self, connection: NewConnection) -> Result<ConnectionRecord, AppError>;

    /// Close a record with final duration and usage. Returns the updated
    /// record, or None if no such record exists.
    async fn close(
        &self,
        id: i64,
        disconnected_at: DateTime<Utc>,
        duration: i64,
        data_used: i64,
    ) -> Result<Option<ConnectionRecord>, AppError>;
}
