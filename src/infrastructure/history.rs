//! In-Memory Connection History Store
//!
//! Volatile history persistence. Records are held in a locked Vec with
//! serially-assigned IDs; enough for the broker, the dashboard, and the
//! test suite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::domain::{ConnectionHistoryStore, ConnectionRecord, NewConnection};
use crate::shared::error::AppError;

#[derive(Default)]
struct HistoryState {
    records: Vec<ConnectionRecord>,
    next_id: i64,
}

/// History store backed by process memory.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    state: Mutex<HistoryState>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HistoryState {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl ConnectionHistoryStore for InMemoryHistoryStore {
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<ConnectionRecord>, AppError> {
        let state = self.state.lock();
        let mut records: Vec<ConnectionRecord> = state
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.connected_at.cmp(&a.connected_at));
        Ok(records)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ConnectionRecord>, AppError> {
        let state = self.state.lock();
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, connection: NewConnection) -> Result<ConnectionRecord, AppError> {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;

        let record = ConnectionRecord {
            id,
            user_id: connection.user_id,
            server_id: connection.server_id,
            ip_address: connection.ip_address,
            connected_at: Utc::now(),
            disconnected_at: None,
            duration: None,
            data_used: None,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn close(
        &self,
        id: i64,
        disconnected_at: DateTime<Utc>,
        duration: i64,
        data_used: i64,
    ) -> Result<Option<ConnectionRecord>, AppError> {
        let mut state = self.state.lock();
        let Some(record) = state.records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.disconnected_at = Some(disconnected_at);
        record.duration = Some(duration);
        record.data_used = Some(data_used);
        Ok(Some(record.clone()))
    }
}
