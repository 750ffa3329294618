//! Connection Registry
//!
//! Process-wide table of active sessions, keyed by connection ID. Owned by
//! `AppState` and injected wherever it is needed; shared concurrently by the
//! control-channel handlers and in-flight tunnel requests.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::session::VpnSession;
use crate::shared::error::AppError;

/// Concurrent map of live sessions.
pub struct ConnectionRegistry {
    sessions: DashMap<i64, Arc<VpnSession>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register a session under its connection ID.
    ///
    /// Rejects the insert if the ID is already live, leaving the existing
    /// session untouched. The entry API keeps check-and-insert atomic under
    /// concurrent connects.
    pub fn register(&self, session: Arc<VpnSession>) -> Result<(), AppError> {
        match self.sessions.entry(session.connection_id) {
            Entry::Occupied(_) => Err(AppError::DuplicateSession(session.connection_id)),
            Entry::Vacant(entry) => {
                tracing::info!(
                    connection_id = session.connection_id,
                    user_id = session.user_id,
                    server_id = session.server_id,
                    "Session registered"
                );
                entry.insert(session);
                Ok(())
            }
        }
    }

    /// Look up a live session.
    pub fn get(&self, connection_id: i64) -> Option<Arc<VpnSession>> {
        self.sessions
            .get(&connection_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a session. Idempotent: removing an absent ID is a no-op, so an
    /// explicit disconnect and a channel-close cleanup can race harmlessly.
    pub fn remove(&self, connection_id: i64) -> Option<Arc<VpnSession>> {
        let removed = self.sessions.remove(&connection_id).map(|(_, s)| s);
        if let Some(session) = &removed {
            tracing::info!(
                connection_id,
                user_id = session.user_id,
                "Session removed"
            );
        }
        removed
    }

    /// Remove every session owned by the given control channel. Returns the
    /// connection IDs that were cleaned up.
    pub fn remove_by_channel(&self, channel_id: Uuid) -> Vec<i64> {
        let owned: Vec<i64> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().channel_id == channel_id)
            .map(|entry| *entry.key())
            .collect();

        let mut removed = Vec::with_capacity(owned.len());
        for connection_id in owned {
            if self.sessions.remove(&connection_id).is_some() {
                removed.push(connection_id);
            }
        }

        if !removed.is_empty() {
            tracing::info!(
                channel_id = %channel_id,
                connections = ?removed,
                "Sessions cleaned up after channel close"
            );
        }
        removed
    }

    /// Number of live sessions.
    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    /// Active session counts grouped by server, from a snapshot-style
    /// traversal that tolerates concurrent mutation.
    pub fn usage_by_server(&self) -> HashMap<i64, usize> {
        let mut usage = HashMap::new();
        for entry in self.sessions.iter() {
            *usage.entry(entry.value().server_id).or_insert(0) += 1;
        }
        usage
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
