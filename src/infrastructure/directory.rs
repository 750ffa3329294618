//! In-Memory Server Directory
//!
//! Serves the fixed fleet of regional servers the dashboard offers. A
//! relational backend can replace this behind the same trait; the broker
//! only ever reads.

use async_trait::async_trait;

use crate::domain::{Server, ServerDirectory, ServerStatus};
use crate::shared::error::AppError;

/// Directory backed by a seeded, immutable server list.
pub struct InMemoryServerDirectory {
    servers: Vec<Server>,
}

impl InMemoryServerDirectory {
    /// Directory with the standard regional fleet.
    pub fn seeded() -> Self {
        Self {
            servers: seed_servers(),
        }
    }

    /// Directory over an explicit server list.
    pub fn with_servers(servers: Vec<Server>) -> Self {
        Self { servers }
    }
}

#[async_trait]
impl ServerDirectory for InMemoryServerDirectory {
    async fn find_by_id(&self, id: i64) -> Result<Option<Server>, AppError> {
        Ok(self.servers.iter().find(|s| s.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Server>, AppError> {
        Ok(self.servers.clone())
    }
}

fn server(
    id: i64,
    name: &str,
    country: &str,
    country_code: &str,
    city: &str,
    ping: i32,
    load: i32,
    status: ServerStatus,
) -> Server {
    Server {
        id,
        name: name.to_string(),
        country: country.to_string(),
        country_code: country_code.to_string(),
        city: city.to_string(),
        ping,
        load,
        status,
    }
}

fn seed_servers() -> Vec<Server> {
    use ServerStatus::*;
    vec![
        server(1, "New York", "United States", "us", "New York", 28, 65, Available),
        server(2, "Los Angeles", "United States", "us", "Los Angeles", 45, 78, Available),
        server(3, "Toronto", "Canada", "ca", "Toronto", 42, 60, Available),
        server(4, "London", "United Kingdom", "gb", "London", 85, 42, Available),
        server(5, "Paris", "France", "fr", "Paris", 90, 38, Available),
        server(6, "Amsterdam", "Netherlands", "nl", "Amsterdam", 72, 35, Available),
        server(7, "Tokyo", "Japan", "jp", "Tokyo", 180, 42, Available),
        server(8, "Singapore", "Singapore", "sg", "Singapore", 190, 25, Available),
        server(9, "Sydney", "Australia", "au", "Sydney", 245, 85, Maintenance),
    ]
}
