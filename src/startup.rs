//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use crate::broker::{ConnectionRegistry, TrafficAccountant};
use crate::config::Settings;
use crate::domain::{ConnectionHistoryStore, IdentityProvider, ServerDirectory};
use crate::infrastructure::{InMemoryHistoryStore, InMemoryServerDirectory, StaticTokenIdentity};
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub accountant: TrafficAccountant,
    pub directory: Arc<dyn ServerDirectory>,
    pub history: Arc<dyn ConnectionHistoryStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub http_client: reqwest::Client,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire up state from settings with the in-memory collaborators.
    pub fn build(settings: Settings) -> Result<Self> {
        let identity = StaticTokenIdentity::from_pairs(settings.auth.token_pairs());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.tunnel.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            registry: Arc::new(ConnectionRegistry::new()),
            accountant: TrafficAccountant::new(Duration::from_millis(settings.stats.window_ms)),
            directory: Arc::new(InMemoryServerDirectory::seeded()),
            history: Arc::new(InMemoryHistoryStore::new()),
            identity: Arc::new(identity),
            http_client,
            settings: Arc::new(settings),
        })
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let cors_settings = settings.cors.clone();
        let addr: SocketAddr = settings.server_addr().parse()?;

        let state = AppState::build(settings)?;

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&cors_settings));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
