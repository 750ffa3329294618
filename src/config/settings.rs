//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Tunnel gateway configuration
    pub tunnel: TunnelSettings,

    /// Traffic accounting configuration
    pub stats: StatsSettings,

    /// Authentication token table
    pub auth: AuthSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Tunnel gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TunnelSettings {
    /// Upstream request timeout in seconds
    pub upstream_timeout_secs: u64,
}

/// Traffic accounting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsSettings {
    /// Minimum accounting window before a stats sample is emitted, in
    /// milliseconds
    pub window_ms: u64,
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Static token table as `token=user_id` entries
    pub tokens: Vec<String>,
}

impl AuthSettings {
    /// Parse the `token=user_id` entries, skipping malformed ones.
    pub fn token_pairs(&self) -> Vec<(&str, i64)> {
        self.tokens
            .iter()
            .filter_map(|entry| {
                let (token, user) = entry.split_once('=')?;
                Some((token, user.trim().parse().ok()?))
            })
            .collect()
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("tunnel.upstream_timeout_secs", 30)?
            .set_default("stats.window_ms", 1000)?
            .set_default("auth.tokens", Vec::<String>::new())?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .build()?
            .try_deserialize()
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
