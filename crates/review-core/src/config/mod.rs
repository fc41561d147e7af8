//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every field has a serde default so a partial file is enough.

pub mod app;
pub mod auth;
pub mod cache;
pub mod logging;
pub mod moderation;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::{AuthConfig, OAuthProviderConfig, PLACEHOLDER_TOKEN_SECRET};
pub use self::cache::CacheConfig;
pub use self::logging::LoggingConfig;
pub use self::moderation::{ModerationConfig, StoreBackend};
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (`default.toml` + environment overlay + `COURSEREVIEW__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token signing and identity provider settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Cookie carrier settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Moderation store settings.
    #[serde(default)]
    pub moderation: ModerationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with `config/{env}.toml` and environment
    /// variables prefixed with `COURSEREVIEW__`. The `env` name also becomes
    /// the default runtime mode (`server.environment`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .set_default("server.environment", env)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("COURSEREVIEW")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.admin_subjects")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that are only safe in development.
    ///
    /// Outside development the token secret must be set to something other
    /// than the shipped placeholder, otherwise anyone could sign tokens.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.is_development() && self.auth.has_placeholder_secret() {
            return Err(AppError::configuration(format!(
                "auth.token_secret must be set in the '{}' environment",
                self.server.environment
            )));
        }
        Ok(())
    }

    /// Whether the server runs in development mode.
    ///
    /// Development-only endpoints are reachable only when this returns `true`.
    pub fn is_development(&self) -> bool {
        self.server.is_development()
    }
}

fn default_database_url() -> String {
    "postgres://localhost:5432/coursereview".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}
