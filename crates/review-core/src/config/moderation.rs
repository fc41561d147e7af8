//! Moderation store configuration.

use serde::{Deserialize, Serialize};

/// Which backend persists staged and published reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via sqlx.
    Postgres,
    /// Process-local maps (development and tests).
    Memory,
}

/// Moderation queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Store backend.
    #[serde(default = "default_store")]
    pub store: StoreBackend,
    /// Number of staged reviews returned when no limit is given.
    #[serde(default = "default_list_limit")]
    pub default_list_limit: i64,
    /// Upper bound for a requested listing limit.
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: i64,
}

impl ModerationConfig {
    /// Clamp a requested limit into `1..=max_list_limit`.
    pub fn clamp_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_list_limit)
            .clamp(1, self.max_list_limit.max(1))
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            store: default_store(),
            default_list_limit: default_list_limit(),
            max_list_limit: default_max_list_limit(),
        }
    }
}

fn default_store() -> StoreBackend {
    StoreBackend::Postgres
}

fn default_list_limit() -> i64 {
    100
}

fn default_max_list_limit() -> i64 {
    500
}
