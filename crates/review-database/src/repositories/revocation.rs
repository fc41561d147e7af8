//! PostgreSQL implementation of the session revocation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use review_core::error::{AppError, ErrorKind};
use review_core::result::AppResult;

use crate::store::SessionRevocationStore;

/// Repository for the `revoked_sessions` table.
#[derive(Debug, Clone)]
pub struct SessionRevocationRepository {
    pool: PgPool,
}

impl SessionRevocationRepository {
    /// Create a new revocation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRevocationStore for SessionRevocationRepository {
    async fn revoke_session(
        &self,
        session_id: Uuid,
        subject: &str,
        revoked_at: DateTime<Utc>,
        retain_until: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO revoked_sessions (session_id, subject, revoked_at, retain_until) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (session_id) DO UPDATE \
             SET retain_until = GREATEST(revoked_sessions.retain_until, EXCLUDED.retain_until)",
        )
        .bind(session_id)
        .bind(subject)
        .bind(revoked_at)
        .bind(retain_until)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke session", e))?;

        debug!(sid = %session_id, subject, "Session revocation recorded");
        Ok(())
    }

    async fn is_session_revoked(&self, session_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM revoked_sessions WHERE session_id = $1)",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to check session revocation", e)
        })
    }

    async fn purge_revocations(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let removed = sqlx::query("DELETE FROM revoked_sessions WHERE retain_until < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge revocations", e)
            })?
            .rows_affected();

        if removed > 0 {
            info!(removed, "Purged expired session revocations");
        }
        Ok(removed)
    }
}
