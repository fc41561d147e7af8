//! In-memory session revocation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use review_core::result::AppResult;

use crate::store::SessionRevocationStore;

/// Process-local revocation records. Entries are only removed by
/// `purge_revocations`, never by capacity pressure.
#[derive(Debug, Default)]
pub struct MemorySessionRevocationStore {
    /// Session id -> end of retention.
    revoked: DashMap<Uuid, DateTime<Utc>>,
}

impl MemorySessionRevocationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently recorded as revoked.
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    /// Whether no session is recorded as revoked.
    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[async_trait]
impl SessionRevocationStore for MemorySessionRevocationStore {
    async fn revoke_session(
        &self,
        session_id: Uuid,
        subject: &str,
        _revoked_at: DateTime<Utc>,
        retain_until: DateTime<Utc>,
    ) -> AppResult<()> {
        self.revoked
            .entry(session_id)
            .and_modify(|until| *until = (*until).max(retain_until))
            .or_insert(retain_until);
        debug!(sid = %session_id, subject, "Session revocation recorded");
        Ok(())
    }

    async fn is_session_revoked(&self, session_id: Uuid) -> AppResult<bool> {
        Ok(self.revoked.contains_key(&session_id))
    }

    async fn purge_revocations(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let before = self.revoked.len();
        self.revoked.retain(|_, until| *until >= now);
        Ok((before - self.revoked.len()) as u64)
    }
}
