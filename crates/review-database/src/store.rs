//! Persistence contracts for the moderation pipeline and session
//! revocation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use review_core::result::AppResult;
use review_entity::review::{NewStagedReview, PublishedReview, ReviewId, StagedReview};

/// Storage for the two review sets: the staging queue and the published set.
///
/// Implementations must make `promote` and `discard` single-winner: when two
/// callers resolve the same staged review concurrently, at most one of them
/// observes the review. A staged review that already has a published
/// counterpart (left behind by an interrupted promotion) is stale: it is
/// invisible to `find_staged`/`list_staged`, never published again, and
/// removed by `reconcile` or by any attempt to resolve it.
#[async_trait]
pub trait ModerationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new review into the staging queue.
    async fn stage_review(&self, review: NewStagedReview) -> AppResult<StagedReview>;

    /// List pending reviews, newest first.
    async fn list_staged(&self, limit: i64) -> AppResult<Vec<StagedReview>>;

    /// Find a pending review by id.
    async fn find_staged(&self, id: &ReviewId) -> AppResult<Option<StagedReview>>;

    /// Move a staged review into the published set under a new id.
    ///
    /// Returns `None` if the review is not (or no longer) pending.
    async fn promote(&self, id: &ReviewId) -> AppResult<Option<PublishedReview>>;

    /// Drop a staged review. Returns `false` if it was not pending.
    async fn discard(&self, id: &ReviewId) -> AppResult<bool>;

    /// List published reviews, most recently published first.
    async fn list_published(&self, limit: i64) -> AppResult<Vec<PublishedReview>>;

    /// Find the published copy of a staged review, if one exists.
    async fn find_published_by_staged(
        &self,
        staged_id: &ReviewId,
    ) -> AppResult<Option<PublishedReview>>;

    /// Remove stale staged copies of already-published reviews.
    ///
    /// Returns the number of staged rows removed.
    async fn reconcile(&self) -> AppResult<u64>;
}

/// Durable record of login sessions ended by logout.
///
/// Revocations are keyed by session id and must survive restarts and
/// cache eviction: a session stays revoked at least until `retain_until`,
/// after which no token of that session can authenticate or refresh.
#[async_trait]
pub trait SessionRevocationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Record the session as revoked. Revoking twice keeps the later
    /// retention.
    async fn revoke_session(
        &self,
        session_id: Uuid,
        subject: &str,
        revoked_at: DateTime<Utc>,
        retain_until: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Whether the session has been revoked.
    async fn is_session_revoked(&self, session_id: Uuid) -> AppResult<bool>;

    /// Forget revocations whose retention ended before `now`.
    ///
    /// Returns the number of records removed.
    async fn purge_revocations(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
