//! Moderation workflow over the staging queue.

use std::sync::Arc;

use tracing::{info, warn};

use review_auth::{AdminIdentity, Identity};
use review_core::config::ModerationConfig;
use review_core::error::AppError;
use review_core::result::AppResult;
use review_database::ModerationStore;
use review_entity::review::{PublishedReview, ReviewId, StagedReview};

use super::submission::ReviewSubmission;

/// Moves staged reviews to their terminal state.
///
/// Every staged review ends up either published or discarded, exactly
/// once. Resolving a review that is unknown, already resolved, or only a
/// stale leftover of a published review reports "not found".
#[derive(Debug, Clone)]
pub struct ModerationService {
    store: Arc<dyn ModerationStore>,
    config: ModerationConfig,
}

impl ModerationService {
    /// Creates a new moderation service.
    pub fn new(store: Arc<dyn ModerationStore>, config: ModerationConfig) -> Self {
        Self { store, config }
    }

    /// Stages a review written by a signed-in user.
    pub async fn submit(
        &self,
        author: &Identity,
        submission: ReviewSubmission,
    ) -> AppResult<StagedReview> {
        let review = submission.into_new_review(&author.subject)?;
        let staged = self.store.stage_review(review).await?;
        info!(
            review_id = %staged.id,
            course = %staged.course_ref,
            author = %author.subject,
            "Review submitted for moderation"
        );
        Ok(staged)
    }

    /// Lists the pending queue, newest first.
    ///
    /// Stale staged copies of published reviews are cleaned up first so
    /// they never show up as pending.
    pub async fn pending(
        &self,
        admin: &AdminIdentity,
        limit: Option<i64>,
    ) -> AppResult<Vec<StagedReview>> {
        let removed = self.store.reconcile().await?;
        if removed > 0 {
            warn!(removed, admin = %admin.subject(), "Reconciled moderation queue");
        }
        self.store.list_staged(self.config.clamp_limit(limit)).await
    }

    /// Publishes a staged review.
    pub async fn accept(&self, admin: &AdminIdentity, id: &ReviewId) -> AppResult<PublishedReview> {
        self.require_pending(id).await?;

        let published = self.store.promote(id).await?.ok_or_else(not_found)?;
        info!(
            staged_id = %id,
            published_id = %published.id,
            admin = %admin.subject(),
            "Review accepted"
        );
        Ok(published)
    }

    /// Discards a staged review.
    pub async fn reject(&self, admin: &AdminIdentity, id: &ReviewId) -> AppResult<()> {
        self.require_pending(id).await?;

        if !self.store.discard(id).await? {
            return Err(not_found());
        }
        info!(staged_id = %id, admin = %admin.subject(), "Review rejected");
        Ok(())
    }

    async fn require_pending(&self, id: &ReviewId) -> AppResult<StagedReview> {
        self.store.find_staged(id).await?.ok_or_else(not_found)
    }
}

fn not_found() -> AppError {
    AppError::not_found("Review not found")
}
