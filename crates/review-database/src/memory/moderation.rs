//! In-memory moderation store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info, warn};

use review_core::result::AppResult;
use review_entity::review::{NewStagedReview, PublishedReview, ReviewId, StagedReview};

use crate::store::ModerationStore;

/// Process-local moderation store.
///
/// Single-winner resolution comes from `DashMap::remove`, which hands the
/// previous value to exactly one caller. Publication is keyed by the staged
/// id, so a staged review can be published at most once.
#[derive(Debug, Default)]
pub struct MemoryModerationStore {
    /// Pending reviews by staged id.
    staged: DashMap<ReviewId, StagedReview>,
    /// Published reviews by published id.
    published: DashMap<ReviewId, PublishedReview>,
    /// Staged id -> published id.
    published_by_staged: DashMap<ReviewId, ReviewId>,
}

impl MemoryModerationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with existing records.
    ///
    /// Overlapping records (a staged review whose id is also the `staged_id`
    /// of a published one) are accepted as-is; they model the state left by
    /// an interrupted promotion and are cleaned up by `reconcile`.
    pub fn with_records(staged: Vec<StagedReview>, published: Vec<PublishedReview>) -> Self {
        let store = Self::new();
        for review in staged {
            store.staged.insert(review.id.clone(), review);
        }
        for review in published {
            store
                .published_by_staged
                .insert(review.staged_id.clone(), review.id.clone());
            store.published.insert(review.id.clone(), review);
        }
        store
    }

    fn is_published(&self, staged_id: &ReviewId) -> bool {
        self.published_by_staged.contains_key(staged_id)
    }
}

#[async_trait]
impl ModerationStore for MemoryModerationStore {
    async fn stage_review(&self, review: NewStagedReview) -> AppResult<StagedReview> {
        let staged = review.into_staged(Utc::now());
        self.staged.insert(staged.id.clone(), staged.clone());
        debug!(review_id = %staged.id, course = %staged.course_ref, "Review staged");
        Ok(staged)
    }

    async fn list_staged(&self, limit: i64) -> AppResult<Vec<StagedReview>> {
        let mut reviews: Vec<StagedReview> = self
            .staged
            .iter()
            .filter(|entry| !self.is_published(entry.key()))
            .map(|entry| entry.value().clone())
            .collect();
        reviews.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        reviews.truncate(limit.max(0) as usize);
        Ok(reviews)
    }

    async fn find_staged(&self, id: &ReviewId) -> AppResult<Option<StagedReview>> {
        if self.is_published(id) {
            return Ok(None);
        }
        Ok(self.staged.get(id).map(|entry| entry.value().clone()))
    }

    async fn promote(&self, id: &ReviewId) -> AppResult<Option<PublishedReview>> {
        let Some((_, staged)) = self.staged.remove(id) else {
            return Ok(None);
        };

        match self.published_by_staged.entry(staged.id.clone()) {
            Entry::Occupied(_) => {
                warn!(staged_id = %id, "Removed stale staged copy of a published review");
                Ok(None)
            }
            Entry::Vacant(slot) => {
                let review = PublishedReview::from_staged(staged, Utc::now());
                slot.insert(review.id.clone());
                self.published.insert(review.id.clone(), review.clone());
                info!(staged_id = %id, published_id = %review.id, "Review promoted");
                Ok(Some(review))
            }
        }
    }

    async fn discard(&self, id: &ReviewId) -> AppResult<bool> {
        let removed = self.staged.remove(id).is_some();
        if removed && self.is_published(id) {
            warn!(staged_id = %id, "Removed stale staged copy of a published review");
            return Ok(false);
        }
        Ok(removed)
    }

    async fn list_published(&self, limit: i64) -> AppResult<Vec<PublishedReview>> {
        let mut reviews: Vec<PublishedReview> = self
            .published
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        reviews.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        reviews.truncate(limit.max(0) as usize);
        Ok(reviews)
    }

    async fn find_published_by_staged(
        &self,
        staged_id: &ReviewId,
    ) -> AppResult<Option<PublishedReview>> {
        let Some(published_id) = self
            .published_by_staged
            .get(staged_id)
            .map(|entry| entry.value().clone())
        else {
            return Ok(None);
        };
        Ok(self
            .published
            .get(&published_id)
            .map(|entry| entry.value().clone()))
    }

    async fn reconcile(&self) -> AppResult<u64> {
        let stale: Vec<ReviewId> = self
            .staged
            .iter()
            .filter(|entry| self.is_published(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0u64;
        for id in stale {
            if self.staged.remove(&id).is_some() {
                removed += 1;
            }
        }

        if removed > 0 {
            warn!(removed, "Removed stale staged copies of published reviews");
        }
        Ok(removed)
    }
}
