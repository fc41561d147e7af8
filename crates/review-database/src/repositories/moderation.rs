//! PostgreSQL implementation of the moderation store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use review_core::error::{AppError, ErrorKind};
use review_core::result::AppResult;
use review_entity::review::{NewStagedReview, PublishedReview, ReviewId, StagedReview};

use crate::store::ModerationStore;

/// Staged rows that have no published counterpart.
const PENDING_FILTER: &str =
    "NOT EXISTS (SELECT 1 FROM reviews r WHERE r.staged_id = s.id)";

/// Repository for the `staged_reviews` and `reviews` tables.
///
/// Promotion runs in a single transaction, so a review is never visible in
/// both tables to other transactions. The `reviews.staged_id` unique
/// constraint backs the "published at most once" rule.
#[derive(Debug, Clone)]
pub struct ModerationRepository {
    pool: PgPool,
}

impl ModerationRepository {
    /// Create a new moderation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl ModerationStore for ModerationRepository {
    async fn stage_review(&self, review: NewStagedReview) -> AppResult<StagedReview> {
        let staged = sqlx::query_as::<_, StagedReview>(
            "INSERT INTO staged_reviews \
             (id, course_ref, body, rating, workload, difficulty, term, semester_date, author_ref, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW()) RETURNING *",
        )
        .bind(ReviewId::generate())
        .bind(&review.course_ref)
        .bind(&review.body)
        .bind(review.rating)
        .bind(review.workload)
        .bind(review.difficulty)
        .bind(review.term)
        .bind(review.semester_date)
        .bind(&review.author_ref)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to stage review"))?;

        debug!(review_id = %staged.id, course = %staged.course_ref, "Review staged");
        Ok(staged)
    }

    async fn list_staged(&self, limit: i64) -> AppResult<Vec<StagedReview>> {
        sqlx::query_as::<_, StagedReview>(&format!(
            "SELECT s.* FROM staged_reviews s WHERE {PENDING_FILTER} \
             ORDER BY s.created_at DESC, s.id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list staged reviews"))
    }

    async fn find_staged(&self, id: &ReviewId) -> AppResult<Option<StagedReview>> {
        sqlx::query_as::<_, StagedReview>(&format!(
            "SELECT s.* FROM staged_reviews s WHERE s.id = $1 AND {PENDING_FILTER}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find staged review"))
    }

    async fn promote(&self, id: &ReviewId) -> AppResult<Option<PublishedReview>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin promotion"))?;

        // The row lock taken by DELETE makes concurrent promote/discard calls
        // on the same id serialize; the loser sees zero rows.
        let staged = sqlx::query_as::<_, StagedReview>(
            "DELETE FROM staged_reviews WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to remove staged review"))?;

        let Some(staged) = staged else {
            tx.rollback()
                .await
                .map_err(db_error("Failed to roll back promotion"))?;
            return Ok(None);
        };

        let published = sqlx::query_as::<_, PublishedReview>(
            "INSERT INTO reviews \
             (id, staged_id, course_ref, body, rating, workload, difficulty, term, semester_date, \
              author_ref, created_at, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW()) \
             ON CONFLICT (staged_id) DO NOTHING RETURNING *",
        )
        .bind(ReviewId::generate())
        .bind(&staged.id)
        .bind(&staged.course_ref)
        .bind(&staged.body)
        .bind(staged.rating)
        .bind(staged.workload)
        .bind(staged.difficulty)
        .bind(staged.term)
        .bind(staged.semester_date)
        .bind(&staged.author_ref)
        .bind(staged.created_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to publish review"))?;

        // Commit either way: a conflict means the staged row was a stale copy
        // of an already-published review, and deleting it is the recovery.
        tx.commit()
            .await
            .map_err(db_error("Failed to commit promotion"))?;

        match &published {
            Some(review) => info!(
                staged_id = %id,
                published_id = %review.id,
                "Review promoted"
            ),
            None => warn!(staged_id = %id, "Removed stale staged copy of a published review"),
        }

        Ok(published)
    }

    async fn discard(&self, id: &ReviewId) -> AppResult<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin discard"))?;

        let deleted: Option<ReviewId> =
            sqlx::query_scalar("DELETE FROM staged_reviews WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to discard staged review"))?;

        let already_published = match deleted {
            Some(_) => sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM reviews WHERE staged_id = $1)",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to check published set"))?,
            None => false,
        };

        tx.commit()
            .await
            .map_err(db_error("Failed to commit discard"))?;

        if already_published {
            warn!(staged_id = %id, "Removed stale staged copy of a published review");
        }

        Ok(deleted.is_some() && !already_published)
    }

    async fn list_published(&self, limit: i64) -> AppResult<Vec<PublishedReview>> {
        sqlx::query_as::<_, PublishedReview>(
            "SELECT * FROM reviews ORDER BY published_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list published reviews"))
    }

    async fn find_published_by_staged(
        &self,
        staged_id: &ReviewId,
    ) -> AppResult<Option<PublishedReview>> {
        sqlx::query_as::<_, PublishedReview>("SELECT * FROM reviews WHERE staged_id = $1")
            .bind(staged_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find published review"))
    }

    async fn reconcile(&self) -> AppResult<u64> {
        let removed = sqlx::query(
            "DELETE FROM staged_reviews s USING reviews r WHERE r.staged_id = s.id",
        )
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to reconcile staged reviews"))?
        .rows_affected();

        if removed > 0 {
            warn!(removed, "Removed stale staged copies of published reviews");
        }
        Ok(removed)
    }
}
