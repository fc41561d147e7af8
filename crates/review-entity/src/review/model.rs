//! Staged and published review models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::id::ReviewId;
use super::term::Term;

/// A submitted review waiting for an administrator's verdict.
///
/// Staged reviews are never edited. Resolving one (accept or reject)
/// removes it from the staging set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StagedReview {
    /// Staging identifier.
    pub id: ReviewId,
    /// Course the review is about (catalog slug).
    pub course_ref: String,
    /// Free-form review text.
    pub body: String,
    /// Overall rating, 1 to 5.
    pub rating: Option<i16>,
    /// Workload rating, 1 to 5.
    pub workload: Option<i16>,
    /// Difficulty rating, 1 to 5.
    pub difficulty: Option<i16>,
    /// Term in which the course was taken.
    pub term: Option<Term>,
    /// Date of the semester the course was taken.
    pub semester_date: Option<NaiveDate>,
    /// Opaque reference to the author's external account.
    pub author_ref: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// A review visible to everyone.
///
/// Created exactly once per staged review; `staged_id` is unique so a
/// staged review can never be published twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublishedReview {
    /// Published identifier (never reused).
    pub id: ReviewId,
    /// The staged review this was promoted from.
    pub staged_id: ReviewId,
    /// Course the review is about (catalog slug).
    pub course_ref: String,
    /// Free-form review text.
    pub body: String,
    /// Overall rating, 1 to 5.
    pub rating: Option<i16>,
    /// Workload rating, 1 to 5.
    pub workload: Option<i16>,
    /// Difficulty rating, 1 to 5.
    pub difficulty: Option<i16>,
    /// Term in which the course was taken.
    pub term: Option<Term>,
    /// Date of the semester the course was taken.
    pub semester_date: Option<NaiveDate>,
    /// Opaque reference to the author's external account.
    pub author_ref: String,
    /// Original submission time.
    pub created_at: DateTime<Utc>,
    /// When an administrator accepted the review.
    pub published_at: DateTime<Utc>,
}

impl PublishedReview {
    /// Build the published copy of a staged review under a fresh id.
    pub fn from_staged(staged: StagedReview, published_at: DateTime<Utc>) -> Self {
        Self {
            id: ReviewId::generate(),
            staged_id: staged.id,
            course_ref: staged.course_ref,
            body: staged.body,
            rating: staged.rating,
            workload: staged.workload,
            difficulty: staged.difficulty,
            term: staged.term,
            semester_date: staged.semester_date,
            author_ref: staged.author_ref,
            created_at: staged.created_at,
            published_at,
        }
    }
}

/// Data required to stage a new review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStagedReview {
    /// Course the review is about.
    pub course_ref: String,
    /// Free-form review text.
    pub body: String,
    /// Overall rating, 1 to 5.
    pub rating: Option<i16>,
    /// Workload rating, 1 to 5.
    pub workload: Option<i16>,
    /// Difficulty rating, 1 to 5.
    pub difficulty: Option<i16>,
    /// Term in which the course was taken.
    pub term: Option<Term>,
    /// Date of the semester the course was taken.
    pub semester_date: Option<NaiveDate>,
    /// Author's external account reference.
    pub author_ref: String,
}

impl NewStagedReview {
    /// Materialize the staged row with a fresh id and submission time.
    pub fn into_staged(self, created_at: DateTime<Utc>) -> StagedReview {
        StagedReview {
            id: ReviewId::generate(),
            course_ref: self.course_ref,
            body: self.body,
            rating: self.rating,
            workload: self.workload,
            difficulty: self.difficulty,
            term: self.term,
            semester_date: self.semester_date,
            author_ref: self.author_ref,
            created_at,
        }
    }
}
