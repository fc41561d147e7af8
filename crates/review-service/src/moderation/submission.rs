//! Incoming review submissions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use review_core::error::AppError;
use review_entity::review::{NewStagedReview, Term};

/// A review as submitted by a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    /// Course the review is about.
    #[validate(length(min = 1, max = 32, message = "Course is required"))]
    pub course_ref: String,
    /// Review text.
    #[validate(length(min = 1, message = "Review body is required"))]
    pub body: String,
    /// Overall rating.
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    /// Workload rating.
    #[validate(range(min = 1, max = 5, message = "Workload must be between 1 and 5"))]
    pub workload: Option<i16>,
    /// Difficulty rating.
    #[validate(range(min = 1, max = 5, message = "Difficulty must be between 1 and 5"))]
    pub difficulty: Option<i16>,
    /// Term in which the course was taken.
    pub term: Option<Term>,
    /// Semester date.
    pub semester_date: Option<NaiveDate>,
}

impl ReviewSubmission {
    /// Validates the submission and attaches the author.
    pub fn into_new_review(self, author_ref: &str) -> Result<NewStagedReview, AppError> {
        self.validate().map_err(validation_error)?;
        Ok(NewStagedReview {
            course_ref: self.course_ref.trim().to_uppercase(),
            body: self.body,
            rating: self.rating,
            workload: self.workload,
            difficulty: self.difficulty,
            term: self.term,
            semester_date: self.semester_date,
            author_ref: author_ref.to_string(),
        })
    }
}

/// Reports the first failing field, in field-name order.
fn validation_error(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let message = fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}"))
            })
        })
        .unwrap_or_else(|| "Invalid review".to_string());
    AppError::validation(message)
}
