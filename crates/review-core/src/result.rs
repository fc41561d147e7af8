//! Convenience result type alias for Course Review.

use crate::error::AppError;

/// A specialized `Result` type for Course Review operations.
pub type AppResult<T> = Result<T, AppError>;
