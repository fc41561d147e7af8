//! Request parameters.

use serde::Deserialize;

use review_core::error::AppError;
use review_entity::review::ReviewId;

/// Extracts the single `id` parameter of a moderation action.
///
/// A missing or empty `id` is "No ID provided"; a repeated one is
/// "Invalid ID".
pub fn single_review_id(params: &[(String, String)]) -> Result<ReviewId, AppError> {
    let ids: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "id")
        .map(|(_, value)| value.as_str())
        .collect();

    match ids.as_slice() {
        [] => Err(AppError::validation("No ID provided")),
        [id] if id.trim().is_empty() => Err(AppError::validation("No ID provided")),
        [id] => Ok(ReviewId::from(*id)),
        _ => Err(AppError::validation("Invalid ID")),
    }
}

/// `?limit=` for listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Requested number of items.
    pub limit: Option<i64>,
}

/// Identity provider callback parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code.
    pub code: Option<String>,
    /// Error reported by the provider.
    pub error: Option<String>,
}
