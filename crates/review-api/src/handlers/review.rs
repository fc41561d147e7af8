//! Review submission handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use review_service::ReviewSubmission;

use crate::dto::response::IdResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/reviews
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(submission): Json<ReviewSubmission>,
) -> ApiResult<(StatusCode, Json<IdResponse>)> {
    let staged = state.moderation.submit(user.identity(), submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(IdResponse {
            id: staged.id.into_inner(),
        }),
    ))
}
