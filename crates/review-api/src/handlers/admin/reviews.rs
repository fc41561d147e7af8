//! Review moderation handlers.

use axum::Json;
use axum::extract::{Query, State};

use review_entity::review::StagedReview;

use crate::dto::request::{ListQuery, single_review_id};
use crate::dto::response::IdResponse;
use crate::error::ApiResult;
use crate::extractors::AdminUser;
use crate::state::AppState;

/// GET /api/admin/reviews?limit=N
pub async fn list_pending(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<StagedReview>>> {
    let reviews = state.moderation.pending(&admin, query.limit).await?;
    Ok(Json(reviews))
}

/// GET /api/admin/review/accept?id=
pub async fn accept(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<IdResponse>> {
    let id = single_review_id(&params)?;
    state.moderation.accept(&admin, &id).await?;
    Ok(Json(IdResponse {
        id: id.into_inner(),
    }))
}

/// GET /api/admin/review/reject?id=
pub async fn reject(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<IdResponse>> {
    let id = single_review_id(&params)?;
    state.moderation.reject(&admin, &id).await?;
    Ok(Json(IdResponse {
        id: id.into_inner(),
    }))
}
