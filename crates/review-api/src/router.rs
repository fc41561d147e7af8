//! Route definitions for the Course Review HTTP API.
//!
//! All API routes are mounted under `/api`. Page paths (`/login`,
//! `/reviews/new`, `/courses/...`) belong to the front end; the session
//! guard still runs for them, and requests it allows through end in the
//! fallback.

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::error::ApiErrorResponse;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(review_routes())
        .merge(admin_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::session_guard,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors::build_cors_layer(&state.config.server))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Login completion and logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/callback/{provider}", get(handlers::auth::callback))
        .route("/auth/logout", get(handlers::auth::logout))
}

/// Review submission
fn review_routes() -> Router<AppState> {
    Router::new().route("/reviews", post(handlers::review::submit))
}

/// Moderation queue
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/reviews", get(handlers::admin::reviews::list_pending))
        .route("/admin/review/accept", get(handlers::admin::reviews::accept))
        .route("/admin/review/reject", get(handlers::admin::reviews::reject))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        axum::Json(ApiErrorResponse::new("Not found")),
    )
}
