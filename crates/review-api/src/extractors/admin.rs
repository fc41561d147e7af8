//! `AdminUser` extractor: gates handlers behind the administrator flag.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};

use review_auth::{AdminGate, AdminIdentity};

use super::session::VerifiedSession;

/// Verified administrator.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AdminIdentity);

impl std::ops::Deref for AdminUser {
    type Target = AdminIdentity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection for non-administrators: the same redirect home that the
/// session guard issues for admin-scoped paths.
#[derive(Debug, Clone, Copy)]
pub struct AdminDenied;

impl IntoResponse for AdminDenied {
    fn into_response(self) -> Response {
        Redirect::temporary("/").into_response()
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AdminDenied;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = VerifiedSession::from_parts(parts);
        AdminGate::authorize(session.identity().as_ref())
            .map(AdminUser)
            .map_err(|_| AdminDenied)
    }
}
