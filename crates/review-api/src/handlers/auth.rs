//! Login completion and logout.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use crate::cookies;
use crate::dto::request::CallbackQuery;
use crate::extractors::VerifiedSession;
use crate::state::AppState;

/// GET /api/auth/callback/{provider}
///
/// Exchanges the authorization code, issues the session cookie, and sends
/// the user to the page they originally asked for. The redirect intent is
/// consumed only when login succeeds.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Response {
    let config = &state.config.session;

    if provider != state.identity_provider.name() {
        warn!(provider = %provider, "Callback for unknown identity provider");
        return Redirect::to("/login").into_response();
    }
    if let Some(error) = &query.error {
        warn!(provider = %provider, error = %error, "Identity provider reported an error");
        return Redirect::to("/login").into_response();
    }
    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return Redirect::to("/login").into_response();
    };

    let profile = match state.identity_provider.exchange(code).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(provider = %provider, error = %e, "Identity exchange failed");
            return Redirect::to("/login").into_response();
        }
    };

    let identity = profile.into_identity(&state.config.auth);
    let token = match state.codec.issue(&identity) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "Failed to issue session token");
            return Redirect::to("/login").into_response();
        }
    };

    let target = cookies::redirect_intent(&jar, config)
        .map(|intent| intent.target())
        .unwrap_or_else(|| "/".to_string());

    info!(
        subject = %identity.subject,
        admin = identity.is_admin,
        sid = %token.claims.sid,
        "User logged in"
    );

    let jar = cookies::set_session(jar, config, &token);
    let jar = cookies::clear_redirect_intent(jar, config);
    (jar, Redirect::to(&target)).into_response()
}

/// GET /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    session: VerifiedSession,
    jar: CookieJar,
) -> Response {
    if let Some(claims) = session.claims() {
        match state.revocations.revoke(claims).await {
            Ok(()) => info!(subject = %claims.sub, sid = %claims.sid, "User logged out"),
            Err(e) => warn!(error = %e, sid = %claims.sid, "Failed to revoke session"),
        }
    }

    let jar = cookies::clear_session(jar, &state.config.session);
    (jar, Redirect::to("/")).into_response()
}
