//! Session guard middleware.
//!
//! Runs [`SessionGuard`](review_auth::SessionGuard) on every request,
//! records the verified session in request extensions, and writes the
//! resulting cookie changes onto the response.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use review_auth::{GuardAction, GuardOutcome, RequestContext};
use review_core::config::SessionConfig;

use crate::cookies;
use crate::extractors::VerifiedSession;
use crate::state::AppState;

/// Applies the session guard's decision to the request.
pub async fn session_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &state.config.session;
    let token = cookies::session_token(&jar, config);
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    let outcome = state
        .guard
        .evaluate(&RequestContext {
            path: &path,
            query: query.as_deref(),
            token: token.as_deref(),
        })
        .await;

    let response = match &outcome.action {
        GuardAction::Redirect(location) => Redirect::temporary(location).into_response(),
        GuardAction::Allow => {
            request
                .extensions_mut()
                .insert(VerifiedSession::new(outcome.session.clone()));
            next.run(request).await
        }
    };

    let changes = cookie_changes(&outcome, config, response.headers());
    (changes, response).into_response()
}

/// Cookie changes implied by the outcome. A cookie the handler already set
/// on the response (login, logout) is left to the handler.
fn cookie_changes(outcome: &GuardOutcome, config: &SessionConfig, handled: &HeaderMap) -> CookieJar {
    let mut out = CookieJar::new();

    if !sets_cookie(handled, &config.cookie_name) {
        if let Some(token) = &outcome.refreshed {
            out = cookies::set_session(out, config, token);
        } else if outcome.clear_session {
            out = cookies::clear_session(out, config);
        }
    }

    if !sets_cookie(handled, &config.redirect_cookie_name) {
        if let Some(intent) = &outcome.redirect_intent {
            out = cookies::set_redirect_intent(out, config, intent);
        } else if outcome.clear_redirect_intent {
            out = cookies::clear_redirect_intent(out, config);
        }
    }

    out
}

fn sets_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split_once('=').is_some_and(|(n, _)| n.trim() == name))
}
