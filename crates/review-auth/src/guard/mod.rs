//! Per-request session decisions.
//!
//! [`SessionGuard::evaluate`] looks at the request path and the carried
//! session token and decides whether the request proceeds, where it is
//! redirected, and which cookies change on the way out. The HTTP adapter
//! in the API crate applies the outcome.

pub mod path;

pub use path::{PathClass, canonical_course_path};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::identity::Identity;
use crate::redirect::RedirectIntent;
use crate::token::{Claims, RevocationList, SessionToken, TokenCodec, TokenError};

/// What the guard needs to know about an inbound request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Request path.
    pub path: &'a str,
    /// Raw query string, without `?`.
    pub query: Option<&'a str>,
    /// Session token from the session cookie.
    pub token: Option<&'a str>,
}

/// Whether the request proceeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardAction {
    /// Hand the request to the router.
    Allow,
    /// Answer with a redirect to the given location.
    Redirect(String),
}

/// Decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    /// Allow or redirect.
    pub action: GuardAction,
    /// Claims of the verified (possibly just refreshed) session.
    pub session: Option<Claims>,
    /// Replacement token to set on the response.
    pub refreshed: Option<SessionToken>,
    /// Remove the session cookie.
    pub clear_session: bool,
    /// Remove the redirect-intent cookie.
    pub clear_redirect_intent: bool,
    /// Redirect intent to store on the response.
    pub redirect_intent: Option<RedirectIntent>,
}

impl GuardOutcome {
    fn allow() -> Self {
        Self {
            action: GuardAction::Allow,
            session: None,
            refreshed: None,
            clear_session: false,
            clear_redirect_intent: false,
            redirect_intent: None,
        }
    }

    fn redirect(mut self, location: impl Into<String>) -> Self {
        self.action = GuardAction::Redirect(location.into());
        self
    }

    /// Identity of the verified session, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.session.as_ref().map(Claims::identity)
    }

    /// Whether the request was allowed through.
    pub fn is_allowed(&self) -> bool {
        self.action == GuardAction::Allow
    }
}

/// Result of looking at the carried token.
enum Verified {
    Anonymous,
    Valid(Claims),
    Refreshed(SessionToken),
    /// Expired past the refresh window, or revoked.
    Stale,
    /// Forged, corrupt, or unparseable.
    Corrupt,
}

/// Decides what happens to each request based on its path and session.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    codec: TokenCodec,
    revocations: RevocationList,
    development: bool,
}

impl SessionGuard {
    /// Creates a guard. `development` opens the dev-only endpoints.
    pub fn new(codec: TokenCodec, revocations: RevocationList, development: bool) -> Self {
        Self {
            codec,
            revocations,
            development,
        }
    }

    /// Evaluates a request against the current time.
    pub async fn evaluate(&self, ctx: &RequestContext<'_>) -> GuardOutcome {
        self.evaluate_at(ctx, Utc::now()).await
    }

    /// Evaluates a request as of `now`. The first rule that redirects wins.
    pub async fn evaluate_at(&self, ctx: &RequestContext<'_>, now: DateTime<Utc>) -> GuardOutcome {
        let class = PathClass::classify(ctx.path);
        let mut outcome = GuardOutcome::allow();

        if class == PathClass::DevOnly && !self.development {
            debug!(path = ctx.path, "Dev-only endpoint outside development");
            return outcome.redirect("/");
        }

        match self.verify(ctx.token, now).await {
            Verified::Anonymous => {}
            Verified::Valid(claims) => outcome.session = Some(claims),
            Verified::Refreshed(token) => {
                outcome.session = Some(token.claims.clone());
                outcome.refreshed = Some(token);
            }
            Verified::Stale => outcome.clear_session = true,
            Verified::Corrupt => {
                outcome.clear_session = true;
                outcome.clear_redirect_intent = true;
            }
        }

        match class {
            PathClass::Login if outcome.session.is_some() => {
                return outcome.redirect("/");
            }
            PathClass::AuthRequired if outcome.session.is_none() => {
                outcome.redirect_intent = Some(RedirectIntent::capture(ctx.path, ctx.query));
                outcome.clear_redirect_intent = false;
                return outcome.redirect("/login");
            }
            PathClass::AdminScoped if !outcome.session.as_ref().is_some_and(|c| c.adm) => {
                debug!(path = ctx.path, "Admin scope denied");
                return outcome.redirect("/");
            }
            _ => {}
        }

        if let Some(canonical) = canonical_course_path(ctx.path) {
            let location = match ctx.query {
                Some(q) if !q.is_empty() => format!("{canonical}?{q}"),
                _ => canonical,
            };
            return outcome.redirect(location);
        }

        outcome
    }

    async fn verify(&self, token: Option<&str>, now: DateTime<Utc>) -> Verified {
        let Some(token) = token else {
            return Verified::Anonymous;
        };

        match self.codec.verify_at(token, now) {
            Ok(claims) => match self.revocation_state(&claims).await {
                Some(false) => Verified::Valid(claims),
                Some(true) => Verified::Stale,
                None => Verified::Anonymous,
            },
            Err(TokenError::Expired(expired)) => {
                match self.revocation_state(expired.claims()).await {
                    Some(false) => {}
                    Some(true) => return Verified::Stale,
                    None => return Verified::Anonymous,
                }
                match self.codec.refresh_at(expired, now) {
                    Ok(token) => Verified::Refreshed(token),
                    Err(e) => {
                        debug!(error = %e, "Expired session not refreshed");
                        Verified::Stale
                    }
                }
            }
            Err(e) => {
                debug!(error = %e, "Discarding unusable session token");
                Verified::Corrupt
            }
        }
    }

    /// `None` when the revocation list could not be consulted. The request
    /// then proceeds unauthenticated and the cookie is left alone.
    async fn revocation_state(&self, claims: &Claims) -> Option<bool> {
        match self.revocations.is_revoked(claims).await {
            Ok(revoked) => Some(revoked),
            Err(e) => {
                warn!(error = %e, sid = %claims.sid, "Revocation check failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use review_cache::MemoryCacheProvider;
    use review_core::config::{AuthConfig, CacheConfig, SessionConfig};
    use review_database::MemorySessionRevocationStore;

    struct Fixture {
        guard: SessionGuard,
        codec: TokenCodec,
        revocations: RevocationList,
    }

    fn fixture(development: bool) -> Fixture {
        let session = SessionConfig::default();
        let codec = TokenCodec::new(&AuthConfig::default(), &session);
        let revocations = RevocationList::new(
            Arc::new(MemorySessionRevocationStore::new()),
            Arc::new(MemoryCacheProvider::new(&CacheConfig::default())),
            &codec,
        );
        Fixture {
            guard: SessionGuard::new(codec.clone(), revocations.clone(), development),
            codec,
            revocations,
        }
    }

    fn identity(is_admin: bool) -> Identity {
        Identity {
            subject: "902000001".to_string(),
            username: None,
            is_admin,
        }
    }

    fn ctx<'a>(path: &'a str, query: Option<&'a str>, token: Option<&'a str>) -> RequestContext<'a> {
        RequestContext { path, query, token }
    }

    #[tokio::test]
    async fn test_public_path_without_session_is_allowed() {
        let f = fixture(false);
        let outcome = f.guard.evaluate(&ctx("/", None, None)).await;
        assert!(outcome.is_allowed());
        assert!(outcome.session.is_none());
        assert!(!outcome.clear_session);
    }

    #[tokio::test]
    async fn test_dev_only_outside_development() {
        let outcome = fixture(false)
            .guard
            .evaluate(&ctx("/api/services/seed", None, None))
            .await;
        assert_eq!(outcome.action, GuardAction::Redirect("/".to_string()));

        let outcome = fixture(true)
            .guard
            .evaluate(&ctx("/api/services/seed", None, None))
            .await;
        assert!(outcome.is_allowed());
    }

    #[tokio::test]
    async fn test_login_page_with_session_goes_home() {
        let f = fixture(false);
        let token = f.codec.issue(&identity(false)).unwrap();
        let outcome = f
            .guard
            .evaluate(&ctx("/login", None, Some(&token.token)))
            .await;
        assert_eq!(outcome.action, GuardAction::Redirect("/".to_string()));

        let outcome = f.guard.evaluate(&ctx("/sign-up", None, None)).await;
        assert!(outcome.is_allowed());
    }

    #[tokio::test]
    async fn test_auth_required_stores_intent() {
        let f = fixture(false);
        let outcome = f
            .guard
            .evaluate(&ctx("/reviews/new", Some("course=CS6200"), None))
            .await;
        assert_eq!(outcome.action, GuardAction::Redirect("/login".to_string()));
        assert_eq!(
            outcome.redirect_intent,
            Some(RedirectIntent {
                pathname: "/reviews/new".to_string(),
                search: "?course=CS6200".to_string(),
            })
        );

        let token = f.codec.issue(&identity(false)).unwrap();
        let outcome = f
            .guard
            .evaluate(&ctx("/reviews/new", None, Some(&token.token)))
            .await;
        assert!(outcome.is_allowed());
        assert!(outcome.redirect_intent.is_none());
    }

    #[tokio::test]
    async fn test_admin_scope_denials_look_alike() {
        let f = fixture(false);
        let user = f.codec.issue(&identity(false)).unwrap();

        let anonymous = f.guard.evaluate(&ctx("/admin", None, None)).await;
        let non_admin = f
            .guard
            .evaluate(&ctx("/admin", None, Some(&user.token)))
            .await;
        assert_eq!(anonymous.action, GuardAction::Redirect("/".to_string()));
        assert_eq!(anonymous.action, non_admin.action);
        assert_eq!(anonymous.refreshed, non_admin.refreshed);
        assert_eq!(anonymous.clear_session, non_admin.clear_session);

        let admin = f.codec.issue(&identity(true)).unwrap();
        let outcome = f
            .guard
            .evaluate(&ctx("/api/admin/review/accept", Some("id=1"), Some(&admin.token)))
            .await;
        assert!(outcome.is_allowed());
        assert_eq!(outcome.identity(), Some(identity(true)));
    }

    #[tokio::test]
    async fn test_expired_session_is_refreshed_and_used() {
        let f = fixture(false);
        let now = Utc::now();
        let old = f
            .codec
            .issue_at(&identity(true), now - Duration::hours(3))
            .unwrap();

        let outcome = f
            .guard
            .evaluate_at(&ctx("/admin", None, Some(&old.token)), now)
            .await;
        assert!(outcome.is_allowed());
        let refreshed = outcome.refreshed.as_ref().unwrap();
        assert_eq!(refreshed.claims.sid, old.claims.sid);
        assert!(refreshed.claims.exp > old.claims.exp);
        assert_eq!(outcome.session.as_ref(), Some(&refreshed.claims));
    }

    #[tokio::test]
    async fn test_refresh_rides_along_with_redirects() {
        let f = fixture(false);
        let now = Utc::now();
        let old = f
            .codec
            .issue_at(&identity(false), now - Duration::hours(3))
            .unwrap();

        let outcome = f
            .guard
            .evaluate_at(&ctx("/login", None, Some(&old.token)), now)
            .await;
        assert_eq!(outcome.action, GuardAction::Redirect("/".to_string()));
        assert!(outcome.refreshed.is_some());
    }

    #[tokio::test]
    async fn test_corrupt_token_clears_cookies() {
        let f = fixture(false);
        let outcome = f
            .guard
            .evaluate(&ctx("/", None, Some("definitely.not.valid")))
            .await;
        assert!(outcome.is_allowed());
        assert!(outcome.session.is_none());
        assert!(outcome.clear_session);
        assert!(outcome.clear_redirect_intent);
        assert!(outcome.refreshed.is_none());
    }

    #[tokio::test]
    async fn test_forged_expired_token_is_not_refreshed() {
        let f = fixture(false);
        let forger = TokenCodec::new(
            &AuthConfig {
                token_secret: "attacker".to_string(),
                ..AuthConfig::default()
            },
            &SessionConfig::default(),
        );
        let now = Utc::now();
        let forged = forger
            .issue_at(&identity(true), now - Duration::hours(3))
            .unwrap();

        let outcome = f
            .guard
            .evaluate_at(&ctx("/admin", None, Some(&forged.token)), now)
            .await;
        assert_eq!(outcome.action, GuardAction::Redirect("/".to_string()));
        assert!(outcome.refreshed.is_none());
        assert!(outcome.clear_session);
    }

    #[tokio::test]
    async fn test_revoked_session_is_anonymous() {
        let f = fixture(false);
        let token = f.codec.issue(&identity(true)).unwrap();
        f.revocations.revoke(&token.claims).await.unwrap();

        let outcome = f
            .guard
            .evaluate(&ctx("/admin", None, Some(&token.token)))
            .await;
        assert_eq!(outcome.action, GuardAction::Redirect("/".to_string()));
        assert!(outcome.session.is_none());
        assert!(outcome.clear_session);
    }

    #[tokio::test]
    async fn test_canonical_redirect_after_auth_checks() {
        let f = fixture(false);
        let outcome = f
            .guard
            .evaluate(&ctx("/courses/cs6200/reviews", Some("page=2"), None))
            .await;
        assert_eq!(
            outcome.action,
            GuardAction::Redirect("/courses/CS6200/reviews?page=2".to_string())
        );

        let outcome = f
            .guard
            .evaluate(&ctx("/courses/CS6200/reviews", None, None))
            .await;
        assert!(outcome.is_allowed());
    }
}
