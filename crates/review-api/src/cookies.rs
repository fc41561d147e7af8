//! Session and redirect-intent cookies.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use review_auth::{RedirectIntent, SessionToken};
use review_core::config::SessionConfig;

/// Reads the session token.
pub fn session_token(jar: &CookieJar, config: &SessionConfig) -> Option<String> {
    jar.get(&config.cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Sets the session token.
pub fn set_session(jar: CookieJar, config: &SessionConfig, token: &SessionToken) -> CookieJar {
    jar.add(
        Cookie::build((config.cookie_name.clone(), token.token.clone()))
            .http_only(true)
            .secure(config.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::days(config.cookie_max_age_days))
            .build(),
    )
}

/// Removes the session token.
pub fn clear_session(jar: CookieJar, config: &SessionConfig) -> CookieJar {
    jar.add(removal(&config.cookie_name))
}

/// Reads the redirect intent. Undecodable values are ignored.
pub fn redirect_intent(jar: &CookieJar, config: &SessionConfig) -> Option<RedirectIntent> {
    jar.get(&config.redirect_cookie_name)
        .and_then(|c| RedirectIntent::from_json(c.value()).ok())
}

/// Stores a redirect intent.
pub fn set_redirect_intent(
    jar: CookieJar,
    config: &SessionConfig,
    intent: &RedirectIntent,
) -> CookieJar {
    let Ok(value) = intent.to_json() else {
        return jar;
    };
    jar.add(
        Cookie::build((config.redirect_cookie_name.clone(), value))
            .http_only(true)
            .secure(config.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::seconds(config.redirect_intent_ttl_seconds))
            .build(),
    )
}

/// Removes the redirect intent.
pub fn clear_redirect_intent(jar: CookieJar, config: &SessionConfig) -> CookieJar {
    jar.add(removal(&config.redirect_cookie_name))
}

fn removal(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
