//! Request path classification.

/// How the session guard treats a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathClass {
    /// No session requirements.
    Public,
    /// Login and sign-up pages; signed-in users are sent home.
    Login,
    /// Pages that need a signed-in user.
    AuthRequired,
    /// Administrator pages and APIs.
    AdminScoped,
    /// Service endpoints only reachable in development.
    DevOnly,
}

const DEV_ONLY_PREFIX: &str = "/api/services";
const LOGIN_PATHS: &[&str] = &["/login", "/sign-up"];
const AUTH_REQUIRED_PATHS: &[&str] = &["/reviews/new"];

impl PathClass {
    /// Classifies a request path.
    pub fn classify(path: &str) -> Self {
        if path.starts_with(DEV_ONLY_PREFIX) {
            Self::DevOnly
        } else if LOGIN_PATHS.contains(&path) {
            Self::Login
        } else if AUTH_REQUIRED_PATHS.contains(&path) {
            Self::AuthRequired
        } else if is_admin_path(path) {
            Self::AdminScoped
        } else {
            Self::Public
        }
    }
}

fn is_admin_path(path: &str) -> bool {
    ["/admin", "/api/admin"]
        .iter()
        .any(|root| path == *root || path.strip_prefix(root).is_some_and(|rest| rest.starts_with('/')))
}

/// Returns the canonical form of a course reviews path when `path` is one
/// and its course slug is not upper-case.
///
/// `/courses/cs6200/reviews` becomes `/courses/CS6200/reviews`.
pub fn canonical_course_path(path: &str) -> Option<String> {
    let mut segments = path.strip_prefix('/')?.split('/');
    let (Some("courses"), Some(slug), Some("reviews"), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let upper = slug.to_uppercase();
    if slug.is_empty() || upper == slug {
        return None;
    }
    Some(format!("/courses/{upper}/reviews"))
}
