//! # review-auth
//!
//! Session authentication for Course Review.
//!
//! ## Modules
//!
//! - `token`: signed session token issue/verify/refresh and the revocation list
//! - `guard`: per-request path classification and allow/redirect decisions
//! - `gate`: administrator gate in front of moderation operations
//! - `redirect`: single-use "where to go after login" intent
//! - `identity`: verified identity and the external identity exchange

pub mod gate;
pub mod guard;
pub mod identity;
pub mod redirect;
pub mod token;

pub use gate::{AdminGate, AdminIdentity, Denied};
pub use guard::{GuardAction, GuardOutcome, PathClass, RequestContext, SessionGuard};
pub use identity::{ExternalProfile, Identity, IdentityProvider, OAuthIdentityProvider};
pub use redirect::RedirectIntent;
pub use token::{Claims, ExpiredToken, RevocationList, SessionToken, TokenCodec, TokenError};
