//! Request extractors built on the session guard's verdict.

pub mod admin;
pub mod auth;
pub mod session;

pub use admin::{AdminDenied, AdminUser};
pub use auth::AuthUser;
pub use session::VerifiedSession;
