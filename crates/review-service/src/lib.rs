//! # review-service
//!
//! Business logic for Course Review. Services are constructed once at
//! startup and shared through the application state; each entry point
//! takes the caller's verified identity explicitly.

pub mod moderation;

pub use moderation::{ModerationService, ReviewSubmission};
