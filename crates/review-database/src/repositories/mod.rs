//! PostgreSQL repository implementations.

pub mod moderation;
pub mod revocation;

pub use moderation::ModerationRepository;
pub use revocation::SessionRevocationRepository;
