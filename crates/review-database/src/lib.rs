//! # review-database
//!
//! Persistence for the moderation pipeline and for session revocation:
//! the [`ModerationStore`] and [`SessionRevocationStore`] contracts, their
//! PostgreSQL and in-memory implementations, and connection/migration
//! management.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryModerationStore, MemorySessionRevocationStore};
pub use repositories::{ModerationRepository, SessionRevocationRepository};
pub use store::{ModerationStore, SessionRevocationStore};
