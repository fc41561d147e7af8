//! In-memory stores for development and tests.

pub mod moderation;
pub mod revocation;

pub use moderation::MemoryModerationStore;
pub use revocation::MemorySessionRevocationStore;
