//! Administrator-only handlers.

pub mod reviews;
