//! # review-entity
//!
//! Domain entity models for Course Review. Every struct in this crate
//! represents a database table row or a domain value object. Database
//! entities additionally derive `sqlx::FromRow`.

pub mod review;

pub use review::{NewStagedReview, PublishedReview, ReviewId, StagedReview, Term};
