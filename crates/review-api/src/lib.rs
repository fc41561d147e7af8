//! # review-api
//!
//! HTTP API layer for Course Review built on Axum.
//!
//! Every request passes the session guard middleware first. Handlers read
//! the verified session from request extensions through the extractors in
//! [`extractors`].

pub mod app;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
