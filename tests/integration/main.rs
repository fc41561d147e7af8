//! End-to-end tests driving the full router against the in-memory store.

mod auth_test;
mod guard_test;
mod helpers;
mod moderation_test;
