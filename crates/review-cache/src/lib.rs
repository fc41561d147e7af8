//! # review-cache
//!
//! Cache provider implementations for Course Review. The in-process
//! provider is built on [moka](https://crates.io/crates/moka) with a
//! per-entry TTL, which the token revocation list relies on.

pub mod keys;
pub mod memory;

pub use memory::MemoryCacheProvider;
