//! Generic TTL cache
//!
//! A keyed, best-effort cache for short-lived read results. Entries expire
//! lazily: staleness is checked on the next read, not by a background task.

mod config;
mod store;

pub use config::{CacheConfig, DEFAULT_TTL};
pub use store::TtlCache;
