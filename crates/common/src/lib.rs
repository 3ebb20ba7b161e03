//! Modular runtime utilities shared across Pavilion crates.
//!
//! This crate contains:
//! - `time`: the clock abstraction that makes TTL expiry testable
//! - `cache`: the generic TTL cache behind the gateway's response cache
//! - `session`: ownership of the bearer token and the expiry event channel
//!
//! Everything here is infrastructure-free: no HTTP, no file paths, no
//! backend knowledge.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod session;
pub mod time;
