//! # Pavilion Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The reqwest-backed HTTP gateway and its response cache
//! - File-backed session token storage
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Implements traits defined in `pavilion-core` and `pavilion-common`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod config;
pub mod errors;
pub mod http;
pub mod storage;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpGateway, ResponseCache};
pub use storage::FileTokenStore;
