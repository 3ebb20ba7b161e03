//! # Pavilion Domain
//!
//! Business domain types and models for the Pavilion client gateway.
//!
//! This crate contains:
//! - Request/response value types carried through the gateway
//! - Domain error taxonomy and Result definitions
//! - Marketplace resource types (brands, products, team members, meetings)
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Pavilion crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
