//! # Pavilion Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The [`Gateway`] port every domain store talks to the backend through
//! - The auth service wrapping the `/auth/*` surface
//! - The degraded-mode fallback policy for incomplete backend endpoints
//! - The domain stores (brand, product, team, meeting state containers)
//!
//! ## Architecture Principles
//! - Only depends on `pavilion-common` and `pavilion-domain`
//! - No HTTP or storage code; the transport lives behind the port
//! - Pure, testable logic driven with a fake gateway in tests

pub mod auth;
pub mod fallback;
pub mod ports;
pub mod stores;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::AuthService;
pub use fallback::{absorb_not_found, FallbackPolicy, WriteOrigin, WriteOutcome};
pub use ports::Gateway;
pub use stores::{BrandStore, MeetingStore, ProductStore, TeamStore};
