//! Port interfaces between domain logic and the transport
//!
//! These traits define the boundary between the stores and the
//! infrastructure implementation of the interceptor chain.

use async_trait::async_trait;
use pavilion_domain::{ApiResponse, RequestDescriptor, Result};

/// The single chokepoint every backend call goes through
///
/// Implementations handle auth injection, response caching, invalidation,
/// and error classification; callers only see classified results.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send one request through the interceptor chain.
    ///
    /// # Errors
    /// Returns the classified error for the outcome; `Unauthorized` also
    /// tears down the session before propagating.
    async fn send(&self, descriptor: RequestDescriptor) -> Result<ApiResponse>;

    /// Drop every cached response.
    ///
    /// Called on explicit logout so cached authorized data never leaks into
    /// the next session.
    fn clear_cached_responses(&self);
}
