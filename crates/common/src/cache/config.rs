//! Cache configuration

use std::time::Duration;

/// Default time-to-live for cache entries.
pub const DEFAULT_TTL: Duration = Duration::from_millis(10_000);

/// Configuration for cache behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum age after which an entry is stale and evicted on read
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL }
    }
}

impl CacheConfig {
    /// Configuration with an explicit TTL
    pub fn ttl(duration: Duration) -> Self {
        Self { ttl: duration }
    }
}
