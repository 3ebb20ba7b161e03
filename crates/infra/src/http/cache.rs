//! Response cache keyed by normalized request URL
//!
//! Wraps the generic TTL cache with URL normalization and the related-key
//! invalidation rule: a write to `/brand/42` must evict `/brand`,
//! `/brand/42` and `/brand/42/products`, because any of them may embed the
//! resource that just changed.

use std::time::Duration;

use pavilion_common::cache::{CacheConfig, TtlCache};
use pavilion_common::time::{Clock, SystemClock};
use pavilion_domain::ResponseSnapshot;

/// TTL cache for successful GET responses
pub struct ResponseCache<C: Clock = SystemClock> {
    entries: TtlCache<String, ResponseSnapshot, C>,
}

impl ResponseCache<SystemClock> {
    /// Create a cache with the given TTL using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<C: Clock> ResponseCache<C> {
    /// Create a cache with a custom clock (useful for testing).
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self { entries: TtlCache::with_clock(CacheConfig::ttl(ttl), clock) }
    }

    /// Look up a fresh snapshot for the URL.
    pub fn lookup(&self, url: &str) -> Option<ResponseSnapshot> {
        self.entries.get(&normalize_key(url))
    }

    /// Store a snapshot under the URL's normalized key.
    pub fn store(&self, url: &str, snapshot: ResponseSnapshot) {
        self.entries.insert(normalize_key(url), snapshot);
    }

    /// Evict every entry related to a written URL.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_related(&self, url: &str) -> usize {
        let write_key = normalize_key(url);
        self.entries.remove_where(|key| is_related(key, &write_key))
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize a URL into its cache key.
///
/// Fragments are dropped and trailing slashes trimmed, so `/brand/` and
/// `/brand#section` share one entry with `/brand`. Query strings are kept:
/// different filters are different responses.
pub fn normalize_key(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let trimmed = without_fragment.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whether a cached key is affected by a write to `write_key`.
///
/// Related means equal paths, or one path extending the other across a `/`
/// boundary. Comparison ignores the cached key's query string, so
/// `/meetings/filter/date-range?from=a&to=b` is evicted by a write to
/// `/meetings`.
fn is_related(key: &str, write_key: &str) -> bool {
    let key_path = key.split('?').next().unwrap_or(key);
    let write_path = write_key.split('?').next().unwrap_or(write_key);

    if key_path == write_path {
        return true;
    }
    if key_path.strip_prefix(write_path).is_some_and(|rest| rest.starts_with('/')) {
        return true;
    }
    write_path.strip_prefix(key_path).is_some_and(|rest| rest.starts_with('/'))
}
