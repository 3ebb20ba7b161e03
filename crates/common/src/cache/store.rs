//! Core TTL cache implementation with an injected clock

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use super::config::CacheConfig;
use crate::time::{Clock, SystemClock};

/// Entry stored in the cache with its insertion timestamp
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Generic thread-safe TTL cache
///
/// The source system this was ported from runs on a single logical thread;
/// on a multi-threaded runtime the index needs a lock, since concurrent
/// requests can race on population and clearing.
///
/// # Type Parameters
/// - `K`: Key type (must be `Eq + Hash + Clone`)
/// - `V`: Value type (must be `Clone`)
/// - `C`: Clock type for TTL checks (defaults to [`SystemClock`])
pub struct TtlCache<K, V, C = SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    entries: Arc<RwLock<HashMap<K, CacheEntry<V>>>>,
    config: CacheConfig,
    clock: C,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new cache with the given configuration using the system clock
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Create a new cache with a custom clock (useful for testing)
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self { entries: Arc::new(RwLock::new(HashMap::new())), config, clock }
    }

    /// Insert a value, overwriting any existing entry for the key.
    ///
    /// The entry's age is measured from this call, so an overwrite also
    /// refreshes the TTL.
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry { value, stored_at: self.clock.now() };
        self.entries.write().insert(key, entry);
    }

    /// Get a value from the cache
    ///
    /// Returns a hit only while the entry is younger than the TTL; a stale
    /// entry is removed on this read and reported as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write();

        let expired = match entries.get(key) {
            Some(entry)
                if self.clock.now().duration_since(entry.stored_at) < self.config.ttl =>
            {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
        }
        None
    }

    /// Remove a single entry.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.write().remove(key).map(|e| e.value)
    }

    /// Remove every entry whose key matches the predicate.
    ///
    /// Returns the number of entries removed.
    pub fn remove_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&K) -> bool,
    {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !predicate(key));
        before - entries.len()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Current number of entries, counting any not-yet-evicted stale ones.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V, C> Clone for TtlCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            config: self.config,
            clock: self.clock.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::time::MockClock;

    fn cache_with_clock(ttl_ms: u64) -> (TtlCache<String, i32, MockClock>, MockClock) {
        let clock = MockClock::new();
        let cache =
            TtlCache::with_clock(CacheConfig::ttl(Duration::from_millis(ttl_ms)), clock.clone());
        (cache, clock)
    }

    #[test]
    fn fresh_entries_hit() {
        let (cache, clock) = cache_with_clock(10_000);
        cache.insert("k".to_string(), 1);

        clock.advance(Duration::from_millis(9_999));
        assert_eq!(cache.get(&"k".to_string()), Some(1));
    }

    #[test]
    fn stale_entries_are_evicted_on_read() {
        let (cache, clock) = cache_with_clock(10_000);
        cache.insert("k".to_string(), 1);

        clock.advance(Duration::from_millis(10_000));
        assert_eq!(cache.get(&"k".to_string()), None);
        assert!(cache.is_empty(), "stale entry is removed by the failed read");
    }

    #[test]
    fn overwrite_refreshes_the_ttl() {
        let (cache, clock) = cache_with_clock(10_000);
        cache.insert("k".to_string(), 1);

        clock.advance(Duration::from_millis(8_000));
        cache.insert("k".to_string(), 2);

        clock.advance(Duration::from_millis(8_000));
        assert_eq!(cache.get(&"k".to_string()), Some(2));
    }

    #[test]
    fn remove_where_reports_removed_count() {
        let (cache, _clock) = cache_with_clock(10_000);
        cache.insert("/products".to_string(), 1);
        cache.insert("/products/7".to_string(), 2);
        cache.insert("/brand".to_string(), 3);

        let removed = cache.remove_where(|key| key.starts_with("/products"));
        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let (cache, _clock) = cache_with_clock(10_000);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
