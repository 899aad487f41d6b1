//! Least-recently-used cache implementation.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use tracing::debug;

/// A fixed-capacity key-value cache with least-recently-used eviction.
///
/// Both `get` and `insert` refresh the touched key's recency, so `get`
/// takes `&mut self`; callers guard the cache with a lock when shared.
/// Eviction happens only on insert at capacity. Recency bookkeeping is a
/// linear scan of the order queue, which is fine for the bounded
/// capacities used here (at most a few thousand entries).
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    // Front is the least recently used key.
    order: VecDeque<K>,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LruCache capacity must be non-zero");
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    /// Look up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.entries.contains_key(key) {
            self.touch(key);
        }
        self.entries.get(key)
    }

    /// Insert a value, evicting the least-recently-used entry at capacity.
    ///
    /// Returns the previous value when the key was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.entries.contains_key(&key) {
            self.touch(&key);
            return self.entries.insert(key, value);
        }

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                debug!(capacity = self.capacity, "Evicted least-recently-used cache entry");
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value)
    }

    /// Whether the key is present, without refreshing recency.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move `key` to the most-recently-used position.
    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}
