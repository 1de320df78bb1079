//! Shared Cache
//!
//! Thread-safe wrapper that serializes every operation on one [`LruCache`]
//! behind a single mutex. The engine is built lazily on the first write, so
//! reading from a cache that was never written allocates nothing.

use parking_lot::Mutex;

use super::byteview::ByteView;
use super::lru::LruCache;

/// Mutex-guarded, lazily constructed LRU cache of [`ByteView`]s
#[derive(Debug)]
pub struct SharedCache {
    /// Engine, created on first `add`
    lru: Mutex<Option<LruCache<ByteView>>>,
    /// Capacity handed to the engine (0 = unbounded)
    capacity: i64,
}

impl SharedCache {
    /// Create an empty cache that will hold at most `capacity` bytes
    pub fn new(capacity: i64) -> Self {
        Self {
            lru: Mutex::new(None),
            capacity,
        }
    }

    /// Insert or replace a value, building the engine if needed
    pub fn add(&self, key: &str, value: ByteView) {
        let mut guard = self.lru.lock();
        guard
            .get_or_insert_with(|| LruCache::new(self.capacity))
            .add(key, value);
    }

    /// Look up a value; never builds the engine
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.lru.lock();
        guard.as_mut()?.get(key).cloned()
    }

    /// Configured capacity in bytes
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.lru.lock().as_ref().map_or(0, LruCache::len)
    }

    /// Check if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current usage in bytes
    pub fn usage(&self) -> i64 {
        self.lru.lock().as_ref().map_or(0, LruCache::usage)
    }

    /// Whether the engine has been built yet
    pub fn is_initialized(&self) -> bool {
        self.lru.lock().is_some()
    }
}

// =============================================================================
// Tests
// =============================================================================
