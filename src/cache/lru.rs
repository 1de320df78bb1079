//! LRU Eviction Engine
//!
//! Capacity-bounded key/value store with O(1) get, add and evict-oldest.
//!
//! # Design
//!
//! - `HashMap<String, usize>` index from key to arena slot
//! - Arena (`Vec<Node>`) holding an index-linked doubly linked list,
//!   head = most recently used, tail = least recently used
//! - Freed slots are recycled through a free list
//! - Usage is accounted as `key.len() + value.logical_size()` per entry
//!
//! The engine is not synchronized; [`super::SharedCache`] serializes access.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

/// Null link in the arena list
const NIL: usize = usize::MAX;

/// Values stored in an [`LruCache`] report their own accounting cost.
pub trait CacheValue {
    /// Bytes this value contributes to cache usage
    fn logical_size(&self) -> i64;
}

/// Hook invoked inline with every capacity eviction.
///
/// The callback is owned by the engine, so it cannot reach back into it.
pub type EvictionCallback<V> = Box<dyn FnMut(&str, &V) + Send>;

struct Node<V> {
    key: String,
    value: Option<V>,
    prev: usize,
    next: usize,
}

/// Size-bounded LRU cache
///
/// A capacity of `0` means unbounded: nothing is ever evicted.
pub struct LruCache<V> {
    /// Maximum usage in bytes (0 = unbounded)
    capacity: i64,
    /// Current usage in bytes
    usage: i64,
    /// Key -> arena slot
    index: HashMap<String, usize>,
    /// Node storage
    arena: Vec<Node<V>>,
    /// Most recently used slot
    head: usize,
    /// Least recently used slot
    tail: usize,
    /// First recyclable slot
    free_head: usize,
    /// Optional eviction hook
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: CacheValue> LruCache<V> {
    /// Create an engine with the given capacity and no eviction hook
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            usage: 0,
            index: HashMap::new(),
            arena: Vec::new(),
            head: NIL,
            tail: NIL,
            free_head: NIL,
            on_evicted: None,
        }
    }

    /// Create an engine that calls `on_evicted` for every evicted entry
    pub fn with_eviction_callback<F>(capacity: i64, on_evicted: F) -> Self
    where
        F: FnMut(&str, &V) + Send + 'static,
    {
        let mut cache = Self::new(capacity);
        cache.on_evicted = Some(Box::new(on_evicted));
        cache
    }

    /// Look up a key, marking it most recently used on a hit
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_head(idx);
        self.arena[idx].value.as_ref()
    }

    /// Look up a key without touching recency
    pub fn peek(&self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.arena[idx].value.as_ref()
    }

    /// Check if a key is present (does not touch recency)
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or replace a value, then evict until usage fits the capacity
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(key.as_str()) {
            let new_size = value.logical_size();
            let old = self.arena[idx].value.replace(value);
            let old_size = old.as_ref().map_or(0, |v| v.logical_size());
            self.usage += new_size - old_size;
            self.move_to_head(idx);
        } else {
            self.usage += key.len() as i64 + value.logical_size();
            let idx = self.alloc_slot(key.clone(), value);
            self.push_head(idx);
            self.index.insert(key, idx);
        }

        while self.capacity != 0 && self.usage > self.capacity {
            if self.evict_oldest().is_none() {
                break;
            }
        }
    }

    /// Remove the least recently used entry and fire the eviction hook
    ///
    /// No-op returning `None` when the cache is empty.
    pub fn evict_oldest(&mut self) -> Option<(String, V)> {
        if self.tail == NIL {
            return None;
        }
        let (key, value) = self.take_slot(self.tail)?;
        let freed = key.len() as i64 + value.logical_size();

        trace!(key = %key, freed, usage = self.usage, "Evicted oldest entry");

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&key, &value);
        }
        Some((key, value))
    }

    /// Remove a key explicitly. The eviction hook is not called.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = *self.index.get(key)?;
        self.take_slot(idx).map(|(_, value)| value)
    }

    /// Current usage in bytes
    #[inline]
    pub fn usage(&self) -> i64 {
        self.usage
    }

    /// Configured capacity in bytes (0 = unbounded)
    #[inline]
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the cache is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        let mut current = self.head;
        std::iter::from_fn(move || {
            if current == NIL {
                return None;
            }
            let node = &self.arena[current];
            current = node.next;
            Some(node.key.as_str())
        })
    }

    // --- arena list plumbing ---

    /// Unlink `idx`, drop it from the index, settle usage and recycle the slot
    fn take_slot(&mut self, idx: usize) -> Option<(String, V)> {
        self.unlink(idx);
        let node = &mut self.arena[idx];
        let key = std::mem::take(&mut node.key);
        let value = node.value.take()?;
        node.next = self.free_head;
        self.free_head = idx;

        self.index.remove(key.as_str());
        self.usage -= key.len() as i64 + value.logical_size();
        Some((key, value))
    }

    fn alloc_slot(&mut self, key: String, value: V) -> usize {
        let node = Node {
            key,
            value: Some(value),
            prev: NIL,
            next: NIL,
        };
        if self.free_head != NIL {
            let idx = self.free_head;
            self.free_head = self.arena[idx].next;
            self.arena[idx] = node;
            idx
        } else {
            self.arena.push(node);
            self.arena.len() - 1
        }
    }

    fn unlink(&mut self, idx: usize) {
        let prev = self.arena[idx].prev;
        let next = self.arena[idx].next;

        if prev != NIL {
            self.arena[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.arena[next].prev = prev;
        } else {
            self.tail = prev;
        }

        self.arena[idx].prev = NIL;
        self.arena[idx].next = NIL;
    }

    fn push_head(&mut self, idx: usize) {
        self.arena[idx].prev = NIL;
        self.arena[idx].next = self.head;
        if self.head != NIL {
            self.arena[self.head].prev = idx;
        }
        self.head = idx;
        if self.tail == NIL {
            self.tail = idx;
        }
    }

    fn move_to_head(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.push_head(idx);
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("usage", &self.usage)
            .field("len", &self.index.len())
            .field("has_eviction_callback", &self.on_evicted.is_some())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
