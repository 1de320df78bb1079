//! In-Process LRU Cache
//!
//! Size-bounded key/value caching for a single process.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SharedCache                           │
//! │            (parking_lot::Mutex, lazy construction)           │
//! ├──────────────────────────────────────────────────────────────┤
//! │                     LruCache<ByteView>                       │
//! │  ┌──────────────────────┐     ┌───────────────────────────┐  │
//! │  │ HashMap<String, slot>│ ──▶ │ arena doubly linked list  │  │
//! │  │   (direct lookup)    │     │ head = MRU    tail = LRU  │  │
//! │  └──────────────────────┘     └───────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Accounting
//!
//! Each entry costs `key.len() + value.logical_size()` bytes. Once usage
//! exceeds a nonzero capacity the least recently used entries are evicted one
//! at a time until it fits again. Capacity `0` disables eviction.

mod byteview;
mod concurrent;
mod lru;
mod proptest;

pub use byteview::ByteView;
pub use concurrent::SharedCache;
pub use lru::{CacheValue, EvictionCallback, LruCache};

/// Capacity value meaning "never evict"
pub const UNBOUNDED: i64 = 0;

/// Default group capacity (2KB)
pub const DEFAULT_CAPACITY: i64 = 2 << 10;

// =============================================================================
// Tests
// =============================================================================
