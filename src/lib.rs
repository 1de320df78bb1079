//! Group Cache - In-Process LRU Cache with Load-Through Groups
//!
//! A size-bounded key/value cache with least-recently-used eviction, a
//! thread-safe wrapper around it, and named groups that fill the cache from a
//! caller-supplied loader on a miss.
//!
//! # Architecture
//!
//! ```text
//! Registry (RwLock) → Group → SharedCache (Mutex) → LruCache<ByteView>
//!                       │
//!                       └── Getter (on miss, outside any lock)
//! ```
//!
//! Everything lives in one process: there are no peers, no persistence and
//! no expiry. Entries leave the cache only through capacity eviction.
//!
//! # Example
//!
//! ```
//! use groupcache::new_group;
//!
//! let scores = new_group("doc-scores", 2 << 10, |key: &str| match key {
//!     "Tom" => Ok(b"630".to_vec()),
//!     _ => anyhow::bail!("{key} not exist"),
//! });
//!
//! assert_eq!(scores.get("Tom").unwrap().to_text(), "630");
//! assert!(scores.get("Nobody").is_err());
//! ```
//!
//! # Modules
//!
//! - [`cache`] - LRU engine, byte views and the shared cache wrapper
//! - [`config`] - Group configuration and source tables
//! - [`error`] - Error types
//! - [`group`] - Groups, loaders and the process-wide registry

pub mod cache;
pub mod config;
pub mod error;
pub mod group;

// Re-export commonly used types
pub use cache::{ByteView, CacheValue, LruCache, SharedCache};
pub use config::{GroupConfig, SourceTable};
pub use error::{Error, Result};
pub use group::{get_group, new_group, register, Getter, Group};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
