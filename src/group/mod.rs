//! Cache Groups
//!
//! A [`Group`] is a named cache namespace with its own loader and capacity.
//! Lookups go through the group's [`SharedCache`]; on a miss the loader is
//! called outside any lock, the bytes are copied into a [`ByteView`], written
//! back to the cache and returned.
//!
//! ```text
//!   get(key) ──▶ SharedCache hit? ──yes──▶ ByteView
//!                    │ no
//!                    ▼
//!               load(key) ──▶ get_locally ──▶ Getter::get
//!                                   │
//!                                   ▼
//!                            populate_cache ──▶ ByteView
//! ```
//!
//! Concurrent misses on the same key each call the loader; there is no
//! in-flight request coalescing.
//!
//! Groups live in a process-wide registry guarded by its own `RwLock`,
//! separate from every group's cache mutex.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{ByteView, SharedCache};
use crate::config::GroupConfig;
use crate::error::{Error, Result};

/// Source-of-truth loader consulted on a cache miss
///
/// May be called concurrently, and more than once for the same key.
pub trait Getter: Send + Sync {
    /// Fetch the authoritative bytes for `key`
    fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

impl<F> Getter for F
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self(key)
    }
}

/// Named cache namespace
pub struct Group {
    name: String,
    getter: Box<dyn Getter>,
    main_cache: SharedCache,
}

impl Group {
    fn new(name: String, capacity: i64, getter: Box<dyn Getter>) -> Self {
        Self {
            name,
            getter,
            main_cache: SharedCache::new(capacity),
        }
    }

    /// Get a value, loading and caching it on a miss
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(Error::InvalidArgument("key is required".into()));
        }

        if let Some(value) = self.main_cache.get(key) {
            debug!(group = %self.name, key, "Cache hit");
            return Ok(value);
        }

        self.load(key)
    }

    fn load(&self, key: &str) -> Result<ByteView> {
        self.get_locally(key)
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        debug!(group = %self.name, key, "Cache miss, invoking loader");

        let bytes = self.getter.get(key).map_err(|e| {
            debug!(group = %self.name, key, error = %e, "Loader failed");
            Error::Load(e)
        })?;

        let value = ByteView::new(&bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cache capacity in bytes (0 = unbounded)
    pub fn capacity(&self) -> i64 {
        self.main_cache.capacity()
    }

    /// Number of entries currently cached
    pub fn cached_len(&self) -> usize {
        self.main_cache.len()
    }

    /// Bytes currently accounted in the cache
    pub fn cached_bytes(&self) -> i64 {
        self.main_cache.usage()
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Registry
// =============================================================================

static GROUPS: Lazy<RwLock<HashMap<String, Arc<Group>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Create a group and register it under `name`
///
/// A group already registered under the same name is replaced.
pub fn new_group<G>(name: impl Into<String>, capacity: i64, getter: G) -> Arc<Group>
where
    G: Getter + 'static,
{
    let name = name.into();
    let group = Arc::new(Group::new(name.clone(), capacity, Box::new(getter)));

    let previous = GROUPS.write().insert(name.clone(), Arc::clone(&group));

    if previous.is_some() {
        warn!(group = %name, capacity, "Replaced existing group");
    } else {
        info!(group = %name, capacity, "Registered group");
    }
    group
}

/// Validate `config` and register a group from it
pub fn register<G>(config: &GroupConfig, getter: G) -> Result<Arc<Group>>
where
    G: Getter + 'static,
{
    config.validate()?;
    Ok(new_group(config.name.clone(), config.capacity_bytes, getter))
}

/// Look up a registered group
pub fn get_group(name: &str) -> Option<Arc<Group>> {
    GROUPS.read().get(name).cloned()
}

// =============================================================================
// Tests
// =============================================================================
