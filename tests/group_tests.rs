//! Group Cache Integration Tests
//!
//! Drives the public surface end to end:
//! - Registry: create, look up, overwrite
//! - Groups: miss-then-hit, empty keys, loader failures, eviction
//! - Engine: eviction callback ordering
//!
//! The registry is process-wide, so every test uses its own group name.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use assert_matches::assert_matches;

// =============================================================================
// Helpers
// =============================================================================

fn scores_db() -> groupcache::SourceTable {
    groupcache::SourceTable::sample()
}

/// Loader over the sample table that counts calls per key
fn counting_loader(
    calls: Arc<Mutex<std::collections::HashMap<String, usize>>>,
) -> impl Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync + 'static {
    let db = scores_db();
    move |key: &str| {
        *calls.lock().unwrap().entry(key.to_string()).or_default() += 1;
        match db.get(key) {
            Some(v) => Ok(v.as_bytes().to_vec()),
            None => anyhow::bail!("{key} not exist"),
        }
    }
}

// =============================================================================
// Group Tests
// =============================================================================

mod group_tests {
    use super::*;
    use groupcache::{get_group, new_group, Error};

    #[test]
    fn test_get_loads_once_then_hits() {
        let calls = Arc::new(Mutex::new(Default::default()));
        let scores = new_group("it-scores", 2 << 10, counting_loader(Arc::clone(&calls)));

        for (name, score) in [("Tom", "630"), ("Jack", "589"), ("Sam", "567")] {
            assert_eq!(scores.get(name).unwrap().to_text(), score);
            assert_eq!(scores.get(name).unwrap().to_text(), score);
            assert_eq!(calls.lock().unwrap()[name], 1, "cache miss for {name}");
        }
    }

    #[test]
    fn test_unknown_key_fails_every_time() {
        let calls = Arc::new(Mutex::new(Default::default()));
        let scores = new_group("it-unknown", 2 << 10, counting_loader(Arc::clone(&calls)));

        for _ in 0..3 {
            let err = scores.get("unknown").unwrap_err();
            assert_matches!(err, Error::Load(_));
            assert_eq!(err.to_string(), "unknown not exist");
        }
        assert_eq!(calls.lock().unwrap()["unknown"], 3);
        assert_eq!(scores.cached_len(), 0);
    }

    #[test]
    fn test_empty_key_is_rejected_without_loading() {
        let calls = Arc::new(Mutex::new(Default::default()));
        let scores = new_group("it-empty-key", 2 << 10, counting_loader(Arc::clone(&calls)));

        assert_matches!(scores.get(""), Err(Error::InvalidArgument(_)));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_loader_error_is_passed_through() {
        #[derive(Debug, thiserror::Error)]
        #[error("database offline")]
        struct Offline;

        let group = new_group("it-offline", 0, |_: &str| -> anyhow::Result<Vec<u8>> {
            Err(Offline.into())
        });

        match group.get("Jack") {
            Err(Error::Load(inner)) => assert!(inner.downcast_ref::<Offline>().is_some()),
            other => panic!("expected loader error, got {other:?}"),
        }
    }

    #[test]
    fn test_registry_lookup() {
        let created = new_group("it-lookup", 128, |_: &str| anyhow::Ok(b"x".to_vec()));

        let found = get_group("it-lookup").expect("group registered");
        assert!(Arc::ptr_eq(&created, &found));
        assert_eq!(found.name(), "it-lookup");
        assert!(get_group("it-never-created").is_none());
    }

    #[test]
    fn test_registry_overwrite() {
        new_group("it-overwrite", 128, |_: &str| anyhow::Ok(b"old".to_vec()));
        new_group("it-overwrite", 256, |_: &str| anyhow::Ok(b"new".to_vec()));

        let group = get_group("it-overwrite").unwrap();
        assert_eq!(group.capacity(), 256);
        assert_eq!(group.get("k").unwrap().to_text(), "new");
    }

    #[test]
    fn test_register_from_config() {
        let config = groupcache::GroupConfig::new("it-config", 64);
        let group = groupcache::register(&config, |_: &str| anyhow::Ok(b"v".to_vec())).unwrap();
        assert_eq!(group.capacity(), 64);

        let bad = groupcache::GroupConfig::new("it-config-bad", -5);
        assert_matches!(
            groupcache::register(&bad, |_: &str| anyhow::Ok(Vec::new())),
            Err(Error::Config(_))
        );
        assert!(get_group("it-config-bad").is_none());
    }

    #[test]
    fn test_capacity_bounds_group() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);
        let group = new_group("it-bounded", 64, move |key: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            anyhow::Ok(key.repeat(4).into_bytes())
        });

        for i in 0..50 {
            group.get(&format!("key-{i:02}")).unwrap();
            assert!(group.cached_bytes() <= 64);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 50);

        // The most recent key is still cached.
        group.get("key-49").unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 50);

        // The oldest one was evicted long ago.
        group.get("key-00").unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 51);
    }

    #[test]
    fn test_concurrent_readers() {
        let calls = Arc::new(Mutex::new(Default::default()));
        let scores = new_group("it-concurrent", 2 << 10, counting_loader(Arc::clone(&calls)));

        // Warm the cache so readers only hit.
        scores.get("Tom").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let scores = Arc::clone(&scores);
                thread::spawn(move || {
                    for _ in 0..200 {
                        assert_eq!(scores.get("Tom").unwrap().to_text(), "630");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(calls.lock().unwrap()["Tom"], 1);
    }

    #[test]
    fn test_group_visible_across_threads() {
        new_group("it-shared", 0, |_: &str| anyhow::Ok(b"shared".to_vec()));

        let handle = thread::spawn(|| {
            get_group("it-shared")
                .map(|g| g.get("k").unwrap().to_text())
                .unwrap_or_default()
        });
        assert_eq!(handle.join().unwrap(), "shared");
    }
}

// =============================================================================
// Engine Tests
// =============================================================================

mod engine_tests {
    use super::*;
    use groupcache::{ByteView, LruCache, SharedCache};

    #[test]
    fn test_eviction_callback_order() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);
        // Each entry costs 2 + 4 = 6 bytes; two fit.
        let mut cache = LruCache::with_eviction_callback(12, move |key: &str, _: &ByteView| {
            sink.lock().unwrap().push(key.to_string());
        });

        cache.add("k1", ByteView::from("aaaa"));
        cache.add("k2", ByteView::from("bbbb"));
        cache.get("k1");
        cache.add("k3", ByteView::from("cccc"));
        cache.add("k4", ByteView::from("dddd"));

        assert_eq!(*evicted.lock().unwrap(), vec!["k2", "k1"]);
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["k4", "k3"]);
        assert_eq!(cache.usage(), 12);
    }

    #[test]
    fn test_recency_refresh_protects_key() {
        let mut cache = LruCache::new(3 * 2);
        cache.add("A", ByteView::from("1"));
        cache.add("B", ByteView::from("2"));
        cache.add("C", ByteView::from("3"));
        cache.get("A");

        cache.add("D", ByteView::from("4"));

        assert!(cache.contains("A"));
        assert!(!cache.contains("B"));
        assert!(cache.contains("C"));
    }

    #[test]
    fn test_shared_cache_laziness() {
        let cache = SharedCache::new(1);
        assert!(cache.get("a").is_none());
        assert!(!cache.is_initialized());

        cache.add("a", ByteView::default());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.usage(), 1);
    }

    #[test]
    fn test_byteview_copies_are_independent() {
        let view = ByteView::from("immutable");
        let mut first = view.to_vec();
        first.iter_mut().for_each(|b| *b = b'x');

        assert_eq!(view.to_vec(), b"immutable");
        assert_eq!(view.to_text(), "immutable");
    }
}
