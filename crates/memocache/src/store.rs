//! Memoization store: canonical key -> {value, hit counter}

use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::RandomState;
use memokey::{derive_key_with_limit, CanonicalKey, Error, Result, Value};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::MemoConfig;
use crate::stats::CacheStats;

/// Cached result plus the number of reads after it was stored
struct Entry<V> {
    value: V,
    hits: AtomicU64,
}

/// Argument-keyed result store
///
/// The wrapped function is never run while a lock is held, so a memoized
/// function may call itself through the same store. Two callers that miss on
/// the same key at once both compute; the first insert wins and is never
/// overwritten.
pub struct MemoStore<V> {
    entries: RwLock<HashMap<CanonicalKey, Entry<V>, RandomState>>,
    stats: CacheStats,
    config: MemoConfig,
}

impl<V: Clone> MemoStore<V> {
    /// Create an empty store
    pub fn new(config: MemoConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_hasher(RandomState::new())),
            stats: CacheStats::new(),
            config,
        }
    }

    /// Derive the key for `args` using this store's depth limit
    pub fn key<A: Serialize + ?Sized>(&self, args: &A) -> Result<CanonicalKey> {
        derive_key_with_limit(args, self.config.max_depth)
    }

    /// Get the cached value for `args`, or run `compute` and cache its result
    ///
    /// # Arguments
    /// * `args` - Argument list the result belongs to
    /// * `compute` - Runs only on a miss
    ///
    /// # Returns
    /// * `Result<V>` - Cached or fresh value; errors only if no key can be derived
    pub fn get_or_compute<A, F>(&self, args: &A, compute: F) -> Result<V>
    where
        A: Serialize + ?Sized,
        F: FnOnce() -> V,
    {
        let key = self.key(args)?;
        Ok(self.get_or_compute_by_key(key, compute))
    }

    /// Like [`get_or_compute`](Self::get_or_compute), but nothing is cached
    /// when `compute` fails. The error is returned unchanged.
    pub fn try_get_or_compute<A, E, F>(&self, args: &A, compute: F) -> std::result::Result<V, E>
    where
        A: Serialize + ?Sized,
        E: From<Error>,
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let key = self.key(args)?;
        self.try_get_or_compute_by_key(key, compute)
    }

    /// Get-or-compute for a key derived ahead of time
    pub fn get_or_compute_by_key<F>(&self, key: CanonicalKey, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.lookup(&key) {
            return value;
        }

        self.stats.record_miss();
        trace!(label = %self.config.label, %key, "miss");
        self.insert(key, compute())
    }

    /// Fallible get-or-compute for a key derived ahead of time
    pub fn try_get_or_compute_by_key<E, F>(
        &self,
        key: CanonicalKey,
        compute: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        if let Some(value) = self.lookup(&key) {
            return Ok(value);
        }

        self.stats.record_miss();
        trace!(label = %self.config.label, %key, "miss");
        match compute() {
            Ok(value) => Ok(self.insert(key, value)),
            Err(err) => {
                self.stats.record_failure();
                debug!(label = %self.config.label, %key, "computation failed, not cached");
                Err(err)
            }
        }
    }

    /// Hit counter for `args`; 0 when nothing is cached for them
    pub fn hit_count<A: Serialize + ?Sized>(&self, args: &A) -> Result<u64> {
        let key = self.key(args)?;
        Ok(self.hit_count_by_key(&key))
    }

    /// Hit counter for a key
    pub fn hit_count_by_key(&self, key: &CanonicalKey) -> u64 {
        self.entries
            .read()
            .get(key)
            .map_or(0, |entry| entry.hits.load(Ordering::Relaxed))
    }

    /// Check whether a result is cached for `args`
    pub fn contains<A: Serialize + ?Sized>(&self, args: &A) -> Result<bool> {
        let key = self.key(args)?;
        Ok(self.entries.read().contains_key(&key))
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        let dropped = {
            let mut entries = self.entries.write();
            let dropped = entries.len();
            entries.clear();
            dropped
        };
        self.stats.reset();
        debug!(label = %self.config.label, dropped, "cleared");
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Keys of all cached entries, sorted
    pub fn keys(&self) -> Vec<CanonicalKey> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Decoded argument lists of all cached entries, sorted by key
    pub fn cached_arguments(&self) -> Result<Vec<Vec<Value>>> {
        self.keys().iter().map(CanonicalKey::arguments).collect()
    }

    /// Store-wide statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Settings this store was created with
    pub fn config(&self) -> &MemoConfig {
        &self.config
    }

    fn lookup(&self, key: &CanonicalKey) -> Option<V> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        let hits = entry.hits.fetch_add(1, Ordering::Relaxed) + 1;
        self.stats.record_hit();
        trace!(label = %self.config.label, %key, hits, "hit");
        Some(entry.value.clone())
    }

    fn insert(&self, key: CanonicalKey, value: V) -> V {
        let mut entries = self.entries.write();
        match entries.entry(key) {
            MapEntry::Occupied(slot) => {
                // Lost a race with another caller; keep the first result
                debug!(label = %self.config.label, key = %slot.key(), "already cached");
            }
            MapEntry::Vacant(slot) => {
                slot.insert(Entry {
                    value: value.clone(),
                    hits: AtomicU64::new(0),
                });
                self.stats.record_insert();
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn store() -> MemoStore<String> {
        MemoStore::new(MemoConfig::default())
    }

    #[test]
    fn test_store_miss_then_hit() {
        let store = store();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            "1111011".to_string()
        };

        assert_eq!(store.get_or_compute(&123, compute).unwrap(), "1111011");
        assert_eq!(store.get_or_compute(&123, compute).unwrap(), "1111011");

        assert_eq!(calls.get(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().hits(), 1);
        assert_eq!(store.stats().misses(), 1);
    }

    #[test]
    fn test_store_hit_count() {
        let store = store();

        assert_eq!(store.hit_count(&123).unwrap(), 0);
        store.get_or_compute(&123, || "x".to_string()).unwrap();
        assert_eq!(store.hit_count(&123).unwrap(), 0);
        store.get_or_compute(&123, || "x".to_string()).unwrap();
        assert_eq!(store.hit_count(&123).unwrap(), 1);
        store.get_or_compute(&123, || "x".to_string()).unwrap();
        assert_eq!(store.hit_count(&123).unwrap(), 2);

        // Reading the counter is not a hit
        assert_eq!(store.hit_count(&123).unwrap(), 2);
        assert_eq!(store.hit_count(&456).unwrap(), 0);
    }

    #[test]
    fn test_store_failure_not_cached() {
        let store = store();
        let calls = Cell::new(0);

        let failed: std::result::Result<String, Error> = store.try_get_or_compute(&1, || {
            calls.set(calls.get() + 1);
            Err(Error::Serialize("boom".to_string()))
        });
        assert!(failed.is_err());
        assert!(store.is_empty());
        assert_eq!(store.stats().failures(), 1);

        let ok: std::result::Result<String, Error> = store.try_get_or_compute(&1, || {
            calls.set(calls.get() + 1);
            Ok("one".to_string())
        });
        assert_eq!(ok.unwrap(), "one");
        assert_eq!(calls.get(), 2);
        assert_eq!(store.hit_count(&1).unwrap(), 0);
    }

    #[test]
    fn test_store_panic_not_cached() {
        let store = store();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.get_or_compute(&1, || panic!("boom")).unwrap()
        }));

        assert!(result.is_err());
        assert!(store.is_empty());
        assert_eq!(store.get_or_compute(&1, || "ok".to_string()).unwrap(), "ok");
    }

    #[test]
    fn test_store_clear() {
        let store = store();
        store.get_or_compute(&1, || "a".to_string()).unwrap();
        store.get_or_compute(&1, || "a".to_string()).unwrap();
        store.get_or_compute(&2, || "b".to_string()).unwrap();

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.hit_count(&1).unwrap(), 0);
        assert_eq!(store.stats().hits(), 0);

        let calls = Cell::new(0);
        store
            .get_or_compute(&1, || {
                calls.set(calls.get() + 1);
                "a".to_string()
            })
            .unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(store.hit_count(&1).unwrap(), 0);
    }

    #[test]
    fn test_store_first_insert_wins() {
        let store = store();
        let key = store.key(&7).unwrap();

        assert_eq!(store.insert(key.clone(), "first".to_string()), "first");
        // A late caller keeps its own result but does not replace the entry
        assert_eq!(store.insert(key.clone(), "second".to_string()), "second");
        assert_eq!(store.get_or_compute_by_key(key, || unreachable!()), "first");
        assert_eq!(store.stats().inserts(), 1);
    }

    #[test]
    fn test_store_cached_arguments() {
        let store = store();
        store.get_or_compute(&(2, "b"), || "x".to_string()).unwrap();
        store.get_or_compute(&(1, "a"), || "y".to_string()).unwrap();

        let args = store.cached_arguments().unwrap();
        assert_eq!(
            args,
            vec![
                vec![Value::Int(1), Value::from("a")],
                vec![Value::Int(2), Value::from("b")],
            ]
        );
        assert!(store.contains(&(1, "a")).unwrap());
        assert!(!store.contains(&(1, "b")).unwrap());
    }

    #[test]
    fn test_store_depth_limit() {
        let store: MemoStore<u8> = MemoStore::new(MemoConfig::new().with_max_depth(1));

        assert!(store.get_or_compute(&vec![1], || 0).is_ok());
        assert_eq!(
            store.get_or_compute(&vec![vec![1]], || 0),
            Err(Error::CyclicArgument { limit: 1 })
        );
        assert_eq!(store.len(), 1);
    }
}
