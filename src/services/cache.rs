//! Read-through TTL cache over the local key-value storage port.
//!
//! Entries carry their own creation timestamp and time-to-live; expiry is
//! checked on every lookup and the entry removed once stale. The cache is
//! best-effort only: serialization or storage failures are logged and
//! swallowed, degrading to always-miss. Writes elsewhere never invalidate
//! entries; staleness is bounded by TTL alone.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ports::{Clock, KeyValueStore};

/// Prefix isolating cache entries from unrelated keys in shared storage.
pub const CACHE_NAMESPACE: &str = "tutorhub_cache:";

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Epoch millis at which the entry was stored.
    ts: i64,
    /// Time-to-live in millis.
    ttl: i64,
    data: serde_json::Value,
}

#[derive(Clone)]
pub struct TtlCache {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Store a value under a namespaced key for `ttl_minutes`. Best-effort:
    /// failures are logged, never propagated.
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl_minutes: i64) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(err) => {
                warn!(key, "cache put failed to serialize payload: {err}");
                return;
            }
        };
        let entry = CacheEntry {
            ts: self.clock.now_millis(),
            ttl: ttl_minutes * 60_000,
            data,
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, "cache put failed to serialize entry: {err}");
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.namespaced(key), &raw) {
            warn!(key, "cache put failed to persist: {err}");
        }
    }

    /// Look up a value. Absent on miss, on expiry (removing the stale entry),
    /// and on any storage or deserialization failure (fail open).
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(&self.namespaced(key)).ok()??;
        let entry: CacheEntry = serde_json::from_str(&raw).ok()?;

        if self.clock.now_millis() - entry.ts > entry.ttl {
            self.evict(key);
            return None;
        }

        serde_json::from_value(entry.data).ok()
    }

    /// Remove a single entry unconditionally.
    pub fn evict(&self, key: &str) {
        if let Err(err) = self.storage.remove(&self.namespaced(key)) {
            warn!(key, "cache evict failed: {err}");
        }
    }

    /// Remove every entry under the cache namespace, leaving unrelated
    /// stored data untouched.
    pub fn evict_all(&self) {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(err) => {
                warn!("cache sweep failed to list keys: {err}");
                return;
            }
        };
        for key in keys.iter().filter(|k| k.starts_with(CACHE_NAMESPACE)) {
            if let Err(err) = self.storage.remove(key) {
                warn!(key, "cache sweep failed to remove entry: {err}");
            }
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{CACHE_NAMESPACE}{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryKeyValueStore, ManualClock};
    use chrono::Duration;

    fn setup() -> (Arc<InMemoryKeyValueStore>, Arc<ManualClock>, TtlCache) {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        let clock = Arc::new(ManualClock::default());
        let cache = TtlCache::new(storage.clone(), clock.clone());
        (storage, clock, cache)
    }

    #[test]
    fn test_round_trip() {
        let (_, _, cache) = setup();
        cache.put("courses", &vec!["algebra", "geometry"], 30);
        let hit: Vec<String> = cache.get("courses").unwrap();
        assert_eq!(hit, vec!["algebra", "geometry"]);
    }

    #[test]
    fn test_expiry_removes_entry_from_storage() {
        let (storage, clock, cache) = setup();
        cache.put("courses", &"payload", 1);

        clock.advance(Duration::seconds(61));
        assert_eq!(cache.get::<String>("courses"), None);
        assert_eq!(
            storage.get("tutorhub_cache:courses").unwrap(),
            None,
            "expired entry must be deleted from storage"
        );
    }

    #[test]
    fn test_fresh_entry_survives_within_ttl() {
        let (_, clock, cache) = setup();
        cache.put("courses", &"payload", 1);

        clock.advance(Duration::seconds(59));
        assert_eq!(cache.get::<String>("courses"), Some("payload".to_string()));
    }

    #[test]
    fn test_evict_all_spares_non_namespaced_keys() {
        let (storage, _, cache) = setup();
        cache.put("courses", &"a", 30);
        cache.put("course_c1", &"b", 60);
        storage.set("tutorhub_session_profile", "{}").unwrap();

        cache.evict_all();

        assert_eq!(cache.get::<String>("courses"), None);
        assert_eq!(cache.get::<String>("course_c1"), None);
        assert_eq!(
            storage.get("tutorhub_session_profile").unwrap(),
            Some("{}".to_string())
        );
    }

    #[test]
    fn test_corrupt_entry_reads_as_absent() {
        let (storage, _, cache) = setup();
        storage
            .set("tutorhub_cache:courses", "not valid json {")
            .unwrap();
        assert_eq!(cache.get::<String>("courses"), None);
    }

    #[test]
    fn test_put_failure_is_swallowed() {
        let storage = Arc::new(InMemoryKeyValueStore::new());
        storage.fail_writes(true);
        let cache = TtlCache::new(storage.clone(), Arc::new(ManualClock::default()));

        // Must not panic or propagate; subsequent reads just miss
        cache.put("courses", &"payload", 30);
        assert_eq!(cache.get::<String>("courses"), None);
    }
}
