//! In-memory cache implementation with LRU eviction.
//!
//! Thread-safe TTL cache using tokio synchronization primitives and an
//! LRU eviction policy. Every key is tracked in a collection -> keys
//! index so invalidating a collection never scans the key space.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use tourbase_core::cache::{collection_of_key, Cache, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// In-memory cache with LRU eviction and a per-collection key index.
///
/// Expired entries are evicted on access. The index maps each collection
/// name to the set of keys it currently owns, making
/// `invalidate_collection` proportional to the keys actually removed.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    /// Main key-value store with LRU eviction.
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
    /// Maps collection name -> set of cache keys that belong to it.
    tracking: Arc<RwLock<HashMap<String, HashSet<String>>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache with LRU eviction.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            tracking: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn untrack(&self, key: &str) {
        if let Some(collection) = collection_of_key(key) {
            let mut tracking = self.tracking.write().await;
            if let Some(keys) = tracking.get_mut(collection) {
                keys.remove(key);
                if keys.is_empty() {
                    tracking.remove(collection);
                }
            }
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let expired = {
            let mut store = self.store.write().await;
            match store.get(key) {
                Some(entry) if entry.is_expired() => {
                    store.pop(key);
                    true
                }
                Some(entry) => return Ok(Some(entry.value.clone())),
                None => return Ok(None),
            }
        };

        if expired {
            self.untrack(key).await;
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let evicted = {
            let mut store = self.store.write().await;
            let entry = CacheEntry::new(value.to_vec(), ttl);
            store.push(key.to_string(), entry)
        };

        // push returns the displaced entry: either the old value under the
        // same key (overwrite) or the LRU entry evicted to make room. Only
        // the latter leaves the index.
        if let Some((evicted_key, _)) = evicted {
            if evicted_key != key {
                self.untrack(&evicted_key).await;
            }
        }

        if let Some(collection) = collection_of_key(key) {
            let mut tracking = self.tracking.write().await;
            tracking
                .entry(collection.to_string())
                .or_default()
                .insert(key.to_string());
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        {
            let mut store = self.store.write().await;
            store.pop(key);
        }
        self.untrack(key).await;
        Ok(())
    }

    async fn invalidate_collection(&self, collection: &str) -> Result<()> {
        let tracked_keys = {
            let mut tracking = self.tracking.write().await;
            tracking.remove(collection).unwrap_or_default()
        };

        if !tracked_keys.is_empty() {
            let mut store = self.store.write().await;
            for key in &tracked_keys {
                store.pop(key);
            }
        }

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.store.write().await.clear();
        self.tracking.write().await.clear();
        Ok(())
    }
}
