//! Live collection subscriptions.
//!
//! The registry keeps at most one live listener per key. Each snapshot the
//! store pushes is written through to the cache before the caller sees it,
//! so cached reads never lag behind an active subscription. Callers hold a
//! [`SubscriptionGuard`] and cancel synchronously; a stale guard from a
//! replaced subscription can never tear down its successor.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use tourbase_core::cache::{collection_key, serialize_documents, Cache};
use tourbase_core::store::{Document, DocumentStore, Filter};

/// Callback invoked with each collection snapshot.
pub type SnapshotCallback = dyn Fn(Vec<Document>) + Send + Sync;

struct ActiveSub {
    id: u64,
    alive: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

type ActiveMap = Arc<Mutex<HashMap<String, ActiveSub>>>;

/// Manages live listeners keyed by caller-chosen subscription keys.
pub struct SubscriptionRegistry {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn Cache>,
    default_ttl: Duration,
    active: ActiveMap,
    next_id: AtomicU64,
}

impl SubscriptionRegistry {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<dyn Cache>, default_ttl: Duration) -> Self {
        Self {
            store,
            cache,
            default_ttl,
            active: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Opens a live subscription for `key`, replacing any existing one.
    ///
    /// The callback fires once with the initial snapshot, then again for
    /// every snapshot the store pushes. If the subscription cannot be
    /// opened, or later fails in-stream, the callback receives a single
    /// empty snapshot and the subscription ends.
    pub async fn subscribe(
        &self,
        key: &str,
        collection: &str,
        filters: &[Filter],
        on_update: impl Fn(Vec<Document>) + Send + Sync + 'static,
    ) -> SubscriptionGuard {
        // One live listener per key: tear down any predecessor first
        if let Some(prev) = self.active.lock().unwrap().remove(key) {
            prev.alive.store(false, Ordering::SeqCst);
            prev.handle.abort();
            tracing::debug!(key, "Replacing existing subscription");
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let mut rx = match self.store.watch(collection, filters).await {
            Ok(rx) => rx,
            Err(err) => {
                tracing::warn!(key, collection, error = %err, "Failed to open subscription");
                on_update(Vec::new());
                return SubscriptionGuard::inert(key);
            }
        };

        let alive = Arc::new(AtomicBool::new(true));
        let cache = self.cache.clone();
        let cache_key = collection_key(collection, filters);
        let ttl = self.default_ttl;
        let task_alive = alive.clone();
        let task_active = self.active.clone();
        let task_key = key.to_string();
        let task_collection = collection.to_string();

        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Some(Ok(docs)) => {
                        if !task_alive.load(Ordering::SeqCst) {
                            break;
                        }
                        // Write-through: the cache sees the snapshot before
                        // the caller does
                        match serialize_documents(&docs) {
                            Ok(bytes) => {
                                if let Err(err) = cache.set(&cache_key, &bytes, Some(ttl)).await {
                                    tracing::warn!(
                                        collection = %task_collection,
                                        error = %err,
                                        "Failed to write snapshot through to cache"
                                    );
                                }
                            }
                            Err(err) => {
                                tracing::warn!(
                                    collection = %task_collection,
                                    error = %err,
                                    "Failed to serialize snapshot"
                                );
                            }
                        }
                        if !task_alive.load(Ordering::SeqCst) {
                            break;
                        }
                        on_update(docs);
                    }
                    Some(Err(err)) => {
                        tracing::warn!(
                            collection = %task_collection,
                            error = %err,
                            "Subscription stream failed"
                        );
                        if task_alive.load(Ordering::SeqCst) {
                            on_update(Vec::new());
                        }
                        break;
                    }
                    None => break,
                }
            }
            // Drop the registry entry unless a successor already replaced it
            let mut map = task_active.lock().unwrap();
            if map.get(&task_key).is_some_and(|sub| sub.id == id) {
                map.remove(&task_key);
            }
        });

        self.active.lock().unwrap().insert(
            key.to_string(),
            ActiveSub {
                id,
                alive: alive.clone(),
                handle,
            },
        );
        tracing::debug!(key, collection, "Subscription opened");

        SubscriptionGuard {
            key: key.to_string(),
            id,
            alive,
            active: Some(self.active.clone()),
        }
    }

    /// Whether a live listener is registered for `key`.
    pub fn is_active(&self, key: &str) -> bool {
        self.active.lock().unwrap().contains_key(key)
    }

    /// Tears down every active subscription.
    pub fn cleanup_all(&self) {
        let drained: Vec<(String, ActiveSub)> =
            self.active.lock().unwrap().drain().collect();
        for (key, sub) in drained {
            sub.alive.store(false, Ordering::SeqCst);
            sub.handle.abort();
            tracing::debug!(key, "Subscription cancelled");
        }
    }
}

/// Handle to a live subscription. Cancelling is synchronous: after
/// [`cancel`](SubscriptionGuard::cancel) returns, the callback will not
/// fire again. Dropping the guard cancels too.
pub struct SubscriptionGuard {
    key: String,
    id: u64,
    alive: Arc<AtomicBool>,
    active: Option<ActiveMap>,
}

impl SubscriptionGuard {
    /// Guard for a subscription that never opened.
    fn inert(key: &str) -> Self {
        Self {
            key: key.to_string(),
            id: 0,
            alive: Arc::new(AtomicBool::new(false)),
            active: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stops the subscription. Idempotent, and a no-op if a newer
    /// subscription has already taken over this key.
    pub fn cancel(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
        let Some(active) = self.active.take() else {
            return;
        };
        let mut map = active.lock().unwrap();
        // Generation check: only remove the entry this guard created
        if map.get(&self.key).is_some_and(|sub| sub.id == self.id) {
            if let Some(sub) = map.remove(&self.key) {
                sub.handle.abort();
                tracing::debug!(key = %self.key, "Subscription cancelled");
            }
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}
