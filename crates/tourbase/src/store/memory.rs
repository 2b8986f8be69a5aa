//! In-memory document store backend.
//!
//! HashMap-backed implementation of the four store primitives, used for
//! tests and local development. Data is not persisted and is lost when
//! the store is dropped.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, RwLock};

use tourbase_core::store::{
    BatchOperation, DocPath, Document, DocumentStore, Filter, Result, SnapshotReceiver,
    StoreError,
};

type Collections = HashMap<String, BTreeMap<String, Value>>;

struct Watcher {
    filters: Vec<Filter>,
    tx: mpsc::UnboundedSender<Result<Vec<Document>>>,
}

/// In-memory [`DocumentStore`] with live watch support.
///
/// Batches are committed atomically: every operation is applied to a
/// working copy first, and the visible state is only swapped once the
/// whole batch has succeeded. Watchers receive a full filtered snapshot
/// of their collection after every commit that touches it.
#[derive(Clone)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
    watchers: Arc<RwLock<HashMap<String, Vec<Watcher>>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            watchers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn snapshot_of(collections: &Collections, collection: &str, filters: &[Filter]) -> Vec<Document> {
        collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .filter(|doc| filters.iter().all(|f| f.matches(doc)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Applies one operation to the working copy, or reports why the
    /// whole batch must fail.
    fn apply_op(working: &mut Collections, op: &BatchOperation) -> Result<()> {
        match op {
            BatchOperation::Set { path, data } => {
                let Value::Object(_) = data else {
                    return Err(StoreError::BatchFailed {
                        cause: format!("set at {path} requires an object payload"),
                    });
                };
                working
                    .entry(path.collection().to_string())
                    .or_default()
                    .insert(path.id().to_string(), data.clone());
            }
            BatchOperation::Update { path, data } => {
                let Value::Object(patch) = data else {
                    return Err(StoreError::BatchFailed {
                        cause: format!("update at {path} requires an object payload"),
                    });
                };
                let existing = working
                    .get_mut(path.collection())
                    .and_then(|docs| docs.get_mut(path.id()))
                    .ok_or_else(|| StoreError::BatchFailed {
                        cause: format!("update at {path} targets a missing document"),
                    })?;
                match existing {
                    Value::Object(fields) => {
                        for (k, v) in patch {
                            fields.insert(k.clone(), v.clone());
                        }
                    }
                    _ => {
                        *existing = data.clone();
                    }
                }
            }
            BatchOperation::Delete { path } => {
                if let Some(docs) = working.get_mut(path.collection()) {
                    docs.remove(path.id());
                }
            }
        }
        Ok(())
    }

    /// Pushes fresh snapshots to every watcher of the given collections,
    /// pruning watchers whose receivers have been dropped.
    ///
    /// Lock order is watchers, then collections; `watch` acquires them the
    /// same way, so a registration and a commit always serialize and a new
    /// watcher either sees a commit in its primed snapshot or receives it
    /// as a push.
    async fn notify(&self, touched: &[&str]) {
        let mut watchers = self.watchers.write().await;
        let collections = self.collections.read().await;
        for &collection in touched {
            if let Some(list) = watchers.get_mut(collection) {
                list.retain(|watcher| {
                    let snapshot = Self::snapshot_of(&collections, collection, &watcher.filters);
                    watcher.tx.send(Ok(snapshot)).is_ok()
                });
                if list.is_empty() {
                    watchers.remove(collection);
                }
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(Self::snapshot_of(&collections, collection, filters))
    }

    async fn get(&self, path: &DocPath) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(path.collection())
            .and_then(|docs| docs.get(path.id()))
            .map(|data| Document::new(path.id(), data.clone())))
    }

    async fn commit(&self, ops: &[BatchOperation]) -> Result<()> {
        if ops.is_empty() {
            return Ok(());
        }

        let mut touched: Vec<&str> = ops.iter().map(|op| op.path().collection()).collect();
        touched.sort_unstable();
        touched.dedup();

        {
            let mut collections = self.collections.write().await;

            // Apply against a working copy so a mid-batch failure leaves
            // the visible state untouched.
            let mut working = collections.clone();
            for op in ops {
                Self::apply_op(&mut working, op)?;
            }
            *collections = working;
        }

        self.notify(&touched).await;
        Ok(())
    }

    async fn watch(&self, collection: &str, filters: &[Filter]) -> Result<SnapshotReceiver> {
        let (tx, rx) = mpsc::unbounded_channel();

        // Prime and register under the watchers lock (watchers before
        // collections, matching notify) so no commit can land between the
        // initial snapshot and registration.
        let mut watchers = self.watchers.write().await;
        {
            let collections = self.collections.read().await;
            let snapshot = Self::snapshot_of(&collections, collection, filters);
            let _ = tx.send(Ok(snapshot));
        }
        watchers.entry(collection.to_string()).or_default().push(Watcher {
            filters: filters.to_vec(),
            tx,
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> DocPath {
        DocPath::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        let result = store.get(&path("vehicles/none")).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_commit_set_then_get() {
        let store = MemoryStore::new();
        store
            .commit(&[BatchOperation::set(
                path("vehicles/v-1"),
                json!({"name": "Innova Crysta", "seats": 7}),
            )])
            .await
            .unwrap();

        let doc = store.get(&path("vehicles/v-1")).await.unwrap().unwrap();
        assert_eq!(doc.id, "v-1");
        assert_eq!(doc.field("seats"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn test_query_with_filters() {
        let store = MemoryStore::new();
        store
            .commit(&[
                BatchOperation::set(path("vehicles/v-1"), json!({"category": "Suv"})),
                BatchOperation::set(path("vehicles/v-2"), json!({"category": "Bike"})),
                BatchOperation::set(path("vehicles/v-3"), json!({"category": "Suv"})),
            ])
            .await
            .unwrap();

        let all = store.query("vehicles", &[]).await.unwrap();
        assert_eq!(all.len(), 3);

        let suvs = store
            .query("vehicles", &[Filter::eq("category", json!("Suv"))])
            .await
            .unwrap();
        assert_eq!(suvs.len(), 2);

        let empty = store.query("unknown", &[]).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        store
            .commit(&[BatchOperation::set(
                path("vehicles/v-1"),
                json!({"name": "Thar", "available": true}),
            )])
            .await
            .unwrap();

        store
            .commit(&[BatchOperation::update(
                path("vehicles/v-1"),
                json!({"available": false}),
            )])
            .await
            .unwrap();

        let doc = store.get(&path("vehicles/v-1")).await.unwrap().unwrap();
        assert_eq!(doc.field("name"), Some(&json!("Thar")));
        assert_eq!(doc.field("available"), Some(&json!(false)));
    }

    #[tokio::test]
    async fn test_update_missing_fails_whole_batch() {
        let store = MemoryStore::new();

        let result = store
            .commit(&[
                BatchOperation::set(path("vehicles/v-1"), json!({"name": "Thar"})),
                BatchOperation::update(path("vehicles/ghost"), json!({"x": 1})),
            ])
            .await;

        assert!(matches!(result, Err(StoreError::BatchFailed { .. })));

        // The set in the same batch must not have been applied
        assert_eq!(store.get(&path("vehicles/v-1")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_can_follow_set_in_same_batch() {
        let store = MemoryStore::new();

        store
            .commit(&[
                BatchOperation::set(path("vehicles/v-1"), json!({"name": "Thar"})),
                BatchOperation::update(path("vehicles/v-1"), json!({"seats": 4})),
            ])
            .await
            .unwrap();

        let doc = store.get(&path("vehicles/v-1")).await.unwrap().unwrap();
        assert_eq!(doc.field("seats"), Some(&json!(4)));
    }

    #[tokio::test]
    async fn test_non_object_payload_fails_batch() {
        let store = MemoryStore::new();

        let result = store
            .commit(&[BatchOperation::set(path("vehicles/v-1"), json!("scalar"))])
            .await;

        assert!(matches!(result, Err(StoreError::BatchFailed { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = MemoryStore::new();
        store
            .commit(&[BatchOperation::delete(path("vehicles/none"))])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let store = MemoryStore::new();
        store.commit(&[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_watch_primes_with_initial_snapshot() {
        let store = MemoryStore::new();
        store
            .commit(&[BatchOperation::set(path("vehicles/v-1"), json!({"seats": 7}))])
            .await
            .unwrap();

        let mut rx = store.watch("vehicles", &[]).await.unwrap();
        let initial = rx.recv().await.unwrap().unwrap();
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].id, "v-1");
    }

    #[tokio::test]
    async fn test_watch_receives_commit_snapshots_in_order() {
        let store = MemoryStore::new();
        let mut rx = store.watch("vehicles", &[]).await.unwrap();

        // Initial empty snapshot
        assert!(rx.recv().await.unwrap().unwrap().is_empty());

        store
            .commit(&[BatchOperation::set(path("vehicles/v-1"), json!({"n": 1}))])
            .await
            .unwrap();
        store
            .commit(&[BatchOperation::set(path("vehicles/v-2"), json!({"n": 2}))])
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().unwrap().len(), 1);
        assert_eq!(rx.recv().await.unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_watch_respects_filters() {
        let store = MemoryStore::new();
        let mut rx = store
            .watch("vehicles", &[Filter::eq("category", json!("Suv"))])
            .await
            .unwrap();
        assert!(rx.recv().await.unwrap().unwrap().is_empty());

        store
            .commit(&[
                BatchOperation::set(path("vehicles/v-1"), json!({"category": "Suv"})),
                BatchOperation::set(path("vehicles/v-2"), json!({"category": "Bike"})),
            ])
            .await
            .unwrap();

        let snapshot = rx.recv().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "v-1");
    }

    #[tokio::test]
    async fn test_watch_other_collection_not_notified() {
        let store = MemoryStore::new();
        let mut rx = store.watch("bikeTours", &[]).await.unwrap();
        assert!(rx.recv().await.unwrap().unwrap().is_empty());

        store
            .commit(&[BatchOperation::set(path("vehicles/v-1"), json!({"n": 1}))])
            .await
            .unwrap();

        // No further snapshot is queued for bikeTours
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_pruned() {
        let store = MemoryStore::new();
        let rx = store.watch("vehicles", &[]).await.unwrap();
        drop(rx);

        store
            .commit(&[BatchOperation::set(path("vehicles/v-1"), json!({"n": 1}))])
            .await
            .unwrap();

        assert!(store.watchers.read().await.get("vehicles").is_none());
    }

    #[tokio::test]
    async fn test_watch_racing_a_commit_never_misses_it() {
        use std::time::Duration;

        // Every committed document must show up either in the primed
        // snapshot or in a later push, regardless of interleaving.
        for _ in 0..50 {
            let store = MemoryStore::new();
            let writer = store.clone();
            let commit = tokio::spawn(async move {
                writer
                    .commit(&[BatchOperation::set(
                        path("vehicles/v-1"),
                        json!({"n": 1}),
                    )])
                    .await
            });

            let mut rx = store.watch("vehicles", &[]).await.unwrap();
            commit.await.unwrap().unwrap();

            let mut seen = false;
            while let Ok(Some(Ok(snapshot))) =
                tokio::time::timeout(Duration::from_millis(100), rx.recv()).await
            {
                if snapshot.iter().any(|doc| doc.id == "v-1") {
                    seen = true;
                    break;
                }
            }
            assert!(seen, "commit was never delivered to the watcher");
        }
    }
}
