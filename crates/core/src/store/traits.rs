use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{BatchOperation, DocPath, Document, Filter, Result};

/// Channel end on which a watch delivers full collection snapshots.
///
/// Each item is either a fresh snapshot or an in-band subscription error.
/// The channel closing means the store dropped the watch.
pub type SnapshotReceiver = mpsc::UnboundedReceiver<Result<Vec<Document>>>;

/// The four primitives the data-access layer requires of a remote
/// document database. Any backend offering these can sit underneath.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Runs a filtered query against a collection and returns the matching
    /// documents.
    async fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>>;

    /// Fetches a single document. A missing document is `Ok(None)`.
    async fn get(&self, path: &DocPath) -> Result<Option<Document>>;

    /// Applies all operations as one atomic unit, in the given order.
    /// Either every operation is applied or none are.
    async fn commit(&self, ops: &[BatchOperation]) -> Result<()>;

    /// Opens a live watch on a filtered collection.
    ///
    /// The receiver is primed with the current snapshot, then receives a
    /// full fresh snapshot after every commit touching the collection.
    async fn watch(&self, collection: &str, filters: &[Filter]) -> Result<SnapshotReceiver>;
}
