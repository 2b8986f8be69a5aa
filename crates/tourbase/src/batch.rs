//! Atomic multi-document writes with cache invalidation.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tourbase_core::cache::Cache;
use tourbase_core::store::{BatchOperation, DocumentStore, Result, StoreError};

use crate::reader::{run_with_retry, RetryPolicy};

/// Applies batches of write operations atomically and keeps the cache
/// consistent by invalidating every collection a successful batch touched.
pub struct BatchMutator {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn Cache>,
    retry: RetryPolicy,
    op_timeout: Duration,
}

impl BatchMutator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn Cache>,
        retry: RetryPolicy,
        op_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            retry,
            op_timeout,
        }
    }

    /// Commits the batch as a single atomic unit.
    ///
    /// Either every operation takes effect or none does. On success the
    /// cache entries of every touched collection are invalidated; on
    /// failure the cache is left untouched.
    pub async fn apply(&self, ops: Vec<BatchOperation>) -> Result<()> {
        if ops.is_empty() {
            tracing::debug!("Empty batch, nothing to commit");
            return Ok(());
        }

        validate_payloads(&ops)?;

        let touched: BTreeSet<String> = ops
            .iter()
            .map(|op| op.path().collection().to_string())
            .collect();

        run_with_retry(self.retry, self.op_timeout, || self.store.commit(&ops)).await?;

        tracing::debug!(
            ops = ops.len(),
            collections = touched.len(),
            "Batch committed"
        );

        for collection in &touched {
            if let Err(err) = self.cache.invalidate_collection(collection).await {
                tracing::warn!(collection, error = %err, "Failed to invalidate collection after batch");
            }
        }

        Ok(())
    }
}

/// Rejects non-object payloads before anything reaches the store.
fn validate_payloads(ops: &[BatchOperation]) -> Result<()> {
    for op in ops {
        let data = match op {
            BatchOperation::Set { data, .. } | BatchOperation::Update { data, .. } => data,
            BatchOperation::Delete { .. } => continue,
        };
        if !data.is_object() {
            return Err(StoreError::BatchFailed {
                cause: format!("payload for {} must be a JSON object", op.path()),
            });
        }
    }
    Ok(())
}
