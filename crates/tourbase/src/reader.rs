//! Cache-aside reads against the remote store.
//!
//! The reader consults the cache first, falls back to a remote query on
//! a miss, and repopulates the cache on the way out. Remote calls are
//! bounded by a per-attempt timeout and retried with exponential backoff
//! for transient failures.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tourbase_core::cache::{
    collection_key, deserialize_document, deserialize_documents, document_key,
    serialize_document, serialize_documents, Cache,
};
use tourbase_core::store::{DocPath, Document, DocumentStore, Filter, Result, StoreError};

/// Retry configuration for remote reads and writes.
///
/// Attempt `n` (1-based) that fails transiently is followed by a delay of
/// `base_delay * 2^(n-1)` before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never less than 1.
    pub max_attempts: u32,
    /// Backoff delay after the first failed attempt.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff delay after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << shift)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

/// Per-call read behavior.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Whether to consult and populate the cache.
    pub use_cache: bool,
    /// Per-call TTL override; `None` uses the reader's default.
    pub ttl: Option<Duration>,
}

impl ReadOptions {
    /// Bypasses the cache entirely for this call.
    pub fn uncached() -> Self {
        Self {
            use_cache: false,
            ttl: None,
        }
    }

    /// Cached read with a specific TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            use_cache: true,
            ttl: Some(ttl),
        }
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            ttl: None,
        }
    }
}

/// Runs a remote operation under the per-attempt timeout, retrying
/// transient failures per the policy. Shared by the reader and mutator.
pub(crate) async fn run_with_retry<T, F, Fut>(
    retry: RetryPolicy,
    op_timeout: Duration,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 1;
    loop {
        let outcome = match tokio::time::timeout(op_timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                after_ms: op_timeout.as_millis() as u64,
            }),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < retry.max_attempts => {
                let delay = retry.delay_after(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = retry.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Remote operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Cached reader over a remote document store.
pub struct ResourceReader {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn Cache>,
    default_ttl: Duration,
    retry: RetryPolicy,
    op_timeout: Duration,
}

impl ResourceReader {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn Cache>,
        default_ttl: Duration,
        retry: RetryPolicy,
        op_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            default_ttl,
            retry,
            op_timeout,
        }
    }

    fn effective_ttl(&self, opts: &ReadOptions) -> Duration {
        opts.ttl.unwrap_or(self.default_ttl)
    }

    /// Reads a filtered collection, serving from cache while the entry
    /// is fresh.
    pub async fn collection(
        &self,
        collection: &str,
        filters: &[Filter],
        opts: ReadOptions,
    ) -> Result<Vec<Document>> {
        let cache_key = collection_key(collection, filters);

        if opts.use_cache {
            match self.cache.get(&cache_key).await {
                Ok(Some(bytes)) => {
                    if let Ok(docs) = deserialize_documents(&bytes) {
                        tracing::trace!(collection, count = docs.len(), "Cache hit for collection");
                        return Ok(docs);
                    }
                    // Deserialization failed - treat as cache miss
                    tracing::warn!(collection, "Cached collection snapshot failed to decode");
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(collection, error = %err, "Cache read failed");
                }
            }
        }

        tracing::trace!(collection, "Cache miss for collection");
        let docs = run_with_retry(self.retry, self.op_timeout, || {
            self.store.query(collection, filters)
        })
        .await?;

        if opts.use_cache {
            if let Ok(bytes) = serialize_documents(&docs) {
                let ttl = self.effective_ttl(&opts);
                if let Err(err) = self.cache.set(&cache_key, &bytes, Some(ttl)).await {
                    tracing::warn!(collection, error = %err, "Failed to cache collection");
                }
            }
        }

        Ok(docs)
    }

    /// Reads a single document. A missing remote document is `Ok(None)`
    /// and is not cached.
    pub async fn document(&self, path: &DocPath, opts: ReadOptions) -> Result<Option<Document>> {
        let cache_key = document_key(path);

        if opts.use_cache {
            match self.cache.get(&cache_key).await {
                Ok(Some(bytes)) => {
                    if let Ok(doc) = deserialize_document(&bytes) {
                        tracing::trace!(%path, "Cache hit for document");
                        return Ok(Some(doc));
                    }
                    tracing::warn!(%path, "Cached document failed to decode");
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(%path, error = %err, "Cache read failed");
                }
            }
        }

        tracing::trace!(%path, "Cache miss for document");
        let doc = run_with_retry(self.retry, self.op_timeout, || self.store.get(path)).await?;

        if opts.use_cache {
            if let Some(ref d) = doc {
                if let Ok(bytes) = serialize_document(d) {
                    let ttl = self.effective_ttl(&opts);
                    if let Err(err) = self.cache.set(&cache_key, &bytes, Some(ttl)).await {
                        tracing::warn!(%path, error = %err, "Failed to cache document");
                    }
                }
            }
        }

        Ok(doc)
    }
}
