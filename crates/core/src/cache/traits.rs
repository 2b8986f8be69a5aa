use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations with per-entry TTL and
/// per-collection invalidation.
///
/// Keys are built by [`super::collection_key`] / [`super::document_key`] so
/// every key carries its collection name; implementations maintain a
/// collection -> keys index from that and never scan the key space.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the cache by key. Expired entries are absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value with an optional TTL, overwriting unconditionally.
    /// `None` means the entry never expires on its own.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a single entry by key.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every entry belonging to the named collection.
    async fn invalidate_collection(&self, collection: &str) -> Result<()>;

    /// Removes all entries.
    async fn clear(&self) -> Result<()>;
}
