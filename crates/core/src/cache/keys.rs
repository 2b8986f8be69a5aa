//! Cache key construction.
//!
//! Every key starts with its collection name, so the collection a key
//! belongs to can always be recovered with [`collection_of_key`]. Cache
//! implementations use that to maintain an explicit collection -> keys
//! index for invalidation.

use crate::store::{DocPath, Filter};

/// Returns the cache key for a filtered collection query.
///
/// The filter signature is order-independent: filters are sorted before
/// formatting so logically identical queries share one cache entry.
pub fn collection_key(collection: &str, filters: &[Filter]) -> String {
    if filters.is_empty() {
        return format!("{collection}:list:all");
    }

    let mut parts: Vec<String> = filters
        .iter()
        .map(|f| format!("{}{}{}", f.field, f.op.symbol(), f.value))
        .collect();
    parts.sort();
    format!("{}:list:{}", collection, parts.join(","))
}

/// Returns the cache key for a single document.
pub fn document_key(path: &DocPath) -> String {
    format!("{}:doc:{}", path.collection(), path.id())
}

/// Extracts the collection name a cache key belongs to.
///
/// Returns `None` for keys not produced by this module.
pub fn collection_of_key(key: &str) -> Option<&str> {
    let (collection, rest) = key.split_once(':')?;
    if collection.is_empty() || rest.is_empty() {
        return None;
    }
    Some(collection)
}
