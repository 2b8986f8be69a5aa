//! Typed domain services over the generic data-access layer.
//!
//! Each service is a thin façade bound to one remote collection. The
//! cache, subscription, and batch layers below only ever see opaque
//! documents; encoding and decoding to the typed records happens here.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use tourbase_core::catalog::{CatalogError, CatalogRecord};
use tourbase_core::store::{BatchOperation, DocPath, Document, StoreError};

use crate::batch::BatchMutator;
use crate::reader::{ReadOptions, ResourceReader};
use crate::subscriptions::{SubscriptionGuard, SubscriptionRegistry};

mod bike_tours;
mod destinations;
mod experiences;
mod trip_plans;
mod vehicles;

pub use bike_tours::BikeTourService;
pub use destinations::DestinationService;
pub use experiences::ExperienceService;
pub use trip_plans::TripPlanService;
pub use vehicles::VehicleService;

/// Errors surfaced by the typed services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Shared plumbing for one typed collection.
///
/// Reads go through the cached reader, writes through the batch mutator
/// (so the cache is invalidated consistently), and live updates through
/// the subscription registry under the collection name as the key.
pub struct CollectionClient<T: CatalogRecord> {
    reader: Arc<ResourceReader>,
    registry: Arc<SubscriptionRegistry>,
    mutator: Arc<BatchMutator>,
    _record: PhantomData<fn() -> T>,
}

impl<T: CatalogRecord> CollectionClient<T> {
    pub(crate) fn new(
        reader: Arc<ResourceReader>,
        registry: Arc<SubscriptionRegistry>,
        mutator: Arc<BatchMutator>,
    ) -> Self {
        Self {
            reader,
            registry,
            mutator,
            _record: PhantomData,
        }
    }

    pub(crate) async fn list(&self) -> Result<Vec<T>> {
        let docs = self
            .reader
            .collection(T::COLLECTION, &[], ReadOptions::default())
            .await?;
        docs.into_iter()
            .map(|doc| decode::<T>(doc).map_err(ServiceError::from))
            .collect()
    }

    pub(crate) async fn find(&self, id: Uuid) -> Result<Option<T>> {
        let path = record_path::<T>(id)?;
        match self.reader.document(&path, ReadOptions::default()).await? {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    /// Writes the full record at its path.
    pub(crate) async fn save(&self, record: &T) -> Result<()> {
        let path = record_path::<T>(record.id())?;
        let data = encode(record)?;
        self.mutator
            .apply(vec![BatchOperation::set(path, data)])
            .await?;
        Ok(())
    }

    pub(crate) async fn remove(&self, id: Uuid) -> Result<()> {
        let path = record_path::<T>(id)?;
        self.mutator
            .apply(vec![BatchOperation::delete(path)])
            .await?;
        Ok(())
    }

    /// Live subscription to the whole collection. Documents that fail to
    /// decode are dropped from the snapshot with a warning.
    pub(crate) async fn watch(
        &self,
        on_update: impl Fn(Vec<T>) + Send + Sync + 'static,
    ) -> SubscriptionGuard {
        self.registry
            .subscribe(T::COLLECTION, T::COLLECTION, &[], move |docs| {
                let records: Vec<T> = docs
                    .into_iter()
                    .filter_map(|doc| match serde_json::from_value(doc.data) {
                        Ok(record) => Some(record),
                        Err(err) => {
                            tracing::warn!(
                                collection = T::COLLECTION,
                                id = %doc.id,
                                error = %err,
                                "Dropping undecodable document from snapshot"
                            );
                            None
                        }
                    })
                    .collect();
                on_update(records);
            })
            .await
    }
}

fn record_path<T: CatalogRecord>(id: Uuid) -> std::result::Result<DocPath, StoreError> {
    DocPath::new(T::COLLECTION, id.to_string())
}

fn encode<T: CatalogRecord>(record: &T) -> std::result::Result<Value, StoreError> {
    serde_json::to_value(record).map_err(|err| StoreError::BatchFailed {
        cause: format!("failed to encode {} record: {err}", T::COLLECTION),
    })
}

fn decode<T: CatalogRecord>(doc: Document) -> std::result::Result<T, StoreError> {
    serde_json::from_value(doc.data).map_err(|err| StoreError::Decode {
        collection: T::COLLECTION.to_string(),
        cause: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use tourbase_core::catalog::{Vehicle, VehicleCategory};

    #[test]
    fn test_encode_decode_round_trip() {
        let vehicle = Vehicle::new("Mahindra Thar", VehicleCategory::Suv, 4, 3500);
        let data = encode(&vehicle).unwrap();
        assert!(data.is_object());

        let doc = Document::new(vehicle.id.to_string(), data);
        let decoded: Vehicle = decode(doc).unwrap();
        assert_eq!(decoded, vehicle);
    }

    #[test]
    fn test_decode_rejects_mismatched_shape() {
        let doc = Document::new("v-1", json!({"name": 42}));
        let result = decode::<Vehicle>(doc);
        assert!(matches!(result, Err(StoreError::Decode { .. })));
    }

    #[test]
    fn test_record_path_uses_collection_and_id() {
        let id = Uuid::new_v4();
        let path = record_path::<Vehicle>(id).unwrap();
        assert_eq!(path.collection(), "vehicles");
        assert_eq!(path.id(), id.to_string());
    }
}
