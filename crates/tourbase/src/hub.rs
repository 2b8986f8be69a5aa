//! Explicit wiring of the data-access stack.
//!
//! The hub owns one reader, one subscription registry, and one batch
//! mutator, all sharing a single store and cache, and hands out the five
//! typed services built on top of them. Nothing here is global; callers
//! construct a hub with whatever store and cache they want to inject.

use std::sync::Arc;

use tourbase_core::cache::Cache;
use tourbase_core::store::DocumentStore;

use crate::batch::BatchMutator;
use crate::cache::MemoryCache;
use crate::config::Config;
use crate::reader::ResourceReader;
use crate::services::{
    BikeTourService, CollectionClient, DestinationService, ExperienceService, TripPlanService,
    VehicleService,
};
use crate::store::MemoryStore;
use crate::subscriptions::SubscriptionRegistry;

/// Entry point to the data layer: the five domain services plus the
/// shared registry and cache.
pub struct DataHub {
    pub vehicles: VehicleService,
    pub bike_tours: BikeTourService,
    pub destinations: DestinationService,
    pub experiences: ExperienceService,
    pub trip_plans: TripPlanService,
    registry: Arc<SubscriptionRegistry>,
    cache: Arc<dyn Cache>,
}

impl DataHub {
    /// Builds the stack over any store and cache implementation.
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<dyn Cache>, config: &Config) -> Self {
        let reader = Arc::new(ResourceReader::new(
            store.clone(),
            cache.clone(),
            config.cache_ttl(),
            config.retry_policy(),
            config.op_timeout(),
        ));
        let registry = Arc::new(SubscriptionRegistry::new(
            store.clone(),
            cache.clone(),
            config.cache_ttl(),
        ));
        let mutator = Arc::new(BatchMutator::new(
            store,
            cache.clone(),
            config.retry_policy(),
            config.op_timeout(),
        ));

        tracing::debug!(
            ttl_seconds = config.cache_ttl_seconds,
            max_entries = config.cache_max_entries,
            "Data hub initialized"
        );

        Self {
            vehicles: VehicleService::new(CollectionClient::new(
                reader.clone(),
                registry.clone(),
                mutator.clone(),
            )),
            bike_tours: BikeTourService::new(CollectionClient::new(
                reader.clone(),
                registry.clone(),
                mutator.clone(),
            )),
            destinations: DestinationService::new(CollectionClient::new(
                reader.clone(),
                registry.clone(),
                mutator.clone(),
            )),
            experiences: ExperienceService::new(CollectionClient::new(
                reader.clone(),
                registry.clone(),
                mutator.clone(),
            )),
            trip_plans: TripPlanService::new(CollectionClient::new(reader, registry.clone(), mutator)),
            registry,
            cache,
        }
    }

    /// In-memory wiring for tests and local development.
    pub fn in_memory(config: &Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
        Self::new(store, cache, config)
    }

    /// Tears down every subscription and empties the cache.
    pub async fn shutdown(&self) {
        self.registry.cleanup_all();
        if let Err(err) = self.cache.clear().await {
            tracing::warn!(error = %err, "Failed to clear cache on shutdown");
        }
        tracing::debug!("Data hub shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use tourbase_core::catalog::{
        BikeTour, Destination, Difficulty, Experience, TripPlan, Vehicle, VehicleCategory,
    };
    use tourbase_core::store::{Document, DocumentStore, Filter, Result as StoreResult};
    use tourbase_core::store::{BatchOperation, DocPath, SnapshotReceiver};

    use crate::services::ServiceError;
    use tourbase_core::catalog::CatalogError;

    fn test_config() -> Config {
        Config {
            cache_ttl_seconds: 300,
            cache_max_entries: 1000,
            op_timeout_seconds: 5,
            retry_max_attempts: 1,
            retry_base_delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_vehicle_round_trip() {
        let hub = DataHub::in_memory(&test_config());

        let vehicle = Vehicle::new("Mahindra Thar", VehicleCategory::Suv, 4, 3500)
            .with_description("Hardtop, snow chains included");
        let id = hub.vehicles.add_vehicle(vehicle.clone()).await.unwrap();
        assert_eq!(id, vehicle.id);

        let listed = hub.vehicles.list_vehicles().await.unwrap();
        assert_eq!(listed, vec![vehicle.clone()]);

        let fetched = hub.vehicles.get_vehicle(id).await.unwrap();
        assert_eq!(fetched, Some(vehicle));
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let hub = DataHub::in_memory(&test_config());

        let vehicle = Vehicle::new("Innova Crysta", VehicleCategory::Sedan, 7, 2800);
        let created_at = vehicle.created_at;
        let id = hub.vehicles.add_vehicle(vehicle.clone()).await.unwrap();

        let mut changed = vehicle;
        changed.price_per_day = 3000;
        hub.vehicles.update_vehicle(changed).await.unwrap();

        let fetched = hub.vehicles.get_vehicle(id).await.unwrap().unwrap();
        assert_eq!(fetched.price_per_day, 3000);
        assert_eq!(fetched.created_at, created_at);
        assert!(fetched.updated_at > created_at);
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let hub = DataHub::in_memory(&test_config());

        let tour = BikeTour::new(
            "Manali to Leh",
            "Manali - Keylong - Leh",
            9,
            Difficulty::Challenging,
            45000,
        );
        let id = hub.bike_tours.add_bike_tour(tour).await.unwrap();

        hub.bike_tours.delete_bike_tour(id).await.unwrap();
        assert_eq!(hub.bike_tours.get_bike_tour(id).await.unwrap(), None);
        assert!(hub.bike_tours.list_bike_tours().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_record_is_rejected_before_write() {
        let hub = DataHub::in_memory(&test_config());

        let vehicle = Vehicle::new("", VehicleCategory::Suv, 4, 3500);
        let result = hub.vehicles.add_vehicle(vehicle).await;

        assert_eq!(result, Err(ServiceError::Invalid(CatalogError::EmptyName)));
        assert!(hub.vehicles.list_vehicles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_invalidates_cached_list() {
        let hub = DataHub::in_memory(&test_config());

        // Prime the cache with the empty collection
        assert!(hub.destinations.list_destinations().await.unwrap().is_empty());

        let destination = Destination::new("Spiti Valley", "Himachal Pradesh", 3800)
            .with_best_season("June to September");
        hub.destinations.add_destination(destination.clone()).await.unwrap();

        // The pre-write snapshot must not be served
        let listed = hub.destinations.list_destinations().await.unwrap();
        assert_eq!(listed, vec![destination]);
    }

    #[tokio::test]
    async fn test_cached_list_issues_one_remote_query() {
        struct CountingStore {
            inner: MemoryStore,
            queries: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl DocumentStore for CountingStore {
            async fn query(
                &self,
                collection: &str,
                filters: &[Filter],
            ) -> StoreResult<Vec<Document>> {
                self.queries.fetch_add(1, Ordering::SeqCst);
                self.inner.query(collection, filters).await
            }
            async fn get(&self, path: &DocPath) -> StoreResult<Option<Document>> {
                self.inner.get(path).await
            }
            async fn commit(&self, ops: &[BatchOperation]) -> StoreResult<()> {
                self.inner.commit(ops).await
            }
            async fn watch(
                &self,
                collection: &str,
                filters: &[Filter],
            ) -> StoreResult<SnapshotReceiver> {
                self.inner.watch(collection, filters).await
            }
        }

        let store = Arc::new(CountingStore {
            inner: MemoryStore::new(),
            queries: AtomicUsize::new(0),
        });
        let cache = Arc::new(MemoryCache::new(1000));
        let hub = DataHub::new(store.clone(), cache, &test_config());

        hub.experiences.list_experiences().await.unwrap();
        hub.experiences.list_experiences().await.unwrap();

        assert_eq!(store.queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_subscription_delivers_typed_records() {
        let hub = DataHub::in_memory(&test_config());

        let seen: Arc<Mutex<Vec<Vec<TripPlan>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _guard = hub
            .trip_plans
            .subscribe_trip_plans(move |plans| {
                sink.lock().unwrap().push(plans);
            })
            .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let plan = TripPlan::new("Ladakh circuit", 7, 60000)
            .with_region("Ladakh")
            .with_day("Arrive in Leh, acclimatize");
        hub.trip_plans.add_trip_plan(plan.clone()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let snapshots = seen.lock().unwrap();
        // Initial empty snapshot, then the one holding the new plan
        assert!(snapshots.len() >= 2);
        assert_eq!(snapshots.last().unwrap(), &vec![plan]);
    }

    #[tokio::test]
    async fn test_shutdown_drops_subscriptions_and_cache() {
        let hub = DataHub::in_memory(&test_config());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _guard = hub
            .experiences
            .subscribe_experiences(move |_records| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        hub.shutdown().await;
        let calls_before = calls.load(Ordering::SeqCst);

        let experience = Experience::new("River rafting", "Adventure", "Rishikesh", 3, 1500);
        hub.experiences.add_experience(experience).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(calls.load(Ordering::SeqCst), calls_before);
    }
}
