//! Fleet vehicle service.

use chrono::Utc;
use uuid::Uuid;

use tourbase_core::catalog::{validate_vehicle, CatalogRecord, Vehicle};

use super::{CollectionClient, Result};
use crate::subscriptions::SubscriptionGuard;

pub struct VehicleService {
    client: CollectionClient<Vehicle>,
}

impl VehicleService {
    pub(crate) fn new(client: CollectionClient<Vehicle>) -> Self {
        Self { client }
    }

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.client.list().await
    }

    pub async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>> {
        self.client.find(id).await
    }

    /// Validates and stores a new vehicle, returning its ID.
    pub async fn add_vehicle(&self, vehicle: Vehicle) -> Result<Uuid> {
        validate_vehicle(&vehicle)?;
        self.client.save(&vehicle).await?;
        Ok(vehicle.id)
    }

    /// Validates and rewrites the vehicle, bumping its `updated_at`.
    pub async fn update_vehicle(&self, mut vehicle: Vehicle) -> Result<()> {
        validate_vehicle(&vehicle)?;
        vehicle.mark_updated(Utc::now());
        self.client.save(&vehicle).await
    }

    pub async fn delete_vehicle(&self, id: Uuid) -> Result<()> {
        self.client.remove(id).await
    }

    pub async fn subscribe_vehicles(
        &self,
        on_update: impl Fn(Vec<Vehicle>) + Send + Sync + 'static,
    ) -> SubscriptionGuard {
        self.client.watch(on_update).await
    }
}
