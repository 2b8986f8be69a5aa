//! Curated trip plan service.

use chrono::Utc;
use uuid::Uuid;

use tourbase_core::catalog::{validate_trip_plan, CatalogRecord, TripPlan};

use super::{CollectionClient, Result};
use crate::subscriptions::SubscriptionGuard;

pub struct TripPlanService {
    client: CollectionClient<TripPlan>,
}

impl TripPlanService {
    pub(crate) fn new(client: CollectionClient<TripPlan>) -> Self {
        Self { client }
    }

    pub async fn list_trip_plans(&self) -> Result<Vec<TripPlan>> {
        self.client.list().await
    }

    pub async fn get_trip_plan(&self, id: Uuid) -> Result<Option<TripPlan>> {
        self.client.find(id).await
    }

    pub async fn add_trip_plan(&self, plan: TripPlan) -> Result<Uuid> {
        validate_trip_plan(&plan)?;
        self.client.save(&plan).await?;
        Ok(plan.id)
    }

    pub async fn update_trip_plan(&self, mut plan: TripPlan) -> Result<()> {
        validate_trip_plan(&plan)?;
        plan.mark_updated(Utc::now());
        self.client.save(&plan).await
    }

    pub async fn delete_trip_plan(&self, id: Uuid) -> Result<()> {
        self.client.remove(id).await
    }

    pub async fn subscribe_trip_plans(
        &self,
        on_update: impl Fn(Vec<TripPlan>) + Send + Sync + 'static,
    ) -> SubscriptionGuard {
        self.client.watch(on_update).await
    }
}
