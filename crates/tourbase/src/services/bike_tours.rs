//! Guided bike tour service.

use chrono::Utc;
use uuid::Uuid;

use tourbase_core::catalog::{validate_bike_tour, BikeTour, CatalogRecord};

use super::{CollectionClient, Result};
use crate::subscriptions::SubscriptionGuard;

pub struct BikeTourService {
    client: CollectionClient<BikeTour>,
}

impl BikeTourService {
    pub(crate) fn new(client: CollectionClient<BikeTour>) -> Self {
        Self { client }
    }

    pub async fn list_bike_tours(&self) -> Result<Vec<BikeTour>> {
        self.client.list().await
    }

    pub async fn get_bike_tour(&self, id: Uuid) -> Result<Option<BikeTour>> {
        self.client.find(id).await
    }

    pub async fn add_bike_tour(&self, tour: BikeTour) -> Result<Uuid> {
        validate_bike_tour(&tour)?;
        self.client.save(&tour).await?;
        Ok(tour.id)
    }

    pub async fn update_bike_tour(&self, mut tour: BikeTour) -> Result<()> {
        validate_bike_tour(&tour)?;
        tour.mark_updated(Utc::now());
        self.client.save(&tour).await
    }

    pub async fn delete_bike_tour(&self, id: Uuid) -> Result<()> {
        self.client.remove(id).await
    }

    pub async fn subscribe_bike_tours(
        &self,
        on_update: impl Fn(Vec<BikeTour>) + Send + Sync + 'static,
    ) -> SubscriptionGuard {
        self.client.watch(on_update).await
    }
}
