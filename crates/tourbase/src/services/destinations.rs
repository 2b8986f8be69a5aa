//! Destination catalog service.

use chrono::Utc;
use uuid::Uuid;

use tourbase_core::catalog::{validate_destination, CatalogRecord, Destination};

use super::{CollectionClient, Result};
use crate::subscriptions::SubscriptionGuard;

pub struct DestinationService {
    client: CollectionClient<Destination>,
}

impl DestinationService {
    pub(crate) fn new(client: CollectionClient<Destination>) -> Self {
        Self { client }
    }

    pub async fn list_destinations(&self) -> Result<Vec<Destination>> {
        self.client.list().await
    }

    pub async fn get_destination(&self, id: Uuid) -> Result<Option<Destination>> {
        self.client.find(id).await
    }

    pub async fn add_destination(&self, destination: Destination) -> Result<Uuid> {
        validate_destination(&destination)?;
        self.client.save(&destination).await?;
        Ok(destination.id)
    }

    pub async fn update_destination(&self, mut destination: Destination) -> Result<()> {
        validate_destination(&destination)?;
        destination.mark_updated(Utc::now());
        self.client.save(&destination).await
    }

    pub async fn delete_destination(&self, id: Uuid) -> Result<()> {
        self.client.remove(id).await
    }

    pub async fn subscribe_destinations(
        &self,
        on_update: impl Fn(Vec<Destination>) + Send + Sync + 'static,
    ) -> SubscriptionGuard {
        self.client.watch(on_update).await
    }
}
