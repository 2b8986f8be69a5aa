//! Local experience service.

use chrono::Utc;
use uuid::Uuid;

use tourbase_core::catalog::{validate_experience, CatalogRecord, Experience};

use super::{CollectionClient, Result};
use crate::subscriptions::SubscriptionGuard;

pub struct ExperienceService {
    client: CollectionClient<Experience>,
}

impl ExperienceService {
    pub(crate) fn new(client: CollectionClient<Experience>) -> Self {
        Self { client }
    }

    pub async fn list_experiences(&self) -> Result<Vec<Experience>> {
        self.client.list().await
    }

    pub async fn get_experience(&self, id: Uuid) -> Result<Option<Experience>> {
        self.client.find(id).await
    }

    pub async fn add_experience(&self, experience: Experience) -> Result<Uuid> {
        validate_experience(&experience)?;
        self.client.save(&experience).await?;
        Ok(experience.id)
    }

    pub async fn update_experience(&self, mut experience: Experience) -> Result<()> {
        validate_experience(&experience)?;
        experience.mark_updated(Utc::now());
        self.client.save(&experience).await
    }

    pub async fn delete_experience(&self, id: Uuid) -> Result<()> {
        self.client.remove(id).await
    }

    pub async fn subscribe_experiences(
        &self,
        on_update: impl Fn(Vec<Experience>) + Send + Sync + 'static,
    ) -> SubscriptionGuard {
        self.client.watch(on_update).await
    }
}
