use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use partnerfit_core::catalog::{PartnerCatalog, StoreCatalog};
use partnerfit_core::domain::partner::{Partner, PartnerId};
use partnerfit_core::domain::store::{StoreId, StoreProfile, StoreUpdate};
use partnerfit_core::domain::taxonomy::CommerceStage;

use super::{PartnerRepository, RepositoryError, StoreRepository};

#[derive(Default)]
pub struct InMemoryStoreRepository {
    stores: RwLock<StoreCatalog>,
}

impl InMemoryStoreRepository {
    pub fn from_catalog(catalog: StoreCatalog) -> Self {
        Self { stores: RwLock::new(catalog) }
    }
}

#[async_trait::async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<StoreProfile>, RepositoryError> {
        let stores = self.stores.read().await;
        Ok(stores.find(id).cloned())
    }

    async fn list(&self) -> Result<Vec<StoreProfile>, RepositoryError> {
        let stores = self.stores.read().await;
        Ok(stores.as_slice().to_vec())
    }

    async fn save(&self, mut store: StoreProfile) -> Result<(), RepositoryError> {
        let mut stores = self.stores.write().await;
        if let Some(existing) = stores.find(&store.id) {
            store.created_at = existing.created_at;
        }
        stores.upsert(store);
        Ok(())
    }

    async fn update(
        &self,
        id: &StoreId,
        update: StoreUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<StoreProfile>, RepositoryError> {
        let mut stores = self.stores.write().await;
        let Some(profile) = stores.find_mut(id) else {
            return Ok(None);
        };
        update.apply(profile, now)?;
        Ok(Some(profile.clone()))
    }

    async fn snapshot(&self) -> Result<StoreCatalog, RepositoryError> {
        Ok(self.stores.read().await.clone())
    }
}

#[derive(Default)]
pub struct InMemoryPartnerRepository {
    partners: RwLock<PartnerCatalog>,
}

impl InMemoryPartnerRepository {
    pub fn from_catalog(catalog: PartnerCatalog) -> Self {
        Self { partners: RwLock::new(catalog) }
    }
}

#[async_trait::async_trait]
impl PartnerRepository for InMemoryPartnerRepository {
    async fn find_by_id(&self, id: &PartnerId) -> Result<Option<Partner>, RepositoryError> {
        let partners = self.partners.read().await;
        Ok(partners.find(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Partner>, RepositoryError> {
        let partners = self.partners.read().await;
        Ok(partners.as_slice().to_vec())
    }

    async fn list_by_category(
        &self,
        category: CommerceStage,
    ) -> Result<Vec<Partner>, RepositoryError> {
        let partners = self.partners.read().await;
        Ok(partners.by_category(category).cloned().collect())
    }

    async fn save(&self, partner: Partner) -> Result<(), RepositoryError> {
        let mut partners = self.partners.write().await;
        partners.upsert(partner);
        Ok(())
    }

    async fn snapshot(&self) -> Result<PartnerCatalog, RepositoryError> {
        Ok(self.partners.read().await.clone())
    }
}
