use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use partnerfit_core::catalog::{PartnerCatalog, StoreCatalog};
use partnerfit_core::domain::partner::{Partner, PartnerId};
use partnerfit_core::domain::store::{StoreId, StoreProfile, StoreUpdate};
use partnerfit_core::domain::taxonomy::CommerceStage;
use partnerfit_core::errors::ValidationError;

pub mod memory;
pub mod partner;
pub mod store;

pub use memory::{InMemoryPartnerRepository, InMemoryStoreRepository};
pub use partner::SqlPartnerRepository;
pub use store::SqlStoreRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Stores are listed in the order they were first saved. Saving an existing
/// id replaces the profile without moving it and keeps its `created_at`.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<StoreProfile>, RepositoryError>;
    async fn list(&self) -> Result<Vec<StoreProfile>, RepositoryError>;
    async fn save(&self, store: StoreProfile) -> Result<(), RepositoryError>;

    /// Applies `update` to the stored profile in one atomic step and returns
    /// the result, or `None` for an unknown id. A rejected update writes
    /// nothing.
    async fn update(
        &self,
        id: &StoreId,
        update: StoreUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<StoreProfile>, RepositoryError>;

    async fn snapshot(&self) -> Result<StoreCatalog, RepositoryError> {
        Ok(StoreCatalog::new(self.list().await?))
    }
}

#[async_trait]
pub trait PartnerRepository: Send + Sync {
    async fn find_by_id(&self, id: &PartnerId) -> Result<Option<Partner>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Partner>, RepositoryError>;
    async fn list_by_category(
        &self,
        category: CommerceStage,
    ) -> Result<Vec<Partner>, RepositoryError>;
    async fn save(&self, partner: Partner) -> Result<(), RepositoryError>;

    async fn snapshot(&self) -> Result<PartnerCatalog, RepositoryError> {
        Ok(PartnerCatalog::new(self.list().await?))
    }
}

pub(crate) fn decode_error(error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}

pub(crate) fn encode_error(error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Encode(error.to_string())
}
