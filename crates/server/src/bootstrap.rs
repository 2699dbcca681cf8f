use std::sync::Arc;

use partnerfit_core::config::{AppConfig, ConfigError, EngineConfig, LoadOptions, StorageBackend};
use partnerfit_core::maturity::{JitterSource, RngJitter};
use partnerfit_core::recommendations::RecommendationEngine;
use partnerfit_db::{
    connect_and_migrate, InMemoryPartnerRepository, InMemoryStoreRepository, PartnerRepository,
    SqlPartnerRepository, SqlStoreRepository, StoreRepository,
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

/// Shared by every handler. Repositories own the catalogs; the engine is
/// stateless and cloned freely.
#[derive(Clone)]
pub struct AppState {
    pub stores: Arc<dyn StoreRepository>,
    pub partners: Arc<dyn PartnerRepository>,
    pub engine: RecommendationEngine,
    pub engine_config: EngineConfig,
    pub storage_backend: StorageBackend,
}

impl AppState {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        partners: Arc<dyn PartnerRepository>,
        engine_config: EngineConfig,
        storage_backend: StorageBackend,
    ) -> Self {
        Self {
            stores,
            partners,
            engine: RecommendationEngine::with_settings(engine_config.settings()),
            engine_config,
            storage_backend,
        }
    }

    /// In-memory repositories with default engine settings.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStoreRepository::default()),
            Arc::new(InMemoryPartnerRepository::default()),
            AppConfig::default().engine,
            StorageBackend::Memory,
        )
    }

    /// Jitter for one request: reproducible when `engine.maturity_seed` is set.
    pub fn jitter(&self) -> impl JitterSource {
        match self.engine_config.maturity_seed {
            Some(seed) => RngJitter::seeded(seed),
            None => RngJitter::from_entropy(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("storage initialization failed: {0}")]
    Storage(#[source] sqlx::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        storage_backend = config.storage.backend.as_str(),
        "starting application bootstrap"
    );

    let state = match config.storage.backend {
        StorageBackend::Memory => AppState::new(
            Arc::new(InMemoryStoreRepository::default()),
            Arc::new(InMemoryPartnerRepository::default()),
            config.engine.clone(),
            StorageBackend::Memory,
        ),
        StorageBackend::Sqlite => {
            let pool =
                connect_and_migrate(&config.storage).await.map_err(BootstrapError::Storage)?;
            info!(
                event_name = "system.bootstrap.storage_ready",
                max_connections = config.storage.max_connections,
                "sqlite storage connected and migrated"
            );
            AppState::new(
                Arc::new(SqlStoreRepository::new(pool.clone())),
                Arc::new(SqlPartnerRepository::new(pool)),
                config.engine.clone(),
                StorageBackend::Sqlite,
            )
        }
    };

    info!(
        event_name = "system.bootstrap.ready",
        compatibility_weight = config.engine.compatibility_weight,
        profitability_weight = config.engine.profitability_weight,
        seeded_jitter = config.engine.maturity_seed.is_some(),
        "application bootstrap complete"
    );

    Ok(Application { config, state })
}
