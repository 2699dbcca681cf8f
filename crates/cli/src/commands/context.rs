use std::future::Future;

use partnerfit_core::catalog::{PartnerCatalog, StoreCatalog};
use partnerfit_core::config::{AppConfig, LoadOptions, StorageBackend};
use partnerfit_core::errors::{DomainError, ValidationError};
use partnerfit_core::maturity::{JitterSource, RngJitter};
use partnerfit_core::recommendations::RecommendationEngine;
use partnerfit_db::{
    connect_and_migrate, DbPool, InMemoryPartnerRepository, InMemoryStoreRepository,
    PartnerRepository, SampleDataset, SqlPartnerRepository, SqlStoreRepository, StoreRepository,
};
use serde::Serialize;

use crate::commands::CommandResult;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_STORAGE: u8 = 4;
pub const EXIT_SEED: u8 = 5;
pub const EXIT_NOT_FOUND: u8 = 6;
pub const EXIT_INVALID_INPUT: u8 = 7;

/// `(error_class, message, exit_code)` reported by a failed command.
pub type Failure = (&'static str, String, u8);

/// Repositories and engine wired from the effective configuration.
///
/// The memory backend starts from the sample dataset so that read-only
/// commands have something to work on within a single invocation.
pub struct CommandContext {
    pub config: AppConfig,
    pub engine: RecommendationEngine,
    stores: Box<dyn StoreRepository>,
    partners: Box<dyn PartnerRepository>,
    pool: Option<DbPool>,
}

impl CommandContext {
    pub async fn open(config: AppConfig) -> Result<Self, Failure> {
        let engine = RecommendationEngine::with_settings(config.engine.settings());

        match config.storage.backend {
            StorageBackend::Memory => {
                let stores = InMemoryStoreRepository::default();
                let partners = InMemoryPartnerRepository::default();
                SampleDataset::load(&stores, &partners)
                    .await
                    .map_err(|error| ("seed_execution", error.to_string(), EXIT_SEED))?;
                Ok(Self {
                    config,
                    engine,
                    stores: Box::new(stores),
                    partners: Box::new(partners),
                    pool: None,
                })
            }
            StorageBackend::Sqlite => {
                let pool = connect_and_migrate(&config.storage)
                    .await
                    .map_err(|error| ("storage", error.to_string(), EXIT_STORAGE))?;
                Ok(Self {
                    config,
                    engine,
                    stores: Box::new(SqlStoreRepository::new(pool.clone())),
                    partners: Box::new(SqlPartnerRepository::new(pool.clone())),
                    pool: Some(pool),
                })
            }
        }
    }

    pub fn stores(&self) -> &dyn StoreRepository {
        self.stores.as_ref()
    }

    pub fn partners(&self) -> &dyn PartnerRepository {
        self.partners.as_ref()
    }

    pub async fn snapshot(&self) -> Result<(StoreCatalog, PartnerCatalog), Failure> {
        let stores = self.stores.snapshot().await.map_err(storage_failure)?;
        let partners = self.partners.snapshot().await.map_err(storage_failure)?;
        Ok((stores, partners))
    }

    /// Seeded when `engine.maturity_seed` is set, fresh entropy otherwise.
    pub fn jitter(&self) -> impl JitterSource {
        match self.config.engine.maturity_seed {
            Some(seed) => RngJitter::seeded(seed),
            None => RngJitter::from_entropy(),
        }
    }

    pub async fn close(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
        }
    }
}

pub fn load_config(command: &'static str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })
}

/// Runs `action` on a fresh current-thread runtime and wraps its outcome in
/// the command envelope.
pub fn execute<T, F>(command: &'static str, action: F) -> CommandResult
where
    T: Serialize,
    F: Future<Output = Result<(String, T), Failure>>,
{
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                command,
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    match runtime.block_on(action) {
        Ok((message, data)) => CommandResult::with_data(command, message, &data),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure(command, error_class, message, exit_code)
        }
    }
}

pub fn domain_failure(error: DomainError) -> Failure {
    if error.is_not_found() {
        ("not_found", error.to_string(), EXIT_NOT_FOUND)
    } else {
        ("invalid_input", error.to_string(), EXIT_INVALID_INPUT)
    }
}

pub fn validation_failure(error: ValidationError) -> Failure {
    ("invalid_input", error.to_string(), EXIT_INVALID_INPUT)
}

fn storage_failure(error: impl std::fmt::Display) -> Failure {
    ("storage", error.to_string(), EXIT_STORAGE)
}
