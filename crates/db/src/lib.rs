pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_and_migrate, connect_with_settings, DbPool};
pub use fixtures::{SampleDataset, SeedError, SeedResult, VerificationResult};
pub use repositories::{
    InMemoryPartnerRepository, InMemoryStoreRepository, PartnerRepository, RepositoryError,
    SqlPartnerRepository, SqlStoreRepository, StoreRepository,
};
