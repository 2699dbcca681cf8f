use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use partnerfit_core::config::StorageConfig;

use crate::migrations;

pub type DbPool = sqlx::SqlitePool;

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(database_url, 5, 30).await
}

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect_with(options)
        .await
}

/// Opens the pool described by `storage` and brings its schema up to date.
pub async fn connect_and_migrate(storage: &StorageConfig) -> Result<DbPool, sqlx::Error> {
    let pool =
        connect_with_settings(&storage.url, storage.max_connections, storage.timeout_secs).await?;
    migrations::run_pending(&pool).await?;
    tracing::debug!(
        event_name = "db.migrations.applied",
        max_connections = storage.max_connections,
        "storage schema is up to date"
    );
    Ok(pool)
}
