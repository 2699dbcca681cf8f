use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::{Executor, Row, Sqlite};

use partnerfit_core::domain::store::{StoreId, StoreProfile, StoreUpdate};
use partnerfit_core::domain::taxonomy::CommerceStage;

use super::{decode_error, encode_error, RepositoryError, StoreRepository};
use crate::DbPool;

const STORE_COLUMNS: &str = "id, name, segment, size, monthly_revenue, monthly_orders, avg_ticket,
     conversion_rate, traffic_sources_json, pain_points_json, current_tools_json,
     priorities_json, created_at, updated_at";

pub struct SqlStoreRepository {
    pool: DbPool,
}

impl SqlStoreRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)).map_err(decode_error)
}

fn row_to_store(row: &sqlx::sqlite::SqliteRow) -> Result<StoreProfile, RepositoryError> {
    let id: String = row.try_get("id").map_err(decode_error)?;
    let name: String = row.try_get("name").map_err(decode_error)?;
    let segment: String = row.try_get("segment").map_err(decode_error)?;
    let size: String = row.try_get("size").map_err(decode_error)?;
    let monthly_revenue: f64 = row.try_get("monthly_revenue").map_err(decode_error)?;
    let monthly_orders: i64 = row.try_get("monthly_orders").map_err(decode_error)?;
    let avg_ticket: f64 = row.try_get("avg_ticket").map_err(decode_error)?;
    let conversion_rate: f64 = row.try_get("conversion_rate").map_err(decode_error)?;
    let traffic_sources_json: String =
        row.try_get("traffic_sources_json").map_err(decode_error)?;
    let pain_points_json: String = row.try_get("pain_points_json").map_err(decode_error)?;
    let current_tools_json: String = row.try_get("current_tools_json").map_err(decode_error)?;
    let priorities_json: String = row.try_get("priorities_json").map_err(decode_error)?;
    let created_at: String = row.try_get("created_at").map_err(decode_error)?;
    let updated_at: String = row.try_get("updated_at").map_err(decode_error)?;

    Ok(StoreProfile {
        id: StoreId(id),
        name,
        segment: segment.parse().map_err(decode_error)?,
        size: size.parse().map_err(decode_error)?,
        monthly_revenue,
        monthly_orders: u32::try_from(monthly_orders).map_err(decode_error)?,
        avg_ticket,
        conversion_rate,
        traffic_sources: serde_json::from_str::<BTreeMap<String, f64>>(&traffic_sources_json)
            .map_err(decode_error)?,
        pain_points: serde_json::from_str::<Vec<String>>(&pain_points_json)
            .map_err(decode_error)?,
        current_tools: serde_json::from_str::<Vec<String>>(&current_tools_json)
            .map_err(decode_error)?,
        priorities: serde_json::from_str::<BTreeMap<CommerceStage, u8>>(&priorities_json)
            .map_err(decode_error)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

async fn write_store<'e, E>(executor: E, store: &StoreProfile) -> Result<(), RepositoryError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let traffic_sources_json =
        serde_json::to_string(&store.traffic_sources).map_err(encode_error)?;
    let pain_points_json = serde_json::to_string(&store.pain_points).map_err(encode_error)?;
    let current_tools_json = serde_json::to_string(&store.current_tools).map_err(encode_error)?;
    let priorities_json = serde_json::to_string(&store.priorities).map_err(encode_error)?;

    // ON CONFLICT keeps the original rowid, so list order survives updates
    sqlx::query(
        "INSERT INTO store_profile (id, name, segment, size, monthly_revenue, monthly_orders,
                                    avg_ticket, conversion_rate, traffic_sources_json,
                                    pain_points_json, current_tools_json, priorities_json,
                                    created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             segment = excluded.segment,
             size = excluded.size,
             monthly_revenue = excluded.monthly_revenue,
             monthly_orders = excluded.monthly_orders,
             avg_ticket = excluded.avg_ticket,
             conversion_rate = excluded.conversion_rate,
             traffic_sources_json = excluded.traffic_sources_json,
             pain_points_json = excluded.pain_points_json,
             current_tools_json = excluded.current_tools_json,
             priorities_json = excluded.priorities_json,
             updated_at = excluded.updated_at",
    )
    .bind(&store.id.0)
    .bind(&store.name)
    .bind(store.segment.as_str())
    .bind(store.size.as_str())
    .bind(store.monthly_revenue)
    .bind(i64::from(store.monthly_orders))
    .bind(store.avg_ticket)
    .bind(store.conversion_rate)
    .bind(&traffic_sources_json)
    .bind(&pain_points_json)
    .bind(&current_tools_json)
    .bind(&priorities_json)
    .bind(store.created_at.to_rfc3339())
    .bind(store.updated_at.to_rfc3339())
    .execute(executor)
    .await?;

    Ok(())
}

#[async_trait::async_trait]
impl StoreRepository for SqlStoreRepository {
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<StoreProfile>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {STORE_COLUMNS} FROM store_profile WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_store(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<StoreProfile>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> =
            sqlx::query(&format!("SELECT {STORE_COLUMNS} FROM store_profile ORDER BY rowid"))
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_store).collect::<Result<Vec<_>, _>>()
    }

    async fn save(&self, store: StoreProfile) -> Result<(), RepositoryError> {
        write_store(&self.pool, &store).await
    }

    async fn update(
        &self,
        id: &StoreId,
        update: StoreUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<StoreProfile>, RepositoryError> {
        // IMMEDIATE takes the write lock before the read, so concurrent updates serialize
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let row = sqlx::query(&format!("SELECT {STORE_COLUMNS} FROM store_profile WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut store = row_to_store(&row)?;
        update.apply(&mut store, now)?;
        write_store(&mut *tx, &store).await?;
        tx.commit().await?;
        Ok(Some(store))
    }
}
