use std::collections::BTreeSet;

use sqlx::Row;

use partnerfit_core::domain::partner::{Partner, PartnerId};
use partnerfit_core::domain::taxonomy::{CommerceStage, StoreSegment, StoreSize};

use super::{decode_error, encode_error, PartnerRepository, RepositoryError};
use crate::DbPool;

const PARTNER_COLUMNS: &str = "id, name, category, subcategory, description, pricing_model,
     min_price, max_price, target_segments_json, target_sizes_json, integration_complexity,
     roi_potential, commission_rate";

pub struct SqlPartnerRepository {
    pool: DbPool,
}

impl SqlPartnerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_partner(row: &sqlx::sqlite::SqliteRow) -> Result<Partner, RepositoryError> {
    let id: String = row.try_get("id").map_err(decode_error)?;
    let category: String = row.try_get("category").map_err(decode_error)?;
    let pricing_model: String = row.try_get("pricing_model").map_err(decode_error)?;
    let target_segments_json: String =
        row.try_get("target_segments_json").map_err(decode_error)?;
    let target_sizes_json: String = row.try_get("target_sizes_json").map_err(decode_error)?;
    let integration_complexity: i64 =
        row.try_get("integration_complexity").map_err(decode_error)?;
    let roi_potential: i64 = row.try_get("roi_potential").map_err(decode_error)?;

    Ok(Partner {
        id: PartnerId(id),
        name: row.try_get("name").map_err(decode_error)?,
        category: category.parse().map_err(decode_error)?,
        subcategory: row.try_get("subcategory").map_err(decode_error)?,
        description: row.try_get("description").map_err(decode_error)?,
        pricing_model: pricing_model.parse().map_err(decode_error)?,
        min_price: row.try_get("min_price").map_err(decode_error)?,
        max_price: row.try_get::<Option<f64>, _>("max_price").map_err(decode_error)?,
        target_segments: serde_json::from_str::<BTreeSet<StoreSegment>>(&target_segments_json)
            .map_err(decode_error)?,
        target_sizes: serde_json::from_str::<BTreeSet<StoreSize>>(&target_sizes_json)
            .map_err(decode_error)?,
        integration_complexity: u8::try_from(integration_complexity).map_err(decode_error)?,
        roi_potential: u8::try_from(roi_potential).map_err(decode_error)?,
        commission_rate: row.try_get("commission_rate").map_err(decode_error)?,
    })
}

#[async_trait::async_trait]
impl PartnerRepository for SqlPartnerRepository {
    async fn find_by_id(&self, id: &PartnerId) -> Result<Option<Partner>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PARTNER_COLUMNS} FROM partner WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_partner(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Partner>, RepositoryError> {
        let rows = sqlx::query(&format!("SELECT {PARTNER_COLUMNS} FROM partner ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_partner).collect::<Result<Vec<_>, _>>()
    }

    async fn list_by_category(
        &self,
        category: CommerceStage,
    ) -> Result<Vec<Partner>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PARTNER_COLUMNS} FROM partner WHERE category = ? ORDER BY rowid"
        ))
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_partner).collect::<Result<Vec<_>, _>>()
    }

    async fn save(&self, partner: Partner) -> Result<(), RepositoryError> {
        let target_segments_json =
            serde_json::to_string(&partner.target_segments).map_err(encode_error)?;
        let target_sizes_json =
            serde_json::to_string(&partner.target_sizes).map_err(encode_error)?;

        sqlx::query(
            "INSERT INTO partner (id, name, category, subcategory, description, pricing_model,
                                  min_price, max_price, target_segments_json, target_sizes_json,
                                  integration_complexity, roi_potential, commission_rate)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 category = excluded.category,
                 subcategory = excluded.subcategory,
                 description = excluded.description,
                 pricing_model = excluded.pricing_model,
                 min_price = excluded.min_price,
                 max_price = excluded.max_price,
                 target_segments_json = excluded.target_segments_json,
                 target_sizes_json = excluded.target_sizes_json,
                 integration_complexity = excluded.integration_complexity,
                 roi_potential = excluded.roi_potential,
                 commission_rate = excluded.commission_rate",
        )
        .bind(&partner.id.0)
        .bind(&partner.name)
        .bind(partner.category.as_str())
        .bind(&partner.subcategory)
        .bind(&partner.description)
        .bind(partner.pricing_model.as_str())
        .bind(partner.min_price)
        .bind(partner.max_price)
        .bind(&target_segments_json)
        .bind(&target_sizes_json)
        .bind(i64::from(partner.integration_complexity))
        .bind(i64::from(partner.roi_potential))
        .bind(partner.commission_rate)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
