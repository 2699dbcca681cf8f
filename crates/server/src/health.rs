use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::bootstrap::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub storage: HealthCheck,
    pub stores: usize,
    pub partners: usize,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let counts = catalog_counts(&state).await;
    let (storage, stores, partners) = match counts {
        Ok((stores, partners)) => (
            HealthCheck {
                status: "ready",
                detail: format!("{} storage reachable", state.storage_backend.as_str()),
            },
            stores,
            partners,
        ),
        Err(detail) => (HealthCheck { status: "degraded", detail }, 0, 0),
    };
    let ready = storage.status == "ready";

    let payload = HealthResponse {
        status: if ready { "healthy" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "partnerfit-server runtime initialized".to_string(),
        },
        storage,
        stores,
        partners,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn catalog_counts(state: &AppState) -> Result<(usize, usize), String> {
    let stores = state
        .stores
        .list()
        .await
        .map_err(|error| format!("store listing failed: {error}"))?;
    let partners = state
        .partners
        .list()
        .await
        .map_err(|error| format!("partner listing failed: {error}"))?;
    Ok((stores.len(), partners.len()))
}
