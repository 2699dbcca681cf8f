//! JSON API over the recommendation engine.
//!
//! Every success is wrapped as `{"success": true, "data": ...}`. Failures are
//! rendered from [`InterfaceError`] with a fresh correlation id:
//! `{"success": false, "error": {"code", "message", "detail", "correlation_id"}}`.
//!
//! - `GET   /health`                               — liveness + catalog counts
//! - `GET   /enums`                                — accepted enumerated values
//! - `POST  /stores`                               — onboard a store (201)
//! - `GET   /stores/{store_id}`                    — store profile
//! - `PATCH /stores/{store_id}`                    — partial profile update
//! - `GET   /stores/{store_id}/gaps`               — maturity profile and gaps
//! - `GET   /stores/{store_id}/recommendations`    — ranked partners
//! - `GET   /stores/{store_id}/focus-areas`        — recommendations per stage
//! - `GET   /stores/{store_id}/analysis`           — full analysis
//! - `POST  /partners`                             — add a partner (201)
//! - `GET   /partners`                             — list, optional `category`
//! - `GET   /partners/{partner_id}/market-impact`  — reach over the store catalog
//! - `GET   /ecosystem/dashboard`                  — catalog aggregates
//! - `POST  /seed-data`                            — load the sample dataset

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use partnerfit_core::catalog::{PartnerCatalog, StoreCatalog};
use partnerfit_core::domain::partner::{Partner, PartnerId, PartnerRegistration};
use partnerfit_core::domain::store::{StoreId, StoreProfile, StoreRegistration, StoreUpdate};
use partnerfit_core::domain::taxonomy::{CommerceStage, PricingModel, StoreSegment, StoreSize};
use partnerfit_core::errors::{ApplicationError, DomainError, InterfaceError, ValidationError};
use partnerfit_core::maturity::{GapRecord, MaturityProfile};
use partnerfit_core::recommendations::{
    EcosystemDashboard, FocusAreaRecommendations, MarketImpact, OnboardingReport,
    RecommendationQuery, StoreAnalysis,
};
use partnerfit_core::scoring::FinalRecommendation;
use partnerfit_db::{RepositoryError, SampleDataset, SeedError, SeedResult};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::bootstrap::AppState;
use crate::health;

// ---------------------------------------------------------------------------
// Envelope and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub correlation_id: String,
}

/// Handler failure, rendered as the error envelope.
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

type ApiResult<T> = Result<Json<ApiSuccess<T>>, ApiError>;

fn ok<T: Serialize>(data: T) -> Json<ApiSuccess<T>> {
    Json(ApiSuccess { success: true, data })
}

fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        Self(error.into_interface(correlation_id()))
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApplicationError::from(error).into()
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        DomainError::from(error).into()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Validation(error) => error.into(),
            other => ApplicationError::Persistence(other.to_string()).into(),
        }
    }
}

impl From<SeedError> for ApiError {
    fn from(error: SeedError) -> Self {
        match error {
            SeedError::Repository(error) => error.into(),
            invalid @ SeedError::Validation { .. } => {
                ApplicationError::Configuration(invalid.to_string()).into()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(InterfaceError::BadRequest {
            message: rejection.body_text(),
            correlation_id: correlation_id(),
        })
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(InterfaceError::BadRequest {
            message: rejection.body_text(),
            correlation_id: correlation_id(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self.0 {
            InterfaceError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(message.clone()))
            }
            InterfaceError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, "not_found", Some(message.clone()))
            }
            InterfaceError::ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", None)
            }
            InterfaceError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
        };

        warn!(
            event_name = "api.request.failed",
            status = status.as_u16(),
            code,
            correlation_id = self.0.correlation_id(),
            error = %self.0,
            "request failed"
        );

        let body = ApiErrorBody {
            success: false,
            error: ApiErrorDetail {
                code,
                message: self.0.user_message(),
                detail,
                correlation_id: self.0.correlation_id().to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    pub limit: Option<usize>,
    pub min_score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FocusParams {
    /// Comma-separated commerce stages.
    pub stages: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartnerListParams {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnumsResponse {
    pub segments: Vec<&'static str>,
    pub sizes: Vec<&'static str>,
    pub stages: Vec<&'static str>,
    pub pricing_models: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct GapsResponse {
    pub store_id: StoreId,
    pub maturity: MaturityProfile,
    pub gaps: Vec<GapRecord>,
}

#[derive(Debug, Serialize)]
pub struct PartnerCreated {
    pub partner: Partner,
    pub market_impact: MarketImpact,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/enums", get(enums))
        .route("/stores", post(create_store))
        .route("/stores/{store_id}", get(get_store).patch(update_store))
        .route("/stores/{store_id}/gaps", get(store_gaps))
        .route("/stores/{store_id}/recommendations", get(store_recommendations))
        .route("/stores/{store_id}/focus-areas", get(store_focus_areas))
        .route("/stores/{store_id}/analysis", get(store_analysis))
        .route("/partners", post(create_partner).get(list_partners))
        .route("/partners/{partner_id}/market-impact", get(partner_market_impact))
        .route("/ecosystem/dashboard", get(ecosystem_dashboard))
        .route("/seed-data", post(seed_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn catalogs(state: &AppState) -> Result<(StoreCatalog, PartnerCatalog), ApiError> {
    let stores = state.stores.snapshot().await?;
    let partners = state.partners.snapshot().await?;
    Ok((stores, partners))
}

async fn find_store(state: &AppState, store_id: &StoreId) -> Result<StoreProfile, ApiError> {
    state
        .stores
        .find_by_id(store_id)
        .await?
        .ok_or_else(|| DomainError::StoreNotFound(store_id.clone()).into())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn enums() -> Json<ApiSuccess<EnumsResponse>> {
    ok(EnumsResponse {
        segments: StoreSegment::ALL.iter().map(StoreSegment::as_str).collect(),
        sizes: StoreSize::ALL.iter().map(StoreSize::as_str).collect(),
        stages: CommerceStage::ALL.iter().map(CommerceStage::as_str).collect(),
        pricing_models: PricingModel::ALL.iter().map(PricingModel::as_str).collect(),
    })
}

/// Onboards (or replaces) a store and answers with its onboarding report.
async fn create_store(
    State(state): State<AppState>,
    payload: Result<Json<StoreRegistration>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiSuccess<OnboardingReport>>), ApiError> {
    let Json(registration) = payload?;
    let profile = registration.into_profile(Utc::now())?;
    let store_id = profile.id.clone();
    state.stores.save(profile).await?;

    let (stores, partners) = catalogs(&state).await?;
    let mut jitter = state.jitter();
    let report = state.engine.onboarding_report(&store_id, &stores, &partners, &mut jitter)?;

    info!(
        event_name = "api.store.onboarded",
        store_id = %store_id,
        gaps = report.gaps.len(),
        recommendations = report.initial_recommendations.len(),
        "store onboarded"
    );

    Ok((StatusCode::CREATED, ok(report)))
}

async fn get_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> ApiResult<StoreProfile> {
    Ok(ok(find_store(&state, &StoreId::new(store_id)).await?))
}

async fn update_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    payload: Result<Json<StoreUpdate>, JsonRejection>,
) -> ApiResult<StoreProfile> {
    let Json(update) = payload?;
    let store_id = StoreId::new(store_id);
    if update.is_empty() {
        return Ok(ok(find_store(&state, &store_id).await?));
    }

    let profile = state
        .stores
        .update(&store_id, update, Utc::now())
        .await?
        .ok_or(DomainError::StoreNotFound(store_id))?;

    info!(event_name = "api.store.updated", store_id = %profile.id, "store profile updated");
    Ok(ok(profile))
}

async fn store_gaps(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> ApiResult<GapsResponse> {
    let store = find_store(&state, &StoreId::new(store_id)).await?;
    let mut jitter = state.jitter();
    let maturity = state.engine.maturity_analyzer().analyze(&store, &mut jitter);
    let gaps = GapRecord::from_profile(&maturity);
    Ok(ok(GapsResponse { store_id: store.id, maturity, gaps }))
}

async fn store_recommendations(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    params: Result<Query<RecommendationParams>, QueryRejection>,
) -> ApiResult<Vec<FinalRecommendation>> {
    let Query(params) = params?;
    let query = RecommendationQuery::new(
        params.limit.unwrap_or(state.engine_config.default_limit),
        params.min_score.unwrap_or(state.engine_config.default_min_score),
    )?;

    let (stores, partners) = catalogs(&state).await?;
    let recommendations = state.engine.recommend_for(
        &StoreId::new(store_id),
        &stores,
        &partners,
        query.limit,
        query.min_score,
    )?;
    Ok(ok(recommendations))
}

async fn store_focus_areas(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
    params: Result<Query<FocusParams>, QueryRejection>,
) -> ApiResult<Vec<FocusAreaRecommendations>> {
    let Query(params) = params?;
    let stages = params.stages.as_deref().map(parse_stages).transpose()?;

    let (stores, partners) = catalogs(&state).await?;
    let mut jitter = state.jitter();
    let grouped = state.engine.recommend_by_focus_area(
        &StoreId::new(store_id),
        &stores,
        &partners,
        stages.as_deref(),
        &mut jitter,
    )?;
    Ok(ok(grouped))
}

fn parse_stages(raw: &str) -> Result<Vec<CommerceStage>, ValidationError> {
    raw.split(',')
        .map(str::trim)
        .filter(|stage| !stage.is_empty())
        .map(str::parse::<CommerceStage>)
        .collect()
}

async fn store_analysis(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> ApiResult<StoreAnalysis> {
    let (stores, partners) = catalogs(&state).await?;
    let mut jitter = state.jitter();
    let analysis =
        state.engine.full_analysis(&StoreId::new(store_id), &stores, &partners, &mut jitter)?;
    Ok(ok(analysis))
}

async fn create_partner(
    State(state): State<AppState>,
    payload: Result<Json<PartnerRegistration>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiSuccess<PartnerCreated>>), ApiError> {
    let Json(registration) = payload?;
    let partner = registration.into_partner()?;
    state.partners.save(partner.clone()).await?;

    let stores = state.stores.snapshot().await?;
    let market_impact = state.engine.analyze_new_partner(&partner, &stores);

    info!(
        event_name = "api.partner.registered",
        partner_id = %partner.id,
        category = partner.category.as_str(),
        potential_matches = market_impact.potential_matches,
        "partner registered"
    );

    Ok((StatusCode::CREATED, ok(PartnerCreated { partner, market_impact })))
}

async fn list_partners(
    State(state): State<AppState>,
    params: Result<Query<PartnerListParams>, QueryRejection>,
) -> ApiResult<Vec<Partner>> {
    let Query(params) = params?;
    let partners = match params.category.as_deref() {
        Some(raw) => state.partners.list_by_category(raw.parse::<CommerceStage>()?).await?,
        None => state.partners.list().await?,
    };
    Ok(ok(partners))
}

async fn partner_market_impact(
    State(state): State<AppState>,
    Path(partner_id): Path<String>,
) -> ApiResult<MarketImpact> {
    let partner_id = PartnerId::new(partner_id);
    let partner = state
        .partners
        .find_by_id(&partner_id)
        .await?
        .ok_or_else(|| DomainError::PartnerNotFound(partner_id.clone()))?;
    let stores = state.stores.snapshot().await?;
    Ok(ok(state.engine.analyze_new_partner(&partner, &stores)))
}

async fn ecosystem_dashboard(State(state): State<AppState>) -> ApiResult<EcosystemDashboard> {
    let (stores, partners) = catalogs(&state).await?;
    Ok(ok(state.engine.ecosystem_dashboard(&stores, &partners)))
}

async fn seed_data(State(state): State<AppState>) -> ApiResult<SeedResult> {
    let result = SampleDataset::load(state.stores.as_ref(), state.partners.as_ref()).await?;
    info!(
        event_name = "api.seed.loaded",
        stores = result.stores_seeded.len(),
        partners = result.partners_seeded.len(),
        "sample dataset loaded"
    );
    Ok(ok(result))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        Router,
    };
    use std::sync::Arc;

    use partnerfit_core::config::{AppConfig, StorageBackend};
    use partnerfit_db::{
        connect_with_settings, migrations, SqlPartnerRepository, SqlStoreRepository,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    async fn seeded_app() -> Router {
        let app = router(AppState::in_memory());
        let (status, _) = send(&app, Method::POST, "/seed-data", None).await;
        assert_eq!(status, StatusCode::OK);
        app
    }

    fn registration(store_id: &str) -> Value {
        json!({
            "store_id": store_id,
            "name": "Outdoor Depot",
            "segment": "sports",
            "size": "medium",
            "monthly_revenue": 60000.0,
            "monthly_orders": 500,
            "avg_ticket": 120.0,
            "conversion_rate": 0.018,
            "pain_points": ["low_conversion", "slow_shipping"],
            "priorities": {"cart": 9, "delivery": 8}
        })
    }

    #[tokio::test]
    async fn seed_data_populates_catalogs_for_dashboard() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/ecosystem/dashboard", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total_stores"], 4);
        assert_eq!(body["data"]["total_partners"], 8);
        assert_eq!(body["data"]["maturity"], "growing");
    }

    #[tokio::test]
    async fn recommendations_respect_limit_and_sort_descending() {
        let app = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/stores/store-fashion-001/recommendations?limit=3&min_score=0",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let scores: Vec<f64> = body["data"]
            .as_array()
            .expect("recommendation list")
            .iter()
            .map(|item| item["final_score"].as_f64().expect("score"))
            .collect();
        assert_eq!(scores.len(), 3);
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[tokio::test]
    async fn unknown_store_returns_not_found_envelope() {
        let app = seeded_app().await;

        let (status, body) =
            send(&app, Method::GET, "/stores/store-missing/recommendations", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "not_found");
        assert!(body["error"]["detail"].as_str().expect("detail").contains("store-missing"));
        assert!(!body["error"]["correlation_id"].as_str().expect("correlation id").is_empty());
    }

    #[tokio::test]
    async fn out_of_range_min_score_is_bad_request() {
        let app = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/stores/store-fashion-001/recommendations?min_score=1.5",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
        assert!(body["error"]["detail"].as_str().expect("detail").contains("min_score"));
    }

    #[tokio::test]
    async fn onboarding_returns_created_report_and_profile_is_readable() {
        let app = seeded_app().await;

        let (status, body) =
            send(&app, Method::POST, "/stores", Some(registration("store-sports-900"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["store_id"], "store-sports-900");
        assert_eq!(body["data"]["maturity"].as_object().expect("maturity").len(), 12);
        assert!(body["data"]["initial_recommendations"].as_array().expect("list").len() <= 5);

        let (status, body) = send(&app, Method::GET, "/stores/store-sports-900", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["segment"], "sports");
        assert_eq!(body["data"]["monthly_orders"], 500);
    }

    #[tokio::test]
    async fn invalid_registration_is_rejected_without_saving() {
        let app = router(AppState::in_memory());
        let mut payload = registration("store-bad-1");
        payload["segment"] = json!("jewelry");

        let (status, body) = send(&app, Method::POST, "/stores", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["detail"].as_str().expect("detail").contains("jewelry"));

        let (status, _) = send(&app, Method::GET, "/stores/store-bad-1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let app = router(AppState::in_memory());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/stores")
            .header("content-type", "application/json")
            .body(Body::from("{\"store_id\": "))
            .expect("request");

        let response = app.oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_updates_fields_and_rejects_invalid_values_atomically() {
        let app = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/stores/store-fashion-001",
            Some(json!({"conversion_rate": 0.035, "name": "Trend Boutique Plus"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["conversion_rate"], 0.035);
        assert_eq!(body["data"]["name"], "Trend Boutique Plus");

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/stores/store-fashion-001",
            Some(json!({"name": "Renamed", "conversion_rate": 2.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, Method::GET, "/stores/store-fashion-001", None).await;
        assert_eq!(body["data"]["name"], "Trend Boutique Plus");
        assert_eq!(body["data"]["conversion_rate"], 0.035);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_patches_on_sqlite_keep_every_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("partnerfit.db").display());
        let pool = connect_with_settings(&url, 8, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        let state = AppState::new(
            Arc::new(SqlStoreRepository::new(pool.clone())),
            Arc::new(SqlPartnerRepository::new(pool)),
            AppConfig::default().engine,
            StorageBackend::Sqlite,
        );
        let app = router(state);
        let (status, _) = send(&app, Method::POST, "/seed-data", None).await;
        assert_eq!(status, StatusCode::OK);

        for round in 0..20_u64 {
            let name = format!("Trend Boutique {round}");
            let rename = {
                let app = app.clone();
                let body = json!({"name": name.clone()});
                tokio::spawn(async move {
                    send(&app, Method::PATCH, "/stores/store-fashion-001", Some(body)).await
                })
            };
            let reorder = {
                let app = app.clone();
                let body = json!({"monthly_orders": 1_000 + round});
                tokio::spawn(async move {
                    send(&app, Method::PATCH, "/stores/store-fashion-001", Some(body)).await
                })
            };
            assert_eq!(rename.await.expect("join").0, StatusCode::OK);
            assert_eq!(reorder.await.expect("join").0, StatusCode::OK);

            let (_, body) = send(&app, Method::GET, "/stores/store-fashion-001", None).await;
            assert_eq!(body["data"]["name"], name.as_str());
            assert_eq!(body["data"]["monthly_orders"], 1_000 + round);
        }
    }

    #[tokio::test]
    async fn patch_unknown_store_is_not_found() {
        let app = router(AppState::in_memory());

        let (status, _) =
            send(&app, Method::PATCH, "/stores/nope", Some(json!({"name": "x"}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn gaps_cover_every_stage() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/stores/store-home-003/gaps", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["store_id"], "store-home-003");
        assert_eq!(body["data"]["maturity"].as_object().expect("maturity").len(), 12);
        assert!(body["data"]["gaps"].is_array());
    }

    #[tokio::test]
    async fn focus_areas_follow_requested_order() {
        let app = seeded_app().await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/stores/store-fashion-001/focus-areas?stages=navigation,%20analytics",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let areas: Vec<&str> = body["data"]
            .as_array()
            .expect("areas")
            .iter()
            .map(|area| area["focus_area"].as_str().expect("stage"))
            .collect();
        assert_eq!(areas, vec!["navigation", "analytics"]);
    }

    #[tokio::test]
    async fn focus_areas_reject_unknown_stage() {
        let app = seeded_app().await;

        let (status, _) = send(
            &app,
            Method::GET,
            "/stores/store-fashion-001/focus-areas?stages=navigation,teleport",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn analysis_summarizes_recommendations() {
        let app = seeded_app().await;

        let (status, body) =
            send(&app, Method::GET, "/stores/store-electronics-002/analysis", None).await;

        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        let total = data["recommendations"].as_array().expect("list").len();
        assert!(total <= 8);
        assert_eq!(data["summary"]["total_recommendations"], total);
        assert_eq!(
            data["summary"]["areas_analyzed"],
            data["focus_areas"].as_array().expect("areas").len()
        );
    }

    #[tokio::test]
    async fn new_partner_reports_market_impact_over_all_stores() {
        let app = seeded_app().await;
        let payload = json!({
            "partner_id": "reviews-009",
            "name": "ReviewBoost",
            "category": "post_sale",
            "pricing_model": "fixed",
            "min_price": 49.0,
            "max_price": 199.0,
            "target_segments": ["fashion", "sports"],
            "target_sizes": ["small", "medium"],
            "integration_complexity": 3,
            "roi_potential": 7,
            "commission_rate": 0.0
        });

        let (status, body) = send(&app, Method::POST, "/partners", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["partner"]["id"], "reviews-009");
        assert_eq!(body["data"]["market_impact"]["total_stores_analyzed"], 4);

        let (status, body) =
            send(&app, Method::GET, "/partners/reviews-009/market-impact", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_stores_analyzed"], 4);
    }

    #[tokio::test]
    async fn partner_with_inverted_price_range_is_rejected() {
        let app = router(AppState::in_memory());
        let payload = json!({
            "partner_id": "bad-010",
            "name": "Broken Pricing",
            "category": "payment",
            "min_price": 100.0,
            "max_price": 10.0
        });

        let (status, body) = send(&app, Method::POST, "/partners", Some(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["detail"].as_str().expect("detail").contains("max_price"));
    }

    #[tokio::test]
    async fn partners_can_be_filtered_by_category() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/partners?category=acquisition", None).await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body["data"]
            .as_array()
            .expect("partners")
            .iter()
            .map(|partner| partner["id"].as_str().expect("id"))
            .collect();
        assert_eq!(ids, vec!["ads-001"]);

        let (_, body) = send(&app, Method::GET, "/partners", None).await;
        assert_eq!(body["data"].as_array().expect("partners").len(), 8);

        let (status, _) = send(&app, Method::GET, "/partners?category=magic", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_partner_market_impact_is_not_found() {
        let app = seeded_app().await;

        let (status, body) =
            send(&app, Method::GET, "/partners/ghost-000/market-impact", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]["detail"].as_str().expect("detail").contains("ghost-000"));
    }

    #[tokio::test]
    async fn enums_list_every_accepted_value() {
        let app = router(AppState::in_memory());

        let (status, body) = send(&app, Method::GET, "/enums", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["stages"].as_array().expect("stages").len(), 12);
        assert_eq!(body["data"]["segments"].as_array().expect("segments").len(), 6);
        assert_eq!(body["data"]["sizes"].as_array().expect("sizes").len(), 4);
        assert_eq!(body["data"]["pricing_models"][2], "per_transaction");
    }

    #[tokio::test]
    async fn health_route_is_mounted() {
        let app = seeded_app().await;

        let (status, body) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stores"], 4);
        assert_eq!(body["partners"], 8);
    }

    #[test]
    fn seed_validation_errors_map_to_internal() {
        let error = SeedError::Validation {
            id: "store-x",
            source: ValidationError::MissingField { field: "name" },
        };

        let ApiError(interface) = ApiError::from(error);

        assert!(matches!(interface, InterfaceError::Internal { .. }));
    }
}
