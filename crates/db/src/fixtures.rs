use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use partnerfit_core::domain::partner::{Partner, PartnerId, PartnerRegistration};
use partnerfit_core::domain::store::{StoreId, StoreProfile, StoreRegistration};
use partnerfit_core::errors::ValidationError;

use crate::repositories::{PartnerRepository, RepositoryError, StoreRepository};

/// Four illustrative stores covering every size tier the partners target.
const SEED_STORES: &[StoreSeed] = &[
    StoreSeed {
        id: "store-fashion-001",
        name: "Trend Boutique",
        segment: "fashion",
        size: "small",
        monthly_revenue: 25_000.0,
        monthly_orders: 180,
        avg_ticket: 138.89,
        conversion_rate: 0.022,
        traffic_sources: &[("organic", 0.3), ("paid", 0.5), ("social", 0.2)],
        pain_points: &["low_conversion", "high_cac", "cart_abandonment"],
        current_tools: &["google_ads", "facebook_ads", "hotjar"],
        priorities: &[("acquisition", 8), ("navigation", 9), ("cart", 7), ("post_sale", 6)],
    },
    StoreSeed {
        id: "store-electronics-002",
        name: "TechMaster Electronics",
        segment: "electronics",
        size: "medium",
        monthly_revenue: 85_000.0,
        monthly_orders: 320,
        avg_ticket: 265.63,
        conversion_rate: 0.031,
        traffic_sources: &[("organic", 0.45), ("paid", 0.35), ("direct", 0.2)],
        pain_points: &["expensive_logistics", "customer_service", "inventory_management"],
        current_tools: &["google_analytics", "erp_suite", "marketplace_shipping"],
        priorities: &[("fulfillment", 9), ("delivery", 8), ("post_sale", 7), ("analytics", 6)],
    },
    StoreSeed {
        id: "store-home-003",
        name: "Casa Home & Decor",
        segment: "home_garden",
        size: "large",
        monthly_revenue: 180_000.0,
        monthly_orders: 450,
        avg_ticket: 400.0,
        conversion_rate: 0.028,
        traffic_sources: &[("organic", 0.6), ("paid", 0.25), ("social", 0.15)],
        pain_points: &["mobile_experience", "personalization", "upsell"],
        current_tools: &["vtex", "google_ads", "zendesk", "mailchimp"],
        priorities: &[("infrastructure", 7), ("navigation", 9), ("product", 8), ("analytics", 8)],
    },
    StoreSeed {
        id: "store-health-004",
        name: "Vital Supplements",
        segment: "health_beauty",
        size: "small",
        monthly_revenue: 15_000.0,
        monthly_orders: 95,
        avg_ticket: 157.89,
        conversion_rate: 0.018,
        traffic_sources: &[("organic", 0.2), ("paid", 0.6), ("influencer", 0.2)],
        pain_points: &["low_conversion", "cart_abandonment", "seo"],
        current_tools: &["shopify", "facebook_ads", "instagram"],
        priorities: &[("acquisition", 9), ("navigation", 8), ("cart", 9), ("payment", 6)],
    },
];

const ALL_SIZES: &[&str] = &["small", "medium", "large"];
const CORE_SEGMENTS: &[&str] = &["fashion", "electronics", "home_garden", "health_beauty"];

/// One partner per stage the seed stores care about most.
const SEED_PARTNERS: &[PartnerSeed] = &[
    PartnerSeed {
        id: "ads-001",
        name: "AdOptimizer Pro",
        category: "acquisition",
        subcategory: "Ad management",
        description: "Automatic optimisation of search and social ad campaigns",
        pricing_model: "percentage",
        min_price: 500.0,
        max_price: Some(5_000.0),
        target_segments: &["fashion", "electronics", "health_beauty"],
        target_sizes: &["small", "medium"],
        integration_complexity: 3,
        roi_potential: 8,
        commission_rate: 0.15,
    },
    PartnerSeed {
        id: "search-002",
        name: "SmartSearch AI",
        category: "navigation",
        subcategory: "Site search",
        description: "AI search engine with personalised recommendations",
        pricing_model: "fixed",
        min_price: 299.0,
        max_price: Some(1_299.0),
        target_segments: &["fashion", "home_garden", "electronics"],
        target_sizes: &["medium", "large"],
        integration_complexity: 4,
        roi_potential: 7,
        commission_rate: 0.20,
    },
    PartnerSeed {
        id: "checkout-003",
        name: "ConvertMax Checkout",
        category: "cart",
        subcategory: "Checkout optimisation",
        description: "Checkout with automatic A/B tests and cart recovery",
        pricing_model: "per_transaction",
        min_price: 0.5,
        max_price: Some(2.0),
        target_segments: &["fashion", "health_beauty", "electronics"],
        target_sizes: ALL_SIZES,
        integration_complexity: 2,
        roi_potential: 9,
        commission_rate: 0.25,
    },
    PartnerSeed {
        id: "payment-004",
        name: "PayFlow Gateway",
        category: "payment",
        subcategory: "Payment gateway",
        description: "Gateway with competitive fees and multiple payment methods",
        pricing_model: "percentage",
        min_price: 0.0,
        max_price: None,
        target_segments: CORE_SEGMENTS,
        target_sizes: ALL_SIZES,
        integration_complexity: 3,
        roi_potential: 6,
        commission_rate: 0.10,
    },
    PartnerSeed {
        id: "logistics-005",
        name: "LogiSmart Fulfillment",
        category: "fulfillment",
        subcategory: "Inventory management",
        description: "Warehouse management with demand forecasting",
        pricing_model: "fixed",
        min_price: 899.0,
        max_price: Some(3_999.0),
        target_segments: &["electronics", "home_garden"],
        target_sizes: &["medium", "large"],
        integration_complexity: 6,
        roi_potential: 8,
        commission_rate: 0.12,
    },
    PartnerSeed {
        id: "shipping-006",
        name: "ExpressFrete",
        category: "delivery",
        subcategory: "Freight management",
        description: "Multi-carrier shipping platform with route optimisation",
        pricing_model: "percentage",
        min_price: 0.0,
        max_price: None,
        target_segments: CORE_SEGMENTS,
        target_sizes: ALL_SIZES,
        integration_complexity: 4,
        roi_potential: 7,
        commission_rate: 0.08,
    },
    PartnerSeed {
        id: "crm-007",
        name: "CustomerCare 360",
        category: "post_sale",
        subcategory: "Omnichannel CRM",
        description: "CRM with marketing automation and customer success tooling",
        pricing_model: "fixed",
        min_price: 199.0,
        max_price: Some(1_499.0),
        target_segments: &["fashion", "health_beauty", "home_garden"],
        target_sizes: ALL_SIZES,
        integration_complexity: 5,
        roi_potential: 7,
        commission_rate: 0.18,
    },
    PartnerSeed {
        id: "analytics-008",
        name: "DataInsights Pro",
        category: "analytics",
        subcategory: "Business intelligence",
        description: "BI dashboards with predictive analysis and automated KPIs",
        pricing_model: "fixed",
        min_price: 399.0,
        max_price: Some(1_999.0),
        target_segments: &["electronics", "home_garden"],
        target_sizes: &["medium", "large"],
        integration_complexity: 4,
        roi_potential: 8,
        commission_rate: 0.22,
    },
];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("seed record `{id}` is invalid: {source}")]
    Validation {
        id: &'static str,
        #[source]
        source: ValidationError,
    },
}

/// Illustrative catalog used for demos, smoke runs and the `/seed-data` route.
///
/// Loading is idempotent: every record is an upsert keyed by its fixed id.
pub struct SampleDataset;

impl SampleDataset {
    pub fn stores(now: DateTime<Utc>) -> Result<Vec<StoreProfile>, SeedError> {
        SEED_STORES.iter().map(|seed| seed.to_profile(now)).collect()
    }

    pub fn partners() -> Result<Vec<Partner>, SeedError> {
        SEED_PARTNERS.iter().map(PartnerSeed::to_partner).collect()
    }

    pub async fn load(
        stores: &dyn StoreRepository,
        partners: &dyn PartnerRepository,
    ) -> Result<SeedResult, SeedError> {
        let now = Utc::now();
        for store in Self::stores(now)? {
            stores.save(store).await?;
        }
        for partner in Self::partners()? {
            partners.save(partner).await?;
        }

        tracing::info!(
            event_name = "db.seed.loaded",
            stores = SEED_STORES.len(),
            partners = SEED_PARTNERS.len(),
            "sample dataset loaded"
        );

        Ok(SeedResult {
            stores_seeded: SEED_STORES.iter().map(|seed| seed.id).collect(),
            partners_seeded: SEED_PARTNERS.iter().map(|seed| seed.id).collect(),
            loaded_at: now,
        })
    }

    /// Checks that every seeded record is present with its seeded name.
    pub async fn verify(
        stores: &dyn StoreRepository,
        partners: &dyn PartnerRepository,
    ) -> Result<VerificationResult, SeedError> {
        let mut checks = Vec::with_capacity(SEED_STORES.len() + SEED_PARTNERS.len());

        for seed in SEED_STORES {
            let found = stores.find_by_id(&StoreId::new(seed.id)).await?;
            checks.push((seed.id, found.is_some_and(|store| store.name == seed.name)));
        }
        for seed in SEED_PARTNERS {
            let found = partners.find_by_id(&PartnerId::new(seed.id)).await?;
            checks.push((seed.id, found.is_some_and(|partner| partner.name == seed.name)));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeedResult {
    pub stores_seeded: Vec<&'static str>,
    pub partners_seeded: Vec<&'static str>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

#[derive(Debug, Clone, Copy)]
struct StoreSeed {
    id: &'static str,
    name: &'static str,
    segment: &'static str,
    size: &'static str,
    monthly_revenue: f64,
    monthly_orders: i64,
    avg_ticket: f64,
    conversion_rate: f64,
    traffic_sources: &'static [(&'static str, f64)],
    pain_points: &'static [&'static str],
    current_tools: &'static [&'static str],
    priorities: &'static [(&'static str, i64)],
}

impl StoreSeed {
    fn to_profile(&self, now: DateTime<Utc>) -> Result<StoreProfile, SeedError> {
        let registration = self.priorities.iter().fold(
            StoreRegistration::new(self.id, self.name, self.segment, self.size)
                .with_metrics(
                    self.monthly_revenue,
                    self.monthly_orders,
                    self.avg_ticket,
                    self.conversion_rate,
                )
                .with_traffic_sources(self.traffic_sources.iter().copied())
                .with_pain_points(self.pain_points.iter().copied())
                .with_current_tools(self.current_tools.iter().copied()),
            |registration, (stage, weight)| registration.with_priority(*stage, *weight),
        );

        registration
            .into_profile(now)
            .map_err(|source| SeedError::Validation { id: self.id, source })
    }
}

#[derive(Debug, Clone, Copy)]
struct PartnerSeed {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    subcategory: &'static str,
    description: &'static str,
    pricing_model: &'static str,
    min_price: f64,
    max_price: Option<f64>,
    target_segments: &'static [&'static str],
    target_sizes: &'static [&'static str],
    integration_complexity: i64,
    roi_potential: i64,
    commission_rate: f64,
}

impl PartnerSeed {
    fn to_partner(&self) -> Result<Partner, SeedError> {
        PartnerRegistration::new(self.id, self.name, self.category)
            .with_details(self.subcategory, self.description)
            .with_pricing(self.pricing_model, self.min_price, self.max_price)
            .with_targets(
                self.target_segments.iter().copied(),
                self.target_sizes.iter().copied(),
            )
            .with_economics(self.integration_complexity, self.roi_potential, self.commission_rate)
            .into_partner()
            .map_err(|source| SeedError::Validation { id: self.id, source })
    }
}
