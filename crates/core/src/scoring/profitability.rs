//! How valuable a store/partner pairing is for the platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::unit;
use crate::domain::partner::{Partner, PartnerId};
use crate::domain::store::{StoreId, StoreProfile};

/// Monthly revenue at which a store's commission potential saturates.
pub const REVENUE_SATURATION: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitabilityWeights {
    pub commission: f64,
    pub implementation_cost: f64,
    pub retention: f64,
}

impl ProfitabilityWeights {
    pub const DEFAULT: Self = Self { commission: 0.4, implementation_cost: 0.3, retention: 0.3 };
}

impl Default for ProfitabilityWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityScore {
    pub store_id: StoreId,
    pub partner_id: PartnerId,
    pub commission_potential: f64,
    /// Higher is cheaper: `1 - integration_complexity / 10`.
    pub implementation_cost: f64,
    pub retention_probability: f64,
    pub total_score: f64,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfitabilityScorer {
    weights: ProfitabilityWeights,
}

impl ProfitabilityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ProfitabilityWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, store: &StoreProfile, partner: &Partner) -> ProfitabilityScore {
        let revenue_factor = (store.monthly_revenue / REVENUE_SATURATION).min(1.0);
        let commission_potential = unit(partner.commission_rate * revenue_factor);
        let implementation_cost =
            unit(1.0 - f64::from(partner.integration_complexity) / 10.0);
        let retention_probability = unit(f64::from(partner.roi_potential) / 10.0);

        let total_score = unit(
            commission_potential * self.weights.commission
                + implementation_cost * self.weights.implementation_cost
                + retention_probability * self.weights.retention,
        );

        ProfitabilityScore {
            store_id: store.id.clone(),
            partner_id: partner.id.clone(),
            commission_potential,
            implementation_cost,
            retention_probability,
            total_score,
            calculated_at: Utc::now(),
        }
    }
}
