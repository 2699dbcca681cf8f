use serde::{Deserialize, Serialize};

use super::engine::RecommendationEngine;
use super::{HIGH_COMPATIBILITY_SCORE, POTENTIAL_MATCH_SCORE};
use crate::catalog::StoreCatalog;
use crate::domain::partner::Partner;
use crate::domain::store::StoreId;

/// Share of the store catalog above which a partner's opportunity is high.
const HIGH_OPPORTUNITY_SHARE: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketOpportunity {
    High,
    Medium,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreMatch {
    pub store_id: StoreId,
    pub store_name: String,
    pub compatibility_score: f64,
}

/// Reach of a (usually newly added) partner across the store catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketImpact {
    pub total_stores_analyzed: usize,
    pub potential_matches: usize,
    /// 0-100; 0 for an empty catalog.
    pub match_percentage: f64,
    pub high_compatibility_stores: Vec<StoreMatch>,
    pub market_opportunity: MarketOpportunity,
}

impl RecommendationEngine {
    /// Compatibility-only sweep of `partner` over every store.
    pub fn analyze_new_partner(&self, partner: &Partner, stores: &StoreCatalog) -> MarketImpact {
        let mut potential_matches = 0;
        let mut high_compatibility_stores = Vec::new();

        for store in stores.iter() {
            let score = self.compatibility.score(store, partner).total_score;
            if score >= POTENTIAL_MATCH_SCORE {
                potential_matches += 1;
            }
            if score >= HIGH_COMPATIBILITY_SCORE {
                high_compatibility_stores.push(StoreMatch {
                    store_id: store.id.clone(),
                    store_name: store.name.clone(),
                    compatibility_score: score,
                });
            }
        }

        let total_stores_analyzed = stores.len();
        let match_percentage = if total_stores_analyzed == 0 {
            0.0
        } else {
            potential_matches as f64 / total_stores_analyzed as f64 * 100.0
        };
        let market_opportunity =
            if potential_matches as f64 > HIGH_OPPORTUNITY_SHARE * total_stores_analyzed as f64 {
                MarketOpportunity::High
            } else {
                MarketOpportunity::Medium
            };

        tracing::debug!(
            event_name = "engine.market_impact.analyzed",
            partner_id = %partner.id,
            total_stores_analyzed,
            potential_matches,
            "analyzed partner market impact"
        );

        MarketImpact {
            total_stores_analyzed,
            potential_matches,
            match_percentage,
            high_compatibility_stores,
            market_opportunity,
        }
    }
}
