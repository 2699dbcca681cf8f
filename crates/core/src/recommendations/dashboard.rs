use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::engine::RecommendationEngine;
use crate::catalog::{PartnerCatalog, StoreCatalog};
use crate::domain::taxonomy::{CommerceStage, StoreSegment, StoreSize};

/// Store count from which the ecosystem is considered mature.
pub const MATURE_ECOSYSTEM_STORES: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcosystemMaturity {
    Growing,
    Mature,
}

impl EcosystemMaturity {
    pub fn from_store_count(total_stores: usize) -> Self {
        if total_stores < MATURE_ECOSYSTEM_STORES {
            Self::Growing
        } else {
            Self::Mature
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EcosystemDashboard {
    pub total_stores: usize,
    pub total_partners: usize,
    pub total_monthly_revenue: f64,
    pub average_conversion_rate: f64,
    pub stores_by_segment: BTreeMap<StoreSegment, usize>,
    pub stores_by_size: BTreeMap<StoreSize, usize>,
    pub partners_by_category: BTreeMap<CommerceStage, usize>,
    pub maturity: EcosystemMaturity,
}

impl RecommendationEngine {
    pub fn ecosystem_dashboard(
        &self,
        stores: &StoreCatalog,
        partners: &PartnerCatalog,
    ) -> EcosystemDashboard {
        let mut stores_by_segment = BTreeMap::new();
        let mut stores_by_size = BTreeMap::new();
        let mut total_monthly_revenue = 0.0;
        let mut conversion_sum = 0.0;
        for store in stores.iter() {
            *stores_by_segment.entry(store.segment).or_insert(0) += 1;
            *stores_by_size.entry(store.size).or_insert(0) += 1;
            total_monthly_revenue += store.monthly_revenue;
            conversion_sum += store.conversion_rate;
        }

        let mut partners_by_category = BTreeMap::new();
        for partner in partners.iter() {
            *partners_by_category.entry(partner.category).or_insert(0) += 1;
        }

        let average_conversion_rate =
            if stores.is_empty() { 0.0 } else { conversion_sum / stores.len() as f64 };

        EcosystemDashboard {
            total_stores: stores.len(),
            total_partners: partners.len(),
            total_monthly_revenue,
            average_conversion_rate,
            stores_by_segment,
            stores_by_size,
            partners_by_category,
            maturity: EcosystemMaturity::from_store_count(stores.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendations::engine::tests::{partner, store};

    #[test]
    fn empty_ecosystem_has_zero_average() {
        let dashboard = RecommendationEngine::new()
            .ecosystem_dashboard(&StoreCatalog::default(), &PartnerCatalog::default());

        assert_eq!(dashboard.total_stores, 0);
        assert_eq!(dashboard.average_conversion_rate, 0.0);
        assert!(dashboard.stores_by_segment.is_empty());
        assert_eq!(dashboard.maturity, EcosystemMaturity::Growing);
    }

    #[test]
    fn aggregates_revenue_and_distributions() {
        let stores = StoreCatalog::new(vec![
            store("s1", 25_000.0, &[]),
            store("s2", 75_000.0, &["payments"]),
        ]);
        let partners = PartnerCatalog::new(vec![
            partner("a", "cart", 5),
            partner("b", "cart", 7),
            partner("c", "payment", 7),
        ]);

        let dashboard = RecommendationEngine::new().ecosystem_dashboard(&stores, &partners);

        assert_eq!(dashboard.total_stores, 2);
        assert_eq!(dashboard.total_partners, 3);
        assert_eq!(dashboard.total_monthly_revenue, 100_000.0);
        assert!((dashboard.average_conversion_rate - 0.022).abs() < 1e-12);
        assert_eq!(dashboard.stores_by_segment.get(&StoreSegment::Fashion), Some(&2));
        assert_eq!(dashboard.stores_by_size.get(&StoreSize::Small), Some(&2));
        assert_eq!(dashboard.partners_by_category.get(&CommerceStage::Cart), Some(&2));
        assert_eq!(dashboard.partners_by_category.get(&CommerceStage::Payment), Some(&1));
    }

    #[test]
    fn hundred_stores_is_mature() {
        assert_eq!(EcosystemMaturity::from_store_count(99), EcosystemMaturity::Growing);
        assert_eq!(EcosystemMaturity::from_store_count(100), EcosystemMaturity::Mature);
    }

    #[test]
    fn distributions_serialize_with_snake_case_keys() {
        let stores = StoreCatalog::new(vec![store("s1", 25_000.0, &[])]);
        let dashboard =
            RecommendationEngine::new().ecosystem_dashboard(&stores, &PartnerCatalog::default());

        let json = serde_json::to_value(&dashboard).expect("serialize");
        assert_eq!(json["stores_by_segment"]["fashion"], 1);
        assert_eq!(json["maturity"], "growing");
    }
}
