//! Recommendation engine implementation

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{EngineSettings, RecommendationResult, AUTO_FOCUS_AREAS};
use crate::catalog::{PartnerCatalog, StoreCatalog};
use crate::domain::partner::Partner;
use crate::domain::store::{StoreId, StoreProfile};
use crate::domain::taxonomy::CommerceStage;
use crate::errors::DomainError;
use crate::maturity::{JitterSource, MaturityAnalyzer};
use crate::scoring::{
    CompatibilityScorer, FinalRecommendation, ProfitabilityScorer, RecommendationCombiner,
};

/// Best recommendations inside one commerce stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocusAreaRecommendations {
    pub focus_area: CommerceStage,
    pub recommendations: Vec<FinalRecommendation>,
}

/// Scores store/partner pairs and aggregates them into rankings.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    pub(super) compatibility: CompatibilityScorer,
    pub(super) profitability: ProfitabilityScorer,
    pub(super) combiner: RecommendationCombiner,
    pub(super) maturity: MaturityAnalyzer,
    pub(super) settings: EngineSettings,
}

impl RecommendationEngine {
    /// Create an engine with default weights and thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom combiner weights and focus-area thresholds
    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            combiner: RecommendationCombiner::with_weights(settings.weights),
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn maturity_analyzer(&self) -> &MaturityAnalyzer {
        &self.maturity
    }

    /// Full recommendation for one pair, with no filtering.
    pub fn evaluate(&self, store: &StoreProfile, partner: &Partner) -> FinalRecommendation {
        self.combiner.combine(
            self.compatibility.score(store, partner),
            self.profitability.score(store, partner),
        )
    }

    /// Partners ranked for `store_id`: scores below `min_score` are dropped,
    /// the rest are sorted by final score (catalog order breaks ties) and cut
    /// to `limit`.
    pub fn recommend_for(
        &self,
        store_id: &StoreId,
        stores: &StoreCatalog,
        partners: &PartnerCatalog,
        limit: usize,
        min_score: f64,
    ) -> RecommendationResult<Vec<FinalRecommendation>> {
        let store = find_store(stores, store_id)?;
        let recommendations = self.rank(store, partners.iter(), min_score, limit);

        tracing::debug!(
            event_name = "engine.recommendations.ranked",
            store_id = %store.id,
            partners_scored = partners.len(),
            returned = recommendations.len(),
            min_score,
            "ranked partner recommendations"
        );

        Ok(recommendations)
    }

    /// Recommendations grouped by commerce stage.
    ///
    /// With explicit focus areas every area is returned, in the given order
    /// and possibly empty. Without them (or with an empty list) the store's
    /// most urgent gaps are used and areas with no qualifying partner are
    /// left out.
    pub fn recommend_by_focus_area(
        &self,
        store_id: &StoreId,
        stores: &StoreCatalog,
        partners: &PartnerCatalog,
        focus_areas: Option<&[CommerceStage]>,
        jitter: &mut dyn JitterSource,
    ) -> RecommendationResult<Vec<FocusAreaRecommendations>> {
        let store = find_store(stores, store_id)?;

        let grouped = match focus_areas.filter(|areas| !areas.is_empty()) {
            Some(areas) => {
                let mut seen = Vec::with_capacity(areas.len());
                for stage in areas {
                    if !seen.contains(stage) {
                        seen.push(*stage);
                    }
                }
                seen.into_iter().map(|stage| self.focus_area(store, partners, stage)).collect()
            }
            None => self.auto_focus_areas(store, partners, jitter),
        };

        tracing::debug!(
            event_name = "engine.focus_areas.grouped",
            store_id = %store.id,
            explicit = focus_areas.is_some_and(|areas| !areas.is_empty()),
            areas = grouped.len(),
            "grouped recommendations by focus area"
        );

        Ok(grouped)
    }

    pub(super) fn auto_focus_areas(
        &self,
        store: &StoreProfile,
        partners: &PartnerCatalog,
        jitter: &mut dyn JitterSource,
    ) -> Vec<FocusAreaRecommendations> {
        self.maturity
            .identify_gaps(store, jitter)
            .into_iter()
            .take(AUTO_FOCUS_AREAS)
            .map(|gap| self.focus_area(store, partners, gap.stage))
            .filter(|area| !area.recommendations.is_empty())
            .collect()
    }

    fn focus_area(
        &self,
        store: &StoreProfile,
        partners: &PartnerCatalog,
        stage: CommerceStage,
    ) -> FocusAreaRecommendations {
        FocusAreaRecommendations {
            focus_area: stage,
            recommendations: self.rank(
                store,
                partners.by_category(stage),
                self.settings.focus_min_score,
                self.settings.focus_top_n,
            ),
        }
    }

    pub(super) fn rank<'a>(
        &self,
        store: &StoreProfile,
        partners: impl Iterator<Item = &'a Partner>,
        min_score: f64,
        limit: usize,
    ) -> Vec<FinalRecommendation> {
        let mut recommendations: Vec<FinalRecommendation> = partners
            .map(|partner| self.evaluate(store, partner))
            .filter(|recommendation| recommendation.final_score >= min_score)
            .collect();

        // sort_by is stable: equal scores keep catalog order
        recommendations.sort_by(|a, b| {
            b.final_score.partial_cmp(&a.final_score).unwrap_or(Ordering::Equal)
        });
        recommendations.truncate(limit);
        recommendations
    }
}

pub(super) fn find_store<'a>(
    stores: &'a StoreCatalog,
    store_id: &StoreId,
) -> RecommendationResult<&'a StoreProfile> {
    stores.find(store_id).ok_or_else(|| DomainError::StoreNotFound(store_id.clone()))
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::partner::{PartnerId, PartnerRegistration};
    use crate::domain::store::StoreRegistration;
    use crate::maturity::FixedJitter;
    use crate::recommendations::{DEFAULT_LIMIT, DEFAULT_MIN_SCORE};
    use crate::scoring::{CombinerWeights, PriorityTier};

    pub(crate) fn store(id: &str, revenue: f64, pain_points: &[&str]) -> StoreProfile {
        StoreRegistration::new(id, format!("Store {id}"), "fashion", "small")
            .with_metrics(revenue, 180, 138.89, 0.022)
            .with_pain_points(pain_points.iter().copied())
            .with_priority("acquisition", 8)
            .into_profile(Utc::now())
            .expect("valid store")
    }

    pub(crate) fn partner(id: &str, category: &str, roi: i64) -> Partner {
        PartnerRegistration::new(id, format!("Partner {id}"), category)
            .with_targets(["fashion"], ["small"])
            .with_economics(3, roi, 0.15)
            .into_partner()
            .expect("valid partner")
    }

    fn ids(recommendations: &[FinalRecommendation]) -> Vec<&str> {
        recommendations.iter().map(|r| r.partner_id.as_str()).collect()
    }

    fn catalogs() -> (StoreCatalog, PartnerCatalog) {
        let stores = StoreCatalog::new(vec![store("s1", 25_000.0, &["low_conversion"])]);
        let partners = PartnerCatalog::new(vec![
            partner("ads", "acquisition", 8),
            partner("cart-a", "cart", 6),
            partner("cart-b", "cart", 9),
            partner("cart-c", "cart", 6),
            partner("cart-d", "cart", 2),
            PartnerRegistration::new("stray", "Stray", "talent")
                .into_partner()
                .expect("valid partner"),
        ]);
        (stores, partners)
    }

    #[test]
    fn recommend_for_unknown_store_is_not_found() {
        let (stores, partners) = catalogs();
        let result = RecommendationEngine::new().recommend_for(
            &StoreId::new("ghost"),
            &stores,
            &partners,
            DEFAULT_LIMIT,
            DEFAULT_MIN_SCORE,
        );
        assert_eq!(result, Err(DomainError::StoreNotFound(StoreId::new("ghost"))));
    }

    #[test]
    fn recommend_for_filters_sorts_and_truncates() {
        let (stores, partners) = catalogs();
        let engine = RecommendationEngine::new();
        let all = engine
            .recommend_for(
                &StoreId::new("s1"),
                &stores,
                &partners,
                DEFAULT_LIMIT,
                DEFAULT_MIN_SCORE,
            )
            .expect("known store");

        assert!(all.iter().all(|r| r.final_score >= DEFAULT_MIN_SCORE));
        assert!(all.windows(2).all(|pair| pair[0].final_score >= pair[1].final_score));
        assert_eq!(ids(&all)[0], "cart-b");

        let top_two = engine
            .recommend_for(&StoreId::new("s1"), &stores, &partners, 2, DEFAULT_MIN_SCORE)
            .expect("known store");
        assert_eq!(ids(&top_two), ids(&all)[..2].to_vec());

        let none = engine
            .recommend_for(&StoreId::new("s1"), &stores, &partners, 0, DEFAULT_MIN_SCORE)
            .expect("known store");
        assert!(none.is_empty());
    }

    #[test]
    fn equal_scores_keep_catalog_order() {
        let (stores, partners) = catalogs();
        let ranked = RecommendationEngine::new()
            .recommend_for(&StoreId::new("s1"), &stores, &partners, DEFAULT_LIMIT, 0.0)
            .expect("known store");

        let position = |id: &str| ids(&ranked).iter().position(|candidate| *candidate == id);
        assert!(position("cart-a") < position("cart-c"));
    }

    #[test]
    fn recommendation_matches_hand_computed_scores() {
        let (stores, partners) = catalogs();
        let ranked = RecommendationEngine::new()
            .recommend_for(&StoreId::new("s1"), &stores, &partners, DEFAULT_LIMIT, 0.0)
            .expect("known store");

        let ads = ranked
            .iter()
            .find(|r| r.partner_id == PartnerId::new("ads"))
            .expect("acquisition partner is ranked");
        assert!((ads.final_score - 0.6365).abs() < 1e-9);
        assert_eq!(ads.priority, PriorityTier::Medium);
    }

    #[test]
    fn explicit_focus_areas_are_kept_even_when_empty() {
        let (stores, partners) = catalogs();
        let areas = [CommerceStage::Cart, CommerceStage::Compliance, CommerceStage::Cart];
        let grouped = RecommendationEngine::new()
            .recommend_by_focus_area(
                &StoreId::new("s1"),
                &stores,
                &partners,
                Some(&areas),
                &mut FixedJitter(0),
            )
            .expect("known store");

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].focus_area, CommerceStage::Cart);
        assert_eq!(ids(&grouped[0].recommendations), vec!["cart-b", "cart-a", "cart-c"]);
        assert_eq!(grouped[1].focus_area, CommerceStage::Compliance);
        assert!(grouped[1].recommendations.is_empty());
    }

    #[test]
    fn focus_area_applies_its_own_threshold() {
        let (stores, partners) = catalogs();
        let grouped = RecommendationEngine::new()
            .recommend_by_focus_area(
                &StoreId::new("s1"),
                &stores,
                &partners,
                Some(&[CommerceStage::Talent]),
                &mut FixedJitter(0),
            )
            .expect("known store");

        // the talent partner targets nothing and scores about 0.31
        assert!(grouped[0].recommendations.is_empty());
    }

    #[test]
    fn auto_focus_areas_come_from_gaps_and_skip_empty_areas() {
        // base level 3 with zero jitter: every stage is a medium gap, so the
        // first three stages in declaration order are chosen
        let (stores, partners) = catalogs();
        let engine = RecommendationEngine::new();

        let auto = engine
            .recommend_by_focus_area(
                &StoreId::new("s1"),
                &stores,
                &partners,
                None,
                &mut FixedJitter(0),
            )
            .expect("known store");
        assert_eq!(auto.len(), 1);
        assert_eq!(auto[0].focus_area, CommerceStage::Acquisition);
        assert_eq!(ids(&auto[0].recommendations), vec!["ads"]);

        let empty_list = engine
            .recommend_by_focus_area(
                &StoreId::new("s1"),
                &stores,
                &partners,
                Some(&[]),
                &mut FixedJitter(0),
            )
            .expect("known store");
        assert_eq!(empty_list, auto);
    }

    #[test]
    fn mature_store_without_gaps_gets_no_auto_focus_areas() {
        let stores = StoreCatalog::new(vec![store("big", 250_000.0, &[])]);
        let (_, partners) = catalogs();
        let grouped = RecommendationEngine::new()
            .recommend_by_focus_area(
                &StoreId::new("big"),
                &stores,
                &partners,
                None,
                &mut FixedJitter(0),
            )
            .expect("known store");
        assert!(grouped.is_empty());
    }

    #[test]
    fn settings_change_weights_and_focus_size() {
        let (stores, partners) = catalogs();
        let engine = RecommendationEngine::with_settings(EngineSettings {
            weights: CombinerWeights { compatibility: 1.0, profitability: 0.0 },
            default_min_score: DEFAULT_MIN_SCORE,
            focus_min_score: 0.0,
            focus_top_n: 1,
        });

        let grouped = engine
            .recommend_by_focus_area(
                &StoreId::new("s1"),
                &stores,
                &partners,
                Some(&[CommerceStage::Cart]),
                &mut FixedJitter(0),
            )
            .expect("known store");
        assert_eq!(grouped[0].recommendations.len(), 1);
        let top = &grouped[0].recommendations[0];
        assert!((top.final_score - top.compatibility.total_score).abs() < 1e-9);
    }
}
