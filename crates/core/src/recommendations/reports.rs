//! Composite reports built from the engine's primitives.

use serde::{Deserialize, Serialize};

use super::engine::{find_store, FocusAreaRecommendations, RecommendationEngine};
use super::{RecommendationResult, ANALYSIS_TOP_N, ONBOARDING_TOP_N};
use crate::catalog::{PartnerCatalog, StoreCatalog};
use crate::domain::store::StoreId;
use crate::maturity::{GapRecord, JitterSource, MaturityProfile};
use crate::scoring::{FinalRecommendation, PriorityTier};

/// What a store sees right after onboarding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OnboardingReport {
    pub store_id: StoreId,
    pub maturity: MaturityProfile,
    pub gaps: Vec<GapRecord>,
    pub initial_recommendations: Vec<FinalRecommendation>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_recommendations: usize,
    pub high_priority_count: usize,
    pub areas_analyzed: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreAnalysis {
    pub store_id: StoreId,
    pub recommendations: Vec<FinalRecommendation>,
    pub focus_areas: Vec<FocusAreaRecommendations>,
    pub summary: AnalysisSummary,
}

impl RecommendationEngine {
    /// Maturity, gaps and a first short list for a freshly onboarded store.
    /// Gaps are read from the same profile that is returned.
    pub fn onboarding_report(
        &self,
        store_id: &StoreId,
        stores: &StoreCatalog,
        partners: &PartnerCatalog,
        jitter: &mut dyn JitterSource,
    ) -> RecommendationResult<OnboardingReport> {
        let store = find_store(stores, store_id)?;
        let maturity = self.maturity.analyze(store, jitter);
        let gaps = GapRecord::from_profile(&maturity);
        let initial_recommendations =
            self.rank(store, partners.iter(), self.settings.default_min_score, ONBOARDING_TOP_N);

        tracing::debug!(
            event_name = "engine.onboarding.reported",
            store_id = %store.id,
            gaps = gaps.len(),
            recommendations = initial_recommendations.len(),
            "built onboarding report"
        );

        Ok(OnboardingReport { store_id: store.id.clone(), maturity, gaps, initial_recommendations })
    }

    /// General ranking plus gap-driven focus areas and a summary.
    pub fn full_analysis(
        &self,
        store_id: &StoreId,
        stores: &StoreCatalog,
        partners: &PartnerCatalog,
        jitter: &mut dyn JitterSource,
    ) -> RecommendationResult<StoreAnalysis> {
        let store = find_store(stores, store_id)?;
        let recommendations =
            self.rank(store, partners.iter(), self.settings.default_min_score, ANALYSIS_TOP_N);
        let focus_areas = self.auto_focus_areas(store, partners, jitter);

        let summary = AnalysisSummary {
            total_recommendations: recommendations.len(),
            high_priority_count: recommendations
                .iter()
                .filter(|recommendation| recommendation.priority == PriorityTier::High)
                .count(),
            areas_analyzed: focus_areas.len(),
        };

        Ok(StoreAnalysis { store_id: store.id.clone(), recommendations, focus_areas, summary })
    }
}
