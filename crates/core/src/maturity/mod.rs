//! Store maturity profiling and gap detection.
//!
//! A store's maturity is estimated per commerce stage from its revenue and
//! conversion rate, with a bounded random offset per stage so that stages do
//! not all read the same. Stages scoring below [`GAP_THRESHOLD`] are gaps and
//! drive the automatic choice of focus areas.

mod jitter;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::StoreCatalog;
use crate::domain::store::{StoreId, StoreProfile};
use crate::domain::taxonomy::CommerceStage;
use crate::errors::DomainError;

pub use jitter::{FixedJitter, JitterSource, RngJitter, MAX_JITTER};

pub const MIN_MATURITY: u8 = 1;
pub const MAX_MATURITY: u8 = 10;

/// Stages scoring strictly below this value are reported as gaps.
pub const GAP_THRESHOLD: u8 = 5;

/// Gaps scoring strictly below this value are high severity.
pub const HIGH_SEVERITY_THRESHOLD: u8 = 3;

/// Per-stage maturity score (1-10) for one store. Always holds every stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaturityProfile(BTreeMap<CommerceStage, u8>);

impl MaturityProfile {
    pub fn score(&self, stage: CommerceStage) -> u8 {
        self.0.get(&stage).copied().unwrap_or(MIN_MATURITY)
    }

    /// Stages and scores in stage declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (CommerceStage, u8)> + '_ {
        self.0.iter().map(|(stage, score)| (*stage, *score))
    }

    pub fn from_scores(scores: impl IntoIterator<Item = (CommerceStage, u8)>) -> Self {
        let mut profile: BTreeMap<CommerceStage, u8> =
            CommerceStage::ALL.into_iter().map(|stage| (stage, MIN_MATURITY)).collect();
        for (stage, score) in scores {
            profile.insert(stage, score.clamp(MIN_MATURITY, MAX_MATURITY));
        }
        Self(profile)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSeverity {
    High,
    Medium,
}

impl GapSeverity {
    pub fn from_score(score: u8) -> Self {
        if score < HIGH_SEVERITY_THRESHOLD {
            Self::High
        } else {
            Self::Medium
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapRecord {
    pub stage: CommerceStage,
    pub current_score: u8,
    pub severity: GapSeverity,
    pub suggested_priority: u8,
}

impl GapRecord {
    /// Extracts the gaps of a profile, most urgent first. Equal priorities
    /// keep stage declaration order.
    pub fn from_profile(profile: &MaturityProfile) -> Vec<GapRecord> {
        let mut gaps: Vec<GapRecord> = profile
            .iter()
            .filter(|(_, score)| *score < GAP_THRESHOLD)
            .map(|(stage, score)| GapRecord {
                stage,
                current_score: score,
                severity: GapSeverity::from_score(score),
                suggested_priority: MAX_MATURITY - score,
            })
            .collect();

        gaps.sort_by(|a, b| b.suggested_priority.cmp(&a.suggested_priority));
        gaps
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MaturityAnalyzer;

impl MaturityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Stage-independent maturity level derived from revenue and conversion.
    /// May fall to zero before per-stage clamping.
    pub fn base_level(&self, store: &StoreProfile) -> i16 {
        let revenue_level: i16 = if store.monthly_revenue > 100_000.0 {
            7
        } else if store.monthly_revenue > 50_000.0 {
            5
        } else if store.monthly_revenue > 10_000.0 {
            3
        } else {
            1
        };

        let conversion_adjustment: i16 = if store.conversion_rate > 0.03 {
            1
        } else if store.conversion_rate < 0.01 {
            -1
        } else {
            0
        };

        revenue_level + conversion_adjustment
    }

    pub fn analyze(&self, store: &StoreProfile, jitter: &mut dyn JitterSource) -> MaturityProfile {
        let base = self.base_level(store);
        MaturityProfile::from_scores(CommerceStage::ALL.into_iter().map(|stage| {
            let raw = base + i16::from(jitter.next_offset());
            let score = raw.clamp(i16::from(MIN_MATURITY), i16::from(MAX_MATURITY)) as u8;
            (stage, score)
        }))
    }

    pub fn identify_gaps(
        &self,
        store: &StoreProfile,
        jitter: &mut dyn JitterSource,
    ) -> Vec<GapRecord> {
        GapRecord::from_profile(&self.analyze(store, jitter))
    }

    /// Catalog-level variant: an unknown store is an explicit
    /// [`DomainError::StoreNotFound`], never a panic.
    pub fn identify_gaps_for(
        &self,
        store_id: &StoreId,
        stores: &StoreCatalog,
        jitter: &mut dyn JitterSource,
    ) -> Result<Vec<GapRecord>, DomainError> {
        let store =
            stores.find(store_id).ok_or_else(|| DomainError::StoreNotFound(store_id.clone()))?;
        Ok(self.identify_gaps(store, jitter))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::store::StoreRegistration;

    fn store(revenue: f64, conversion_rate: f64) -> StoreProfile {
        StoreRegistration::new("store-m", "Maturity Store", "electronics", "large")
            .with_metrics(revenue, 100, 100.0, conversion_rate)
            .into_profile(Utc::now())
            .expect("valid store")
    }

    /// Replays a fixed list of offsets, one per stage.
    struct ScriptedJitter(Vec<i8>);

    impl JitterSource for ScriptedJitter {
        fn next_offset(&mut self) -> i8 {
            if self.0.is_empty() {
                0
            } else {
                self.0.remove(0)
            }
        }
    }

    #[test]
    fn base_level_follows_revenue_and_conversion_thresholds() {
        let analyzer = MaturityAnalyzer::new();
        assert_eq!(analyzer.base_level(&store(150_000.0, 0.035)), 8);
        assert_eq!(analyzer.base_level(&store(100_000.0, 0.02)), 5);
        assert_eq!(analyzer.base_level(&store(60_000.0, 0.005)), 4);
        assert_eq!(analyzer.base_level(&store(25_000.0, 0.022)), 3);
        assert_eq!(analyzer.base_level(&store(5_000.0, 0.001)), 0);
    }

    #[test]
    fn every_stage_is_scored_within_bounds() {
        let analyzer = MaturityAnalyzer::new();
        for seed in 0..20 {
            let profile = analyzer.analyze(&store(150_000.0, 0.035), &mut RngJitter::seeded(seed));
            assert_eq!(profile.iter().count(), CommerceStage::ALL.len());
            for (_, score) in profile.iter() {
                assert!((MIN_MATURITY..=MAX_MATURITY).contains(&score));
            }
        }
    }

    #[test]
    fn low_base_is_clamped_to_minimum() {
        let profile =
            MaturityAnalyzer::new().analyze(&store(5_000.0, 0.001), &mut FixedJitter(-2));
        assert!(profile.iter().all(|(_, score)| score == MIN_MATURITY));
    }

    #[test]
    fn same_seed_reproduces_profile() {
        let analyzer = MaturityAnalyzer::new();
        let subject = store(25_000.0, 0.022);
        let first = analyzer.analyze(&subject, &mut RngJitter::seeded(99));
        let second = analyzer.analyze(&subject, &mut RngJitter::seeded(99));
        assert_eq!(first, second);
    }

    #[test]
    fn gaps_keep_only_low_stages_sorted_by_priority() {
        // base 3 (25k revenue, 2.2% conversion)
        let offsets = vec![2, -2, 1, 0, -1, 2, 2, -2, 0, 1, 2, 2];
        let gaps = MaturityAnalyzer::new()
            .identify_gaps(&store(25_000.0, 0.022), &mut ScriptedJitter(offsets));

        let summary: Vec<_> =
            gaps.iter().map(|gap| (gap.stage, gap.current_score, gap.suggested_priority)).collect();
        assert_eq!(
            summary,
            vec![
                (CommerceStage::Infrastructure, 1, 9),
                (CommerceStage::Delivery, 1, 9),
                (CommerceStage::Cart, 2, 8),
                (CommerceStage::Product, 3, 7),
                (CommerceStage::PostSale, 3, 7),
                (CommerceStage::Navigation, 4, 6),
                (CommerceStage::Analytics, 4, 6),
            ]
        );
        assert!(gaps.iter().all(|gap| gap.current_score < GAP_THRESHOLD));
    }

    #[test]
    fn severity_is_high_below_three() {
        assert_eq!(GapSeverity::from_score(1), GapSeverity::High);
        assert_eq!(GapSeverity::from_score(2), GapSeverity::High);
        assert_eq!(GapSeverity::from_score(3), GapSeverity::Medium);
        assert_eq!(GapSeverity::from_score(4), GapSeverity::Medium);
    }

    #[test]
    fn mature_store_has_no_gaps() {
        let gaps = MaturityAnalyzer::new()
            .identify_gaps(&store(150_000.0, 0.035), &mut FixedJitter(-2));
        assert!(gaps.is_empty());
    }

    #[test]
    fn unknown_store_is_not_found() {
        let catalog = StoreCatalog::new(vec![store(1_000.0, 0.02)]);
        let result = MaturityAnalyzer::new().identify_gaps_for(
            &StoreId::new("ghost"),
            &catalog,
            &mut FixedJitter(0),
        );
        assert_eq!(result, Err(DomainError::StoreNotFound(StoreId::new("ghost"))));
    }
}
