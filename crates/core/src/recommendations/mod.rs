//! Partner recommendation engine
//!
//! Ranks the partner catalog for a store, groups recommendations by focus
//! area, measures the market reach of a partner across the store catalog and
//! summarizes the whole ecosystem. Every operation takes catalog snapshots
//! and holds no state between calls.

mod dashboard;
mod engine;
mod market;
mod reports;

pub use dashboard::{EcosystemDashboard, EcosystemMaturity, MATURE_ECOSYSTEM_STORES};
pub use engine::{FocusAreaRecommendations, RecommendationEngine};
pub use market::{MarketImpact, MarketOpportunity, StoreMatch};
pub use reports::{AnalysisSummary, OnboardingReport, StoreAnalysis};

use crate::errors::{DomainError, ValidationError};
use crate::scoring::CombinerWeights;

/// Result type for recommendation operations
pub type RecommendationResult<T> = Result<T, DomainError>;

/// Maximum recommendations returned when the caller gives no limit
pub const DEFAULT_LIMIT: usize = 10;

/// Minimum final score for general recommendations
pub const DEFAULT_MIN_SCORE: f64 = 0.3;

/// Minimum final score inside a focus area
pub const FOCUS_MIN_SCORE: f64 = 0.4;

/// Recommendations kept per focus area
pub const FOCUS_TOP_N: usize = 3;

/// Focus areas derived from gaps when the caller names none
pub const AUTO_FOCUS_AREAS: usize = 3;

/// Initial recommendations attached to an onboarding report
pub const ONBOARDING_TOP_N: usize = 5;

/// General recommendations attached to a full store analysis
pub const ANALYSIS_TOP_N: usize = 8;

/// Compatibility at or above which a store is a potential match for a partner
pub const POTENTIAL_MATCH_SCORE: f64 = 0.6;

/// Compatibility at or above which a store is listed as a high-compatibility match
pub const HIGH_COMPATIBILITY_SCORE: f64 = 0.8;

/// Tunable knobs of [`RecommendationEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub weights: CombinerWeights,
    /// Score floor of the onboarding and full-analysis short lists.
    pub default_min_score: f64,
    pub focus_min_score: f64,
    pub focus_top_n: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            weights: CombinerWeights::DEFAULT,
            default_min_score: DEFAULT_MIN_SCORE,
            focus_min_score: FOCUS_MIN_SCORE,
            focus_top_n: FOCUS_TOP_N,
        }
    }
}

/// Caller-supplied bounds for [`RecommendationEngine::recommend_for`],
/// checked at the interface before the engine runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationQuery {
    pub limit: usize,
    pub min_score: f64,
}

impl RecommendationQuery {
    pub fn new(limit: usize, min_score: f64) -> Result<Self, ValidationError> {
        if limit == 0 {
            return Err(ValidationError::out_of_range("limit", "must be at least 1"));
        }
        if !min_score.is_finite() || !(0.0..=1.0).contains(&min_score) {
            return Err(ValidationError::out_of_range(
                "min_score",
                format!("must be within [0, 1], got {min_score}"),
            ));
        }
        Ok(Self { limit, min_score })
    }
}

impl Default for RecommendationQuery {
    fn default() -> Self {
        Self { limit: DEFAULT_LIMIT, min_score: DEFAULT_MIN_SCORE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_accepts_bounds_and_rejects_outside() {
        assert_eq!(
            RecommendationQuery::new(3, 0.0),
            Ok(RecommendationQuery { limit: 3, min_score: 0.0 })
        );
        assert!(RecommendationQuery::new(1, 1.0).is_ok());
        assert!(matches!(
            RecommendationQuery::new(0, 0.5),
            Err(ValidationError::OutOfRange { field: "limit", .. })
        ));
        assert!(RecommendationQuery::new(5, 1.5).is_err());
        assert!(RecommendationQuery::new(5, f64::NAN).is_err());
    }
}
