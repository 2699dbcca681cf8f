//! Store/partner scoring.
//!
//! Two independent scorers rate a (store, partner) pair: compatibility (does
//! the partner fit the store?) and profitability (is the pairing worth it for
//! the platform?). The combiner merges both into a ranked, explained
//! [`FinalRecommendation`].

pub mod combiner;
pub mod compatibility;
pub mod profitability;

pub use combiner::{
    CombinerWeights, FinalRecommendation, ImplementationTimeline, PriorityTier,
    RecommendationCombiner,
};
pub use compatibility::{CompatibilityScore, CompatibilityScorer, CompatibilityWeights};
pub use profitability::{ProfitabilityScore, ProfitabilityScorer, ProfitabilityWeights};

/// Clamps a score into `[0, 1]`.
pub(crate) fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;

    use crate::domain::partner::{Partner, PartnerRegistration};
    use crate::domain::store::{StoreProfile, StoreRegistration};

    pub const EPSILON: f64 = 1e-9;

    pub fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    /// Small fashion store with 25k revenue that weights acquisition at 8.
    pub fn fashion_store(pain_points: &[&str]) -> StoreProfile {
        StoreRegistration::new("store-fashion", "Trend Boutique", "fashion", "small")
            .with_metrics(25_000.0, 180, 138.89, 0.022)
            .with_pain_points(pain_points.iter().copied())
            .with_priority("acquisition", 8)
            .into_profile(Utc::now())
            .expect("valid store")
    }

    /// Acquisition partner that targets the fashion store.
    pub fn ads_partner() -> Partner {
        PartnerRegistration::new("partner-ads", "AdOptimizer Pro", "acquisition")
            .with_pricing("percentage", 500.0, Some(5_000.0))
            .with_targets(["fashion", "electronics"], ["small", "medium"])
            .with_economics(3, 8, 0.15)
            .into_partner()
            .expect("valid partner")
    }

    /// Partner with registration defaults that targets nothing the store has.
    pub fn unrelated_partner(category: &str) -> Partner {
        PartnerRegistration::new(format!("partner-{category}"), "Generic", category)
            .with_targets(["books"], ["large"])
            .into_partner()
            .expect("valid partner")
    }
}
