//! Merges compatibility and profitability into a final recommendation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::compatibility::CompatibilityScore;
use super::profitability::ProfitabilityScore;
use super::unit;
use crate::domain::partner::PartnerId;
use crate::domain::store::StoreId;
use crate::errors::ValidationError;

pub const STRONG_SEGMENT_FIT: &str = "Strong fit with the store's segment";
pub const HIGH_REVENUE_POTENTIAL: &str = "High revenue potential for the platform";
pub const ADDRESSES_PAIN_POINTS: &str = "Addresses the store's reported pain points";

const SEGMENT_REASON_ABOVE: f64 = 0.8;
const COMMISSION_REASON_ABOVE: f64 = 0.6;
const PAIN_POINT_REASON_ABOVE: f64 = 0.7;
const FAST_TIMELINE_ABOVE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombinerWeights {
    pub compatibility: f64,
    pub profitability: f64,
}

impl CombinerWeights {
    pub const DEFAULT: Self = Self { compatibility: 0.7, profitability: 0.3 };

    /// Weights must be finite, non-negative and sum to at most 1 so that the
    /// final score stays a weighted average.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let weights = [
            ("compatibility_weight", self.compatibility),
            ("profitability_weight", self.profitability),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::out_of_range(
                    field,
                    format!("must be a non-negative number, got {value}"),
                ));
            }
        }
        let sum = self.compatibility + self.profitability;
        if sum > 1.0 + f64::EPSILON {
            return Err(ValidationError::out_of_range(
                "compatibility_weight",
                format!("weights must sum to at most 1, got {sum}"),
            ));
        }
        Ok(())
    }
}

impl Default for CombinerWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Urgency bucket of a recommendation. Serialized as 1 (high) to 3 (low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn from_score(final_score: f64) -> Self {
        if final_score >= 0.8 {
            Self::High
        } else if final_score >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl From<PriorityTier> for u8 {
    fn from(tier: PriorityTier) -> Self {
        tier.rank()
    }
}

impl TryFrom<u8> for PriorityTier {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::High),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Low),
            other => Err(ValidationError::out_of_range(
                "priority",
                format!("must be 1, 2 or 3, got {other}"),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImplementationTimeline {
    #[serde(rename = "2-4 weeks")]
    Fast,
    #[serde(rename = "4-8 weeks")]
    Slow,
}

impl ImplementationTimeline {
    pub fn from_score(final_score: f64) -> Self {
        if final_score > FAST_TIMELINE_ABOVE {
            Self::Fast
        } else {
            Self::Slow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fast => "2-4 weeks",
            Self::Slow => "4-8 weeks",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinalRecommendation {
    pub store_id: StoreId,
    pub partner_id: PartnerId,
    pub compatibility: CompatibilityScore,
    pub profitability: ProfitabilityScore,
    pub final_score: f64,
    pub priority: PriorityTier,
    pub reasoning: Vec<String>,
    /// Percent. Proxy taken straight from the partner's retention
    /// probability, not a financial projection.
    pub estimated_roi: f64,
    pub implementation_timeline: ImplementationTimeline,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationCombiner {
    weights: CombinerWeights,
}

impl RecommendationCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: CombinerWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> CombinerWeights {
        self.weights
    }

    pub fn combine(
        &self,
        compatibility: CompatibilityScore,
        profitability: ProfitabilityScore,
    ) -> FinalRecommendation {
        let final_score = unit(
            compatibility.total_score * self.weights.compatibility
                + profitability.total_score * self.weights.profitability,
        );

        FinalRecommendation {
            store_id: compatibility.store_id.clone(),
            partner_id: compatibility.partner_id.clone(),
            final_score,
            priority: PriorityTier::from_score(final_score),
            reasoning: reasoning(&compatibility, &profitability),
            estimated_roi: profitability.retention_probability * 100.0,
            implementation_timeline: ImplementationTimeline::from_score(final_score),
            created_at: Utc::now(),
            compatibility,
            profitability,
        }
    }
}

fn reasoning(
    compatibility: &CompatibilityScore,
    profitability: &ProfitabilityScore,
) -> Vec<String> {
    let mut reasons = Vec::new();
    if compatibility.segment_match > SEGMENT_REASON_ABOVE {
        reasons.push(STRONG_SEGMENT_FIT.to_string());
    }
    if profitability.commission_potential > COMMISSION_REASON_ABOVE {
        reasons.push(HIGH_REVENUE_POTENTIAL.to_string());
    }
    if compatibility.pain_point_match > PAIN_POINT_REASON_ABOVE {
        reasons.push(ADDRESSES_PAIN_POINTS.to_string());
    }
    reasons
}
