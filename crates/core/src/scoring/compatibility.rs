//! How well a partner fits a store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::unit;
use crate::domain::partner::{Partner, PartnerId};
use crate::domain::store::{StoreId, StoreProfile};
use crate::domain::taxonomy::CommerceStage;

/// Pain-point keys and the commerce stages that address them.
///
/// A store tag matches a key when the tag is a substring of the key, so
/// `conversion` matches `low_conversion` but `low_conversion_rate` does not.
pub const PAIN_POINT_STAGES: &[(&str, &[CommerceStage])] = &[
    (
        "low_conversion",
        &[CommerceStage::Navigation, CommerceStage::Product, CommerceStage::Cart],
    ),
    ("high_cac", &[CommerceStage::Acquisition]),
    ("expensive_logistics", &[CommerceStage::Fulfillment, CommerceStage::Delivery]),
    ("payments", &[CommerceStage::Payment]),
    ("customer_service", &[CommerceStage::PostSale]),
];

const SEGMENT_HIT: f64 = 1.0;
const SEGMENT_MISS: f64 = 0.3;
const SIZE_HIT: f64 = 1.0;
const SIZE_MISS: f64 = 0.5;
/// Pain-point score of a store that reported no pain points.
const NO_PAIN_POINTS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompatibilityWeights {
    pub segment: f64,
    pub size: f64,
    pub pain_point: f64,
    pub priority: f64,
}

impl CompatibilityWeights {
    pub const DEFAULT: Self = Self { segment: 0.3, size: 0.25, pain_point: 0.25, priority: 0.2 };
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityScore {
    pub store_id: StoreId,
    pub partner_id: PartnerId,
    pub segment_match: f64,
    pub size_match: f64,
    pub pain_point_match: f64,
    pub priority_match: f64,
    pub total_score: f64,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CompatibilityScorer {
    weights: CompatibilityWeights,
}

impl CompatibilityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: CompatibilityWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, store: &StoreProfile, partner: &Partner) -> CompatibilityScore {
        let segment_match =
            if partner.targets_segment(store.segment) { SEGMENT_HIT } else { SEGMENT_MISS };
        let size_match = if partner.targets_size(store.size) { SIZE_HIT } else { SIZE_MISS };
        let pain_point_match = self.pain_point_match(&store.pain_points, partner.category);
        let priority_match = f64::from(store.priority_for(partner.category)) / 10.0;

        let total_score = unit(
            segment_match * self.weights.segment
                + size_match * self.weights.size
                + pain_point_match * self.weights.pain_point
                + priority_match * self.weights.priority,
        );

        CompatibilityScore {
            store_id: store.id.clone(),
            partner_id: partner.id.clone(),
            segment_match,
            size_match,
            pain_point_match,
            priority_match,
            total_score,
            calculated_at: Utc::now(),
        }
    }

    /// Share of the store's pain points that the partner's category
    /// addresses, capped at 1.
    pub fn pain_point_match(&self, pain_points: &[String], category: CommerceStage) -> f64 {
        if pain_points.is_empty() {
            return NO_PAIN_POINTS;
        }

        let matches = pain_points
            .iter()
            .flat_map(|tag| {
                PAIN_POINT_STAGES.iter().filter(move |(key, _)| key.contains(tag.as_str()))
            })
            .filter(|(_, stages)| stages.contains(&category))
            .count();

        unit(matches as f64 / pain_points.len() as f64)
    }
}
