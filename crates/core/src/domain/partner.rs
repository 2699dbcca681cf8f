use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::taxonomy::{CommerceStage, PricingModel, StoreSegment, StoreSize};
use super::{require_non_negative, require_rating, require_text, require_unit_interval};
use crate::errors::ValidationError;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartnerId(pub String);

impl PartnerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A third-party solution provider offered to stores. Immutable once
/// registered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub category: CommerceStage,
    pub subcategory: String,
    pub description: String,
    pub pricing_model: PricingModel,
    pub min_price: f64,
    pub max_price: Option<f64>,
    pub target_segments: BTreeSet<StoreSegment>,
    pub target_sizes: BTreeSet<StoreSize>,
    /// 1 (plug and play) to 10 (hardest to integrate).
    pub integration_complexity: u8,
    pub roi_potential: u8,
    pub commission_rate: f64,
}

impl Partner {
    pub fn targets_segment(&self, segment: StoreSegment) -> bool {
        self.target_segments.contains(&segment)
    }

    pub fn targets_size(&self, size: StoreSize) -> bool {
        self.target_sizes.contains(&size)
    }
}

fn default_pricing_model() -> String {
    PricingModel::Fixed.as_str().to_string()
}

fn default_rating() -> i64 {
    5
}

fn default_commission_rate() -> f64 {
    0.1
}

/// Catalog entry request for a new partner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartnerRegistration {
    pub partner_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_pricing_model")]
    pub pricing_model: String,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub target_segments: Vec<String>,
    #[serde(default)]
    pub target_sizes: Vec<String>,
    #[serde(default = "default_rating")]
    pub integration_complexity: i64,
    #[serde(default = "default_rating")]
    pub roi_potential: i64,
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
}

impl PartnerRegistration {
    pub fn new(
        partner_id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            partner_id: partner_id.into(),
            name: name.into(),
            category: category.into(),
            subcategory: String::new(),
            description: String::new(),
            pricing_model: default_pricing_model(),
            min_price: 0.0,
            max_price: None,
            target_segments: Vec::new(),
            target_sizes: Vec::new(),
            integration_complexity: default_rating(),
            roi_potential: default_rating(),
            commission_rate: default_commission_rate(),
        }
    }

    pub fn with_details(
        mut self,
        subcategory: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.subcategory = subcategory.into();
        self.description = description.into();
        self
    }

    pub fn with_pricing(
        mut self,
        model: impl Into<String>,
        min_price: f64,
        max_price: Option<f64>,
    ) -> Self {
        self.pricing_model = model.into();
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_targets<S, Z>(mut self, segments: S, sizes: Z) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        Z: IntoIterator,
        Z::Item: Into<String>,
    {
        self.target_segments = segments.into_iter().map(Into::into).collect();
        self.target_sizes = sizes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_economics(
        mut self,
        integration_complexity: i64,
        roi_potential: i64,
        commission_rate: f64,
    ) -> Self {
        self.integration_complexity = integration_complexity;
        self.roi_potential = roi_potential;
        self.commission_rate = commission_rate;
        self
    }

    pub fn into_partner(self) -> Result<Partner, ValidationError> {
        let min_price = require_non_negative("min_price", self.min_price)?;
        let max_price = self
            .max_price
            .map(|value| require_non_negative("max_price", value))
            .transpose()?;
        if let Some(max_price) = max_price {
            if max_price < min_price {
                return Err(ValidationError::out_of_range(
                    "max_price",
                    format!("must not be below min_price ({min_price}), got {max_price}"),
                ));
            }
        }

        Ok(Partner {
            id: PartnerId(require_text("partner_id", &self.partner_id)?),
            name: require_text("name", &self.name)?,
            category: self.category.parse::<CommerceStage>().map_err(|error| match error {
                ValidationError::UnknownVariant { value, expected, .. } => {
                    ValidationError::UnknownVariant { field: "category", value, expected }
                }
                other => other,
            })?,
            subcategory: self.subcategory.trim().to_string(),
            description: self.description.trim().to_string(),
            pricing_model: self.pricing_model.parse()?,
            min_price,
            max_price,
            target_segments: self
                .target_segments
                .iter()
                .map(|segment| segment.parse::<StoreSegment>())
                .collect::<Result<BTreeSet<_>, _>>()?,
            target_sizes: self
                .target_sizes
                .iter()
                .map(|size| size.parse::<StoreSize>())
                .collect::<Result<BTreeSet<_>, _>>()?,
            integration_complexity: require_rating(
                "integration_complexity",
                self.integration_complexity,
            )?,
            roi_potential: require_rating("roi_potential", self.roi_potential)?,
            commission_rate: require_unit_interval("commission_rate", self.commission_rate)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> PartnerRegistration {
        PartnerRegistration::new("partner-ads", "AdOptimizer Pro", "acquisition")
            .with_details("Ad management", "Automated campaign optimization")
            .with_pricing("percentage", 500.0, Some(5_000.0))
            .with_targets(["fashion", "electronics"], ["small", "medium"])
            .with_economics(3, 8, 0.15)
    }

    #[test]
    fn registration_builds_partner_with_target_sets() {
        let partner = registration().into_partner().expect("valid partner");

        assert_eq!(partner.category, CommerceStage::Acquisition);
        assert_eq!(partner.pricing_model, PricingModel::Percentage);
        assert!(partner.targets_segment(StoreSegment::Fashion));
        assert!(!partner.targets_segment(StoreSegment::Books));
        assert!(partner.targets_size(StoreSize::Medium));
        assert_eq!(partner.integration_complexity, 3);
    }

    #[test]
    fn unknown_category_reports_category_field() {
        let mut request = registration();
        request.category = "marketing".to_string();

        let error = request.into_partner().expect_err("category must be validated");
        assert!(matches!(error, ValidationError::UnknownVariant { field: "category", .. }));
    }

    #[test]
    fn unknown_pricing_model_and_target_size_are_rejected() {
        let error = registration()
            .with_pricing("subscription", 0.0, None)
            .into_partner()
            .expect_err("pricing model");
        assert!(matches!(error, ValidationError::UnknownVariant { field: "pricing_model", .. }));

        let error = registration()
            .with_targets(["fashion"], ["enormous"])
            .into_partner()
            .expect_err("target size");
        assert!(matches!(error, ValidationError::UnknownVariant { field: "size", .. }));
    }

    #[test]
    fn ratings_and_rates_are_range_checked() {
        assert!(registration().with_economics(0, 8, 0.1).into_partner().is_err());
        assert!(registration().with_economics(3, 11, 0.1).into_partner().is_err());
        assert!(registration().with_economics(3, 8, 1.2).into_partner().is_err());
    }

    #[test]
    fn max_price_below_min_price_is_rejected() {
        let error = registration()
            .with_pricing("fixed", 900.0, Some(100.0))
            .into_partner()
            .expect_err("inverted price range");
        assert!(matches!(error, ValidationError::OutOfRange { field: "max_price", .. }));
    }

    #[test]
    fn json_defaults_fill_optional_fields() {
        let request: PartnerRegistration = serde_json::from_str(
            r#"{"partner_id":"p-1","name":"Bare","category":"talent"}"#,
        )
        .expect("deserialize");

        let partner = request.into_partner().expect("valid");
        assert_eq!(partner.pricing_model, PricingModel::Fixed);
        assert_eq!(partner.integration_complexity, 5);
        assert_eq!(partner.roi_potential, 5);
        assert_eq!(partner.commission_rate, 0.1);
        assert!(partner.target_segments.is_empty());
    }
}
