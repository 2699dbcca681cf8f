//! Closed enumerations shared by stores, partners and the scoring engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Business vertical a store operates in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSegment {
    Fashion,
    Electronics,
    HomeGarden,
    HealthBeauty,
    Sports,
    Books,
}

impl StoreSegment {
    pub const ALL: [StoreSegment; 6] = [
        Self::Fashion,
        Self::Electronics,
        Self::HomeGarden,
        Self::HealthBeauty,
        Self::Sports,
        Self::Books,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fashion => "fashion",
            Self::Electronics => "electronics",
            Self::HomeGarden => "home_garden",
            Self::HealthBeauty => "health_beauty",
            Self::Sports => "sports",
            Self::Books => "books",
        }
    }
}

impl FromStr for StoreSegment {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fashion" => Ok(Self::Fashion),
            "electronics" => Ok(Self::Electronics),
            "home_garden" => Ok(Self::HomeGarden),
            "health_beauty" => Ok(Self::HealthBeauty),
            "sports" => Ok(Self::Sports),
            "books" => Ok(Self::Books),
            _ => Err(ValidationError::UnknownVariant {
                field: "segment",
                value: value.to_string(),
                expected: "fashion|electronics|home_garden|health_beauty|sports|books",
            }),
        }
    }
}

/// Size tier of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSize {
    Micro,
    Small,
    Medium,
    Large,
}

impl StoreSize {
    pub const ALL: [StoreSize; 4] = [Self::Micro, Self::Small, Self::Medium, Self::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Micro => "micro",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl FromStr for StoreSize {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "micro" => Ok(Self::Micro),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(ValidationError::UnknownVariant {
                field: "size",
                value: value.to_string(),
                expected: "micro|small|medium|large",
            }),
        }
    }
}

/// One of the twelve ordered phases of running an online store.
///
/// Used both as a partner's category and as the key of store priorities,
/// maturity profiles and gaps. The derived ordering follows declaration
/// order, which is also the tie-break order for gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommerceStage {
    Acquisition,
    Infrastructure,
    Navigation,
    Product,
    Cart,
    Payment,
    Fulfillment,
    Delivery,
    PostSale,
    Analytics,
    Compliance,
    Talent,
}

impl CommerceStage {
    pub const ALL: [CommerceStage; 12] = [
        Self::Acquisition,
        Self::Infrastructure,
        Self::Navigation,
        Self::Product,
        Self::Cart,
        Self::Payment,
        Self::Fulfillment,
        Self::Delivery,
        Self::PostSale,
        Self::Analytics,
        Self::Compliance,
        Self::Talent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acquisition => "acquisition",
            Self::Infrastructure => "infrastructure",
            Self::Navigation => "navigation",
            Self::Product => "product",
            Self::Cart => "cart",
            Self::Payment => "payment",
            Self::Fulfillment => "fulfillment",
            Self::Delivery => "delivery",
            Self::PostSale => "post_sale",
            Self::Analytics => "analytics",
            Self::Compliance => "compliance",
            Self::Talent => "talent",
        }
    }

    /// 1-based position in the commerce lifecycle.
    pub fn position(&self) -> u8 {
        match self {
            Self::Acquisition => 1,
            Self::Infrastructure => 2,
            Self::Navigation => 3,
            Self::Product => 4,
            Self::Cart => 5,
            Self::Payment => 6,
            Self::Fulfillment => 7,
            Self::Delivery => 8,
            Self::PostSale => 9,
            Self::Analytics => 10,
            Self::Compliance => 11,
            Self::Talent => 12,
        }
    }
}

impl FromStr for CommerceStage {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|stage| stage.as_str() == normalized).ok_or_else(|| {
            ValidationError::UnknownVariant {
                field: "stage",
                value: value.to_string(),
                expected: "acquisition|infrastructure|navigation|product|cart|payment|\
                           fulfillment|delivery|post_sale|analytics|compliance|talent",
            }
        })
    }
}

/// How a partner charges the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    #[default]
    Fixed,
    Percentage,
    PerTransaction,
}

impl PricingModel {
    pub const ALL: [PricingModel; 3] = [Self::Fixed, Self::Percentage, Self::PerTransaction];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percentage => "percentage",
            Self::PerTransaction => "per_transaction",
        }
    }
}

impl FromStr for PricingModel {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "percentage" => Ok(Self::Percentage),
            "per_transaction" => Ok(Self::PerTransaction),
            _ => Err(ValidationError::UnknownVariant {
                field: "pricing_model",
                value: value.to_string(),
                expected: "fixed|percentage|per_transaction",
            }),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(StoreSegment, StoreSize, CommerceStage, PricingModel);
