use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::taxonomy::{CommerceStage, StoreSegment, StoreSize};
use super::{
    normalize_tags, require_non_negative, require_rating, require_text, require_unit_interval,
};
use crate::errors::ValidationError;

/// Weight assumed for a commerce stage the store did not rank.
pub const NEUTRAL_PRIORITY: u8 = 5;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoreId(pub String);

impl StoreId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registration data and live performance metrics of a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreProfile {
    pub id: StoreId,
    pub name: String,
    pub segment: StoreSegment,
    pub size: StoreSize,
    pub monthly_revenue: f64,
    pub monthly_orders: u32,
    pub avg_ticket: f64,
    pub conversion_rate: f64,
    /// Channel name to traffic share. Shares are informational and not normalized.
    pub traffic_sources: BTreeMap<String, f64>,
    pub pain_points: Vec<String>,
    pub current_tools: Vec<String>,
    pub priorities: BTreeMap<CommerceStage, u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoreProfile {
    /// Declared weight for `stage`, falling back to [`NEUTRAL_PRIORITY`].
    pub fn priority_for(&self, stage: CommerceStage) -> u8 {
        self.priorities.get(&stage).copied().unwrap_or(NEUTRAL_PRIORITY)
    }
}

fn default_conversion_rate() -> f64 {
    0.02
}

fn default_traffic_sources() -> BTreeMap<String, f64> {
    BTreeMap::from([("organic".to_string(), 0.4), ("paid".to_string(), 0.6)])
}

/// Onboarding request for a new store. Enumerated fields arrive as raw
/// strings and are checked by [`StoreRegistration::into_profile`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreRegistration {
    pub store_id: String,
    pub name: String,
    pub segment: String,
    pub size: String,
    #[serde(default)]
    pub monthly_revenue: f64,
    #[serde(default)]
    pub monthly_orders: i64,
    #[serde(default)]
    pub avg_ticket: f64,
    #[serde(default = "default_conversion_rate")]
    pub conversion_rate: f64,
    #[serde(default = "default_traffic_sources")]
    pub traffic_sources: BTreeMap<String, f64>,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub current_tools: Vec<String>,
    #[serde(default)]
    pub priorities: BTreeMap<String, i64>,
}

impl StoreRegistration {
    pub fn new(
        store_id: impl Into<String>,
        name: impl Into<String>,
        segment: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            store_id: store_id.into(),
            name: name.into(),
            segment: segment.into(),
            size: size.into(),
            monthly_revenue: 0.0,
            monthly_orders: 0,
            avg_ticket: 0.0,
            conversion_rate: default_conversion_rate(),
            traffic_sources: default_traffic_sources(),
            pain_points: Vec::new(),
            current_tools: Vec::new(),
            priorities: BTreeMap::new(),
        }
    }

    pub fn with_metrics(
        mut self,
        monthly_revenue: f64,
        monthly_orders: i64,
        avg_ticket: f64,
        conversion_rate: f64,
    ) -> Self {
        self.monthly_revenue = monthly_revenue;
        self.monthly_orders = monthly_orders;
        self.avg_ticket = avg_ticket;
        self.conversion_rate = conversion_rate;
        self
    }

    pub fn with_pain_points<I, S>(mut self, pain_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pain_points = pain_points.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_current_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.current_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_traffic_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.traffic_sources =
            sources.into_iter().map(|(channel, share)| (channel.into(), share)).collect();
        self
    }

    pub fn with_priority(mut self, stage: impl Into<String>, weight: i64) -> Self {
        self.priorities.insert(stage.into(), weight);
        self
    }

    pub fn into_profile(self, now: DateTime<Utc>) -> Result<StoreProfile, ValidationError> {
        Ok(StoreProfile {
            id: StoreId(require_text("store_id", &self.store_id)?),
            name: require_text("name", &self.name)?,
            segment: self.segment.parse()?,
            size: self.size.parse()?,
            monthly_revenue: require_non_negative("monthly_revenue", self.monthly_revenue)?,
            monthly_orders: parse_orders(self.monthly_orders)?,
            avg_ticket: require_non_negative("avg_ticket", self.avg_ticket)?,
            conversion_rate: require_unit_interval("conversion_rate", self.conversion_rate)?,
            traffic_sources: self.traffic_sources,
            pain_points: normalize_tags(self.pain_points),
            current_tools: normalize_tags(self.current_tools),
            priorities: parse_priorities(self.priorities)?,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a store profile. The whole update is validated before
/// any field is written, so a rejected update leaves the profile untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreUpdate {
    pub name: Option<String>,
    pub segment: Option<String>,
    pub size: Option<String>,
    pub monthly_revenue: Option<f64>,
    pub monthly_orders: Option<i64>,
    pub avg_ticket: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub traffic_sources: Option<BTreeMap<String, f64>>,
    pub pain_points: Option<Vec<String>>,
    pub current_tools: Option<Vec<String>>,
    pub priorities: Option<BTreeMap<String, i64>>,
}

impl StoreUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(
        self,
        profile: &mut StoreProfile,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let name = self.name.as_deref().map(|name| require_text("name", name)).transpose()?;
        let segment = self.segment.as_deref().map(str::parse::<StoreSegment>).transpose()?;
        let size = self.size.as_deref().map(str::parse::<StoreSize>).transpose()?;
        let monthly_revenue = self
            .monthly_revenue
            .map(|value| require_non_negative("monthly_revenue", value))
            .transpose()?;
        let monthly_orders = self.monthly_orders.map(parse_orders).transpose()?;
        let avg_ticket =
            self.avg_ticket.map(|value| require_non_negative("avg_ticket", value)).transpose()?;
        let conversion_rate = self
            .conversion_rate
            .map(|value| require_unit_interval("conversion_rate", value))
            .transpose()?;
        let priorities = self.priorities.map(parse_priorities).transpose()?;

        if let Some(name) = name {
            profile.name = name;
        }
        if let Some(segment) = segment {
            profile.segment = segment;
        }
        if let Some(size) = size {
            profile.size = size;
        }
        if let Some(monthly_revenue) = monthly_revenue {
            profile.monthly_revenue = monthly_revenue;
        }
        if let Some(monthly_orders) = monthly_orders {
            profile.monthly_orders = monthly_orders;
        }
        if let Some(avg_ticket) = avg_ticket {
            profile.avg_ticket = avg_ticket;
        }
        if let Some(conversion_rate) = conversion_rate {
            profile.conversion_rate = conversion_rate;
        }
        if let Some(traffic_sources) = self.traffic_sources {
            profile.traffic_sources = traffic_sources;
        }
        if let Some(pain_points) = self.pain_points {
            profile.pain_points = normalize_tags(pain_points);
        }
        if let Some(current_tools) = self.current_tools {
            profile.current_tools = normalize_tags(current_tools);
        }
        if let Some(priorities) = priorities {
            profile.priorities = priorities;
        }
        profile.updated_at = now;

        Ok(())
    }
}

fn parse_orders(value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| {
        ValidationError::out_of_range(
            "monthly_orders",
            format!("must be within 0..={}, got {value}", u32::MAX),
        )
    })
}

fn parse_priorities(
    raw: BTreeMap<String, i64>,
) -> Result<BTreeMap<CommerceStage, u8>, ValidationError> {
    raw.into_iter()
        .map(|(stage, weight)| -> Result<(CommerceStage, u8), ValidationError> {
            Ok((stage.parse()?, require_rating("priorities", weight)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn registration() -> StoreRegistration {
        StoreRegistration::new("store-1", "Trend Boutique", "fashion", "small")
            .with_metrics(25_000.0, 180, 138.89, 0.022)
            .with_pain_points(["low_conversion", "high_cac"])
            .with_priority("acquisition", 8)
    }

    #[test]
    fn registration_parses_enumerations_and_priorities() {
        let profile = registration().into_profile(Utc::now()).expect("valid registration");

        assert_eq!(profile.id, StoreId::new("store-1"));
        assert_eq!(profile.segment, StoreSegment::Fashion);
        assert_eq!(profile.size, StoreSize::Small);
        assert_eq!(profile.priority_for(CommerceStage::Acquisition), 8);
        assert_eq!(profile.priority_for(CommerceStage::Talent), NEUTRAL_PRIORITY);
        assert_eq!(profile.traffic_sources.get("paid"), Some(&0.6));
    }

    #[test]
    fn registration_rejects_unknown_segment() {
        let mut request = registration();
        request.segment = "luxury".to_string();

        let error = request.into_profile(Utc::now()).expect_err("segment must be validated");
        assert!(matches!(error, ValidationError::UnknownVariant { field: "segment", .. }));
    }

    #[test]
    fn registration_rejects_negative_revenue_instead_of_clamping() {
        let request = registration().with_metrics(-1.0, 10, 10.0, 0.02);

        let error = request.into_profile(Utc::now()).expect_err("negative revenue");
        assert!(matches!(error, ValidationError::OutOfRange { field: "monthly_revenue", .. }));
    }

    #[test]
    fn registration_rejects_out_of_range_priority_and_unknown_stage() {
        let error = registration()
            .with_priority("cart", 11)
            .into_profile(Utc::now())
            .expect_err("priority above ten");
        assert!(matches!(error, ValidationError::OutOfRange { field: "priorities", .. }));

        let error = registration()
            .with_priority("marketing", 4)
            .into_profile(Utc::now())
            .expect_err("unknown stage");
        assert!(matches!(error, ValidationError::UnknownVariant { field: "stage", .. }));
    }

    #[test]
    fn registration_rejects_conversion_rate_above_one() {
        let error = registration()
            .with_metrics(1000.0, 10, 100.0, 1.5)
            .into_profile(Utc::now())
            .expect_err("conversion above one");
        assert!(matches!(error, ValidationError::OutOfRange { field: "conversion_rate", .. }));
    }

    #[test]
    fn registration_defaults_match_onboarding_contract() {
        let request: StoreRegistration = serde_json::from_str(
            r#"{"store_id":"s-9","name":"Minimal","segment":"books","size":"micro"}"#,
        )
        .expect("deserialize minimal registration");

        let profile = request.into_profile(Utc::now()).expect("valid");
        assert_eq!(profile.conversion_rate, 0.02);
        assert_eq!(profile.monthly_revenue, 0.0);
        assert_eq!(profile.traffic_sources.len(), 2);
        assert!(profile.pain_points.is_empty());
    }

    #[test]
    fn update_is_all_or_nothing() {
        let created = Utc::now();
        let mut profile = registration().into_profile(created).expect("valid");
        let before = profile.clone();

        let rejected = StoreUpdate {
            name: Some("Renamed".to_string()),
            size: Some("gigantic".to_string()),
            ..StoreUpdate::default()
        };
        assert!(rejected.apply(&mut profile, created + Duration::seconds(5)).is_err());
        assert_eq!(profile, before);

        let accepted = StoreUpdate {
            monthly_revenue: Some(60_000.0),
            pain_points: Some(vec!["payments".to_string()]),
            priorities: Some(BTreeMap::from([("payment".to_string(), 9)])),
            ..StoreUpdate::default()
        };
        let later = created + Duration::seconds(10);
        accepted.apply(&mut profile, later).expect("valid update");

        assert_eq!(profile.monthly_revenue, 60_000.0);
        assert_eq!(profile.pain_points, vec!["payments".to_string()]);
        assert_eq!(profile.priority_for(CommerceStage::Payment), 9);
        assert_eq!(profile.priority_for(CommerceStage::Acquisition), NEUTRAL_PRIORITY);
        assert_eq!(profile.name, "Trend Boutique");
        assert_eq!(profile.created_at, created);
        assert_eq!(profile.updated_at, later);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(StoreUpdate::default().is_empty());
        assert!(!StoreUpdate { avg_ticket: Some(1.0), ..StoreUpdate::default() }.is_empty());
    }
}
