pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod maturity;
pub mod recommendations;
pub mod scoring;

pub use catalog::{PartnerCatalog, StoreCatalog};
pub use domain::partner::{Partner, PartnerId, PartnerRegistration};
pub use domain::store::{StoreId, StoreProfile, StoreRegistration, StoreUpdate};
pub use domain::taxonomy::{CommerceStage, PricingModel, StoreSegment, StoreSize};
pub use errors::{ApplicationError, DomainError, InterfaceError, ValidationError};
pub use maturity::{
    FixedJitter, GapRecord, GapSeverity, JitterSource, MaturityAnalyzer, MaturityProfile,
    RngJitter,
};
pub use recommendations::{
    EcosystemDashboard, EngineSettings, FocusAreaRecommendations, MarketImpact, OnboardingReport,
    RecommendationEngine, RecommendationQuery, StoreAnalysis,
};
pub use scoring::{
    CompatibilityScore, FinalRecommendation, PriorityTier, ProfitabilityScore,
};
