//! Analyses layered on top of the statement engine

pub mod health;
pub mod ratios;
pub mod sensitivity;
pub mod waterfall;

pub use health::{assess, HealthAssessment, HealthCategory, HealthFactor, RiskLevel};
pub use ratios::{FinancialRatios, RatioComparison, RatioUnit};
pub use sensitivity::{SensitivityPoint, SensitivityProbe, HEADLINE_PROBES};
pub use waterfall::{WaterfallEntry, WaterfallKind};
