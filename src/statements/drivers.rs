//! Named driver contributions recorded by the engine
//!
//! These are the single source of truth for "why did this line move":
//! explanations read them instead of re-deriving the formulas.

use crate::parameters::ParameterKey;
use serde::{Deserialize, Serialize};

/// Fractional effect of one parameter on one line item's multiplier
///
/// A contribution of 0.02 on revenue means the parameter alone moved
/// revenue by 2% of its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverContribution {
    pub parameter: ParameterKey,
    pub contribution: f64,
}

impl DriverContribution {
    pub fn new(parameter: ParameterKey, contribution: f64) -> Self {
        Self { parameter, contribution }
    }
}

/// Driver contributions per engine stage, each a fraction of that line's baseline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverBreakdown {
    pub revenue: Vec<DriverContribution>,
    pub cost_of_goods: Vec<DriverContribution>,
    pub sga: Vec<DriverContribution>,
    pub depreciation: Vec<DriverContribution>,
    /// Rate moves and the yield-curve inversion penalty
    pub interest: Vec<DriverContribution>,
}

/// Sum of contributions
pub fn total(drivers: &[DriverContribution]) -> f64 {
    drivers.iter().map(|d| d.contribution).sum()
}

/// Contributions at least `threshold` in magnitude, largest first
pub fn significant(drivers: &[DriverContribution], threshold: f64) -> Vec<DriverContribution> {
    let mut selected: Vec<_> = drivers
        .iter()
        .copied()
        .filter(|d| d.contribution.abs() >= threshold)
        .collect();
    selected.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significant_orders_by_magnitude() {
        let drivers = [
            DriverContribution::new(ParameterKey::MarketDemand, 0.05),
            DriverContribution::new(ParameterKey::Discount, -0.06),
            DriverContribution::new(ParameterKey::Pmi, 0.0001),
        ];
        let selected = significant(&drivers, 0.0005);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].parameter, ParameterKey::Discount);
        assert_eq!(selected[1].parameter, ParameterKey::MarketDemand);
        assert!((total(&drivers) - (-0.0099)).abs() < 1e-12);
    }
}
