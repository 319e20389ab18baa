//! Sensitivity of headline metrics to a fixed list of key parameters
//!
//! Each probe re-runs the full engine twice (low and high) with only the
//! probed parameter replaced. The engine is pure, so probes run in parallel.

use crate::numeric::safe_div;
use crate::parameters::{ParameterKey, ParameterVector};
use crate::statements::{FinancialStatements, StatementEngine};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A parameter with the low and high values it is pushed to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityProbe {
    pub parameter: ParameterKey,
    pub low: f64,
    pub high: f64,
}

/// Headline probes reported with every simulation
pub const HEADLINE_PROBES: [SensitivityProbe; 5] = [
    SensitivityProbe { parameter: ParameterKey::MarketDemand, low: 70.0, high: 130.0 },
    SensitivityProbe { parameter: ParameterKey::ProductionCapacity, low: 60.0, high: 100.0 },
    SensitivityProbe { parameter: ParameterKey::CommodityIndex, low: 70.0, high: 140.0 },
    SensitivityProbe { parameter: ParameterKey::InterestRate, low: 2.0, high: 10.0 },
    SensitivityProbe { parameter: ParameterKey::InflationRate, low: 1.0, high: 8.0 },
];

/// Swing in each metric between the low and high runs, as % of the base run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub parameter: ParameterKey,
    pub label: String,
    pub low_value: f64,
    pub base_value: f64,
    pub high_value: f64,
    pub revenue_impact: f64,
    pub net_income_impact: f64,
    pub cash_flow_impact: f64,
}

/// (high - low) / |base| x 100, with a zero base treated as 1
fn impact(low: f64, high: f64, base: f64) -> f64 {
    let denominator = if base == 0.0 { 1.0 } else { base.abs() };
    safe_div(high - low, denominator) * 100.0
}

/// Run the headline probes around `params`; `base` is the engine output for `params`
pub fn analyze(
    engine: &StatementEngine,
    params: &ParameterVector,
    base: &FinancialStatements,
) -> Vec<SensitivityPoint> {
    analyze_probes(engine, params, base, &HEADLINE_PROBES)
}

/// Run an arbitrary list of probes, preserving their order
pub fn analyze_probes(
    engine: &StatementEngine,
    params: &ParameterVector,
    base: &FinancialStatements,
    probes: &[SensitivityProbe],
) -> Vec<SensitivityPoint> {
    probes
        .par_iter()
        .map(|probe| {
            let low = engine.run(&params.clone().with(probe.parameter, probe.low)).statements;
            let high = engine.run(&params.clone().with(probe.parameter, probe.high)).statements;

            let point = SensitivityPoint {
                parameter: probe.parameter,
                label: probe.parameter.label().to_string(),
                low_value: probe.low,
                base_value: params.get(probe.parameter),
                high_value: probe.high,
                revenue_impact: impact(
                    low.income.revenue,
                    high.income.revenue,
                    base.income.revenue,
                ),
                net_income_impact: impact(
                    low.income.net_income,
                    high.income.net_income,
                    base.income.net_income,
                ),
                cash_flow_impact: impact(
                    low.cash_flow.cf_operations,
                    high.cash_flow.cf_operations,
                    base.cash_flow.cf_operations,
                ),
            };
            log::debug!(
                "sensitivity {}: revenue {:.2}% net income {:.2}%",
                probe.parameter.name(),
                point.revenue_impact,
                point.net_income_impact
            );
            point
        })
        .collect()
}
