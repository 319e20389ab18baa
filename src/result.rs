//! Simulation result types

use crate::analysis::{
    FinancialRatios, HealthFactor, RatioComparison, RiskLevel, SensitivityPoint, WaterfallEntry,
};
use crate::commentary::Narrative;
use crate::explain::LineItemExplanation;
use crate::numeric::percent_change;
use crate::parameters::ParameterVector;
use crate::statements::FinancialStatements;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One headline metric before and after the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    pub name: String,
    pub original: f64,
    pub simulated: f64,
    pub change: f64,
    pub change_pct: f64,
}

impl MetricComparison {
    pub fn new(name: &str, original: f64, simulated: f64) -> Self {
        Self {
            name: name.to_string(),
            original,
            simulated,
            change: simulated - original,
            change_pct: percent_change(simulated, original),
        }
    }
}

/// Key metric comparisons in display order
pub fn key_metrics(
    original: &FinancialStatements,
    simulated: &FinancialStatements,
) -> Vec<MetricComparison> {
    let pairs = [
        ("Revenue", original.income.revenue, simulated.income.revenue),
        ("Gross Profit", original.income.gross_profit, simulated.income.gross_profit),
        ("EBIT", original.income.ebit, simulated.income.ebit),
        ("Net Income", original.income.net_income, simulated.income.net_income),
        (
            "Operating Cash Flow",
            original.cash_flow.cf_operations,
            simulated.cash_flow.cf_operations,
        ),
        ("Cash", original.balance.cash, simulated.balance.cash),
        ("Total Assets", original.balance.total_assets, simulated.balance.total_assets),
        ("Total Equity", original.balance.total_equity, simulated.balance.total_equity),
    ];
    pairs
        .iter()
        .map(|&(name, before, after)| MetricComparison::new(name, before, after))
        .collect()
}

/// Macro and financial-market inputs echoed back with the result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicTrends {
    pub inflation_rate: f64,
    pub interest_rate: f64,
    pub unemployment_rate: f64,
    pub gdp_growth: f64,
    pub consumer_confidence: f64,
    pub pmi: f64,
    pub forex_rate: f64,
    pub bond_yield_spread: f64,
    pub credit_spread: f64,
}

impl From<&ParameterVector> for EconomicTrends {
    fn from(p: &ParameterVector) -> Self {
        Self {
            inflation_rate: p.inflation_rate,
            interest_rate: p.interest_rate,
            unemployment_rate: p.unemployment_rate,
            gdp_growth: p.gdp_growth,
            consumer_confidence: p.consumer_confidence,
            pmi: p.pmi,
            forex_rate: p.forex_rate,
            bond_yield_spread: p.bond_yield_spread,
            credit_spread: p.credit_spread,
        }
    }
}

/// Everything produced by one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub generated_at: DateTime<Utc>,
    pub parameter_summary: String,
    pub parameters: ParameterVector,
    pub original: FinancialStatements,
    pub simulated: FinancialStatements,
    pub key_metrics: Vec<MetricComparison>,
    pub economic_trends: EconomicTrends,
    /// Simulated ratios as computed; `ratios` holds the display rows
    pub financial_ratios: FinancialRatios,
    pub ratios: Vec<RatioComparison>,
    pub waterfall: Vec<WaterfallEntry>,
    pub sensitivity: Vec<SensitivityPoint>,
    pub health_score: u8,
    pub risk_level: RiskLevel,
    pub health_factors: Vec<HealthFactor>,
    pub explanations: Vec<LineItemExplanation>,
    pub narrative: Narrative,
}

impl SimulationResult {
    pub fn metric(&self, name: &str) -> Option<&MetricComparison> {
        self.key_metrics.iter().find(|m| m.name == name)
    }
}
