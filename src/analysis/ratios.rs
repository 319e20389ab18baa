//! Financial ratios derived from a set of statements

use crate::numeric::safe_div;
use crate::parameters::ParameterVector;
use crate::statements::FinancialStatements;
use serde::{Deserialize, Serialize};

/// Standard ratios; margins and returns are fractions (0.12 = 12%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatios {
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_margin: f64,
    pub return_on_equity: f64,
    pub return_on_assets: f64,
    pub current_ratio: f64,
    /// (short-term + long-term debt) / total equity
    pub debt_to_equity: f64,
    /// EBIT / interest expense
    pub interest_coverage: f64,
    pub asset_turnover: f64,
    /// AR days + inventory days - AP days
    pub cash_conversion_cycle: f64,
}

/// How a ratio is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioUnit {
    Percent,
    Times,
    Days,
}

impl FinancialRatios {
    pub fn compute(statements: &FinancialStatements, params: &ParameterVector) -> Self {
        let income = &statements.income;
        let balance = &statements.balance;

        Self {
            gross_margin: safe_div(income.gross_profit, income.revenue),
            operating_margin: safe_div(income.ebit, income.revenue),
            net_margin: safe_div(income.net_income, income.revenue),
            return_on_equity: safe_div(income.net_income, balance.total_equity),
            return_on_assets: safe_div(income.net_income, balance.total_assets),
            current_ratio: safe_div(
                balance.total_current_assets,
                balance.total_current_liabilities,
            ),
            debt_to_equity: safe_div(balance.total_debt(), balance.total_equity),
            interest_coverage: safe_div(income.ebit, income.interest_expense),
            asset_turnover: safe_div(income.revenue, balance.total_assets),
            cash_conversion_cycle: params.ar_days + params.inventory_days - params.ap_days,
        }
    }

    /// (label, unit, value) for every ratio, in display order
    pub fn rows(&self) -> [(&'static str, RatioUnit, f64); 10] {
        [
            ("Gross Margin", RatioUnit::Percent, self.gross_margin),
            ("Operating Margin", RatioUnit::Percent, self.operating_margin),
            ("Net Margin", RatioUnit::Percent, self.net_margin),
            ("Return on Equity", RatioUnit::Percent, self.return_on_equity),
            ("Return on Assets", RatioUnit::Percent, self.return_on_assets),
            ("Current Ratio", RatioUnit::Times, self.current_ratio),
            ("Debt to Equity", RatioUnit::Times, self.debt_to_equity),
            ("Interest Coverage", RatioUnit::Times, self.interest_coverage),
            ("Asset Turnover", RatioUnit::Times, self.asset_turnover),
            ("Cash Conversion Cycle", RatioUnit::Days, self.cash_conversion_cycle),
        ]
    }
}

/// One ratio before and after the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioComparison {
    pub name: String,
    pub unit: RatioUnit,
    pub original: f64,
    pub simulated: f64,
}

/// Pair up original and simulated ratios row by row
pub fn compare(original: &FinancialRatios, simulated: &FinancialRatios) -> Vec<RatioComparison> {
    original
        .rows()
        .iter()
        .zip(simulated.rows().iter())
        .map(|(&(name, unit, before), &(_, _, after))| RatioComparison {
            name: name.to_string(),
            unit,
            original: before,
            simulated: after,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::Baseline;
    use approx::assert_relative_eq;

    #[test]
    fn test_baseline_ratios() {
        let baseline = Baseline::reference();
        let ratios = FinancialRatios::compute(&baseline.statements(), &baseline.parameters);

        assert_relative_eq!(ratios.gross_margin, 0.40, epsilon = 1e-12);
        assert_relative_eq!(ratios.net_margin, 2_480_000.0 / 22_500_000.0, epsilon = 1e-12);
        assert_relative_eq!(ratios.return_on_assets, 0.08, epsilon = 1e-12);
        assert_relative_eq!(ratios.debt_to_equity, 7_000_000.0 / 21_050_548.0, epsilon = 1e-12);
        assert_relative_eq!(ratios.interest_coverage, 3_319_487.0 / 420_000.0, epsilon = 1e-12);
        assert_relative_eq!(ratios.current_ratio, 11_500_000.0 / 3_829_452.0, epsilon = 1e-12);
        assert_eq!(ratios.cash_conversion_cycle, 65.0);
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        let baseline = Baseline::reference();
        let mut statements = baseline.statements();
        statements.income.revenue = 0.0;
        statements.income.interest_expense = 0.0;

        let ratios = FinancialRatios::compute(&statements, &baseline.parameters);
        assert_eq!(ratios.gross_margin, 0.0);
        assert_eq!(ratios.net_margin, 0.0);
        assert_eq!(ratios.interest_coverage, 0.0);
    }

    #[test]
    fn test_compare_pairs_rows() {
        let baseline = Baseline::reference();
        let original = FinancialRatios::compute(&baseline.statements(), &baseline.parameters);
        let mut simulated = original.clone();
        simulated.current_ratio = 1.5;

        let rows = compare(&original, &simulated);
        assert_eq!(rows.len(), 10);
        let current = rows.iter().find(|r| r.name == "Current Ratio").unwrap();
        assert_eq!(current.unit, RatioUnit::Times);
        assert_eq!(current.simulated, 1.5);
        assert_eq!(current.original, original.current_ratio);
    }
}
