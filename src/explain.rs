//! Per-line-item explanations rendered from the engine's driver contributions
//!
//! Explanations never re-derive formulas: they read the contributions the
//! engine recorded while computing the same run.

use crate::baseline::Baseline;
use crate::statements::drivers::{significant, DriverContribution};
use crate::statements::{EngineNumbers, TAX_RATE};
use serde::{Deserialize, Serialize};

/// Contributions smaller than this (0.05%) are not worth mentioning
const SIGNIFICANCE_THRESHOLD: f64 = 0.0005;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemExplanation {
    pub line_item: String,
    pub value: f64,
    pub baseline: f64,
    pub change: f64,
    pub drivers: Vec<String>,
}

impl LineItemExplanation {
    fn new(line_item: &str, value: f64, baseline: f64, drivers: Vec<String>) -> Self {
        Self {
            line_item: line_item.to_string(),
            value,
            baseline,
            change: value - baseline,
            drivers,
        }
    }
}

fn describe(drivers: &[DriverContribution], subject: &str) -> Vec<String> {
    significant(drivers, SIGNIFICANCE_THRESHOLD)
        .iter()
        .map(|d| {
            format!(
                "{}: {:+.2}% of baseline {}",
                d.parameter.label(),
                d.contribution * 100.0,
                subject
            )
        })
        .collect()
}

/// Explanations for the headline line items of one run
pub fn explain(numbers: &EngineNumbers, baseline: &Baseline) -> Vec<LineItemExplanation> {
    let income = &numbers.statements.income;
    let balance = &numbers.statements.balance;
    let cash_flow = &numbers.statements.cash_flow;
    let drivers = &numbers.drivers;

    let mut cogs_drivers = describe(&drivers.cost_of_goods, "cost");
    cogs_drivers.insert(0, format!("Cost multiplier {:.4}", numbers.cost_multiplier));

    let mut interest_drivers = vec![format!(
        "Effective borrowing rate {:.2}% (baseline {:.2}%)",
        numbers.effective_rate * 100.0,
        baseline.effective_rate() * 100.0
    )];
    interest_drivers.extend(describe(&drivers.interest, "interest"));

    vec![
        LineItemExplanation::new(
            "Revenue",
            income.revenue,
            baseline.income.revenue,
            describe(&drivers.revenue, "revenue"),
        ),
        LineItemExplanation::new("COGS", income.cogs, baseline.income.cogs, cogs_drivers),
        LineItemExplanation::new(
            "SG&A",
            income.sga,
            baseline.income.sga,
            describe(&drivers.sga, "SG&A"),
        ),
        LineItemExplanation::new(
            "D&A",
            income.depreciation_amortization,
            baseline.income.depreciation_amortization,
            describe(&drivers.depreciation, "D&A"),
        ),
        LineItemExplanation::new(
            "Interest Expense",
            income.interest_expense,
            baseline.income.interest_expense,
            interest_drivers,
        ),
        LineItemExplanation::new(
            "Tax",
            income.tax,
            baseline.income.tax,
            vec![if income.ebt > 0.0 {
                format!("{:.0}% of EBT {:.0}", TAX_RATE * 100.0, income.ebt)
            } else {
                "No tax on a pre-tax loss".to_string()
            }],
        ),
        LineItemExplanation::new(
            "Cash",
            balance.cash,
            baseline.balance.cash,
            vec!["Balancing residual: liabilities plus equity less all other assets".to_string()],
        ),
        LineItemExplanation::new(
            "Operating Cash Flow",
            cash_flow.cf_operations,
            baseline.cash_flow.cf_operations,
            vec![format!(
                "Net cash change {:.0} less investing {:.0} and financing {:.0}; \
                 working capital {:.0}",
                cash_flow.net_cash_change,
                cash_flow.cf_investing,
                cash_flow.cf_financing,
                cash_flow.working_capital_changes
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterKey;
    use crate::statements::StatementEngine;

    #[test]
    fn test_baseline_has_no_driver_lines() {
        let engine = StatementEngine::default();
        let numbers = engine.run(&engine.baseline().parameters);
        let explanations = explain(&numbers, engine.baseline());

        assert_eq!(explanations.len(), 8);
        assert!(explanations.iter().all(|e| e.change == 0.0));
        assert!(explanations[0].drivers.is_empty());
    }

    #[test]
    fn test_revenue_explanation_names_largest_driver_first() {
        let engine = StatementEngine::default();
        let params = engine
            .baseline()
            .parameters
            .clone()
            .with(ParameterKey::MarketDemand, 120.0)
            .with(ParameterKey::Pmi, 53.0);
        let numbers = engine.run(&params);
        let explanations = explain(&numbers, engine.baseline());

        let revenue = &explanations[0];
        assert_eq!(revenue.line_item, "Revenue");
        assert_eq!(revenue.drivers.len(), 2);
        assert_eq!(revenue.drivers[0], "Market Demand: +11.00% of baseline revenue");
        assert!(revenue.drivers[1].starts_with("PMI"));
    }

    #[test]
    fn test_inverted_curve_names_bond_yield_spread() {
        let engine = StatementEngine::default();
        let params = engine
            .baseline()
            .parameters
            .clone()
            .with(ParameterKey::BondYieldSpread, -0.5);
        let explanations = explain(&engine.run(&params), engine.baseline());

        let interest = &explanations[4];
        assert_eq!(interest.line_item, "Interest Expense");
        assert_eq!(interest.change, 100_000.0);
        assert_eq!(interest.drivers.len(), 2);
        assert_eq!(interest.drivers[0], "Effective borrowing rate 6.00% (baseline 6.00%)");
        assert_eq!(interest.drivers[1], "Bond Yield Spread: +23.81% of baseline interest");
    }

    #[test]
    fn test_rate_moves_are_attributed() {
        let engine = StatementEngine::default();
        let params = engine
            .baseline()
            .parameters
            .clone()
            .with(ParameterKey::InterestRate, 7.0)
            .with(ParameterKey::CreditSpread, 1.0);
        let explanations = explain(&engine.run(&params), engine.baseline());

        let interest = &explanations[4];
        assert!(interest.drivers[1..].iter().any(|d| d.starts_with("Interest Rate: +")));
        assert!(interest.drivers[1..].iter().any(|d| d.starts_with("Credit Spread: ")));
    }

    #[test]
    fn test_excess_capex_explains_depreciation() {
        let engine = StatementEngine::default();
        let base_growth = engine.baseline().parameters.growth_capex;
        let params = engine
            .baseline()
            .parameters
            .clone()
            .with(ParameterKey::GrowthCapex, base_growth + 1_000_000.0);
        let explanations = explain(&engine.run(&params), engine.baseline());

        let da = &explanations[3];
        assert_eq!(da.line_item, "D&A");
        assert_eq!(da.change, 100_000.0);
        assert_eq!(da.drivers.len(), 1);
        assert!(da.drivers[0].starts_with("Growth Capex: +"));
    }
}
