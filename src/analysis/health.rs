//! Composite health score and risk tier
//!
//! The score starts at 50 and moves by fixed points per category. Thresholds
//! and point values are policy constants.

use super::ratios::FinancialRatios;
use crate::numeric::safe_div;
use crate::statements::FinancialStatements;
use serde::{Deserialize, Serialize};

const STARTING_SCORE: i32 = 50;

/// Qualitative risk tier derived from the health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Threshold ladder: >=72 low, >=52 medium, >=32 high, else critical
    pub fn from_score(score: u8) -> Self {
        match score {
            72..=u8::MAX => RiskLevel::Low,
            52..=71 => RiskLevel::Medium,
            32..=51 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Category checked by the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HealthCategory {
    Margins,
    ReturnOnEquity,
    Liquidity,
    Leverage,
    RevenueGrowth,
    OperatingCashFlow,
    NetIncomeTrend,
}

/// Points awarded (or deducted) for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthFactor {
    pub category: HealthCategory,
    pub points: i32,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub score: u8,
    pub risk_level: RiskLevel,
    pub factors: Vec<HealthFactor>,
}

/// Score the simulated statements against the original ones
pub fn assess(
    ratios: &FinancialRatios,
    simulated: &FinancialStatements,
    original: &FinancialStatements,
) -> HealthAssessment {
    let factors = vec![
        margins(ratios),
        return_on_equity(ratios),
        liquidity(ratios),
        leverage(ratios, simulated),
        revenue_growth(simulated, original),
        operating_cash_flow(simulated),
        net_income_trend(simulated, original),
    ];

    let raw = STARTING_SCORE + factors.iter().map(|f| f.points).sum::<i32>();
    let score = raw.clamp(0, 100) as u8;

    HealthAssessment {
        score,
        risk_level: RiskLevel::from_score(score),
        factors,
    }
}

fn factor(category: HealthCategory, points: i32, detail: String) -> HealthFactor {
    HealthFactor { category, points, detail }
}

fn margins(ratios: &FinancialRatios) -> HealthFactor {
    let net = ratios.net_margin;
    let points = if net >= 0.10 && ratios.gross_margin >= 0.30 {
        10
    } else if net >= 0.05 {
        5
    } else if net < 0.0 {
        -10
    } else {
        0
    };
    factor(
        HealthCategory::Margins,
        points,
        format!("net margin {:.1}%, gross margin {:.1}%", net * 100.0, ratios.gross_margin * 100.0),
    )
}

fn return_on_equity(ratios: &FinancialRatios) -> HealthFactor {
    let roe = ratios.return_on_equity;
    let points = if roe >= 0.15 {
        10
    } else if roe >= 0.08 {
        5
    } else if roe < 0.0 {
        -10
    } else {
        0
    };
    factor(HealthCategory::ReturnOnEquity, points, format!("ROE {:.1}%", roe * 100.0))
}

fn liquidity(ratios: &FinancialRatios) -> HealthFactor {
    let current = ratios.current_ratio;
    let points = if current >= 2.0 {
        10
    } else if current >= 1.2 {
        5
    } else if current < 1.0 {
        -10
    } else {
        0
    };
    factor(HealthCategory::Liquidity, points, format!("current ratio {:.2}x", current))
}

fn leverage(ratios: &FinancialRatios, simulated: &FinancialStatements) -> HealthFactor {
    // Negative equity is treated as maximal leverage
    let debt_to_equity = if simulated.balance.total_equity <= 0.0 {
        f64::INFINITY
    } else {
        ratios.debt_to_equity
    };
    // Zero interest expense cannot fail a coverage test
    let debt_free = simulated.income.interest_expense <= 0.0;
    let covered = |times: f64| debt_free || ratios.interest_coverage >= times;

    let points = if debt_to_equity <= 0.5 && covered(5.0) {
        10
    } else if debt_to_equity <= 1.0 && covered(3.0) {
        5
    } else if debt_to_equity > 2.0 || !covered(1.5) {
        -10
    } else {
        0
    };
    factor(
        HealthCategory::Leverage,
        points,
        format!(
            "debt/equity {:.2}x, interest coverage {:.1}x",
            ratios.debt_to_equity, ratios.interest_coverage
        ),
    )
}

fn revenue_growth(simulated: &FinancialStatements, original: &FinancialStatements) -> HealthFactor {
    let growth = safe_div(
        simulated.income.revenue - original.income.revenue,
        original.income.revenue,
    );
    let points = if growth >= 0.05 {
        5
    } else if growth <= -0.10 {
        -10
    } else if growth < 0.0 {
        -5
    } else {
        0
    };
    factor(HealthCategory::RevenueGrowth, points, format!("revenue growth {:+.1}%", growth * 100.0))
}

fn operating_cash_flow(simulated: &FinancialStatements) -> HealthFactor {
    let cfo = simulated.cash_flow.cf_operations;
    let points = if cfo > 0.0 { 5 } else { -10 };
    factor(HealthCategory::OperatingCashFlow, points, format!("operating cash flow {:.0}", cfo))
}

fn net_income_trend(
    simulated: &FinancialStatements,
    original: &FinancialStatements,
) -> HealthFactor {
    let net_income = simulated.income.net_income;
    let change = safe_div(
        net_income - original.income.net_income,
        original.income.net_income.abs(),
    );
    let points = if net_income < 0.0 {
        -10
    } else if change >= 0.05 {
        5
    } else if change < -0.10 {
        -5
    } else {
        0
    };
    factor(
        HealthCategory::NetIncomeTrend,
        points,
        format!("net income change {:+.1}%", change * 100.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::Baseline;
    use crate::parameters::ParameterKey;
    use crate::statements::StatementEngine;

    fn assess_params(engine: &StatementEngine, key: ParameterKey, value: f64) -> HealthAssessment {
        let baseline = engine.baseline();
        let params = baseline.parameters.clone().with(key, value);
        let statements = engine.run(&params).statements;
        let ratios = FinancialRatios::compute(&statements, &params);
        assess(&ratios, &statements, &baseline.statements())
    }

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(72), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(71), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(52), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(51), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(32), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(31), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Critical);
    }

    #[test]
    fn test_baseline_score() {
        let baseline = Baseline::reference();
        let statements = baseline.statements();
        let ratios = FinancialRatios::compute(&statements, &baseline.parameters);
        let health = assess(&ratios, &statements, &statements);

        assert_eq!(health.factors.len(), 7);
        assert_eq!(health.score, 90);
        assert_eq!(health.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_score_bounded_for_extreme_inputs() {
        let engine = StatementEngine::default();
        for &key in ParameterKey::ALL {
            let base = engine.baseline().parameters.get(key);
            for value in [0.0, -base, base * 3.0, 1e6, -1e6] {
                let health = assess_params(&engine, key, value);
                assert!(health.score <= 100, "{} = {}", key.name(), value);
                assert_eq!(health.risk_level, RiskLevel::from_score(health.score));
            }
        }
    }

    #[test]
    fn test_collapse_scores_critical() {
        let engine = StatementEngine::default();
        let health = assess_params(&engine, ParameterKey::MarketDemand, 20.0);

        let penalised = health.factors.iter().filter(|f| f.points == -10).count();
        assert!(penalised >= 6, "{:?}", health.factors);
        assert_eq!(health.score, 0);
        assert_eq!(health.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_zero_interest_counts_as_covered() {
        let baseline = Baseline::reference();
        let mut statements = baseline.statements();
        statements.income.interest_expense = 0.0;
        let ratios = FinancialRatios::compute(&statements, &baseline.parameters);

        let leverage = leverage(&ratios, &statements);
        assert_eq!(leverage.points, 10);
    }
}
