//! Statement engine: parameter vector -> one consistent set of restated statements
//!
//! Stages run in accounting order (revenue, cost of goods, operating expenses,
//! below the line, balance sheet, cash flow). Each line item is rounded to a
//! whole currency unit at the point it is computed. Two lines are solved as
//! residuals so the identities hold by construction:
//! - cash closes the balance sheet
//! - operating cash flow closes the cash flow statement, with working capital
//!   changes back-solved from it
//!
//! The identities are exact while every line stays within
//! [`MAX_EXACT_CURRENCY`]; runs beyond it are logged.

use super::drivers::{self, DriverBreakdown, DriverContribution};
use super::types::{BalanceSheet, CashFlowStatement, FinancialStatements, IncomeStatement};
use crate::baseline::Baseline;
use crate::numeric::{
    fractional_deviation, point_deviation, round_currency, safe_div, MAX_EXACT_CURRENCY,
};
use crate::parameters::{ParameterKey, ParameterVector};
use serde::{Deserialize, Serialize};

/// Revenue elasticities applied to each parameter's fractional deviation
pub const REVENUE_ELASTICITIES: &[(ParameterKey, f64)] = &[
    (ParameterKey::MarketDemand, 0.55),
    (ParameterKey::ProductionCapacity, 0.35),
    (ParameterKey::PricingIndex, 0.60),
    (ParameterKey::CompetitionIndex, -0.25),
    (ParameterKey::ConsumerSentiment, 0.15),
    (ParameterKey::ConsumerConfidence, 0.10),
    (ParameterKey::GdpGrowth, 0.04),
    (ParameterKey::Pmi, 0.20),
    (ParameterKey::InflationRate, -0.03),
    (ParameterKey::InterestRate, -0.04),
    // Export exposure: a weaker home currency sells more abroad
    (ParameterKey::ForexRate, 0.08),
    (ParameterKey::SupplyDisruption, -0.08),
    (ParameterKey::SupplierLeadTime, -0.02),
];

/// Revenue lost per percentage point of extra discount
pub const DISCOUNT_ELASTICITY: f64 = 0.006;
/// Revenue lost per point of churn (absolute)
pub const CHURN_WEIGHT: f64 = 1.0;
/// Revenue lost per point of unemployment (absolute)
pub const UNEMPLOYMENT_WEIGHT: f64 = 0.8;

/// Drivers that change price but not volume; excluded from the COGS volume ratio
const PRICE_ONLY_DRIVERS: &[ParameterKey] = &[ParameterKey::Discount, ParameterKey::PricingIndex];

/// Share of COGS that scales with volume
pub const VARIABLE_COGS_SHARE: f64 = 0.70;
/// Share of COGS that only follows cost drivers
pub const SEMI_FIXED_COGS_SHARE: f64 = 0.30;
/// Materials / labor / overhead split used when the mix parameters sum to zero
pub const FALLBACK_COST_MIX: (f64, f64, f64) = (0.40, 0.30, 0.30);

const FREIGHT_COST_WEIGHT: f64 = 0.08;
const HEADCOUNT_COST_WEIGHT: f64 = 0.5;
const DISRUPTION_COST_WEIGHT: f64 = 0.10;
const INFLATION_COST_WEIGHT: f64 = 0.50;
const LEAD_TIME_COST_WEIGHT: f64 = 0.03;
// Faster turns mean less waste and obsolescence
const TURNOVER_COST_WEIGHT: f64 = -0.02;

/// SG&A "people" share, driven by salary inflation
pub const SGA_SALARY_WEIGHT: f64 = 0.55;
pub const SGA_HEADCOUNT_WEIGHT: f64 = 0.45;
/// General inflation on the non-people share of SG&A
pub const SGA_INFLATION_WEIGHT: f64 = 0.12;

/// Incremental capex depreciates over ten years
pub const INCREMENTAL_DEPRECIATION_RATE: f64 = 0.10;
/// Interest penalty per point of yield-curve inversion relative to baseline
pub const INVERSION_PENALTY_PER_POINT: f64 = 50_000.0;
pub const TAX_RATE: f64 = 0.22;
/// Growth investment above baseline is half debt-financed
pub const GROWTH_CAPEX_DEBT_SHARE: f64 = 0.50;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Full numeric state of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineNumbers {
    pub statements: FinancialStatements,
    pub drivers: DriverBreakdown,
    /// Multiplier applied to baseline COGS by the cost drivers
    pub cost_multiplier: f64,
    /// Effective borrowing rate used for interest expense
    pub effective_rate: f64,
}

/// Intermediate result of the revenue stage
struct RevenueStage {
    revenue: f64,
    volume_ratio: f64,
    drivers: Vec<DriverContribution>,
}

/// Intermediate result of the operating expense and below-the-line stages
struct IncomeStage {
    income: IncomeStatement,
    effective_rate: f64,
    depreciation_drivers: Vec<DriverContribution>,
    interest_drivers: Vec<DriverContribution>,
}

/// Pure statement engine over an immutable baseline
#[derive(Debug, Clone)]
pub struct StatementEngine {
    baseline: Baseline,
}

impl StatementEngine {
    pub fn new(baseline: Baseline) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Compute restated statements for one parameter vector
    pub fn run(&self, params: &ParameterVector) -> EngineNumbers {
        let revenue = self.revenue_stage(params);
        let (cogs, cost_multiplier, cost_drivers) = self.cogs_stage(params, revenue.volume_ratio);
        let (sga, sga_drivers) = self.sga_stage(params);
        let stage = self.income_statement(params, revenue.revenue, cogs, sga);
        let income = stage.income;
        let balance = self.balance_sheet(params, &income);
        let cash_flow = self.cash_flow(params, &income, &balance);

        log::debug!(
            "statement run: revenue={} net_income={} cash={} cfo={}",
            income.revenue,
            income.net_income,
            balance.cash,
            cash_flow.cf_operations
        );

        let statements = FinancialStatements {
            income,
            balance,
            cash_flow,
        };
        if !statements.within_exact_range() {
            log::warn!(
                "line items exceed {:e}; balance and cash flow identities may not hold exactly",
                MAX_EXACT_CURRENCY
            );
        }

        EngineNumbers {
            statements,
            drivers: DriverBreakdown {
                revenue: revenue.drivers,
                cost_of_goods: cost_drivers,
                sga: sga_drivers,
                depreciation: stage.depreciation_drivers,
                interest: stage.interest_drivers,
            },
            cost_multiplier,
            effective_rate: stage.effective_rate,
        }
    }

    /// Revenue = base x (1 + sum of driver contributions) + new product revenue
    fn revenue_stage(&self, p: &ParameterVector) -> RevenueStage {
        let b = &self.baseline.parameters;
        let base_revenue = self.baseline.income.revenue;

        let mut contributions: Vec<DriverContribution> = REVENUE_ELASTICITIES
            .iter()
            .map(|&(key, weight)| {
                let deviation = fractional_deviation(p.get(key), b.get(key));
                DriverContribution::new(key, deviation * weight)
            })
            .collect();

        contributions.push(DriverContribution::new(
            ParameterKey::Discount,
            -(p.discount - b.discount) * DISCOUNT_ELASTICITY,
        ));
        contributions.push(DriverContribution::new(
            ParameterKey::CustomerChurn,
            -point_deviation(p.customer_churn, b.customer_churn) * CHURN_WEIGHT,
        ));
        contributions.push(DriverContribution::new(
            ParameterKey::UnemploymentRate,
            -point_deviation(p.unemployment_rate, b.unemployment_rate) * UNEMPLOYMENT_WEIGHT,
        ));
        contributions.push(DriverContribution::new(
            ParameterKey::CyberDowntimeDays,
            -p.cyber_downtime_days / DAYS_PER_YEAR,
        ));
        contributions.push(DriverContribution::new(
            ParameterKey::RevenueShock,
            p.revenue_shock / 100.0,
        ));

        let revenue_delta = drivers::total(&contributions);
        let price_delta: f64 = contributions
            .iter()
            .filter(|d| PRICE_ONLY_DRIVERS.contains(&d.parameter))
            .map(|d| d.contribution)
            .sum();

        // Additive, not scaled by the demand environment
        let new_product = base_revenue * p.new_product_impact / 100.0;
        contributions.push(DriverContribution::new(
            ParameterKey::NewProductImpact,
            safe_div(new_product, base_revenue),
        ));

        let revenue =
            round_currency((base_revenue * (1.0 + revenue_delta) + new_product).max(0.0));
        let volume_revenue =
            (base_revenue * (1.0 + revenue_delta - price_delta) + new_product).max(0.0);

        RevenueStage {
            revenue,
            volume_ratio: safe_div(volume_revenue, base_revenue),
            drivers: contributions,
        }
    }

    /// Materials, labor and overhead shares normalised to sum to one
    fn cost_mix(&self, p: &ParameterVector) -> (f64, f64, f64) {
        let total = p.cogs_materials_pct + p.cogs_labor_pct + p.cogs_overhead_pct;
        if total == 0.0 {
            return FALLBACK_COST_MIX;
        }
        (
            p.cogs_materials_pct / total,
            p.cogs_labor_pct / total,
            p.cogs_overhead_pct / total,
        )
    }

    /// COGS: variable part follows volume, every part follows the cost multiplier
    fn cogs_stage(
        &self,
        p: &ParameterVector,
        volume_ratio: f64,
    ) -> (f64, f64, Vec<DriverContribution>) {
        let b = &self.baseline.parameters;
        let (materials, labor, _overhead) = self.cost_mix(p);
        let frac = |key: ParameterKey, weight: f64| {
            DriverContribution::new(key, fractional_deviation(p.get(key), b.get(key)) * weight)
        };
        let points = |key: ParameterKey, weight: f64| {
            DriverContribution::new(key, point_deviation(p.get(key), b.get(key)) * weight)
        };

        let contributions = vec![
            frac(ParameterKey::CommodityIndex, materials),
            frac(ParameterKey::FreightRates, FREIGHT_COST_WEIGHT),
            points(ParameterKey::SalaryInflation, labor),
            points(ParameterKey::HeadcountChange, labor * HEADCOUNT_COST_WEIGHT),
            frac(ParameterKey::SupplyDisruption, DISRUPTION_COST_WEIGHT),
            points(ParameterKey::InflationRate, INFLATION_COST_WEIGHT),
            frac(ParameterKey::SupplierLeadTime, LEAD_TIME_COST_WEIGHT),
            frac(ParameterKey::InventoryTurnover, TURNOVER_COST_WEIGHT),
        ];

        let cost_multiplier = 1.0 + drivers::total(&contributions);
        let volume_factor = VARIABLE_COGS_SHARE * volume_ratio + SEMI_FIXED_COGS_SHARE;
        let cogs = round_currency(self.baseline.income.cogs * volume_factor * cost_multiplier);

        (cogs, cost_multiplier, contributions)
    }

    /// SG&A: people costs, general inflation, plus any ESG penalty
    fn sga_stage(&self, p: &ParameterVector) -> (f64, Vec<DriverContribution>) {
        let b = &self.baseline.parameters;
        let base_sga = self.baseline.income.sga;

        let mut contributions = vec![
            DriverContribution::new(
                ParameterKey::SalaryInflation,
                point_deviation(p.salary_inflation, b.salary_inflation) * SGA_SALARY_WEIGHT,
            ),
            DriverContribution::new(
                ParameterKey::HeadcountChange,
                point_deviation(p.headcount_change, b.headcount_change) * SGA_HEADCOUNT_WEIGHT,
            ),
            DriverContribution::new(
                ParameterKey::InflationRate,
                point_deviation(p.inflation_rate, b.inflation_rate) * SGA_INFLATION_WEIGHT,
            ),
        ];
        let multiplier = 1.0 + drivers::total(&contributions);
        contributions.push(DriverContribution::new(
            ParameterKey::EsgPenalty,
            safe_div(p.esg_penalty, base_sga),
        ));

        (round_currency(base_sga * multiplier + p.esg_penalty), contributions)
    }

    /// D&A: the depreciation parameter plus a slice of capex above baseline
    ///
    /// Contributions are fractions of baseline D&A. Excess capex is split
    /// between the two capex fields by how far each moved.
    fn depreciation_stage(&self, p: &ParameterVector) -> (f64, Vec<DriverContribution>) {
        let b = &self.baseline.parameters;
        let base_da = self.baseline.income.depreciation_amortization;

        let excess_capex =
            (p.maintenance_capex + p.growth_capex - self.baseline.total_capex()).max(0.0);
        let incremental = excess_capex * INCREMENTAL_DEPRECIATION_RATE;

        let maintenance_move = p.maintenance_capex - b.maintenance_capex;
        let growth_move = p.growth_capex - b.growth_capex;
        let moved = maintenance_move + growth_move;
        let growth_share = if moved == 0.0 { 1.0 } else { growth_move / moved };

        let contributions = vec![
            DriverContribution::new(
                ParameterKey::Depreciation,
                safe_div(p.depreciation - b.depreciation, base_da),
            ),
            DriverContribution::new(
                ParameterKey::MaintenanceCapex,
                safe_div(incremental * (1.0 - growth_share), base_da),
            ),
            DriverContribution::new(
                ParameterKey::GrowthCapex,
                safe_div(incremental * growth_share, base_da),
            ),
        ];

        (round_currency(p.depreciation + incremental), contributions)
    }

    /// Interest on total debt at the effective rate, plus any inversion penalty
    ///
    /// Contributions are fractions of baseline interest expense. The rate
    /// drivers are scaled together when the zero floor binds.
    fn interest_stage(&self, p: &ParameterVector) -> (f64, f64, Vec<DriverContribution>) {
        let b = &self.baseline.parameters;
        let base_rate = self.baseline.effective_rate();
        let total_debt = self.baseline.total_debt();
        let base_interest = self.baseline.income.interest_expense;

        let rate_move = point_deviation(p.interest_rate, b.interest_rate);
        let spread_move = point_deviation(p.credit_spread, b.credit_spread);
        let effective_rate = (base_rate + rate_move + spread_move).max(0.0);
        let floor_scale = safe_div(effective_rate - base_rate, rate_move + spread_move);

        // Only a flattening/inverting curve relative to baseline is penalised
        let curve_move = p.bond_yield_spread - b.bond_yield_spread;
        let inversion_penalty = if curve_move < 0.0 {
            curve_move.abs() * INVERSION_PENALTY_PER_POINT
        } else {
            0.0
        };

        let rate_driver = |key: ParameterKey, points: f64| {
            let effect = total_debt * points * floor_scale;
            DriverContribution::new(key, safe_div(effect, base_interest))
        };
        let contributions = vec![
            rate_driver(ParameterKey::InterestRate, rate_move),
            rate_driver(ParameterKey::CreditSpread, spread_move),
            DriverContribution::new(
                ParameterKey::BondYieldSpread,
                safe_div(inversion_penalty, base_interest),
            ),
        ];

        let interest_expense = round_currency(total_debt * effective_rate + inversion_penalty);
        (interest_expense, effective_rate, contributions)
    }

    /// Operating expenses and everything below EBIT
    fn income_statement(
        &self,
        p: &ParameterVector,
        revenue: f64,
        cogs: f64,
        sga: f64,
    ) -> IncomeStage {
        let gross_profit = revenue - cogs;

        let rnd = round_currency(p.rnd_spend);
        let (depreciation_amortization, depreciation_drivers) = self.depreciation_stage(p);
        let total_opex = sga + rnd + depreciation_amortization;
        let ebit = gross_profit - total_opex;

        let (interest_expense, effective_rate, interest_drivers) = self.interest_stage(p);

        let other_income = self.baseline.income.other_income;
        let ebt = ebit - interest_expense + other_income;
        // No loss carry-back or carry-forward
        let tax = if ebt > 0.0 {
            round_currency(ebt * TAX_RATE)
        } else {
            0.0
        };
        let net_income = ebt - tax;

        IncomeStage {
            income: IncomeStatement {
                revenue,
                cogs,
                gross_profit,
                sga,
                rnd,
                depreciation_amortization,
                total_opex,
                ebit,
                interest_expense,
                other_income,
                ebt,
                tax,
                net_income,
            },
            effective_rate,
            depreciation_drivers,
            interest_drivers,
        }
    }

    /// Balance sheet with cash solved as the balancing residual
    fn balance_sheet(&self, p: &ParameterVector, income: &IncomeStatement) -> BalanceSheet {
        let base = &self.baseline.balance;
        let b = &self.baseline.parameters;

        let accounts_receivable = round_currency(income.revenue / DAYS_PER_YEAR * p.ar_days);
        let inventory = round_currency(income.cogs / DAYS_PER_YEAR * p.inventory_days);
        let accounts_payable = round_currency(income.cogs / DAYS_PER_YEAR * p.ap_days);

        let total_capex = p.maintenance_capex + p.growth_capex;
        let ppe = round_currency(
            self.baseline.opening_ppe() + total_capex - income.depreciation_amortization,
        );
        let total_non_current_assets = ppe + base.intangibles + base.goodwill;

        let debt_financed = (p.growth_capex - b.growth_capex).max(0.0) * GROWTH_CAPEX_DEBT_SHARE;
        let long_term_debt = round_currency(base.long_term_debt + debt_financed);
        let total_current_liabilities =
            accounts_payable + base.accrued_expenses + base.short_term_debt;
        let total_non_current_liabilities = long_term_debt + base.deferred_tax;
        let total_liabilities = total_current_liabilities + total_non_current_liabilities;

        // Equity absorbs the profitability change directly
        let net_income_change = income.net_income - self.baseline.income.net_income;
        let retained_earnings = base.retained_earnings + net_income_change;
        let total_equity = base.common_stock + base.apic + retained_earnings;

        let cash = (total_liabilities + total_equity)
            - (accounts_receivable + inventory + base.prepaid_expenses + total_non_current_assets);
        let total_current_assets = cash + accounts_receivable + inventory + base.prepaid_expenses;

        BalanceSheet {
            cash,
            accounts_receivable,
            inventory,
            prepaid_expenses: base.prepaid_expenses,
            total_current_assets,
            ppe,
            intangibles: base.intangibles,
            goodwill: base.goodwill,
            total_non_current_assets,
            total_assets: total_current_assets + total_non_current_assets,
            accounts_payable,
            accrued_expenses: base.accrued_expenses,
            short_term_debt: base.short_term_debt,
            total_current_liabilities,
            long_term_debt,
            deferred_tax: base.deferred_tax,
            total_non_current_liabilities,
            total_liabilities,
            common_stock: base.common_stock,
            apic: base.apic,
            retained_earnings,
            total_equity,
        }
    }

    /// Cash flow statement with operating cash flow solved as the residual
    fn cash_flow(
        &self,
        p: &ParameterVector,
        income: &IncomeStatement,
        balance: &BalanceSheet,
    ) -> CashFlowStatement {
        let base = &self.baseline.cash_flow;

        let capex = -round_currency(p.maintenance_capex + p.growth_capex);
        let cf_investing = capex + base.acquisitions;

        let new_borrowings =
            (balance.long_term_debt - self.baseline.balance.long_term_debt).max(0.0);
        let cf_financing = base.debt_repayment + new_borrowings + base.dividends;

        let net_cash_change = balance.cash - self.baseline.balance.cash;
        let cf_operations = net_cash_change - cf_investing - cf_financing;
        let working_capital_changes =
            cf_operations - income.net_income - income.depreciation_amortization;

        CashFlowStatement {
            net_income: income.net_income,
            depreciation_amortization: income.depreciation_amortization,
            working_capital_changes,
            cf_operations,
            capex,
            acquisitions: base.acquisitions,
            cf_investing,
            debt_repayment: base.debt_repayment,
            new_borrowings,
            dividends: base.dividends,
            cf_financing,
            net_cash_change,
        }
    }
}

impl Default for StatementEngine {
    fn default() -> Self {
        Self::new(Baseline::reference())
    }
}
