//! Baseline financial position and default parameter values
//!
//! The baseline is an explicit, immutable configuration object handed to the
//! engine. Every simulation run is expressed as a delta or ratio against it.

pub mod loader;

use crate::error::{Result, SimError};
use crate::numeric::safe_div;
use crate::parameters::ParameterVector;
use crate::statements::{BalanceSheet, CashFlowStatement, FinancialStatements, IncomeStatement};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use loader::{LoadedBaseline, DEFAULT_BASELINE_PATH};

/// Company statements at the neutral parameter setting, plus the defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub income: IncomeStatement,
    pub balance: BalanceSheet,
    pub cash_flow: CashFlowStatement,
    pub parameters: ParameterVector,
}

impl Baseline {
    /// Reference company used throughout the documentation and tests
    pub fn reference() -> Self {
        Self {
            income: IncomeStatement {
                revenue: 22_500_000.0,
                cogs: 13_500_000.0,
                gross_profit: 9_000_000.0,
                sga: 3_580_513.0,
                rnd: 1_200_000.0,
                depreciation_amortization: 900_000.0,
                total_opex: 5_680_513.0,
                ebit: 3_319_487.0,
                interest_expense: 420_000.0,
                other_income: 280_000.0,
                ebt: 3_179_487.0,
                tax: 699_487.0,
                net_income: 2_480_000.0,
            },
            balance: BalanceSheet {
                cash: 6_106_849.0,
                accounts_receivable: 2_773_973.0,
                inventory: 2_219_178.0,
                prepaid_expenses: 400_000.0,
                total_current_assets: 11_500_000.0,
                ppe: 14_000_000.0,
                intangibles: 2_500_000.0,
                goodwill: 3_000_000.0,
                total_non_current_assets: 19_500_000.0,
                total_assets: 31_000_000.0,
                accounts_payable: 1_479_452.0,
                accrued_expenses: 850_000.0,
                short_term_debt: 1_500_000.0,
                total_current_liabilities: 3_829_452.0,
                long_term_debt: 5_500_000.0,
                deferred_tax: 620_000.0,
                total_non_current_liabilities: 6_120_000.0,
                total_liabilities: 9_949_452.0,
                common_stock: 1_000_000.0,
                apic: 4_000_000.0,
                retained_earnings: 16_050_548.0,
                total_equity: 21_050_548.0,
            },
            cash_flow: CashFlowStatement {
                net_income: 2_480_000.0,
                depreciation_amortization: 900_000.0,
                working_capital_changes: -230_000.0,
                cf_operations: 3_150_000.0,
                capex: -1_500_000.0,
                acquisitions: -250_000.0,
                cf_investing: -1_750_000.0,
                debt_repayment: -600_000.0,
                new_borrowings: 0.0,
                dividends: -800_000.0,
                cf_financing: -1_400_000.0,
                net_cash_change: 0.0,
            },
            parameters: reference_parameters(),
        }
    }

    /// Load baseline statements and parameter defaults from CSV files in `path`
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedBaseline::load_from(path)?;
        let baseline = Self {
            income: loaded.income,
            balance: loaded.balance,
            cash_flow: loaded.cash_flow,
            parameters: loaded.parameters,
        };
        baseline.validate()?;
        Ok(baseline)
    }

    /// Load from the default location (data/baseline/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(DEFAULT_BASELINE_PATH))
    }

    /// Reject a baseline whose balance sheet does not balance
    pub fn validate(&self) -> Result<()> {
        if !self.balance.is_balanced() {
            return Err(SimError::Unbalanced {
                assets: self.balance.total_assets,
                liabilities_and_equity: self.balance.total_liabilities_and_equity(),
            });
        }
        Ok(())
    }

    /// Short-term plus long-term debt
    pub fn total_debt(&self) -> f64 {
        self.balance.total_debt()
    }

    /// Interest expense over total debt
    pub fn effective_rate(&self) -> f64 {
        safe_div(self.income.interest_expense, self.total_debt())
    }

    /// Maintenance plus growth capex at the default parameter setting
    pub fn total_capex(&self) -> f64 {
        self.parameters.maintenance_capex + self.parameters.growth_capex
    }

    /// PP&E before this period's capex and depreciation
    pub fn opening_ppe(&self) -> f64 {
        self.balance.ppe - self.total_capex() + self.income.depreciation_amortization
    }

    pub fn statements(&self) -> FinancialStatements {
        FinancialStatements {
            income: self.income.clone(),
            balance: self.balance.clone(),
            cash_flow: self.cash_flow.clone(),
        }
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::reference()
    }
}

/// Default parameter values of the reference company
fn reference_parameters() -> ParameterVector {
    ParameterVector {
        production_capacity: 85.0,
        inventory_turnover: 6.0,
        supplier_lead_time: 14.0,
        cogs_materials_pct: 40.0,
        cogs_labor_pct: 30.0,
        cogs_overhead_pct: 30.0,
        salary_inflation: 3.0,
        headcount_change: 0.0,
        maintenance_capex: 800_000.0,
        growth_capex: 700_000.0,
        depreciation: 900_000.0,
        rnd_spend: 1_200_000.0,
        ar_days: 45.0,
        inventory_days: 60.0,
        ap_days: 40.0,

        discount: 5.0,
        new_product_impact: 0.0,
        pricing_index: 100.0,
        customer_churn: 8.0,

        market_demand: 100.0,
        competition_index: 100.0,
        commodity_index: 100.0,
        supply_disruption: 20.0,
        freight_rates: 100.0,
        consumer_sentiment: 100.0,

        inflation_rate: 3.0,
        interest_rate: 5.0,
        unemployment_rate: 4.0,
        gdp_growth: 2.5,
        consumer_confidence: 100.0,
        pmi: 52.0,
        forex_rate: 1.0,

        bond_yield_spread: 1.5,
        credit_spread: 2.0,

        revenue_shock: 0.0,
        cyber_downtime_days: 0.0,
        esg_penalty: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_is_consistent() {
        let baseline = Baseline::reference();
        assert!(baseline.validate().is_ok());

        let income = &baseline.income;
        assert_eq!(income.revenue - income.cogs, income.gross_profit);
        assert_eq!(income.sga + income.rnd + income.depreciation_amortization, income.total_opex);
        assert_eq!(income.gross_profit - income.total_opex, income.ebit);
        assert_eq!(income.ebit - income.interest_expense + income.other_income, income.ebt);
        assert_eq!(income.ebt - income.tax, income.net_income);

        let balance = &baseline.balance;
        assert_eq!(
            balance.cash
                + balance.accounts_receivable
                + balance.inventory
                + balance.prepaid_expenses,
            balance.total_current_assets
        );
        assert_eq!(
            balance.total_current_liabilities + balance.total_non_current_liabilities,
            balance.total_liabilities
        );
        assert_eq!(
            balance.common_stock + balance.apic + balance.retained_earnings,
            balance.total_equity
        );

        assert!(baseline.cash_flow.reconciles());
    }

    #[test]
    fn test_derived_constants() {
        let baseline = Baseline::reference();
        assert_eq!(baseline.total_debt(), 7_000_000.0);
        assert_relative_eq!(baseline.effective_rate(), 0.06, epsilon = 1e-12);
        assert_eq!(baseline.total_capex(), 1_500_000.0);
        assert_eq!(baseline.opening_ppe(), 13_400_000.0);
    }

    #[test]
    fn test_validate_rejects_unbalanced() {
        let mut baseline = Baseline::reference();
        baseline.balance.total_assets += 1.0;
        assert!(matches!(baseline.validate(), Err(SimError::Unbalanced { .. })));
    }

    #[test]
    fn test_csv_baseline_matches_reference() {
        let loaded = Baseline::from_csv().expect("Failed to load baseline CSV files");
        assert_eq!(loaded, Baseline::reference());
    }
}
