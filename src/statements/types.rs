//! Financial statement structures shared by the baseline and engine output
//!
//! All line items are whole currency units held in `f64`. Outflows on the
//! cash flow statement are negative.

use crate::numeric::MAX_EXACT_CURRENCY;
use serde::{Deserialize, Serialize};

/// Profit & loss for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub revenue: f64,
    pub cogs: f64,
    pub gross_profit: f64,
    pub sga: f64,
    pub rnd: f64,
    pub depreciation_amortization: f64,
    pub total_opex: f64,
    pub ebit: f64,
    pub interest_expense: f64,
    pub other_income: f64,
    pub ebt: f64,
    pub tax: f64,
    pub net_income: f64,
}

impl IncomeStatement {
    fn lines(&self) -> [f64; 13] {
        [
            self.revenue,
            self.cogs,
            self.gross_profit,
            self.sga,
            self.rnd,
            self.depreciation_amortization,
            self.total_opex,
            self.ebit,
            self.interest_expense,
            self.other_income,
            self.ebt,
            self.tax,
            self.net_income,
        ]
    }
}

/// Balance sheet at period end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    // Current assets
    pub cash: f64,
    pub accounts_receivable: f64,
    pub inventory: f64,
    pub prepaid_expenses: f64,
    pub total_current_assets: f64,

    // Non-current assets
    pub ppe: f64,
    pub intangibles: f64,
    pub goodwill: f64,
    pub total_non_current_assets: f64,
    pub total_assets: f64,

    // Current liabilities
    pub accounts_payable: f64,
    pub accrued_expenses: f64,
    pub short_term_debt: f64,
    pub total_current_liabilities: f64,

    // Non-current liabilities
    pub long_term_debt: f64,
    pub deferred_tax: f64,
    pub total_non_current_liabilities: f64,
    pub total_liabilities: f64,

    // Equity
    pub common_stock: f64,
    pub apic: f64,
    pub retained_earnings: f64,
    pub total_equity: f64,
}

impl BalanceSheet {
    pub fn total_debt(&self) -> f64 {
        self.short_term_debt + self.long_term_debt
    }

    pub fn total_liabilities_and_equity(&self) -> f64 {
        self.total_liabilities + self.total_equity
    }

    /// True when assets equal liabilities plus equity exactly
    ///
    /// Guaranteed for engine output within [`MAX_EXACT_CURRENCY`].
    pub fn is_balanced(&self) -> bool {
        self.total_assets == self.total_liabilities_and_equity()
    }

    fn lines(&self) -> [f64; 22] {
        [
            self.cash,
            self.accounts_receivable,
            self.inventory,
            self.prepaid_expenses,
            self.total_current_assets,
            self.ppe,
            self.intangibles,
            self.goodwill,
            self.total_non_current_assets,
            self.total_assets,
            self.accounts_payable,
            self.accrued_expenses,
            self.short_term_debt,
            self.total_current_liabilities,
            self.long_term_debt,
            self.deferred_tax,
            self.total_non_current_liabilities,
            self.total_liabilities,
            self.common_stock,
            self.apic,
            self.retained_earnings,
            self.total_equity,
        ]
    }
}

/// Cash flow statement for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    // Operating
    pub net_income: f64,
    pub depreciation_amortization: f64,
    pub working_capital_changes: f64,
    pub cf_operations: f64,

    // Investing
    pub capex: f64,
    pub acquisitions: f64,
    pub cf_investing: f64,

    // Financing
    pub debt_repayment: f64,
    pub new_borrowings: f64,
    pub dividends: f64,
    pub cf_financing: f64,

    pub net_cash_change: f64,
}

impl CashFlowStatement {
    /// True when the three sections sum to the net cash change exactly
    ///
    /// Guaranteed for engine output within [`MAX_EXACT_CURRENCY`].
    pub fn reconciles(&self) -> bool {
        self.cf_operations + self.cf_investing + self.cf_financing == self.net_cash_change
    }

    fn lines(&self) -> [f64; 12] {
        [
            self.net_income,
            self.depreciation_amortization,
            self.working_capital_changes,
            self.cf_operations,
            self.capex,
            self.acquisitions,
            self.cf_investing,
            self.debt_repayment,
            self.new_borrowings,
            self.dividends,
            self.cf_financing,
            self.net_cash_change,
        ]
    }
}

/// The three statements of one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub income: IncomeStatement,
    pub balance: BalanceSheet,
    pub cash_flow: CashFlowStatement,
}

impl FinancialStatements {
    /// True when every line is finite and no larger than [`MAX_EXACT_CURRENCY`]
    pub fn within_exact_range(&self) -> bool {
        self.income
            .lines()
            .iter()
            .chain(self.balance.lines().iter())
            .chain(self.cash_flow.lines().iter())
            .all(|v| v.abs() <= MAX_EXACT_CURRENCY)
    }
}
