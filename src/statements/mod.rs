//! Statement engine and the financial statement structures it produces

mod types;
pub mod drivers;
mod engine;

pub use types::{BalanceSheet, CashFlowStatement, FinancialStatements, IncomeStatement};
pub use drivers::{DriverBreakdown, DriverContribution};
pub use engine::{
    EngineNumbers, StatementEngine, DISCOUNT_ELASTICITY, REVENUE_ELASTICITIES, TAX_RATE,
};
