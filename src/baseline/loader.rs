//! CSV-based baseline loader
//!
//! Loads baseline statements and parameter defaults from CSV files in data/baseline/

use crate::error::{Result, SimError};
use crate::parameters::{ParameterKey, ParameterVector};
use crate::statements::{BalanceSheet, CashFlowStatement, IncomeStatement};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Default path to the baseline directory
pub const DEFAULT_BASELINE_PATH: &str = "data/baseline";

#[derive(Debug, serde::Deserialize)]
struct LineItemRow {
    statement: String,
    line_item: String,
    value: f64,
}

#[derive(Debug, serde::Deserialize)]
struct ParameterRow {
    parameter: String,
    value: f64,
}

/// Load statement line items from statements.csv
///
/// Columns: statement (income | balance | cash_flow), line_item, value
pub fn load_statements(path: &Path) -> Result<(IncomeStatement, BalanceSheet, CashFlowStatement)> {
    let file = File::open(path.join("statements.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut income = Map::new();
    let mut balance = Map::new();
    let mut cash_flow = Map::new();

    for result in reader.deserialize() {
        let row: LineItemRow = result?;
        let section = match row.statement.as_str() {
            "income" => &mut income,
            "balance" => &mut balance,
            "cash_flow" => &mut cash_flow,
            other => return Err(SimError::UnknownStatement(other.to_string())),
        };
        section.insert(row.line_item, Value::from(row.value));
    }

    // Missing or misspelled line items surface as serde errors naming the field
    Ok((
        serde_json::from_value(Value::Object(income))?,
        serde_json::from_value(Value::Object(balance))?,
        serde_json::from_value(Value::Object(cash_flow))?,
    ))
}

/// Load parameter defaults from parameters.csv
///
/// Every parameter must be present; unknown names are rejected.
pub fn load_parameters(path: &Path) -> Result<ParameterVector> {
    let file = File::open(path.join("parameters.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut values: HashMap<ParameterKey, f64> = HashMap::new();
    for result in reader.deserialize() {
        let row: ParameterRow = result?;
        let key = ParameterKey::from_name(&row.parameter)
            .ok_or_else(|| SimError::UnknownParameter(row.parameter.clone()))?;
        values.insert(key, row.value);
    }

    let mut fields = Map::new();
    for &key in ParameterKey::ALL {
        let value = values
            .get(&key)
            .ok_or_else(|| SimError::MissingParameter(key.name().to_string()))?;
        fields.insert(key.name().to_string(), Value::from(*value));
    }

    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Everything read from a baseline directory
pub struct LoadedBaseline {
    pub income: IncomeStatement,
    pub balance: BalanceSheet,
    pub cash_flow: CashFlowStatement,
    pub parameters: ParameterVector,
}

impl LoadedBaseline {
    /// Load from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_BASELINE_PATH))
    }

    /// Load from a specific directory
    pub fn load_from(path: &Path) -> Result<Self> {
        let (income, balance, cash_flow) = load_statements(path)?;
        let parameters = load_parameters(path)?;
        log::info!("loaded baseline from {}", path.display());

        Ok(Self {
            income,
            balance,
            cash_flow,
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_baseline() {
        let result = LoadedBaseline::load_default();
        assert!(result.is_ok(), "Failed to load baseline: {:?}", result.err());

        let loaded = result.unwrap();
        assert_eq!(loaded.income.revenue, 22_500_000.0);
        assert_eq!(loaded.income.net_income, 2_480_000.0);
        assert_eq!(loaded.balance.total_assets, 31_000_000.0);
        assert_eq!(loaded.cash_flow.cf_operations, 3_150_000.0);
        assert_eq!(loaded.parameters.market_demand, 100.0);
        assert_eq!(loaded.parameters.discount, 5.0);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = LoadedBaseline::load_from(Path::new("data/does-not-exist")).err().unwrap();
        assert!(matches!(err, SimError::Io(_)));
    }
}
