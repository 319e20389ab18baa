//! Load parameter overrides and scenario sets from JSON / CSV

use super::ParameterVector;
use crate::error::{Result, SimError};
use csv::Reader;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Raw CSV row of a scenario file: one parameter override per row
#[derive(Debug, serde::Deserialize)]
struct ScenarioRow {
    scenario: String,
    parameter: String,
    value: f64,
}

/// A named set of overrides applied on top of the baseline parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub overrides: BTreeMap<String, f64>,
}

impl Scenario {
    /// Baseline parameters with this scenario's overrides applied
    pub fn resolve(&self, baseline: &ParameterVector) -> Result<ParameterVector> {
        let mut params = baseline.clone();
        params.apply_overrides(&self.overrides)?;
        Ok(params)
    }
}

/// Parse a JSON object of `{ "name": value }` overrides
pub fn parse_overrides(json: &str) -> Result<BTreeMap<String, f64>> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON overrides file
pub fn load_overrides<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, f64>> {
    let text = fs::read_to_string(path)?;
    parse_overrides(&text)
}

/// Parse a single `name=value` override as given on the command line
pub fn parse_assignment(assignment: &str) -> Result<(String, f64)> {
    let invalid = || SimError::InvalidOverride(assignment.to_string());
    let (name, value) = assignment.split_once('=').ok_or_else(invalid)?;
    let value: f64 = value.trim().parse().map_err(|_| invalid())?;
    Ok((name.trim().to_string(), value))
}

/// Load scenarios from any reader with `scenario,parameter,value` columns
///
/// Scenarios keep the order in which they first appear.
pub fn load_scenarios_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Scenario>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut scenarios: Vec<Scenario> = Vec::new();

    for result in csv_reader.deserialize() {
        let row: ScenarioRow = result?;
        let index = match scenarios.iter().position(|s| s.name == row.scenario) {
            Some(index) => index,
            None => {
                scenarios.push(Scenario {
                    name: row.scenario.clone(),
                    overrides: BTreeMap::new(),
                });
                scenarios.len() - 1
            }
        };
        scenarios[index].overrides.insert(row.parameter, row.value);
    }

    log::info!("loaded {} scenarios", scenarios.len());
    Ok(scenarios)
}

/// Load scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>> {
    let file = fs::File::open(path)?;
    load_scenarios_from_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::Baseline;

    #[test]
    fn test_parse_overrides() {
        let overrides = parse_overrides(r#"{ "discount": 15, "interestRate": 7.5 }"#).unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides["interestRate"], 7.5);

        assert!(parse_overrides("[1, 2]").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("marketDemand=120").unwrap(),
            ("marketDemand".to_string(), 120.0)
        );
        assert_eq!(parse_assignment(" pmi = 48.5 ").unwrap(), ("pmi".to_string(), 48.5));
        assert!(matches!(parse_assignment("pmi"), Err(SimError::InvalidOverride(_))));
        assert!(matches!(parse_assignment("pmi=high"), Err(SimError::InvalidOverride(_))));
    }

    #[test]
    fn test_load_scenarios_groups_rows() {
        let data = "scenario,parameter,value\n\
                    recession,marketDemand,80\n\
                    price_war,discount,15\n\
                    recession,unemploymentRate,8\n";
        let scenarios = load_scenarios_from_reader(data.as_bytes()).unwrap();

        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].name, "recession");
        assert_eq!(scenarios[0].overrides.len(), 2);
        assert_eq!(scenarios[1].name, "price_war");

        let baseline = Baseline::reference().parameters;
        let params = scenarios[0].resolve(&baseline).unwrap();
        assert_eq!(params.market_demand, 80.0);
        assert_eq!(params.unemployment_rate, 8.0);
        assert_eq!(params.discount, baseline.discount);
    }

    #[test]
    fn test_load_bundled_scenarios() {
        let scenarios = load_scenarios("data/scenarios.csv").expect("Failed to load scenarios");
        let baseline = Baseline::reference().parameters;
        assert!(!scenarios.is_empty());
        for scenario in &scenarios {
            assert!(scenario.resolve(&baseline).is_ok(), "{}", scenario.name);
        }
    }
}
