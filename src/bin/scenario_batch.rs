//! Run every scenario in a scenario CSV and write a one-row-per-scenario summary
//!
//! Usage: scenario_batch [SCENARIOS_CSV] [OUTPUT_CSV]

use anyhow::{Context, Result};
use financial_simulator::parameters::{load_scenarios, Scenario};
use financial_simulator::{SimulationResult, Simulator};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

const DEFAULT_SCENARIOS_PATH: &str = "data/scenarios.csv";
const DEFAULT_OUTPUT_PATH: &str = "scenario_batch_output.csv";

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    scenario: &'a str,
    revenue: f64,
    net_income: f64,
    cf_operations: f64,
    cash: f64,
    total_assets: f64,
    total_equity: f64,
    net_margin_pct: f64,
    current_ratio: f64,
    debt_to_equity: f64,
    health_score: u8,
    risk_level: &'a str,
}

impl<'a> SummaryRow<'a> {
    fn new(scenario: &'a str, result: &'a SimulationResult) -> Self {
        let statements = &result.simulated;
        let ratios = &result.financial_ratios;
        Self {
            scenario,
            revenue: statements.income.revenue,
            net_income: statements.income.net_income,
            cf_operations: statements.cash_flow.cf_operations,
            cash: statements.balance.cash,
            total_assets: statements.balance.total_assets,
            total_equity: statements.balance.total_equity,
            net_margin_pct: ratios.net_margin * 100.0,
            current_ratio: ratios.current_ratio,
            debt_to_equity: ratios.debt_to_equity,
            health_score: result.health_score,
            risk_level: result.risk_level.as_str(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let scenarios_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_SCENARIOS_PATH);
    let output_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_OUTPUT_PATH);

    let start = Instant::now();
    let simulator = Simulator::from_csv().context("failed to load baseline")?;
    let scenarios: Vec<Scenario> = load_scenarios(scenarios_path)
        .with_context(|| format!("failed to load scenarios from {}", scenarios_path))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let resolved = scenarios
        .iter()
        .map(|s| {
            s.resolve(&simulator.baseline().parameters)
                .with_context(|| format!("scenario '{}'", s.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let run_start = Instant::now();
    let results: Vec<SimulationResult> = resolved.par_iter().map(|p| simulator.run(p)).collect();
    println!("Simulations complete in {:?}", run_start.elapsed());

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("failed to create {}", output_path))?;
    for (scenario, result) in scenarios.iter().zip(&results) {
        writer.serialize(SummaryRow::new(&scenario.name, result))?;
    }
    writer.flush()?;

    println!();
    println!(
        "{:<16} {:>14} {:>14} {:>8} {:>10}",
        "Scenario", "Revenue", "Net Income", "Health", "Risk"
    );
    println!("{}", "-".repeat(66));
    for (scenario, result) in scenarios.iter().zip(&results) {
        println!(
            "{:<16} {:>14.0} {:>14.0} {:>8} {:>10}",
            scenario.name,
            result.simulated.income.revenue,
            result.simulated.income.net_income,
            result.health_score,
            result.risk_level.as_str()
        );
    }
    println!();
    println!("Output written to: {}", output_path);
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
