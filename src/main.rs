//! Financial Simulator CLI
//!
//! Runs one simulation against the baseline and prints the statements and
//! analyses, or the full result as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use financial_simulator::analysis::{RatioUnit, WaterfallKind};
use financial_simulator::parameters::{load_overrides, parse_assignment};
use financial_simulator::{SimulationResult, Simulator};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Three-statement financial simulation
#[derive(Parser)]
#[command(name = "financial_simulator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Baseline directory holding statements.csv and parameters.csv
    #[arg(short, long)]
    baseline: Option<PathBuf>,

    /// JSON file of parameter overrides ({"marketDemand": 120, ...})
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Override one parameter, e.g. --set discount=12 (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Print the full result as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Also write the JSON result to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let simulator = match &cli.baseline {
        Some(dir) => Simulator::from_csv_path(dir)
            .with_context(|| format!("failed to load baseline from {}", dir.display()))?,
        None => Simulator::reference(),
    };

    let mut overrides = BTreeMap::new();
    if let Some(path) = &cli.scenario {
        overrides = load_overrides(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
    }
    for assignment in &cli.set {
        let (name, value) = parse_assignment(assignment)?;
        overrides.insert(name, value);
    }

    let result = simulator.run_overrides(&overrides)?;

    if let Some(path) = &cli.output {
        let mut file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(&mut file, &result)?;
        writeln!(file)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
        if let Some(path) = &cli.output {
            println!("\nResult written to: {}", path.display());
        }
    }
    Ok(())
}

fn print_report(result: &SimulationResult) {
    println!("Financial Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("==========================\n");
    println!("Scenario: {}\n", result.parameter_summary);

    let (orig, sim) = (&result.original, &result.simulated);

    println!("Income Statement:");
    print_header();
    let income = [
        ("Revenue", orig.income.revenue, sim.income.revenue),
        ("COGS", orig.income.cogs, sim.income.cogs),
        ("Gross Profit", orig.income.gross_profit, sim.income.gross_profit),
        ("SG&A", orig.income.sga, sim.income.sga),
        ("R&D", orig.income.rnd, sim.income.rnd),
        ("D&A", orig.income.depreciation_amortization, sim.income.depreciation_amortization),
        ("EBIT", orig.income.ebit, sim.income.ebit),
        ("Interest Expense", orig.income.interest_expense, sim.income.interest_expense),
        ("Other Income", orig.income.other_income, sim.income.other_income),
        ("EBT", orig.income.ebt, sim.income.ebt),
        ("Tax", orig.income.tax, sim.income.tax),
        ("Net Income", orig.income.net_income, sim.income.net_income),
    ];
    print_rows(&income);

    println!("\nBalance Sheet:");
    print_header();
    let balance = [
        ("Cash", orig.balance.cash, sim.balance.cash),
        ("Accounts Receivable", orig.balance.accounts_receivable, sim.balance.accounts_receivable),
        ("Inventory", orig.balance.inventory, sim.balance.inventory),
        (
            "Total Current Assets",
            orig.balance.total_current_assets,
            sim.balance.total_current_assets,
        ),
        ("PP&E", orig.balance.ppe, sim.balance.ppe),
        ("Total Assets", orig.balance.total_assets, sim.balance.total_assets),
        ("Accounts Payable", orig.balance.accounts_payable, sim.balance.accounts_payable),
        ("Long-Term Debt", orig.balance.long_term_debt, sim.balance.long_term_debt),
        ("Total Liabilities", orig.balance.total_liabilities, sim.balance.total_liabilities),
        ("Retained Earnings", orig.balance.retained_earnings, sim.balance.retained_earnings),
        ("Total Equity", orig.balance.total_equity, sim.balance.total_equity),
    ];
    print_rows(&balance);

    println!("\nCash Flow Statement:");
    print_header();
    let cash_flow = [
        (
            "Working Capital Changes",
            orig.cash_flow.working_capital_changes,
            sim.cash_flow.working_capital_changes,
        ),
        ("Operating Cash Flow", orig.cash_flow.cf_operations, sim.cash_flow.cf_operations),
        ("Capex", orig.cash_flow.capex, sim.cash_flow.capex),
        ("Investing Cash Flow", orig.cash_flow.cf_investing, sim.cash_flow.cf_investing),
        ("New Borrowings", orig.cash_flow.new_borrowings, sim.cash_flow.new_borrowings),
        ("Financing Cash Flow", orig.cash_flow.cf_financing, sim.cash_flow.cf_financing),
        ("Net Cash Change", orig.cash_flow.net_cash_change, sim.cash_flow.net_cash_change),
    ];
    print_rows(&cash_flow);

    println!("\nRatios:");
    println!("{:<26} {:>12} {:>12}", "Ratio", "Original", "Simulated");
    println!("{}", "-".repeat(52));
    for row in &result.ratios {
        println!(
            "{:<26} {:>12} {:>12}",
            row.name,
            format_ratio(row.unit, row.original),
            format_ratio(row.unit, row.simulated)
        );
    }

    println!("\nNet Income Bridge:");
    for entry in &result.waterfall {
        let marker = match entry.kind {
            WaterfallKind::Total => "=",
            WaterfallKind::Increase => "+",
            WaterfallKind::Decrease => "-",
        };
        println!("  {} {:<22} {:>16.0}", marker, entry.name, entry.value);
    }

    println!("\nSensitivity (% swing low -> high):");
    println!(
        "{:<22} {:>9} {:>9} {:>11} {:>11} {:>11}",
        "Parameter", "Low", "High", "Revenue", "Net Income", "Op. CF"
    );
    println!("{}", "-".repeat(78));
    for point in &result.sensitivity {
        println!(
            "{:<22} {:>9.1} {:>9.1} {:>10.2}% {:>10.2}% {:>10.2}%",
            point.label,
            point.low_value,
            point.high_value,
            point.revenue_impact,
            point.net_income_impact,
            point.cash_flow_impact
        );
    }

    println!(
        "\nHealth: {}/100 ({} risk)",
        result.health_score,
        result.risk_level.as_str()
    );
    for factor in &result.health_factors {
        println!("  {:>+4}  {:?}: {}", factor.points, factor.category, factor.detail);
    }

    println!("\nDrivers:");
    for explanation in result.explanations.iter().filter(|e| e.change != 0.0) {
        println!("  {} ({:+.0})", explanation.line_item, explanation.change);
        for driver in &explanation.drivers {
            println!("    {}", driver);
        }
    }

    println!("\n{}", result.narrative.analysis);
    println!("{}", result.narrative.risk_assessment);
}

fn print_header() {
    println!("{:<26} {:>16} {:>16} {:>16}", "Line Item", "Original", "Simulated", "Change");
    println!("{}", "-".repeat(77));
}

fn print_rows(rows: &[(&str, f64, f64)]) {
    for &(name, original, simulated) in rows {
        println!(
            "{:<26} {:>16.0} {:>16.0} {:>16.0}",
            name,
            original,
            simulated,
            simulated - original
        );
    }
}

fn format_ratio(unit: RatioUnit, value: f64) -> String {
    match unit {
        RatioUnit::Percent => format!("{:.2}%", value * 100.0),
        RatioUnit::Times => format!("{:.2}x", value),
        RatioUnit::Days => format!("{:.0} days", value),
    }
}
