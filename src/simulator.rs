//! Simulator: runs the statement engine and assembles full results
//!
//! Holds one validated baseline, then evaluates any number of parameter
//! vectors against it without reloading the baseline files.

use crate::analysis::{self, ratios, sensitivity, waterfall, FinancialRatios};
use crate::baseline::Baseline;
use crate::commentary::{CommentarySummary, Narrative};
use crate::error::Result;
use crate::explain::explain;
use crate::parameters::ParameterVector;
use crate::result::{key_metrics, EconomicTrends, SimulationResult};
use crate::statements::StatementEngine;
use chrono::Utc;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Pre-loaded simulator for single runs and batches
///
/// # Example
/// ```ignore
/// let simulator = Simulator::from_csv()?;
/// let params = simulator.baseline().parameters.clone().with(ParameterKey::MarketDemand, 120.0);
/// let result = simulator.run(&params);
/// ```
#[derive(Debug, Clone)]
pub struct Simulator {
    engine: StatementEngine,
}

impl Simulator {
    pub fn new(baseline: Baseline) -> Self {
        Self {
            engine: StatementEngine::new(baseline),
        }
    }

    /// Simulator over the built-in reference baseline
    pub fn reference() -> Self {
        Self::new(Baseline::reference())
    }

    /// Load the baseline from the default data directory
    pub fn from_csv() -> Result<Self> {
        Ok(Self::new(Baseline::from_csv()?))
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self::new(Baseline::from_csv_path(path)?))
    }

    pub fn engine(&self) -> &StatementEngine {
        &self.engine
    }

    pub fn baseline(&self) -> &Baseline {
        self.engine.baseline()
    }

    /// Run one parameter vector and assemble the complete result
    pub fn run(&self, params: &ParameterVector) -> SimulationResult {
        self.run_with_note(params, None)
    }

    /// Like [`Simulator::run`], with a free-text scenario note carried into
    /// the fallback narrative
    pub fn run_with_note(&self, params: &ParameterVector, note: Option<&str>) -> SimulationResult {
        let baseline = self.engine.baseline();
        let original = baseline.statements();
        let numbers = self.engine.run(params);
        let simulated = numbers.statements.clone();

        let original_ratios = FinancialRatios::compute(&original, &baseline.parameters);
        let simulated_ratios = FinancialRatios::compute(&simulated, params);
        let health = analysis::assess(&simulated_ratios, &simulated, &original);

        let parameter_summary = params.summary_against(&baseline.parameters);
        let narrative = Narrative::fallback(&CommentarySummary::new(
            &parameter_summary,
            &original.income,
            &simulated.income,
            &simulated_ratios,
            health.score,
            health.risk_level,
            note,
        ));

        let result = SimulationResult {
            generated_at: Utc::now(),
            parameter_summary,
            parameters: params.clone(),
            key_metrics: key_metrics(&original, &simulated),
            economic_trends: EconomicTrends::from(params),
            ratios: ratios::compare(&original_ratios, &simulated_ratios),
            financial_ratios: simulated_ratios,
            waterfall: waterfall::build(&original.income, &simulated.income),
            sensitivity: sensitivity::analyze(&self.engine, params, &simulated),
            health_score: health.score,
            risk_level: health.risk_level,
            health_factors: health.factors,
            explanations: explain(&numbers, baseline),
            narrative,
            original,
            simulated,
        };

        log::debug!(
            "simulation: {} -> net income {:.0}, health {}",
            result.parameter_summary,
            result.simulated.income.net_income,
            result.health_score
        );
        result
    }

    /// Apply named overrides to the baseline parameters, then run
    pub fn run_overrides(&self, overrides: &BTreeMap<String, f64>) -> Result<SimulationResult> {
        self.run_overrides_with_note(overrides, None)
    }

    pub fn run_overrides_with_note(
        &self,
        overrides: &BTreeMap<String, f64>,
        note: Option<&str>,
    ) -> Result<SimulationResult> {
        let mut params = self.baseline().parameters.clone();
        params.apply_overrides(overrides)?;
        Ok(self.run_with_note(&params, note))
    }

    /// Run many parameter vectors in parallel, preserving input order
    pub fn run_batch(&self, scenarios: &[ParameterVector]) -> Vec<SimulationResult> {
        log::info!("running batch of {} scenarios", scenarios.len());
        scenarios.par_iter().map(|params| self.run(params)).collect()
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::waterfall::closes;
    use crate::analysis::RiskLevel;
    use crate::commentary::NarrativeSource;
    use crate::parameters::ParameterKey;

    #[test]
    fn test_baseline_run() {
        let simulator = Simulator::default();
        let result = simulator.run(&simulator.baseline().parameters);

        assert_eq!(result.parameter_summary, "All parameters at baseline");
        assert_eq!(result.original, result.simulated);
        assert_eq!(result.simulated.income.revenue, 22_500_000.0);
        assert_eq!(result.simulated.income.net_income, 2_480_000.0);
        assert_eq!(result.simulated.balance.total_assets, 31_000_000.0);
        assert_eq!(result.key_metrics.len(), 8);
        assert_eq!(result.ratios.len(), 10);
        assert_eq!(result.waterfall.len(), 9);
        assert_eq!(result.sensitivity.len(), 5);
        assert_eq!(result.health_factors.len(), 7);
        assert_eq!(result.health_score, 90);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.narrative.source, NarrativeSource::Fallback);
        assert!(result.narrative.analysis.starts_with("All parameters at baseline"));
    }

    #[test]
    fn test_discount_campaign() {
        let simulator = Simulator::default();
        let params = simulator.baseline().parameters.clone().with(ParameterKey::Discount, 15.0);
        let result = simulator.run(&params);

        assert_eq!(result.parameter_summary, "Discount: 5 → 15");
        let revenue = result.metric("Revenue").unwrap();
        assert_eq!(revenue.change, -1_350_000.0);
        assert_eq!(
            result.simulated.balance.accounts_payable,
            result.original.balance.accounts_payable
        );
        assert!(closes(&result.waterfall));
        assert!(result.simulated.balance.is_balanced());
    }

    #[test]
    fn test_run_overrides_rejects_unknown_name() {
        let simulator = Simulator::default();
        let mut overrides = BTreeMap::new();
        overrides.insert("marketDemand".to_string(), 120.0);
        assert!(simulator.run_overrides(&overrides).is_ok());

        overrides.insert("weather".to_string(), 1.0);
        assert!(simulator.run_overrides(&overrides).is_err());
    }

    #[test]
    fn test_note_reaches_narrative() {
        let simulator = Simulator::default();
        let params = simulator.baseline().parameters.clone().with(ParameterKey::Discount, 10.0);

        let plain = simulator.run(&params);
        let noted = simulator.run_with_note(&params, Some("holiday promotion"));
        assert!(!plain.narrative.analysis.contains("holiday promotion"));
        assert!(noted.narrative.analysis.contains("Scenario note: holiday promotion"));
        assert_eq!(plain.simulated, noted.simulated);
        assert_eq!(plain.narrative.risk_assessment, noted.narrative.risk_assessment);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let simulator = Simulator::default();
        let base = simulator.baseline().parameters.clone();
        let scenarios: Vec<_> = [60.0, 90.0, 110.0, 140.0]
            .iter()
            .map(|&d| base.clone().with(ParameterKey::MarketDemand, d))
            .collect();

        let batch = simulator.run_batch(&scenarios);
        assert_eq!(batch.len(), 4);
        for (params, result) in scenarios.iter().zip(&batch) {
            let single = simulator.run(params);
            assert_eq!(single.simulated, result.simulated);
            assert_eq!(single.sensitivity, result.sensitivity);
        }
        assert!(batch[0].simulated.income.revenue < batch[3].simulated.income.revenue);
    }
}
