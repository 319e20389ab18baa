//! Narrative commentary for a finished simulation
//!
//! Providers only ever see a compact numeric summary. Every result carries a
//! deterministic fallback narrative, so a slow or failing provider can never
//! leave a result incomplete.

use crate::analysis::{FinancialRatios, RiskLevel};
use crate::error::{Result, SimError};
use crate::numeric::percent_change;
use crate::result::SimulationResult;
use crate::statements::IncomeStatement;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Default bound on a provider call
pub const DEFAULT_COMMENTARY_TIMEOUT: Duration = Duration::from_secs(20);

/// Where the narrative text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeSource {
    Fallback,
    Provider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub analysis: String,
    pub suggestions: String,
    pub risk_assessment: String,
    pub source: NarrativeSource,
}

impl Narrative {
    /// Deterministic text built from the numbers alone
    pub fn fallback(summary: &CommentarySummary) -> Self {
        let mut analysis = format!(
            "{}. Revenue {:+.1}% and net income {:+.1}% versus baseline; \
             gross margin {:.1}%, net margin {:.1}%.",
            summary.parameter_summary,
            summary.revenue_change_pct,
            summary.net_income_change_pct,
            summary.gross_margin * 100.0,
            summary.net_margin * 100.0,
        );
        if let Some(note) = summary.scenario_note.as_deref().filter(|n| !n.trim().is_empty()) {
            analysis.push_str(&format!(" Scenario note: {}", note.trim()));
        }
        let suggestions = "Automated suggestions are unavailable for this run. \
             Review the sensitivity table and the net income bridge for the largest drivers."
            .to_string();
        let risk_assessment = format!(
            "Health score {}/100 ({} risk). Current ratio {:.2}x, debt/equity {:.2}x, \
             interest coverage {:.1}x.",
            summary.health_score,
            summary.risk_level.as_str(),
            summary.current_ratio,
            summary.debt_to_equity,
            summary.interest_coverage,
        );
        Self {
            analysis,
            suggestions,
            risk_assessment,
            source: NarrativeSource::Fallback,
        }
    }
}

/// The numbers a commentary provider is allowed to read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentarySummary {
    pub parameter_summary: String,
    pub revenue_change_pct: f64,
    pub net_income_change_pct: f64,
    pub gross_margin: f64,
    pub operating_margin: f64,
    pub net_margin: f64,
    pub current_ratio: f64,
    pub debt_to_equity: f64,
    pub interest_coverage: f64,
    pub health_score: u8,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_note: Option<String>,
}

impl CommentarySummary {
    pub fn new(
        parameter_summary: &str,
        original: &IncomeStatement,
        simulated: &IncomeStatement,
        ratios: &FinancialRatios,
        health_score: u8,
        risk_level: RiskLevel,
        note: Option<&str>,
    ) -> Self {
        Self {
            parameter_summary: parameter_summary.to_string(),
            revenue_change_pct: percent_change(simulated.revenue, original.revenue),
            net_income_change_pct: percent_change(simulated.net_income, original.net_income),
            gross_margin: ratios.gross_margin,
            operating_margin: ratios.operating_margin,
            net_margin: ratios.net_margin,
            current_ratio: ratios.current_ratio,
            debt_to_equity: ratios.debt_to_equity,
            interest_coverage: ratios.interest_coverage,
            health_score,
            risk_level,
            scenario_note: note.map(str::to_string),
        }
    }

    pub fn from_result(result: &SimulationResult, note: Option<&str>) -> Self {
        Self::new(
            &result.parameter_summary,
            &result.original.income,
            &result.simulated.income,
            &result.financial_ratios,
            result.health_score,
            result.risk_level,
            note,
        )
    }
}

/// Source of narrative text, typically a remote language model
pub trait CommentaryProvider {
    fn generate(
        &self,
        summary: &CommentarySummary,
    ) -> impl Future<Output = Result<Narrative>> + Send;
}

/// Replace the fallback narrative with provider text when the provider
/// answers within `limit`. Numeric fields are never touched.
pub async fn attach_commentary<P: CommentaryProvider>(
    mut result: SimulationResult,
    provider: &P,
    note: Option<&str>,
    limit: Duration,
) -> SimulationResult {
    let summary = CommentarySummary::from_result(&result, note);

    let outcome = match tokio::time::timeout(limit, provider.generate(&summary)).await {
        Ok(inner) => inner,
        Err(_) => Err(SimError::CommentaryTimeout(limit)),
    };

    match outcome {
        Ok(mut narrative) => {
            narrative.source = NarrativeSource::Provider;
            result.narrative = narrative;
        }
        Err(e) => {
            log::warn!("commentary unavailable, keeping fallback text: {}", e);
            result.narrative = Narrative::fallback(&summary);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterKey;
    use crate::simulator::Simulator;

    struct Canned;

    impl CommentaryProvider for Canned {
        async fn generate(&self, summary: &CommentarySummary) -> Result<Narrative> {
            Ok(Narrative {
                analysis: format!("score {}", summary.health_score),
                suggestions: summary.scenario_note.clone().unwrap_or_default(),
                risk_assessment: "fine".to_string(),
                source: NarrativeSource::Fallback,
            })
        }
    }

    struct Failing;

    impl CommentaryProvider for Failing {
        async fn generate(&self, _summary: &CommentarySummary) -> Result<Narrative> {
            Err(SimError::Commentary("upstream returned 503".to_string()))
        }
    }

    struct Stalled;

    impl CommentaryProvider for Stalled {
        async fn generate(&self, summary: &CommentarySummary) -> Result<Narrative> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Canned.generate(summary).await
        }
    }

    fn simulated() -> SimulationResult {
        let simulator = Simulator::default();
        let params = simulator
            .baseline()
            .parameters
            .clone()
            .with(ParameterKey::MarketDemand, 115.0);
        simulator.run(&params)
    }

    fn assert_numbers_unchanged(before: &SimulationResult, after: &SimulationResult) {
        assert_eq!(before.original, after.original);
        assert_eq!(before.simulated, after.simulated);
        assert_eq!(before.key_metrics, after.key_metrics);
        assert_eq!(before.ratios, after.ratios);
        assert_eq!(before.waterfall, after.waterfall);
        assert_eq!(before.sensitivity, after.sensitivity);
        assert_eq!(before.health_score, after.health_score);
    }

    #[tokio::test]
    async fn test_provider_text_is_merged() {
        let before = simulated();
        let after =
            attach_commentary(before.clone(), &Canned, Some("board review"), Duration::from_secs(5))
                .await;

        assert_eq!(after.narrative.source, NarrativeSource::Provider);
        assert_eq!(after.narrative.analysis, format!("score {}", before.health_score));
        assert_eq!(after.narrative.suggestions, "board review");
        assert_numbers_unchanged(&before, &after);
    }

    #[tokio::test]
    async fn test_failure_keeps_fallback() {
        let before = simulated();
        let after = attach_commentary(before.clone(), &Failing, None, Duration::from_secs(5)).await;

        assert_eq!(after.narrative, before.narrative);
        assert_eq!(after.narrative.source, NarrativeSource::Fallback);
        assert_numbers_unchanged(&before, &after);
    }

    #[tokio::test]
    async fn test_timeout_keeps_fallback() {
        let before = simulated();
        let after =
            attach_commentary(before.clone(), &Stalled, None, Duration::from_millis(20)).await;

        assert_eq!(after.narrative.source, NarrativeSource::Fallback);
        assert!(after.narrative.analysis.starts_with("Market Demand: 100 → 115"));
        assert_numbers_unchanged(&before, &after);
    }

    #[tokio::test]
    async fn test_fallback_carries_note() {
        let before = simulated();
        let after = attach_commentary(
            before.clone(),
            &Failing,
            Some("supplier strike in Q3"),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(after.narrative.source, NarrativeSource::Fallback);
        assert!(after.narrative.analysis.ends_with("Scenario note: supplier strike in Q3"));
        assert_numbers_unchanged(&before, &after);
    }

    #[test]
    fn test_blank_note_is_ignored() {
        let result = simulated();
        let plain = Narrative::fallback(&CommentarySummary::from_result(&result, None));
        let blank = Narrative::fallback(&CommentarySummary::from_result(&result, Some("  ")));
        assert_eq!(plain, blank);
        assert!(!plain.analysis.contains("Scenario note"));
    }

    #[test]
    fn test_summary_percentages() {
        let result = simulated();
        let summary = CommentarySummary::from_result(&result, None);
        let expected = (result.simulated.income.revenue - 22_500_000.0) / 22_500_000.0 * 100.0;
        assert!((summary.revenue_change_pct - expected).abs() < 1e-9);
        assert_eq!(summary.scenario_note, None);
    }
}
