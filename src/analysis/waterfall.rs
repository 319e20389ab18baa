//! Net income bridge from the original to the simulated statements

use crate::statements::IncomeStatement;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterfallKind {
    Total,
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallEntry {
    pub name: String,
    pub value: f64,
    pub kind: WaterfallKind,
}

impl WaterfallEntry {
    fn total(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            kind: WaterfallKind::Total,
        }
    }

    /// Signed effect on net income
    fn driver(name: &str, value: f64) -> Self {
        let kind = if value > 0.0 {
            WaterfallKind::Increase
        } else {
            WaterfallKind::Decrease
        };
        Self {
            name: name.to_string(),
            value,
            kind,
        }
    }
}

/// Original net income, one entry per P&L driver, simulated net income
///
/// Expense lines enter with flipped sign: a cost increase is a net income decrease.
pub fn build(original: &IncomeStatement, simulated: &IncomeStatement) -> Vec<WaterfallEntry> {
    vec![
        WaterfallEntry::total("Original Net Income", original.net_income),
        WaterfallEntry::driver("Revenue", simulated.revenue - original.revenue),
        WaterfallEntry::driver("COGS", -(simulated.cogs - original.cogs)),
        WaterfallEntry::driver("SG&A", -(simulated.sga - original.sga)),
        WaterfallEntry::driver("R&D", -(simulated.rnd - original.rnd)),
        WaterfallEntry::driver(
            "D&A",
            -(simulated.depreciation_amortization - original.depreciation_amortization),
        ),
        WaterfallEntry::driver(
            "Interest",
            -(simulated.interest_expense - original.interest_expense),
        ),
        WaterfallEntry::driver("Tax", -(simulated.tax - original.tax)),
        WaterfallEntry::total("Simulated Net Income", simulated.net_income),
    ]
}

/// First entry plus every middle entry equals the last entry
pub fn closes(entries: &[WaterfallEntry]) -> bool {
    match entries {
        [first, middle @ .., last] => {
            first.value + middle.iter().map(|e| e.value).sum::<f64>() == last.value
        }
        _ => false,
    }
}
