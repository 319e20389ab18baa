//! Parameter vector: the named numeric inputs of one simulation run

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Conceptual grouping of parameters, used for display and summaries only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterGroup {
    Operational,
    Pricing,
    Microeconomic,
    Macroeconomic,
    FinancialMarket,
    Risk,
}

/// Generates the `ParameterVector` struct together with the `ParameterKey`
/// enum that names each field, so the two can never drift apart.
macro_rules! parameter_vector {
    ($(
        $(#[$doc:meta])*
        $field:ident => $variant:ident, $key:literal, $label:literal, $group:ident;
    )+) => {
        /// Complete set of simulation inputs for one run
        ///
        /// Values are taken as given: the engine performs no range checks.
        /// Balance and cash flow identities are exact only while every
        /// resulting line stays within `MAX_EXACT_CURRENCY` (2^47); check
        /// with `FinancialStatements::within_exact_range`.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct ParameterVector {
            $(
                $(#[$doc])*
                pub $field: f64,
            )+
        }

        /// Name of a single field of `ParameterVector`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum ParameterKey {
            $( $variant, )+
        }

        impl ParameterKey {
            /// Every parameter, in declaration order
            pub const ALL: &'static [ParameterKey] = &[ $( ParameterKey::$variant, )+ ];

            /// Wire name (camelCase), as used in JSON and CSV inputs
            pub fn name(self) -> &'static str {
                match self { $( ParameterKey::$variant => $key, )+ }
            }

            /// Human readable label
            pub fn label(self) -> &'static str {
                match self { $( ParameterKey::$variant => $label, )+ }
            }

            pub fn group(self) -> ParameterGroup {
                match self { $( ParameterKey::$variant => ParameterGroup::$group, )+ }
            }

            /// Look up a key by its wire name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $key => Some(ParameterKey::$variant), )+
                    _ => None,
                }
            }
        }

        impl ParameterVector {
            pub fn get(&self, key: ParameterKey) -> f64 {
                match key { $( ParameterKey::$variant => self.$field, )+ }
            }

            pub fn get_mut(&mut self, key: ParameterKey) -> &mut f64 {
                match key { $( ParameterKey::$variant => &mut self.$field, )+ }
            }
        }
    };
}

parameter_vector! {
    /// Production capacity utilisation (%)
    production_capacity => ProductionCapacity,
        "productionCapacity", "Production Capacity", Operational;
    /// Inventory turns per year
    inventory_turnover => InventoryTurnover, "inventoryTurnover", "Inventory Turnover", Operational;
    /// Supplier lead time (days)
    supplier_lead_time => SupplierLeadTime, "supplierLeadTime", "Supplier Lead Time", Operational;
    /// Materials share of COGS (%)
    cogs_materials_pct => CogsMaterialsPct, "cogsMaterialsPct", "COGS Materials Share", Operational;
    /// Labor share of COGS (%)
    cogs_labor_pct => CogsLaborPct, "cogsLaborPct", "COGS Labor Share", Operational;
    /// Overhead share of COGS (%)
    cogs_overhead_pct => CogsOverheadPct, "cogsOverheadPct", "COGS Overhead Share", Operational;
    /// Annual salary inflation (%)
    salary_inflation => SalaryInflation, "salaryInflation", "Salary Inflation", Operational;
    /// Headcount change (%)
    headcount_change => HeadcountChange, "headcountChange", "Headcount Change", Operational;
    /// Maintenance capital expenditure ($)
    maintenance_capex => MaintenanceCapex, "maintenanceCapex", "Maintenance Capex", Operational;
    /// Growth capital expenditure ($)
    growth_capex => GrowthCapex, "growthCapex", "Growth Capex", Operational;
    /// Depreciation on the existing asset base ($)
    depreciation => Depreciation, "depreciation", "Depreciation", Operational;
    /// Research and development spend ($)
    rnd_spend => RndSpend, "rndSpend", "R&D Spend", Operational;
    /// Receivable collection period (days)
    ar_days => ArDays, "arDays", "AR Days", Operational;
    /// Inventory holding period (days)
    inventory_days => InventoryDays, "inventoryDays", "Inventory Days", Operational;
    /// Payables period (days)
    ap_days => ApDays, "apDays", "AP Days", Operational;

    /// Average customer discount (%)
    discount => Discount, "discount", "Discount", Pricing;
    /// New product revenue as a share of baseline revenue (%)
    new_product_impact => NewProductImpact, "newProductImpact", "New Product Impact", Pricing;
    /// List price index (100 = baseline pricing)
    pricing_index => PricingIndex, "pricingIndex", "Pricing Index", Pricing;
    /// Annual customer churn (%)
    customer_churn => CustomerChurn, "customerChurn", "Customer Churn", Pricing;

    market_demand => MarketDemand, "marketDemand", "Market Demand", Microeconomic;
    competition_index => CompetitionIndex, "competitionIndex", "Competition Index", Microeconomic;
    commodity_index => CommodityIndex, "commodityIndex", "Commodity Index", Microeconomic;
    supply_disruption => SupplyDisruption, "supplyDisruption", "Supply Disruption", Microeconomic;
    freight_rates => FreightRates, "freightRates", "Freight Rates", Microeconomic;
    consumer_sentiment => ConsumerSentiment,
        "consumerSentiment", "Consumer Sentiment", Microeconomic;

    /// General inflation (%)
    inflation_rate => InflationRate, "inflationRate", "Inflation Rate", Macroeconomic;
    /// Policy interest rate (%)
    interest_rate => InterestRate, "interestRate", "Interest Rate", Macroeconomic;
    /// Unemployment rate (%)
    unemployment_rate => UnemploymentRate, "unemploymentRate", "Unemployment Rate", Macroeconomic;
    /// Real GDP growth (%)
    gdp_growth => GdpGrowth, "gdpGrowth", "GDP Growth", Macroeconomic;
    consumer_confidence => ConsumerConfidence,
        "consumerConfidence", "Consumer Confidence", Macroeconomic;
    /// Purchasing managers' index
    pmi => Pmi, "pmi", "PMI", Macroeconomic;
    /// Exchange rate (foreign currency per home unit)
    forex_rate => ForexRate, "forexRate", "Forex Rate", Macroeconomic;

    /// 10y-2y bond yield spread (percentage points)
    bond_yield_spread => BondYieldSpread, "bondYieldSpread", "Bond Yield Spread", FinancialMarket;
    /// Corporate credit spread (percentage points)
    credit_spread => CreditSpread, "creditSpread", "Credit Spread", FinancialMarket;

    /// One-off revenue shock (%), applied directly
    revenue_shock => RevenueShock, "revenueShock", "Revenue Shock", Risk;
    /// Days of operations lost to a cyber incident
    cyber_downtime_days => CyberDowntimeDays, "cyberDowntimeDays", "Cyber Downtime", Risk;
    /// ESG penalty charged to SG&A ($)
    esg_penalty => EsgPenalty, "esgPenalty", "ESG Penalty", Risk;
}

impl ParameterVector {
    pub fn set(&mut self, key: ParameterKey, value: f64) {
        *self.get_mut(key) = value;
    }

    /// Copy of this vector with a single field replaced
    pub fn with(mut self, key: ParameterKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Set a field by its wire name
    pub fn set_by_name(&mut self, name: &str, value: f64) -> Result<()> {
        let key = ParameterKey::from_name(name)
            .ok_or_else(|| SimError::UnknownParameter(name.to_string()))?;
        self.set(key, value);
        Ok(())
    }

    /// Apply a set of name -> value overrides, rejecting unknown names
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, f64>) -> Result<()> {
        for (name, &value) in overrides {
            self.set_by_name(name, value)?;
        }
        Ok(())
    }

    /// Fields whose value differs from `baseline`, in declaration order
    pub fn changes_from(&self, baseline: &ParameterVector) -> Vec<ParameterChange> {
        ParameterKey::ALL
            .iter()
            .filter(|&&key| (self.get(key) - baseline.get(key)).abs() > 1e-12)
            .map(|&key| ParameterChange {
                key,
                baseline: baseline.get(key),
                value: self.get(key),
            })
            .collect()
    }

    /// One-line description of every changed field
    pub fn summary_against(&self, baseline: &ParameterVector) -> String {
        let changes = self.changes_from(baseline);
        if changes.is_empty() {
            return "All parameters at baseline".to_string();
        }
        changes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single field moved away from its baseline value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub key: ParameterKey,
    pub baseline: f64,
    pub value: f64,
}

impl fmt::Display for ParameterChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} → {}", self.key.label(), self.baseline, self.value)
    }
}
