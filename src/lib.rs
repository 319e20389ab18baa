//! Financial Simulator - Three-statement simulation engine
//!
//! This library provides:
//! - A deterministic statement engine mapping 37 business parameters onto an
//!   income statement, balance sheet and cash flow statement
//! - Baseline loading from CSV with balance validation
//! - Ratios, a composite health score, sensitivity probes and a net income bridge
//! - Async narrative commentary with timeout and deterministic fallback

pub mod error;
pub mod numeric;
pub mod parameters;
pub mod baseline;
pub mod statements;
pub mod analysis;
pub mod explain;
pub mod result;
pub mod simulator;
pub mod commentary;

// Re-export commonly used types
pub use error::{Result, SimError};
pub use parameters::{ParameterKey, ParameterVector};
pub use baseline::Baseline;
pub use statements::{FinancialStatements, StatementEngine};
pub use result::SimulationResult;
pub use simulator::Simulator;
pub use commentary::{attach_commentary, CommentaryProvider, Narrative};
