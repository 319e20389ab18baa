//! Simulation parameters and scenario loading

mod data;
pub mod loader;

pub use data::{ParameterChange, ParameterGroup, ParameterKey, ParameterVector};
pub use loader::{load_overrides, load_scenarios, parse_assignment, parse_overrides, Scenario};
