//! Error type for the fallible edges of the simulator (loading, overrides, commentary)
//!
//! The statement engine itself never fails; every formula degrades to a
//! numeric fallback instead.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("baseline is missing parameter: {0}")]
    MissingParameter(String),

    #[error("unknown statement section: {0}")]
    UnknownStatement(String),

    #[error("invalid override '{0}', expected NAME=VALUE")]
    InvalidOverride(String),

    #[error(
        "baseline does not balance: assets {assets} \
         vs liabilities + equity {liabilities_and_equity}"
    )]
    Unbalanced {
        assets: f64,
        liabilities_and_equity: f64,
    },

    #[error("commentary provider failed: {0}")]
    Commentary(String),

    #[error("commentary timed out after {0:?}")]
    CommentaryTimeout(Duration),
}

pub type Result<T> = std::result::Result<T, SimError>;
