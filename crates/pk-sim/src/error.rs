//! Error types for driver operations.

use pk_core::PkError;
use pk_solver::SolverError;
use thiserror::Error;

/// Errors encountered while driving the analytic engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Configuration error: {0}")]
    Config(#[from] PkError),

    #[error("Interval {index} (t = {start_s} s) failed: {source}")]
    Interval {
        index: usize,
        start_s: f64,
        #[source]
        source: SolverError,
    },

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

pub type SimResult<T> = Result<T, SimError>;
