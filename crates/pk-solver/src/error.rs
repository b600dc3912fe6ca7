//! Error types for the analytic engine.

use pk_core::PkError;
use thiserror::Error;

/// Errors that can occur while solving one interval.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Configuration error: {0}")]
    Config(#[from] PkError),

    #[error("Root finding failed: {what}")]
    RootFinding { what: String },

    #[error(
        "Degenerate root {re:.6e}{im:+.6e}i: |P'(r)| = {derivative:.3e}, nearest root at \
         relative distance {separation:.3e} (tolerance {tolerance:.1e}); repeated \
         eigenvalues are not supported"
    )]
    DegenerateRoot {
        re: f64,
        im: f64,
        derivative: f64,
        separation: f64,
        tolerance: f64,
    },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
