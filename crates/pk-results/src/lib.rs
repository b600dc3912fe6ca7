//! pk-results: run cache, timeseries storage and CSV export.

pub mod csv;
pub mod hash;
pub mod store;
pub mod types;

pub use csv::{CsvWriter, write_csv};
pub use hash::compute_run_id;
pub use store::{RecordReader, RunStore, RunWriter, now_timestamp};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("Manifest is for run {found}, writer is for run {expected}")]
    RunIdMismatch { expected: String, found: String },

    #[error("Record has {found} precursor values, expected {expected}")]
    ColumnMismatch { expected: usize, found: usize },
}
