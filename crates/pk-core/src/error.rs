use thiserror::Error;

pub type PkResult<T> = Result<T, PkError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PkError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch: {what} (expected={expected}, found={found})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid value for {what} at index {index}: {value}")]
    InvalidEntry {
        what: &'static str,
        index: usize,
        value: f64,
    },
}
