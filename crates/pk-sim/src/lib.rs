//! Drivers for the analytic point-kinetics engine.
//!
//! Provides:
//! - Ramp marching: piecewise-constant (trapezoidal) reactivity, exact per interval
//! - Step insertion: one exact evaluation at any elapsed time
//! - Scenario variant type selecting between the two
//! - Parallel batch runs of independent scenarios

pub mod batch;
pub mod error;
pub mod insertion;
pub mod ramp;
pub mod scenario;

// Re-exports for public API
pub use batch::run_batch;
pub use error::{SimError, SimResult};
pub use insertion::{InsertionEvaluator, InsertionResult, InsertionSpec, evaluate_insertion};
pub use ramp::{RampMarcher, RampRecord, RampSpec, run_ramp};
pub use scenario::{ReactivityProgram, Scenario, ScenarioOutcome};
