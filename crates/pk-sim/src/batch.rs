//! Independent scenarios in parallel.

use rayon::prelude::*;

use pk_solver::AnalyticEngine;

use crate::error::SimResult;
use crate::scenario::{Scenario, ScenarioOutcome};

/// Run every scenario; results come back in input order.
///
/// Scenarios share nothing, so each one's result is identical to a serial run.
pub fn run_batch(scenarios: &[Scenario], engine: &AnalyticEngine) -> Vec<SimResult<ScenarioOutcome>> {
    tracing::info!(count = scenarios.len(), "running scenario batch");
    scenarios
        .par_iter()
        .map(|scenario| scenario.run(engine))
        .collect()
}
