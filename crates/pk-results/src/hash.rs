//! Content-based hashing for run IDs.

use pk_project::schema::{CoreDef, ScenarioDef, SolverDef};
use sha2::{Digest, Sha256};

/// Hash everything that determines a run's output.
pub fn compute_run_id(
    core: &CoreDef,
    scenario: &ScenarioDef,
    solver: &SolverDef,
    solver_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    let core_json = serde_json::to_string(core).unwrap_or_default();
    hasher.update(core_json.as_bytes());

    // Display name is a label only
    let inputs_json = serde_json::to_string(&(&scenario.id, &scenario.initial, &scenario.program))
        .unwrap_or_default();
    hasher.update(inputs_json.as_bytes());

    let solver_json = serde_json::to_string(solver).unwrap_or_default();
    hasher.update(solver_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
