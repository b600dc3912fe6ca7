//! Shared application service layer for the point-kinetics tools.
//!
//! Centralizes project management, scenario compilation, run execution with
//! caching, and result queries so that frontends stay thin.

pub mod error;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod scenario_compile;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use progress::{MarchProgress, RunProgressEvent, RunStage};
pub use project_service::{
    ScenarioSummary, get_core, get_scenario, list_scenarios, load_project, validate_project,
};
pub use query::{RunSummary, density_series, get_run_summary, precursor_series};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_all, ensure_run,
    ensure_run_with_progress, export_csv, list_runs, load_run,
};
pub use scenario_compile::{
    compile_initial_state, compile_params, compile_program, compile_scenario, engine_options,
};
