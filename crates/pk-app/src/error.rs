//! Error types for the pk-app service layer.

/// Application error type that wraps errors from the backend crates
/// behind one interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Core not found: {0}")]
    CoreNotFound(String),

    #[error("Scenario compilation failed: {0}")]
    Compile(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pk-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<pk_project::ProjectError> for AppError {
    fn from(err: pk_project::ProjectError) -> Self {
        match err {
            pk_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<pk_core::PkError> for AppError {
    fn from(err: pk_core::PkError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<pk_solver::SolverError> for AppError {
    fn from(err: pk_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<pk_sim::SimError> for AppError {
    fn from(err: pk_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<pk_results::ResultsError> for AppError {
    fn from(err: pk_results::ResultsError) -> Self {
        match err {
            pk_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
