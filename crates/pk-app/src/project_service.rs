//! Project loading, validation and introspection.

use std::path::Path;

use pk_project::schema::{CoreDef, Project, ScenarioDef};

use crate::error::{AppError, AppResult};

/// Summary of a scenario for listing.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub core_id: String,
    pub program: &'static str,
    pub group_count: usize,
}

/// Load, migrate and validate a project (YAML, or JSON by extension).
pub fn load_project(path: &Path) -> AppResult<Project> {
    let project = pk_project::load(path)?;
    tracing::debug!(
        path = %path.display(),
        cores = project.cores.len(),
        scenarios = project.scenarios.len(),
        "project loaded"
    );
    Ok(project)
}

/// Validate project structure.
pub fn validate_project(project: &Project) -> AppResult<()> {
    pk_project::validate_project(project).map_err(|e| AppError::Validation(e.to_string()))
}

/// List all scenarios in the project with summaries.
pub fn list_scenarios(project: &Project) -> Vec<ScenarioSummary> {
    project
        .scenarios
        .iter()
        .map(|scenario| ScenarioSummary {
            id: scenario.id.clone(),
            name: scenario.display_name().to_string(),
            core_id: scenario.core_id.clone(),
            program: scenario.program.kind(),
            group_count: project
                .core(&scenario.core_id)
                .map_or(0, |core| core.groups.len()),
        })
        .collect()
}

/// Get a specific scenario by ID.
pub fn get_scenario<'a>(project: &'a Project, scenario_id: &str) -> AppResult<&'a ScenarioDef> {
    project
        .scenario(scenario_id)
        .ok_or_else(|| AppError::ScenarioNotFound(scenario_id.to_string()))
}

/// Get a specific core by ID.
pub fn get_core<'a>(project: &'a Project, core_id: &str) -> AppResult<&'a CoreDef> {
    project
        .core(core_id)
        .ok_or_else(|| AppError::CoreNotFound(core_id.to_string()))
}
