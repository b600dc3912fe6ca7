//! Project validation logic.

use crate::schema::{
    CoreDef, InitialStateDef, PrecursorInitDef, ProgramDef, Project, ReactivityDef,
    ReactivityUnit, ScenarioDef, SolverDef,
};
use std::collections::{HashMap, HashSet};

/// Largest decimal count that still changes an f64.
const MAX_ROUNDING_DECIMALS: u32 = 15;

/// Relative slack when counting whole ramp steps in a horizon.
const INTERVAL_COUNT_GUARD: f64 = 1e-9;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_solver(&project.solver)?;

    let mut cores = HashMap::new();
    for core in &project.cores {
        if cores.insert(core.id.as_str(), core).is_some() {
            return Err(ValidationError::DuplicateId {
                id: core.id.clone(),
                context: "cores".to_string(),
            });
        }
        validate_core(core)?;
    }

    let mut scenario_ids = HashSet::new();
    for scenario in &project.scenarios {
        if !scenario_ids.insert(&scenario.id) {
            return Err(ValidationError::DuplicateId {
                id: scenario.id.clone(),
                context: "scenarios".to_string(),
            });
        }
        let core = cores.get(scenario.core_id.as_str()).ok_or_else(|| {
            ValidationError::MissingReference {
                id: scenario.core_id.clone(),
                context: format!("scenario '{}' core_id", scenario.id),
            }
        })?;
        validate_scenario(scenario, core)?;
    }

    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    if let Some(decimals) = solver.sum_rounding_decimals {
        if decimals > MAX_ROUNDING_DECIMALS {
            return Err(ValidationError::InvalidValue {
                field: "solver sum_rounding_decimals".to_string(),
                value: decimals.to_string(),
                reason: format!("must be at most {}", MAX_ROUNDING_DECIMALS),
            });
        }
    }

    let tol = solver.degenerate_root_tolerance;
    if !tol.is_finite() || tol < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "solver degenerate_root_tolerance".to_string(),
            value: tol.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }

    if solver.max_schur_iterations == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "solver max_schur_iterations".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(())
}

fn validate_core(core: &CoreDef) -> Result<(), ValidationError> {
    require_positive(
        core.generation_time_s,
        || format!("core '{}' generation_time_s", core.id),
    )?;

    if core.groups.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("core '{}' groups", core.id),
            value: "[]".to_string(),
            reason: "at least one precursor group is required".to_string(),
        });
    }

    for (idx, group) in core.groups.iter().enumerate() {
        require_positive(group.decay_constant_per_s, || {
            format!("core '{}' group {} decay_constant_per_s", core.id, idx + 1)
        })?;

        let beta = group.yield_fraction;
        if !beta.is_finite() || beta < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("core '{}' group {} yield_fraction", core.id, idx + 1),
                value: beta.to_string(),
                reason: "must be non-negative and finite".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_scenario(scenario: &ScenarioDef, core: &CoreDef) -> Result<(), ValidationError> {
    validate_initial(&scenario.initial, core, &scenario.id)?;

    match &scenario.program {
        ProgramDef::Ramp {
            slope_dollars_per_s,
            initial_reactivity,
            horizon_s,
            dt_s,
        } => {
            require_finite(*slope_dollars_per_s, || {
                format!("scenario '{}' slope_dollars_per_s", scenario.id)
            })?;
            require_dollar_basis(core, &scenario.id)?;
            if let Some(rho0) = initial_reactivity {
                validate_reactivity(rho0, core, &scenario.id)?;
            }
            require_positive(*dt_s, || format!("scenario '{}' dt_s", scenario.id))?;
            require_non_negative(*horizon_s, || {
                format!("scenario '{}' horizon_s", scenario.id)
            })?;
            if horizon_s / dt_s * (1.0 + INTERVAL_COUNT_GUARD) < 1.0 {
                return Err(ValidationError::InvalidValue {
                    field: format!("scenario '{}' horizon_s", scenario.id),
                    value: horizon_s.to_string(),
                    reason: format!("must cover at least one step of dt_s = {}", dt_s),
                });
            }
        }
        ProgramDef::Insertion { reactivity, time_s } => {
            validate_reactivity(reactivity, core, &scenario.id)?;
            require_non_negative(*time_s, || format!("scenario '{}' time_s", scenario.id))?;
        }
    }

    Ok(())
}

fn validate_initial(
    initial: &InitialStateDef,
    core: &CoreDef,
    scenario_id: &str,
) -> Result<(), ValidationError> {
    require_finite(initial.neutron_density, || {
        format!("scenario '{}' initial neutron_density", scenario_id)
    })?;

    if let PrecursorInitDef::Explicit { values } = &initial.precursors {
        if values.len() != core.groups.len() {
            return Err(ValidationError::InvalidValue {
                field: format!("scenario '{}' initial precursors", scenario_id),
                value: format!("{} values", values.len()),
                reason: format!(
                    "core '{}' has {} precursor groups",
                    core.id,
                    core.groups.len()
                ),
            });
        }
        for (idx, c) in values.iter().enumerate() {
            require_finite(*c, || {
                format!("scenario '{}' initial precursor {}", scenario_id, idx + 1)
            })?;
        }
    }

    Ok(())
}

fn validate_reactivity(
    reactivity: &ReactivityDef,
    core: &CoreDef,
    scenario_id: &str,
) -> Result<(), ValidationError> {
    require_finite(reactivity.value, || {
        format!("scenario '{}' reactivity value", scenario_id)
    })?;
    if reactivity.unit == ReactivityUnit::Dollars {
        require_dollar_basis(core, scenario_id)?;
    }
    Ok(())
}

/// Dollar units need a non-zero delayed fraction to convert.
fn require_dollar_basis(core: &CoreDef, scenario_id: &str) -> Result<(), ValidationError> {
    let beta = core.beta_total();
    if beta > 0.0 {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: format!("scenario '{}' reactivity unit", scenario_id),
        value: "Dollars".to_string(),
        reason: format!("core '{}' has zero total delayed fraction", core.id),
    })
}

fn require_finite(value: f64, field: impl FnOnce() -> String) -> Result<(), ValidationError> {
    if value.is_finite() {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: field(),
        value: value.to_string(),
        reason: "must be finite".to_string(),
    })
}

fn require_positive(value: f64, field: impl FnOnce() -> String) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: field(),
        value: value.to_string(),
        reason: "must be positive and finite".to_string(),
    })
}

fn require_non_negative(value: f64, field: impl FnOnce() -> String) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: field(),
        value: value.to_string(),
        reason: "must be non-negative and finite".to_string(),
    })
}
