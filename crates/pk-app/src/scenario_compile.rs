//! Project definitions to runnable driver inputs.

use pk_core::{GroupSet, KineticsParams, KineticsState, PrecursorGroup, per_s, s, unitless};
use pk_project::schema::{
    CoreDef, InitialStateDef, PrecursorInitDef, ProgramDef, Project, ScenarioDef, SolverDef,
};
use pk_sim::{InsertionSpec, RampSpec, ReactivityProgram, Scenario};
use pk_solver::{EngineOptions, RootConfig, SumRounding};

use crate::error::{AppError, AppResult};
use crate::project_service;

/// Kinetics parameters of a core, passed through SI quantities.
pub fn compile_params(core: &CoreDef) -> AppResult<KineticsParams> {
    let groups: Vec<PrecursorGroup> = core
        .groups
        .iter()
        .map(|g| {
            PrecursorGroup::from_si(per_s(g.decay_constant_per_s), unitless(g.yield_fraction))
        })
        .collect();
    let groups = GroupSet::from_groups(&groups)?;
    Ok(KineticsParams::from_si(groups, s(core.generation_time_s))?)
}

pub fn compile_initial_state(
    initial: &InitialStateDef,
    params: &KineticsParams,
) -> AppResult<KineticsState> {
    let state = match &initial.precursors {
        PrecursorInitDef::Equilibrium => {
            KineticsState::equilibrium(params, initial.neutron_density)
        }
        PrecursorInitDef::Explicit { values } => {
            KineticsState::new(initial.neutron_density, values.clone())
        }
    };
    state.validate(params)?;
    Ok(state)
}

/// Reactivities are resolved to absolute units against the core's β.
pub fn compile_program(program: &ProgramDef, params: &KineticsParams) -> ReactivityProgram {
    let beta = params.beta_total();
    match program {
        ProgramDef::Ramp {
            slope_dollars_per_s,
            initial_reactivity,
            horizon_s,
            dt_s,
        } => {
            let rho0 = initial_reactivity.map_or(0.0, |r| r.to_absolute(beta));
            ReactivityProgram::Ramp(
                RampSpec::new(*slope_dollars_per_s, *horizon_s, *dt_s)
                    .with_initial_reactivity(rho0),
            )
        }
        ProgramDef::Insertion { reactivity, time_s } => {
            ReactivityProgram::SingleInsertion(InsertionSpec {
                reactivity: reactivity.to_absolute(beta),
                time_s: *time_s,
            })
        }
    }
}

pub fn compile_scenario(project: &Project, scenario: &ScenarioDef) -> AppResult<Scenario> {
    let core = project_service::get_core(project, &scenario.core_id)?;
    let params = compile_params(core)?;
    let initial = compile_initial_state(&scenario.initial, &params)?;
    let program = compile_program(&scenario.program, &params);

    if let ReactivityProgram::Ramp(spec) = &program {
        spec.validate()
            .map_err(|e| AppError::Compile(format!("scenario '{}': {}", scenario.id, e)))?;
    }

    tracing::debug!(
        scenario = %scenario.id,
        core = %core.id,
        groups = params.group_count(),
        program = program.label(),
        "scenario compiled"
    );

    Ok(Scenario {
        name: scenario.id.clone(),
        params,
        initial,
        program,
    })
}

pub fn engine_options(solver: &SolverDef) -> EngineOptions {
    let defaults = RootConfig::default();
    EngineOptions {
        rounding: solver
            .sum_rounding_decimals
            .map_or(SumRounding::Exact, SumRounding::Decimals),
        roots: RootConfig {
            max_schur_iterations: solver
                .max_schur_iterations
                .unwrap_or(defaults.max_schur_iterations),
            polish_iterations: solver
                .polish_iterations
                .unwrap_or(defaults.polish_iterations),
        },
        degenerate_tolerance: solver.degenerate_root_tolerance,
    }
}
