//! Run execution and caching service.

use std::io::Write;
use std::path::Path;
use std::time::Instant;

use pk_project::schema::{Project, ScenarioDef};
use pk_results::{
    CsvWriter, RunManifest, RunStore, RunType as ResultsRunType, RunWriter, TimeseriesRecord,
    compute_run_id, now_timestamp,
};
use pk_sim::{ReactivityProgram, Scenario, ScenarioOutcome};
use pk_solver::AnalyticEngine;

use crate::error::{AppError, AppResult};
use crate::progress::{MarchProgress, RunProgressEvent, RunStage};
use crate::{project_service, scenario_compile};

/// Ramp progress is reported this many times over a run.
const MARCH_PROGRESS_UPDATES: usize = 100;

/// Options for running scenarios.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub scenario_id: &'a str,
    pub options: RunOptions,
}

/// Timing and execution summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub solve_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
    pub intervals: usize,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

type ProgressCallback<'a> = Option<&'a mut dyn FnMut(RunProgressEvent)>;

fn emit_progress(
    progress_cb: &mut ProgressCallback,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

fn emit_march(progress_cb: &mut ProgressCallback, started: Instant, march: MarchProgress) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::marching(started.elapsed().as_secs_f64(), march));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(&mut progress_cb, RunStage::LoadingProject, started, "Loading project");

    let project = project_service::load_project(request.project_path)?;
    let scenario_def = project_service::get_scenario(&project, request.scenario_id)?;

    emit_progress(&mut progress_cb, RunStage::CheckingCache, started, "Checking run cache");

    let run_id = run_id_for(&project, scenario_def, &request.options.solver_version)?;
    let store = RunStore::for_project(request.project_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            "Loading cached run",
        );

        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();
        tracing::info!(run_id = %run_id, scenario = %scenario_def.id, "run loaded from cache");

        emit_progress(&mut progress_cb, RunStage::Completed, started, "Loaded cached run");

        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            timing,
        });
    }

    emit_progress(&mut progress_cb, RunStage::Compiling, started, "Compiling scenario");

    let compile_started = Instant::now();
    let scenario = scenario_compile::compile_scenario(&project, scenario_def)?;
    let engine = AnalyticEngine::new(scenario_compile::engine_options(&project.solver));
    timing.compile_time_s = compile_started.elapsed().as_secs_f64();

    // Records go to disk as they are produced; solve time includes that I/O.
    let solve_started = Instant::now();
    let mut writer = store.begin_run(&run_id)?;
    execute_scenario(&scenario, &engine, &mut writer, &mut progress_cb, started)?;
    timing.solve_time_s = solve_started.elapsed().as_secs_f64();
    let records = writer.rows();
    timing.intervals = match scenario.program {
        ReactivityProgram::Ramp(_) => records,
        ReactivityProgram::SingleInsertion(_) => 0,
    };

    emit_progress(&mut progress_cb, RunStage::SavingResults, started, "Saving results");

    let save_started = Instant::now();
    let manifest = build_manifest(
        &run_id,
        scenario_def,
        &scenario.program,
        &request.options.solver_version,
    );
    writer.finish(&manifest)?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    tracing::info!(
        run_id = %run_id,
        scenario = %scenario_def.id,
        records,
        total_time_s = timing.total_time_s,
        "run completed"
    );

    emit_progress(&mut progress_cb, RunStage::Completed, started, "Run completed");

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        timing,
    })
}

/// Run every scenario of a project, computing the uncached ones in parallel.
///
/// Results come back in project order; one failing scenario does not stop
/// the others.
pub fn ensure_all(
    project_path: &Path,
    options: &RunOptions,
) -> AppResult<Vec<AppResult<RunResponse>>> {
    let started = Instant::now();
    let project = project_service::load_project(project_path)?;
    let store = RunStore::for_project(project_path)?;
    let engine = AnalyticEngine::new(scenario_compile::engine_options(&project.solver));

    let mut responses: Vec<Option<AppResult<RunResponse>>> = Vec::new();
    let mut pending: Vec<(usize, String, &ScenarioDef)> = Vec::new();
    let mut scenarios: Vec<Scenario> = Vec::new();

    for (idx, scenario_def) in project.scenarios.iter().enumerate() {
        let run_id = match run_id_for(&project, scenario_def, &options.solver_version) {
            Ok(id) => id,
            Err(e) => {
                responses.push(Some(Err(e)));
                continue;
            }
        };

        if options.use_cache && store.has_run(&run_id) {
            let cached = store.load_manifest(&run_id).map(|manifest| RunResponse {
                run_id: run_id.clone(),
                manifest,
                loaded_from_cache: true,
                timing: RunTimingSummary::default(),
            });
            responses.push(Some(cached.map_err(AppError::from)));
            continue;
        }

        match scenario_compile::compile_scenario(&project, scenario_def) {
            Ok(scenario) => {
                pending.push((idx, run_id, scenario_def));
                scenarios.push(scenario);
                responses.push(None);
            }
            Err(e) => responses.push(Some(Err(e))),
        }
    }

    tracing::info!(
        total = project.scenarios.len(),
        to_run = scenarios.len(),
        "running project scenarios"
    );
    let outcomes = pk_sim::run_batch(&scenarios, &engine);

    for (((idx, run_id, scenario_def), scenario), outcome) in
        pending.into_iter().zip(&scenarios).zip(outcomes)
    {
        let result = outcome.map_err(AppError::from).and_then(|outcome| {
            let records = outcome_records(&outcome);
            let intervals = match &outcome {
                ScenarioOutcome::Ramp(r) => r.len(),
                ScenarioOutcome::SingleInsertion(_) => 0,
            };
            let manifest = build_manifest(
                &run_id,
                scenario_def,
                &scenario.program,
                &options.solver_version,
            );
            store.save_run(&manifest, &records)?;
            Ok(RunResponse {
                run_id,
                manifest,
                loaded_from_cache: false,
                timing: RunTimingSummary {
                    intervals,
                    total_time_s: started.elapsed().as_secs_f64(),
                    ..RunTimingSummary::default()
                },
            })
        });
        responses[idx] = Some(result);
    }

    Ok(responses.into_iter().flatten().collect())
}

fn run_id_for(
    project: &Project,
    scenario: &ScenarioDef,
    solver_version: &str,
) -> AppResult<String> {
    let core = project_service::get_core(project, &scenario.core_id)?;
    Ok(compute_run_id(core, scenario, &project.solver, solver_version))
}

fn build_manifest(
    run_id: &str,
    scenario_def: &ScenarioDef,
    program: &ReactivityProgram,
    solver_version: &str,
) -> RunManifest {
    let run_type = match program {
        ReactivityProgram::Ramp(spec) => ResultsRunType::Ramp {
            dt_s: spec.dt_s,
            horizon_s: spec.horizon_s,
            steps: spec.interval_count(),
        },
        ReactivityProgram::SingleInsertion(spec) => ResultsRunType::Insertion {
            time_s: spec.time_s,
        },
    };

    RunManifest {
        run_id: run_id.to_string(),
        scenario_id: scenario_def.id.clone(),
        core_id: scenario_def.core_id.clone(),
        timestamp: now_timestamp(),
        run_type,
        solver_version: solver_version.to_string(),
    }
}

/// Execute one scenario into `writer`, streaming ramp intervals as they are marched.
fn execute_scenario(
    scenario: &Scenario,
    engine: &AnalyticEngine,
    writer: &mut RunWriter,
    progress_cb: &mut ProgressCallback,
    started: Instant,
) -> AppResult<()> {
    let Some(marcher) = scenario.marcher(engine) else {
        emit_progress(progress_cb, RunStage::Evaluating, started, "Evaluating insertion");
        let outcome = scenario.run(engine)?;
        for record in outcome_records(&outcome) {
            writer.append(&record)?;
        }
        return Ok(());
    };

    let marcher = marcher?;
    let intervals = marcher.intervals();
    let end_time_s = scenario.program.end_time_s();
    let report_every = (intervals / MARCH_PROGRESS_UPDATES).max(1);

    emit_march(
        progress_cb,
        started,
        MarchProgress {
            interval: 0,
            intervals,
            sim_time_s: 0.0,
            end_time_s,
            fraction_complete: 0.0,
            neutron_density: scenario.initial.neutron_density,
        },
    );

    for record in marcher {
        let record = record?;
        let done = record.index + 1;
        if done % report_every == 0 || done == intervals {
            emit_march(
                progress_cb,
                started,
                MarchProgress {
                    interval: done,
                    intervals,
                    sim_time_s: record.time_s,
                    end_time_s,
                    fraction_complete: done as f64 / intervals as f64,
                    neutron_density: record.state.neutron_density,
                },
            );
        }
        writer.append(&TimeseriesRecord {
            time_s: record.time_s,
            reactivity: record.reactivity,
            neutron_density: record.state.neutron_density,
            precursors: record.state.precursors,
        })?;
    }

    Ok(())
}

fn outcome_records(outcome: &ScenarioOutcome) -> Vec<TimeseriesRecord> {
    match outcome {
        ScenarioOutcome::Ramp(records) => records
            .iter()
            .map(|r| TimeseriesRecord {
                time_s: r.time_s,
                reactivity: r.reactivity,
                neutron_density: r.state.neutron_density,
                precursors: r.state.precursors.clone(),
            })
            .collect(),
        ScenarioOutcome::SingleInsertion(result) => vec![TimeseriesRecord {
            time_s: result.time_s,
            reactivity: result.reactivity,
            neutron_density: result.state.neutron_density,
            precursors: result.state.precursors.clone(),
        }],
    }
}

/// Runs of one scenario, most recent first.
pub fn list_runs(project_path: &Path, scenario_id: &str) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_project(project_path)?;

    let mut runs = store.list_runs(scenario_id)?;
    runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(runs)
}

pub fn load_run(
    project_path: &Path,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TimeseriesRecord>)> {
    let store = RunStore::for_project(project_path)?;

    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;

    Ok((manifest, records))
}

/// Stream a stored run into `out` as CSV rows `time_s,n,c_1..c_N`; returns the row count.
pub fn export_csv<W: Write>(project_path: &Path, run_id: &str, out: W) -> AppResult<usize> {
    let store = RunStore::for_project(project_path)?;
    let mut records = store.records(run_id)?.peekable();
    let group_count = match records.peek() {
        Some(Ok(first)) => first.precursors.len(),
        _ => 0,
    };

    let mut writer = CsvWriter::new(out, group_count)?;
    for record in records {
        writer.write_record(&record?)?;
    }
    let rows = writer.rows();
    writer.finish()?;
    Ok(rows)
}
