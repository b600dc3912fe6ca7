use clap::{Parser, Subcommand};
use pk_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, RunTimingSummary,
    project_service, query, run_service,
};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "pk-cli")]
#[command(about = "Analytic point-kinetics solver for reactivity ramps and step insertions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// List scenarios in a project
    Scenarios {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Run one scenario
    Run {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Scenario ID to run
        scenario_id: String,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
        /// Also write the solution as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Run every scenario in a project, in parallel
    RunAll {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs for a scenario
    Runs {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Scenario ID to list runs for
        scenario_id: String,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export a run as CSV: time_s,n,c_1..c_N
    ExportCsv {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Scenarios { project_path } => cmd_scenarios(&project_path),
        Commands::Run {
            project_path,
            scenario_id,
            no_cache,
            csv,
        } => cmd_run(&project_path, &scenario_id, !no_cache, csv.as_deref()),
        Commands::RunAll {
            project_path,
            no_cache,
        } => cmd_run_all(&project_path, !no_cache),
        Commands::Runs {
            project_path,
            scenario_id,
        } => cmd_runs(&project_path, &scenario_id),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
        Commands::ExportCsv {
            project_path,
            run_id,
            output,
        } => cmd_export_csv(&project_path, &run_id, output.as_deref()),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_scenarios(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let scenarios = project_service::list_scenarios(&project);

    if scenarios.is_empty() {
        println!("No scenarios found in project");
    } else {
        println!("Scenarios in project:");
        for s in scenarios {
            println!(
                "  {} - {} ({}, core '{}', {} groups)",
                s.id, s.name, s.program, s.core_id, s.group_count
            );
        }
    }
    Ok(())
}

fn cmd_run(
    project_path: &Path,
    scenario_id: &str,
    use_cache: bool,
    csv: Option<&Path>,
) -> AppResult<()> {
    println!("Running scenario: {}", scenario_id);

    let request = RunRequest {
        project_path,
        scenario_id,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let mut last_stage = None;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let fraction = event
                .march
                .as_ref()
                .map(|m| m.fraction_complete)
                .unwrap_or(-1.0);
            let emit_now = last_stage != Some(event.stage)
                || (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.005)
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                if fraction >= 0.0 {
                    last_fraction = fraction;
                }
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Run completed: {}", response.run_id);
    }

    print_timing_summary(&response.timing);

    let (_manifest, records) = run_service::load_run(project_path, &response.run_id)?;
    if records.is_empty() {
        println!("  Time points: 0");
    } else {
        let summary = query::get_run_summary(&records)?;
        println!("  Time points: {}", summary.record_count);
        println!(
            "  n({:.4} s) = {:.10e}",
            summary.time_range.1, summary.final_density
        );
    }

    if let Some(path) = csv {
        let rows = pk_results::write_csv(path, &records)?;
        println!("✓ Exported {} rows to {}", rows, path.display());
    }

    Ok(())
}

fn cmd_run_all(project_path: &Path, use_cache: bool) -> AppResult<()> {
    let options = RunOptions {
        use_cache,
        ..RunOptions::default()
    };
    let started = Instant::now();
    let responses = run_service::ensure_all(project_path, &options)?;

    let mut failures = 0usize;
    for response in &responses {
        match response {
            Ok(r) => println!(
                "  ✓ {:<24} {} {}",
                r.manifest.scenario_id,
                r.run_id,
                if r.loaded_from_cache { "(cached)" } else { "" }
            ),
            Err(e) => {
                failures += 1;
                println!("  ✗ {}", e);
            }
        }
    }
    println!(
        "{} scenarios, {} failed, {:.3}s",
        responses.len(),
        failures,
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.march) {
        (RunStage::Marching, Some(m)) => {
            let width = 28usize;
            let filled = ((m.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.3}/{:.3}s  interval={}/{}  n={:.6e}  elapsed={:.1}s",
                bar,
                m.fraction_complete * 100.0,
                m.sim_time_s,
                m.end_time_s,
                m.interval,
                m.intervals,
                m.neutron_density,
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
            let _ = io::stdout().flush();
        }
    }
}

fn print_timing_summary(timing: &RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    let compile_pct = 100.0 * timing.compile_time_s / total;
    let solve_pct = 100.0 * timing.solve_time_s / total;
    let save_pct = 100.0 * timing.save_time_s / total;

    println!("\nTiming summary:");
    println!(
        "  Compile: {:.3}s ({:.1}%)",
        timing.compile_time_s, compile_pct
    );
    println!("  Solve:   {:.3}s ({:.1}%)", timing.solve_time_s, solve_pct);
    println!("  Save:    {:.3}s ({:.1}%)", timing.save_time_s, save_pct);
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    }
    println!("  Total:   {:.3}s", timing.total_time_s);
    if timing.intervals > 0 {
        println!("  Intervals: {}", timing.intervals);
    }
}

fn cmd_runs(project_path: &Path, scenario_id: &str) -> AppResult<()> {
    let runs = run_service::list_runs(project_path, scenario_id)?;

    if runs.is_empty() {
        println!("No cached runs found for scenario: {}", scenario_id);
    } else {
        println!("Cached runs for scenario '{}':", scenario_id);
        for manifest in runs {
            println!(
                "  {} ({}, {})",
                manifest.run_id,
                manifest.run_type.label(),
                manifest.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, records) = run_service::load_run(project_path, run_id)?;

    println!("\nRun Summary:");
    println!("  Scenario: {}", manifest.scenario_id);
    println!("  Core: {}", manifest.core_id);
    println!("  Type: {}", manifest.run_type.label());
    println!("  Solver version: {}", manifest.solver_version);
    if records.is_empty() {
        println!("  Time points: 0");
        return Ok(());
    }

    let summary = query::get_run_summary(&records)?;
    println!("  Time points: {}", summary.record_count);
    println!(
        "  Time range: {:.4} - {:.4} s",
        summary.time_range.0, summary.time_range.1
    );
    println!("  Precursor groups: {}", summary.group_count);
    println!("  Final n: {:.10e}", summary.final_density);
    println!(
        "  Peak n:  {:.10e} at {:.4} s",
        summary.peak_density.1, summary.peak_density.0
    );
    println!("  Min n:   {:.10e}", summary.min_density);

    Ok(())
}

fn cmd_export_csv(project_path: &Path, run_id: &str, output: Option<&Path>) -> AppResult<()> {
    if let Some(path) = output {
        let file = io::BufWriter::new(File::create(path)?);
        let rows = run_service::export_csv(project_path, run_id, file)?;
        println!("✓ Exported {} rows to {}", rows, path.display());
    } else {
        run_service::export_csv(project_path, run_id, io::stdout().lock())?;
    }

    Ok(())
}
