//! parsample CLI entry point

use anyhow::{Context, Result};
use parsample::config::cli::{Cli, ExecutionMode, Experiment};
use parsample::config::toml::build_config;
use parsample::config::validator::validate_config;
use parsample::config::Config;
use parsample::experiment;
use parsample::output::{json, text};
use parsample::trajectory::{self, Launch};
use parsample::util::resource::{available_parallelism, physical_cores};
use parsample::util::time::{format_duration, Timestamp};
use parsample::worker;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();
    cli.validate()?;

    // Handle different execution modes
    match cli.mode {
        ExecutionMode::Run => run(&cli),
        ExecutionMode::Worker => worker::serve_stdio(),
    }
}

/// Run the selected experiment
fn run(cli: &Cli) -> Result<()> {
    let start = Timestamp::now();
    let config = build_config(cli)?;
    let debug = config.runtime.debug;
    if debug {
        eprintln!("DEBUG: parsample v{}", env!("CARGO_PKG_VERSION"));
        eprintln!(
            "DEBUG: {} execution units, {} physical cores",
            available_parallelism(),
            physical_cores()
        );
        eprintln!("DEBUG: Config: {:?}", config);
    }

    validate_config(&config).context("Configuration validation failed")?;

    let selected = cli.experiment.context("No experiment selected")?;
    let result = match selected {
        Experiment::Dice => run_dice(&config),
        Experiment::Circle => run_circle(&config),
        Experiment::Trajectory => run_trajectory(&config),
    };

    if debug {
        eprintln!("DEBUG: Finished in {}", format_duration(start.elapsed()));
    }
    result
}

fn run_dice(config: &Config) -> Result<()> {
    if config.runtime.dry_run {
        let plans = experiment::dice_plan(config)?;
        text::print_plan(config, &plans)?;
        return Ok(());
    }

    let executor = experiment::executor_for(config);
    let report = experiment::run_dice(&config.dice, config.workers.resolved_workers(), &executor)
        .context("Dice experiment failed")?;

    text::print_dice_report(&report, config.output.per_worker)?;
    if config.runtime.debug {
        eprintln!(
            "DEBUG: {} rolls, {}",
            report.total_samples,
            text::throughput_summary(report.total_samples, report.elapsed)
        );
    }

    if let Some(ref path) = config.output.json {
        json::write_json_output(path, &json::build_dice_report(config, &report), true)?;
    }
    Ok(())
}

fn run_circle(config: &Config) -> Result<()> {
    if config.runtime.dry_run {
        let plans = experiment::circle_plan(config)?;
        text::print_plan(config, &plans)?;
        return Ok(());
    }

    let executor = experiment::executor_for(config);
    let report = experiment::run_circle(&config.circle, config.workers.resolved_workers(), &executor)
        .context("Circle experiment failed")?;

    text::print_circle_report(&report, config.output.per_worker)?;
    if config.runtime.debug {
        for run in &report.runs {
            eprintln!(
                "DEBUG: P={}: {}",
                run.samples,
                text::throughput_summary(run.samples, run.elapsed)
            );
        }
    }

    if let Some(ref path) = config.output.json {
        json::write_json_output(path, &json::build_circle_report(config, &report), true)?;
    }
    Ok(())
}

fn run_trajectory(config: &Config) -> Result<()> {
    let params = &config.trajectory;
    if config.runtime.dry_run {
        text::print_plan(config, &[])?;
        return Ok(());
    }

    let launch = Launch {
        height: params.height,
        vx: params.vx,
        vy: params.vy,
        vz: params.vz,
    };
    let solved = trajectory::solve(launch, params.gravity, params.steps)
        .context("Trajectory solve failed")?;

    text::print_trajectory(&solved)?;

    if let Some(ref path) = config.output.json {
        json::write_json_output(path, &json::build_trajectory_report(config, &solved), true)?;
    }
    Ok(())
}
