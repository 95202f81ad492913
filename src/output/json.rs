//! JSON output formatting
//!
//! Machine-readable counterpart of the text report: run information (UTC
//! timestamp, host, backend, worker count, seed), the experiment's results and,
//! when per-worker output is enabled, the result of every job.

use crate::config::Config;
use crate::experiment::{CircleReport, DiceReport};
use crate::sampler::OutcomeCounts;
use crate::trajectory::{Trajectory, TrajectoryPoint};
use crate::util::time::{calculate_rate, format_duration};
use crate::Result;
use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        let micros = u64::try_from(d.as_micros()).unwrap_or(u64::MAX);
        Self {
            micros,
            human: format_duration(d),
        }
    }
}

/// Run information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRunInfo {
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub backend: String,
    pub workers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutcome {
    pub outcome: usize,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDiceJob {
    pub job: usize,
    pub samples: u64,
    /// Counts for outcomes 1-6
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDiceResults {
    pub total_samples: u64,
    pub six_probability: f64,
    pub outcomes: Vec<JsonOutcome>,
    pub duration: JsonDuration,
    pub samples_per_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_job: Option<Vec<JsonDiceJob>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCircleJob {
    pub job: usize,
    pub samples: u64,
    pub inside: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCircleRun {
    pub samples: u64,
    pub inside: u64,
    pub estimate: f64,
    pub error: f64,
    pub duration: JsonDuration,
    pub samples_per_sec: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_job: Option<Vec<JsonCircleJob>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCircleResults {
    pub runs: Vec<JsonCircleRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTrajectoryResults {
    pub height: f64,
    pub velocity: [f64; 3],
    pub gravity: f64,
    pub flight_time: f64,
    pub landing: TrajectoryPoint,
    pub samples: Vec<TrajectoryPoint>,
}

/// Results of whichever experiment ran
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "experiment", rename_all = "lowercase")]
pub enum JsonResults {
    Dice(JsonDiceResults),
    Circle(JsonCircleResults),
    Trajectory(JsonTrajectoryResults),
}

/// Complete JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub run_info: JsonRunInfo,
    pub results: JsonResults,
}

fn local_hostname() -> Option<String> {
    hostname::get().ok().and_then(|h| h.into_string().ok())
}

/// Build run information stamped with the current UTC time
pub fn build_run_info(config: &Config, seed: Option<u64>) -> JsonRunInfo {
    JsonRunInfo {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        hostname: local_hostname(),
        backend: config.workers.backend.to_string(),
        workers: config.workers.resolved_workers(),
        seed,
    }
}

fn dice_job(job: usize, counts: &OutcomeCounts) -> JsonDiceJob {
    JsonDiceJob {
        job,
        samples: counts.job_size(),
        counts: counts.slots()[1..].to_vec(),
    }
}

pub fn build_dice_report(config: &Config, report: &DiceReport) -> JsonReport {
    let outcomes = OutcomeCounts::OUTCOMES
        .map(|outcome| JsonOutcome {
            outcome,
            count: report.counts.count(outcome),
            percent: report.percent(outcome),
        })
        .collect();

    let per_job = config.output.per_worker.then(|| {
        report
            .per_job
            .iter()
            .enumerate()
            .map(|(job, counts)| dice_job(job, counts))
            .collect()
    });

    JsonReport {
        run_info: build_run_info(config, report.seed),
        results: JsonResults::Dice(JsonDiceResults {
            total_samples: report.total_samples,
            six_probability: report.six_probability,
            outcomes,
            duration: JsonDuration::from_duration(report.elapsed),
            samples_per_sec: calculate_rate(report.total_samples, report.elapsed),
            per_job,
        }),
    }
}

pub fn build_circle_report(config: &Config, report: &CircleReport) -> JsonReport {
    let runs = report
        .runs
        .iter()
        .map(|run| {
            let per_job = config.output.per_worker.then(|| {
                run.per_job
                    .iter()
                    .zip(run.assignment.sizes())
                    .enumerate()
                    .map(|(job, (&inside, &samples))| JsonCircleJob { job, samples, inside })
                    .collect()
            });
            JsonCircleRun {
                samples: run.samples,
                inside: run.inside,
                estimate: run.estimate,
                error: run.error,
                duration: JsonDuration::from_duration(run.elapsed),
                samples_per_sec: calculate_rate(run.samples, run.elapsed),
                per_job,
            }
        })
        .collect();

    JsonReport {
        run_info: build_run_info(config, report.seed),
        results: JsonResults::Circle(JsonCircleResults { runs }),
    }
}

pub fn build_trajectory_report(config: &Config, trajectory: &Trajectory) -> JsonReport {
    let launch = &config.trajectory;
    JsonReport {
        run_info: build_run_info(config, None),
        results: JsonResults::Trajectory(JsonTrajectoryResults {
            height: launch.height,
            velocity: [launch.vx, launch.vy, launch.vz],
            gravity: launch.gravity,
            flight_time: trajectory.flight_time,
            landing: trajectory.landing,
            samples: trajectory.samples.clone(),
        }),
    }
}

/// Write JSON output to file
pub fn write_json_output(output_path: &Path, report: &JsonReport, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }
    writer.flush()?;

    Ok(())
}
