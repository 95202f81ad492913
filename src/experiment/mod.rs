//! Experiments
//!
//! Each experiment turns its configuration section into sample specs, runs
//! them through the [`Coordinator`](crate::coordinator::Coordinator) and
//! collects what the output layer needs into a report.

pub mod circle;
pub mod dice;

use crate::config::Config;
use crate::executor::ParallelExecutor;
use crate::partition::{JobAssignment, SampleSpec};
use crate::SamplingError;

pub use circle::{run_circle, CircleReport, CircleRun};
pub use dice::{run_dice, DiceReport};

/// Executor for a run of `config`, before per-experiment seeding
pub fn executor_for(config: &Config) -> ParallelExecutor {
    ParallelExecutor::new(config.workers.backend).with_debug(config.runtime.debug)
}

/// Job plans the dice experiment would run
pub fn dice_plan(config: &Config) -> Result<Vec<JobAssignment>, SamplingError> {
    let spec = SampleSpec::new(config.dice.total_samples, config.workers.resolved_workers())?;
    Ok(vec![spec.partition()?])
}

/// Job plans the circle experiment would run, one per sample count
pub fn circle_plan(config: &Config) -> Result<Vec<JobAssignment>, SamplingError> {
    let workers = config.workers.resolved_workers();
    config
        .circle
        .sample_counts
        .iter()
        .map(|&total| SampleSpec::new(total, workers)?.partition())
        .collect()
}
