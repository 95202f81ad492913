//! π estimation experiment
//!
//! Runs the inscribed-circle sampler once per configured sample count, in
//! order. The first failing run fails the experiment; runs already completed
//! are discarded with it.

use crate::config::CircleConfig;
use crate::coordinator::Coordinator;
use crate::executor::ParallelExecutor;
use crate::partition::{JobAssignment, SampleSpec};
use crate::sampler::circle::CircleSampler;
use crate::stats::{estimate_pi, pi_error};
use crate::SamplingError;
use std::time::Duration;

/// One run at a fixed sample count
#[derive(Debug, Clone)]
pub struct CircleRun {
    pub samples: u64,
    pub inside: u64,
    pub estimate: f64,
    pub error: f64,
    pub assignment: JobAssignment,
    pub per_job: Vec<u64>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct CircleReport {
    pub seed: Option<u64>,
    pub runs: Vec<CircleRun>,
}

pub fn run_circle(
    config: &CircleConfig,
    workers: usize,
    executor: &ParallelExecutor,
) -> Result<CircleReport, SamplingError> {
    let sampler = CircleSampler::new(config.bounds, config.batch_size)?;
    let coordinator = Coordinator::new(executor.clone().with_seed(config.seed));

    // Reject every spec before the first run starts
    let specs = config
        .sample_counts
        .iter()
        .map(|&total| SampleSpec::new(total, workers))
        .collect::<Result<Vec<_>, _>>()?;

    let mut runs = Vec::with_capacity(specs.len());
    for spec in specs {
        let outcome = coordinator.run(spec, &sampler)?;
        let estimate = estimate_pi(outcome.aggregate, spec.total_samples());
        runs.push(CircleRun {
            samples: spec.total_samples(),
            inside: outcome.aggregate,
            estimate,
            error: pi_error(estimate),
            assignment: outcome.assignment,
            per_job: outcome.per_job,
            elapsed: outcome.elapsed,
        });
    }

    Ok(CircleReport {
        seed: config.seed,
        runs,
    })
}
