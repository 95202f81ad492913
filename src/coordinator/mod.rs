//! Coordinator module
//!
//! Drives one sampling run end to end: partition the sample spec, dispatch the
//! jobs through the executor under the timing harness, then aggregate the
//! per-job results. Only dispatch and collection are timed.

use crate::error::SamplingError;
use crate::executor::ParallelExecutor;
use crate::partition::{JobAssignment, SampleSpec};
use crate::sampler::Sampler;
use crate::stats::aggregator::ResultAggregator;
use crate::util::time::TimingHarness;
use std::time::Duration;

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunOutcome<T> {
    pub spec: SampleSpec,
    pub assignment: JobAssignment,
    /// Per-job results in job order
    pub per_job: Vec<T>,
    pub aggregate: T,
    /// Wall-clock time of dispatch and collection
    pub elapsed: Duration,
}

/// Runs sample specs on an executor
#[derive(Debug, Clone)]
pub struct Coordinator {
    executor: ParallelExecutor,
}

impl Coordinator {
    pub fn new(executor: ParallelExecutor) -> Self {
        Self { executor }
    }

    /// Run `sampler` over `spec`
    ///
    /// Fails with `ExecutorFault` if any job fails; no aggregate is produced
    /// in that case.
    pub fn run<S: Sampler>(
        &self,
        spec: SampleSpec,
        sampler: &S,
    ) -> Result<RunOutcome<S::Output>, SamplingError> {
        let assignment = spec.partition()?;

        let timed = TimingHarness::measure(|| self.executor.run(&assignment, sampler)).transpose()?;

        let aggregator = ResultAggregator::from_ordered(timed.value);
        let aggregate = aggregator.aggregate();
        let per_job = aggregator.per_job().map(|(_, result)| result.clone()).collect();

        Ok(RunOutcome {
            spec,
            assignment,
            per_job,
            aggregate,
            elapsed: timed.elapsed,
        })
    }
}
