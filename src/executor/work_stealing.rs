//! Rayon backend
//!
//! Builds a dedicated thread pool of `pool_size` threads for the run and maps
//! jobs over it with an indexed parallel iterator. Collecting into a `Result`
//! keeps job order and stops handing out jobs after the first failure.

use crate::error::SamplingError;
use crate::partition::JobAssignment;
use rayon::prelude::*;

pub(super) fn run<T, F>(pool_size: usize, jobs: &JobAssignment, job_fn: F) -> Result<Vec<T>, SamplingError>
where
    T: Send,
    F: Fn(usize, u64) -> Result<T, SamplingError> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_size)
        .thread_name(|i| format!("parsample-worker-{}", i))
        .build()
        .map_err(|e| SamplingError::WorkerFault(format!("failed to build thread pool: {}", e)))?;

    pool.install(|| {
        jobs.sizes()
            .par_iter()
            .enumerate()
            .map(|(index, &samples)| job_fn(index, samples).map_err(|err| (index, err)))
            .collect::<Result<Vec<T>, (usize, SamplingError)>>()
    })
    .map_err(|(job, err)| SamplingError::executor_fault(job, err))
}
