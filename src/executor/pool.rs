//! Fixed-size worker pool on scoped threads
//!
//! Jobs are queued on a crossbeam channel and pulled by `pool_size` scoped
//! threads. Each thread sends `(job_index, outcome)` back on a result channel;
//! the caller places results by index, which keeps job order independent of
//! completion order.

use super::CancelToken;
use crate::error::SamplingError;
use crate::partition::JobAssignment;
use crossbeam::channel;

pub(super) fn run<T, F>(
    pool_size: usize,
    jobs: &JobAssignment,
    cancel: &CancelToken,
    job_fn: F,
) -> Result<Vec<T>, SamplingError>
where
    T: Send,
    F: Fn(usize, u64) -> Result<T, SamplingError> + Sync,
{
    let (job_tx, job_rx) = channel::unbounded::<(usize, u64)>();
    for job in jobs.jobs() {
        job_tx
            .send(job)
            .map_err(|_| SamplingError::WorkerFault("job queue closed".to_string()))?;
    }
    drop(job_tx);

    let (result_tx, result_rx) = channel::unbounded::<(usize, Result<T, SamplingError>)>();
    let slots = pool_size.min(jobs.len()).max(1);

    let mut results: Vec<Option<T>> = (0..jobs.len()).map(|_| None).collect();
    let mut first_error: Option<(usize, SamplingError)> = None;

    crossbeam::thread::scope(|scope| {
        let job_fn = &job_fn;
        for _ in 0..slots {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move |_| {
                for (index, samples) in job_rx.iter() {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let outcome = job_fn(index, samples);
                    if outcome.is_err() {
                        cancel.cancel();
                    }
                    if result_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        // Single barrier: drain until every worker thread has hung up
        for (index, outcome) in result_rx.iter() {
            match outcome {
                Ok(value) => results[index] = Some(value),
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some((index, err));
                    }
                }
            }
        }
    })
    .map_err(|_| SamplingError::WorkerFault("worker pool thread panicked".to_string()))?;

    if let Some((job, err)) = first_error {
        return Err(SamplingError::executor_fault(job, err));
    }

    results
        .into_iter()
        .enumerate()
        .map(|(job, result)| {
            result.ok_or_else(|| {
                SamplingError::executor_fault(
                    job,
                    SamplingError::WorkerFault("job produced no result".to_string()),
                )
            })
        })
        .collect()
}
