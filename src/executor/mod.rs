//! Parallel executor
//!
//! Dispatches every job of a [`JobAssignment`] to a fixed pool of independent
//! workers and returns one result per job, in job order, regardless of the
//! order in which jobs finish.
//!
//! # Backends
//!
//! - **Process** (default): each job runs in its own child process started
//!   from the worker executable (`--mode worker`); at most `pool_size`
//!   children are alive at once
//! - **Thread**: a scoped pool of `pool_size` threads pulling jobs from a
//!   channel
//! - **Rayon**: a dedicated rayon thread pool of `pool_size` threads running an
//!   order-preserving parallel map
//!
//! Workers never share memory or random state; each job builds its own
//! generator from the run's base seed and its job index, so a seeded run gives
//! the same results on every backend.
//!
//! # Failure Policy
//!
//! The first failure observed from any job fails the whole run with
//! `ExecutorFault` wrapping that failure. Jobs that have not started yet are
//! cancelled and results of completed jobs are discarded.
//!
//! # Example
//!
//! ```
//! use parsample::executor::{ExecutorBackend, ParallelExecutor};
//! use parsample::partition::partition;
//! use parsample::sampler::circle::CircleSampler;
//!
//! let jobs = partition(10_000, 4).unwrap();
//! let executor = ParallelExecutor::new(ExecutorBackend::Thread)
//!     .with_pool_size(2)
//!     .with_seed(Some(1));
//! let results = executor.run(&jobs, &CircleSampler::default()).unwrap();
//! assert_eq!(results.len(), 4);
//! ```

mod pool;
mod process;
mod work_stealing;

use crate::error::SamplingError;
use crate::partition::JobAssignment;
use crate::sampler::{Aggregate, Sampler};
use crate::util::resource::available_parallelism;
use crate::worker::SampleWorker;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Execution backend for worker jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorBackend {
    /// One OS process per job
    #[default]
    Process,
    /// Scoped worker threads
    Thread,
    /// Rayon thread pool
    Rayon,
}

impl fmt::Display for ExecutorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutorBackend::Process => "process",
            ExecutorBackend::Thread => "thread",
            ExecutorBackend::Rayon => "rayon",
        };
        f.write_str(name)
    }
}

/// Cooperative cancellation flag shared by the jobs of one run
///
/// Once set, workers stop picking up new jobs. Jobs already running finish
/// normally.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Runs job assignments on a fixed-size worker pool
#[derive(Debug, Clone)]
pub struct ParallelExecutor {
    backend: ExecutorBackend,
    pool_size: usize,
    base_seed: Option<u64>,
    debug: bool,
    worker_exe: Option<PathBuf>,
}

impl ParallelExecutor {
    /// Create an executor with one pool slot per hardware execution unit
    pub fn new(backend: ExecutorBackend) -> Self {
        Self {
            backend,
            pool_size: available_parallelism(),
            base_seed: None,
            debug: false,
            worker_exe: None,
        }
    }

    /// Override the pool size
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Seed jobs deterministically from `seed` (job `i` uses `seed + i`)
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Executable started for process-backend jobs
    ///
    /// Defaults to the currently running executable.
    pub fn with_worker_exe(mut self, path: impl Into<PathBuf>) -> Self {
        self.worker_exe = Some(path.into());
        self
    }

    pub fn backend(&self) -> ExecutorBackend {
        self.backend
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn base_seed(&self) -> Option<u64> {
        self.base_seed
    }

    /// Run `sampler` once per job and collect the results in job order
    ///
    /// # Errors
    ///
    /// - `InvalidSpec` before anything is dispatched when the pool is empty or
    ///   the sampler cannot run on the selected backend
    /// - `ExecutorFault` wrapping the first failure observed from a job
    pub fn run<S: Sampler>(
        &self,
        jobs: &JobAssignment,
        sampler: &S,
    ) -> Result<Vec<S::Output>, SamplingError> {
        if self.pool_size == 0 {
            return Err(SamplingError::InvalidSpec(
                "executor pool size must be at least 1".to_string(),
            ));
        }

        if self.debug {
            eprintln!(
                "DEBUG: Dispatching {} jobs ({} samples) to {} {} workers",
                jobs.len(),
                jobs.total(),
                self.pool_size.min(jobs.len()),
                self.backend
            );
        }

        let cancel = CancelToken::new();
        let base_seed = self.base_seed;
        let debug = self.debug;

        match self.backend {
            ExecutorBackend::Thread => pool::run(self.pool_size, jobs, &cancel, |job, samples| {
                let result = SampleWorker::new(job, samples, base_seed).run(sampler);
                log_job(debug, job, samples, &result);
                result
            }),
            ExecutorBackend::Rayon => work_stealing::run(self.pool_size, jobs, |job, samples| {
                let result = SampleWorker::new(job, samples, base_seed).run(sampler);
                log_job(debug, job, samples, &result);
                result
            }),
            ExecutorBackend::Process => {
                let descriptor = sampler.descriptor().ok_or_else(|| {
                    SamplingError::InvalidSpec(
                        "sampler cannot be described to a worker process".to_string(),
                    )
                })?;
                let worker_exe = match &self.worker_exe {
                    Some(path) => path.clone(),
                    None => std::env::current_exe().map_err(|e| {
                        SamplingError::InvalidSpec(format!(
                            "cannot locate worker executable: {}",
                            e
                        ))
                    })?,
                };
                let launcher = process::WorkerLauncher::new(worker_exe, base_seed, debug);
                pool::run(self.pool_size, jobs, &cancel, |job, samples| {
                    let result = launcher
                        .run_job(job, samples, &descriptor)
                        .and_then(S::Output::from_wire);
                    log_job(debug, job, samples, &result);
                    result
                })
            }
        }
    }
}

fn log_job<T>(debug: bool, job: usize, samples: u64, result: &Result<T, SamplingError>) {
    if !debug {
        return;
    }
    match result {
        Ok(_) => eprintln!("DEBUG: Job {} finished ({} samples)", job, samples),
        Err(e) => eprintln!("DEBUG: Job {} failed: {}", job, e),
    }
}
