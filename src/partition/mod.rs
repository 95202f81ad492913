//! Work partitioning
//!
//! Splits a total sample count into one job size per worker. Every worker gets
//! `total / workers` samples and the remainder is added to the first job, so a
//! single pass produces the assignment and the sum is always preserved.
//!
//! # Example
//!
//! ```
//! use parsample::partition::{partition, SampleSpec};
//!
//! let jobs = partition(10, 4).unwrap();
//! assert_eq!(jobs.sizes(), &[4, 2, 2, 2]);
//! assert_eq!(jobs.total(), 10);
//!
//! let spec = SampleSpec::new(10_000_000, 4).unwrap();
//! assert_eq!(spec.partition().unwrap().sizes(), &[2_500_000; 4]);
//! ```

use crate::error::SamplingError;
use serde::{Deserialize, Serialize};

/// Largest accepted worker count
///
/// Far above any real pool; it keeps a mistyped count from turning into a
/// multi-terabyte job table.
pub const MAX_WORKERS: usize = 65_536;

/// Total sample count and the number of workers it is split across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSpec {
    total_samples: u64,
    worker_count: usize,
}

impl SampleSpec {
    /// Create a sample spec
    ///
    /// Fails with `InvalidSpec` when `worker_count` is zero or above
    /// [`MAX_WORKERS`]. A total smaller than the worker count is allowed; the
    /// trailing jobs are then empty.
    pub fn new(total_samples: u64, worker_count: usize) -> Result<Self, SamplingError> {
        if worker_count == 0 {
            return Err(SamplingError::InvalidSpec(
                "worker count must be at least 1".to_string(),
            ));
        }
        if worker_count > MAX_WORKERS {
            return Err(SamplingError::InvalidSpec(format!(
                "worker count {} exceeds the maximum of {}",
                worker_count, MAX_WORKERS
            )));
        }
        Ok(Self {
            total_samples,
            worker_count,
        })
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Partition this spec into job sizes
    ///
    /// Fails with `OutOfResources` if the job table cannot be allocated.
    pub fn partition(&self) -> Result<JobAssignment, SamplingError> {
        split(self.total_samples, self.worker_count)
    }
}

/// Ordered job sizes, one per worker
///
/// Immutable once built; the sum of all sizes equals the spec's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAssignment {
    sizes: Vec<u64>,
}

impl JobAssignment {
    /// Job sizes in dispatch order
    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    /// Number of jobs
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sum of all job sizes
    pub fn total(&self) -> u64 {
        self.sizes.iter().sum()
    }

    /// Iterate over `(job_index, samples)` pairs
    pub fn jobs(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.sizes.iter().copied().enumerate()
    }
}

/// Split `total_samples` across `worker_count` jobs
///
/// # Errors
///
/// Returns `InvalidSpec` if `worker_count` is zero or above [`MAX_WORKERS`].
pub fn partition(total_samples: u64, worker_count: usize) -> Result<JobAssignment, SamplingError> {
    SampleSpec::new(total_samples, worker_count)?.partition()
}

fn split(total_samples: u64, worker_count: usize) -> Result<JobAssignment, SamplingError> {
    let workers = worker_count as u64;
    let base = total_samples / workers;
    let remainder = total_samples % workers;

    let mut sizes = Vec::new();
    sizes
        .try_reserve_exact(worker_count)
        .map_err(|e| SamplingError::OutOfResources {
            requested: workers,
            reason: format!("job table for {} workers: {}", worker_count, e),
        })?;
    sizes.resize(worker_count, base);
    sizes[0] += remainder;

    Ok(JobAssignment { sizes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_even_split() {
        let jobs = partition(10_000_000, 4).unwrap();
        assert_eq!(jobs.sizes(), &[2_500_000, 2_500_000, 2_500_000, 2_500_000]);
        assert_eq!(jobs.total(), 10_000_000);
    }

    #[test]
    fn test_partition_remainder_on_first_job() {
        let jobs = partition(10, 3).unwrap();
        assert_eq!(jobs.sizes(), &[4, 3, 3]);

        let jobs = partition(100_000, 6).unwrap();
        assert_eq!(jobs.sizes()[0], 16_666 + 4);
        assert!(jobs.sizes()[1..].iter().all(|&s| s == 16_666));
    }

    #[test]
    fn test_partition_preserves_sum() {
        for total in [0u64, 1, 2, 7, 99, 100, 12_345, 1_000_003] {
            for workers in 1..=17 {
                let jobs = partition(total, workers).unwrap();
                assert_eq!(jobs.len(), workers);
                assert_eq!(jobs.total(), total, "total={} workers={}", total, workers);
            }
        }
    }

    #[test]
    fn test_partition_fewer_samples_than_workers() {
        let jobs = partition(3, 8).unwrap();
        assert_eq!(jobs.sizes(), &[3, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_partition_zero_workers_rejected() {
        let err = partition(100, 0).unwrap_err();
        assert!(matches!(err, SamplingError::InvalidSpec(_)));
    }

    #[test]
    fn test_partition_rejects_huge_worker_count() {
        let err = partition(10, usize::MAX / 4).unwrap_err();
        match err {
            SamplingError::InvalidSpec(msg) => assert!(msg.contains("exceeds the maximum")),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(SampleSpec::new(10, MAX_WORKERS + 1).is_err());
        let jobs = partition(10, MAX_WORKERS).unwrap();
        assert_eq!(jobs.len(), MAX_WORKERS);
        assert_eq!(jobs.total(), 10);
    }

    #[test]
    fn test_partition_deterministic() {
        assert_eq!(partition(1_000_001, 7).unwrap(), partition(1_000_001, 7).unwrap());
    }

    #[test]
    fn test_jobs_iterator_indexes() {
        let jobs = partition(5, 2).unwrap();
        let pairs: Vec<(usize, u64)> = jobs.jobs().collect();
        assert_eq!(pairs, vec![(0, 3), (1, 2)]);
    }
}
