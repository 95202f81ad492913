//! Result aggregation
//!
//! Reduces per-job worker results into one aggregate. The reduction only uses
//! [`Aggregate::merge`], which is associative and commutative, so the
//! aggregate is the same for any split of the work and any arrival order.
//!
//! # Example
//!
//! ```
//! use parsample::stats::aggregator::{combine, ResultAggregator};
//!
//! assert_eq!(combine(&[3u64, 4, 5]), 12);
//!
//! let aggregator = ResultAggregator::from_ordered(vec![3u64, 4]);
//! assert_eq!(aggregator.aggregate(), 7);
//! assert_eq!(aggregator.per_job().map(|(job, _)| job).collect::<Vec<_>>(), vec![0, 1]);
//! ```

use crate::sampler::{Aggregate, OutcomeCounts};
use std::collections::BTreeMap;

/// Combine worker results into a single aggregate
pub fn combine<T: Aggregate>(results: &[T]) -> T {
    results.iter().fold(T::zero(), |mut acc, result| {
        acc.merge(result);
        acc
    })
}

/// Collects per-job results and provides the aggregate and per-job views
#[derive(Debug, Clone)]
pub struct ResultAggregator<T> {
    jobs: BTreeMap<usize, T>,
}

impl<T: Aggregate> ResultAggregator<T> {
    /// Build from results in job order
    pub fn from_ordered(results: Vec<T>) -> Self {
        Self {
            jobs: results.into_iter().enumerate().collect(),
        }
    }

    /// Aggregate across all jobs
    pub fn aggregate(&self) -> T {
        self.jobs.values().fold(T::zero(), |mut acc, result| {
            acc.merge(result);
            acc
        })
    }

    /// Per-job results in job order
    pub fn per_job(&self) -> impl Iterator<Item = (usize, &T)> {
        self.jobs.iter().map(|(&id, result)| (id, result))
    }
}

impl ResultAggregator<OutcomeCounts> {
    /// True when the echoed job sizes add up to `total_samples` and every job's
    /// outcome counts add up to its job size
    pub fn is_consistent(&self, total_samples: u64) -> bool {
        self.jobs.values().all(OutcomeCounts::is_consistent)
            && self.aggregate().job_size() == total_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(slots: [u64; 7]) -> OutcomeCounts {
        OutcomeCounts::from_slots(slots)
    }

    #[test]
    fn test_combine_empty() {
        assert_eq!(combine::<u64>(&[]), 0);
        assert_eq!(combine::<OutcomeCounts>(&[]), OutcomeCounts::default());
    }

    #[test]
    fn test_combine_scalar() {
        assert_eq!(combine(&[78u64, 80, 0, 1]), 159);
    }

    #[test]
    fn test_combine_vectors_elementwise() {
        let a = counts([4, 1, 0, 1, 0, 1, 1]);
        let b = counts([3, 0, 1, 0, 1, 0, 1]);
        let total = combine(&[a, b]);
        assert_eq!(total.slots(), &[7, 1, 1, 1, 1, 1, 2]);
        assert_eq!(total.total_outcomes(), 7);
    }

    #[test]
    fn test_combine_order_independent() {
        let results = vec![
            counts([5, 1, 1, 1, 1, 0, 1]),
            counts([2, 0, 0, 0, 0, 1, 1]),
            counts([3, 1, 0, 0, 1, 0, 1]),
        ];
        let forward = combine(&results);

        let permutations = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in permutations {
            let shuffled: Vec<OutcomeCounts> = order.iter().map(|&i| results[i]).collect();
            assert_eq!(combine(&shuffled), forward);
        }

        // Grouping does not matter either
        let left = combine(&[combine(&results[..2]), results[2]]);
        let right = combine(&[results[0], combine(&results[1..])]);
        assert_eq!(left, forward);
        assert_eq!(right, forward);
    }

    #[test]
    fn test_aggregator_per_job_view() {
        let aggregator = ResultAggregator::from_ordered(vec![10u64, 20, 30]);
        assert_eq!(aggregator.aggregate(), 60);

        let jobs: Vec<(usize, u64)> = aggregator.per_job().map(|(job, &r)| (job, r)).collect();
        assert_eq!(jobs, vec![(0, 10), (1, 20), (2, 30)]);
    }

    #[test]
    fn test_aggregator_consistency_check() {
        let aggregator = ResultAggregator::from_ordered(vec![
            counts([3, 1, 1, 0, 0, 0, 1]),
            counts([2, 0, 0, 1, 0, 0, 1]),
        ]);
        assert!(aggregator.is_consistent(5));
        assert!(!aggregator.is_consistent(6));

        let broken = ResultAggregator::from_ordered(vec![counts([3, 1, 0, 0, 0, 0, 1])]);
        assert!(!broken.is_consistent(3));
    }
}
