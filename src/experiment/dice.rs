//! Biased dice experiment

use crate::config::DiceConfig;
use crate::coordinator::Coordinator;
use crate::executor::ParallelExecutor;
use crate::partition::{JobAssignment, SampleSpec};
use crate::sampler::dice::DiceSampler;
use crate::sampler::OutcomeCounts;
use crate::stats::aggregator::ResultAggregator;
use crate::SamplingError;
use std::time::Duration;

/// Outcome of one dice run
#[derive(Debug, Clone)]
pub struct DiceReport {
    pub total_samples: u64,
    pub six_probability: f64,
    pub seed: Option<u64>,
    pub assignment: JobAssignment,
    pub counts: OutcomeCounts,
    pub per_job: Vec<OutcomeCounts>,
    pub elapsed: Duration,
}

impl DiceReport {
    /// Share of `outcome` in percent of all rolls
    pub fn percent(&self, outcome: usize) -> f64 {
        self.counts.percent(outcome, self.total_samples)
    }
}

/// Roll `config.total_samples` dice split over `workers` jobs
pub fn run_dice(
    config: &DiceConfig,
    workers: usize,
    executor: &ParallelExecutor,
) -> Result<DiceReport, SamplingError> {
    let spec = SampleSpec::new(config.total_samples, workers)?;
    let sampler = DiceSampler::new(config.six_probability)?;

    let coordinator = Coordinator::new(executor.clone().with_seed(config.seed));
    let outcome = coordinator.run(spec, &sampler)?;

    check_counts(&outcome.assignment, &outcome.per_job)?;

    Ok(DiceReport {
        total_samples: spec.total_samples(),
        six_probability: sampler.six_probability(),
        seed: config.seed,
        assignment: outcome.assignment,
        counts: outcome.aggregate,
        per_job: outcome.per_job,
        elapsed: outcome.elapsed,
    })
}

/// Check that every job rolled exactly the samples it was assigned
///
/// A mismatch is reported as an `ExecutorFault` of the first job whose counts
/// disagree with its assignment.
fn check_counts(assignment: &JobAssignment, per_job: &[OutcomeCounts]) -> Result<(), SamplingError> {
    let aggregator = ResultAggregator::from_ordered(per_job.to_vec());
    if per_job.len() == assignment.len() && aggregator.is_consistent(assignment.total()) {
        return Ok(());
    }

    let job = per_job
        .iter()
        .zip(assignment.sizes())
        .position(|(counts, &size)| !counts.is_consistent() || counts.job_size() != size)
        .unwrap_or(0);
    let rolled = aggregator.aggregate().total_outcomes();
    Err(SamplingError::executor_fault(
        job,
        SamplingError::WorkerFault(format!(
            "inconsistent dice counts: {} rolls reported for {} samples",
            rolled,
            assignment.total()
        )),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutorBackend;
    use crate::partition::partition;

    fn executor() -> ParallelExecutor {
        ParallelExecutor::new(ExecutorBackend::Thread).with_pool_size(2)
    }

    #[test]
    fn test_dice_report() {
        let config = DiceConfig {
            total_samples: 60_001,
            six_probability: 0.25,
            seed: Some(11),
        };
        let report = run_dice(&config, 3, &executor()).unwrap();

        assert_eq!(report.total_samples, 60_001);
        assert_eq!(report.assignment.sizes(), &[20_001, 20_000, 20_000]);
        assert_eq!(report.per_job.len(), 3);
        assert_eq!(report.counts.total_outcomes(), 60_001);

        let total_percent: f64 = (1..=6).map(|o| report.percent(o)).sum();
        assert!((total_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_dice_seeded_reproducible() {
        let config = DiceConfig {
            total_samples: 10_000,
            six_probability: 0.5,
            seed: Some(42),
        };
        let a = run_dice(&config, 4, &executor()).unwrap();
        let b = run_dice(&config, 4, &ParallelExecutor::new(ExecutorBackend::Rayon).with_pool_size(3)).unwrap();
        assert_eq!(a.counts, b.counts);
        assert_eq!(a.per_job, b.per_job);
    }

    #[test]
    fn test_check_counts_accepts_matching_jobs() {
        let assignment = partition(5, 2).unwrap();
        let per_job = vec![
            OutcomeCounts::from_slots([3, 1, 1, 0, 0, 0, 1]),
            OutcomeCounts::from_slots([2, 0, 0, 1, 0, 0, 1]),
        ];
        assert!(check_counts(&assignment, &per_job).is_ok());
    }

    #[test]
    fn test_check_counts_blames_short_job() {
        let assignment = partition(5, 2).unwrap();
        let per_job = vec![
            OutcomeCounts::from_slots([3, 1, 1, 0, 0, 0, 1]),
            // Echoes its size but rolled one die too few
            OutcomeCounts::from_slots([2, 0, 0, 1, 0, 0, 0]),
        ];

        match check_counts(&assignment, &per_job).unwrap_err() {
            SamplingError::ExecutorFault { job, source } => {
                assert_eq!(job, 1);
                match *source {
                    SamplingError::WorkerFault(msg) => {
                        assert!(msg.contains("4 rolls reported for 5 samples"), "{}", msg)
                    }
                    other => panic!("unexpected source: {:?}", other),
                }
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_check_counts_blames_wrong_job_size() {
        let assignment = partition(6, 2).unwrap();
        let per_job = vec![
            OutcomeCounts::from_slots([2, 1, 1, 0, 0, 0, 0]),
            OutcomeCounts::from_slots([3, 1, 1, 1, 0, 0, 0]),
        ];
        let err = check_counts(&assignment, &per_job).unwrap_err();
        assert!(matches!(err, SamplingError::ExecutorFault { job: 0, .. }));
    }

    #[test]
    fn test_dice_rejects_bad_probability() {
        let config = DiceConfig {
            total_samples: 10,
            six_probability: 2.0,
            seed: None,
        };
        assert!(matches!(
            run_dice(&config, 1, &executor()),
            Err(SamplingError::InvalidSpec(_))
        ));
    }
}
