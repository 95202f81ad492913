//! Error taxonomy for sampling runs
//!
//! Three classes of failure exist:
//!
//! - **InvalidSpec**: a malformed partition or sampler request, detected
//!   before any worker is dispatched
//! - **OutOfResources**: a worker could not complete its batch (for example
//!   the trial buffers could not be allocated)
//! - **ExecutorFault**: the run failed because one of its jobs failed; wraps
//!   the first error observed from a worker
//!
//! `WorkerFault` covers worker-side failures that are not resource related:
//! panics, crashed worker processes and protocol errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the sampling engine
#[derive(Debug, Error)]
pub enum SamplingError {
    /// Malformed sample spec or sampler parameters
    #[error("invalid sample spec: {0}")]
    InvalidSpec(String),

    /// A worker could not obtain the resources for its batch
    #[error("out of resources: cannot allocate buffers for {requested} trials ({reason})")]
    OutOfResources { requested: u64, reason: String },

    /// Any other worker-side failure
    #[error("worker fault: {0}")]
    WorkerFault(String),

    /// A job failed; the whole run is discarded
    #[error("executor fault in job {job}: {source}")]
    ExecutorFault {
        job: usize,
        #[source]
        source: Box<SamplingError>,
    },
}

impl SamplingError {
    /// Wrap a worker error as the fault of job `job`
    pub fn executor_fault(job: usize, source: SamplingError) -> Self {
        SamplingError::ExecutorFault {
            job,
            source: Box::new(source),
        }
    }

    /// The innermost worker error for an `ExecutorFault`, or `self`
    pub fn root_cause(&self) -> &SamplingError {
        match self {
            SamplingError::ExecutorFault { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Worker failure as carried across the process boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerFailure {
    OutOfResources { requested: u64, reason: String },
    Fault(String),
}

impl From<&SamplingError> for WorkerFailure {
    fn from(err: &SamplingError) -> Self {
        match err {
            SamplingError::OutOfResources { requested, reason } => WorkerFailure::OutOfResources {
                requested: *requested,
                reason: reason.clone(),
            },
            other => WorkerFailure::Fault(other.to_string()),
        }
    }
}

impl From<WorkerFailure> for SamplingError {
    fn from(failure: WorkerFailure) -> Self {
        match failure {
            WorkerFailure::OutOfResources { requested, reason } => {
                SamplingError::OutOfResources { requested, reason }
            }
            WorkerFailure::Fault(msg) => SamplingError::WorkerFault(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_executor_fault_exposes_source() {
        let err = SamplingError::executor_fault(
            2,
            SamplingError::OutOfResources {
                requested: 10,
                reason: "capacity overflow".to_string(),
            },
        );

        assert!(err.to_string().contains("job 2"));
        let source = err.source().unwrap();
        assert!(source.to_string().contains("out of resources"));
        assert!(matches!(err.root_cause(), SamplingError::OutOfResources { requested: 10, .. }));
    }

    #[test]
    fn test_worker_failure_conversion_keeps_resource_errors() {
        let err = SamplingError::OutOfResources {
            requested: 7,
            reason: "nope".to_string(),
        };
        let failure = WorkerFailure::from(&err);
        assert_eq!(
            failure,
            WorkerFailure::OutOfResources {
                requested: 7,
                reason: "nope".to_string()
            }
        );

        let back = SamplingError::from(failure);
        assert!(matches!(back, SamplingError::OutOfResources { requested: 7, .. }));
    }

    #[test]
    fn test_other_errors_become_faults() {
        let err = SamplingError::WorkerFault("panicked".to_string());
        let failure = WorkerFailure::from(&err);
        assert!(matches!(failure, WorkerFailure::Fault(ref msg) if msg.contains("panicked")));
    }
}
