//! Sample worker
//!
//! A `SampleWorker` runs exactly one job: it builds the job's private random
//! source, runs the sampler for the job's sample count and hands back the
//! worker-local result. Workers share nothing with each other; the executor
//! only sees the returned value or error.
//!
//! A panic inside a sampler is caught and reported as a `WorkerFault` so that
//! in-process backends can apply the same fail-fast policy as the process
//! backend.
//!
//! # Worker Processes
//!
//! [`serve`] is the entry point of a worker process (`--mode worker`). It
//! reads one job from its input, runs it and writes the outcome back using the
//! framing in [`crate::protocol`].
//!
//! # Example
//!
//! ```
//! use parsample::worker::SampleWorker;
//! use parsample::sampler::dice::DiceSampler;
//!
//! let worker = SampleWorker::new(0, 1_000, Some(42));
//! let counts = worker.run(&DiceSampler::default()).unwrap();
//! assert_eq!(counts.total_outcomes(), 1_000);
//! ```

use crate::error::{SamplingError, WorkerFailure};
use crate::protocol::{self, ErrorMessage, Message, ResultMessage, PROTOCOL_VERSION};
use crate::sampler::{job_rng, Sampler, SamplerDescriptor, WireResult};
use crate::util::time::Timestamp;
use crate::Result;
use anyhow::Context;
use std::any::Any;
use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};

/// Executes a single job
#[derive(Debug, Clone, Copy)]
pub struct SampleWorker {
    job_index: usize,
    samples: u64,
    base_seed: Option<u64>,
}

impl SampleWorker {
    /// Create a worker for job `job_index` running `samples` trials
    pub fn new(job_index: usize, samples: u64, base_seed: Option<u64>) -> Self {
        Self {
            job_index,
            samples,
            base_seed,
        }
    }

    /// Run `sampler` for this job
    pub fn run<S: Sampler + ?Sized>(&self, sampler: &S) -> std::result::Result<S::Output, SamplingError> {
        let mut rng = job_rng(self.base_seed, self.job_index);
        let samples = self.samples;
        panic::catch_unwind(AssertUnwindSafe(|| sampler.sample(samples, &mut rng)))
            .map_err(|payload| {
                SamplingError::WorkerFault(format!("worker panicked: {}", panic_message(&*payload)))
            })?
    }

    /// Run a sampler described by `descriptor`, encoding the result
    pub fn run_descriptor(
        &self,
        descriptor: &SamplerDescriptor,
    ) -> std::result::Result<WireResult, SamplingError> {
        descriptor.validate()?;
        let mut rng = job_rng(self.base_seed, self.job_index);
        let samples = self.samples;
        panic::catch_unwind(AssertUnwindSafe(|| descriptor.sample_wire(samples, &mut rng)))
            .map_err(|payload| {
                SamplingError::WorkerFault(format!("worker panicked: {}", panic_message(&*payload)))
            })?
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Serve one job read from `input`, writing the outcome to `output`
///
/// A sampling failure is reported to the executor as an `Error` message and
/// is not an error of this function; only protocol failures are.
pub fn serve<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<()> {
    let job = match protocol::read_message(input).context("Failed to read job")? {
        Message::Job(job) => job,
        other => anyhow::bail!("Expected a job message, got {:?}", other),
    };

    if job.protocol_version != PROTOCOL_VERSION {
        anyhow::bail!(
            "Protocol version mismatch: executor speaks {}, worker speaks {}",
            job.protocol_version,
            PROTOCOL_VERSION
        );
    }

    if job.debug {
        eprintln!(
            "DEBUG: Worker process {} running job {} ({} {} samples)",
            std::process::id(),
            job.job_index,
            job.samples,
            job.sampler.name()
        );
    }

    let start = Timestamp::now();
    let worker = SampleWorker::new(job.job_index, job.samples, job.base_seed);
    let outcome = worker.run_descriptor(&job.sampler);
    let elapsed_ns = start.elapsed_nanos();

    let reply = match outcome {
        Ok(result) => Message::Result(ResultMessage {
            job_index: job.job_index,
            result,
            elapsed_ns,
        }),
        Err(err) => {
            if job.debug {
                eprintln!("DEBUG: Job {} failed: {}", job.job_index, err);
            }
            Message::Error(ErrorMessage {
                job_index: job.job_index,
                failure: WorkerFailure::from(&err),
                elapsed_ns,
            })
        }
    };

    protocol::write_message(output, &reply).context("Failed to send job outcome")
}

/// Worker process entry point: serve one job over stdin/stdout
pub fn serve_stdio() -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(&mut stdin.lock(), &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::JobMessage;
    use crate::sampler::circle::{CircleSampler, SquareBounds};
    use crate::sampler::dice::DiceSampler;
    use crate::sampler::{OutcomeCounts, WorkerRng};
    use std::io::Cursor;

    struct PanickingSampler;

    impl Sampler for PanickingSampler {
        type Output = u64;

        fn sample(&self, _n: u64, _rng: &mut WorkerRng) -> std::result::Result<u64, SamplingError> {
            panic!("boom");
        }
    }

    fn job_bytes(samples: u64, sampler: SamplerDescriptor) -> Vec<u8> {
        let msg = Message::Job(JobMessage {
            protocol_version: PROTOCOL_VERSION,
            job_index: 4,
            samples,
            base_seed: Some(1),
            sampler,
            debug: false,
        });
        protocol::serialize_message(&msg).unwrap()
    }

    #[test]
    fn test_worker_runs_sampler() {
        let worker = SampleWorker::new(1, 5_000, Some(9));
        let counts: OutcomeCounts = worker.run(&DiceSampler::default()).unwrap();
        assert_eq!(counts.job_size(), 5_000);
        assert!(counts.is_consistent());
    }

    #[test]
    fn test_worker_seeded_matches_descriptor_path() {
        let worker = SampleWorker::new(2, 10_000, Some(77));
        let sampler = CircleSampler::default();
        let direct = worker.run(&sampler).unwrap();
        let wire = worker.run_descriptor(&SamplerDescriptor::Circle(sampler)).unwrap();
        assert_eq!(wire, WireResult::Scalar(direct));
    }

    #[test]
    fn test_worker_panic_becomes_fault() {
        let worker = SampleWorker::new(0, 10, None);
        let err = worker.run(&PanickingSampler).unwrap_err();
        match err {
            SamplingError::WorkerFault(msg) => assert!(msg.contains("boom")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_serve_replies_with_result() {
        let input = job_bytes(1_000, SamplerDescriptor::Dice(DiceSampler::default()));
        let mut output = Vec::new();
        serve(&mut Cursor::new(input), &mut output).unwrap();

        match protocol::read_message(&mut Cursor::new(output)).unwrap() {
            Message::Result(result) => {
                assert_eq!(result.job_index, 4);
                let counts = match result.result {
                    WireResult::Counts(slots) => OutcomeCounts::from_slots(slots),
                    other => panic!("unexpected result: {:?}", other),
                };
                assert_eq!(counts.job_size(), 1_000);
                assert!(counts.is_consistent());
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_serve_reports_out_of_resources() {
        let sampler = CircleSampler::new(SquareBounds::UNIT, 0).unwrap();
        let input = job_bytes(u64::MAX / 2, SamplerDescriptor::Circle(sampler));
        let mut output = Vec::new();
        serve(&mut Cursor::new(input), &mut output).unwrap();

        match protocol::read_message(&mut Cursor::new(output)).unwrap() {
            Message::Error(err) => {
                assert_eq!(err.job_index, 4);
                assert!(matches!(err.failure, WorkerFailure::OutOfResources { .. }));
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_serve_rejects_version_mismatch() {
        let msg = Message::Job(JobMessage {
            protocol_version: PROTOCOL_VERSION + 1,
            job_index: 0,
            samples: 1,
            base_seed: None,
            sampler: SamplerDescriptor::Dice(DiceSampler::default()),
            debug: false,
        });
        let input = protocol::serialize_message(&msg).unwrap();
        let mut output = Vec::new();
        assert!(serve(&mut Cursor::new(input), &mut output).is_err());
        assert!(output.is_empty());
    }
}
