//! Worker process launcher
//!
//! Starts the worker executable in worker mode for a single job, sends the
//! job over the child's stdin and reads the outcome from its stdout. The
//! child's stderr is passed through in debug mode and discarded otherwise.

use crate::error::SamplingError;
use crate::protocol::{self, JobMessage, Message, PROTOCOL_VERSION};
use crate::sampler::{SamplerDescriptor, WireResult};
use crate::util::time::format_duration;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

#[derive(Debug)]
pub(super) struct WorkerLauncher {
    exe: PathBuf,
    base_seed: Option<u64>,
    debug: bool,
}

impl WorkerLauncher {
    pub(super) fn new(exe: PathBuf, base_seed: Option<u64>, debug: bool) -> Self {
        Self {
            exe,
            base_seed,
            debug,
        }
    }

    fn spawn(&self) -> Result<Child, SamplingError> {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("--mode").arg("worker");
        if self.debug {
            cmd.arg("--debug");
            cmd.stderr(Stdio::inherit());
        } else {
            cmd.stderr(Stdio::null());
        }
        cmd.stdin(Stdio::piped()).stdout(Stdio::piped());

        cmd.spawn().map_err(|e| {
            SamplingError::WorkerFault(format!(
                "failed to spawn worker process {}: {}",
                self.exe.display(),
                e
            ))
        })
    }

    /// Run one job in a fresh worker process
    pub(super) fn run_job(
        &self,
        job_index: usize,
        samples: u64,
        sampler: &SamplerDescriptor,
    ) -> Result<WireResult, SamplingError> {
        let mut child = self.spawn()?;
        if self.debug {
            eprintln!("DEBUG: Job {} launched in worker process {}", job_index, child.id());
        }

        let job = Message::Job(JobMessage {
            protocol_version: PROTOCOL_VERSION,
            job_index,
            samples,
            base_seed: self.base_seed,
            sampler: sampler.clone(),
            debug: self.debug,
        });

        let sent = match child.stdin.take() {
            // Dropping stdin after the write closes the child's input
            Some(mut stdin) => protocol::write_message(&mut stdin, &job),
            None => Err(anyhow::anyhow!("worker stdin not captured")),
        };
        if let Err(e) = sent {
            let _ = child.kill();
            let _ = child.wait();
            return Err(SamplingError::WorkerFault(format!(
                "failed to send job {} to worker process: {:#}",
                job_index, e
            )));
        }

        let reply = match child.stdout.take() {
            Some(mut stdout) => protocol::read_message(&mut stdout),
            None => Err(anyhow::anyhow!("worker stdout not captured")),
        };
        let status = child.wait().map_err(|e| {
            SamplingError::WorkerFault(format!("failed to wait for worker process: {}", e))
        })?;

        let reply = reply.map_err(|e| {
            SamplingError::WorkerFault(format!(
                "worker process exited ({}) without a result: {:#}",
                status, e
            ))
        })?;

        if self.debug {
            if let Some(elapsed) = reply.sampling_time() {
                eprintln!(
                    "DEBUG: Job {} sampled for {} in worker process",
                    job_index,
                    format_duration(elapsed)
                );
            }
        }

        job_outcome(job_index, reply)
    }
}

/// Result of job `job_index` carried by a worker reply
///
/// Replies for any other job are treated as a worker fault.
fn job_outcome(job_index: usize, reply: Message) -> Result<WireResult, SamplingError> {
    match reply {
        Message::Result(result) if result.job_index == job_index => Ok(result.result),
        Message::Error(error) if error.job_index == job_index => Err(SamplingError::from(error.failure)),
        other => Err(SamplingError::WorkerFault(format!(
            "unexpected reply from worker process for job {}: {:?}",
            job_index, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerFailure;
    use crate::protocol::{ErrorMessage, ResultMessage};
    use crate::sampler::dice::DiceSampler;

    fn error_reply(job_index: usize) -> Message {
        Message::Error(ErrorMessage {
            job_index,
            failure: WorkerFailure::OutOfResources {
                requested: 10,
                reason: "capacity overflow".to_string(),
            },
            elapsed_ns: 5,
        })
    }

    fn result_reply(job_index: usize) -> Message {
        Message::Result(ResultMessage {
            job_index,
            result: WireResult::Scalar(7),
            elapsed_ns: 5,
        })
    }

    #[test]
    fn test_reply_for_own_job_accepted() {
        assert_eq!(job_outcome(3, result_reply(3)).unwrap(), WireResult::Scalar(7));

        let err = job_outcome(3, error_reply(3)).unwrap_err();
        assert!(matches!(err, SamplingError::OutOfResources { requested: 10, .. }));
    }

    #[test]
    fn test_reply_for_other_job_is_worker_fault() {
        for reply in [error_reply(2), result_reply(2)] {
            match job_outcome(3, reply).unwrap_err() {
                SamplingError::WorkerFault(msg) => assert!(msg.contains("for job 3"), "{}", msg),
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_executable_is_worker_fault() {
        let launcher = WorkerLauncher::new(
            PathBuf::from("/nonexistent/parsample-worker"),
            None,
            false,
        );
        let err = launcher
            .run_job(0, 10, &SamplerDescriptor::Dice(DiceSampler::default()))
            .unwrap_err();
        match err {
            SamplingError::WorkerFault(msg) => assert!(msg.contains("failed to spawn")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
