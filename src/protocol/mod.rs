//! Worker process protocol
//!
//! The process backend runs every job in a child process started from the
//! current executable in worker mode. The parent writes one `Job` message to
//! the child's stdin; the child answers with exactly one `Result` or `Error`
//! message on its stdout and exits.
//!
//! ```text
//! Executor                        Worker process
//!     |                              |
//!     |-------- JOB ---------------->|
//!     |                              |  sample(n)
//!     |<------- RESULT --------------|
//!     |           or                 |
//!     |<------- ERROR ---------------|
//! ```
//!
//! # Message Framing
//!
//! Each message is MessagePack (rmp-serde) prefixed with a 4-byte
//! little-endian length:
//!
//! ```text
//! [4 bytes: message length][N bytes: MessagePack message]
//! ```

use crate::error::WorkerFailure;
use crate::sampler::{SamplerDescriptor, WireResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::time::Duration;

/// Protocol version
///
/// Parent and worker are the same executable, but the version still guards
/// against a stale binary being picked up as the worker.
pub const PROTOCOL_VERSION: u32 = 1;

/// Upper bound for a single frame
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Protocol message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    /// Job to run (Executor → Worker)
    Job(JobMessage),

    /// Successful job result (Worker → Executor)
    Result(ResultMessage),

    /// Job failure (Worker → Executor)
    Error(ErrorMessage),
}

impl Message {
    /// Time the worker spent sampling, for `Result` and `Error` replies
    pub fn sampling_time(&self) -> Option<Duration> {
        match self {
            Message::Job(_) => None,
            Message::Result(result) => Some(Duration::from_nanos(result.elapsed_ns)),
            Message::Error(error) => Some(Duration::from_nanos(error.elapsed_ns)),
        }
    }
}

/// Job message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMessage {
    pub protocol_version: u32,

    /// Position of the job in the assignment
    pub job_index: usize,

    /// Number of trials to run
    pub samples: u64,

    /// Base seed of the run; the worker derives its own seed from it
    pub base_seed: Option<u64>,

    pub sampler: SamplerDescriptor,

    /// Emit debug diagnostics on stderr
    pub debug: bool,
}

/// Result message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage {
    pub job_index: usize,
    pub result: WireResult,

    /// Time spent sampling (nanoseconds)
    pub elapsed_ns: u64,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub job_index: usize,
    pub failure: WorkerFailure,
    pub elapsed_ns: u64,
}

/// Serialize a message with its length prefix
pub fn serialize_message(msg: &Message) -> Result<Vec<u8>> {
    let msg_bytes = rmp_serde::to_vec(msg).context("Failed to serialize message")?;

    let msg_len = u32::try_from(msg_bytes.len()).context("Message length exceeds u32")?;
    let mut framed = Vec::with_capacity(4 + msg_bytes.len());
    framed.extend_from_slice(&msg_len.to_le_bytes());
    framed.extend_from_slice(&msg_bytes);

    Ok(framed)
}

/// Read one framed message from a byte stream
pub fn read_message<R: Read>(reader: &mut R) -> Result<Message> {
    let mut len_buf = [0u8; 4];
    reader
        .read_exact(&mut len_buf)
        .context("Failed to read message length")?;

    let msg_len = u32::from_le_bytes(len_buf) as usize;
    if msg_len > MAX_MESSAGE_SIZE {
        anyhow::bail!("Message too large: {} bytes (max {})", msg_len, MAX_MESSAGE_SIZE);
    }

    let mut msg_buf = vec![0u8; msg_len];
    reader
        .read_exact(&mut msg_buf)
        .context("Failed to read message body")?;

    rmp_serde::from_slice(&msg_buf).context("Failed to deserialize message")
}

/// Write one framed message and flush
pub fn write_message<W: Write>(writer: &mut W, msg: &Message) -> Result<()> {
    let framed = serialize_message(msg)?;
    writer.write_all(&framed).context("Failed to write message")?;
    writer.flush().context("Failed to flush stream")?;
    Ok(())
}
