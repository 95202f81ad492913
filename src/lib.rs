//! parsample - Partitioned parallel sampling engine
//!
//! Splits a Monte Carlo sampling job into near-equal per-worker jobs, runs
//! them on a fixed pool of independent workers, and reduces the per-job
//! results into one aggregate.
//!
//! # Architecture
//!
//! - **Partitioning**: [`partition`] splits a total sample count over workers
//! - **Samplers**: biased dice and inscribed-circle samplers behind one
//!   [`sampler::Sampler`] contract
//! - **Execution**: [`executor::ParallelExecutor`] with process, thread and
//!   rayon backends sharing one fail-fast policy
//! - **Aggregation**: [`stats::aggregator`] reduces results in any order
//! - **Timing**: [`util::time::TimingHarness`] measures dispatch and collection
//!
//! # Example
//!
//! ```
//! use parsample::coordinator::Coordinator;
//! use parsample::executor::{ExecutorBackend, ParallelExecutor};
//! use parsample::partition::SampleSpec;
//! use parsample::sampler::dice::DiceSampler;
//!
//! let executor = ParallelExecutor::new(ExecutorBackend::Thread).with_seed(Some(7));
//! let spec = SampleSpec::new(10_000, 4).unwrap();
//! let outcome = Coordinator::new(executor).run(spec, &DiceSampler::default()).unwrap();
//! assert_eq!(outcome.aggregate.total_outcomes(), 10_000);
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod executor;
pub mod experiment;
pub mod output;
pub mod partition;
pub mod protocol;
pub mod sampler;
pub mod stats;
pub mod trajectory;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use error::SamplingError;
pub use executor::{ExecutorBackend, ParallelExecutor};
pub use partition::{partition, JobAssignment, SampleSpec};

/// Result type used throughout parsample
pub type Result<T> = anyhow::Result<T>;
