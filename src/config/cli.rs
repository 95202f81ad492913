//! CLI argument parsing using clap

use crate::executor::ExecutorBackend;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionMode {
    /// Run an experiment (default)
    Run,
    /// Serve one job over stdin/stdout (started by the process backend)
    Worker,
}

/// Experiment to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Experiment {
    /// Biased die: count outcomes 1-6
    Dice,
    /// Estimate π by sampling points in a square
    Circle,
    /// Closed-form ballistic trajectory
    Trajectory,
}

/// Executor backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendType {
    /// One worker process per job
    Process,
    /// Scoped worker threads
    Thread,
    /// Rayon thread pool
    Rayon,
}

impl From<BackendType> for ExecutorBackend {
    fn from(backend: BackendType) -> Self {
        match backend {
            BackendType::Process => ExecutorBackend::Process,
            BackendType::Thread => ExecutorBackend::Thread,
            BackendType::Rayon => ExecutorBackend::Rayon,
        }
    }
}

/// parsample - partitioned parallel sampling
#[derive(Parser, Debug)]
#[command(name = "parsample")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Experiment to run
    #[arg(value_enum, value_name = "EXPERIMENT")]
    pub experiment: Option<Experiment>,

    /// Execution mode: run or worker
    #[arg(long, value_enum, default_value = "run", hide = true)]
    pub mode: ExecutionMode,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // === Worker Options ===
    /// Number of workers (default: hardware parallelism)
    #[arg(short = 'w', long, env = "PARSAMPLE_WORKERS")]
    pub workers: Option<usize>,

    /// Executor backend
    #[arg(long, value_enum, env = "PARSAMPLE_BACKEND")]
    pub backend: Option<BackendType>,

    // === Sampling Options ===
    /// Total number of dice rolls
    #[arg(long)]
    pub samples: Option<u64>,

    /// Comma-separated circle sample counts (e.g., 100000,1000000)
    #[arg(long, value_delimiter = ',')]
    pub counts: Option<Vec<u64>>,

    /// Probability of rolling a six (0.0-1.0)
    #[arg(long)]
    pub six_probability: Option<f64>,

    /// Base seed; job i is seeded with seed + i
    #[arg(long, conflicts_with = "unseeded")]
    pub seed: Option<u64>,

    /// Seed every job from OS entropy
    #[arg(long)]
    pub unseeded: bool,

    /// Circle points drawn per batch (0 = whole job at once)
    #[arg(long)]
    pub batch_size: Option<usize>,

    // === Trajectory Options ===
    /// Launch height (m)
    #[arg(long)]
    pub height: Option<f64>,

    /// Launch velocity x component (m/s)
    #[arg(long, allow_negative_numbers = true)]
    pub vx: Option<f64>,

    /// Launch velocity y component (m/s)
    #[arg(long, allow_negative_numbers = true)]
    pub vy: Option<f64>,

    /// Launch velocity z component (m/s)
    #[arg(long, allow_negative_numbers = true)]
    pub vz: Option<f64>,

    /// Gravitational acceleration (m/s²)
    #[arg(long)]
    pub gravity: Option<f64>,

    /// Number of trajectory samples
    #[arg(long)]
    pub steps: Option<usize>,

    // === Output Options ===
    /// Write a JSON report to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Show per-worker results
    #[arg(long)]
    pub per_worker_output: bool,

    // === Runtime Options ===
    /// Validate configuration and show the job plan without running
    #[arg(long)]
    pub dry_run: bool,

    /// Print debug diagnostics on stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        // Worker mode takes its job from stdin
        if self.mode == ExecutionMode::Worker {
            return Ok(());
        }

        if self.experiment.is_none() {
            anyhow::bail!("must specify an experiment: dice, circle, or trajectory");
        }

        if self.workers == Some(0) {
            anyhow::bail!("workers must be at least 1");
        }

        if let Some(p) = self.six_probability {
            if !(0.0..=1.0).contains(&p) {
                anyhow::bail!("six_probability must be between 0.0 and 1.0");
            }
        }

        if let Some(ref counts) = self.counts {
            if counts.is_empty() {
                anyhow::bail!("counts must list at least one sample count");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("parsample").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_circle_counts() {
        let cli = parse(&["circle", "--counts", "100,2000", "--backend", "thread", "-w", "3"]);
        assert_eq!(cli.experiment, Some(Experiment::Circle));
        assert_eq!(cli.counts, Some(vec![100, 2000]));
        assert_eq!(cli.backend, Some(BackendType::Thread));
        assert_eq!(cli.workers, Some(3));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_worker_mode_needs_no_experiment() {
        let cli = parse(&["--mode", "worker"]);
        assert_eq!(cli.mode, ExecutionMode::Worker);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_experiment() {
        assert!(parse(&[]).validate().is_err());
    }

    #[test]
    fn test_validate_workers() {
        assert!(parse(&["dice", "--workers", "0"]).validate().is_err());
    }

    #[test]
    fn test_validate_six_probability() {
        assert!(parse(&["dice", "--six-probability", "1.5"]).validate().is_err());
        assert!(parse(&["dice", "--six-probability", "1.0"]).validate().is_ok());
    }

    #[test]
    fn test_seed_conflicts_with_unseeded() {
        let result = Cli::try_parse_from(["parsample", "circle", "--seed", "1", "--unseeded"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_velocity() {
        let cli = parse(&["trajectory", "--vx", "-2.5"]);
        assert_eq!(cli.vx, Some(-2.5));
    }

    #[test]
    fn test_backend_conversion() {
        assert_eq!(ExecutorBackend::from(BackendType::Rayon), ExecutorBackend::Rayon);
        assert_eq!(ExecutorBackend::from(BackendType::Process), ExecutorBackend::Process);
    }
}
