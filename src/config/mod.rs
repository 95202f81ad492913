//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//!
//! Values are layered lowest to highest: built-in defaults, then the TOML file
//! given with `--config`, then CLI flags.

pub mod cli;
pub mod toml;
pub mod validator;

use crate::executor::ExecutorBackend;
use crate::sampler::circle::{SquareBounds, DEFAULT_BATCH_SIZE};
use crate::sampler::dice::DEFAULT_SIX_PROBABILITY;
use crate::util::resource::available_parallelism;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Base seed the circle experiment uses unless told otherwise
pub const DEFAULT_CIRCLE_SEED: u64 = 8325876;

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workers: WorkerConfig,
    #[serde(default)]
    pub dice: DiceConfig,
    #[serde(default)]
    pub circle: CircleConfig,
    #[serde(default)]
    pub trajectory: TrajectoryConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Worker pool configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of jobs per run and size of the worker pool
    ///
    /// `None` means one per hardware execution unit.
    pub workers: Option<usize>,
    /// Execution backend
    #[serde(default)]
    pub backend: ExecutorBackend,
}

impl WorkerConfig {
    /// Worker count after applying the hardware default
    pub fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(available_parallelism)
    }
}

/// Dice experiment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceConfig {
    /// Total number of rolls
    #[serde(default = "default_dice_samples")]
    pub total_samples: u64,
    /// Probability of rolling a six
    #[serde(default = "default_six_probability")]
    pub six_probability: f64,
    /// Base seed (unseeded when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_dice_samples() -> u64 {
    10_000_000
}

fn default_six_probability() -> f64 {
    DEFAULT_SIX_PROBABILITY
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            total_samples: default_dice_samples(),
            six_probability: default_six_probability(),
            seed: None,
        }
    }
}

/// Circle (π estimation) experiment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleConfig {
    /// One run per entry, in order
    #[serde(default = "default_sample_counts")]
    pub sample_counts: Vec<u64>,
    /// Base seed (unseeded when absent)
    #[serde(default = "default_circle_seed")]
    pub seed: Option<u64>,
    /// Sampling square; the circle is inscribed in it
    #[serde(default)]
    pub bounds: SquareBounds,
    /// Points drawn per batch (0 = whole job at once)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_sample_counts() -> Vec<u64> {
    vec![100_000, 1_000_000, 10_000_000, 100_000_000]
}

fn default_circle_seed() -> Option<u64> {
    Some(DEFAULT_CIRCLE_SEED)
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            sample_counts: default_sample_counts(),
            seed: default_circle_seed(),
            bounds: SquareBounds::default(),
            batch_size: default_batch_size(),
        }
    }
}

/// Trajectory solve configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryConfig {
    /// Launch height (m)
    #[serde(default = "default_height")]
    pub height: f64,
    /// Launch velocity components (m/s)
    #[serde(default = "default_horizontal_velocity")]
    pub vx: f64,
    #[serde(default = "default_horizontal_velocity")]
    pub vy: f64,
    #[serde(default = "default_vertical_velocity")]
    pub vz: f64,
    /// Gravitational acceleration (m/s²)
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    /// Number of evenly spaced trajectory samples
    #[serde(default = "default_steps")]
    pub steps: usize,
}

fn default_height() -> f64 {
    10.0
}

fn default_horizontal_velocity() -> f64 {
    1.0
}

fn default_vertical_velocity() -> f64 {
    10.0
}

fn default_gravity() -> f64 {
    9.81
}

fn default_steps() -> usize {
    300
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            vx: default_horizontal_velocity(),
            vy: default_horizontal_velocity(),
            vz: default_vertical_velocity(),
            gravity: default_gravity(),
            steps: default_steps(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON report path
    pub json: Option<PathBuf>,
    /// Print and record per-job results
    #[serde(default)]
    pub per_worker: bool,
}

/// Runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Print debug diagnostics on stderr
    #[serde(default)]
    pub debug: bool,
    /// Validate and show the plan without running any worker
    #[serde(default)]
    pub dry_run: bool,
}
