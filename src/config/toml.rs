//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Build the run configuration from CLI arguments
///
/// Loads the `--config` file when given, otherwise starts from defaults, then
/// applies CLI overrides.
pub fn build_config(cli: &Cli) -> Result<Config> {
    let config = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    merge_cli_with_config(cli, config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Override worker settings
    if let Some(workers) = cli.workers {
        config.workers.workers = Some(workers);
    }
    if let Some(backend) = cli.backend {
        config.workers.backend = backend.into();
    }

    // Override seeding for both samplers
    if let Some(seed) = cli.seed {
        config.dice.seed = Some(seed);
        config.circle.seed = Some(seed);
    } else if cli.unseeded {
        config.dice.seed = None;
        config.circle.seed = None;
    }

    // Override dice settings
    if let Some(samples) = cli.samples {
        config.dice.total_samples = samples;
    }
    if let Some(p) = cli.six_probability {
        config.dice.six_probability = p;
    }

    // Override circle settings
    if let Some(ref counts) = cli.counts {
        config.circle.sample_counts = counts.clone();
    }
    if let Some(batch_size) = cli.batch_size {
        config.circle.batch_size = batch_size;
    }

    // Override trajectory settings
    let trajectory = &mut config.trajectory;
    if let Some(height) = cli.height {
        trajectory.height = height;
    }
    if let Some(vx) = cli.vx {
        trajectory.vx = vx;
    }
    if let Some(vy) = cli.vy {
        trajectory.vy = vy;
    }
    if let Some(vz) = cli.vz {
        trajectory.vz = vz;
    }
    if let Some(gravity) = cli.gravity {
        trajectory.gravity = gravity;
    }
    if let Some(steps) = cli.steps {
        trajectory.steps = steps;
    }

    // Override output settings
    if let Some(ref json) = cli.json {
        config.output.json = Some(json.clone());
    }
    if cli.per_worker_output {
        config.output.per_worker = true;
    }

    // Override runtime flags
    if cli.debug {
        config.runtime.debug = true;
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }

    Ok(config)
}
