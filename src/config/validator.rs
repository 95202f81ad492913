//! Configuration validation

use super::*;
use crate::partition::MAX_WORKERS;
use crate::sampler::circle::CircleSampler;
use crate::sampler::dice::DiceSampler;
use anyhow::{Context, Result};

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_workers(&config.workers)?;
    validate_dice(&config.dice)?;
    validate_circle(&config.circle)?;
    validate_trajectory(&config.trajectory)?;
    validate_output(&config.output)?;

    Ok(())
}

/// Validate worker configuration
pub fn validate_workers(workers: &WorkerConfig) -> Result<()> {
    let count = workers.resolved_workers();
    if count == 0 {
        anyhow::bail!("workers must be at least 1");
    }
    if count > MAX_WORKERS {
        anyhow::bail!("workers must be at most {}, got {}", MAX_WORKERS, count);
    }

    let available = available_parallelism();
    if count > available {
        eprintln!(
            "Warning: {} workers exceeds available parallelism ({}), jobs will share execution units",
            count, available
        );
    }

    Ok(())
}

/// Validate dice configuration
pub fn validate_dice(dice: &DiceConfig) -> Result<()> {
    if dice.total_samples == 0 {
        anyhow::bail!("dice total_samples must be at least 1");
    }

    DiceSampler::new(dice.six_probability).context("Invalid dice configuration")?;

    Ok(())
}

/// Validate circle configuration
pub fn validate_circle(circle: &CircleConfig) -> Result<()> {
    if circle.sample_counts.is_empty() {
        anyhow::bail!("circle sample_counts must list at least one count");
    }

    if let Some(pos) = circle.sample_counts.iter().position(|&n| n == 0) {
        anyhow::bail!("circle sample_counts[{}] must be at least 1", pos);
    }

    CircleSampler::new(circle.bounds, circle.batch_size).context("Invalid circle configuration")?;

    if circle.batch_size == 0 {
        if let Some(&max) = circle.sample_counts.iter().max() {
            if max > 100_000_000 {
                eprintln!(
                    "Warning: batch_size 0 holds each job in memory at once ({} samples in the largest run)",
                    max
                );
            }
        }
    }

    Ok(())
}

/// Validate trajectory configuration
pub fn validate_trajectory(trajectory: &TrajectoryConfig) -> Result<()> {
    let values = [
        ("height", trajectory.height),
        ("vx", trajectory.vx),
        ("vy", trajectory.vy),
        ("vz", trajectory.vz),
        ("gravity", trajectory.gravity),
    ];
    for (name, value) in values {
        if !value.is_finite() {
            anyhow::bail!("trajectory {} must be finite, got {}", name, value);
        }
    }

    if trajectory.gravity <= 0.0 {
        anyhow::bail!("trajectory gravity must be positive, got {}", trajectory.gravity);
    }

    if trajectory.height < 0.0 {
        anyhow::bail!("trajectory height must not be negative, got {}", trajectory.height);
    }

    if trajectory.steps == 0 {
        anyhow::bail!("trajectory steps must be at least 1");
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if let Some(ref path) = output.json {
        if path.as_os_str().is_empty() {
            anyhow::bail!("json output path must not be empty");
        }
        if path.is_dir() {
            anyhow::bail!("json output path {} is a directory", path.display());
        }
    }

    Ok(())
}
