//! Inscribed-circle sampler
//!
//! Draws points uniformly from a square and counts the ones whose distance to
//! the square's center is at most the inscribed circle's radius. Points on the
//! boundary count as inside. With the unit square the expected fraction inside
//! is π/4.
//!
//! # Batching
//!
//! Coordinates are generated into two buffers of `batch_size` points that are
//! reused across the job. A batch size of 0 generates the whole job in a single
//! batch. Buffers are reserved fallibly, so a job too large to hold in memory
//! fails with `OutOfResources` instead of aborting the process.

use super::{Sampler, SamplerDescriptor, WorkerRng};
use crate::error::SamplingError;
use rand::distributions::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Default number of points generated per batch
pub const DEFAULT_BATCH_SIZE: usize = 65_536;

/// Axis-aligned square the points are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquareBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl SquareBounds {
    /// The unit square [0, 1] × [0, 1]
    pub const UNIT: SquareBounds = SquareBounds {
        x_min: 0.0,
        x_max: 1.0,
        y_min: 0.0,
        y_max: 1.0,
    };

    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Radius of the inscribed circle
    pub fn radius(&self) -> f64 {
        (self.x_max - self.x_min) / 2.0
    }

    /// True when `(x, y)` lies in the inscribed circle, boundary included
    pub fn contains_in_circle(&self, x: f64, y: f64) -> bool {
        let (cx, cy) = self.center();
        let r = self.radius();
        (x - cx) * (x - cx) + (y - cy) * (y - cy) <= r * r
    }

    pub fn validate(&self) -> Result<(), SamplingError> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(SamplingError::InvalidSpec("bounds must be finite".to_string()));
        }
        if self.x_min >= self.x_max || self.y_min >= self.y_max {
            return Err(SamplingError::InvalidSpec(format!(
                "bounds must have min < max, got x=[{}, {}] y=[{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        let width = self.x_max - self.x_min;
        let height = self.y_max - self.y_min;
        if (width - height).abs() > f64::EPSILON * width.max(height) * 4.0 {
            return Err(SamplingError::InvalidSpec(format!(
                "bounds must be square, got {} x {}",
                width, height
            )));
        }
        Ok(())
    }
}

impl Default for SquareBounds {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Sampler counting points inside the inscribed circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleSampler {
    bounds: SquareBounds,
    batch_size: usize,
}

impl CircleSampler {
    /// Create a sampler over `bounds` generating `batch_size` points at a time
    pub fn new(bounds: SquareBounds, batch_size: usize) -> Result<Self, SamplingError> {
        let sampler = Self { bounds, batch_size };
        sampler.validate()?;
        Ok(sampler)
    }

    pub fn bounds(&self) -> &SquareBounds {
        &self.bounds
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn validate(&self) -> Result<(), SamplingError> {
        self.bounds.validate()
    }

    /// Number of points held in memory at once for a job of `n` points
    fn batch_len(&self, n: u64) -> Result<usize, SamplingError> {
        let whole_job = usize::try_from(n).map_err(|_| SamplingError::OutOfResources {
            requested: n,
            reason: "job size exceeds the address space".to_string(),
        })?;
        if self.batch_size == 0 {
            Ok(whole_job)
        } else {
            Ok(whole_job.min(self.batch_size))
        }
    }
}

impl Default for CircleSampler {
    fn default() -> Self {
        Self {
            bounds: SquareBounds::UNIT,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

fn coordinate_buffer(len: usize, requested: u64) -> Result<Vec<f64>, SamplingError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| SamplingError::OutOfResources {
            requested,
            reason: e.to_string(),
        })?;
    Ok(buf)
}

impl Sampler for CircleSampler {
    type Output = u64;

    fn sample(&self, n: u64, rng: &mut WorkerRng) -> Result<u64, SamplingError> {
        if n == 0 {
            return Ok(0);
        }

        let batch = self.batch_len(n)?;
        let mut xs = coordinate_buffer(batch, n)?;
        let mut ys = coordinate_buffer(batch, n)?;

        let x_dist = Uniform::new(self.bounds.x_min, self.bounds.x_max);
        let y_dist = Uniform::new(self.bounds.y_min, self.bounds.y_max);

        let mut inside = 0u64;
        let mut remaining = n;
        while remaining > 0 {
            let len = remaining.min(batch as u64) as usize;

            xs.clear();
            xs.extend((0..len).map(|_| x_dist.sample(rng)));
            ys.clear();
            ys.extend((0..len).map(|_| y_dist.sample(rng)));

            inside += xs
                .iter()
                .zip(ys.iter())
                .filter(|&(&x, &y)| self.bounds.contains_in_circle(x, y))
                .count() as u64;

            remaining -= len as u64;
        }

        Ok(inside)
    }

    fn descriptor(&self) -> Option<SamplerDescriptor> {
        Some(SamplerDescriptor::Circle(*self))
    }
}
