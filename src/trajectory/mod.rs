//! Closed-form ballistic trajectory
//!
//! A point mass launched from height `H` with velocity `(vx, vy, vz)` moves
//! uniformly over the floor and follows `z(t) = H + vz·t − g/2·t²`. The flight
//! ends at the larger root of `z(t) = 0`.
//!
//! # Example
//!
//! ```
//! use parsample::trajectory::{solve, Launch};
//!
//! let launch = Launch { height: 0.0, vx: 1.0, vy: 0.0, vz: 10.0 };
//! let trajectory = solve(launch, 10.0, 3).unwrap();
//! assert!((trajectory.flight_time - 2.0).abs() < 1e-12);
//! assert_eq!(trajectory.samples.len(), 3);
//! ```

use crate::error::SamplingError;
use serde::{Deserialize, Serialize};

/// Launch conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

/// Position at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Solved trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub flight_time: f64,
    pub landing: TrajectoryPoint,
    /// Evenly spaced samples from launch to landing, both included
    pub samples: Vec<TrajectoryPoint>,
}

impl Launch {
    /// Position at time `t`
    pub fn position(&self, t: f64, gravity: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            t,
            x: self.vx * t,
            y: self.vy * t,
            z: self.height + self.vz * t - gravity / 2.0 * t * t,
        }
    }
}

/// Solve the trajectory of `launch` under `gravity`, sampled at `steps` points
pub fn solve(launch: Launch, gravity: f64, steps: usize) -> Result<Trajectory, SamplingError> {
    if gravity.is_nan() || gravity <= 0.0 {
        return Err(SamplingError::InvalidSpec(format!(
            "gravity must be positive, got {}",
            gravity
        )));
    }
    if steps == 0 {
        return Err(SamplingError::InvalidSpec("steps must be at least 1".to_string()));
    }

    // z(t) = c + b·t + a·t²
    let a = -gravity / 2.0;
    let b = launch.vz;
    let c = launch.height;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || !discriminant.is_finite() {
        return Err(SamplingError::InvalidSpec(format!(
            "trajectory never reaches the ground (discriminant {})",
            discriminant
        )));
    }

    let root = discriminant.sqrt();
    let t1 = (-b + root) / (2.0 * a);
    let t2 = (-b - root) / (2.0 * a);
    let flight_time = t1.max(t2);

    let samples = (0..steps)
        .map(|i| {
            let t = if steps == 1 {
                0.0
            } else {
                flight_time * i as f64 / (steps - 1) as f64
            };
            launch.position(t, gravity)
        })
        .collect();

    Ok(Trajectory {
        flight_time,
        landing: launch.position(flight_time, gravity),
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f64 = 9.81;

    fn default_launch() -> Launch {
        Launch {
            height: 10.0,
            vx: 1.0,
            vy: 1.0,
            vz: 10.0,
        }
    }

    #[test]
    fn test_default_launch() {
        let trajectory = solve(default_launch(), G, 300).unwrap();
        assert_eq!(format!("{:.2}", trajectory.flight_time), "2.77");
        assert_eq!(format!("{:.2}", trajectory.landing.x), "2.77");
        assert_eq!(format!("{:.2}", trajectory.landing.y), "2.77");
        assert!(trajectory.landing.z.abs() < 1e-9);
        assert_eq!(trajectory.samples.len(), 300);
    }

    #[test]
    fn test_samples_span_flight() {
        let trajectory = solve(default_launch(), G, 300).unwrap();
        let first = trajectory.samples[0];
        let last = trajectory.samples[299];
        assert_eq!(first.t, 0.0);
        assert_eq!(first.z, 10.0);
        assert!((last.t - trajectory.flight_time).abs() < 1e-12);
        assert!(last.z.abs() < 1e-9);

        let dt = trajectory.samples[1].t - trajectory.samples[0].t;
        for pair in trajectory.samples.windows(2) {
            assert!((pair[1].t - pair[0].t - dt).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ground_launch_picks_longer_root() {
        let launch = Launch {
            height: 0.0,
            vx: 0.0,
            vy: 2.0,
            vz: 9.81,
        };
        let trajectory = solve(launch, G, 10).unwrap();
        assert!((trajectory.flight_time - 2.0).abs() < 1e-12);
        assert!((trajectory.landing.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_step() {
        let trajectory = solve(default_launch(), G, 1).unwrap();
        assert_eq!(trajectory.samples, vec![default_launch().position(0.0, G)]);
    }

    #[test]
    fn test_below_ground_launch_rejected() {
        let launch = Launch {
            height: -10.0,
            vx: 0.0,
            vy: 0.0,
            vz: 1.0,
        };
        assert!(matches!(solve(launch, G, 10), Err(SamplingError::InvalidSpec(_))));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(solve(default_launch(), 0.0, 10).is_err());
        assert!(solve(default_launch(), f64::NAN, 10).is_err());
        assert!(solve(default_launch(), G, 0).is_err());
    }
}
