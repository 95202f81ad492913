//! Statistics over aggregated results
//!
//! [`aggregator`] reduces per-job results; the helpers here turn aggregates
//! into the statistics the experiments report.

pub mod aggregator;

use std::f64::consts::PI;

/// Estimate π from the number of points inside the inscribed circle
///
/// The circle covers π/4 of its bounding square, so π ≈ 4 · inside / total.
/// Returns 0 for an empty run.
pub fn estimate_pi(inside: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    4.0 * inside as f64 / total as f64
}

/// Absolute error of a π estimate
pub fn pi_error(estimate: f64) -> f64 {
    (PI - estimate).abs()
}

/// Standard deviation of a binomial count with `n` trials and probability `p`
pub fn binomial_std_dev(n: u64, p: f64) -> f64 {
    (n as f64 * p * (1.0 - p)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_pi() {
        assert_eq!(estimate_pi(785, 1000), 3.14);
        assert_eq!(estimate_pi(0, 0), 0.0);
        assert_eq!(estimate_pi(10, 10), 4.0);
    }

    #[test]
    fn test_pi_error() {
        assert!((pi_error(3.14) - 0.0015926535).abs() < 1e-9);
        assert_eq!(pi_error(PI), 0.0);
    }

    #[test]
    fn test_binomial_std_dev() {
        assert_eq!(binomial_std_dev(100, 0.5), 5.0);
        assert_eq!(binomial_std_dev(0, 0.5), 0.0);
    }
}
