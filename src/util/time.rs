//! Timing utilities
//!
//! Provides the monotonic timestamp used across the crate and the timing
//! harness that measures the dispatch-and-collect phase of a run.

use std::time::{Duration, Instant};

/// Monotonic timestamp
///
/// Thin wrapper around `std::time::Instant` with convenience accessors.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    instant: Instant,
}

impl Timestamp {
    /// Create a new timestamp representing the current time
    #[inline]
    pub fn now() -> Self {
        Self {
            instant: Instant::now(),
        }
    }

    /// Get the elapsed time since this timestamp
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }

    /// Get the elapsed time in nanoseconds
    #[inline]
    pub fn elapsed_nanos(&self) -> u64 {
        self.elapsed().as_nanos() as u64
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

/// A value together with the wall-clock time it took to produce
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T, E> Timed<Result<T, E>> {
    /// Turn a timed result into a result of a timed value
    pub fn transpose(self) -> Result<Timed<T>, E> {
        let elapsed = self.elapsed;
        self.value.map(|value| Timed { value, elapsed })
    }
}

/// Wall-clock timing harness
///
/// Measures only the closure it is given; callers wrap the executor's
/// dispatch and collect phase and keep partitioning, aggregation and
/// reporting outside.
///
/// # Example
///
/// ```
/// use parsample::util::time::TimingHarness;
///
/// let timed = TimingHarness::measure(|| (1..=10u64).sum::<u64>());
/// assert_eq!(timed.value, 55);
/// ```
pub struct TimingHarness;

impl TimingHarness {
    pub fn measure<T>(f: impl FnOnce() -> T) -> Timed<T> {
        let start = Timestamp::now();
        let value = f();
        Timed {
            value,
            elapsed: start.elapsed(),
        }
    }
}

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use parsample::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    }
}

/// Format a rate (samples per second)
///
/// # Examples
///
/// ```
/// use parsample::util::time::format_rate;
///
/// assert_eq!(format_rate(500.0), "500");
/// assert_eq!(format_rate(1500.0), "1.50K");
/// assert_eq!(format_rate(2_500_000.0), "2.50M");
/// ```
pub fn format_rate(rate: f64) -> String {
    if rate < 1_000.0 {
        format!("{:.0}", rate)
    } else if rate < 1_000_000.0 {
        format!("{:.2}K", rate / 1_000.0)
    } else if rate < 1_000_000_000.0 {
        format!("{:.2}M", rate / 1_000_000.0)
    } else {
        format!("{:.2}G", rate / 1_000_000_000.0)
    }
}

/// Samples per second over `duration`; 0 for an empty duration
pub fn calculate_rate(samples: u64, duration: Duration) -> f64 {
    let seconds = duration.as_secs_f64();
    if seconds > 0.0 {
        samples as f64 / seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_timestamp_elapsed() {
        let start = Timestamp::now();
        thread::sleep(Duration::from_millis(10));
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_harness_measures_closure() {
        let timed = TimingHarness::measure(|| {
            thread::sleep(Duration::from_millis(5));
            7
        });
        assert_eq!(timed.value, 7);
        assert!(timed.elapsed >= Duration::from_millis(5));
    }

    #[test]
    fn test_timed_transpose() {
        let ok: Timed<Result<u32, String>> = Timed {
            value: Ok(3),
            elapsed: Duration::from_millis(2),
        };
        let timed = ok.transpose().unwrap();
        assert_eq!(timed.value, 3);
        assert_eq!(timed.elapsed, Duration::from_millis(2));

        let err: Timed<Result<u32, String>> = Timed {
            value: Err("no".to_string()),
            elapsed: Duration::ZERO,
        };
        assert!(err.transpose().is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.50ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }

    #[test]
    fn test_calculate_rate() {
        assert_eq!(calculate_rate(1000, Duration::from_secs(10)), 100.0);
        assert_eq!(calculate_rate(1000, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1_500_000_000.0), "1.50G");
    }
}
