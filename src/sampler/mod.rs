//! Sampling functions
//!
//! A sampler turns a job size `n` into a worker-local aggregate by running `n`
//! independent random trials against a private random source. Two samplers
//! ship with the crate:
//!
//! - **Dice**: rolls a biased six-sided die and counts outcomes
//!   ([`dice::DiceSampler`], result [`OutcomeCounts`])
//! - **Circle**: drops points into a square and counts those inside the
//!   inscribed circle ([`circle::CircleSampler`], result `u64`)
//!
//! # Random Sources
//!
//! Every job owns its own xoshiro256++ generator. With a base seed, job `i` is
//! seeded with `base + i` so that a run is reproducible no matter which worker
//! executes which job. Without one, each job seeds itself from OS entropy.
//!
//! # Example
//!
//! ```
//! use parsample::sampler::{job_rng, Sampler, circle::CircleSampler};
//!
//! let sampler = CircleSampler::default();
//! let mut rng = job_rng(Some(8325876), 0);
//! let inside = sampler.sample(1_000, &mut rng).unwrap();
//! assert!(inside <= 1_000);
//! ```

pub mod circle;
pub mod dice;

use crate::error::SamplingError;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Random source owned by a single job
pub type WorkerRng = Xoshiro256PlusPlus;

/// Build the random source for job `job_index`
///
/// Seeded runs derive one seed per job from the base seed; unseeded runs draw
/// from OS entropy.
pub fn job_rng(base_seed: Option<u64>, job_index: usize) -> WorkerRng {
    match base_seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(job_index as u64)),
        None => Xoshiro256PlusPlus::from_entropy(),
    }
}

/// A worker-local result that can be summed with others of the same shape
///
/// `merge` must be associative and commutative with `zero` as identity, so the
/// aggregate does not depend on how the work was split or in which order
/// results arrive.
pub trait Aggregate: Clone + Send + fmt::Debug + 'static {
    /// Identity element
    fn zero() -> Self;

    /// Add `other` into `self`
    fn merge(&mut self, other: &Self);

    /// Encode for transfer between processes
    fn into_wire(self) -> WireResult;

    /// Decode a result received from a worker process
    fn from_wire(wire: WireResult) -> Result<Self, SamplingError>;
}

/// Sampling function executed once per job
pub trait Sampler: Send + Sync {
    /// Worker-local result type
    type Output: Aggregate;

    /// Run `n` trials using `rng`
    ///
    /// # Errors
    ///
    /// Returns `OutOfResources` when the trial buffers cannot be allocated.
    fn sample(&self, n: u64, rng: &mut WorkerRng) -> Result<Self::Output, SamplingError>;

    /// Description of this sampler that a worker process can rebuild
    ///
    /// Samplers returning `None` can only run on in-process backends.
    fn descriptor(&self) -> Option<SamplerDescriptor> {
        None
    }
}

/// Per-outcome counters of a six-sided die
///
/// Slot 0 holds the number of trials the job ran, slots 1–6 the count of each
/// outcome. Slots 1–6 always sum to slot 0 for a single job, and summing jobs
/// keeps that property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    slots: [u64; 7],
}

impl OutcomeCounts {
    pub const OUTCOMES: std::ops::RangeInclusive<usize> = 1..=6;

    /// Empty counters for a job of `n` trials
    pub fn for_job(n: u64) -> Self {
        let mut slots = [0u64; 7];
        slots[0] = n;
        Self { slots }
    }

    pub fn from_slots(slots: [u64; 7]) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[u64; 7] {
        &self.slots
    }

    /// Echoed job size (slot 0)
    pub fn job_size(&self) -> u64 {
        self.slots[0]
    }

    /// Count for `outcome` (1–6); 0 for anything else
    pub fn count(&self, outcome: usize) -> u64 {
        if Self::OUTCOMES.contains(&outcome) {
            self.slots[outcome]
        } else {
            0
        }
    }

    pub(crate) fn record(&mut self, outcome: usize) {
        self.slots[outcome] += 1;
    }

    /// Sum of the outcome counts (slots 1–6)
    pub fn total_outcomes(&self) -> u64 {
        self.slots[1..].iter().sum()
    }

    /// True when the outcome counts add up to the echoed job size
    pub fn is_consistent(&self) -> bool {
        self.total_outcomes() == self.job_size()
    }

    /// Share of `outcome` in percent of `total`
    pub fn percent(&self, outcome: usize, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.count(outcome) as f64 / total as f64 * 100.0
    }
}

impl Aggregate for OutcomeCounts {
    fn zero() -> Self {
        Self::default()
    }

    fn merge(&mut self, other: &Self) {
        for (slot, value) in self.slots.iter_mut().zip(other.slots.iter()) {
            *slot += value;
        }
    }

    fn into_wire(self) -> WireResult {
        WireResult::Counts(self.slots)
    }

    fn from_wire(wire: WireResult) -> Result<Self, SamplingError> {
        match wire {
            WireResult::Counts(slots) => Ok(Self { slots }),
            other => Err(SamplingError::WorkerFault(format!(
                "expected outcome counters from worker, got {:?}",
                other
            ))),
        }
    }
}

impl Aggregate for u64 {
    fn zero() -> Self {
        0
    }

    fn merge(&mut self, other: &Self) {
        *self += other;
    }

    fn into_wire(self) -> WireResult {
        WireResult::Scalar(self)
    }

    fn from_wire(wire: WireResult) -> Result<Self, SamplingError> {
        match wire {
            WireResult::Scalar(value) => Ok(value),
            other => Err(SamplingError::WorkerFault(format!(
                "expected scalar count from worker, got {:?}",
                other
            ))),
        }
    }
}

/// Worker result as it travels between processes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireResult {
    Counts([u64; 7]),
    Scalar(u64),
}

/// Sampler parameters sent to a worker process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SamplerDescriptor {
    Dice(dice::DiceSampler),
    Circle(circle::CircleSampler),
}

impl SamplerDescriptor {
    /// Check parameters received from another process
    pub fn validate(&self) -> Result<(), SamplingError> {
        match self {
            SamplerDescriptor::Dice(sampler) => sampler.validate(),
            SamplerDescriptor::Circle(sampler) => sampler.validate(),
        }
    }

    /// Run the described sampler and encode its result
    pub fn sample_wire(&self, n: u64, rng: &mut WorkerRng) -> Result<WireResult, SamplingError> {
        match self {
            SamplerDescriptor::Dice(sampler) => sampler.sample(n, rng).map(Aggregate::into_wire),
            SamplerDescriptor::Circle(sampler) => sampler.sample(n, rng).map(Aggregate::into_wire),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SamplerDescriptor::Dice(_) => "dice",
            SamplerDescriptor::Circle(_) => "circle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_job_rng_seeded_is_reproducible() {
        let mut a = job_rng(Some(42), 3);
        let mut b = job_rng(Some(42), 3);
        for _ in 0..10 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }

    #[test]
    fn test_job_rng_differs_per_job() {
        let mut a = job_rng(Some(42), 0);
        let mut b = job_rng(Some(42), 1);
        let xs: Vec<u64> = (0..4).map(|_| a.gen()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.gen()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_outcome_counts_merge() {
        let mut a = OutcomeCounts::from_slots([10, 1, 2, 3, 1, 1, 2]);
        let b = OutcomeCounts::from_slots([5, 0, 1, 1, 1, 1, 1]);
        a.merge(&b);
        assert_eq!(a.slots(), &[15, 1, 3, 4, 2, 2, 3]);
        assert!(a.is_consistent());
    }

    #[test]
    fn test_outcome_counts_count_ignores_slot_zero() {
        let counts = OutcomeCounts::from_slots([6, 1, 1, 1, 1, 1, 1]);
        assert_eq!(counts.count(0), 0);
        assert_eq!(counts.count(7), 0);
        assert_eq!(counts.count(6), 1);
        assert!((counts.percent(6, 6) - 100.0 / 6.0).abs() < 1e-9);
        assert_eq!(counts.percent(6, 0), 0.0);
    }

    #[test]
    fn test_wire_shape_mismatch_is_fault() {
        let err = u64::from_wire(WireResult::Counts([0; 7])).unwrap_err();
        assert!(matches!(err, SamplingError::WorkerFault(_)));

        let err = OutcomeCounts::from_wire(WireResult::Scalar(3)).unwrap_err();
        assert!(matches!(err, SamplingError::WorkerFault(_)));
    }

    #[test]
    fn test_wire_roundtrip_scalar() {
        assert_eq!(u64::from_wire(42u64.into_wire()).unwrap(), 42);
    }
}
