//! Biased die sampler
//!
//! Each trial draws one uniform variate in [0, 1). Values below the six
//! probability roll a 6; anything else draws a second uniform variate that
//! selects one of the outcomes 1–5 with equal probability. With the default
//! probability of 0.25 the outcomes 1–5 each land at 15%.

use super::{OutcomeCounts, Sampler, SamplerDescriptor, WorkerRng};
use crate::error::SamplingError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default probability of rolling a 6
pub const DEFAULT_SIX_PROBABILITY: f64 = 0.25;

/// Sampler for a die that favours 6
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiceSampler {
    six_probability: f64,
}

impl DiceSampler {
    /// Create a sampler rolling 6 with probability `six_probability`
    ///
    /// # Errors
    ///
    /// Returns `InvalidSpec` unless the probability lies in [0, 1].
    pub fn new(six_probability: f64) -> Result<Self, SamplingError> {
        let sampler = Self { six_probability };
        sampler.validate()?;
        Ok(sampler)
    }

    pub fn six_probability(&self) -> f64 {
        self.six_probability
    }

    pub fn validate(&self) -> Result<(), SamplingError> {
        if !(0.0..=1.0).contains(&self.six_probability) {
            return Err(SamplingError::InvalidSpec(format!(
                "six probability must be within [0, 1], got {}",
                self.six_probability
            )));
        }
        Ok(())
    }

    #[inline(always)]
    fn roll(&self, rng: &mut WorkerRng) -> usize {
        if rng.gen::<f64>() < self.six_probability {
            6
        } else {
            rng.gen_range(1..=5)
        }
    }
}

impl Default for DiceSampler {
    fn default() -> Self {
        Self {
            six_probability: DEFAULT_SIX_PROBABILITY,
        }
    }
}

impl Sampler for DiceSampler {
    type Output = OutcomeCounts;

    fn sample(&self, n: u64, rng: &mut WorkerRng) -> Result<OutcomeCounts, SamplingError> {
        let mut counts = OutcomeCounts::for_job(n);
        for _ in 0..n {
            counts.record(self.roll(rng));
        }
        Ok(counts)
    }

    fn descriptor(&self) -> Option<SamplerDescriptor> {
        Some(SamplerDescriptor::Dice(*self))
    }
}
