//! Per-stage variance for maturity profiles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest absolute offset applied to a stage's base maturity.
pub const MAX_JITTER: i8 = 2;

/// Source of the per-stage offset in `-MAX_JITTER..=MAX_JITTER`.
pub trait JitterSource {
    fn next_offset(&mut self) -> i8;
}

/// Jitter drawn from a random number generator.
#[derive(Debug, Clone)]
pub struct RngJitter<R> {
    rng: R,
}

impl<R: Rng> RngJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngJitter<StdRng> {
    /// Reproducible jitter: the same seed always yields the same profile.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> JitterSource for RngJitter<R> {
    fn next_offset(&mut self) -> i8 {
        self.rng.gen_range(-MAX_JITTER..=MAX_JITTER)
    }
}

/// Constant offset, mostly useful for tests that need exact profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedJitter(pub i8);

impl JitterSource for FixedJitter {
    fn next_offset(&mut self) -> i8 {
        self.0.clamp(-MAX_JITTER, MAX_JITTER)
    }
}
