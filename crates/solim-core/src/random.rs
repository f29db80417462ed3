//! Random number capability for the randomizer.
//!
//! The randomizer never reaches for a global generator. It owns a
//! [`RandomSource`], so tests can inject scripted sequences and several
//! module instances can run on different threads without sharing state.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform integer source over an inclusive range.
pub trait RandomSource {
    /// Draw uniformly from `[min, max]`.
    ///
    /// Callers guarantee `min <= max`.
    fn uniform(&mut self, min: usize, max: usize) -> usize;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn uniform(&mut self, min: usize, max: usize) -> usize {
        (**self).uniform(min, max)
    }
}

/// Production source backed by [`SmallRng`].
///
/// # Example
///
/// ```rust
/// use solim_core::{RandomSource, SmallRngSource};
///
/// let mut source = SmallRngSource::seed_from_u64(7);
/// let n = source.uniform(0, 3);
/// assert!(n <= 3);
/// ```
#[derive(Debug, Clone)]
pub struct SmallRngSource {
    rng: SmallRng,
}

impl SmallRngSource {
    /// Deterministic source for a given seed.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Source seeded once from OS entropy.
    #[cfg(feature = "std")]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

impl RandomSource for SmallRngSource {
    #[inline]
    fn uniform(&mut self, min: usize, max: usize) -> usize {
        debug_assert!(min <= max, "empty range [{min}, {max}]");
        self.rng.gen_range(min..=max)
    }
}
