//! Seedable log-normal shadowing source.
//!
//! Shadowing is drawn as `sigma * z` with `z ~ N(0, 1)`. Holding on to the
//! unit draw lets a coherence block be shared between models with different
//! sigmas, and makes `sigma = 0` contribute exactly nothing.

use crate::error::{Result, WalkError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use std::num::NonZeroUsize;

/// Random source for the shadowing term of the ABG and Close-In models.
///
/// Without a coherence length every draw is fresh. With a coherence length of
/// `n`, runs of `n` consecutive draws share one value, which emulates
/// spatially correlated fading along a contiguous stretch of road.
#[derive(Debug, Clone)]
pub struct Shadowing<R = ChaCha8Rng> {
    rng: R,
    coherence_length: Option<NonZeroUsize>,
    current: f64,
    remaining: usize,
}

impl Shadowing<ChaCha8Rng> {
    /// Creates a reproducible source from a 64-bit seed.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Shadowing<R> {
    pub fn from_rng(rng: R) -> Self {
        Self {
            rng,
            coherence_length: None,
            current: 0.0,
            remaining: 0,
        }
    }

    /// Groups consecutive draws into blocks of `samples` that share one value.
    /// A length of 0 or 1 means independent draws.
    pub fn with_coherence_length(mut self, samples: usize) -> Self {
        self.coherence_length = NonZeroUsize::new(samples).filter(|n| n.get() > 1);
        self.remaining = 0;
        self
    }

    pub fn coherence_length(&self) -> Option<usize> {
        self.coherence_length.map(NonZeroUsize::get)
    }

    /// Forces the next draw to start a new coherence block.
    pub fn start_block(&mut self) {
        self.remaining = 0;
    }

    /// Returns one shadowing sample in dB for the given standard deviation.
    pub fn draw(&mut self, sigma: f64) -> Result<f64> {
        validate_sigma(sigma)?;

        if self.remaining == 0 {
            self.current = StandardNormal.sample(&mut self.rng);
            self.remaining = self.coherence_length.map_or(1, NonZeroUsize::get);
        }
        self.remaining -= 1;

        Ok(sigma * self.current)
    }

    /// Returns `count` samples, starting a fresh coherence block.
    pub fn draws(&mut self, sigma: f64, count: usize) -> Result<Vec<f64>> {
        self.start_block();
        (0..count).map(|_| self.draw(sigma)).collect()
    }
}

/// Rejects negative or non-finite standard deviations.
pub(crate) fn validate_sigma(sigma: f64) -> Result<()> {
    if sigma.is_finite() && sigma >= 0.0 {
        Ok(())
    } else {
        Err(WalkError::Domain(format!(
            "shadowing sigma must be finite and >= 0, got {sigma}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let a = Shadowing::seeded(7).draws(4.0, 32).unwrap();
        let b = Shadowing::seeded(7).draws(4.0, 32).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Shadowing::seeded(1).draws(4.0, 8).unwrap();
        let b = Shadowing::seeded(2).draws(4.0, 8).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_sigma_draws_zero() {
        let mut shadowing = Shadowing::seeded(3);
        for _ in 0..16 {
            assert_eq!(shadowing.draw(0.0).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_independent_draws_without_coherence() {
        let draws = Shadowing::seeded(11).draws(1.0, 4).unwrap();
        assert_ne!(draws[0], draws[1]);
        assert_ne!(draws[1], draws[2]);
    }

    #[test]
    fn test_coherence_blocks_share_a_draw() {
        let draws = Shadowing::seeded(5)
            .with_coherence_length(3)
            .draws(2.0, 7)
            .unwrap();

        assert_eq!(draws[0], draws[1]);
        assert_eq!(draws[1], draws[2]);
        assert_ne!(draws[2], draws[3]);
        assert_eq!(draws[3], draws[4]);
        assert_eq!(draws[4], draws[5]);
        assert_ne!(draws[5], draws[6]);
    }

    #[test]
    fn test_coherence_length_one_is_independent() {
        let shadowing = Shadowing::seeded(5).with_coherence_length(1);
        assert_eq!(shadowing.coherence_length(), None);
    }

    #[test]
    fn test_negative_sigma_is_domain_error() {
        let err = Shadowing::seeded(0).draw(-1.0).unwrap_err();
        assert!(matches!(err, WalkError::Domain(_)));
        assert!(Shadowing::seeded(0).draw(f64::NAN).is_err());
    }
}
