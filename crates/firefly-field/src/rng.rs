//! Thread-safe bounded integer generation.
//!
//! The simulation's randomness is a 64-bit xorshift register behind a
//! single exclusive lock. Calls from concurrent actors are fully
//! serialized but otherwise independent: determinism depends only on the
//! seed and the order in which calls happen to land, never on caller
//! identity. The generator is fast and statistically adequate for
//! placement and jitter; it is not cryptographically secure.

use std::sync::Mutex;

use crate::FieldError;

/// Default seed for demonstration runs.
pub const DEFAULT_SEED: u64 = 0xCEED_BA11;

/// A shared bounded-integer generator.
///
/// The lock is held only for the register update, never across any await
/// or sleep.
#[derive(Debug)]
pub struct RandomSource {
    /// The xorshift register. Invariant: never zero.
    state: Mutex<u64>,
}

impl RandomSource {
    /// Create a generator from a seed.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ZeroSeed`] if `seed` is zero -- the xorshift
    /// register would be stuck at zero forever.
    pub fn new(seed: u64) -> Result<Self, FieldError> {
        if seed == 0 {
            return Err(FieldError::ZeroSeed);
        }
        Ok(Self {
            state: Mutex::new(seed),
        })
    }

    /// Return a uniformly distributed integer in `[min, max]` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidRange`] if `max < min`. The draw is
    /// not attempted on an invalid range.
    pub fn next_in_range(&self, min: i64, max: i64) -> Result<i64, FieldError> {
        if max < min {
            return Err(FieldError::InvalidRange { min, max });
        }
        let span = max
            .checked_sub(min)
            .and_then(|width| width.checked_add(1))
            .ok_or(FieldError::ArithmeticOverflow)?;
        // span >= 1 here, so the try_from and checked_rem cannot fail.
        let span = u64::try_from(span).map_err(|_err| FieldError::ArithmeticOverflow)?;

        let raw = self.next_raw();
        let offset = raw.checked_rem(span).unwrap_or(0);

        // offset < span <= i64::MAX as u64, so this conversion is lossless.
        let offset = i64::try_from(offset).map_err(|_err| FieldError::ArithmeticOverflow)?;
        min.checked_add(offset).ok_or(FieldError::ArithmeticOverflow)
    }

    /// Advance the xorshift register and return its new value.
    ///
    /// A poisoned lock is recovered by taking the inner value: the register
    /// holds no invariant beyond being non-zero, which xorshift preserves.
    fn next_raw(&self) -> u64 {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut x = *state;
        x ^= x.wrapping_shl(13);
        x ^= x.wrapping_shr(17);
        x ^= x.wrapping_shl(5);
        *state = x;
        x
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_is_rejected() {
        assert!(RandomSource::new(0).is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let rng = RandomSource::new(DEFAULT_SEED).unwrap();
        let result = rng.next_in_range(10, 5);
        assert!(matches!(
            result,
            Err(FieldError::InvalidRange { min: 10, max: 5 })
        ));
    }

    #[test]
    fn draws_stay_in_bounds() {
        let rng = RandomSource::new(DEFAULT_SEED).unwrap();
        for _ in 0..10_000 {
            let value = rng.next_in_range(-3, 17).unwrap();
            assert!((-3..=17).contains(&value));
        }
    }

    #[test]
    fn degenerate_range_returns_the_single_value() {
        let rng = RandomSource::new(DEFAULT_SEED).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_in_range(7, 7).unwrap(), 7);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = RandomSource::new(42).unwrap();
        let b = RandomSource::new(42).unwrap();
        for _ in 0..1_000 {
            assert_eq!(
                a.next_in_range(0, 1_000_000).unwrap(),
                b.next_in_range(0, 1_000_000).unwrap()
            );
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = RandomSource::new(1).unwrap();
        let b = RandomSource::new(2).unwrap();
        let a_draws: Vec<i64> = (0..32).map(|_| a.next_in_range(0, 1_000_000_000).unwrap()).collect();
        let b_draws: Vec<i64> = (0..32).map(|_| b.next_in_range(0, 1_000_000_000).unwrap()).collect();
        assert_ne!(a_draws, b_draws);
    }

    #[test]
    fn concurrent_draws_stay_in_bounds() {
        use std::sync::Arc;

        let rng = Arc::new(RandomSource::new(DEFAULT_SEED).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let rng = Arc::clone(&rng);
                std::thread::spawn(move || {
                    for _ in 0..5_000 {
                        let value = rng.next_in_range(0, 500).unwrap();
                        assert!((0..=500).contains(&value));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
