//! # RandomNumberGenerator
//!
//! The `RandomNumberGenerator` struct is the single source of randomness for
//! network initialisation, tournament draws, crossover coin flips and
//! mutation. It is threaded explicitly through every stochastic operation so a
//! seeded generator replays a whole training run.
//!
//! ## Example
//!
//! ```rust
//! use evonet::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(42);
//! let row = rng.fetch_uniform(-1.0, 1.0, 5);
//!
//! for value in row {
//!     assert!((-1.0..=1.0).contains(&value));
//! }
//! ```

use rand::{rngs::StdRng, Rng, SeedableRng};

/// A wrapper around the `rand` crate's `StdRng` that provides the draws used
/// by the trainer.
#[derive(Clone, Debug)]
pub struct RandomNumberGenerator {
    pub rng: StdRng,
}

impl RandomNumberGenerator {
    /// Creates a new `RandomNumberGenerator` instance seeded from the system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `RandomNumberGenerator` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws a single value uniformly from `[from, to]`.
    pub fn uniform(&mut self, from: f64, to: f64) -> f64 {
        self.rng.gen_range(from..=to)
    }

    /// Generates `num` values drawn uniformly from `[from, to]`.
    pub fn fetch_uniform(&mut self, from: f64, to: f64, num: usize) -> Vec<f64> {
        (0..num).map(|_| self.uniform(from, to)).collect()
    }

    /// Draws an index uniformly from `0..len`.
    ///
    /// `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Draws an integer uniformly from `[low, high]`.
    pub fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high)
    }

    /// Draws a signed integer uniformly from `[low, high]`.
    pub fn signed_range_inclusive(&mut self, low: i64, high: i64) -> i64 {
        self.rng.gen_range(low..=high)
    }

    /// A fair coin flip.
    pub fn flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Returns `true` with probability `probability`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }
}

impl Default for RandomNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_uniform_with_symmetric_range() {
        let mut rng = RandomNumberGenerator::new();
        let result = rng.fetch_uniform(-1.0, 1.0, 50);

        assert_eq!(result.len(), 50);
        for &num in result.iter() {
            assert!((-1.0..=1.0).contains(&num));
        }
    }

    #[test]
    fn test_fetch_uniform_with_empty_result() {
        let mut rng = RandomNumberGenerator::new();
        assert!(rng.fetch_uniform(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn test_range_inclusive_hits_both_ends() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let draws: Vec<usize> = (0..500).map(|_| rng.range_inclusive(2, 4)).collect();

        assert!(draws.iter().all(|d| (2..=4).contains(d)));
        assert!(draws.contains(&2));
        assert!(draws.contains(&4));
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = RandomNumberGenerator::from_seed(9);
        assert!((0..100).all(|_| !rng.chance(0.0)));
        assert!((0..100).all(|_| rng.chance(1.0)));
    }

    #[test]
    fn test_clone() {
        let mut rng1 = RandomNumberGenerator::from_seed(42);
        let mut rng2 = rng1.clone();

        // Both RNGs should generate the same sequence after cloning
        let nums1 = rng1.fetch_uniform(0.0, 1.0, 5);
        let nums2 = rng2.fetch_uniform(0.0, 1.0, 5);

        assert_eq!(nums1, nums2);
    }
}
