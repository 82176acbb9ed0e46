//! Random number generation for dungeon layouts
//!
//! Uses a seeded ChaCha RNG so a seed and a configuration replay the same
//! dungeon on every platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded random source threaded through blueprint construction.
///
/// Wraps ChaCha8Rng; the seed is kept so results can report what produced them.
#[derive(Debug, Clone)]
pub struct DungeonRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl DungeonRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns true with probability `p`.
    ///
    /// Always consumes exactly one draw, whatever `p` is.
    pub fn chance(&mut self, p: f64) -> bool {
        let roll: f64 = self.rng.gen_range(0.0..1.0);
        roll < p.clamp(0.0, 1.0)
    }

    /// Uniform index in `0..n`; `n` must be positive.
    pub fn below(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// `amount` distinct indices from `0..length`, in random order.
    pub fn sample(&mut self, length: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, length, amount.min(length)).into_vec()
    }
}
