//! Seedable random number generation for path simulation.
//!
//! The simulator never touches a process-wide generator: callers inject a
//! [`PathRng`] (or a seed from which one is built), so identical seeds
//! reproduce identical ensembles. ChaCha is used for its robust statistical
//! quality and cheap arbitrary seeking.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::StandardNormal;

/// Multiplier used to decorrelate per-path seeds derived from one base seed.
/// Golden-ratio constant; spreads consecutive indices across the seed space.
const SEED_MIX: u64 = 0x9e3779b97f4a7c15;

/// Seedable generator for simulation paths.
///
/// `seed_from_u64` cryptographically expands the `u64` into the full ChaCha
/// key, so nearby seeds still yield independent streams.
#[derive(Debug, Clone)]
pub struct PathRng {
    rng: ChaCha20Rng,
}

impl PathRng {
    /// Create a generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Create a generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh base seed; used when the caller did not fix one.
    pub fn random_seed() -> u64 {
        ChaCha20Rng::from_entropy().gen()
    }

    /// Draw one standard normal variate.
    pub fn standard_normal(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Draw a random f64 in [0, 1).
    pub fn f64(&mut self) -> f64 {
        self.rng.gen()
    }
}

/// Mix a base seed with a path index into an independent per-path seed.
///
/// Matches the deterministic-parallel seeding scheme: each path gets a
/// unique, reproducible seed regardless of which worker thread runs it, so
/// parallel and sequential execution produce the same ensemble.
pub fn derive_path_seed(base_seed: u64, path_index: u64) -> u64 {
    (base_seed ^ path_index.rotate_left(32)).wrapping_mul(SEED_MIX)
}
