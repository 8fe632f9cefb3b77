//! Deterministic RNG for map generation.
//!
//! Wraps `ChaCha8Rng` so every client regenerating a map from the same seed
//! draws the same sequence. Nothing in the generator may touch
//! `rand::thread_rng()`.

use std::f64::consts::TAU;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 12345;

/// Seedable generator injected into every placement and painting call.
#[derive(Debug, Clone)]
pub struct MapRng(ChaCha8Rng);

impl Default for MapRng {
    fn default() -> Self {
        Self::from_seed_u64(DEFAULT_SEED)
    }
}

impl MapRng {
    /// Create a new generator seeded from the given `u64` value.
    #[must_use]
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Uniform float in `[0, 1)`.
    pub fn float(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    /// Uniform float in `[lo, hi)`; returns `lo` for an empty range.
    pub fn float_between(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..hi)
    }

    /// Uniform integer in `[lo, hi]`; returns `lo` when `hi < lo`.
    pub fn int_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    /// Uniform index in `[0, len)`; returns 0 for an empty range.
    pub fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.0.gen_range(0..len)
    }

    /// Uniform angle in `[0, 2π)`.
    pub fn angle(&mut self) -> f64 {
        self.float() * TAU
    }
}

impl RngCore for MapRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}
