//! Uniform random sources used to build the lattice tables.
//!
//! - `StdRandom`: `rand::rngs::StdRng`, seeded explicitly or from OS entropy
//! - `ReplaySource`: plays back a captured draw sequence
//!
//! A draw returning `None` means the source has nothing left to give; the
//! lattice turns that into `NoiseError::RandomSource` instead of building
//! degenerate tables.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the two kinds of uniform draws the lattice needs.
pub trait RandomSource {
    /// Uniform integer in `[0, bound)`.
    fn next_index(&mut self, bound: u32) -> Option<u32>;

    /// Uniform float in `[0, bound)`.
    fn next_float(&mut self, bound: f32) -> Option<f32>;
}

#[derive(Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }
}

impl RandomSource for StdRandom {
    fn next_index(&mut self, bound: u32) -> Option<u32> {
        if bound == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..bound))
    }

    fn next_float(&mut self, bound: f32) -> Option<f32> {
        if !bound.is_finite() || bound <= 0.0 {
            return None;
        }
        Some(self.rng.gen_range(0.0..bound))
    }
}

/// Replays recorded draws in order. Bounds passed by the caller are ignored,
/// so a replayed value may be out of range; the lattice rejects those.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    indices: Vec<u32>,
    floats: Vec<f32>,
    next_index: usize,
    next_float: usize,
}

impl ReplaySource {
    pub fn new(indices: Vec<u32>, floats: Vec<f32>) -> Self {
        Self { indices, floats, next_index: 0, next_float: 0 }
    }

    pub fn remaining(&self) -> (usize, usize) {
        (self.indices.len() - self.next_index, self.floats.len() - self.next_float)
    }
}

impl RandomSource for ReplaySource {
    fn next_index(&mut self, _bound: u32) -> Option<u32> {
        let v = self.indices.get(self.next_index).copied()?;
        self.next_index += 1;
        Some(v)
    }

    fn next_float(&mut self, _bound: f32) -> Option<f32> {
        let v = self.floats.get(self.next_float).copied()?;
        self.next_float += 1;
        Some(v)
    }
}
