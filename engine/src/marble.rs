use std::f32::consts::PI;

use glam::Vec3;

use crate::api::NoiseError;
use crate::lattice::{LatticeNoise, DEFAULT_OCTAVES};
use crate::random::RandomSource;

/// Piecewise quadratic remap that turns a smooth [-1, 1] signal into marble
/// banding. Not clamped; branch edges at -0.4 and 0.4 are only nearly
/// continuous.
pub fn undulate(x: f32) -> f32 {
    if x < -0.4 {
        0.15 + 2.857 * sqr(x + 0.75)
    } else if x < 0.4 {
        0.95 - 2.8125 * sqr(x)
    } else {
        0.26 + 2.666 * sqr(x - 0.7)
    }
}

#[inline]
fn sqr(x: f32) -> f32 {
    x * x
}

/// Marble patterns over an owned lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct MarbleSynthesizer {
    lattice: LatticeNoise,
    octaves: u32,
}

impl MarbleSynthesizer {
    pub fn new(lattice: LatticeNoise) -> Self {
        Self { lattice, octaves: DEFAULT_OCTAVES }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(LatticeNoise::with_seed(seed))
    }

    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn lattice(&self) -> &LatticeNoise {
        &self.lattice
    }

    pub fn reset_tables(&mut self, source: &mut dyn RandomSource) -> Result<(), NoiseError> {
        self.lattice.reset_tables(source)
    }

    pub fn turbulence(&self, scale: f32, p: Vec3) -> f32 {
        self.lattice.turbulence_octaves(scale, p, self.octaves)
    }

    /// Cosine bands along z, perturbed by `amplitude * turbulence(strength, p)`.
    pub fn marble(&self, amplitude: f32, strength: f32, p: Vec3) -> f32 {
        let turb = self.turbulence(strength, p);
        undulate((2.0 * PI * p.z + amplitude * turb).cos())
    }

    /// Sine bands along z with turbulence fixed at scale 10.
    pub fn marble_sine(&self, strength: f32, p: Vec3) -> f32 {
        let turb = self.turbulence(10.0, p);
        undulate((6.0 * p.z + strength * turb).sin())
    }
}
