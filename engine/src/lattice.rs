//! Value-noise lattice.
//!
//! Every integer lattice point is assigned one of 256 random values through a
//! chained permutation lookup; continuous noise is the trilinear blend of the
//! eight lattice values around a point.

use glam::Vec3;
use log::debug;

use crate::api::NoiseError;
use crate::random::{RandomSource, StdRandom};

pub const TABLE_SIZE: usize = 256;
/// Exclusive upper bound of every entry in the value table.
pub const VALUE_BOUND: f32 = 32767.99;
pub const DEFAULT_OCTAVES: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct LatticeNoise {
    permutation: [u8; TABLE_SIZE],
    values: [f32; TABLE_SIZE],
}

impl LatticeNoise {
    pub fn new(source: &mut dyn RandomSource) -> Result<Self, NoiseError> {
        let (permutation, values) = build_tables(source)?;
        Ok(Self { permutation, values })
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRandom::from_seed(seed);
        Self::new(&mut rng).expect("seeded StdRandom stays in range")
    }

    /// Regenerates both tables. On failure the current tables are kept.
    pub fn reset_tables(&mut self, source: &mut dyn RandomSource) -> Result<(), NoiseError> {
        let (permutation, values) = build_tables(source)?;
        self.permutation = permutation;
        self.values = values;
        debug!("Lattice tables reset");
        Ok(())
    }

    pub fn permutation(&self) -> &[u8; TABLE_SIZE] {
        &self.permutation
    }

    pub fn values(&self) -> &[f32; TABLE_SIZE] {
        &self.values
    }

    #[inline]
    fn fold(&self, x: i64) -> i64 {
        self.permutation[(x & 255) as usize] as i64
    }

    /// Pseudo-random value at an integer lattice point. Periodic with period
    /// 256 on every axis, negative coordinates included.
    #[inline]
    pub fn lattice_value(&self, i: i64, j: i64, k: i64) -> f32 {
        let h = self.fold(k);
        let h = self.fold(j.wrapping_add(h));
        let h = self.fold(i.wrapping_add(h));
        self.values[h as usize]
    }

    /// Trilinearly interpolated noise at `p * scale`.
    pub fn noise(&self, scale: f32, p: Vec3) -> f32 {
        let pp = p * scale;
        let base = pp.floor();
        let t = pp - base;
        let (ix, iy, iz) = (base.x as i64, base.y as i64, base.z as i64);

        let mut d = [[[0.0f32; 2]; 2]; 2];
        for (k, plane) in d.iter_mut().enumerate() {
            for (j, row) in plane.iter_mut().enumerate() {
                for (i, v) in row.iter_mut().enumerate() {
                    *v = self.lattice_value(
                        ix.wrapping_add(i as i64),
                        iy.wrapping_add(j as i64),
                        iz.wrapping_add(k as i64),
                    );
                }
            }
        }

        let x0 = lerp(t.x, d[0][0][0], d[0][0][1]);
        let x1 = lerp(t.x, d[0][1][0], d[0][1][1]);
        let x2 = lerp(t.x, d[1][0][0], d[1][0][1]);
        let x3 = lerp(t.x, d[1][1][0], d[1][1][1]);
        let y0 = lerp(t.y, x0, x1);
        let y1 = lerp(t.y, x2, x3);
        lerp(t.z, y0, y1)
    }

    /// Four octaves: `noise(s)/2 + noise(2s)/4 + noise(4s)/8 + noise(8s)/16`.
    pub fn turbulence(&self, scale: f32, p: Vec3) -> f32 {
        self.turbulence_octaves(scale, p, DEFAULT_OCTAVES)
    }

    /// Octave `n` samples at `scale * 2^n` weighted by `1 / 2^(n+1)`.
    pub fn turbulence_octaves(&self, scale: f32, p: Vec3, octaves: u32) -> f32 {
        let mut sum = 0.0;
        let mut freq = scale;
        let mut div = 2.0;
        for _ in 0..octaves {
            sum += self.noise(freq, p) / div;
            freq *= 2.0;
            div *= 2.0;
        }
        sum
    }
}

#[inline]
fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

fn build_tables(
    source: &mut dyn RandomSource,
) -> Result<([u8; TABLE_SIZE], [f32; TABLE_SIZE]), NoiseError> {
    let mut permutation = [0u8; TABLE_SIZE];
    for (i, p) in permutation.iter_mut().enumerate() {
        *p = i as u8;
    }
    for i in 0..TABLE_SIZE {
        let which = source
            .next_index(TABLE_SIZE as u32)
            .ok_or_else(|| NoiseError::RandomSource(format!("no index for permutation slot {i}")))?;
        if which as usize >= TABLE_SIZE {
            return Err(NoiseError::RandomSource(format!(
                "index {which} out of range for permutation slot {i}"
            )));
        }
        permutation.swap(which as usize, i);
    }

    let mut values = [0.0f32; TABLE_SIZE];
    for (i, v) in values.iter_mut().enumerate() {
        let x = source
            .next_float(VALUE_BOUND)
            .ok_or_else(|| NoiseError::RandomSource(format!("no value for table slot {i}")))?;
        if !(0.0..VALUE_BOUND).contains(&x) {
            return Err(NoiseError::RandomSource(format!(
                "value {x} out of range for table slot {i}"
            )));
        }
        *v = x;
    }
    Ok((permutation, values))
}
