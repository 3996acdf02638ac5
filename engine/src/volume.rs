//! Volumetric sampling.
//!
//! Buffers are row-major with interleaved channels: x varies fastest, then y,
//! then z, and each cell holds `channels` consecutive copies of its scalar.
//! Grid index `n` on an axis of length `L` maps to the running `f32` sum of
//! `n` steps of `1 / L`, starting from 0.

use glam::Vec3;
use log::debug;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::api::{NoiseError, VolumeData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeLayout {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub channels: u8,
}

impl VolumeLayout {
    pub fn new(width: u32, height: u32, depth: u32, channels: u8) -> Result<Self, NoiseError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(NoiseError::Config(format!(
                "volume size {}x{}x{} has an empty axis",
                width, height, depth
            )));
        }
        if !(1..=4).contains(&channels) {
            return Err(NoiseError::Config(format!("channel count {} not in 1..=4", channels)));
        }
        let layout = Self { width, height, depth, channels };
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(depth as usize))
            .and_then(|v| v.checked_mul(channels as usize))
            .ok_or_else(|| NoiseError::Config(format!("volume {:?} does not fit in memory", layout)))?;
        Ok(layout)
    }

    pub fn cube(side: u32, channels: u8) -> Result<Self, NoiseError> {
        Self::new(side, side, side, channels)
    }

    pub fn from_size(size: [u32; 3], channels: u8) -> Result<Self, NoiseError> {
        Self::new(size[0], size[1], size[2], channels)
    }

    pub fn size(&self) -> [u32; 3] {
        [self.width, self.height, self.depth]
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cell_count() * self.channels as usize
    }

    /// Never true for a layout built through `new`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values per z slice.
    #[inline]
    pub fn slice_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Flat offset of `channel` in cell `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: u32, y: u32, z: u32, channel: u8) -> usize {
        let cell = (z as usize * self.height as usize + y as usize) * self.width as usize + x as usize;
        cell * self.channels as usize + channel as usize
    }

    /// Sample-space coordinate of every grid index on one axis.
    pub fn axis_coords(len: u32) -> Vec<f32> {
        let step = 1.0 / len as f32;
        let mut c = 0.0f32;
        (0..len)
            .map(|_| {
                let v = c;
                c += step;
                v
            })
            .collect()
    }

    pub fn sample_point(&self, x: u32, y: u32, z: u32) -> Vec3 {
        Vec3::new(axis_coord(x, self.width), axis_coord(y, self.height), axis_coord(z, self.depth))
    }
}

/// Running sum of `n` steps of `1 / len`, matching `axis_coords(len)[n]`.
fn axis_coord(n: u32, len: u32) -> f32 {
    let step = 1.0 / len as f32;
    let mut c = 0.0f32;
    for _ in 0..n {
        c += step;
    }
    c
}

impl VolumeData {
    pub fn layout(&self) -> Result<VolumeLayout, NoiseError> {
        VolumeLayout::from_size(self.size, self.channels)
    }

    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Evaluates `field` at every grid cell, z slices outermost, and replicates
/// each scalar into all channels.
pub fn sweep<F>(layout: &VolumeLayout, field: F) -> Vec<f32>
where
    F: Fn(Vec3) -> f32,
{
    let mut data = Vec::with_capacity(layout.len());
    let step_s = 1.0 / layout.width as f32;
    let step_t = 1.0 / layout.height as f32;
    let step_u = 1.0 / layout.depth as f32;
    let (mut s, mut t, mut u) = (0.0f32, 0.0f32, 0.0f32);
    for _z in 0..layout.depth {
        for _y in 0..layout.height {
            for _x in 0..layout.width {
                let d = field(Vec3::new(s, t, u));
                data.extend(std::iter::repeat(d).take(layout.channels as usize));
                s += step_s;
            }
            t += step_t;
            s = 0.0;
        }
        t = 0.0;
        u += step_u;
    }
    data
}

/// Same output as [`sweep`], one z slice per task on a dedicated pool.
pub fn sweep_parallel<F>(layout: &VolumeLayout, threads: usize, field: F) -> Result<Vec<f32>, NoiseError>
where
    F: Fn(Vec3) -> f32 + Sync,
{
    let threads = threads.max(1);
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("marble-sweep-{}", i))
        .build()
        .map_err(|e| NoiseError::ThreadPool(e.to_string()))?;
    debug!("Sweeping {:?} on {} threads", layout.size(), threads);

    let xs = VolumeLayout::axis_coords(layout.width);
    let ys = VolumeLayout::axis_coords(layout.height);
    let zs = VolumeLayout::axis_coords(layout.depth);
    let channels = layout.channels as usize;

    let mut data = vec![0.0f32; layout.len()];
    pool.install(|| {
        data.par_chunks_mut(layout.slice_len()).zip(zs.par_iter()).for_each(|(slice, &u)| {
            let mut cells = slice.chunks_exact_mut(channels);
            for &t in &ys {
                for &s in &xs {
                    if let Some(cell) = cells.next() {
                        cell.fill(field(Vec3::new(s, t, u)));
                    }
                }
            }
        });
    });
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_rejects_bad_shapes() {
        assert!(VolumeLayout::new(0, 4, 4, 3).is_err());
        assert!(VolumeLayout::new(4, 4, 4, 0).is_err());
        assert!(VolumeLayout::new(4, 4, 4, 5).is_err());
        assert!(VolumeLayout::new(u32::MAX, u32::MAX, u32::MAX, 4).is_err());
        assert!(VolumeLayout::cube(255, 3).is_ok());
    }

    #[test]
    fn test_index_is_row_major_interleaved() {
        let l = VolumeLayout::new(4, 3, 2, 3).unwrap();
        assert_eq!(l.index(0, 0, 0, 0), 0);
        assert_eq!(l.index(0, 0, 0, 2), 2);
        assert_eq!(l.index(1, 0, 0, 0), 3);
        assert_eq!(l.index(0, 1, 0, 0), 12);
        assert_eq!(l.index(0, 0, 1, 0), 36);
        assert_eq!(l.index(3, 2, 1, 2), l.len() - 1);
        assert_eq!(l.slice_len(), 36);
    }

    #[test]
    fn test_sweep_shape_and_replication() {
        let l = VolumeLayout::cube(4, 3).unwrap();
        let data = sweep(&l, |p| p.x + 10.0 * p.y + 100.0 * p.z);
        assert_eq!(data.len(), 192);
        for cell in data.chunks_exact(3) {
            assert_eq!(cell[0].to_bits(), cell[1].to_bits());
            assert_eq!(cell[1].to_bits(), cell[2].to_bits());
        }
    }

    #[test]
    fn test_sweep_visits_points_in_order() {
        let l = VolumeLayout::new(2, 3, 4, 1).unwrap();
        let data = sweep(&l, |p| p.x + 10.0 * p.y + 100.0 * p.z);
        for z in 0..4 {
            for y in 0..3 {
                for x in 0..2 {
                    let p = l.sample_point(x, y, z);
                    assert_eq!(data[l.index(x, y, z, 0)], p.x + 10.0 * p.y + 100.0 * p.z);
                }
            }
        }
        assert_eq!(l.sample_point(1, 2, 3), Vec3::new(0.5, 1.0 / 3.0 + 1.0 / 3.0, 0.75));
    }

    #[test]
    fn test_axis_coords_accumulate() {
        let coords = VolumeLayout::axis_coords(255);
        let step = 1.0f32 / 255.0;
        let mut c = 0.0f32;
        for v in coords {
            assert_eq!(v.to_bits(), c.to_bits());
            c += step;
        }
    }

    #[test]
    fn test_sample_point_matches_axis_coords() {
        let l = VolumeLayout::new(255, 17, 3, 1).unwrap();
        let (xs, ys, zs) = (
            VolumeLayout::axis_coords(255),
            VolumeLayout::axis_coords(17),
            VolumeLayout::axis_coords(3),
        );
        for (x, y, z) in [(0, 0, 0), (254, 16, 2), (128, 5, 1), (37, 11, 0)] {
            let p = l.sample_point(x, y, z);
            assert_eq!(p.x.to_bits(), xs[x as usize].to_bits());
            assert_eq!(p.y.to_bits(), ys[y as usize].to_bits());
            assert_eq!(p.z.to_bits(), zs[z as usize].to_bits());
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let l = VolumeLayout::new(7, 5, 9, 3).unwrap();
        let f = |p: Vec3| (p.x * 13.0).sin() * (p.y * 7.0).cos() + p.z;
        let seq = sweep(&l, f);
        for threads in [1, 2, 4] {
            let par = sweep_parallel(&l, threads, f).unwrap();
            assert_eq!(seq.len(), par.len());
            assert!(seq.iter().zip(&par).all(|(a, b)| a.to_bits() == b.to_bits()));
        }
    }

    #[test]
    fn test_value_range() {
        let v = VolumeData { size: [2, 1, 1], channels: 1, data: vec![0.25, -1.0] };
        assert_eq!(v.value_range(), Some((-1.0, 0.25)));
        assert_eq!(v.layout().unwrap().len(), 2);
    }
}
