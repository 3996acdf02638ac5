//! Raw volume + JSON sidecar.
//!
//! `<stem>.f32` holds the buffer as little-endian `f32` in sweep order
//! (x fastest, then y, then z, channels interleaved). `<stem>.json`
//! describes it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use marble_engine::{MarbleConfig, Pattern, Seed, VolumeData, VolumeLayout};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMetadata {
    pub size: [u32; 3],
    pub channels: u8,
    pub layout: String,
    pub pattern: Pattern,
    pub octaves: u32,
    pub seed: Option<u64>,
    pub min: f32,
    pub max: f32,
}

pub const LAYOUT_NAME: &str = "xyz-interleaved-f32le";

pub fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut s = stem.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

pub fn write_volume(
    stem: &Path,
    volume: &VolumeData,
    config: &MarbleConfig,
    seed: Option<Seed>,
) -> anyhow::Result<VolumeMetadata> {
    let (min, max) = volume.value_range().unwrap_or((0.0, 0.0));
    let meta = VolumeMetadata {
        size: volume.size,
        channels: volume.channels,
        layout: LAYOUT_NAME.to_string(),
        pattern: config.pattern,
        octaves: config.octaves,
        seed: seed.map(|s| s.0),
        min,
        max,
    };

    let mut bytes = Vec::with_capacity(volume.data.len() * 4);
    for v in &volume.data {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    let raw_path = with_suffix(stem, ".f32");
    fs::write(&raw_path, bytes).with_context(|| format!("writing {}", raw_path.display()))?;

    let meta_path = with_suffix(stem, ".json");
    let json = serde_json::to_string_pretty(&meta)?;
    fs::write(&meta_path, json).with_context(|| format!("writing {}", meta_path.display()))?;

    log::info!("Wrote {} and {}", raw_path.display(), meta_path.display());
    Ok(meta)
}

pub fn read_volume(stem: &Path) -> anyhow::Result<(VolumeMetadata, VolumeData)> {
    let meta_path = with_suffix(stem, ".json");
    let content = fs::read_to_string(&meta_path).with_context(|| format!("reading {}", meta_path.display()))?;
    let meta: VolumeMetadata = serde_json::from_str(&content)?;
    if meta.layout != LAYOUT_NAME {
        bail!("unsupported layout '{}'", meta.layout);
    }

    let raw_path = with_suffix(stem, ".f32");
    let bytes = fs::read(&raw_path).with_context(|| format!("reading {}", raw_path.display()))?;
    let layout = VolumeLayout::from_size(meta.size, meta.channels)
        .with_context(|| format!("bad volume shape in {}", meta_path.display()))?;
    let Some(expected) = layout.len().checked_mul(4) else {
        bail!("volume {:?} is too large to read", layout.size());
    };
    if bytes.len() != expected {
        bail!("{} holds {} bytes, expected {}", raw_path.display(), bytes.len(), expected);
    }
    let data = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    let volume = VolumeData { size: meta.size, channels: meta.channels, data };
    Ok((meta, volume))
}
