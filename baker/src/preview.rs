use std::path::Path;

use anyhow::{bail, Context};
use image::{GrayImage, Luma};
use marble_engine::{Pattern, VolumeData};

/// Channel 0 of slice `z` as 8-bit grayscale. Marble patterns are already in
/// roughly [0, 1] and are clamped; raw noise and turbulence are stretched over
/// the volume's value range.
pub fn slice_image(volume: &VolumeData, pattern: &Pattern, z: u32) -> anyhow::Result<GrayImage> {
    let layout = volume.layout()?;
    if z >= layout.depth {
        bail!("slice {} out of range, volume depth is {}", z, layout.depth);
    }
    let (lo, hi) = match pattern {
        Pattern::Marble { .. } | Pattern::SineMarble { .. } => (0.0, 1.0),
        Pattern::Turbulence { .. } | Pattern::Noise { .. } => volume.value_range().unwrap_or((0.0, 1.0)),
    };
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut img = GrayImage::new(layout.width, layout.height);
    for y in 0..layout.height {
        for x in 0..layout.width {
            let v = volume.data[layout.index(x, y, z, 0)];
            let v = (((v - lo) / span).clamp(0.0, 1.0) * 255.0) as u8;
            img.put_pixel(x, y, Luma([v]));
        }
    }
    Ok(img)
}

pub fn write_slice_png(path: &Path, volume: &VolumeData, pattern: &Pattern, z: u32) -> anyhow::Result<()> {
    let img = slice_image(volume, pattern, z)?;
    img.save(path).with_context(|| format!("saving preview {}", path.display()))?;
    log::info!("Wrote slice {} preview to {}", z, path.display());
    Ok(())
}
