use std::time::Instant;

use glam::Vec3;
use log::{debug, info};

use crate::api::*;
use crate::marble::MarbleSynthesizer;
use crate::random::StdRandom;
use crate::volume::{sweep, sweep_parallel, VolumeLayout};

pub struct MarbleEngine {
    synth: MarbleSynthesizer,
    seed: Option<Seed>,
}

impl MarbleEngine {
    pub fn new(synth: MarbleSynthesizer) -> Self {
        Self { synth, seed: None }
    }

    pub fn with_seed(seed: Seed) -> Self {
        Self { synth: MarbleSynthesizer::with_seed(seed.0), seed: Some(seed) }
    }

    pub fn with_octaves(self, octaves: u32) -> Self {
        Self { synth: self.synth.with_octaves(octaves), ..self }
    }

    pub fn synthesizer(&self) -> &MarbleSynthesizer {
        &self.synth
    }

    /// `None` when the tables came from entropy or a caller-supplied source.
    pub fn seed(&self) -> Option<Seed> {
        self.seed
    }

    fn sample_with<F>(&self, layout: &VolumeLayout, threads: usize, field: F) -> Result<Vec<f32>, NoiseError>
    where
        F: Fn(Vec3) -> f32 + Sync,
    {
        if threads > 1 {
            sweep_parallel(layout, threads, field)
        } else {
            Ok(sweep(layout, field))
        }
    }
}

fn check_request(req: &VolumeRequest) -> Result<VolumeLayout, NoiseError> {
    if req.threads == 0 {
        return Err(NoiseError::Config("thread count must be at least 1".into()));
    }
    if let Some(bad) = req.pattern.parameters().into_iter().find(|v| !v.is_finite()) {
        return Err(NoiseError::Config(format!("pattern {:?} has non-finite parameter {}", req.pattern, bad)));
    }
    VolumeLayout::from_size(req.size, req.channels)
}

impl NoiseEngine for MarbleEngine {
    fn validate(&self) -> Result<(), NoiseError> {
        if self.synth.octaves() == 0 { return Err(NoiseError::Config("turbulence needs at least one octave".into())); }
        Ok(())
    }

    fn bake(&mut self, seed: Seed) -> Result<(), NoiseError> {
        let mut rng = StdRandom::from_seed(seed.0);
        self.synth.reset_tables(&mut rng)?;
        self.seed = Some(seed);
        debug!("Baked lattice tables from seed {}", seed.0);
        Ok(())
    }

    fn sample_volume(&self, req: &VolumeRequest) -> Result<VolumeData, NoiseError> {
        self.validate()?;
        let layout = check_request(req)?;
        let started = Instant::now();
        let synth = &self.synth;
        let data = match req.pattern {
            Pattern::Marble { amplitude, strength } => {
                self.sample_with(&layout, req.threads, |p| synth.marble(amplitude, strength, p))?
            }
            Pattern::SineMarble { strength } => {
                self.sample_with(&layout, req.threads, |p| synth.marble_sine(strength, p))?
            }
            Pattern::Turbulence { scale } => {
                self.sample_with(&layout, req.threads, |p| synth.turbulence(scale, p))?
            }
            Pattern::Noise { scale } => {
                self.sample_with(&layout, req.threads, |p| synth.lattice().noise(scale, p))?
            }
        };
        info!(
            "Sampled {:?} volume {}x{}x{} ({} values) in {:.2?}",
            req.pattern,
            layout.width,
            layout.height,
            layout.depth,
            data.len(),
            started.elapsed()
        );
        Ok(VolumeData { size: layout.size(), channels: layout.channels, data })
    }
}
