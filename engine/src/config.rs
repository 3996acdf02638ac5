//! RON configuration for a marble bake.
//!
//! ```ron
//! (
//!     seed: Some(12345),
//!     size: (128, 128, 128),
//!     pattern: Marble(amplitude: 0.00007, strength: 18.0),
//!     threads: 4,
//! )
//! ```
//!
//! Every field is optional and falls back to the standard bake
//! (255³ RGB, 4 octaves, single-threaded).

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::api::{NoiseError, Pattern, Seed, VolumeRequest};
use crate::lattice::{LatticeNoise, DEFAULT_OCTAVES};
use crate::marble::MarbleSynthesizer;
use crate::random::StdRandom;
use crate::sampling::MarbleEngine;
use crate::volume::VolumeLayout;

pub const DEFAULT_SIDE: u32 = 255;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarbleConfig {
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub size: [u32; 3],
    pub channels: u8,
    pub octaves: u32,
    pub pattern: Pattern,
    pub threads: usize,
}

impl Default for MarbleConfig {
    fn default() -> Self {
        Self {
            seed: None,
            size: [DEFAULT_SIDE; 3],
            channels: 3,
            octaves: DEFAULT_OCTAVES,
            pattern: Pattern::default(),
            threads: 1,
        }
    }
}

impl MarbleConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, NoiseError> {
        let config: MarbleConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, NoiseError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_ron_str(&content)?;
        info!("Loaded marble config from {}", path.display());
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, NoiseError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| NoiseError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NoiseError> {
        VolumeLayout::from_size(self.size, self.channels)?;
        if self.octaves == 0 {
            return Err(NoiseError::Config("octaves must be at least 1".into()));
        }
        if self.threads == 0 {
            return Err(NoiseError::Config("threads must be at least 1".into()));
        }
        if self.pattern.parameters().iter().any(|v| !v.is_finite()) {
            return Err(NoiseError::Config(format!("pattern {:?} has a non-finite parameter", self.pattern)));
        }
        Ok(())
    }

    pub fn to_request(&self) -> VolumeRequest {
        VolumeRequest { size: self.size, channels: self.channels, pattern: self.pattern, threads: self.threads }
    }

    pub fn build_engine(&self) -> Result<MarbleEngine, NoiseError> {
        self.validate()?;
        let engine = match self.seed {
            Some(seed) => MarbleEngine::with_seed(Seed(seed)).with_octaves(self.octaves),
            None => {
                let mut rng = StdRandom::from_entropy();
                let lattice = LatticeNoise::new(&mut rng)?;
                MarbleEngine::new(MarbleSynthesizer::new(lattice).with_octaves(self.octaves))
            }
        };
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NoiseEngine;
    use std::io::Write;

    #[test]
    fn test_defaults_match_standard_bake() {
        let c = MarbleConfig::default();
        assert_eq!(c.size, [255, 255, 255]);
        assert_eq!(c.channels, 3);
        assert_eq!(c.octaves, 4);
        assert_eq!(c.pattern, Pattern::Marble { amplitude: 0.00007, strength: 18.0 });
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let c = MarbleConfig::from_ron_str("(seed: Some(7), size: (8, 4, 2), threads: 2)").unwrap();
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.size, [8, 4, 2]);
        assert_eq!(c.threads, 2);
        assert_eq!(c.channels, 3);
        let req = c.to_request();
        assert_eq!(req.size, [8, 4, 2]);
        assert_eq!(req.threads, 2);
    }

    #[test]
    fn test_pattern_variants_parse() {
        let c = MarbleConfig::from_ron_str("(pattern: SineMarble(strength: 0.001))").unwrap();
        assert_eq!(c.pattern, Pattern::SineMarble { strength: 0.001 });
        let c = MarbleConfig::from_ron_str("(pattern: Noise(scale: 2.5))").unwrap();
        assert_eq!(c.pattern, Pattern::Noise { scale: 2.5 });
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(MarbleConfig::from_ron_str("(size: (0, 4, 4))"), Err(NoiseError::Config(_))));
        assert!(matches!(MarbleConfig::from_ron_str("(channels: 9)"), Err(NoiseError::Config(_))));
        assert!(matches!(MarbleConfig::from_ron_str("(octaves: 0)"), Err(NoiseError::Config(_))));
        assert!(matches!(MarbleConfig::from_ron_str("(threads: 0)"), Err(NoiseError::Config(_))));
        assert!(matches!(MarbleConfig::from_ron_str("(size: 12)"), Err(NoiseError::Parse(_))));
    }

    #[test]
    fn test_ron_round_trip() {
        let c = MarbleConfig { seed: Some(3), size: [16, 16, 8], threads: 4, ..Default::default() };
        let text = c.to_ron_string().unwrap();
        assert_eq!(MarbleConfig::from_ron_str(&text).unwrap(), c);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(seed: Some(42), size: (4, 4, 4), octaves: 2)").unwrap();
        let c = MarbleConfig::load(file.path()).unwrap();
        assert_eq!(c.octaves, 2);
        assert!(matches!(MarbleConfig::load(file.path().with_extension("missing")), Err(NoiseError::Io(_))));
    }

    #[test]
    fn test_seeded_engine_reproducible() {
        let c = MarbleConfig { seed: Some(11), size: [3, 3, 3], octaves: 3, ..Default::default() };
        let a = c.build_engine().unwrap();
        let b = c.build_engine().unwrap();
        assert_eq!(a.seed(), Some(Seed(11)));
        assert_eq!(a.synthesizer().octaves(), 3);
        assert_eq!(a.sample_volume(&c.to_request()).unwrap(), b.sample_volume(&c.to_request()).unwrap());
    }

    #[test]
    fn test_unseeded_engine_builds() {
        let c = MarbleConfig { size: [2, 2, 2], ..Default::default() };
        let engine = c.build_engine().unwrap();
        assert_eq!(engine.seed(), None);
        assert_eq!(engine.sample_volume(&c.to_request()).unwrap().data.len(), 24);
    }
}
