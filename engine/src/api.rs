use serde::{Deserialize, Serialize}; use thiserror::Error;
#[derive(Debug, Error)] pub enum NoiseError { #[error("Random source failed: {0}")] RandomSource(String), #[error("Invalid configuration: {0}")] Config(String), #[error("Config parse error: {0}")] Parse(#[from] ron::error::SpannedError), #[error("I/O error: {0}")] Io(#[from] std::io::Error), #[error("Thread pool error: {0}")] ThreadPool(String) }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)] pub struct Seed(pub u64);

/// Scalar field evaluated at every cell of a volume sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// `undulate(cos(2π·z + amplitude·turbulence(strength, p)))`
    Marble { amplitude: f32, strength: f32 },
    /// `undulate(sin(6·z + strength·turbulence(10, p)))`
    SineMarble { strength: f32 },
    Turbulence { scale: f32 },
    Noise { scale: f32 },
}

impl Default for Pattern {
    fn default() -> Self {
        Pattern::Marble { amplitude: 0.00007, strength: 18.0 }
    }
}

impl Pattern {
    pub fn parameters(&self) -> Vec<f32> {
        match *self {
            Pattern::Marble { amplitude, strength } => vec![amplitude, strength],
            Pattern::SineMarble { strength } => vec![strength],
            Pattern::Turbulence { scale } | Pattern::Noise { scale } => vec![scale],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)] pub struct VolumeRequest { pub size: [u32; 3], pub channels: u8, pub pattern: Pattern, pub threads: usize }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)] pub struct VolumeData { pub size: [u32; 3], pub channels: u8, pub data: Vec<f32> }
pub trait NoiseEngine: Send + Sync { fn validate(&self) -> Result<(), NoiseError>; fn bake(&mut self, seed: Seed) -> Result<(), NoiseError>; fn sample_volume(&self, req: &VolumeRequest) -> Result<VolumeData, NoiseError>; }
