//! Command-line arguments.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use marble_engine::MarbleConfig;

#[derive(Parser, Debug)]
#[command(name = "marble_baker")]
#[command(about = "Bakes a lattice-noise marble volume to disk", long_about = None)]
pub struct Args {
    /// RON config file; built-in defaults are used when absent
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seed for the lattice tables (overrides the config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Cube side length (overrides the config size)
    #[arg(long, value_name = "N")]
    pub size: Option<u32>,

    /// Worker threads for the sweep
    #[arg(long)]
    pub threads: Option<usize>,

    /// Turbulence octave count
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Output path stem; writes <OUT>.f32 and <OUT>.json
    #[arg(long, value_name = "OUT", default_value = "marble")]
    pub out: PathBuf,

    /// Also write <OUT>_slice<Z>.png for this z slice
    #[arg(long, value_name = "Z")]
    pub preview_slice: Option<u32>,

    /// Read the written files back and check them against the bake
    #[arg(long)]
    pub verify: bool,
}

impl Args {
    pub fn resolve_config(&self) -> anyhow::Result<MarbleConfig> {
        let mut config = match &self.config {
            Some(path) => MarbleConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => MarbleConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(n) = self.size {
            config.size = [n; 3];
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(octaves) = self.octaves {
            config.octaves = octaves;
        }
        config.validate().context("invalid bake settings")?;
        Ok(config)
    }
}
