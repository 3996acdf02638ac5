use anyhow::Context;
use clap::Parser;
use log::info;
use marble_engine::NoiseEngine;
mod cli; mod export; mod preview;
use cli::Args;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.resolve_config()?;

    let engine = config.build_engine().context("building lattice tables")?;
    match engine.seed() {
        Some(seed) => info!("Baking {:?} with seed {}", config.size, seed.0),
        None => info!("Baking {:?} with an entropy seed", config.size),
    }

    let volume = engine.sample_volume(&config.to_request()).context("sampling volume")?;
    let meta = export::write_volume(&args.out, &volume, &config, engine.seed())?;
    info!("Value range [{}, {}]", meta.min, meta.max);

    if args.verify {
        let (_, read_back) = export::read_volume(&args.out)?;
        anyhow::ensure!(read_back == volume, "written volume does not match the bake");
        info!("Verified {}", args.out.display());
    }

    if let Some(z) = args.preview_slice {
        let path = export::with_suffix(&args.out, &format!("_slice{}.png", z));
        preview::write_slice_png(&path, &volume, &config.pattern, z)?;
    }
    Ok(())
}
