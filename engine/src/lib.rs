//! Lattice value noise and the marble volume it drives.
//!
//! ```
//! use marble_engine::*;
//!
//! let engine = MarbleEngine::with_seed(Seed(42));
//! let req = VolumeRequest { size: [4, 4, 4], channels: 3, pattern: Pattern::default(), threads: 1 };
//! let volume = engine.sample_volume(&req).unwrap();
//! assert_eq!(volume.data.len(), 4 * 4 * 4 * 3);
//! ```

pub mod api;
pub mod config;
pub mod lattice;
pub mod marble;
pub mod random;
pub mod sampling;
pub mod volume;

pub use api::*;
pub use config::MarbleConfig;
pub use lattice::LatticeNoise;
pub use marble::{undulate, MarbleSynthesizer};
pub use random::{RandomSource, ReplaySource, StdRandom};
pub use sampling::MarbleEngine;
pub use volume::VolumeLayout;
pub use glam::Vec3;
