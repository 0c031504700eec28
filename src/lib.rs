//! Procedural ambient soundscapes for study timers.
//!
//! Each ambient sound (rain, forest, cafe, ocean, coloured noise) is built
//! from a handful of primitives: looping noise buffers, fixed-frequency
//! oscillators, state-variable filters and gain envelopes. A small scheduler
//! keeps re-drawing random gain envelopes while a sound plays so the texture
//! never settles into an obvious loop.
//!
//! ```ignore
//! use studyflow_ambient::{config::EngineConfig, mixer::Mixer};
//!
//! let mut mixer = Mixer::new(EngineConfig::default(), 48_000.0);
//! mixer.set_volume("rain", 0.4);
//! let mut block = vec![0.0; 512];
//! mixer.render_block(&mut block);
//! ```

pub mod config;
pub mod dsp; // Signal math: noise, oscillators, filters, envelopes
pub mod engine; // Audio clock, task queue, modulation personalities
pub mod error;
pub mod graph; // Composable render nodes
pub mod io;
pub mod mixer;
pub mod notification;
pub mod sounds;
pub mod system;
pub mod visualizer;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f64 = 1.0 / 48_000.0;
