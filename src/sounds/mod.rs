//! Ambient sound definitions and the graphs built from them.
//!
//! A `SoundDefinition` is an immutable recipe loaded once at startup. Each
//! time a sound starts, `build_graph` turns the recipe into fresh nodes,
//! which the sound's `SoundInstance` owns until it stops.
//!
//! | sound       | kind    | signal path                                            |
//! | ----------- | ------- | ------------------------------------------------------ |
//! | rain        | noise   | brown noise → low-pass 400 Hz                          |
//! | forest      | nature  | 3 chirping sines + gusting saw wind → low-pass 200 Hz  |
//! | cafe        | ambient | 3 sines → band-pass 1.0/1.2/1.4 kHz, chatter bursts    |
//! | ocean       | wave    | 50 Hz saw → low-pass 300 Hz, swelling every 2 s        |
//! | brown_noise | noise   | brown noise → low-pass 60 Hz                           |
//! | white_noise | noise   | white noise → low-pass 20 kHz                          |

mod builder;
mod instance;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dsp::noise::NoiseColor;

pub use builder::{build_graph, BuildCtx, SoundGraph};
pub use instance::{Layer, SoundInstance};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SoundKind {
    /// Looping coloured noise through a low-pass filter.
    Noise {
        base_freq: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter_freq: Option<f32>,
    },
    /// Bird chirps over gusting wind.
    Nature { bird_freqs: Vec<f32>, wind_freq: f32 },
    /// Room murmur: band-passed layers with chatter bursts.
    Ambient { base_freq: f32, chatter_freq: f32 },
    /// Low surf with periodic swells.
    Wave { frequency: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundDefinition {
    #[serde(flatten)]
    pub kind: SoundKind,
    /// Gain applied at full volume (volume 1.0).
    pub gain: f32,
}

impl SoundDefinition {
    pub fn noise(base_freq: f32, filter_freq: Option<f32>, gain: f32) -> Self {
        Self {
            kind: SoundKind::Noise {
                base_freq,
                filter_freq,
            },
            gain,
        }
    }

    pub fn nature(bird_freqs: Vec<f32>, wind_freq: f32, gain: f32) -> Self {
        Self {
            kind: SoundKind::Nature {
                bird_freqs,
                wind_freq,
            },
            gain,
        }
    }

    pub fn ambient(base_freq: f32, chatter_freq: f32, gain: f32) -> Self {
        Self {
            kind: SoundKind::Ambient {
                base_freq,
                chatter_freq,
            },
            gain,
        }
    }

    pub fn wave(frequency: f32, gain: f32) -> Self {
        Self {
            kind: SoundKind::Wave { frequency },
            gain,
        }
    }

    /// Noise colour for noise sounds, derived from the base frequency.
    pub fn noise_color(&self) -> Option<NoiseColor> {
        match self.kind {
            SoundKind::Noise { base_freq, .. } => Some(NoiseColor::from_base_frequency(base_freq)),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SoundKind::Noise { .. } => "noise",
            SoundKind::Nature { .. } => "nature",
            SoundKind::Ambient { .. } => "ambient",
            SoundKind::Wave { .. } => "wave",
        }
    }
}

/// The stock soundscape.
pub fn builtin_sounds() -> BTreeMap<String, SoundDefinition> {
    [
        ("rain", SoundDefinition::noise(1000.0, Some(400.0), 0.3)),
        (
            "forest",
            SoundDefinition::nature(vec![2000.0, 3000.0, 4000.0], 100.0, 0.25),
        ),
        ("cafe", SoundDefinition::ambient(200.0, 1000.0, 0.2)),
        ("ocean", SoundDefinition::wave(0.5, 0.3)),
        ("brown_noise", SoundDefinition::noise(60.0, None, 0.4)),
        ("white_noise", SoundDefinition::noise(20_000.0, None, 0.3)),
    ]
    .into_iter()
    .map(|(name, def)| (name.to_string(), def))
    .collect()
}
