use rand::Rng;
use serde::{Deserialize, Serialize};

/*
Coloured Noise Buffers
======================

Noise is the raw material for rain, rushing water and the two "pure" noise
sounds. We render one buffer per sound activation and loop it; at 4096
samples or more there is no audible loop point.

White
-----
Every sample is an independent uniform draw in [-1, 1]. Flat spectrum, hiss.

Brown (red)
-----------
A leaky random walk over white noise:

    next = (prev + 0.02 * white) / 1.02

The divide is the leak. Without it the walk drifts without bound; with it
the walk settles around zero and behaves like a first-order low-pass over
white noise (energy falls off ~6 dB/octave). The settled walk is quiet
(std dev ~0.06), so each sample is scaled by 3.5 and clamped to [-1, 1].

Choosing a colour
-----------------
Sound definitions carry a base frequency rather than a colour. Anything
strictly above 1000 Hz is rendered white, everything else brown. Rain sits
exactly on 1000 Hz and therefore gets brown noise.
*/

/// Base frequencies strictly above this render white noise.
pub const WHITE_NOISE_THRESHOLD_HZ: f32 = 1000.0;

const BROWN_STEP: f32 = 0.02;
const BROWN_LEAK: f32 = 1.02;
const BROWN_GAIN: f32 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseColor {
    White,
    Brown,
}

impl NoiseColor {
    pub fn from_base_frequency(base_hz: f32) -> Self {
        if base_hz > WHITE_NOISE_THRESHOLD_HZ {
            NoiseColor::White
        } else {
            NoiseColor::Brown
        }
    }
}

/// Fill a fresh buffer of `len` samples with noise of the given colour.
pub fn generate_noise_buffer<R: Rng + ?Sized>(len: usize, color: NoiseColor, rng: &mut R) -> Vec<f32> {
    let mut buffer = vec![0.0; len];
    fill_noise(&mut buffer, color, rng);
    buffer
}

/// Overwrite `buffer` with noise. The brown walk starts from zero.
pub fn fill_noise<R: Rng + ?Sized>(buffer: &mut [f32], color: NoiseColor, rng: &mut R) {
    match color {
        NoiseColor::White => {
            for sample in buffer.iter_mut() {
                *sample = rng.gen_range(-1.0..=1.0);
            }
        }
        NoiseColor::Brown => {
            let mut last = 0.0f32;
            for sample in buffer.iter_mut() {
                let white: f32 = rng.gen_range(-1.0..=1.0);
                last = (last + BROWN_STEP * white) / BROWN_LEAK;
                *sample = (last * BROWN_GAIN).clamp(-1.0, 1.0);
            }
        }
    }
}
