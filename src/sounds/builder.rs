use rand::RngCore;

use crate::{
    dsp::noise::{generate_noise_buffer, NoiseColor},
    engine::modulation::Modulation,
    error::BuildError,
    graph::{
        buffer::BufferSourceNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode,
    },
    sounds::{instance::Layer, SoundDefinition, SoundKind},
};

/// Wind: saw through a fixed low-pass, starting at a gentle level.
const WIND_CUTOFF_HZ: f32 = 200.0;
const WIND_START_GAIN: f32 = 0.1;

/// Cafe: three staggered layers, band-passed narrowly.
const CHATTER_LAYERS: usize = 3;
const CHATTER_FREQ_STEP_HZ: f32 = 50.0;
const CHATTER_BAND_STEP_HZ: f32 = 200.0;
const CHATTER_Q: f32 = 5.0;
const CHATTER_START_GAIN: f32 = 0.05;

/// Ocean: a low saw rumble shaped by the swell envelope.
const SURF_FREQ_HZ: f32 = 50.0;
const SURF_CUTOFF_HZ: f32 = 300.0;

/// What the builder needs from the running mixer.
pub struct BuildCtx<'a> {
    pub rng: &'a mut dyn RngCore,
    pub noise_buffer_len: usize,
}

/// Freshly wired layers for one activation of a sound.
///
/// Nothing is audible yet: the owning `SoundInstance` keeps its gain at
/// zero until the mixer ramps it up.
pub struct SoundGraph {
    pub layers: Vec<Layer>,
}

impl SoundGraph {
    /// Layers whose gain is driven by a recurring modulation.
    pub fn modulated_layers(&self) -> impl Iterator<Item = (usize, Modulation)> + '_ {
        self.layers
            .iter()
            .enumerate()
            .filter_map(|(i, layer)| layer.modulation().map(|m| (i, m)))
    }
}

fn check_frequency(what: &'static str, value: f32) -> Result<f32, BuildError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(BuildError::InvalidFrequency { what, value })
    }
}

/// Wire the signal path for one sound definition.
pub fn build_graph(definition: &SoundDefinition, ctx: &mut BuildCtx<'_>) -> Result<SoundGraph, BuildError> {
    let layers = match &definition.kind {
        SoundKind::Noise {
            base_freq,
            filter_freq,
        } => {
            let base = check_frequency("noise base", *base_freq)?;
            let cutoff = check_frequency("noise filter", filter_freq.unwrap_or(base))?;
            if ctx.noise_buffer_len == 0 {
                return Err(BuildError::EmptyNoiseBuffer);
            }

            let color = NoiseColor::from_base_frequency(base);
            let buffer = generate_noise_buffer(ctx.noise_buffer_len, color, &mut *ctx.rng);
            let source = BufferSourceNode::looping(buffer).through(FilterNode::lowpass(cutoff));

            vec![Layer::new(source.boxed(), 1.0, None)]
        }

        SoundKind::Nature {
            bird_freqs,
            wind_freq,
        } => {
            let mut layers = Vec::with_capacity(bird_freqs.len() + 1);
            for &freq in bird_freqs {
                let freq = check_frequency("bird", freq)?;
                layers.push(Layer::new(
                    OscNode::sine(freq).boxed(),
                    0.0,
                    Some(Modulation::Chirp),
                ));
            }

            let wind = OscNode::sawtooth(check_frequency("wind", *wind_freq)?)
                .through(FilterNode::lowpass(WIND_CUTOFF_HZ));
            layers.push(Layer::new(wind.boxed(), WIND_START_GAIN, Some(Modulation::wind())));
            layers
        }

        SoundKind::Ambient {
            base_freq,
            chatter_freq,
        } => {
            let base = check_frequency("chatter base", *base_freq)?;
            let band = check_frequency("chatter band", *chatter_freq)?;

            (0..CHATTER_LAYERS)
                .map(|i| {
                    let step = i as f32;
                    let voice = OscNode::sine(base + step * CHATTER_FREQ_STEP_HZ).through(
                        FilterNode::bandpass(band + step * CHATTER_BAND_STEP_HZ, CHATTER_Q),
                    );
                    Layer::new(voice.boxed(), CHATTER_START_GAIN, Some(Modulation::chatter()))
                })
                .collect()
        }

        SoundKind::Wave { frequency } => {
            let frequency = check_frequency("wave", *frequency)?;
            let surf = OscNode::sawtooth(SURF_FREQ_HZ).through(FilterNode::lowpass(SURF_CUTOFF_HZ));
            vec![Layer::new(surf.boxed(), 0.0, Some(Modulation::waves(frequency)))]
        }
    };

    Ok(SoundGraph { layers })
}
