use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Audio Oscillator
================

Ambient layers use oscillators at fixed frequencies; nothing here tracks a
keyboard pitch. The waveform decides the raw material:

Sine:     Pure tone. Bird chirps, cafe murmur layers, notification beeps.
Sawtooth: All harmonics. Low saws through a low-pass filter become wind
          (100 Hz → 200 Hz cutoff) and surf (50 Hz → 300 Hz cutoff).
Square / Triangle: available for custom sound definitions.

Example usage:
  let wind = OscNode::sawtooth(100.0).through(FilterNode::lowpass(200.0));
  let bird = OscNode::sine(3000.0);

Lifecycle:
  An oscillator runs from construction until `stop()`. A stopped
  oscillator renders silence and reports inactive; it cannot be restarted,
  matching one-shot audio sources. Build a new node instead.
*/

pub struct OscNode {
    osc: OscillatorBlock,
    frequency: f32,
    stopped: bool,
}

impl OscNode {
    pub fn new(waveform: OscillatorWaveform, frequency: f32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform),
            frequency,
            stopped: false,
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, frequency)
    }

    pub fn sawtooth(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Saw, frequency)
    }

    pub fn square(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Square, frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Triangle, frequency)
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.clamp(0.0, 20_000.0);
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if self.stopped {
            out.fill(0.0);
            return;
        }
        self.osc.render(out, self.frequency, ctx.sample_rate);
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn is_active(&self) -> bool {
        !self.stopped
    }
}
