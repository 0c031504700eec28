use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
    Triangle,
}

/// Phase-accumulator oscillator. Phase lives in [0, 1).
///
/// The sample for index `n` is taken before the phase advances, so a sine
/// block starting at phase zero reads `sin(2π f n / sr)`.
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self { waveform, phase: 0.0 }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    #[inline]
    fn shape(&self) -> f32 {
        let p = self.phase;
        match self.waveform {
            OscillatorWaveform::Sine => (TAU * p).sin(),
            OscillatorWaveform::Saw => 2.0 * p - 1.0,
            OscillatorWaveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
        }
    }

    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        let increment = frequency / sample_rate;
        for sample in out.iter_mut() {
            *sample = self.shape();
            self.phase += increment;
            self.phase -= self.phase.floor();
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
