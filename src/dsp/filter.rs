use std::f32::consts::{FRAC_1_SQRT_2, PI};

use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
| type              | passes          | rejects      | used by                  |
| ----------------- | --------------- | ------------ | ------------------------ |
| low-pass          | below cutoff    | above cutoff | rain, noise, wind, waves |
| high-pass         | above cutoff    | below cutoff |                          |
| band-pass         | around cutoff   | outside      | cafe chatter             |
| notch / band-stop | outside         | around       |                          |

Q sets the bandwidth: k = 1 / Q damps the loop. The band-pass output is
scaled by k so its peak sits at 0 dB regardless of Q.
*/

/// Butterworth damping, the flattest pass band without a resonant bump.
pub const DEFAULT_Q: f32 = FRAC_1_SQRT_2;

/// Cutoffs are kept below this fraction of the sample rate; the
/// prewarped `tan` term blows up as the cutoff approaches Nyquist.
const MAX_CUTOFF_RATIO: f32 = 0.49;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: q.max(1e-3),
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, DEFAULT_Q)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, DEFAULT_Q)
    }

    pub fn bandpass(cutoff_hz: f32, q: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz, q)
    }

    pub fn notch(cutoff_hz: f32, q: f32) -> Self {
        Self::new(FilterType::Notch, cutoff_hz, q)
    }

    #[inline]
    fn compute_g(&self, sample_rate: f32) -> f32 {
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * MAX_CUTOFF_RATIO);
        (PI * cutoff / sample_rate).tan()
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: k * v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let g = self.compute_g(ctx.sample_rate);
        let k = 1.0 / self.q;

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, k, g);

            *sample = match self.filter_type {
                FilterType::LowPass => outputs.lowpass,
                FilterType::HighPass => outputs.highpass,
                FilterType::BandPass => outputs.bandpass,
                FilterType::Notch => outputs.notch,
            }
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q.max(1e-3);
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}
