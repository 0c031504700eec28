use crate::{
    dsp::filter::{FilterType, SVFilter},
    graph::node::{GraphNode, RenderCtx},
};

/*
State-Variable Filter Node
==========================

Ambient textures are mostly about taking something harsh (noise, a saw
wave) and filtering it until it reads as weather:

Lowpass: Passes frequencies BELOW the cutoff.
  - 200 Hz on a 100 Hz saw:  distant wind
  - 300 Hz on a 50 Hz saw:   surf rumble
  - 400 Hz on brown noise:   rain on a roof

Bandpass: Passes a band AROUND the centre.
  - Q = 5 around 1-1.4 kHz:  the murmur band of a room full of voices

Highpass / Notch: available for custom definitions.

Q (bandwidth):
  - 0.707: Butterworth, flat pass band (the low-pass default)
  - 5:     narrow, focused band
*/

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            filter: SVFilter::new(filter_type, cutoff_hz, q),
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::lowpass(cutoff_hz),
        }
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::highpass(cutoff_hz),
        }
    }

    pub fn bandpass(cutoff_hz: f32, q: f32) -> Self {
        Self {
            filter: SVFilter::bandpass(cutoff_hz, q),
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff_hz
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }
}
