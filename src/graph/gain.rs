use crate::{
    dsp::envelope::Envelope,
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Multiplies the signal by an automated gain envelope.
///
/// Gain nodes are the only place amplitude changes: per-layer modulation,
/// per-sound volume and the master bus are all `GainNode`s.
pub struct GainNode {
    gain: Envelope,
    temp_buffer: Vec<f32>,
}

impl GainNode {
    pub fn new(initial: f32) -> Self {
        Self {
            gain: Envelope::new(initial),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn gain(&self) -> &Envelope {
        &self.gain
    }

    pub fn gain_mut(&mut self) -> &mut Envelope {
        &mut self.gain
    }

    pub fn value_at(&self, time: f64) -> f32 {
        self.gain.value_at(time)
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (offset, chunk) in (0..).step_by(MAX_BLOCK_SIZE).zip(out.chunks_mut(MAX_BLOCK_SIZE)) {
            let gains = &mut self.temp_buffer[..chunk.len()];
            let sub = ctx.advanced(offset);
            self.gain.render(gains, sub.time, sub.sample_rate);

            for (o, g) in chunk.iter_mut().zip(gains.iter()) {
                *o *= *g;
            }
        }
    }
}
