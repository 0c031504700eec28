//! Timer-complete chime.
//!
//! A short run of sine beeps, each snapping to the peak level and decaying
//! exponentially to near silence. The mixer adds chimes straight to the
//! output, after the master gain and the analyser.

use crate::{
    config::NotificationConfig,
    engine::modulation::SILENCE_FLOOR,
    error::EnvelopeError,
    graph::{gain::GainNode, oscillator::OscNode, GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

struct Tone {
    osc: OscNode,
    gain: GainNode,
}

pub struct Chime {
    tones: Vec<Tone>,
    ends_at: f64,
    scratch: Vec<f32>,
}

impl Chime {
    /// Schedule the configured tone sequence starting at `start` seconds.
    pub fn new(config: &NotificationConfig, start: f64) -> Result<Self, EnvelopeError> {
        let mut tones = Vec::with_capacity(config.tones.len());
        let mut at = start;

        for &freq in &config.tones {
            let end = at + config.tone_secs;
            let mut gain = GainNode::new(0.0);
            let env = gain.gain_mut();
            env.set_value_at(config.peak, at)?;
            env.exponential_ramp_to(SILENCE_FLOOR, end)?;
            env.set_value_at(0.0, end)?;

            tones.push(Tone {
                osc: OscNode::sine(freq),
                gain,
            });
            at = end;
        }

        Ok(Self {
            tones,
            ends_at: at,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        })
    }

    pub fn ends_at(&self) -> f64 {
        self.ends_at
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.ends_at
    }

    /// Add the chime into `out` (no clearing).
    pub fn render_add(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (offset, chunk) in (0..).step_by(MAX_BLOCK_SIZE).zip(out.chunks_mut(MAX_BLOCK_SIZE)) {
            let sub = ctx.advanced(offset);
            for tone in &mut self.tones {
                let buf = &mut self.scratch[..chunk.len()];
                buf.fill(0.0);
                tone.osc.render_block(buf, &sub);
                tone.gain.render_block(buf, &sub);
                for (o, s) in chunk.iter_mut().zip(buf.iter()) {
                    *o += *s;
                }
            }
        }
    }
}
