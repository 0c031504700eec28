use crate::graph::node::{GraphNode, RenderCtx};

/// Plays a pre-rendered sample buffer, optionally looping.
///
/// Noise sounds render one buffer per activation and loop it here rather
/// than drawing random numbers on the audio thread.
pub struct BufferSourceNode {
    buffer: Vec<f32>,
    position: usize,
    looping: bool,
    stopped: bool,
}

impl BufferSourceNode {
    pub fn new(buffer: Vec<f32>) -> Self {
        Self {
            buffer,
            position: 0,
            looping: false,
            stopped: false,
        }
    }

    pub fn looping(buffer: Vec<f32>) -> Self {
        Self {
            looping: true,
            ..Self::new(buffer)
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl GraphNode for BufferSourceNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        if self.stopped || self.buffer.is_empty() {
            out.fill(0.0);
            return;
        }

        for sample in out.iter_mut() {
            if self.position >= self.buffer.len() {
                if !self.looping {
                    *sample = 0.0;
                    self.stopped = true;
                    continue;
                }
                self.position = 0;
            }
            *sample = self.buffer[self.position];
            self.position += 1;
        }
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn is_active(&self) -> bool {
        !self.stopped && !self.buffer.is_empty()
    }
}
