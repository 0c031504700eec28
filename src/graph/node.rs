/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - time: Audio-clock time of the first sample in the block, in seconds
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            time: 0.0,
        }
    }

    pub fn at(sample_rate: f32, time: f64) -> Self {
        Self { sample_rate, time }
    }

    /// Context for a sub-block starting `frames` samples later.
    pub fn advanced(&self, frames: usize) -> Self {
        Self {
            sample_rate: self.sample_rate,
            time: self.time + frames as f64 / self.sample_rate as f64,
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// Sources write into `out`; processors transform `out` in place.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Stop producing sound for good.
    ///
    /// Must be idempotent: stopping a stopped node does nothing.
    /// Default implementation does nothing (processors hold no source).
    fn stop(&mut self) {}

    /// Check if this node is still generating sound
    ///
    /// Used by sound instances to count live sources.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
