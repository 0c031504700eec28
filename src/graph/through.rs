use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first
(source) into the second (effect). Every ambient layer is a chain like:

    looping noise  → low-pass          (rain, brown/white noise)
    sawtooth       → low-pass          (wind, waves)
    sine           → band-pass         (cafe chatter)

How It Works:
-------------
1. Render the source into the output buffer
2. Pass that buffer through the effect (in-place processing)

Lifecycle:
----------
`stop()` reaches both halves, so stopping a chain silences its source.
A chain counts as active while its source is; effects never keep a
stopped chain alive.

Signal Flow Diagram:
--------------------
  Through: [Source] ──→ [Effect] ──→ output
*/

pub struct Through<S, F> {
    source: S,
    effect: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, effect: F) -> Self {
        Self { source, effect }
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.effect.render_block(out, ctx);
    }

    fn stop(&mut self) {
        self.source.stop();
        self.effect.stop();
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
