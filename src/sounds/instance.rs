use crate::{
    engine::modulation::Modulation,
    graph::{gain::GainNode, GraphNode, RenderCtx},
    sounds::builder::SoundGraph,
};

/// One source chain feeding the sound through its own gain stage.
pub struct Layer {
    source: Box<dyn GraphNode>,
    gain: GainNode,
    modulation: Option<Modulation>,
}

impl Layer {
    pub fn new(source: Box<dyn GraphNode>, initial_gain: f32, modulation: Option<Modulation>) -> Self {
        Self {
            source,
            gain: GainNode::new(initial_gain),
            modulation,
        }
    }

    pub fn modulation(&self) -> Option<Modulation> {
        self.modulation
    }

    pub fn gain(&self) -> &GainNode {
        &self.gain
    }

    pub fn gain_mut(&mut self) -> &mut GainNode {
        &mut self.gain
    }

    pub fn is_active(&self) -> bool {
        self.source.is_active()
    }

    fn stop(&mut self) {
        self.source.stop();
    }

    fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.gain.render_block(out, ctx);
    }
}

/// Runtime state of one named sound.
///
/// The instance itself lives for the whole session; its layers come and go
/// with each start/stop. While not playing it owns no layers, so nothing
/// can keep generating sound behind a silent gain.
pub struct SoundInstance {
    layers: Vec<Layer>,
    gain: GainNode,
    playing: bool,
    generation: u64,
    volume: f32,
}

impl SoundInstance {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            gain: GainNode::new(0.0),
            playing: false,
            generation: 0,
            volume: 0.0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Activation counter; bumps every time the sound starts.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while `generation` is the activation currently playing.
    pub fn is_current(&self, generation: u64) -> bool {
        self.playing && self.generation == generation
    }

    /// Last volume (0..1) requested through the mixer.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub(crate) fn set_volume_level(&mut self, volume: f32) {
        self.volume = volume;
    }

    /// Number of layers whose source is still generating.
    pub fn active_sources(&self) -> usize {
        self.layers.iter().filter(|layer| layer.is_active()).count()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn gain(&self) -> &GainNode {
        &self.gain
    }

    pub fn gain_mut(&mut self) -> &mut GainNode {
        &mut self.gain
    }

    /// Take ownership of freshly built layers and mark the sound playing.
    ///
    /// Returns the new generation. A playing instance keeps its layers and
    /// the graph is dropped instead.
    pub fn start(&mut self, graph: SoundGraph) -> u64 {
        if self.playing {
            return self.generation;
        }
        self.layers = graph.layers;
        self.gain.gain_mut().set_value(0.0);
        self.generation += 1;
        self.playing = true;
        self.generation
    }

    /// Stop every source, drop the layers and silence the gain.
    /// Safe to call on a stopped instance.
    pub fn stop(&mut self) {
        for layer in &mut self.layers {
            layer.stop();
        }
        self.layers.clear();
        self.gain.gain_mut().set_value(0.0);
        self.playing = false;
        self.volume = 0.0;
    }

    /// Render this sound into `out`, using `scratch` for each layer.
    pub fn render(&mut self, out: &mut [f32], scratch: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        if !self.playing {
            return;
        }

        let scratch = &mut scratch[..out.len()];
        for layer in &mut self.layers {
            scratch.fill(0.0);
            layer.render(scratch, ctx);
            for (o, s) in out.iter_mut().zip(scratch.iter()) {
                *o += *s;
            }
        }

        self.gain.render_block(out, ctx);
    }
}

impl Default for SoundInstance {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{extensions::NodeExt, oscillator::OscNode};

    fn graph(layers: usize) -> SoundGraph {
        SoundGraph {
            layers: (0..layers)
                .map(|_| Layer::new(OscNode::sine(220.0).boxed(), 1.0, None))
                .collect(),
        }
    }

    #[test]
    fn starts_silent() {
        let mut sound = SoundInstance::new();
        sound.start(graph(2));
        assert!(sound.is_playing());
        assert_eq!(sound.active_sources(), 2);

        let mut out = vec![1.0; 64];
        let mut scratch = vec![0.0; 64];
        sound.render(&mut out, &mut scratch, &RenderCtx::new(48_000.0));
        assert!(out.iter().all(|&s| s == 0.0), "gain starts at zero");
    }

    #[test]
    fn stop_releases_every_source() {
        let mut sound = SoundInstance::new();
        let first = sound.start(graph(3));
        sound.stop();
        sound.stop();

        assert!(!sound.is_playing());
        assert_eq!(sound.active_sources(), 0);
        assert!(sound.layers().is_empty());
        assert!(!sound.is_current(first));
    }

    #[test]
    fn restart_bumps_generation() {
        let mut sound = SoundInstance::new();
        let first = sound.start(graph(1));
        assert_eq!(sound.start(graph(4)), first, "starting twice is a no-op");
        assert_eq!(sound.active_sources(), 1);

        sound.stop();
        let second = sound.start(graph(1));
        assert!(second > first);
        assert!(sound.is_current(second));
        assert!(!sound.is_current(first));
    }
}
