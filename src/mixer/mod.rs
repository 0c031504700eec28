//! The transport: named sounds, the master bus and the render loop.
//!
//! ```text
//!   layer ─┐
//!   layer ─┼─► sound gain ─┐
//!   layer ─┘               ├─► master gain ─► analyser ─► out ◄── chimes
//!   layer ───► sound gain ─┘
//! ```
//!
//! Every sound feeds the master gain; nothing reaches the output around it
//! except notification chimes. Volume changes glide over
//! `volume_ramp_secs` so they never click.

mod analyser;

use std::collections::BTreeMap;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    config::{AudioPreset, EngineConfig},
    engine::{AudioClock, ModulationTask, Scheduler},
    error::SnapshotError,
    graph::{gain::GainNode, GraphNode, RenderCtx},
    io::AudioOutput,
    notification::Chime,
    sounds::{build_graph, BuildCtx, SoundDefinition, SoundInstance},
    MAX_BLOCK_SIZE, MIN_TIME,
};

pub use analyser::Analyser;

struct Slot {
    definition: SoundDefinition,
    instance: SoundInstance,
}

/// Persisted mixer settings: which sounds play, and how loud.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MixSnapshot {
    pub master_volume: f32,
    /// Volume (0..1) of every playing sound.
    pub sounds: BTreeMap<String, f32>,
}

impl MixSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct Mixer {
    config: EngineConfig,
    slots: BTreeMap<String, Slot>,
    master: GainNode,
    master_level: f32,
    analyser: Analyser,
    scheduler: Scheduler<ModulationTask>,
    rng: StdRng,
    clock: AudioClock,
    chimes: Vec<Chime>,
    mix_buffer: Vec<f32>,
    sound_buffer: Vec<f32>,
    layer_buffer: Vec<f32>,
}

impl Mixer {
    pub fn new(config: EngineConfig, sample_rate: f32) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let slots = config
            .sounds
            .iter()
            .map(|(name, definition)| {
                let slot = Slot {
                    definition: definition.clone(),
                    instance: SoundInstance::new(),
                };
                (name.clone(), slot)
            })
            .collect();
        let master_level = config.master_volume.clamp(0.0, 1.0);

        Self {
            analyser: Analyser::new(config.analyser_size()),
            master: GainNode::new(master_level),
            master_level,
            slots,
            scheduler: Scheduler::new(),
            rng,
            clock: AudioClock::new(sample_rate),
            chimes: Vec::new(),
            mix_buffer: vec![0.0; MAX_BLOCK_SIZE],
            sound_buffer: vec![0.0; MAX_BLOCK_SIZE],
            layer_buffer: vec![0.0; MAX_BLOCK_SIZE],
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate()
    }

    /// Audio-clock time in seconds.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn sound_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.keys().map(String::as_str)
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|slot| slot.instance.is_playing())
    }

    pub fn has_active_sounds(&self) -> bool {
        self.slots.values().any(|slot| slot.instance.is_playing())
    }

    /// Sources of `name` still generating sound.
    pub fn active_sources(&self, name: &str) -> usize {
        self.slots
            .get(name)
            .map_or(0, |slot| slot.instance.active_sources())
    }

    /// Modulation cycles queued for `name`.
    pub fn pending_modulations(&self, name: &str) -> usize {
        self.scheduler.pending_where(|task| task.sound == name)
    }

    /// Last requested volume (0..1) of `name`; 0 when stopped.
    pub fn volume(&self, name: &str) -> f32 {
        self.slots.get(name).map_or(0.0, |slot| slot.instance.volume())
    }

    /// Current value of the per-sound gain of `name`.
    pub fn sound_gain(&self, name: &str) -> Option<f32> {
        let now = self.clock.now();
        self.slots
            .get(name)
            .map(|slot| slot.instance.gain().value_at(now))
    }

    /// Target level of the master bus.
    pub fn master_volume(&self) -> f32 {
        self.master_level
    }

    pub fn analyser_mut(&mut self) -> &mut Analyser {
        &mut self.analyser
    }

    /// Start `name` if it is silent, stop it if it plays.
    ///
    /// Returns whether the sound is playing afterwards. A freshly started
    /// sound stays at zero gain until `set_volume` raises it.
    pub fn toggle_sound(&mut self, name: &str) -> bool {
        if !self.slots.contains_key(name) {
            return false;
        }
        if self.is_playing(name) {
            self.stop_sound(name);
            false
        } else {
            self.start_sound(name)
        }
    }

    pub fn set_volume(&mut self, name: &str, level: f32) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        if !self.slots.contains_key(name) {
            return;
        }

        if level == 0.0 {
            self.stop_sound(name);
            return;
        }
        if !self.is_playing(name) && !self.start_sound(name) {
            return;
        }

        let now = self.clock.now();
        let ramp = self.config.volume_ramp_secs;
        let Some(slot) = self.slots.get_mut(name) else {
            return;
        };
        let target = level * slot.definition.gain;
        match slot.instance.gain_mut().gain_mut().ramp_from(now, target, ramp) {
            Ok(()) => slot.instance.set_volume_level(level),
            Err(err) => warn!(sound = name, %err, "volume change rejected"),
        }
    }

    pub fn set_master_volume(&mut self, level: f32) {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        let now = self.clock.now();
        match self
            .master
            .gain_mut()
            .ramp_from(now, level, self.config.volume_ramp_secs)
        {
            Ok(()) => self.master_level = level,
            Err(err) => warn!(%err, "master volume change rejected"),
        }
    }

    /// Tear down `name` and cancel its queued modulation.
    pub fn stop_sound(&mut self, name: &str) {
        let Some(slot) = self.slots.get_mut(name) else {
            return;
        };
        let was_playing = slot.instance.is_playing();
        slot.instance.stop();

        let cancelled = self.scheduler.cancel_where(|task| task.sound == name);
        if was_playing {
            debug!(sound = name, cancelled, "sound stopped");
        }
    }

    pub fn stop_all(&mut self) {
        let playing: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.instance.is_playing())
            .map(|(name, _)| name.clone())
            .collect();
        for name in playing {
            self.stop_sound(&name);
        }
    }

    /// Queue the timer chime. Returns false when notifications are off.
    pub fn play_notification(&mut self) -> bool {
        if !self.config.notification.enabled {
            return false;
        }
        match Chime::new(&self.config.notification, self.clock.now()) {
            Ok(chime) => {
                self.chimes.push(chime);
                true
            }
            Err(err) => {
                warn!(%err, "notification chime rejected");
                false
            }
        }
    }

    /// Replace the current mix with `preset`.
    pub fn load_preset(&mut self, preset: &AudioPreset) {
        self.stop_all();
        let fallback = self.config.default_volume;
        for (index, name) in preset.sounds.iter().enumerate() {
            self.set_volume(name, preset.level(index, fallback));
        }
        debug!(sounds = ?preset.sounds, "preset loaded");
    }

    /// Load a preset defined in the config. Returns false if unknown.
    pub fn load_named_preset(&mut self, name: &str) -> bool {
        match self.config.presets.get(name).cloned() {
            Some(preset) => {
                self.load_preset(&preset);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> MixSnapshot {
        MixSnapshot {
            master_volume: self.master_level,
            sounds: self
                .slots
                .iter()
                .filter(|(_, slot)| slot.instance.is_playing())
                .map(|(name, slot)| (name.clone(), slot.instance.volume()))
                .collect(),
        }
    }

    /// Bring the mixer to a saved state. Unknown sounds are skipped.
    pub fn restore(&mut self, snapshot: &MixSnapshot) {
        self.stop_all();
        self.set_master_volume(snapshot.master_volume);
        for (name, &level) in &snapshot.sounds {
            self.set_volume(name, level);
        }
    }

    /// Freeze the clock; rendering outputs silence until `resume`.
    pub fn suspend(&mut self) {
        self.clock.suspend();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn is_suspended(&self) -> bool {
        self.clock.is_suspended()
    }

    /// Render mono output into `out`, overwriting it.
    pub fn render_block(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        if self.clock.is_suspended() {
            return;
        }

        let sample_rate = self.clock.sample_rate();
        let mut written = 0;
        while written < out.len() {
            let now = self.clock.now();
            self.run_due_modulations(now);

            // Stop the sub-block where the next modulation cycle is due.
            let mut frames = (out.len() - written).min(MAX_BLOCK_SIZE);
            if let Some(due) = self.scheduler.next_due() {
                let until_due = ((due - now) * sample_rate as f64).ceil().max(1.0) as usize;
                frames = frames.min(until_due);
            }

            let ctx = RenderCtx::at(sample_rate, now);
            let block = &mut out[written..written + frames];
            self.render_sounds(block, &ctx);
            self.master.render_block(block, &ctx);
            self.analyser.push(block);
            self.render_chimes(block, &ctx);

            self.clock.advance(frames);
            written += frames;
        }
    }

    /// Render into every channel of `output` (mono duplicated).
    pub fn process_block(&mut self, output: &mut AudioOutput) {
        let Some((first, rest)) = output.buffers.split_first_mut() else {
            return;
        };
        self.render_block(first);
        for channel in rest {
            let frames = channel.len().min(first.len());
            channel[..frames].copy_from_slice(&first[..frames]);
        }
    }

    /// Render into an interleaved device buffer with `channels` channels.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let mut mono = std::mem::take(&mut self.mix_buffer);
        for frame_chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let frames = frame_chunk.len() / channels;
            let block = &mut mono[..frames];
            self.render_block(block);
            for (frame, &sample) in frame_chunk.chunks_mut(channels).zip(block.iter()) {
                frame.fill(sample);
            }
        }
        self.mix_buffer = mono;
    }

    fn run_due_modulations(&mut self, now: f64) {
        while let Some(task) = self.scheduler.pop_due(now) {
            let Some(slot) = self.slots.get_mut(&task.sound) else {
                continue;
            };
            if !slot.instance.is_current(task.generation) {
                trace!(sound = %task.sound, generation = task.generation, "dropped stale modulation");
                continue;
            }
            run_modulation(&mut slot.instance, &mut self.rng, &mut self.scheduler, task, now);
        }
    }

    fn start_sound(&mut self, name: &str) -> bool {
        let Some(slot) = self.slots.get_mut(name) else {
            return false;
        };
        if slot.instance.is_playing() {
            return true;
        }

        let mut ctx = BuildCtx {
            rng: &mut self.rng,
            noise_buffer_len: self.config.noise_buffer_len,
        };
        let graph = match build_graph(&slot.definition, &mut ctx) {
            Ok(graph) => graph,
            Err(err) => {
                warn!(sound = name, %err, "failed to build sound");
                return false;
            }
        };

        let now = self.clock.now();
        let modulated: Vec<_> = graph.modulated_layers().collect();
        let generation = slot.instance.start(graph);

        for (layer, modulation) in modulated {
            let task = ModulationTask {
                sound: name.to_string(),
                generation,
                layer,
                modulation,
            };
            run_modulation(&mut slot.instance, &mut self.rng, &mut self.scheduler, task, now);
        }

        debug!(sound = name, generation, "sound started");
        true
    }

    fn render_sounds(&mut self, block: &mut [f32], ctx: &RenderCtx) {
        let Self {
            slots,
            sound_buffer,
            layer_buffer,
            ..
        } = self;

        let frames = block.len();
        for slot in slots.values_mut().filter(|slot| slot.instance.is_playing()) {
            let sound = &mut sound_buffer[..frames];
            slot.instance.render(sound, &mut layer_buffer[..frames], ctx);
            for (o, s) in block.iter_mut().zip(sound.iter()) {
                *o += *s;
            }
        }
    }

    fn render_chimes(&mut self, block: &mut [f32], ctx: &RenderCtx) {
        if self.chimes.is_empty() {
            return;
        }
        for chime in &mut self.chimes {
            chime.render_add(block, ctx);
        }
        let end = ctx.advanced(block.len()).time;
        self.chimes.retain(|chime| !chime.is_finished(end));
    }
}

/// Lay down one modulation cycle and queue the next.
fn run_modulation(
    instance: &mut SoundInstance,
    rng: &mut StdRng,
    scheduler: &mut Scheduler<ModulationTask>,
    task: ModulationTask,
    now: f64,
) {
    let Some(layer) = instance.layer_mut(task.layer) else {
        return;
    };
    match task.modulation.cycle(rng, now, layer.gain_mut().gain_mut()) {
        Ok(delay) => scheduler.schedule(now + delay.max(MIN_TIME), task),
        Err(err) => warn!(sound = %task.sound, %err, "modulation stopped"),
    }
}
