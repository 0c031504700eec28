//! The audio system as the rest of the app sees it.
//!
//! `AudioSystem` owns the output stream and shares the `Mixer` with the
//! device callback. Opening the device can fail (no device, unsupported
//! config, headless CI); the system then reports
//! `Capability::Unavailable` and every operation quietly does nothing, so
//! callers never need to care whether sound actually works.

use std::sync::{Arc, Mutex, MutexGuard};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, error, info, warn};

use crate::{
    config::{AudioPreset, EngineConfig},
    error::AudioError,
    mixer::{MixSnapshot, Mixer},
    visualizer::VisualizerState,
};

pub type PlayerError = Box<dyn std::error::Error + Send + Sync>;

/// An outside music player that yields to the ambient mixer.
///
/// It is paused when ambient sound starts and resumed once the last
/// ambient sound stops, unless the loaded preset asks for music alongside
/// the ambience. Failures are logged and otherwise ignored.
pub trait ExternalPlayer: Send {
    fn pause(&mut self) -> Result<(), PlayerError>;
    fn resume(&mut self) -> Result<(), PlayerError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Capability {
    Available { sample_rate: f32, channels: usize },
    Unavailable(String),
}

impl Capability {
    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Available { .. })
    }
}

pub struct AudioSystem {
    mixer: Option<Arc<Mutex<Mixer>>>,
    stream: Option<cpal::Stream>,
    capability: Capability,
    player: Option<Box<dyn ExternalPlayer>>,
    player_paused: bool,
    music_alongside: bool,
}

impl AudioSystem {
    /// Open the default output device. Never fails; check `capability()`.
    pub fn open(config: EngineConfig) -> Self {
        match start_stream(config) {
            Ok((mixer, stream, sample_rate, channels)) => {
                info!(sample_rate, channels, "audio output started");
                Self {
                    mixer: Some(mixer),
                    stream: Some(stream),
                    capability: Capability::Available {
                        sample_rate,
                        channels,
                    },
                    player: None,
                    player_paused: false,
                    music_alongside: false,
                }
            }
            Err(err) => {
                warn!(%err, "ambient sound unavailable");
                Self::unavailable(err.to_string())
            }
        }
    }

    /// A system driven by the caller instead of a device.
    pub fn offline(mixer: Mixer) -> Self {
        let capability = Capability::Available {
            sample_rate: mixer.sample_rate(),
            channels: 1,
        };
        Self {
            mixer: Some(Arc::new(Mutex::new(mixer))),
            stream: None,
            capability,
            player: None,
            player_paused: false,
            music_alongside: false,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            mixer: None,
            stream: None,
            capability: Capability::Unavailable(reason.into()),
            player: None,
            player_paused: false,
            music_alongside: false,
        }
    }

    pub fn with_player(mut self, player: Box<dyn ExternalPlayer>) -> Self {
        self.player = Some(player);
        self
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Shared handle to the mixer, if audio is available.
    pub fn mixer(&self) -> Option<Arc<Mutex<Mixer>>> {
        self.mixer.clone()
    }

    pub fn toggle_sound(&mut self, name: &str) -> bool {
        let playing = self.with_mixer(false, |m| m.toggle_sound(name));
        self.sync_player();
        playing
    }

    pub fn set_volume(&mut self, name: &str, level: f32) {
        self.with_mixer((), |m| m.set_volume(name, level));
        self.sync_player();
    }

    pub fn set_master_volume(&mut self, level: f32) {
        self.with_mixer((), |m| m.set_master_volume(level));
    }

    pub fn stop_sound(&mut self, name: &str) {
        self.with_mixer((), |m| m.stop_sound(name));
        self.sync_player();
    }

    pub fn stop_all(&mut self) {
        self.with_mixer((), Mixer::stop_all);
        self.sync_player();
    }

    pub fn has_active_sounds(&self) -> bool {
        self.with_mixer(false, |m| m.has_active_sounds())
    }

    pub fn play_notification(&mut self) -> bool {
        self.with_mixer(false, Mixer::play_notification)
    }

    pub fn load_preset(&mut self, preset: &AudioPreset) {
        self.with_mixer((), |m| m.load_preset(preset));
        self.music_alongside = preset.music;
        self.sync_player();
    }

    pub fn load_named_preset(&mut self, name: &str) -> bool {
        let preset = self.with_mixer(None, |m| m.config().presets.get(name).cloned());
        match preset {
            Some(preset) => {
                self.load_preset(&preset);
                true
            }
            None => false,
        }
    }

    /// Whether the external player keeps running under the ambience.
    pub fn music_alongside(&self) -> bool {
        self.music_alongside
    }

    pub fn snapshot(&self) -> Option<MixSnapshot> {
        self.with_mixer(None, |m| Some(m.snapshot()))
    }

    pub fn restore(&mut self, snapshot: &MixSnapshot) {
        self.with_mixer((), |m| m.restore(snapshot));
        self.music_alongside = false;
        self.sync_player();
    }

    pub fn suspend(&mut self) {
        self.with_mixer((), Mixer::suspend);
    }

    pub fn resume(&mut self) {
        self.with_mixer((), Mixer::resume);
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.with_mixer(false, |m| m.is_playing(name))
    }

    pub fn volume(&self, name: &str) -> f32 {
        self.with_mixer(0.0, |m| m.volume(name))
    }

    pub fn master_volume(&self) -> f32 {
        self.with_mixer(0.0, |m| m.master_volume())
    }

    /// Sound names in display order; empty when unavailable.
    pub fn sound_names(&self) -> Vec<String> {
        self.with_mixer(Vec::new(), |m| m.sound_names().map(str::to_string).collect())
    }

    /// Preset names in display order; empty when unavailable.
    pub fn preset_names(&self) -> Vec<String> {
        self.with_mixer(Vec::new(), |m| m.config().presets.keys().cloned().collect())
    }

    pub fn default_volume(&self) -> f32 {
        self.with_mixer(0.0, |m| m.config().default_volume)
    }

    pub fn refresh_visualizer(&self, visualizer: &mut VisualizerState) {
        self.with_mixer((), |m| visualizer.refresh(m.analyser_mut()));
    }

    /// Pull a block from the mixer by hand (offline systems only).
    pub fn render_block(&self, out: &mut [f32]) {
        if self.stream.is_some() {
            return;
        }
        self.with_mixer((), |m| m.render_block(out));
    }

    /// Stop every sound and release the device. Later calls are no-ops.
    pub fn close(&mut self) {
        if self.mixer.is_none() {
            return;
        }
        self.stop_all();
        if let Some(stream) = self.stream.take() {
            if let Err(err) = stream.pause() {
                debug!(%err, "failed to pause stream on close");
            }
        }
        self.mixer = None;
        self.capability = Capability::Unavailable("audio closed".into());
        debug!("audio system closed");
    }

    fn lock(&self) -> Option<MutexGuard<'_, Mixer>> {
        let mixer = self.mixer.as_ref()?;
        match mixer.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("mixer lock poisoned; treating audio as unavailable");
                None
            }
        }
    }

    fn with_mixer<R>(&self, fallback: R, f: impl FnOnce(&mut Mixer) -> R) -> R {
        match self.lock() {
            Some(mut mixer) => f(&mut mixer),
            None => fallback,
        }
    }

    fn sync_player(&mut self) {
        if self.player.is_none() {
            return;
        }
        let yield_to_ambience = self.has_active_sounds() && !self.music_alongside;
        let Some(player) = self.player.as_mut() else {
            return;
        };

        if yield_to_ambience && !self.player_paused {
            match player.pause() {
                Ok(()) => self.player_paused = true,
                Err(err) => warn!(%err, "failed to pause external player"),
            }
        } else if !yield_to_ambience && self.player_paused {
            // Only resume what we paused; a failed resume is not retried.
            self.player_paused = false;
            if let Err(err) = player.resume() {
                warn!(%err, "failed to resume external player");
            }
        }
    }
}

impl Drop for AudioSystem {
    fn drop(&mut self) {
        self.close();
    }
}

type Started = (Arc<Mutex<Mixer>>, cpal::Stream, f32, usize);

fn start_stream(config: EngineConfig) -> Result<Started, AudioError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(AudioError::NoOutputDevice)?;
    let stream_config = device.default_output_config()?;

    let sample_rate = stream_config.sample_rate().0 as f32;
    let channels = stream_config.channels() as usize;

    let mixer = Arc::new(Mutex::new(Mixer::new(config, sample_rate)));
    let shared = Arc::clone(&mixer);

    let stream = device.build_output_stream(
        &stream_config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| match shared.lock() {
            Ok(mut mixer) => mixer.render_interleaved(data, channels),
            Err(_) => data.fill(0.0),
        },
        |err| error!(%err, "audio stream error"),
        None,
    )?;
    stream.play()?;

    Ok((mixer, stream, sample_rate, channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct FakePlayer {
        calls: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl ExternalPlayer for FakePlayer {
        fn pause(&mut self) -> Result<(), PlayerError> {
            self.calls.lock().unwrap().push("pause");
            if self.fail {
                return Err("player offline".into());
            }
            Ok(())
        }

        fn resume(&mut self) -> Result<(), PlayerError> {
            self.calls.lock().unwrap().push("resume");
            Ok(())
        }
    }

    fn offline() -> AudioSystem {
        AudioSystem::offline(Mixer::new(EngineConfig::default().seeded(11), 48_000.0))
    }

    #[test]
    fn unavailable_system_is_inert() {
        let mut system = AudioSystem::unavailable("no device");
        assert!(!system.capability().is_available());
        assert!(!system.toggle_sound("rain"));
        system.set_volume("rain", 0.5);
        system.set_master_volume(0.2);
        assert!(!system.has_active_sounds());
        assert!(!system.play_notification());
        assert!(system.snapshot().is_none());
        assert!(system.sound_names().is_empty());
        system.close();
    }

    #[test]
    fn offline_system_drives_the_mixer() {
        let mut system = offline();
        assert!(system.capability().is_available());
        system.set_volume("rain", 0.5);
        assert!(system.is_playing("rain"));
        assert!(system.has_active_sounds());

        let mut out = vec![0.0; 9_600];
        system.render_block(&mut out);
        assert!(out.iter().any(|&s| s != 0.0));

        let mut vis = VisualizerState::new();
        system.refresh_visualizer(&mut vis);
        assert_eq!(vis.bins().len(), 128);
    }

    #[test]
    fn player_yields_to_ambient_sound() {
        let player = FakePlayer::default();
        let calls = Arc::clone(&player.calls);
        let mut system = offline().with_player(Box::new(player));

        system.toggle_sound("rain");
        system.set_volume("cafe", 0.4);
        system.stop_sound("rain");
        assert_eq!(*calls.lock().unwrap(), vec!["pause"]);

        system.stop_sound("cafe");
        assert_eq!(*calls.lock().unwrap(), vec!["pause", "resume"]);
    }

    #[test]
    fn music_preset_keeps_the_player_running() {
        let player = FakePlayer::default();
        let calls = Arc::clone(&player.calls);
        let mut system = offline().with_player(Box::new(player));

        assert!(system.load_named_preset("pure-focus"));
        assert!(!system.music_alongside());
        assert_eq!(*calls.lock().unwrap(), vec!["pause"]);

        assert!(system.load_named_preset("nature-study"));
        assert!(system.music_alongside());
        assert!(system.is_playing("rain"));
        assert_eq!(*calls.lock().unwrap(), vec!["pause", "resume"]);

        system.toggle_sound("ocean");
        assert_eq!(calls.lock().unwrap().len(), 2);
        assert!(!system.load_named_preset("missing"));
        assert!(system.music_alongside());
    }

    #[test]
    fn player_failures_do_not_touch_the_mixer() {
        let player = FakePlayer {
            fail: true,
            ..FakePlayer::default()
        };
        let mut system = offline().with_player(Box::new(player));
        assert!(system.toggle_sound("forest"));
        assert!(system.is_playing("forest"));
    }

    #[test]
    fn poisoned_lock_reads_as_unavailable() {
        let mut system = offline();
        system.set_volume("ocean", 0.5);

        let shared = system.mixer().unwrap();
        let _ = std::thread::spawn(move || {
            let _guard = shared.lock().unwrap();
            panic!("render thread died");
        })
        .join();

        assert!(!system.has_active_sounds());
        assert!(!system.toggle_sound("rain"));
    }

    #[test]
    fn close_stops_everything_once() {
        let mut system = offline();
        system.set_volume("rain", 0.5);
        let shared = system.mixer().unwrap();

        system.close();
        assert!(!shared.lock().unwrap().has_active_sounds());
        assert!(!system.capability().is_available());
        assert!(!system.toggle_sound("rain"));
        system.close();
    }
}
