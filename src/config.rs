//! Engine configuration.
//!
//! Every field has a default, so an empty TOML file (or none at all) gives
//! the stock soundscape. A config file only needs the parts it changes:
//!
//! ```toml
//! default_volume = 0.25
//!
//! [sounds.rain]
//! type = "noise"
//! base_freq = 1000.0
//! filter_freq = 600.0
//! gain = 0.3
//!
//! [presets.late-night]
//! sounds = ["rain", "brown_noise"]
//! volumes = [20, 35]
//! ```

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    sounds::{builtin_sounds, SoundDefinition},
};

/// A named mix: which sounds to play and how loud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioPreset {
    pub sounds: Vec<String>,
    /// Slider levels in percent (0-100), parallel to `sounds`.
    #[serde(default)]
    pub volumes: Vec<f32>,
    /// Whether the external music player should run alongside.
    #[serde(default)]
    pub music: bool,
}

impl AudioPreset {
    pub fn new(sounds: &[&str], volumes: &[f32], music: bool) -> Self {
        Self {
            sounds: sounds.iter().map(|s| s.to_string()).collect(),
            volumes: volumes.to_vec(),
            music,
        }
    }

    /// Volume for the `index`th sound as a 0..1 level.
    pub fn level(&self, index: usize, fallback: f32) -> f32 {
        self.volumes
            .get(index)
            .map(|pct| (pct / 100.0).clamp(0.0, 1.0))
            .unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    /// Tone frequencies in Hz, played one after another.
    pub tones: Vec<f32>,
    pub tone_secs: f64,
    pub peak: f32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tones: vec![800.0, 1000.0],
            tone_secs: 0.2,
            peak: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Samples per generated noise buffer (looped while playing).
    pub noise_buffer_len: usize,
    /// Glide time for volume and master changes, in seconds.
    pub volume_ramp_secs: f64,
    /// Level applied when a sound is switched on without a volume.
    pub default_volume: f32,
    pub master_volume: f32,
    /// FFT size of the analysis tap; must be a power of two.
    pub fft_size: usize,
    /// Seed for all randomness; `None` draws from the OS.
    pub seed: Option<u64>,
    pub notification: NotificationConfig,
    pub sounds: BTreeMap<String, SoundDefinition>,
    pub presets: BTreeMap<String, AudioPreset>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            noise_buffer_len: 4096,
            volume_ramp_secs: 0.1,
            default_volume: 0.3,
            master_volume: 1.0,
            fft_size: 256,
            seed: None,
            notification: NotificationConfig::default(),
            sounds: builtin_sounds(),
            presets: builtin_presets(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Same config with a fixed seed, for reproducible renders.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Presets may only name sounds this config defines.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (preset, mix) in &self.presets {
            if let Some(sound) = mix.sounds.iter().find(|s| !self.sounds.contains_key(*s)) {
                return Err(ConfigError::UnknownPresetSound {
                    preset: preset.clone(),
                    sound: sound.clone(),
                });
            }
        }
        Ok(())
    }

    /// FFT size rounded to a usable power of two (32..=32768).
    pub fn analyser_size(&self) -> usize {
        self.fft_size.clamp(32, 32_768).next_power_of_two()
    }
}

pub fn builtin_presets() -> BTreeMap<String, AudioPreset> {
    [
        ("pure-focus", AudioPreset::new(&["brown_noise"], &[40.0], false)),
        ("nature-study", AudioPreset::new(&["rain", "forest"], &[30.0, 20.0], true)),
        ("cafe-vibes", AudioPreset::new(&["cafe"], &[30.0], true)),
        ("deep-work", AudioPreset::new(&["brown_noise"], &[50.0], false)),
        ("creative-flow", AudioPreset::new(&["ocean"], &[20.0], true)),
    ]
    .into_iter()
    .map(|(name, preset)| (name.to_string(), preset))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sounds::SoundKind;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.sounds.len(), 6);
        assert_eq!(config.presets.len(), 5);
        assert_eq!(config.analyser_size(), 256);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn toml_overrides_sounds_and_presets() {
        let config = EngineConfig::from_toml_str(
            r#"
            default_volume = 0.25
            seed = 7

            [sounds.rain]
            type = "noise"
            base_freq = 1000.0
            filter_freq = 600.0
            gain = 0.3

            [sounds.surf]
            type = "wave"
            frequency = 0.25
            gain = 0.5

            [presets.late-night]
            sounds = ["rain", "surf"]
            volumes = [20, 35]
            "#,
        )
        .unwrap();

        assert_eq!(config.default_volume, 0.25);
        assert_eq!(config.seed, Some(7));
        assert_eq!(
            config.sounds["rain"].kind,
            SoundKind::Noise {
                base_freq: 1000.0,
                filter_freq: Some(600.0)
            }
        );
        assert_eq!(config.sounds.len(), 2, "a [sounds] table replaces the stock set");
        assert!((config.presets["late-night"].level(1, 0.3) - 0.35).abs() < 1e-6);
    }

    #[test]
    fn rejects_presets_with_unknown_sounds() {
        let err = EngineConfig::from_toml_str(
            r#"
            [presets.broken]
            sounds = ["thunder"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPresetSound { ref sound, .. } if sound == "thunder"));
    }

    #[test]
    fn missing_preset_volume_falls_back() {
        let preset = AudioPreset::new(&["rain", "cafe"], &[30.0], false);
        assert!((preset.level(0, 0.3) - 0.3).abs() < 1e-6);
        assert!((preset.level(1, 0.42) - 0.42).abs() < 1e-6);
    }
}
