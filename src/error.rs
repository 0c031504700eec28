use std::path::PathBuf;

/// Rejected envelope automation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("exponential ramp target must be positive, got {0}")]
    NonPositiveTarget(f32),

    #[error("automation time must be finite, got {0}")]
    InvalidTime(f64),
}

/// Failure while wiring one sound's graph. Scoped to that sound only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("noise buffer length must be non-zero")]
    EmptyNoiseBuffer,

    #[error("{what} frequency must be finite and positive, got {value}")]
    InvalidFrequency { what: &'static str, value: f32 },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("preset '{preset}' references unknown sound '{sound}'")]
    UnknownPresetSound { preset: String, sound: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid mix snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why the output device could not be opened.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("no default output device available")]
    NoOutputDevice,

    #[error("failed to fetch default output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}
