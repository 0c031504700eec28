//! studyflow - study timer with procedural ambient sound
//!
//! Run with: cargo run -- --preset nature-study --minutes 25
//!
//! Logs go to `studyflow.log` (filter with `RUST_LOG`) since the terminal
//! belongs to the UI.

mod app;
mod timer;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::{info, warn};

use app::App;
use studyflow_ambient::{config::EngineConfig, system::AudioSystem};
use timer::Countdown;

#[derive(Parser)]
#[command(name = "studyflow")]
#[command(author, version, about = "Study timer with procedural ambient soundscapes")]
struct Cli {
    /// TOML file overriding sounds, presets and engine settings
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Preset to load on startup (e.g. pure-focus, nature-study)
    #[arg(long, short = 'p')]
    preset: Option<String>,

    /// Study session length in minutes
    #[arg(long, short = 'm', default_value = "25", value_parser = minutes_range())]
    minutes: u32,

    /// Short break length in minutes
    #[arg(long, default_value = "5", value_parser = minutes_range())]
    break_minutes: u32,

    /// Long break length in minutes (every fourth break)
    #[arg(long, default_value = "15", value_parser = minutes_range())]
    long_break_minutes: u32,

    /// Seed for the sound generators, for reproducible textures
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write logs
    #[arg(long, default_value = "studyflow.log")]
    log_file: PathBuf,
}

/// Phase lengths are capped at a day.
const MAX_MINUTES: i64 = 24 * 60;

fn minutes_range() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=MAX_MINUTES)
}

fn init_logging(path: &PathBuf) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path).wrap_err("failed to load config")?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    let audio = AudioSystem::open(config);
    let countdown = Countdown::new(
        cli.minutes.saturating_mul(60),
        cli.break_minutes.saturating_mul(60),
        cli.long_break_minutes.saturating_mul(60),
    );
    let mut app = App::new(audio, countdown);

    if let Some(preset) = &cli.preset {
        if !app.select_preset(preset) {
            warn!(preset = %preset, "preset not loaded");
            app.status = format!("preset '{preset}' not loaded");
        }
    }

    info!("studyflow started");
    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    app.shutdown();
    result
}
