//! Terminal application state and event loop.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use studyflow_ambient::{
    system::{AudioSystem, Capability},
    visualizer::VisualizerState,
};

use crate::{
    timer::{Completion, Countdown},
    ui,
};

const TICK: Duration = Duration::from_secs(1);
const FRAME: Duration = Duration::from_millis(33);
const MASTER_STEP: f32 = 0.1;

pub struct App {
    pub audio: AudioSystem,
    pub timer: Countdown,
    pub visualizer: VisualizerState,
    pub sounds: Vec<String>,
    presets: Vec<String>,
    pub preset: Option<usize>,
    pub status: String,
    last_tick: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(audio: AudioSystem, timer: Countdown) -> Self {
        let sounds = audio.sound_names();
        let presets = audio.preset_names();
        let status = match audio.capability() {
            Capability::Available { sample_rate, .. } => {
                format!("audio ready at {sample_rate} Hz")
            }
            Capability::Unavailable(reason) => {
                format!("ambient sound unavailable: {reason}")
            }
        };

        Self {
            audio,
            timer,
            visualizer: VisualizerState::new(),
            sounds,
            presets,
            preset: None,
            status,
            last_tick: Instant::now(),
            should_quit: false,
        }
    }

    pub fn preset_name(&self) -> Option<&str> {
        self.preset
            .and_then(|i| self.presets.get(i))
            .map(String::as_str)
    }

    /// Select a preset by name, as if cycled to with `p`.
    pub fn select_preset(&mut self, name: &str) -> bool {
        let Some(index) = self.presets.iter().position(|p| p == name) else {
            return false;
        };
        self.preset = Some(index);
        self.audio.load_named_preset(name)
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.audio.refresh_visualizer(&mut self.visualizer);
            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(FRAME)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            while self.last_tick.elapsed() >= TICK {
                self.last_tick += TICK;
                self.on_tick();
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.toggle_sound(index);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_master(MASTER_STEP),
            KeyCode::Char('-') => self.nudge_master(-MASTER_STEP),
            KeyCode::Char('p') => self.next_preset(),
            KeyCode::Char('n') => {
                if !self.audio.play_notification() {
                    self.status = "notifications are off".into();
                }
            }
            KeyCode::Char(' ') => self.toggle_timer(),
            KeyCode::Char('r') => {
                self.timer.reset();
                self.status = "timer reset".into();
            }
            _ => {}
        }
    }

    /// Release audio before the process exits.
    pub fn shutdown(&mut self) {
        self.audio.close();
        info!("studyflow shut down");
    }

    fn toggle_sound(&mut self, index: usize) {
        let Some(name) = self.sounds.get(index).cloned() else {
            return;
        };
        if self.audio.toggle_sound(&name) {
            let level = self.audio.default_volume();
            self.audio.set_volume(&name, level);
            self.status = format!("{name} on");
        } else {
            self.status = format!("{name} off");
        }
        self.preset = None;
    }

    fn nudge_master(&mut self, step: f32) {
        let level = (self.audio.master_volume() + step).clamp(0.0, 1.0);
        self.audio.set_master_volume(level);
        self.status = format!("master {:.0}%", level * 100.0);
    }

    fn next_preset(&mut self) {
        if self.presets.is_empty() {
            return;
        }
        let next = self.preset.map_or(0, |i| (i + 1) % self.presets.len());
        let name = self.presets[next].clone();
        if self.select_preset(&name) {
            self.status = format!("preset {name}");
        }
    }

    fn toggle_timer(&mut self) {
        if self.timer.toggle() {
            self.last_tick = Instant::now();
            self.audio.resume();
            self.status = "focus".into();
        } else {
            self.status = "paused".into();
        }
    }

    fn on_tick(&mut self) {
        let Some(done) = self.timer.tick() else {
            return;
        };
        self.audio.play_notification();
        self.status = match done {
            Completion::Study => "session complete, time for a break".into(),
            Completion::Break => "break over, ready for the next session".into(),
        };
        debug!(?done, session = self.timer.session(), "timer phase complete");
    }
}
