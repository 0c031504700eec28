//! Screen layout: timer, sound list, spectrum, help.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::{app::App, timer::Phase};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Timer
            Constraint::Length(app.sounds.len() as u16 + 2),
            Constraint::Min(6), // Spectrum
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    render_timer(frame, chunks[0], app);
    render_sounds(frame, chunks[1], app);
    render_spectrum(frame, chunks[2], app);

    let status = Paragraph::new(format!(" {}", app.status)).style(Style::default().fg(Color::Yellow));
    frame.render_widget(status, chunks[3]);

    let help = Paragraph::new(
        " [1-9] Sound  [+/-] Master  [P] Preset  [N] Chime  [Space] Start/Pause  [R] Reset  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[4]);
}

fn render_timer(frame: &mut Frame, area: Rect, app: &App) {
    let timer = &app.timer;
    let (label, color) = match timer.phase() {
        Phase::Study => ("Focus", Color::Green),
        Phase::Break => ("Break", Color::Cyan),
    };
    let state = if timer.is_running() {
        ""
    } else if timer.is_paused() {
        " (paused)"
    } else {
        " (ready)"
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(format!(" Session {} ", timer.session()))
                .borders(Borders::ALL),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(timer.progress().clamp(0.0, 1.0))
        .label(format!("{label} {}{state}", timer.display()));
    frame.render_widget(gauge, area);
}

fn render_sounds(frame: &mut Frame, area: Rect, app: &App) {
    let master = app.audio.master_volume();
    let title = match app.preset_name() {
        Some(preset) => format!(" Sounds: {preset}  master {:.0}% ", master * 100.0),
        None => format!(" Sounds  master {:.0}% ", master * 100.0),
    };

    let lines: Vec<Line> = app
        .sounds
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let playing = app.audio.is_playing(name);
            let style = if playing {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let level = if playing {
                format!("{:>4.0}%", app.audio.volume(name) * 100.0)
            } else {
                "  off".to_string()
            };
            Line::from(vec![
                Span::styled(format!(" [{}] ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{name:<12}"), style),
                Span::styled(level, style),
            ])
        })
        .collect();

    let list = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_spectrum(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);
    let inner = block.inner(area);
    let height = inner.height.max(1);

    let bars: Vec<Bar> = app
        .visualizer
        .grouped_bars(inner.width as usize, height)
        .into_iter()
        .map(|bar| {
            let (r, g, b) = bar.rgb;
            Bar::default()
                .value(bar.height as u64)
                .text_value(String::new())
                .style(Style::default().fg(Color::Rgb(r, g, b)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(1)
        .bar_gap(0)
        .max(height as u64)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}
