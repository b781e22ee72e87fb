//! TUI module for hardsync
//!
//! Turns the computer keyboard into a note source, the arrow keys into four
//! knobs, and draws the engine output.

mod controls;
mod spectrum;
pub mod state;
mod waveform;

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};

use hardsync::{dsp::filter::cutoff_for_sync, ScheduledMessage, SynthMessage};

use controls::{render_controls, render_voices};
use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::{MeterFrame, UiState};
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Two rows of a piano: white keys on the home row, black keys above.
const PIANO_KEYS: [(char, u8); 13] = [
    ('a', 0),
    ('w', 1),
    ('s', 2),
    ('e', 3),
    ('d', 4),
    ('f', 5),
    ('t', 6),
    ('g', 7),
    ('y', 8),
    ('h', 9),
    ('u', 10),
    ('j', 11),
    ('k', 12),
];

pub struct UiApp {
    msg_tx: Producer<ScheduledMessage>,
    audio_rx: Consumer<f32>,
    meter_rx: Consumer<MeterFrame>,
    state: UiState,
    audio_buffer: Vec<f32>,
    analyzer: SpectrumAnalyzer,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        msg_tx: Producer<ScheduledMessage>,
        audio_rx: Consumer<f32>,
        meter_rx: Consumer<MeterFrame>,
        state: UiState,
    ) -> Self {
        let analyzer = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, state.sample_rate);
        Self {
            msg_tx,
            audio_rx,
            meter_rx,
            state,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            analyzer,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_meters();
            self.close_gates(Instant::now());

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.send(SynthMessage::AllNotesOff);
        Ok(())
    }

    /// Keep the most recent VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available == 0 {
            return;
        }

        let Ok(chunk) = self.audio_rx.read_chunk(available) else {
            return;
        };
        let (first, second) = chunk.as_slices();
        self.audio_buffer.extend_from_slice(first);
        self.audio_buffer.extend_from_slice(second);
        chunk.commit_all();

        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
        self.analyzer.update(&self.audio_buffer);
    }

    /// Keep only the latest meter frame
    fn poll_meters(&mut self) {
        while let Ok(meters) = self.meter_rx.pop() {
            self.state.meters = meters;
        }
    }

    fn close_gates(&mut self, now: Instant) {
        for note in self.state.expired(now) {
            self.send(SynthMessage::NoteOff { note });
        }
    }

    fn send(&mut self, message: SynthMessage) {
        if self.msg_tx.push(ScheduledMessage::now(message)).is_err() {
            tracing::warn!(?message, "message ring full, dropping");
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Up => self.state.select_prev(),
            KeyCode::Down => self.state.select_next(),
            KeyCode::Left => self.nudge(-1.0),
            KeyCode::Right => self.nudge(1.0),
            KeyCode::Char('z') => self.state.shift_octave(-1),
            KeyCode::Char('x') => self.state.shift_octave(1),
            KeyCode::Char(' ') => {
                self.state.clear_held();
                self.send(SynthMessage::AllNotesOff);
            }
            KeyCode::Char(c) => {
                if let Some(&(_, semitone)) = PIANO_KEYS.iter().find(|(k, _)| *k == c) {
                    self.play(semitone);
                }
            }
            _ => {}
        }
    }

    fn nudge(&mut self, steps: f32) {
        let (param, value) = self.state.nudge(steps);
        tracing::debug!(param = param.name(), value, "control changed");
        self.send(SynthMessage::SetParam { param, value });
    }

    fn play(&mut self, semitone: u8) {
        let Some(note) = self.state.note_for(semitone) else {
            return;
        };
        // Key repeat: extend the gate instead of stacking voices on one pitch
        if !self.state.is_held(note) {
            self.send(SynthMessage::NoteOn { note });
        }
        self.state.hold(note, Instant::now());
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),  // Controls
                Constraint::Min(8),     // Scope + voices
                Constraint::Length(10), // Spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(30)])
            .split(rows[1]);

        render_controls(frame, rows[0], &self.state);
        render_waveform(frame, middle[0], &self.audio_buffer);
        render_voices(frame, middle[1], &self.state);
        render_spectrum(
            frame,
            rows[2],
            self.analyzer.data(),
            cutoff_for_sync(self.state.params.sync_ratio),
        );

        let help = Paragraph::new(format!(
            " [A-K] Play  [Z/X] Octave {}  [↑↓] Select  [←→] Adjust  [Space] All off  [Q] Quit",
            self.state.octave
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}
