//! Control panel (four knobs) and per-slot voice meters

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use hardsync::{synth::voice::VoiceState, Param, POOL_SIZE};

use super::state::UiState;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

fn note_name(note: u8) -> String {
    let octave = note as i16 / 12 - 1;
    format!("{}{}", NOTE_NAMES[(note % 12) as usize], octave)
}

/// One gauge per control; the selected one is highlighted.
pub fn render_controls(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().title(" Controls ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1); 4])
        .split(inner);

    for (i, (param, row)) in Param::ALL.iter().zip(rows.iter()).enumerate() {
        let value = state.params.get(*param);
        let range = param.range();
        let ratio = ((value - range.start()) / (range.end() - range.start())).clamp(0.0, 1.0);

        let mut style = Style::default().fg(Color::Blue);
        if i == state.selected {
            style = style.fg(Color::LightYellow).add_modifier(Modifier::BOLD);
        }
        let label = match param {
            Param::Resonance => format!("{:<12} {:>7.2} (unused)", param.name(), value),
            _ => format!("{:<12} {:>7.2}", param.name(), value),
        };

        let gauge = Gauge::default()
            .gauge_style(style)
            .ratio(ratio as f64)
            .label(label);
        frame.render_widget(gauge, *row);
    }
}

/// Slot-by-slot envelope meters from the latest audio-thread snapshot.
pub fn render_voices(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default()
        .title(format!(
            " Voices {}/{} ",
            state.meters.num_voices, POOL_SIZE
        ))
        .borders(Borders::ALL);

    let mut lines = Vec::with_capacity(POOL_SIZE);
    for slot in 0..POOL_SIZE {
        let snapshot = state.meters.sounding().iter().find(|v| v.slot == slot);
        let line = match snapshot {
            Some(v) => {
                let color = match v.state {
                    VoiceState::Active => Color::LightGreen,
                    VoiceState::Releasing => Color::LightRed,
                };
                let width = (v.level * 20.0).round() as usize;
                Line::from(vec![
                    Span::raw(format!("{slot:>2} {:<4} ", note_name(v.note))),
                    Span::styled("█".repeat(width), Style::default().fg(color)),
                ])
            }
            None => Line::from(Span::styled(
                format!("{slot:>2} ----"),
                Style::default().fg(Color::DarkGray),
            )),
        };
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_notes() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(0), "C-1");
    }
}
