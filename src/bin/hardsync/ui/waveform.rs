//! Output oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use hardsync::dsp::filter::OUTPUT_TRIM;

/// Render the last block of engine output.
///
/// The y axis spans a little past the output trim instead of full scale, and
/// the title carries the block peak so clipping headroom is easy to read.
pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let peak = audio_buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let block = Block::default()
        .title(format!(" Output · peak {peak:.3} "))
        .borders(Borders::ALL);

    let len = audio_buffer.len().max(1) as f64;
    let data: Vec<(f64, f64)> = audio_buffer
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / len, sample as f64))
        .collect();
    let zero = [(0.0, 0.0), (1.0, 0.0)];

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&zero),
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data),
    ];

    let bound = OUTPUT_TRIM as f64 * 1.25;
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(Axis::default().bounds([0.0, 1.0]))
        .y_axis(
            Axis::default()
                .bounds([-bound, bound])
                .labels(vec![format!("{:.2}", -bound), "0".into(), format!("{bound:.2}")])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
