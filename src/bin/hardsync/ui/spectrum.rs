//! Spectrum analyzer widget
//!
//! FFT of the output with log-spaced bins, plus a marker at the current
//! output filter cutoff so the sync-ratio tracking is visible.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of frequency bins to display
const SPECTRUM_BINS: usize = 64;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// FFT bin index for each displayed point
    bin_indices: Vec<usize>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 frequency, magnitude dB)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    /// `buffer_len` is the FFT size and must match the buffers passed to
    /// `update`.
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(buffer_len);

        // Hann window
        let denom = buffer_len.saturating_sub(1).max(1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let max_freq = (sample_rate as f64 / 2.0).clamp(40.0, 20_000.0);
        let min_freq = 20.0f64;
        let half = (buffer_len / 2).max(1);

        let mut bin_indices = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
            let freq = min_freq * (max_freq / min_freq).powf(t);
            let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
            bin_indices.push(index.min(half - 1));
            spectrum.push((freq.log10(), FLOOR_DB));
        }

        Self {
            window,
            bin_indices,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (point, &idx) in self.spectrum.iter_mut().zip(&self.bin_indices) {
            let power = self.scratch[idx].norm_sqr().max(1e-12);
            point.1 = (10.0 * (power as f64).log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

/// Render the spectrum with a vertical marker at `cutoff_hz`.
pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)], cutoff_hz: f32) {
    let block = Block::default()
        .title(format!(" Spectrum · cutoff {cutoff_hz:.0} Hz "))
        .borders(Borders::ALL);

    let top_db = spectrum
        .iter()
        .map(|(_, db)| *db)
        .fold(FLOOR_DB, f64::max)
        .max(0.0)
        + 10.0;

    let cutoff_x = (cutoff_hz.max(1.0) as f64).log10();
    let marker = [(cutoff_x, FLOOR_DB), (cutoff_x, top_db)];

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(spectrum),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&marker),
    ];

    let min_x = spectrum.first().map_or(1.3, |p| p.0);
    let max_x = spectrum.last().map_or(4.3, |p| p.0);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x, max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, top_db])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_peaks_near_its_frequency() {
        let sample_rate = 48_000.0;
        let len = 1024;
        let mut analyzer = SpectrumAnalyzer::new(len, sample_rate);
        let buffer: Vec<f32> = (0..len)
            .map(|i| (std::f32::consts::TAU * 1_000.0 * i as f32 / sample_rate).sin())
            .collect();
        analyzer.update(&buffer);

        let (peak_x, _) = analyzer
            .data()
            .iter()
            .copied()
            .fold((0.0, f64::MIN), |best, p| if p.1 > best.1 { p } else { best });
        let peak_hz = 10f64.powf(peak_x);
        assert!((700.0..1_400.0).contains(&peak_hz), "peak at {peak_hz} Hz");
    }

    #[test]
    fn mismatched_buffer_is_ignored() {
        let mut analyzer = SpectrumAnalyzer::new(256, 48_000.0);
        analyzer.update(&[1.0; 16]);
        assert!(analyzer.data().iter().all(|&(_, db)| db == FLOOR_DB));
    }
}
