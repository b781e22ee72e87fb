use crate::synth::params::SynthParams;

/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f64 {
    440.0 * 2.0_f64.powf((note as f64 - 69.0) / 12.0)
}

/// Context passed to every voice during one tick
///
/// Holds the sample period plus the pool-wide controls, already converted to
/// the units the DSP primitives want:
/// - dt: one sample period in seconds (supplied by the host each tick)
/// - sync_ratio: slave/master frequency ratio
/// - release_secs: release-phase time constant in seconds
/// - drift_amount: scales each voice's pitch-derived detune
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub dt: f32,
    pub sync_ratio: f32,
    pub release_secs: f32,
    pub drift_amount: f32,
}

impl RenderCtx {
    /// Build the per-tick context from the current control values.
    pub fn from_params(dt: f32, params: &SynthParams) -> Self {
        Self {
            dt,
            sync_ratio: params.sync_ratio,
            release_secs: params.release_ms / 1000.0,
            drift_amount: params.drift_amount,
        }
    }

    /// Context with default controls at the given sample rate (tests, benches).
    pub fn from_sample_rate(sample_rate: f32) -> Self {
        Self::from_params(1.0 / sample_rate, &SynthParams::default())
    }
}
