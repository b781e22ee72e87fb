use std::f32::consts::TAU;

use crate::dsp::context::RenderCtx;

/*
One-Pole Output Smoother
========================

The summed voice mix passes through a single-pole low-pass before it leaves
the engine. Each sample the state moves a fraction `g` of the way toward the
input:

    state += g * (input - state)

g = 0 freezes the output, g = 1 passes the input straight through. Anything in
between is an RC-style smoother with a 6 dB/octave slope.

| quantity     | formula                          |
| ------------ | -------------------------------- |
| cutoff (Hz)  | 2000 + sync_ratio * 500          |
| coefficient  | clamp(cutoff * 2π * dt, 0, 1)    |
| output       | state * OUTPUT_TRIM              |

The cutoff tracks the sync ratio. Higher ratios push more energy into upper
harmonics, and the filter opens up with them instead of dulling the sweep.

Because g stays in [0, 1], the new state is always a convex combination of the
old state and the input: the filter cannot ring or overshoot. The resonance
control is carried here for reporting, but a single pole has no feedback path
to apply it to.
*/

/// Fixed gain applied after filtering so twelve full-scale voices stay in range.
pub const OUTPUT_TRIM: f32 = 0.2;

/// Cutoff frequency driven by the sync ratio.
#[inline]
pub fn cutoff_for_sync(sync_ratio: f32) -> f32 {
    2000.0 + sync_ratio * 500.0
}

/// Smoothing coefficient for `cutoff_hz` at sample period `dt`, in [0, 1].
#[inline]
pub fn coefficient(cutoff_hz: f32, dt: f32) -> f32 {
    // NaN collapses to 0 (hold) rather than poisoning the state
    (cutoff_hz * TAU * dt).max(0.0).min(1.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OnePoleFilter {
    state: f32,
    resonance: f32,
}

impl OnePoleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one mixed sample, returning the updated (untrimmed) state.
    #[inline]
    pub fn next_sample(&mut self, input: f32, ctx: &RenderCtx) -> f32 {
        let g = coefficient(cutoff_for_sync(ctx.sync_ratio), ctx.dt);
        self.state += g * (input - self.state);

        if !self.state.is_finite() {
            self.state = 0.0;
        }

        self.state
    }

    /// Filter one sample and apply the output trim.
    #[inline]
    pub fn process(&mut self, input: f32, ctx: &RenderCtx) -> f32 {
        self.next_sample(input, ctx) * OUTPUT_TRIM
    }

    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    pub fn state(&self) -> f32 {
        self.state
    }

    /// Stored only; the single-pole topology has nowhere to apply it.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance;
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::params::SynthParams;

    fn ctx(sample_rate: f32, sync_ratio: f32) -> RenderCtx {
        let params = SynthParams {
            sync_ratio,
            ..SynthParams::default()
        };
        RenderCtx::from_params(1.0 / sample_rate, &params)
    }

    #[test]
    fn cutoff_tracks_sync_ratio() {
        assert_eq!(cutoff_for_sync(1.0), 2500.0);
        assert_eq!(cutoff_for_sync(2.5), 3250.0);
        assert_eq!(cutoff_for_sync(8.0), 6000.0);
    }

    #[test]
    fn coefficient_is_clamped_to_unit_range() {
        for dt in [1e-9, 1.0 / 48_000.0, 1.0 / 8_000.0, 0.1, 10.0, f32::MAX] {
            for cutoff in [0.0, 2500.0, 6000.0, -100.0, f32::NAN, f32::INFINITY] {
                let g = coefficient(cutoff, dt);
                assert!((0.0..=1.0).contains(&g), "cutoff {cutoff} dt {dt} gave {g}");
            }
        }
    }

    #[test]
    fn settles_to_dc_input() {
        let ctx = ctx(48_000.0, 2.5);
        let mut filter = OnePoleFilter::new();
        let mut buffer = vec![1.0f32; 128];
        for sample in buffer.iter_mut() {
            *sample = filter.next_sample(*sample, &ctx);
        }
        assert!(buffer[127] > 0.99);
    }

    #[test]
    fn state_stays_between_previous_value_and_input() {
        let ctx = ctx(48_000.0, 8.0);
        let mut filter = OnePoleFilter::new();
        let inputs = [1.0, -1.0, 0.5, 12.0, -12.0, 0.0, 3.0];
        for _ in 0..50 {
            for &x in &inputs {
                let before = filter.state();
                let after = filter.next_sample(x, &ctx);
                let (lo, hi) = if before < x { (before, x) } else { (x, before) };
                assert!(after >= lo - 1e-6 && after <= hi + 1e-6);
            }
        }
    }

    #[test]
    fn attenuates_fast_alternation() {
        let ctx = ctx(48_000.0, 1.0);
        let mut filter = OnePoleFilter::new();
        let mut peak = 0.0f32;
        for i in 0..512 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            let y = filter.next_sample(x, &ctx);
            if i > 32 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 0.3, "expected Nyquist attenuation, got {peak}");
    }

    #[test]
    fn output_is_trimmed() {
        let ctx = ctx(1.0, 2.5); // coefficient saturates at 1
        let mut filter = OnePoleFilter::new();
        let y = filter.process(1.0, &ctx);
        assert!((y - OUTPUT_TRIM).abs() < 1e-6);
    }

    #[test]
    fn non_finite_input_degrades_to_silence() {
        let ctx = ctx(48_000.0, 2.5);
        let mut filter = OnePoleFilter::new();
        filter.next_sample(f32::INFINITY, &ctx);
        assert_eq!(filter.state(), 0.0);
        filter.next_sample(f32::NAN, &ctx);
        assert_eq!(filter.state(), 0.0);
        let y = filter.next_sample(1.0, &ctx);
        assert!(y.is_finite() && y > 0.0);
    }

    #[test]
    fn resonance_has_no_effect_on_output() {
        let ctx = ctx(48_000.0, 2.5);
        let mut plain = OnePoleFilter::new();
        let mut resonant = OnePoleFilter::new();
        resonant.set_resonance(0.95);
        for i in 0..256 {
            let x = ((i as f32) * 0.37).sin();
            assert_eq!(plain.next_sample(x, &ctx), resonant.next_sample(x, &ctx));
        }
        assert_eq!(resonant.resonance(), 0.95);
    }
}
