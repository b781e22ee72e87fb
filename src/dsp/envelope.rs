use crate::dsp::context::RenderCtx;

/*
Exponential Decay Envelope
==========================

Every voice carries one amplitude multiplier that only ever falls. There is no
attack and no sustain plateau: note-on jumps straight to full level and the
level starts sinking on the very next sample.

Vocabulary
----------

  level       Current output value (0.0 to 1.0), multiplied into the voice's
              waveform.

  tau         Time constant in seconds. Roughly how long the decay takes to
              lose most of its level; larger is slower.

  dt          One sample period in seconds (1 / sample_rate).

  factor      What `level` is multiplied by each sample: 1 - dt / tau.


The Shape: One-Pole Decays
--------------------------

  Level
    1.0 ┐╲
        │ ╲___                      held: tau = 5 s (slow sag)
        │     ‾‾‾‾────────╮
        │                  ╲        released: tau = release_ms / 1000
        │                   ╲___
    0.0 └───────────────────────‾‾‾──→ Time
        note_on           note_off

Two regimes, picked by the voice state:

  held      factor = 1 - dt / 5.0
  released  factor = 1 - dt / (release_ms / 1000)

Both are first-order approximations of exp(-dt / tau). At audio rates dt is
tiny compared to tau, so the difference is inaudible and we save an exp() per
voice per sample.


Keeping It Bounded
------------------

If dt ever exceeds tau (absurd release times, huge host blocks) the raw factor
goes negative and the level would flip sign every sample. The factor is
clamped into [0, 1], which turns that case into an immediate cut to silence.
NaN (tau = 0/0 and friends) collapses to 0 for the same reason. The level can
therefore never leave [0, 1].


Silence
-------

Below SILENCE_THRESHOLD (-60 dB) a released voice stops being rendered and its
slot can be handed to the next note-on.
*/

/// Level below which a released voice counts as finished (-60 dB).
pub const SILENCE_THRESHOLD: f32 = 0.001;

/// Time constant applied while the key is still held.
pub const SUSTAIN_DECAY_SECS: f32 = 5.0;

/// Per-sample multiplier for a one-pole decay with time constant `tau`.
#[inline]
pub fn decay_factor(dt: f32, tau: f32) -> f32 {
    // max/min rather than clamp: NaN must collapse to 0
    (1.0 - dt / tau).max(0.0).min(1.0)
}

/// Upper bound on samples needed to fall from full level to silence.
///
/// Returns `None` when the decay never gets there (`dt` of zero or an
/// infinite `tau`).
pub fn samples_to_silence(dt: f32, tau: f32) -> Option<u64> {
    let factor = decay_factor(dt, tau) as f64;
    if factor >= 1.0 {
        return None;
    }
    if factor <= 0.0 {
        return Some(1);
    }

    // Analytic count plus headroom for f32 rounding in the running product.
    let exact = (SILENCE_THRESHOLD as f64).ln() / factor.ln();
    Some((exact * 1.01).ceil() as u64 + 1)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DecayEnvelope {
    level: f32,
}

impl DecayEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note-on: jump to full level. Attack time is zero.
    pub fn trigger(&mut self) {
        self.level = 1.0;
    }

    /// Drop straight to zero.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }

    /// Advance one sample with time constant `tau` (seconds).
    #[inline]
    pub fn next_sample(&mut self, tau: f32, ctx: &RenderCtx) -> f32 {
        self.level *= decay_factor(ctx.dt, tau);

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Get the current envelope level (0.0 to 1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// True while the level is above the silence threshold.
    pub fn is_audible(&self) -> bool {
        self.level > SILENCE_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn ctx() -> RenderCtx {
        RenderCtx::from_sample_rate(SAMPLE_RATE)
    }

    #[test]
    fn trigger_starts_at_full_level() {
        let mut env = DecayEnvelope::new();
        assert_eq!(env.level(), 0.0);
        env.trigger();
        assert_eq!(env.level(), 1.0);
    }

    #[test]
    fn held_decay_uses_five_second_constant() {
        let ctx = ctx();
        let mut env = DecayEnvelope::new();
        env.trigger();
        let level = env.next_sample(SUSTAIN_DECAY_SECS, &ctx);
        let expected = 1.0 - ctx.dt / 5.0;
        assert!((level - expected).abs() < 1e-7);
    }

    #[test]
    fn release_is_monotonic_and_reaches_silence_in_bound() {
        let ctx = ctx();
        let tau = 0.4;
        let bound = samples_to_silence(ctx.dt, tau).expect("finite release");

        let mut env = DecayEnvelope::new();
        env.trigger();
        let mut prev = env.level();
        for _ in 0..bound {
            let level = env.next_sample(tau, &ctx);
            assert!(level <= prev, "release must never rise");
            prev = level;
        }
        assert!(!env.is_audible(), "level {} still above threshold", env.level());
    }

    #[test]
    fn shorter_release_finishes_sooner() {
        let dt = 1.0 / SAMPLE_RATE;
        let fast = samples_to_silence(dt, 0.05).unwrap();
        let slow = samples_to_silence(dt, 2.0).unwrap();
        assert!(fast < slow);
    }

    #[test]
    fn oversized_step_cuts_to_silence() {
        let ctx = RenderCtx::from_sample_rate(10.0); // dt = 0.1 s
        let mut env = DecayEnvelope::new();
        env.trigger();
        let level = env.next_sample(0.05, &ctx);
        assert_eq!(level, 0.0);
        assert_eq!(samples_to_silence(ctx.dt, 0.05), Some(1));
    }

    #[test]
    fn degenerate_time_constants_stay_bounded() {
        let ctx = ctx();
        for tau in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let mut env = DecayEnvelope::new();
            env.trigger();
            let level = env.next_sample(tau, &ctx);
            assert!((0.0..=1.0).contains(&level), "tau {tau} gave {level}");
        }
        assert_eq!(samples_to_silence(0.0, 0.4), None);
    }
}
