use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The four continuous controls a host feeds the engine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Slave/master frequency ratio; also drives the output filter cutoff
    SyncRatio,
    /// Release-phase decay time constant in milliseconds
    ReleaseMs,
    /// Declared for hosts, not applied by the one-pole output filter
    Resonance,
    /// Scales each voice's pitch-derived detune
    DriftAmount,
}

impl Param {
    pub const ALL: [Param; 4] = [
        Param::SyncRatio,
        Param::ReleaseMs,
        Param::Resonance,
        Param::DriftAmount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Param::SyncRatio => "sync_ratio",
            Param::ReleaseMs => "release_ms",
            Param::Resonance => "resonance",
            Param::DriftAmount => "drift_amount",
        }
    }

    /// Documented range. The engine does not enforce it.
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            Param::SyncRatio => 1.0..=8.0,
            Param::ReleaseMs => 50.0..=2000.0,
            Param::Resonance => 0.0..=0.95,
            Param::DriftAmount => 0.0..=1.0,
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            Param::SyncRatio => 2.5,
            Param::ReleaseMs => 400.0,
            Param::Resonance => 0.6,
            Param::DriftAmount => 0.2,
        }
    }

    /// Increment used by hosts that nudge a control up or down.
    pub fn step(self) -> f32 {
        match self {
            Param::SyncRatio => 0.1,
            Param::ReleaseMs => 50.0,
            Param::Resonance => 0.05,
            Param::DriftAmount => 0.05,
        }
    }

    /// Clamp `value` into the documented range. NaN maps to the default.
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default_value();
        }
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }
}

/// Pool-wide control state, read by every voice during a tick.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub sync_ratio: f32,
    pub release_ms: f32,
    pub resonance: f32,
    pub drift_amount: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            sync_ratio: Param::SyncRatio.default_value(),
            release_ms: Param::ReleaseMs.default_value(),
            resonance: Param::Resonance.default_value(),
            drift_amount: Param::DriftAmount.default_value(),
        }
    }
}

impl SynthParams {
    pub fn get(&self, param: Param) -> f32 {
        match param {
            Param::SyncRatio => self.sync_ratio,
            Param::ReleaseMs => self.release_ms,
            Param::Resonance => self.resonance,
            Param::DriftAmount => self.drift_amount,
        }
    }

    /// Store `value` as-is. Range checks are the caller's business.
    pub fn set(&mut self, param: Param, value: f32) {
        match param {
            Param::SyncRatio => self.sync_ratio = value,
            Param::ReleaseMs => self.release_ms = value,
            Param::Resonance => self.resonance = value,
            Param::DriftAmount => self.drift_amount = value,
        }
    }

    /// Copy with every control forced into its documented range.
    ///
    /// Meant for the host side (config loading, UI); never called on the
    /// audio thread.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for param in Param::ALL {
            let value = self.get(param);
            let clamped = param.clamp(value);
            if clamped != value {
                tracing::warn!(
                    param = param.name(),
                    value,
                    clamped,
                    "control outside documented range"
                );
            }
            out.set(param, clamped);
        }
        out
    }
}
