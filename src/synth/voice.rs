use crate::dsp::{
    context::{midi_note_to_freq, RenderCtx},
    envelope::{DecayEnvelope, SUSTAIN_DECAY_SECS},
    oscillator::SyncOscillator,
};

/// Detune bias per MIDI note number, scaled by the drift-amount control.
///
/// At full drift the top note runs about 1.3% (~22 cents) sharp, middle C
/// about 0.6%.
pub const DRIFT_PER_NOTE: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Active,    // Key held, slow sustain sag
    Releasing, // Key released, decaying at the release time constant
}

/// One pool slot: a hard-sync oscillator pair and its decay envelope.
///
/// A slot is never destroyed. It counts as free once it is releasing and its
/// envelope has sunk below the silence threshold.
#[derive(Debug, Clone, Copy)]
pub struct Voice {
    note: u8,
    frequency: f64,
    drift_offset: f32,
    state: VoiceState,
    age: u64,
    oscillator: SyncOscillator,
    envelope: DecayEnvelope,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

impl Voice {
    pub fn new() -> Self {
        Self {
            note: 0,
            frequency: 0.0,
            drift_offset: 0.0,
            state: VoiceState::Releasing,
            age: 0,
            oscillator: SyncOscillator::new(),
            envelope: DecayEnvelope::new(),
        }
    }

    /// Claim this slot for `note`, restarting phases and envelope.
    pub fn start(&mut self, note: u8, age: u64) {
        self.note = note;
        self.frequency = midi_note_to_freq(note);
        self.drift_offset = note as f32 * DRIFT_PER_NOTE;
        self.state = VoiceState::Active;
        self.age = age;

        self.oscillator.reset();
        self.envelope.trigger();
    }

    /// Key up. Only an active voice changes state; repeat calls are no-ops.
    pub fn release(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;
        }
    }

    /// Force the slot back to free immediately.
    pub fn silence(&mut self) {
        self.state = VoiceState::Releasing;
        self.envelope.reset();
    }

    /// Render one sample: oscillator first, then envelope, then multiply.
    #[inline]
    pub fn tick(&mut self, ctx: &RenderCtx) -> f32 {
        let freq =
            self.frequency * (1.0 + self.drift_offset as f64 * ctx.drift_amount as f64);
        let saw = self
            .oscillator
            .next_sample(freq, ctx.sync_ratio as f64, ctx.dt as f64);

        let tau = match self.state {
            VoiceState::Active => SUSTAIN_DECAY_SECS,
            VoiceState::Releasing => ctx.release_secs,
        };
        let level = self.envelope.next_sample(tau, ctx);

        saw * level
    }

    /// Needs rendering this sample: held, or still audibly decaying.
    pub fn is_sounding(&self) -> bool {
        self.state == VoiceState::Active || self.envelope.is_audible()
    }

    /// Available for the next note-on.
    pub fn is_free(&self) -> bool {
        !self.is_sounding()
    }

    pub fn is_active(&self) -> bool {
        self.state == VoiceState::Active
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn drift_offset(&self) -> f32 {
        self.drift_offset
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn envelope_level(&self) -> f32 {
        self.envelope.level()
    }

    pub fn oscillator(&self) -> &SyncOscillator {
        &self.oscillator
    }
}
