use crate::{
    dsp::context::RenderCtx,
    synth::voice::{Voice, VoiceState},
};

/// Default polyphony.
pub const POOL_SIZE: usize = 12;

/// Per-voice view for meters and visualizers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSnapshot {
    pub slot: usize,
    pub note: u8,
    pub state: VoiceState,
    pub level: f32,
}

/// Fixed-capacity arena of voice slots, addressed by index.
///
/// Allocation scans in slot order and takes the first free slot. When every
/// slot is held or still decaying the note-on is dropped: there is no voice
/// stealing, so dense playing can starve new notes until something decays.
pub struct VoicePool<const N: usize = POOL_SIZE> {
    voices: [Voice; N],
}

impl<const N: usize> Default for VoicePool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> VoicePool<N> {
    pub fn new() -> Self {
        Self {
            voices: [Voice::new(); N],
        }
    }

    /// Start `note` on the first free slot. Returns the slot index, or `None`
    /// when the pool is saturated.
    pub fn allocate(&mut self, note: u8, age: u64) -> Option<usize> {
        let slot = self.voices.iter().position(Voice::is_free)?;
        self.voices[slot].start(note, age);
        Some(slot)
    }

    /// Release every held voice playing `note`.
    ///
    /// Two held voices on the same pitch are indistinguishable here, so one
    /// note-off releases both.
    pub fn release(&mut self, note: u8) {
        for voice in self
            .voices
            .iter_mut()
            .filter(|v| v.is_active() && v.note() == note)
        {
            voice.release();
        }
    }

    pub fn release_all(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
    }

    /// Hard stop: every slot silent and free.
    pub fn silence_all(&mut self) {
        for voice in &mut self.voices {
            voice.silence();
        }
    }

    /// Advance every sounding voice one sample and return the summed mix.
    #[inline]
    pub fn tick(&mut self, ctx: &RenderCtx) -> f32 {
        let mut mix = 0.0;
        for voice in &mut self.voices {
            if voice.is_sounding() {
                mix += voice.tick(ctx);
            }
        }
        mix
    }

    pub fn voice(&self, slot: usize) -> Option<&Voice> {
        self.voices.get(slot)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Slots whose key is still held.
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    /// Slots that will be rendered on the next tick.
    pub fn sounding_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_sounding()).count()
    }

    /// Append a snapshot of every sounding voice to `out`.
    ///
    /// `out` is not cleared; reuse a buffer with enough capacity to stay
    /// allocation-free on the audio thread.
    pub fn collect_snapshots(&self, out: &mut Vec<VoiceSnapshot>) {
        for (slot, voice) in self.voices.iter().enumerate() {
            if voice.is_sounding() {
                out.push(VoiceSnapshot {
                    slot,
                    note: voice.note(),
                    state: voice.state(),
                    level: voice.envelope_level(),
                });
            }
        }
    }
}
