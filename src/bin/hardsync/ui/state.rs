//! Shared state types for UI communication
//!
//! Designed for real-time safety: the audio thread only ever sends `Copy`
//! values, so pushing a meter frame never allocates.

use std::time::{Duration, Instant};

use hardsync::{
    synth::{pool::VoiceSnapshot, voice::VoiceState},
    Param, SynthParams, POOL_SIZE,
};

/// Dynamic voice state sent from the audio thread once per callback.
#[derive(Clone, Copy, Debug)]
pub struct MeterFrame {
    /// Engine frame counter at the end of the callback
    pub frame: u64,
    /// Sounding voices, packed from index 0
    pub voices: [VoiceSnapshot; POOL_SIZE],
    /// Number of valid entries in `voices`
    pub num_voices: u8,
}

impl MeterFrame {
    pub fn from_snapshots(snapshots: &[VoiceSnapshot], frame: u64) -> Self {
        let mut voices = [VoiceSnapshot {
            slot: 0,
            note: 0,
            state: VoiceState::Releasing,
            level: 0.0,
        }; POOL_SIZE];
        let count = snapshots.len().min(POOL_SIZE);
        voices[..count].copy_from_slice(&snapshots[..count]);

        Self {
            frame,
            voices,
            num_voices: count as u8,
        }
    }

    pub fn sounding(&self) -> &[VoiceSnapshot] {
        &self.voices[..self.num_voices as usize]
    }
}

impl Default for MeterFrame {
    fn default() -> Self {
        Self::from_snapshots(&[], 0)
    }
}

/// UI-side mirror of the controls plus keyboard bookkeeping.
pub struct UiState {
    pub params: SynthParams,
    pub selected: usize,
    pub octave: i8,
    pub sample_rate: f32,
    pub meters: MeterFrame,
    gate: Duration,
    /// Notes started from the keyboard and when their gate closes
    held: Vec<(u8, Instant)>,
}

impl UiState {
    pub fn new(params: SynthParams, sample_rate: f32, gate_ms: u64) -> Self {
        Self {
            params,
            selected: 0,
            octave: 4,
            sample_rate,
            meters: MeterFrame::default(),
            gate: Duration::from_millis(gate_ms),
            held: Vec::with_capacity(POOL_SIZE),
        }
    }

    pub fn selected_param(&self) -> Param {
        Param::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Param::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + Param::ALL.len() - 1) % Param::ALL.len();
    }

    /// Nudge the selected control by `steps` increments, clamped to its range.
    /// Returns the control and its new value.
    pub fn nudge(&mut self, steps: f32) -> (Param, f32) {
        let param = self.selected_param();
        let value = param.clamp(self.params.get(param) + steps * param.step());
        self.params.set(param, value);
        (param, value)
    }

    pub fn shift_octave(&mut self, delta: i8) {
        self.octave = (self.octave + delta).clamp(0, 8);
    }

    /// MIDI note for a key `semitone` steps above C of the current octave.
    pub fn note_for(&self, semitone: u8) -> Option<u8> {
        let note = (self.octave as i16 + 1) * 12 + semitone as i16;
        u8::try_from(note).ok().filter(|&n| n <= 127)
    }

    /// Remember a keyboard note so its note-off can be sent when the gate
    /// closes. Re-pressing a held key extends its gate.
    pub fn hold(&mut self, note: u8, now: Instant) {
        let until = now + self.gate;
        match self.held.iter_mut().find(|(n, _)| *n == note) {
            Some(entry) => entry.1 = until,
            None => self.held.push((note, until)),
        }
    }

    pub fn is_held(&self, note: u8) -> bool {
        self.held.iter().any(|(n, _)| *n == note)
    }

    /// Remove and return notes whose gate has closed.
    pub fn expired(&mut self, now: Instant) -> Vec<u8> {
        let mut done = Vec::new();
        self.held.retain(|&(note, until)| {
            if until <= now {
                done.push(note);
                false
            } else {
                true
            }
        });
        done
    }

    pub fn clear_held(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> UiState {
        UiState::new(SynthParams::default(), 48_000.0, 500)
    }

    #[test]
    fn nudge_respects_range() {
        let mut state = state();
        assert_eq!(state.selected_param(), Param::SyncRatio);
        for _ in 0..200 {
            state.nudge(1.0);
        }
        assert_eq!(state.params.sync_ratio, 8.0);
    }

    #[test]
    fn selection_wraps() {
        let mut state = state();
        state.select_prev();
        assert_eq!(state.selected_param(), Param::DriftAmount);
        state.select_next();
        assert_eq!(state.selected_param(), Param::SyncRatio);
    }

    #[test]
    fn keyboard_maps_to_midi_notes() {
        let mut state = state();
        assert_eq!(state.note_for(0), Some(60));
        state.shift_octave(10);
        assert_eq!(state.octave, 8);
        assert_eq!(state.note_for(11), Some(119));
    }

    #[test]
    fn gates_expire() {
        let mut state = state();
        let t0 = Instant::now();
        state.hold(60, t0);
        assert!(state.is_held(60));
        assert!(state.expired(t0).is_empty());
        assert_eq!(state.expired(t0 + Duration::from_millis(600)), vec![60]);
        assert!(!state.is_held(60));
    }

    #[test]
    fn meter_frame_packs_snapshots() {
        let snaps = [VoiceSnapshot {
            slot: 3,
            note: 64,
            state: VoiceState::Active,
            level: 0.5,
        }];
        let meters = MeterFrame::from_snapshots(&snaps, 99);
        assert_eq!(meters.sounding(), &snaps);
        assert_eq!(meters.frame, 99);
    }
}
