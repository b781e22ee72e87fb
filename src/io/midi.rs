use crate::synth::message::SynthMessage;

const STATUS_NOTE_OFF: u8 = 0x80;
const STATUS_NOTE_ON: u8 = 0x90;

/// Note events extracted from raw MIDI. Everything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
}

impl MidiEvent {
    /// Parse one channel voice message.
    ///
    /// Note-on with velocity 0 is reported as note-off, as the running-status
    /// convention intends. Returns `None` for anything that is not a complete
    /// note message.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let [status, key, velocity, ..] = *bytes else {
            return None;
        };
        if key > 0x7F || velocity > 0x7F {
            return None;
        }

        let channel = status & 0x0F;
        match status & 0xF0 {
            STATUS_NOTE_ON if velocity > 0 => Some(MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            }),
            STATUS_NOTE_ON | STATUS_NOTE_OFF => Some(MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            }),
            _ => None,
        }
    }

    pub fn key(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => key,
        }
    }

    /// Engine message for this event. Channel and velocity are dropped.
    pub fn to_message(self) -> SynthMessage {
        match self {
            MidiEvent::NoteOn { key, .. } => SynthMessage::NoteOn { note: key },
            MidiEvent::NoteOff { key, .. } => SynthMessage::NoteOff { note: key },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_note_on() {
        assert_eq!(
            MidiEvent::parse(&[0x93, 60, 100]),
            Some(MidiEvent::NoteOn {
                channel: 3,
                key: 60,
                velocity: 100
            })
        );
    }

    #[test]
    fn zero_velocity_note_on_is_note_off() {
        let event = MidiEvent::parse(&[0x90, 64, 0]).unwrap();
        assert!(matches!(event, MidiEvent::NoteOff { key: 64, .. }));
        assert_eq!(event.to_message(), SynthMessage::NoteOff { note: 64 });
    }

    #[test]
    fn parses_note_off() {
        let event = MidiEvent::parse(&[0x8F, 67, 40]).unwrap();
        assert_eq!(event.key(), 67);
        assert_eq!(event.to_message(), SynthMessage::NoteOff { note: 67 });
    }

    #[test]
    fn ignores_other_messages() {
        assert_eq!(MidiEvent::parse(&[0xB0, 7, 100]), None); // control change
        assert_eq!(MidiEvent::parse(&[0xE0, 0, 64]), None); // pitch bend
        assert_eq!(MidiEvent::parse(&[0xF8]), None); // clock
        assert_eq!(MidiEvent::parse(&[0x90, 60]), None); // truncated
        assert_eq!(MidiEvent::parse(&[0x90, 0x80, 10]), None); // data byte out of range
        assert_eq!(MidiEvent::parse(&[]), None);
    }
}
