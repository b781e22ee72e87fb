use std::collections::VecDeque;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::synth::params::Param;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { note: u8 },
    NoteOff { note: u8 },
    SetParam { param: Param, value: f32 },
    AllNotesOff,
}

/// A message stamped with the engine frame it must be applied before.
///
/// Frame 0 (or any frame already in the past) means "at the next tick".
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScheduledMessage {
    pub frame: u64,
    pub message: SynthMessage,
}

impl ScheduledMessage {
    pub fn now(message: SynthMessage) -> Self {
        Self { frame: 0, message }
    }

    pub fn at(frame: u64, message: SynthMessage) -> Self {
        Self { frame, message }
    }
}

impl From<SynthMessage> for ScheduledMessage {
    fn from(message: SynthMessage) -> Self {
        Self::now(message)
    }
}

/// Source of scheduled messages for the engine.
///
/// Producers must push in non-decreasing frame order: the engine stops
/// draining at the first message that lies in the future.
pub trait MessageReceiver {
    fn peek(&self) -> Option<&ScheduledMessage>;
    fn pop(&mut self) -> Option<ScheduledMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ScheduledMessage> {
    fn peek(&self) -> Option<&ScheduledMessage> {
        Consumer::peek(self).ok()
    }

    fn pop(&mut self) -> Option<ScheduledMessage> {
        Consumer::pop(self).ok()
    }
}

/// Offline queue for rendering without a realtime producer thread.
impl MessageReceiver for VecDeque<ScheduledMessage> {
    fn peek(&self) -> Option<&ScheduledMessage> {
        self.front()
    }

    fn pop(&mut self) -> Option<ScheduledMessage> {
        self.pop_front()
    }
}

/// Receiver that never yields anything, for hosts that drive the engine
/// through its direct methods only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMessages;

impl MessageReceiver for NoMessages {
    fn peek(&self) -> Option<&ScheduledMessage> {
        None
    }

    fn pop(&mut self) -> Option<ScheduledMessage> {
        None
    }
}
