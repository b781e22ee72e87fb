pub mod dsp;
pub mod io;
pub mod synth; // Voice pool, engine, and event intake

pub use synth::{
    message::{ScheduledMessage, SynthMessage},
    params::{Param, SynthParams},
    pool::POOL_SIZE,
    SyncSynth,
};

pub const MAX_BLOCK_SIZE: usize = 2048;
