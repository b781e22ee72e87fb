// Purpose: Voice management, polyphony, event intake
// This layer sits above the DSP primitives and runs the per-sample loop

pub mod engine;
pub mod message;
pub mod params;
pub mod pool;
pub mod voice;

pub use engine::SyncSynth;
