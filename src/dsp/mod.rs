//! Low-level DSP primitives used by each voice and by the output stage.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice slots. They stay focused on the signal math; the
//! `synth` layer decides when each one runs.

/// Per-tick render context and note-to-frequency conversion.
pub mod context;
/// Exponential decay envelope with held/released time constants.
pub mod envelope;
/// One-pole output smoother.
pub mod filter;
/// Hard-sync master/slave oscillator pair.
pub mod oscillator;

pub use context::RenderCtx;
