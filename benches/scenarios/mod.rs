//! Whole-engine benchmarks.
//!
//! Per-sample cost should scale with sounding voices and never with how
//! many note events have been played before.

mod polyphony;

pub use polyphony::bench_polyphony;
