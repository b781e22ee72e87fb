//! Benchmarks for the hard-sync oscillator pair.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hardsync::dsp::oscillator::SyncOscillator;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let dt = 1.0 / 48_000.0;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Low ratio: few free-running slave wraps
        let mut osc = SyncOscillator::new();
        group.bench_with_input(BenchmarkId::new("ratio_1_5", size), &size, |b, _| {
            b.iter(|| {
                for s in buffer.iter_mut() {
                    *s = osc.next_sample(black_box(110.0), black_box(1.5), dt);
                }
            })
        });

        // High ratio on a high note: a wrap or sync almost every few samples
        let mut osc = SyncOscillator::new();
        group.bench_with_input(BenchmarkId::new("ratio_8", size), &size, |b, _| {
            b.iter(|| {
                for s in buffer.iter_mut() {
                    *s = osc.next_sample(black_box(1760.0), black_box(8.0), dt);
                }
            })
        });
    }

    group.finish();
}
