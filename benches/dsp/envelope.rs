//! Benchmarks for the decay envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hardsync::dsp::{
    context::RenderCtx,
    envelope::{DecayEnvelope, SUSTAIN_DECAY_SECS},
};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::from_sample_rate(48_000.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut env = DecayEnvelope::new();
        env.trigger();
        group.bench_with_input(BenchmarkId::new("held", size), &size, |b, _| {
            b.iter(|| {
                for s in buffer.iter_mut() {
                    *s = env.next_sample(black_box(SUSTAIN_DECAY_SECS), &ctx);
                }
            })
        });

        let mut env = DecayEnvelope::new();
        env.trigger();
        group.bench_with_input(BenchmarkId::new("released", size), &size, |b, _| {
            b.iter(|| {
                for s in buffer.iter_mut() {
                    *s = env.next_sample(black_box(ctx.release_secs), &ctx);
                }
            })
        });
    }

    group.finish();
}
