//! Benchmarks for the one-pole output filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hardsync::dsp::{context::RenderCtx, filter::OnePoleFilter};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::from_sample_rate(48_000.0);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| if i % 64 < 32 { 1.0 } else { -1.0 }).collect();
        let mut buffer = vec![0.0f32; size];
        let mut filter = OnePoleFilter::new();

        group.bench_with_input(BenchmarkId::new("one_pole", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = filter.process(black_box(x), &ctx);
                }
            })
        });
    }

    group.finish();
}
