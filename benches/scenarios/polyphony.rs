//! Benchmarks for full engine rendering at different voice counts.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use hardsync::{synth::message::NoMessages, SyncSynth, POOL_SIZE};

use crate::BLOCK_SIZES;

pub fn bench_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/polyphony");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for voices in [0usize, 4, POOL_SIZE] {
            let mut synth = SyncSynth::new(48_000.0, NoMessages);
            for i in 0..voices {
                synth.note_on(48 + (i as u8) * 3);
            }

            // Held voices keep rendering however long criterion runs
            let name = format!("voices_{voices}");
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    synth.render_block(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
