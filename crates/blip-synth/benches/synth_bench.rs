//! Criterion benchmarks for blip-synth components
//!
//! Run with: cargo bench -p blip-synth
#![allow(missing_docs)]

use blip_synth::{EngineParams, Mixer, PhaseMode, ToneEngine, ToneRequest};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];
const NOTE_COUNTS: &[usize] = &[1, 8, 32, 128];

/// Mixer with `notes` long tones already resident.
fn loaded_mixer(notes: usize, phase_mode: PhaseMode) -> Mixer {
    let params = EngineParams {
        phase_mode,
        ..EngineParams::default()
    };
    let mut mixer = Mixer::new(params).unwrap();
    for i in 0..notes {
        mixer.schedule(ToneRequest::new(110.0 + i as f32 * 7.0, 0.0, 1.0e6));
    }
    mixer
}

// ============================================================================
// Mixer benchmarks
// ============================================================================

fn bench_mixer_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mixer");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("8_notes", block_size),
            &block_size,
            |b, &size| {
                let mut mixer = loaded_mixer(8, PhaseMode::default());
                let mut out = vec![0i16; size];
                b.iter(|| {
                    mixer.render(&mut out);
                    black_box(&out);
                });
            },
        );
    }

    group.finish();
}

fn bench_mixer_polyphony(c: &mut Criterion) {
    let mut group = c.benchmark_group("Polyphony");

    let modes = [
        ("continuous", PhaseMode::Continuous),
        ("fixed", PhaseMode::default()),
    ];

    for (name, mode) in modes {
        for &notes in NOTE_COUNTS {
            group.bench_with_input(BenchmarkId::new(name, notes), &notes, |b, &n| {
                let mut mixer = loaded_mixer(n, mode);
                let mut out = vec![0i16; 512];
                b.iter(|| {
                    mixer.render(&mut out);
                    black_box(&out);
                });
            });
        }
    }

    group.finish();
}

// ============================================================================
// Engine benchmarks
// ============================================================================

fn bench_engine_roundtrip(c: &mut Criterion) {
    c.bench_function("Engine/schedule_and_render_512", |b| {
        let (scheduler, mut renderer) = ToneEngine::new(EngineParams::default())
            .unwrap()
            .split();
        let mut out = vec![0.0f32; 512];
        b.iter(|| {
            let now = scheduler.audio_time();
            scheduler.play_tone(black_box(440.0), 0.005, now);
            renderer.render(&mut out);
            black_box(&out);
        });
    });
}

criterion_group!(
    benches,
    bench_mixer_blocks,
    bench_mixer_polyphony,
    bench_engine_roundtrip,
);

criterion_main!(benches);
