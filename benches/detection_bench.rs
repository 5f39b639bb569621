//! Performance benchmarks for tempo detection

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempo_dsp::{Algorithm, BpmDetector, DetectorConfig};

/// 30 seconds of a 128 BPM signal with a second harmonic
fn synthetic_track() -> Vec<f32> {
    let f = 128.0f32 / 60.0;
    (0..44100 * 30)
        .map(|i| {
            let t = i as f32 / 44100.0;
            (2.0 * std::f32::consts::PI * f * t).sin()
                + 0.5 * (4.0 * std::f32::consts::PI * f * t).sin()
        })
        .collect()
}

fn bench_single_algorithms(c: &mut Criterion) {
    let samples = synthetic_track();
    let detector = BpmDetector::default();

    for algorithm in Algorithm::ALL {
        let name = format!("detect_{}_30s", algorithm.name().replace(' ', "_"));
        c.bench_function(&name, |b| {
            b.iter(|| {
                let _ = detector.detect(black_box(&samples), black_box(44100), algorithm);
            });
        });
    }
}

fn bench_detect_all(c: &mut Criterion) {
    let samples = synthetic_track();
    let parallel = BpmDetector::default();
    let sequential = BpmDetector::new(DetectorConfig {
        parallel: false,
        ..DetectorConfig::default()
    });

    c.bench_function("detect_all_30s_parallel", |b| {
        b.iter(|| {
            let _ = parallel.detect_all(black_box(&samples), black_box(44100));
        });
    });

    c.bench_function("detect_all_30s_sequential", |b| {
        b.iter(|| {
            let _ = sequential.detect_all(black_box(&samples), black_box(44100));
        });
    });
}

criterion_group!(benches, bench_single_algorithms, bench_detect_all);
criterion_main!(benches);
