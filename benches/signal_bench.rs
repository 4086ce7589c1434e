//! Benchmarks for signal conditioning and analysis.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spectra_canvas::audio::synth::{generate_test_beat, synthetic_snapshot};
use spectra_canvas::audio::{SpectrumAnalyzer, TrackAnalyser};
use spectra_canvas::pipeline::FrequencySource;
use spectra_canvas::signal::{condition, BeatDetector, ConditionerConfig};

const SAMPLE_RATE: u32 = 44100;

fn bench_condition(c: &mut Criterion) {
    let mut group = c.benchmark_group("Conditioning");
    let config = ConditionerConfig {
        balance: 0.5,
        window: 3,
    };

    for bins in [256, 1024, 4096] {
        let raw = synthetic_snapshot(bins, 0.9, 0.6);
        group.throughput(Throughput::Elements(bins as u64));
        group.bench_with_input(BenchmarkId::new("condition", bins), &raw, |b, raw| {
            b.iter(|| black_box(condition(raw, &config)));
        });
    }

    group.finish();
}

fn bench_beat_detection(c: &mut Criterion) {
    let signal: Vec<f32> = synthetic_snapshot(1024, 0.9, 0.5)
        .into_iter()
        .map(f32::from)
        .collect();
    let detector = BeatDetector::new();
    c.bench_function("beat_detect_1024", |b| {
        b.iter(|| black_box(detector.detect(&signal)));
    });
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("FFT Analysis");
    let samples = generate_test_beat(120.0, SAMPLE_RATE, 1.0);

    for fft_size in [512, 1024, 2048, 4096] {
        group.throughput(Throughput::Elements(fft_size as u64));
        group.bench_with_input(BenchmarkId::new("analyze", fft_size), &fft_size, |b, &size| {
            let Ok(mut analyzer) = SpectrumAnalyzer::new(size) else {
                return;
            };
            b.iter(|| black_box(analyzer.analyze(&samples)));
        });
    }

    group.finish();
}

fn bench_track_snapshot(c: &mut Criterion) {
    let samples = generate_test_beat(120.0, SAMPLE_RATE, 2.0);
    let Ok(mut analyser) = TrackAnalyser::new(samples, SAMPLE_RATE, 2048) else {
        return;
    };
    analyser.seek(1.0);
    c.bench_function("track_snapshot_2048", |b| {
        b.iter(|| black_box(analyser.snapshot().map(|s| s.len())));
    });
}

criterion_group!(
    benches,
    bench_condition,
    bench_beat_detection,
    bench_fft,
    bench_track_snapshot
);
criterion_main!(benches);
