//! Decoded audio driving the full pipeline.

mod common;

use common::small_config;
use spectra_canvas::audio::{generate_sine, generate_test_beat, synthetic_snapshot, write_wav};
use spectra_canvas::pipeline::{FixedStepTicks, TickSource};
use spectra_canvas::{
    load_audio, DesignType, ManualClock, Pipeline, Scheduler, StaticSource, TrackAnalyser,
};

const SAMPLE_RATE: u32 = 22050;
const FFT_SIZE: usize = 1024;

struct RunStats {
    frames: u64,
    beats: usize,
    max_bass: f32,
}

/// Render `seconds` of `samples` at 30 fps, seeking the analyser each tick.
fn render_track(samples: Vec<f32>, seconds: f64) -> RunStats {
    let analyser = TrackAnalyser::new(samples, SAMPLE_RATE, FFT_SIZE).unwrap();
    let pipeline = Pipeline::new(small_config(DesignType::PulseRings)).unwrap();
    let mut scheduler = Scheduler::new(pipeline, analyser, ManualClock::default());
    scheduler.play();

    let fps = 30.0;
    let mut ticks = FixedStepTicks::new(fps, Some((seconds * fps) as u64));
    let mut stats = RunStats {
        frames: 0,
        beats: 0,
        max_bass: 0.0,
    };
    while let Some(now) = ticks.next_tick() {
        scheduler.source_mut().seek(now);
        scheduler.clock_mut().set_time(now);
        let info = scheduler.step(now).unwrap();
        stats.frames += 1;
        stats.beats += usize::from(info.beat);
        stats.max_bass = stats.max_bass.max(info.bass_energy);
    }
    stats
}

#[test]
fn test_written_wav_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    let tone = generate_sine(440.0, SAMPLE_RATE, 0.5, 0.5);
    write_wav(&path, &tone, SAMPLE_RATE).unwrap();

    let audio = load_audio(&path).unwrap();
    assert_eq!(audio.sample_rate, SAMPLE_RATE);
    assert_eq!(audio.channels, 1);
    assert!((audio.duration() - 0.5).abs() < 0.01);

    let analyser = TrackAnalyser::open(&path, FFT_SIZE).unwrap();
    assert_eq!(analyser.bin_count(), FFT_SIZE / 2);
    assert!((analyser.duration() - 0.5).abs() < 0.01);
}

#[test]
fn test_open_rejects_bad_fft_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.wav");
    write_wav(&path, &[0.0; 512], SAMPLE_RATE).unwrap();
    assert!(TrackAnalyser::open(&path, 1000).is_err());
}

#[test]
fn test_beat_track_outdrives_silence() {
    let seconds = 2.0;
    let beat = render_track(generate_test_beat(120.0, SAMPLE_RATE, seconds as f32), seconds);
    let silence = render_track(vec![0.0; (SAMPLE_RATE as f64 * seconds) as usize], seconds);

    assert_eq!(beat.frames, 60);
    assert_eq!(silence.frames, 60);
    assert_eq!(silence.beats, 0);
    assert_eq!(silence.max_bass, 0.0);
    assert!(beat.max_bass > silence.max_bass);
}

#[test]
fn test_synthetic_snapshot_trips_the_beat_detector() {
    let pipeline = Pipeline::new(small_config(DesignType::Bars)).unwrap();
    let loud = synthetic_snapshot(256, 1.0, 0.2);
    let quiet = synthetic_snapshot(256, 0.05, 0.05);
    let mut scheduler = Scheduler::new(
        pipeline,
        StaticSource::new(loud),
        ManualClock::default(),
    );
    scheduler.play();
    assert!(scheduler.step(0.0).unwrap().beat);

    scheduler.source_mut().set(quiet);
    assert!(!scheduler.step(0.1).unwrap().beat);
}
