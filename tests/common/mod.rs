//! Shared fixtures for integration tests.
#![allow(dead_code)]

use spectra_canvas::audio::StaticSource;
use spectra_canvas::pipeline::{ManualClock, Pipeline, Scheduler, VisualizerConfig};
use spectra_canvas::DesignType;

pub const BINS: usize = 128;

/// Small canvas config with the given design.
pub fn small_config(design: DesignType) -> VisualizerConfig {
    VisualizerConfig {
        width: 160,
        height: 96,
        design,
        ..VisualizerConfig::default()
    }
}

/// Snapshot with every bin at `value`.
pub fn uniform_snapshot(value: u8) -> Vec<u8> {
    vec![value; BINS]
}

/// Snapshot rising linearly from 0 to 255.
pub fn gradient_snapshot() -> Vec<u8> {
    (0..BINS).map(|i| (i * 255 / (BINS - 1)) as u8).collect()
}

/// Snapshot that reads as a beat: loud bass, moderate rest.
pub fn beat_snapshot() -> Vec<u8> {
    (0..BINS).map(|i| if i < BINS / 4 { 255 } else { 120 }).collect()
}

/// Float signal for drawing designs directly.
pub fn signal_of(snapshot: &[u8]) -> Vec<f32> {
    snapshot.iter().map(|&b| b as f32).collect()
}

pub type TestScheduler = Scheduler<StaticSource, ManualClock>;

/// Playing scheduler over a static source.
pub fn scheduler(design: DesignType, snapshot: Vec<u8>) -> TestScheduler {
    let pipeline = Pipeline::new(small_config(design)).expect("pipeline");
    let mut scheduler = Scheduler::new(pipeline, StaticSource::new(snapshot), ManualClock::default());
    scheduler.play();
    scheduler
}

/// Step the scheduler `frames` times at 60 fps starting from `start`.
pub fn run_frames(scheduler: &mut TestScheduler, start: f64, frames: usize) -> f64 {
    let mut now = start;
    for _ in 0..frames {
        scheduler.step(now);
        now += 1.0 / 60.0;
    }
    now
}
