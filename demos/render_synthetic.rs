//! Demo: render a synthetic beat to PNG frames.
//!
//! Generates a 120 BPM test beat, analyses it with the reference analyser
//! and renders a few seconds, switching designs halfway with a transition.
//!
//! Run with:
//!     cargo run --example render_synthetic

use std::path::Path;

use anyhow::Context as _;
use spectra_canvas::audio::synth::generate_test_beat;
use spectra_canvas::pipeline::{FixedStepTicks, TickSource};
use spectra_canvas::{
    DesignType, ManualClock, PaletteKind, Pipeline, Scheduler, TrackAnalyser, TransitionKind,
    VisualizerConfig,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let sample_rate: u32 = 44100;
    let duration: f32 = 4.0;
    let fps = 30.0;

    let samples = generate_test_beat(120.0, sample_rate, duration);
    println!("Generated {} samples of test beat", samples.len());
    let analyser = TrackAnalyser::new(samples, sample_rate, 2048)?;

    let config = VisualizerConfig {
        width: 640,
        height: 360,
        design: DesignType::CircularRadial,
        palette: PaletteKind::Rainbow,
        ..VisualizerConfig::default()
    };
    let pipeline = Pipeline::new(config)?;
    let mut scheduler = Scheduler::new(pipeline, analyser, ManualClock::default());
    scheduler.play();

    let out = Path::new("synthetic_frames");
    std::fs::create_dir_all(out).context("create output directory")?;

    let total_frames = (duration as f64 * fps).ceil() as u64;
    let mut ticks = FixedStepTicks::new(fps, Some(total_frames));
    let mut beats = 0;

    while let Some(now) = ticks.next_tick() {
        scheduler.source_mut().seek(now);
        scheduler.clock_mut().set_time(now);
        if scheduler.frame_index() == total_frames / 2 {
            let pipeline = scheduler.pipeline_mut();
            pipeline.start_transition(TransitionKind::CircleOpen, now);
            pipeline.set_design(DesignType::PulseRings);
        }
        let Some(info) = scheduler.step(now) else {
            continue;
        };
        if info.beat {
            beats += 1;
        }
        let path = out.join(format!("frame_{:04}.png", info.frame_index));
        scheduler
            .pipeline()
            .canvas()
            .to_rgba_image()
            .save(&path)
            .with_context(|| format!("write {}", path.display()))?;
    }

    println!(
        "Rendered {} frames ({} beat frames) to {}",
        scheduler.frame_index(),
        beats,
        out.display()
    );
    Ok(())
}
