//! Frame pipeline and scheduler behaviour through the public API.

mod common;

use common::*;
use spectra_canvas::audio::{NoSource, StaticSource};
use spectra_canvas::designs::MOSH_LIFETIME;
use spectra_canvas::pipeline::{ManualTicks, PlayState};
use spectra_canvas::{DesignType, ManualClock, Pipeline, Rgba, Scheduler};

#[test]
fn test_new_scheduler_starts_paused() {
    let pipeline = Pipeline::new(small_config(DesignType::Bars)).unwrap();
    let mut scheduler = Scheduler::new(pipeline, StaticSource::new(gradient_snapshot()), ManualClock::default());

    assert_eq!(scheduler.state(), PlayState::Paused { settle_at: None });
    assert!(scheduler.step(0.0).is_none());
    assert_eq!(scheduler.frame_index(), 0);
}

#[test]
fn test_switching_design_drops_particles() {
    let mut s = scheduler(DesignType::Particles, beat_snapshot());
    run_frames(&mut s, 0.0, 5);
    assert!(!s.pipeline().particles().is_empty());

    s.pipeline_mut().set_design(DesignType::Bars);
    assert!(s.pipeline().particles().is_empty());
    assert_eq!(s.pipeline().design().design_type(), DesignType::Bars);
}

#[test]
fn test_switching_back_starts_from_fresh_state() {
    let mut s = scheduler(DesignType::Spectrogram, gradient_snapshot());
    run_frames(&mut s, 0.0, 12);
    assert!(s.pipeline().design().retained_frames() > 0);

    s.pipeline_mut().set_design(DesignType::Bars);
    s.pipeline_mut().set_design(DesignType::Spectrogram);
    assert_eq!(s.pipeline().design().retained_frames(), 0);
}

/// Switch `used` away and back, then check its next quiet frame matches a
/// fresh pipeline's first one.
fn assert_switch_back_renders_fresh(mut used: Pipeline) {
    let design = used.design().design_type();
    let clock = ManualClock::default();
    let mut quiet = StaticSource::new(uniform_snapshot(0));

    used.set_design(DesignType::Bars);
    used.set_design(design);
    assert_eq!(used.design().retained_frames(), 0, "{}", design.name());
    used.tick(0, 0.0, &mut quiet, &clock);

    let mut fresh = Pipeline::new(small_config(design)).unwrap();
    fresh.tick(0, 0.0, &mut quiet, &clock);

    assert!(
        used.canvas().pixmap().data() == fresh.canvas().pixmap().data(),
        "{} kept state across a switch",
        design.name()
    );
}

/// Tick `design` on `snapshot` until `done` holds for its retained state.
fn warmed_up(design: DesignType, snapshot: Vec<u8>, done: impl Fn(u32) -> bool) -> Pipeline {
    let clock = ManualClock::default();
    let mut source = StaticSource::new(snapshot);
    let mut pipeline = Pipeline::new(small_config(design)).unwrap();
    for frame in 0..120 {
        if done(pipeline.design().retained_frames()) {
            return pipeline;
        }
        pipeline.tick(frame, frame as f64 / 60.0, &mut source, &clock);
    }
    panic!("{} never reached the wanted state", design.name());
}

#[test]
fn test_reselected_spectrogram_renders_like_a_fresh_one() {
    let used = warmed_up(DesignType::Spectrogram, gradient_snapshot(), |n| n >= 20);
    assert_switch_back_renders_fresh(used);
}

#[test]
fn test_data_mosh_ghost_is_dropped_on_switch() {
    let used = warmed_up(DesignType::DataMosh, beat_snapshot(), |n| n == MOSH_LIFETIME);
    assert_switch_back_renders_fresh(used);
}

#[test]
fn test_pixel_rain_ghost_and_drops_are_dropped_on_switch() {
    let used = warmed_up(DesignType::PixelRain, beat_snapshot(), |n| n > 20);
    assert_switch_back_renders_fresh(used);
}

#[test]
fn test_resize_lands_on_next_tick() {
    let mut pipeline = Pipeline::new(small_config(DesignType::Bars)).unwrap();
    pipeline.resize(80, 40);
    assert_eq!(pipeline.canvas().width(), 160);

    let info = pipeline.tick(0, 0.0, &mut StaticSource::new(gradient_snapshot()), &ManualClock::default());
    assert!(info.dispatched);
    assert_eq!((pipeline.canvas().width(), pipeline.canvas().height()), (80, 40));
    assert_eq!((pipeline.config().width, pipeline.config().height), (80, 40));
}

#[test]
fn test_no_audio_paints_background_only() {
    let mut config = small_config(DesignType::Bars);
    config.background.color = Rgba::rgb(0.0, 0.0, 1.0);
    let mut pipeline = Pipeline::new(config).unwrap();

    let info = pipeline.tick(0, 0.0, &mut NoSource, &ManualClock::default());
    assert!(!info.dispatched);
    assert!(!info.beat);
    assert_eq!(info.bass_energy, 0.0);
    for (x, y) in [(0, 0), (80, 48), (159, 95)] {
        assert_eq!(pipeline.canvas().pixel(x, y), Some(Rgba::rgb(0.0, 0.0, 1.0)));
    }
    assert_eq!(pipeline.snapshot_len(), None);
}

#[test]
fn test_pause_owes_one_settle_tick() {
    let mut s = scheduler(DesignType::Bars, gradient_snapshot());
    assert_eq!(s.step(0.0).map(|i| i.frame_index), Some(0));
    assert_eq!(s.step(0.5).map(|i| i.frame_index), Some(1));

    s.pause(1.0);
    assert!(!s.is_playing());
    assert!(s.step(1.02).is_none());

    let settle = s.step(1.06).expect("settle tick");
    assert_eq!(settle.frame_index, 2);
    assert_eq!(s.frame_index(), 3);
    assert_eq!(s.state(), PlayState::Paused { settle_at: None });

    assert!(s.step(1.5).is_none());
    assert!(s.step(3.0).is_none());

    s.play();
    assert_eq!(s.step(4.0).map(|i| i.frame_index), Some(3));
    assert_eq!(s.frame_index(), 4);
}

#[test]
fn test_frame_indices_stay_unique_across_a_pause() {
    let mut s = scheduler(DesignType::Particles, beat_snapshot());
    let mut seen = Vec::new();
    let mut tick = |s: &mut TestScheduler, now: f64| {
        seen.extend(s.step(now).map(|info| info.frame_index));
    };
    tick(&mut s, 0.0);
    tick(&mut s, 0.1);
    tick(&mut s, 0.2);
    s.pause(0.2);
    tick(&mut s, 0.3);
    tick(&mut s, 0.35);
    s.play();
    tick(&mut s, 0.4);

    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_pause_while_paused_owes_nothing() {
    let pipeline = Pipeline::new(small_config(DesignType::Bars)).unwrap();
    let mut s = Scheduler::new(pipeline, StaticSource::new(gradient_snapshot()), ManualClock::default());
    s.pause(0.0);
    assert!(s.step(1.0).is_none());
}

#[test]
fn test_run_frame_indices_strictly_increase() {
    let mut s = scheduler(DesignType::CircularRadial, gradient_snapshot());
    let mut ticks: ManualTicks = (0..30).map(|i| i as f64 / 30.0).collect();
    let mut seen = Vec::new();

    let rendered = s.run(&mut ticks, |info, canvas| {
        assert_eq!(canvas.width(), 160);
        seen.push(info.frame_index);
        true
    });

    assert_eq!(rendered, 30);
    assert!(seen.windows(2).all(|w| w[1] > w[0]));
    assert_eq!(seen.first(), Some(&0));
}

#[test]
fn test_run_stops_when_callback_declines() {
    let mut s = scheduler(DesignType::Bars, gradient_snapshot());
    let mut ticks: ManualTicks = (0..10).map(|i| i as f64 * 0.1).collect();

    let rendered = s.run(&mut ticks, |info, _| info.frame_index < 3);

    assert_eq!(rendered, 4);
    assert_eq!(ticks.len(), 6);
}

#[test]
fn test_particles_fade_once_audio_goes_quiet() {
    let mut s = scheduler(DesignType::Particles, beat_snapshot());
    let now = run_frames(&mut s, 0.0, 10);
    assert!(!s.pipeline().particles().is_empty());

    s.source_mut().set(uniform_snapshot(0));
    let max_opacity = |s: &TestScheduler| {
        s.pipeline()
            .particles()
            .particles()
            .iter()
            .map(|p| p.opacity)
            .fold(0.0f32, f32::max)
    };

    let mut previous = max_opacity(&s);
    let mut now = now;
    for _ in 0..80 {
        s.step(now);
        now += 1.0 / 60.0;
        let current = max_opacity(&s);
        assert!(current <= previous + 1e-6);
        previous = current;
    }
    assert!(s.pipeline().particles().is_empty());
}

#[test]
fn test_snapshot_length_is_fixed_per_session() {
    let mut s = scheduler(DesignType::Bars, gradient_snapshot());
    assert!(s.step(0.0).unwrap().dispatched);
    assert_eq!(s.pipeline().snapshot_len(), Some(BINS));

    s.source_mut().set(vec![200; BINS / 2]);
    let info = s.step(0.1).unwrap();
    assert!(!info.dispatched);

    s.source_mut().set(gradient_snapshot());
    assert!(s.step(0.2).unwrap().dispatched);
}

#[test]
fn test_transition_reported_in_frame_info() {
    let mut s = scheduler(DesignType::Bars, gradient_snapshot());
    assert!(s
        .pipeline_mut()
        .start_transition(spectra_canvas::TransitionKind::Fade, 0.0));

    let info = s.step(0.5).unwrap();
    let frame = info.transition.expect("transition running");
    assert!((frame.raw - 0.5).abs() < 1e-6);

    s.step(1.0);
    assert!(s.step(1.1).unwrap().transition.is_none());
}
