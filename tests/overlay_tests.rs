//! Lyric tracks, overlay configuration and overlay drawing in the pipeline.

mod common;

use std::io::Write as _;

use common::*;
use spectra_canvas::audio::StaticSource;
use spectra_canvas::overlay::subtitles::SCROLL_AFTER;
use spectra_canvas::overlay::{LineRole, SubtitleMode};
use spectra_canvas::{
    DesignType, ManualClock, OverlayConfig, Pipeline, Rgba, SubtitleTrack, VisualizerConfig,
    WatermarkAnchor,
};

const LYRICS: &str = "\
[ar:Test Artist]
[ti:Test Song]
[offset:0]

[00:01.00]first line
[00:03.50][00:20.00]chorus
[00:05.25]third line
[00:07.00]
[00:08.00]fourth line
[00:10.00]fifth line
[00:12.00]sixth line
[00:14.00]seventh line
";

fn write_lyrics() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".lrc").tempfile().unwrap();
    file.write_all(LYRICS.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_lrc_from_disk() {
    let file = write_lyrics();
    let track = SubtitleTrack::load_lrc(file.path()).unwrap();

    // Metadata and the empty stamp are dropped; the chorus appears twice.
    assert_eq!(track.len(), 8);
    let times: Vec<f64> = track.lines().iter().map(|l| l.timestamp_seconds).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(track.lines()[1].text, "chorus");
    assert_eq!(track.lines().last().unwrap().text, "chorus");
    assert!((track.lines()[2].timestamp_seconds - 5.25).abs() < 1e-9);
}

#[test]
fn test_missing_lrc_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SubtitleTrack::load_lrc(dir.path().join("absent.lrc")).is_err());
}

#[test]
fn test_classic_mode_follows_the_clock() {
    let track = SubtitleTrack::parse_lrc(LYRICS).unwrap();
    assert!(track.current(0.5).is_none());
    assert_eq!(track.current(1.0).unwrap().text, "first line");
    assert_eq!(track.current(4.0).unwrap().text, "chorus");
    assert_eq!(track.current(19.9).unwrap().text, "seventh line");
    assert_eq!(track.current(60.0).unwrap().text, "chorus");
}

#[test]
fn test_scroll_window_marks_roles() {
    let track = SubtitleTrack::parse_lrc(LYRICS).unwrap();

    let window = track.scroll_window(10.5);
    let current: Vec<usize> = window
        .iter()
        .filter(|(_, role)| *role == LineRole::Current)
        .map(|(i, _)| *i)
        .collect();
    assert_eq!(current, vec![4]);
    assert!(window.iter().all(|(i, role)| match role {
        LineRole::Past => *i < 4,
        LineRole::Current => *i == 4,
        LineRole::Future => *i > 4,
    }));
    assert_eq!(window.last().unwrap().0, track.len() - 1);

    let before = track.scroll_window(0.0);
    assert_eq!(before.len(), SCROLL_AFTER);
    assert!(before.iter().all(|(_, role)| *role == LineRole::Future));
}

#[test]
fn test_overlay_config_from_json() {
    let json = r##"{
        "width": 320,
        "height": 180,
        "overlay": {
            "subtitle_mode": "scroll",
            "subtitle_style": { "font_size": 24, "plate": "#00000080", "glitch": true },
            "watermark": { "text": "live", "anchor": "top-left", "offset_x": 5 }
        }
    }"##;
    let config = VisualizerConfig::from_json_str(json).unwrap();
    let overlay = &config.overlay;

    assert_eq!(overlay.subtitle_mode, SubtitleMode::Scroll);
    assert_eq!(overlay.subtitle_style.font_size, 24.0);
    assert!(overlay.subtitle_style.glitch);
    assert_eq!(overlay.subtitle_style.plate.map(|c| c.a > 0.4 && c.a < 0.6), Some(true));
    assert_eq!(overlay.watermark.anchor, WatermarkAnchor::TopLeft);
    assert!(overlay.watermark.is_enabled());

    let (x, _) = overlay.watermark.position(320.0, 180.0);
    let (base_x, _) = spectra_canvas::WatermarkConfig {
        offset_x: 0.0,
        ..overlay.watermark.clone()
    }
    .position(320.0, 180.0);
    assert!((x - base_x - 16.0).abs() < 1e-4);
}

#[test]
fn test_overlays_without_fonts_leave_the_frame_intact() {
    let mut config = small_config(DesignType::Bars);
    config.background.color = Rgba::rgb(0.2, 0.2, 0.2);
    let mut plain = Pipeline::new(config.clone()).unwrap();

    config.overlay = OverlayConfig {
        subtitle_mode: SubtitleMode::Scroll,
        ..OverlayConfig::default()
    };
    config.overlay.watermark.text = "watermark".to_string();
    config.overlay.watermark.glitch = true;
    let mut decorated = Pipeline::new(config).unwrap();
    decorated.set_subtitles(Some(SubtitleTrack::parse_lrc(LYRICS).unwrap()));

    let clock = ManualClock::new(4.0);
    let mut source = StaticSource::new(uniform_snapshot(0));
    let a = plain.tick(0, 0.0, &mut source, &clock);
    let b = decorated.tick(0, 0.0, &mut source, &clock);

    assert_eq!(a.dispatched, b.dispatched);
    assert_eq!(plain.canvas().pixmap().data(), decorated.canvas().pixmap().data());
}

#[test]
fn test_pipeline_loads_lyrics_file() {
    let file = write_lyrics();
    let mut pipeline = Pipeline::new(small_config(DesignType::WaveformLine)).unwrap();
    assert_eq!(pipeline.load_subtitles(file.path()).unwrap(), 8);

    let missing = file.path().with_extension("missing");
    assert!(pipeline.load_subtitles(missing).is_err());
}
