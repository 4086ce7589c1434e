//! Text overlays drawn on top of the finished frame.
//!
//! This module provides:
//! - Subtitle / lyric tracks (LRC parsing, classic and scroll layouts)
//! - A watermark pinned to one of five anchors
//! - The shared styled-text pass: background plate, glow, beat-gated
//!   chromatic glitch
//!
//! Overlays hold no per-frame state; everything they need arrives in an
//! [`OverlayFrame`].

pub mod subtitles;
pub mod watermark;

pub use subtitles::{LineRole, Subtitle, SubtitleMode, SubtitleStyle, SubtitleTrack};
pub use watermark::{WatermarkAnchor, WatermarkConfig};

use rand::Rng;
use resvg::tiny_skia::BlendMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{Canvas, Rgba, TextBounds, TextRenderer, TextStyle};

/// Padding around text inside its background plate, as a fraction of font size.
const PLATE_PADDING: f32 = 0.35;
/// Largest chromatic offset in pixels.
const GLITCH_OFFSET: f32 = 6.0;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("failed to read subtitle file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("subtitle file contains no timed lines")]
    NoTimedLines,
}

/// Decorations applied around one line of text.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TextEffects {
    pub glow: bool,
    pub glitch: bool,
    pub plate: Option<Rgba>,
}

/// Rasterize one line and composite it with its decorations.
///
/// Returns the bounds of the main text, or `None` when nothing rasterized.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_styled_text<R: Rng + ?Sized>(
    canvas: &mut Canvas,
    renderer: &TextRenderer,
    text: &str,
    style: &TextStyle,
    anchor: (f32, f32),
    effects: &TextEffects,
    beat: bool,
    rng: &mut R,
) -> Option<TextBounds> {
    let size = (canvas.width(), canvas.height());
    let main = renderer.rasterize(text, style, anchor, size)?;
    let bounds = main.bounds;

    if let Some(plate) = effects.plate {
        let pad = style.font_size * PLATE_PADDING;
        canvas.fill_device_rect(
            bounds.x - pad,
            bounds.y - pad * 0.5,
            bounds.width + pad * 2.0,
            bounds.height + pad,
            plate,
        );
    }

    if effects.glow {
        let glow_style = TextStyle {
            blur: style.font_size * 0.25,
            ..style.clone()
        };
        if let Some(glow) = renderer.rasterize(text, &glow_style, anchor, size) {
            canvas.draw_layer(&glow.pixmap, 0, 0, 0.9, BlendMode::Plus);
        }
    }

    if effects.glitch && beat {
        let channels = [Rgba::rgb(1.0, 0.1, 0.2), Rgba::rgb(0.1, 0.9, 1.0)];
        for color in channels {
            let tinted = TextStyle {
                color: color.with_alpha(style.color.a),
                ..style.clone()
            };
            let dx = rng.random_range(-GLITCH_OFFSET..=GLITCH_OFFSET).round() as i32;
            let dy = rng.random_range(-GLITCH_OFFSET * 0.5..=GLITCH_OFFSET * 0.5).round() as i32;
            if let Some(layer) = renderer.rasterize(text, &tinted, anchor, size) {
                canvas.draw_layer(&layer.pixmap, dx, dy, 0.7, BlendMode::Plus);
            }
        }
    }

    canvas.draw_layer(&main.pixmap, 0, 0, 1.0, BlendMode::SourceOver);
    Some(bounds)
}

/// Overlay settings carried in the visualizer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub subtitle_mode: SubtitleMode,
    pub subtitle_style: SubtitleStyle,
    pub watermark: WatermarkConfig,
}

/// Per-frame inputs for the overlay pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayFrame {
    /// Playback time in seconds.
    pub time: f64,
    pub beat: bool,
    /// Bass energy in `0..=1`.
    pub bass_energy: f32,
}

/// Draws subtitles and the watermark using a shared font database.
#[derive(Clone, Default)]
pub struct OverlayRenderer {
    text: TextRenderer,
}

impl OverlayRenderer {
    pub fn new(text: TextRenderer) -> Self {
        Self { text }
    }

    pub fn text_renderer(&self) -> &TextRenderer {
        &self.text
    }

    pub fn draw<R: Rng + ?Sized>(
        &self,
        canvas: &mut Canvas,
        config: &OverlayConfig,
        track: Option<&SubtitleTrack>,
        frame: &OverlayFrame,
        rng: &mut R,
    ) {
        canvas.reset_state();
        if let Some(track) = track {
            match config.subtitle_mode {
                SubtitleMode::Off => {}
                SubtitleMode::Classic => subtitles::draw_classic(
                    canvas,
                    &self.text,
                    track,
                    &config.subtitle_style,
                    frame.time,
                    frame.beat,
                    rng,
                ),
                SubtitleMode::Scroll => subtitles::draw_scroll(
                    canvas,
                    &self.text,
                    track,
                    &config.subtitle_style,
                    frame.time,
                    frame.beat,
                    rng,
                ),
            }
        }
        watermark::draw_watermark(
            canvas,
            &self.text,
            &config.watermark,
            frame.bass_energy,
            frame.beat,
            rng,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_without_fonts_nothing_is_drawn() {
        let mut canvas = Canvas::new(64, 32).unwrap();
        let before = canvas.pixmap().data().to_vec();
        let track = SubtitleTrack::parse_lrc("[00:00.00]hello").unwrap();
        let config = OverlayConfig {
            watermark: WatermarkConfig {
                text: "mark".into(),
                ..WatermarkConfig::default()
            },
            ..OverlayConfig::default()
        };
        let frame = OverlayFrame {
            time: 1.0,
            beat: true,
            bass_energy: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(1);
        OverlayRenderer::default().draw(&mut canvas, &config, Some(&track), &frame, &mut rng);
        assert_eq!(canvas.pixmap().data(), &before[..]);
    }

    #[test]
    fn test_styled_text_returns_none_for_empty_text() {
        let mut canvas = Canvas::new(16, 16).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = draw_styled_text(
            &mut canvas,
            &TextRenderer::empty(),
            "   ",
            &TextStyle::default(),
            (8.0, 8.0),
            &TextEffects::default(),
            false,
            &mut rng,
        );
        assert!(bounds.is_none());
    }

    #[test]
    fn test_config_deserializes_kebab_case() {
        let config: OverlayConfig = serde_json::from_str(
            r#"{ "subtitle_mode": "scroll", "watermark": { "anchor": "top-left", "text": "x" } }"#,
        )
        .unwrap();
        assert_eq!(config.subtitle_mode, SubtitleMode::Scroll);
        assert_eq!(config.watermark.anchor, WatermarkAnchor::TopLeft);
        assert!(config.watermark.is_enabled());
    }
}
