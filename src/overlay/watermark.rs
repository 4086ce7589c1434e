//! Custom watermark text.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{draw_styled_text, TextEffects};
use crate::render::{Canvas, Rgba, TextAlign, TextRenderer, TextStyle};

/// Distance of corner anchors from the edges, as a fraction of the smaller dimension.
const EDGE_MARGIN: f32 = 0.04;
/// Extra font size at full bass energy.
const BASS_PULSE: f32 = 0.12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl WatermarkAnchor {
    fn align(self) -> TextAlign {
        match self {
            Self::TopLeft | Self::BottomLeft => TextAlign::Start,
            Self::TopRight | Self::BottomRight => TextAlign::End,
            Self::Center => TextAlign::Middle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Empty text disables the watermark.
    pub text: String,
    pub color: Rgba,
    pub font_family: String,
    pub font_size: f32,
    pub anchor: WatermarkAnchor,
    /// Horizontal offset from the anchor, percent of width.
    pub offset_x: f32,
    /// Vertical offset from the anchor, percent of height.
    pub offset_y: f32,
    pub glow: bool,
    pub glitch: bool,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Rgba::WHITE.with_alpha(0.8),
            font_family: "sans-serif".to_string(),
            font_size: 28.0,
            anchor: WatermarkAnchor::default(),
            offset_x: 0.0,
            offset_y: 0.0,
            glow: false,
            glitch: false,
        }
    }
}

impl WatermarkConfig {
    pub fn is_enabled(&self) -> bool {
        !self.text.trim().is_empty() && self.font_size > 0.0
    }

    /// Anchor point in canvas pixels, after percentage offsets.
    pub fn position(&self, width: f32, height: f32) -> (f32, f32) {
        let margin = width.min(height) * EDGE_MARGIN;
        let half_line = self.font_size * 0.5;
        let (x, y) = match self.anchor {
            WatermarkAnchor::TopLeft => (margin, margin + half_line),
            WatermarkAnchor::TopRight => (width - margin, margin + half_line),
            WatermarkAnchor::BottomLeft => (margin, height - margin - half_line),
            WatermarkAnchor::BottomRight => (width - margin, height - margin - half_line),
            WatermarkAnchor::Center => (width * 0.5, height * 0.5),
        };
        (
            x + self.offset_x / 100.0 * width,
            y + self.offset_y / 100.0 * height,
        )
    }

    /// Font size pulsed by bass energy in `0..=1`.
    pub fn pulsed_size(&self, bass_energy: f32) -> f32 {
        self.font_size * (1.0 + bass_energy.clamp(0.0, 1.0) * BASS_PULSE)
    }
}

pub(crate) fn draw_watermark<R: Rng + ?Sized>(
    canvas: &mut Canvas,
    renderer: &TextRenderer,
    config: &WatermarkConfig,
    bass_energy: f32,
    beat: bool,
    rng: &mut R,
) {
    if !config.is_enabled() {
        return;
    }
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let style = TextStyle {
        font_family: config.font_family.clone(),
        font_size: config.pulsed_size(bass_energy),
        bold: true,
        color: config.color,
        align: config.anchor.align(),
        blur: 0.0,
    };
    let effects = TextEffects {
        glow: config.glow,
        glitch: config.glitch,
        plate: None,
    };
    draw_styled_text(
        canvas,
        renderer,
        &config.text,
        &style,
        config.position(w, h),
        &effects,
        beat,
        rng,
    );
}
