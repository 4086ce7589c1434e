//! Spectrogram visualization design.
//!
//! Displays a time-frequency representation where:
//! - X-axis represents time (scrolling left, newest on right)
//! - Y-axis represents frequency (low at bottom, high at top)
//! - Colour represents magnitude at that time-frequency point

use std::collections::VecDeque;

use resvg::tiny_skia::{Pixmap, PremultipliedColorU8, Transform};

use super::shaping::{amplitude, bands};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::render::{Canvas, Rgba};

/// Columns of history kept on screen.
pub const HISTORY_COLUMNS: usize = 160;
const FREQUENCY_ROWS: usize = 96;

/// Scrolling spectrogram with its own rolling history buffer.
pub struct SpectrogramDesign {
    /// Oldest column at the front.
    history: VecDeque<Vec<f32>>,
}

impl Default for SpectrogramDesign {
    fn default() -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_COLUMNS),
        }
    }
}

impl SpectrogramDesign {
    pub fn new() -> Self {
        Self::default()
    }

    fn heat(params: &VisualizationParams, amp: f32) -> Rgba {
        let palette = &params.palette;
        if amp < 0.5 {
            palette.background_glow.lerp(palette.primary, amp * 2.0)
        } else {
            palette.primary.lerp(palette.accent, (amp - 0.5) * 2.0)
        }
    }

    fn render_history(&self, params: &VisualizationParams) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(HISTORY_COLUMNS as u32, FREQUENCY_ROWS as u32)?;
        // Newest column on the right; a partial history is right-aligned.
        let start = HISTORY_COLUMNS - self.history.len();
        let stride = HISTORY_COLUMNS;
        let pixels = pixmap.pixels_mut();
        for (offset, column) in self.history.iter().enumerate() {
            let x = start + offset;
            for (band, &amp) in column.iter().enumerate() {
                let y = FREQUENCY_ROWS - 1 - band;
                let [r, g, b, _] = Self::heat(params, amp).to_rgba8();
                if let Some(px) = PremultipliedColorU8::from_rgba(r, g, b, 255) {
                    pixels[y * stride + x] = px;
                }
            }
        }
        Some(pixmap)
    }
}

impl Design for SpectrogramDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Spectrogram
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let column: Vec<f32> = bands(signal, FREQUENCY_ROWS)
            .into_iter()
            .map(|v| amplitude(v, 1.4, params.sensitivity).min(1.0))
            .collect();
        self.history.push_back(column);
        while self.history.len() > HISTORY_COLUMNS {
            self.history.pop_front();
        }

        let Some(layer) = self.render_history(params) else {
            return;
        };
        let (width, height) = params.size();
        let transform = Transform::from_scale(
            width / HISTORY_COLUMNS as f32,
            height / FREQUENCY_ROWS as f32,
        );
        canvas.draw_layer_transformed(&layer, transform, 1.0, false);
    }

    fn retained_frames(&self) -> u32 {
        self.history.len() as u32
    }
}
