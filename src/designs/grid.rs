//! Grid designs laid out across the full canvas.

use super::shaping::{amplitude, bands, glow};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::render::{Canvas, Rgba};

const LED_COLUMNS: usize = 32;
const LED_ROWS: usize = 18;
/// Rows a peak marker falls per frame.
const PEAK_FALL: f32 = 0.15;

/// LED bar-graph with peak-hold markers.
pub struct LedMatrixDesign {
    /// Peak height per column, in rows.
    peaks: Vec<f32>,
}

impl LedMatrixDesign {
    pub fn new() -> Self {
        Self {
            peaks: vec![0.0; LED_COLUMNS],
        }
    }

    fn row_color(params: &VisualizationParams, row: usize) -> Rgba {
        let t = row as f32 / LED_ROWS as f32;
        if t < 0.6 {
            params.palette.primary
        } else if t < 0.85 {
            params.palette.secondary
        } else {
            params.palette.accent
        }
    }
}

impl Default for LedMatrixDesign {
    fn default() -> Self {
        Self::new()
    }
}

impl Design for LedMatrixDesign {
    fn design_type(&self) -> DesignType {
        DesignType::LedMatrix
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (width, height) = params.size();
        let cell_w = width / LED_COLUMNS as f32;
        let cell_h = height / LED_ROWS as f32;
        let pad = (cell_w.min(cell_h) * 0.15).max(0.5);
        let values = bands(signal, LED_COLUMNS);
        let unlit = params.palette.background_glow.fade(0.35);

        for (col, &value) in values.iter().enumerate() {
            let amp = amplitude(value, 1.6, params.sensitivity).min(1.0);
            let lit = (amp * LED_ROWS as f32).round() as usize;
            let peak = &mut self.peaks[col];
            *peak = (*peak - PEAK_FALL).max(lit as f32);
            let peak_row = peak.ceil() as usize;

            let x = col as f32 * cell_w + pad;
            for row in 0..LED_ROWS {
                let y = height - (row as f32 + 1.0) * cell_h + pad;
                let color = if row < lit {
                    Self::row_color(params, row)
                } else if peak_row > 0 && row == peak_row - 1 {
                    Rgba::WHITE
                } else {
                    unlit
                };
                canvas.fill_rect(x, y, cell_w - pad * 2.0, cell_h - pad * 2.0, color);
            }
        }
    }

    fn retained_frames(&self) -> u32 {
        let highest = self.peaks.iter().copied().fold(0.0f32, f32::max);
        (highest / PEAK_FALL).ceil() as u32
    }
}

const DOT_COLUMNS: usize = 24;

/// Grid of dots; each column follows its band, fading toward the top and bottom.
pub struct DotGridDesign;

impl Design for DotGridDesign {
    fn design_type(&self) -> DesignType {
        DesignType::DotGrid
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (width, height) = params.size();
        let cell = width / DOT_COLUMNS as f32;
        let rows = ((height / cell) as usize).max(1);
        let y_offset = (height - rows as f32 * cell) * 0.5;
        let values = bands(signal, DOT_COLUMNS);
        let mid = (rows as f32 - 1.0) * 0.5;

        canvas.set_glow(if params.beat {
            glow(params.palette.accent, true)
        } else {
            None
        });
        for (col, &value) in values.iter().enumerate() {
            let amp = amplitude(value, 2.0, params.sensitivity);
            let color = params.palette.element_color(col, DOT_COLUMNS, amp, params.beat);
            for row in 0..rows {
                let falloff = if mid > 0.0 {
                    1.0 - (row as f32 - mid).abs() / (mid + 1.0)
                } else {
                    1.0
                };
                let scale = (amp * falloff).min(1.0);
                let radius = 1.0 + scale * cell * 0.42;
                canvas.fill_circle(
                    (col as f32 + 0.5) * cell,
                    y_offset + (row as f32 + 0.5) * cell,
                    radius,
                    color.fade(0.35 + scale * 0.65),
                );
            }
        }
        canvas.set_glow(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::test_support::draw_once;

    #[test]
    fn test_led_peak_holds_then_falls() {
        let mut design = LedMatrixDesign::new();
        draw_once(&mut design, &vec![255.0; 64], 64, 36);
        assert_eq!(design.peaks[0], LED_ROWS as f32);
        let held = design.retained_frames();
        assert!(held > 0);

        draw_once(&mut design, &vec![0.0; 64], 64, 36);
        assert!((design.peaks[0] - (LED_ROWS as f32 - PEAK_FALL)).abs() < 1e-4);
        assert!(design.retained_frames() < held);
    }

    #[test]
    fn test_led_quiet_holds_nothing() {
        let mut design = LedMatrixDesign::new();
        draw_once(&mut design, &vec![0.0; 64], 64, 36);
        assert_eq!(design.retained_frames(), 0);
    }
}
