//! Filled-polygon spectrum design.

use super::shaping::{amplitude, bands, glow};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::render::Canvas;

const HALF_POINTS: usize = 48;

/// Mirrored mountain silhouette with bass in the middle.
///
/// A taller, fainter range is drawn behind using the secondary colour.
pub struct SpectrumMountainDesign;

impl SpectrumMountainDesign {
    fn outline(heights: &[f32], width: f32, baseline: f32) -> Vec<(f32, f32)> {
        let n = heights.len();
        let cx = width * 0.5;
        let step = cx / (n.max(2) - 1) as f32;
        let mut points = Vec::with_capacity(n * 2 + 2);
        points.push((0.0, baseline));
        // Left half runs treble → bass, right half bass → treble.
        for (i, h) in heights.iter().enumerate().rev() {
            points.push((cx - i as f32 * step, baseline - h));
        }
        for (i, h) in heights.iter().enumerate().skip(1) {
            points.push((cx + i as f32 * step, baseline - h));
        }
        points.push((width, baseline));
        points
    }
}

impl Design for SpectrumMountainDesign {
    fn design_type(&self) -> DesignType {
        DesignType::SpectrumMountain
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (width, height) = params.size();
        let baseline = height * 0.85;
        let values = bands(signal, HALF_POINTS);

        // Light neighbour blending keeps the ridge from looking jagged.
        let raw: Vec<f32> = values
            .iter()
            .map(|&v| amplitude(v, 1.7, params.sensitivity) * height * 0.6)
            .collect();
        let heights: Vec<f32> = (0..raw.len())
            .map(|i| {
                let prev = raw[i.saturating_sub(1)];
                let next = raw[(i + 1).min(raw.len() - 1)];
                (prev + raw[i] * 2.0 + next) * 0.25
            })
            .collect();

        let back: Vec<f32> = heights.iter().map(|h| h * 1.2).collect();
        let back_outline = Self::outline(&back, width, baseline);
        canvas.fill_polygon(&back_outline, params.palette.secondary.fade(0.35));

        let front = Self::outline(&heights, width, baseline);
        canvas.set_glow(glow(params.palette.primary, params.beat));
        canvas.fill_polygon(&front, params.palette.primary.fade(0.65));
        canvas.set_glow(None);
        canvas.polyline(&front[1..front.len() - 1], 2.0, params.palette.accent, false);
        canvas.fill_rect(0.0, baseline, width, height - baseline, params.palette.background_glow);
    }
}
