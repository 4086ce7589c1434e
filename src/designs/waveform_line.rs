//! Oscilloscope-style line design.

use std::f32::consts::TAU;

use super::shaping::{amplitude, bands, glow};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::render::Canvas;

const POINTS: usize = 96;
const LAYERS: usize = 3;

/// Layered oscillating lines whose local amplitude follows each band.
///
/// The lower line is the mirror of the upper one about the centre line.
pub struct WaveformLineDesign;

impl Design for WaveformLineDesign {
    fn design_type(&self) -> DesignType {
        DesignType::WaveformLine
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (width, height) = params.size();
        let mid = height * 0.5;
        let values = bands(signal, POINTS);
        let phase = params.time as f32 * 3.0;

        let offsets: Vec<f32> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let amp = amplitude(v, 1.6, params.sensitivity);
                let carrier = (i as f32 / POINTS as f32 * TAU * 4.0 + phase).sin();
                amp * carrier * height * 0.35
            })
            .collect();

        for layer in 0..LAYERS {
            let scale = 1.0 - layer as f32 * 0.25;
            let color = match layer {
                0 => params.palette.primary,
                1 => params.palette.secondary,
                _ => params.palette.accent,
            }
            .fade(1.0 - layer as f32 * 0.3);
            let line_width = if params.beat { 4.0 } else { 2.5 } * scale;

            let upper: Vec<(f32, f32)> = offsets
                .iter()
                .enumerate()
                .map(|(i, &o)| (i as f32 / (POINTS - 1) as f32 * width, mid - o * scale))
                .collect();
            let lower: Vec<(f32, f32)> = upper.iter().map(|&(x, y)| (x, 2.0 * mid - y)).collect();

            canvas.set_glow(if layer == 0 {
                glow(params.palette.primary, params.beat)
            } else {
                None
            });
            canvas.polyline(&upper, line_width, color, false);
            canvas.polyline(&lower, line_width, color.fade(0.6), false);
        }
        canvas.set_glow(None);
    }
}
