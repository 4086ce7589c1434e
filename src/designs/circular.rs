//! Circular visualization designs.

use std::f32::consts::{PI, TAU};

use super::shaping::{amplitude, bands, glow, range_mean};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::render::Canvas;

const RADIAL_BARS: usize = 96;
const RING_POINTS: usize = 128;

/// Bars emanating outward from a pulsing core.
///
/// One half of the circle is computed from the spectrum; the other half is
/// its mirror image about the vertical axis.
pub struct CircularRadialDesign;

impl Design for CircularRadialDesign {
    fn design_type(&self) -> DesignType {
        DesignType::CircularRadial
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (cx, cy) = params.center();
        let min_dim = params.min_dim();
        let bass = amplitude(range_mean(signal, 0.0, 0.1), 1.5, params.sensitivity);
        let inner = min_dim * (0.16 + bass * 0.04);
        let max_len = min_dim * 0.3;

        let half = RADIAL_BARS / 2;
        let values = bands(signal, half);
        let step = PI / half as f32;
        let bar_width = (TAU * inner / RADIAL_BARS as f32 * 0.6).max(1.0);

        canvas.set_glow(glow(params.palette.primary, params.beat));
        canvas.fill_circle(cx, cy, inner * 0.92, params.palette.background_glow.fade(0.8));
        for (i, &value) in values.iter().enumerate() {
            let amp = amplitude(value, 2.0, params.sensitivity);
            let len = (amp * max_len).max(2.0);
            let color = params.palette.element_color(i, half, amp, params.beat);
            // Start at the top and sweep both ways.
            let offset = (i as f32 + 0.5) * step;
            for angle in [-PI / 2.0 + offset, -PI / 2.0 - offset] {
                let (dx, dy) = (angle.cos(), angle.sin());
                canvas.line(
                    cx + dx * inner,
                    cy + dy * inner,
                    cx + dx * (inner + len),
                    cy + dy * (inner + len),
                    bar_width,
                    color,
                );
            }
        }
        canvas.set_glow(None);
        canvas.stroke_circle(cx, cy, inner, 2.0, params.palette.accent);
    }
}

/// Two closed rings whose radius follows the spectrum.
///
/// The inner ring samples the frequency range reversed for contrast.
pub struct CircularRingDesign;

impl Design for CircularRingDesign {
    fn design_type(&self) -> DesignType {
        DesignType::CircularRing
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (cx, cy) = params.center();
        let min_dim = params.min_dim();
        let rotation = params.frame_index as f32 * 0.004;
        let half = RING_POINTS / 2;
        let values = bands(signal, half);

        let ring = |base: f32, reach: f32, reversed: bool, spin: f32| -> Vec<(f32, f32)> {
            (0..RING_POINTS)
                .map(|i| {
                    // Mirror around the vertical axis so the ring closes seamlessly.
                    let k = if i < half { i } else { RING_POINTS - 1 - i };
                    let k = if reversed { half - 1 - k } else { k };
                    let amp = amplitude(values[k], 1.8, params.sensitivity);
                    let angle = i as f32 / RING_POINTS as f32 * TAU + spin;
                    let r = base + amp * reach;
                    (cx + angle.cos() * r, cy + angle.sin() * r)
                })
                .collect()
        };

        let outer = ring(min_dim * 0.28, min_dim * 0.16, false, rotation);
        let inner = ring(min_dim * 0.18, min_dim * 0.08, true, -rotation);
        let width = if params.beat { 4.0 } else { 2.5 };

        canvas.set_glow(glow(params.palette.primary, params.beat));
        canvas.fill_polygon(&outer, params.palette.background_glow.fade(0.5));
        canvas.polyline(&outer, width, params.palette.primary, true);
        canvas.set_glow(glow(params.palette.secondary, params.beat));
        canvas.polyline(&inner, width * 0.75, params.palette.secondary, true);
        canvas.set_glow(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::test_support::draw_once;

    #[test]
    fn test_radial_is_mirrored() {
        let signal: Vec<f32> = (0..256).map(|i| ((i * 7) % 256) as f32).collect();
        let out = draw_once(&mut CircularRadialDesign, &signal, 96, 96);
        for (x, y) in [(30u32, 20u32), (25, 40), (35, 70)] {
            let left = out.canvas.pixel(x, y).unwrap();
            let right = out.canvas.pixel(95 - x, y).unwrap();
            assert!((left.r - right.r).abs() < 0.08, "({x},{y})");
            assert!((left.b - right.b).abs() < 0.08, "({x},{y})");
        }
    }

    #[test]
    fn test_ring_grows_with_signal() {
        let lit = |signal: &[f32]| {
            let out = draw_once(&mut CircularRingDesign, signal, 100, 100);
            (0..100)
                .filter(|&x| out.canvas.pixel(x, 50).map(|c| c.g + c.b > 0.3).unwrap_or(false))
                .min()
                .unwrap_or(50)
        };
        // The loud ring reaches further left.
        assert!(lit(&vec![255.0; 64]) < lit(&vec![0.0; 64]));
    }
}
