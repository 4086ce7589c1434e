//! Geometric designs: pulse rings, phyllotaxis spiral and tunnel.

use std::f32::consts::TAU;

use super::shaping::{amplitude, bands, glow, range_mean};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::effects::Shockwave;
use crate::render::Canvas;

const RINGS: usize = 8;

/// Concentric rings, one per band, with a shockwave on every beat.
pub struct PulseRingsDesign;

impl Design for PulseRingsDesign {
    fn design_type(&self) -> DesignType {
        DesignType::PulseRings
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        fx: &mut EffectContext<'_>,
    ) {
        let (cx, cy) = params.center();
        let spacing = params.min_dim() * 0.45 / RINGS as f32;
        let values = bands(signal, RINGS);

        canvas.set_glow(glow(params.palette.primary, params.beat));
        for (k, &value) in values.iter().enumerate() {
            let amp = amplitude(value, 1.8, params.sensitivity);
            let radius = spacing * (k as f32 + 1.0) + amp * spacing * 0.8;
            let color = params.palette.element_color(k, RINGS, amp, params.beat);
            canvas.stroke_circle(cx, cy, radius, 1.0 + amp * 6.0, color.fade(0.4 + amp * 0.6));
        }
        canvas.set_glow(None);

        if params.beat {
            fx.particles.spawn_shockwave(Shockwave::new(
                cx,
                cy,
                spacing,
                8.0,
                params.palette.accent,
            ));
        }
    }
}

const SPIRAL_DOTS: usize = 240;
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Phyllotaxis spiral; inner dots follow the bass, outer dots the treble.
pub struct SpiralDesign;

impl Design for SpiralDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Spiral
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (cx, cy) = params.center();
        let reach = params.min_dim() * 0.46;
        let spin = params.time as f32 * 0.4;
        let band_count = 48;
        let values = bands(signal, band_count);

        canvas.set_glow(if params.beat {
            glow(params.palette.accent, true)
        } else {
            None
        });
        for i in 0..SPIRAL_DOTS {
            let t = i as f32 / SPIRAL_DOTS as f32;
            let band = (t * band_count as f32) as usize;
            let amp = amplitude(values[band.min(band_count - 1)], 2.0, params.sensitivity);
            let angle = i as f32 * GOLDEN_ANGLE + spin;
            let r = t.sqrt() * reach * (1.0 + amp * 0.08);
            let color = params.palette.element_color(band, band_count, amp, params.beat);
            canvas.fill_circle(cx + angle.cos() * r, cy + angle.sin() * r, 1.0 + amp * 5.0, color);
        }
        canvas.set_glow(None);
    }
}

const TUNNEL_LAYERS: usize = 14;
const TUNNEL_SIDES: usize = 6;

/// Hexagons flying toward the viewer; each layer's stroke follows a band.
pub struct TunnelDesign;

impl TunnelDesign {
    fn polygon(cx: f32, cy: f32, radius: f32, rotation: f32) -> Vec<(f32, f32)> {
        (0..TUNNEL_SIDES)
            .map(|s| {
                let a = s as f32 / TUNNEL_SIDES as f32 * TAU + rotation;
                (cx + a.cos() * radius, cy + a.sin() * radius)
            })
            .collect()
    }
}

impl Design for TunnelDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Tunnel
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (cx, cy) = params.center();
        let (width, height) = params.size();
        let max_r = (width * width + height * height).sqrt() * 0.55;
        let values = bands(signal, TUNNEL_LAYERS);
        let bass = amplitude(range_mean(signal, 0.0, 0.1), 1.5, params.sensitivity);
        let phase = (params.time as f32 * 0.35).fract();
        let time = params.time as f32;

        // Far layers first so near layers draw over them.
        for k in (0..TUNNEL_LAYERS).rev() {
            let z = (TUNNEL_LAYERS - 1 - k) as f32 / TUNNEL_LAYERS as f32;
            let depth = ((z + phase / TUNNEL_LAYERS as f32) * (1.0 + bass * 0.05)).min(1.0);
            let radius = depth * depth * max_r;
            if radius < 1.0 {
                continue;
            }
            let amp = amplitude(values[k], 2.0, params.sensitivity);
            let rotation = depth * 1.2 + time * 0.2;
            let color = params.palette.element_color(k, TUNNEL_LAYERS, amp, params.beat);
            canvas.polyline(
                &Self::polygon(cx, cy, radius, rotation),
                (1.0 + amp * 8.0) * depth.max(0.2),
                color.fade(0.3 + depth * 0.7),
                true,
            );
        }
        canvas.fill_circle(cx, cy, max_r * 0.02 + bass * 6.0, params.palette.accent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designs::test_support::{draw_with, params};

    #[test]
    fn test_pulse_rings_shockwave_only_on_beat() {
        let signal = vec![255.0; 64];
        let calm = draw_with(&mut PulseRingsDesign, &signal, &params(80, 80, false));
        assert!(calm.particles.shockwaves().is_empty());
        let beat = draw_with(&mut PulseRingsDesign, &signal, &params(80, 80, true));
        assert_eq!(beat.particles.shockwaves().len(), 1);
    }

    #[test]
    fn test_tunnel_polygon_is_closed_hexagon() {
        let points = TunnelDesign::polygon(0.0, 0.0, 10.0, 0.0);
        assert_eq!(points.len(), TUNNEL_SIDES);
        assert!((points[0].0 - 10.0).abs() < 1e-5);
        for (x, y) in points {
            assert!(((x * x + y * y).sqrt() - 10.0).abs() < 1e-4);
        }
    }
}
