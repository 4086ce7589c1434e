//! Frame perimeter design: bars along every screen edge.

use super::shaping::{amplitude, bands, glow};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::render::Canvas;

const INSET: f32 = 12.0;
const BAR_THICKNESS: f32 = 6.0;
/// Bars per horizontal edge; vertical edges get a proportional count.
const EDGE_BARS: usize = 48;

/// Inward-pointing bars on all four edges.
///
/// Top and bottom share one set of amplitudes, left and right another, so
/// the frame is symmetric in both axes.
pub struct FramePerimeterDesign;

impl Design for FramePerimeterDesign {
    fn design_type(&self) -> DesignType {
        DesignType::FramePerimeter
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (width, height) = params.size();
        let side_bars = ((EDGE_BARS as f32 * height / width.max(1.0)) as usize).max(4);
        let horizontal = bands(signal, EDGE_BARS);
        let vertical = bands(signal, side_bars);
        let reach = params.min_dim() * 0.22;

        canvas.set_glow(glow(params.palette.accent, params.beat));

        let step = (width * 0.5 - INSET) / EDGE_BARS as f32;
        let thickness = BAR_THICKNESS.min(step * 0.7);
        for (i, &value) in horizontal.iter().enumerate() {
            let amp = amplitude(value, 2.0, params.sensitivity);
            let len = (amp * reach).max(2.0);
            let color = params.palette.element_color(i, EDGE_BARS, amp, params.beat);
            // Bass at the centre of each edge.
            let offset = i as f32 * step;
            for x in [width * 0.5 + offset, width * 0.5 - offset - thickness] {
                canvas.fill_rect(x, INSET, thickness, len, color);
                canvas.fill_rect(x, height - INSET - len, thickness, len, color);
            }
        }

        let step = (height * 0.5 - INSET) / side_bars as f32;
        let thickness = BAR_THICKNESS.min(step * 0.7);
        for (i, &value) in vertical.iter().enumerate() {
            let amp = amplitude(value, 2.0, params.sensitivity);
            let len = (amp * reach).max(2.0);
            let color = params.palette.element_color(i, side_bars, amp, params.beat);
            let offset = i as f32 * step;
            for y in [height * 0.5 + offset, height * 0.5 - offset - thickness] {
                canvas.fill_rect(INSET, y, len, thickness, color);
                canvas.fill_rect(width - INSET - len, y, len, thickness, color);
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
    fn test_frame_leaves_centre_untouched() {
        let out = draw_once(&mut FramePerimeterDesign, &vec![255.0; 128], 200, 120);
        let c = out.canvas.pixel(100, 60).unwrap();
        assert!(c.r < 0.01 && c.g < 0.01 && c.b < 0.01);
        let edge = out.canvas.pixel(100, INSET as u32 + 2).unwrap();
        assert!(edge.r + edge.g + edge.b > 0.3);
    }
}
