//! Traditional bar designs.

use super::shaping::{amplitude, bands, glow};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::render::Canvas;

const BAR_COUNT: usize = 64;
const GAP_RATIO: f32 = 0.2;
/// Bars never collapse below this height so the layout stays visible in silence.
pub const MIN_BAR_HEIGHT: f32 = 2.0;

/// Vertical bars rising from the bottom edge.
pub struct BarsDesign;

impl Design for BarsDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Bars
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (width, height) = params.size();
        let values = bands(signal, BAR_COUNT);
        let bar_width = width / BAR_COUNT as f32;
        let gap = bar_width * GAP_RATIO;

        canvas.set_glow(glow(params.palette.accent, params.beat));
        for (i, &value) in values.iter().enumerate() {
            let amp = amplitude(value, 2.0, params.sensitivity);
            let bar_height = (amp * height * 0.75).max(MIN_BAR_HEIGHT);
            let color = params.palette.element_color(i, BAR_COUNT, amp, params.beat);
            canvas.fill_rect(
                i as f32 * bar_width + gap * 0.5,
                height - bar_height,
                bar_width - gap,
                bar_height,
                color,
            );
        }
        canvas.set_glow(None);
    }
}

/// Bars grown from the centre line, mirrored left-right and up-down.
///
/// Bass sits in the middle of the screen; each mirrored bar reuses the
/// amplitude computed for its twin.
pub struct MirrorBarsDesign;

impl Design for MirrorBarsDesign {
    fn design_type(&self) -> DesignType {
        DesignType::MirrorBars
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (width, height) = params.size();
        let (cx, cy) = params.center();
        let half = BAR_COUNT / 2;
        let values = bands(signal, half);
        let bar_width = width / BAR_COUNT as f32;
        let gap = bar_width * GAP_RATIO;

        canvas.set_glow(glow(params.palette.primary, params.beat));
        for (i, &value) in values.iter().enumerate() {
            let amp = amplitude(value, 1.8, params.sensitivity);
            let extent = (amp * height * 0.4).max(MIN_BAR_HEIGHT * 0.5);
            let color = params.palette.element_color(i, half, amp, params.beat);
            let offset = i as f32 * bar_width + gap * 0.5;
            for x in [cx + offset, cx - offset - bar_width + gap] {
                canvas.fill_rect(x, cy - extent, bar_width - gap, extent * 2.0, color);
            }
        }
        canvas.set_glow(None);
    }
}
