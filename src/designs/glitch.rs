//! Glitch family: self-referential pixel displacement and ghost frames.
//!
//! Every copy of the surface onto itself goes through
//! `Canvas::copy_region`, which double-buffers the source region. Copy
//! failures (regions clipped away entirely) are ignored and the frame
//! carries on without that slice.

use rand::Rng;
use resvg::tiny_skia::{BlendMode, Pixmap};

use super::{
    BarsDesign, Design, DesignType, EffectContext, SpectrumMountainDesign, VisualizationParams,
};
use crate::render::Canvas;

/// Chance that a beat frame tears the image.
const TEAR_CHANCE: f64 = 0.6;
/// Chance that a beat frame captures a new ghost frame.
pub const CAPTURE_CHANCE: f64 = 0.5;
/// Frames a data-mosh ghost stays on screen.
pub const MOSH_LIFETIME: u32 = 24;

/// A captured frame blended back into later frames with decreasing opacity.
#[derive(Default)]
pub struct GhostFrame {
    frame: Option<Pixmap>,
    remaining: u32,
    lifetime: u32,
}

impl GhostFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the canvas; it will be blended for `lifetime` frames.
    pub fn capture(&mut self, canvas: &Canvas, lifetime: u32) {
        self.frame = Some(canvas.snapshot());
        self.remaining = lifetime;
        self.lifetime = lifetime.max(1);
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0 && self.frame.is_some()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Frames elapsed since capture.
    pub fn age(&self) -> u32 {
        self.lifetime.saturating_sub(self.remaining)
    }

    /// Blend the ghost at an offset, then count the frame down.
    pub fn blend(&mut self, canvas: &mut Canvas, dx: i32, dy: i32, max_opacity: f32) {
        if !self.is_active() {
            return;
        }
        if let Some(frame) = &self.frame {
            let opacity = max_opacity * self.remaining as f32 / self.lifetime as f32;
            canvas.draw_layer(frame, dx, dy, opacity, BlendMode::SourceOver);
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.frame = None;
        }
    }
}

/// Tear horizontal slices sideways by a random offset.
pub(crate) fn tear_slices<R: Rng + ?Sized>(canvas: &mut Canvas, rng: &mut R, count: usize) {
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    if w < 2 || h < 2 {
        return;
    }
    for _ in 0..count {
        let y = rng.random_range(0..h);
        let slice = rng.random_range(1..=(h / 12).max(1));
        let shift = (w / 12).max(1);
        let dx = rng.random_range(-shift..=shift);
        canvas.copy_region(0, y, w, slice, dx, 0).ok();
    }
}

/// Spectrum bars torn apart by slice displacement and chroma offsets on beats.
pub struct GlitchDesign;

impl Design for GlitchDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Glitch
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        fx: &mut EffectContext<'_>,
    ) {
        BarsDesign.draw(canvas, signal, params, fx);

        if !params.beat || !fx.rng.random_bool(TEAR_CHANCE) {
            return;
        }

        let slices = fx.rng.random_range(3..8);
        tear_slices(canvas, fx.rng, slices);

        // Block corruption: copy random tiles to random places.
        let (w, h) = (canvas.width() as i32, canvas.height() as i32);
        let block = (w.min(h) / 10).max(2);
        for _ in 0..fx.rng.random_range(2..5) {
            let (sx, sy) = (fx.rng.random_range(0..w), fx.rng.random_range(0..h));
            let (dx, dy) = (
                fx.rng.random_range(-block * 2..=block * 2),
                fx.rng.random_range(-block..=block),
            );
            canvas.copy_region(sx, sy, block * 2, block, dx, dy).ok();
        }

        // Additive chroma offset of the torn frame.
        let frame = canvas.snapshot();
        let offset = fx.rng.random_range(2..6);
        canvas.draw_layer(&frame, offset, 0, 0.25, BlendMode::Plus);
    }
}

/// Mountain spectrum smeared by ghost frames captured on beats.
pub struct DataMoshDesign {
    ghost: GhostFrame,
}

impl DataMoshDesign {
    pub fn new() -> Self {
        Self {
            ghost: GhostFrame::new(),
        }
    }
}

impl Default for DataMoshDesign {
    fn default() -> Self {
        Self::new()
    }
}

impl Design for DataMoshDesign {
    fn design_type(&self) -> DesignType {
        DesignType::DataMosh
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        fx: &mut EffectContext<'_>,
    ) {
        SpectrumMountainDesign.draw(canvas, signal, params, fx);

        if self.ghost.is_active() {
            let drift = self.ghost.age() as i32;
            let jitter = fx.rng.random_range(-4..=4);
            self.ghost.blend(canvas, drift + jitter, -drift / 2, 0.6);
            tear_slices(canvas, fx.rng, 1);
        } else if params.beat && fx.rng.random_bool(CAPTURE_CHANCE) {
            self.ghost.capture(canvas, MOSH_LIFETIME);
        }
    }

    fn retained_frames(&self) -> u32 {
        self.ghost.remaining()
    }
}
