//! Pixel rain design.

use rand::Rng;

use super::glitch::CAPTURE_CHANCE;
use super::shaping::{amplitude, bands, range_mean};
use super::{Design, DesignType, EffectContext, GhostFrame, VisualizationParams};
use crate::render::{Canvas, Rgba};

const COLUMNS: usize = 48;
const MAX_DROPS: usize = 600;
/// Frames a melting ghost stays on screen.
const MELT_LIFETIME: u32 = 14;
/// Pixels the ghost slides down per frame of age.
const MELT_SPEED: i32 = 3;

#[derive(Debug, Clone, Copy)]
struct Drop {
    column: usize,
    y: f32,
    speed: f32,
    length: f32,
    color: Rgba,
}

/// Falling pixel drops spawned per band, plus a melting ghost on beats.
pub struct PixelRainDesign {
    drops: Vec<Drop>,
    ghost: GhostFrame,
}

impl PixelRainDesign {
    pub fn new() -> Self {
        Self {
            drops: Vec::new(),
            ghost: GhostFrame::new(),
        }
    }
}

impl Default for PixelRainDesign {
    fn default() -> Self {
        Self::new()
    }
}

impl Design for PixelRainDesign {
    fn design_type(&self) -> DesignType {
        DesignType::PixelRain
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        fx: &mut EffectContext<'_>,
    ) {
        let (width, height) = params.size();
        let cell = width / COLUMNS as f32;
        let values = bands(signal, COLUMNS);
        let energy = amplitude(range_mean(signal, 0.0, 0.5), 1.5, params.sensitivity);

        if self.ghost.is_active() {
            let age = self.ghost.age() as i32;
            self.ghost.blend(canvas, 0, age * MELT_SPEED, 0.5);
        }

        for (column, &value) in values.iter().enumerate() {
            let amp = amplitude(value, 2.0, params.sensitivity).min(1.0);
            if self.drops.len() >= MAX_DROPS {
                break;
            }
            if amp > 0.0 && fx.rng.random_bool((amp * 0.35) as f64) {
                self.drops.push(Drop {
                    column,
                    y: 0.0,
                    speed: fx.rng.random_range(2.0..6.0),
                    length: cell * fx.rng.random_range(2.0..8.0),
                    color: params.palette.element_color(column, COLUMNS, amp, params.beat),
                });
            }
        }

        let boost = 1.0 + energy * 2.0;
        for drop in &mut self.drops {
            drop.y += drop.speed * boost;
        }
        self.drops.retain(|d| d.y - d.length <= height);

        for drop in &self.drops {
            let x = drop.column as f32 * cell;
            let segments = 4;
            for s in 0..segments {
                let seg_len = drop.length / segments as f32;
                let alpha = 1.0 - s as f32 / segments as f32;
                canvas.fill_rect(
                    x + 1.0,
                    drop.y - seg_len * (s as f32 + 1.0),
                    cell - 2.0,
                    seg_len,
                    drop.color.fade(alpha * 0.8),
                );
            }
            canvas.fill_rect(x + 1.0, drop.y - cell * 0.5, cell - 2.0, cell * 0.5, Rgba::WHITE);
        }

        if params.beat && !self.ghost.is_active() && fx.rng.random_bool(CAPTURE_CHANCE) {
            self.ghost.capture(canvas, MELT_LIFETIME);
        }
    }

    fn retained_frames(&self) -> u32 {
        self.ghost.remaining().max(self.drops.len() as u32)
    }
}
