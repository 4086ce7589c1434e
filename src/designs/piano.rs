//! Piano keyboard design.

use super::shaping::{amplitude, glow};
use super::{Design, DesignType, EffectContext, VisualizationParams};
use crate::render::{Canvas, Rgba};

/// Keys spanned by the keyboard (A0 to C8).
const KEYS: usize = 88;
/// Semitone offsets within an octave (from A) that are black keys.
const BLACK_IN_OCTAVE: [usize; 5] = [1, 4, 6, 9, 11];

fn is_black(key: usize) -> bool {
    BLACK_IN_OCTAVE.contains(&(key % 12))
}

/// Map key `index` onto a bin; the spectrum is spread logarithmically like pitch.
fn key_bin(index: usize, bins: usize) -> usize {
    if bins == 0 {
        return 0;
    }
    let usable = (bins as f32 * 0.8).max(1.0);
    let t = index as f32 / (KEYS - 1) as f32;
    let bin = (usable.ln() * t).exp() - 1.0;
    (bin as usize).min(bins - 1)
}

/// Piano keyboard along the bottom of the screen; keys light with their pitch band.
pub struct PianoDesign;

impl Design for PianoDesign {
    fn design_type(&self) -> DesignType {
        DesignType::Piano
    }

    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        _fx: &mut EffectContext<'_>,
    ) {
        let (width, height) = params.size();
        let white_count = (0..KEYS).filter(|&k| !is_black(k)).count();
        let white_w = width / white_count as f32;
        let white_h = height * 0.28;
        let top = height - white_h;
        let black_w = white_w * 0.6;
        let black_h = white_h * 0.62;

        let level = |key: usize| -> f32 {
            signal
                .get(key_bin(key, signal.len()))
                .map(|&v| amplitude(v, 1.6, params.sensitivity).min(1.0))
                .unwrap_or(0.0)
        };

        let mut white_index = 0;
        let mut black_keys = Vec::new();
        for key in 0..KEYS {
            if is_black(key) {
                // Black keys straddle the boundary with the previous white key.
                black_keys.push((key, white_index as f32 * white_w - black_w * 0.5));
                continue;
            }
            let amp = level(key);
            let lit = params.palette.element_color(key, KEYS, amp, params.beat);
            let color = Rgba::WHITE.lerp(lit, amp);
            let x = white_index as f32 * white_w;
            canvas.fill_rect(x + 0.5, top, white_w - 1.0, white_h, color);
            if amp > 0.05 {
                // Light bar rising above the key.
                canvas.set_glow(glow(lit, params.beat));
                let rise = amp * top * 0.8;
                canvas.fill_rect(x + 1.0, top - rise, white_w - 2.0, rise, lit.fade(0.7));
                canvas.set_glow(None);
            }
            white_index += 1;
        }

        for (key, x) in black_keys {
            let amp = level(key);
            let lit = params.palette.element_color(key, KEYS, amp, params.beat);
            let color = Rgba::rgb(0.08, 0.08, 0.1).lerp(lit, amp);
            canvas.fill_rect(x, top, black_w, black_h, color);
        }
    }
}
