//! Mask routines for each transition kind.
//!
//! Every routine takes eased progress `p` in `[0, 1]`. Closing masks shut
//! over the first part of the cycle, hold the screen fully hidden for
//! `HOLD` either side of `p = 0.5`, then reopen. Peaking masks (fade, wave,
//! spiral, static) hide everything once `p` reaches `PEAK_COVER`.

use std::f32::consts::TAU;

use rand::Rng;
use resvg::tiny_skia::{Pixmap, PremultipliedColorU8, Transform};

use super::TransitionKind;
use crate::render::{circle_points, Canvas, Rgba};

const MASK: Rgba = Rgba::BLACK;

/// Half-width of the fully closed hold around `p = 0.5`.
pub const HOLD: f32 = 0.12;
/// Eased progress from which peaking masks hide the whole screen.
pub const PEAK_COVER: f32 = 0.85;

/// Whether the mask for `kind` hides the whole screen at eased progress `p`.
pub fn covers(kind: TransitionKind, p: f32) -> bool {
    if kind.peaks_mid_cycle() {
        p >= PEAK_COVER
    } else {
        envelope(p) >= 1.0
    }
}

/// Dispatch to the routine for `kind`.
pub fn draw<R: Rng + ?Sized>(
    kind: TransitionKind,
    canvas: &mut Canvas,
    w: f32,
    h: f32,
    p: f32,
    rng: &mut R,
) {
    let p = p.clamp(0.0, 1.0);
    if kind != TransitionKind::Static && covers(kind, p) {
        canvas.fill_device_rect(0.0, 0.0, w, h, MASK);
        return;
    }
    match kind {
        TransitionKind::Fade => fade(canvas, w, h, p),
        TransitionKind::WipeLeft => wipe(canvas, w, h, p, Direction::Left),
        TransitionKind::WipeRight => wipe(canvas, w, h, p, Direction::Right),
        TransitionKind::WipeUp => wipe(canvas, w, h, p, Direction::Up),
        TransitionKind::WipeDown => wipe(canvas, w, h, p, Direction::Down),
        TransitionKind::CircleOpen => circle_open(canvas, w, h, p),
        TransitionKind::CircleClose => circle_close(canvas, w, h, p),
        TransitionKind::Spiral => spiral(canvas, w, h, p),
        TransitionKind::Wave => wave(canvas, w, h, p),
        TransitionKind::Diamond => diamond(canvas, w, h, p),
        TransitionKind::Blinds => blinds(canvas, w, h, p),
        TransitionKind::Checkerboard => checkerboard(canvas, w, h, p),
        TransitionKind::Pixels => pixels(canvas, w, h, p, rng),
        TransitionKind::Static => static_noise(canvas, w, h, p, rng),
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// How far a closing mask has shut and how far it has reopened.
fn phases(p: f32) -> (f32, f32) {
    let span = 0.5 - HOLD;
    let closed = (p / span).min(1.0);
    let reopened = ((p - 0.5 - HOLD) / span).clamp(0.0, 1.0);
    (closed, reopened)
}

/// Coverage envelope: 0 at the ends, 1 across the hold.
fn envelope(p: f32) -> f32 {
    let (closed, reopened) = phases(p);
    closed - reopened
}

/// Covered band `[trailing, leading]` for a sweeping mask, as fractions.
fn sweep(p: f32) -> (f32, f32) {
    let (closed, reopened) = phases(p);
    (reopened, closed)
}

/// Growth of a peaking mask, reaching 1 at `PEAK_COVER`.
fn peak(p: f32) -> f32 {
    (p / PEAK_COVER).min(1.0)
}

fn fade(canvas: &mut Canvas, w: f32, h: f32, p: f32) {
    canvas.fill_device_rect(0.0, 0.0, w, h, MASK.with_alpha(peak(p)));
}

fn wipe(canvas: &mut Canvas, w: f32, h: f32, p: f32, dir: Direction) {
    let (trail, lead) = sweep(p);
    if lead <= trail {
        return;
    }
    match dir {
        Direction::Right => canvas.fill_device_rect(w * trail, 0.0, w * (lead - trail), h, MASK),
        Direction::Left => {
            canvas.fill_device_rect(w * (1.0 - lead), 0.0, w * (lead - trail), h, MASK)
        }
        Direction::Down => canvas.fill_device_rect(0.0, h * trail, w, h * (lead - trail), MASK),
        Direction::Up => {
            canvas.fill_device_rect(0.0, h * (1.0 - lead), w, h * (lead - trail), MASK)
        }
    }
}

fn frame_outline(w: f32, h: f32) -> Vec<(f32, f32)> {
    vec![(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)]
}

fn circle_open(canvas: &mut Canvas, w: f32, h: f32, p: f32) {
    let (cx, cy) = (w * 0.5, h * 0.5);
    let max_r = (cx * cx + cy * cy).sqrt() + 2.0;
    let (closed, reopened) = phases(p);
    if reopened <= 0.0 {
        canvas.fill_compound(&[circle_points(cx, cy, max_r * closed, 96)], MASK);
    } else {
        let hole = circle_points(cx, cy, max_r * reopened, 96);
        canvas.fill_compound(&[frame_outline(w, h), hole], MASK);
    }
}

fn circle_close(canvas: &mut Canvas, w: f32, h: f32, p: f32) {
    let (cx, cy) = (w * 0.5, h * 0.5);
    let max_r = (cx * cx + cy * cy).sqrt() + 2.0;
    let (closed, reopened) = phases(p);
    if reopened <= 0.0 {
        let hole = circle_points(cx, cy, max_r * (1.0 - closed), 96);
        canvas.fill_compound(&[frame_outline(w, h), hole], MASK);
    } else {
        canvas.fill_compound(&[circle_points(cx, cy, max_r * (1.0 - reopened), 96)], MASK);
    }
}

fn spiral(canvas: &mut Canvas, w: f32, h: f32, p: f32) {
    if p <= 0.0 {
        return;
    }
    let grow = peak(p);
    let (cx, cy) = (w * 0.5, h * 0.5);
    let max_r = (cx * cx + cy * cy).sqrt();
    let turns = 6.0;
    let spacing = max_r / turns;
    let steps = 480;
    let sweep_angle = turns * TAU * grow.max(0.05);
    let points: Vec<(f32, f32)> = (0..=steps)
        .map(|i| {
            let a = i as f32 / steps as f32 * sweep_angle;
            let r = a / (turns * TAU) * max_r;
            (cx + a.cos() * r, cy + a.sin() * r)
        })
        .collect();
    canvas.polyline(&points, spacing * 1.15 * grow, MASK, false);
}

fn wave(canvas: &mut Canvas, w: f32, h: f32, p: f32) {
    if p <= 0.0 {
        return;
    }
    let front = h * 1.15 * peak(p);
    let amplitude = h * 0.06;
    let segments = 64;
    let mut points = vec![(0.0, 0.0), (w, 0.0)];
    for i in (0..=segments).rev() {
        let x = i as f32 / segments as f32 * w;
        let y = front + (x / w * TAU * 2.0 + p * TAU).sin() * amplitude - amplitude;
        points.push((x, y));
    }
    canvas.fill_polygon(&points, MASK);
}

fn diamond(canvas: &mut Canvas, w: f32, h: f32, p: f32) {
    let (cx, cy) = (w * 0.5, h * 0.5);
    let reach = cx + cy + 2.0;
    let shape = |s: f32| vec![(cx, cy - s), (cx + s, cy), (cx, cy + s), (cx - s, cy)];
    let (closed, reopened) = phases(p);
    if reopened <= 0.0 {
        canvas.fill_compound(&[shape(reach * closed)], MASK);
    } else {
        canvas.fill_compound(&[frame_outline(w, h), shape(reach * reopened)], MASK);
    }
}

/// Share of a staggered cell that is covered: cells with a later `delay`
/// close later and reopen earlier.
fn staggered(env: f32, delay: f32, stagger: f32) -> f32 {
    ((env - delay) / (1.0 - stagger)).clamp(0.0, 1.0)
}

fn blinds(canvas: &mut Canvas, w: f32, h: f32, p: f32) {
    const SLATS: usize = 12;
    const STAGGER: f32 = 0.3;
    let slat_h = h / SLATS as f32;
    let env = envelope(p);
    for i in 0..SLATS {
        let delay = i as f32 / SLATS as f32 * STAGGER;
        let cover = staggered(env, delay, STAGGER) * slat_h;
        if cover <= 0.0 {
            continue;
        }
        let y = i as f32 * slat_h + (slat_h - cover) * 0.5;
        canvas.fill_device_rect(0.0, y, w, cover + 0.5, MASK);
    }
}

/// Tiles along the longer edge.
const CHECKER_CELLS: usize = 10;

/// Tile size and grid dimensions for the checkerboard.
///
/// Tiles are sized from the longer edge, so neither dimension exceeds
/// `CHECKER_CELLS` however narrow the canvas is.
fn checker_grid(w: f32, h: f32) -> (f32, usize, usize) {
    let tile = (w.max(h) / CHECKER_CELLS as f32).max(1.0);
    let count = |extent: f32| ((extent / tile).ceil() as usize).clamp(1, CHECKER_CELLS);
    (tile, count(w), count(h))
}

fn checkerboard(canvas: &mut Canvas, w: f32, h: f32, p: f32) {
    const STAGGER: f32 = 0.4;
    let (tile, cols, rows) = checker_grid(w, h);
    let span = (cols + rows) as f32;
    let env = envelope(p);
    for row in 0..rows {
        for col in 0..cols {
            let parity = ((row + col) % 2) as f32 * 0.5;
            let delay = ((row + col) as f32 / span * 0.5 + parity) * STAGGER;
            let size = staggered(env, delay, STAGGER) * tile;
            if size <= 0.0 {
                continue;
            }
            let x = col as f32 * tile + (tile - size) * 0.5;
            let y = row as f32 * tile + (tile - size) * 0.5;
            canvas.fill_device_rect(x, y, size + 0.5, size + 0.5, MASK);
        }
    }
}

/// Fixed pseudo-random rank in `[0, 1)` deciding when a block closes.
fn block_rank(col: u32, row: u32) -> f32 {
    let mut x = col.wrapping_mul(0x9E37_79B9) ^ row.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 15;
    x = x.wrapping_mul(0x2C1B_3C6D);
    x ^= x >> 12;
    (x >> 8) as f32 / (1u32 << 24) as f32
}

fn pixels<R: Rng + ?Sized>(canvas: &mut Canvas, w: f32, h: f32, p: f32, rng: &mut R) {
    const BLOCK: f32 = 12.0;
    const SPARKLE: f32 = 0.1;
    let cols = (w / BLOCK).ceil().max(1.0) as u32;
    let rows = (h / BLOCK).ceil().max(1.0) as u32;
    let env = envelope(p);
    if env <= 0.0 {
        return;
    }
    for row in 0..rows {
        for col in 0..cols {
            if block_rank(col, row) < env {
                canvas.fill_device_rect(col as f32 * BLOCK, row as f32 * BLOCK, BLOCK, BLOCK, MASK);
            }
        }
    }
    // Random blocks ahead of the ordered ones.
    let sparkle = (env * (cols * rows) as f32 * SPARKLE) as u32;
    for _ in 0..sparkle {
        let x = rng.random_range(0..cols) as f32 * BLOCK;
        let y = rng.random_range(0..rows) as f32 * BLOCK;
        canvas.fill_device_rect(x, y, BLOCK, BLOCK, MASK);
    }
}

fn static_noise<R: Rng + ?Sized>(canvas: &mut Canvas, w: f32, h: f32, p: f32, rng: &mut R) {
    const BLOCK: f32 = 4.0;
    let cols = (w / BLOCK).ceil() as u32 + 4;
    let rows = (h / BLOCK).ceil() as u32 + 4;
    let Some(mut noise) = Pixmap::new(cols, rows) else {
        return;
    };
    for px in noise.pixels_mut() {
        // High-contrast: mostly near-black or near-white.
        let v: u8 = if rng.random_bool(0.5) {
            rng.random_range(200..=255)
        } else {
            rng.random_range(0..=40)
        };
        *px = PremultipliedColorU8::from_rgba(v, v, v, 255)
            .unwrap_or(PremultipliedColorU8::TRANSPARENT);
    }

    // The layer is four blocks wider and taller than the canvas; jitter
    // stays within that margin.
    let jitter_x = rng.random_range(-2.0..=2.0) * BLOCK - 2.0 * BLOCK;
    let jitter_y = rng.random_range(-2.0..=2.0) * BLOCK - 2.0 * BLOCK;
    let transform = Transform::from_scale(BLOCK, BLOCK).post_translate(jitter_x, jitter_y);
    canvas.draw_layer_transformed(&noise, transform, peak(p), false);

    // A few torn scanlines.
    let tears = (p * 6.0) as usize;
    for _ in 0..tears {
        let y = rng.random_range(0.0..h.max(1.0));
        let band = rng.random_range(1.0..6.0);
        let shade = rng.random_range(0.6..1.0);
        let color = Rgba::rgb(shade, shade, shade).with_alpha(p * 0.6);
        canvas.fill_device_rect(0.0, y, w, band, color);
    }
}
