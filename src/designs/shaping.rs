//! Shared amplitude helpers used by every design.

use crate::render::{Glow, Rgba};

/// Full-scale magnitude of a conditioned sample.
pub const FULL_SCALE: f32 = 255.0;

/// Fraction of bins designs spread across; the top of the range rarely carries energy.
pub const USABLE_FRACTION: f32 = 0.75;

/// Glow radius on ordinary and beat frames.
pub const BASE_GLOW: f32 = 4.0;
pub const BEAT_GLOW: f32 = 16.0;

/// Conditioned magnitude as `0.0..=1.0`.
#[inline]
pub fn normalized(value: f32) -> f32 {
    (value / FULL_SCALE).clamp(0.0, 1.0)
}

/// Power-law response: `normalized(value) ^ exponent * sensitivity`.
#[inline]
pub fn amplitude(value: f32, exponent: f32, sensitivity: f32) -> f32 {
    normalized(value).powf(exponent) * sensitivity.max(0.0)
}

/// Average the usable part of `signal` into `count` bands.
pub fn bands(signal: &[f32], count: usize) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let usable = ((signal.len() as f32 * USABLE_FRACTION) as usize).max(1).min(signal.len());
    if usable == 0 {
        return vec![0.0; count];
    }
    (0..count)
        .map(|i| {
            let start = i * usable / count;
            let end = ((i + 1) * usable / count).max(start + 1).min(usable);
            let slice = &signal[start.min(usable - 1)..end];
            slice.iter().sum::<f32>() / slice.len() as f32
        })
        .collect()
}

/// Mean of a range of bins, given as fractions of the signal length.
pub fn range_mean(signal: &[f32], from: f32, to: f32) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    let len = signal.len();
    let start = ((from.clamp(0.0, 1.0) * len as f32) as usize).min(len - 1);
    let end = ((to.clamp(0.0, 1.0) * len as f32) as usize).clamp(start + 1, len);
    signal[start..end].iter().sum::<f32>() / (end - start) as f32
}

/// Glow for this frame; beat frames get the larger radius.
pub fn glow(color: Rgba, beat: bool) -> Option<Glow> {
    Some(Glow {
        color,
        radius: if beat { BEAT_GLOW } else { BASE_GLOW },
    })
}
