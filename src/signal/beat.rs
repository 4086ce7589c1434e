//! Bass-energy beat detection.
//!
//! A beat is reported whenever the mean magnitude of the lowest bins exceeds
//! a fixed threshold. There is no hysteresis: a sustained loud passage keeps
//! reporting a beat on every frame.

/// Fraction of the spectrum (from bin 0 upward) treated as the bass band.
pub const LOW_BAND_FRACTION: f32 = 0.12;

/// Mean bass magnitude (0-255 scale) above which a frame counts as a beat.
pub const BEAT_THRESHOLD: f32 = 200.0;

/// Stateless beat detector over conditioned signals.
#[derive(Debug, Clone, Copy)]
pub struct BeatDetector {
    threshold: f32,
    band_fraction: f32,
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self {
            threshold: BEAT_THRESHOLD,
            band_fraction: LOW_BAND_FRACTION,
        }
    }
}

impl BeatDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bins in the bass band for a signal of `len` bins.
    pub fn band_len(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((len as f32 * self.band_fraction).round() as usize).clamp(1, len)
    }

    /// Mean magnitude of the bass band on the 0-255 scale.
    pub fn bass_mean(&self, signal: &[f32]) -> f32 {
        let n = self.band_len(signal.len());
        if n == 0 {
            return 0.0;
        }
        signal[..n].iter().sum::<f32>() / n as f32
    }

    /// Bass energy normalized to `0.0..=1.0`, used by pulsing overlays.
    pub fn bass_energy(&self, signal: &[f32]) -> f32 {
        (self.bass_mean(signal) / 255.0).clamp(0.0, 1.0)
    }

    /// Whether this frame's bass energy crosses the beat threshold.
    pub fn detect(&self, signal: &[f32]) -> bool {
        self.bass_mean(signal) > self.threshold
    }
}
