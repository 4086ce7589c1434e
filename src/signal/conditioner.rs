//! Frequency-weighting and temporal smoothing of raw snapshots.
//!
//! Both stages are pure: they read the incoming slice and return a freshly
//! allocated signal, so the captured snapshot is never modified.

use serde::{Deserialize, Serialize};

/// Conditioning settings taken from the visualizer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionerConfig {
    /// Equalization exponent (0.0 disables the stage).
    pub balance: f32,
    /// Half-width of the smoothing window in bins (0 disables the stage).
    pub window: usize,
}

impl Default for ConditionerConfig {
    fn default() -> Self {
        Self {
            balance: 0.0,
            window: 1,
        }
    }
}

/// Reweight every bin by `(i / (len - 1)) ^ balance`.
///
/// Higher bins keep more of their energy as `balance` grows; the top bin is
/// always left untouched. `balance <= 0` returns the input unchanged.
pub fn equalize(signal: &[f32], balance: f32) -> Vec<f32> {
    if balance <= 0.0 || signal.len() < 2 {
        return signal.to_vec();
    }

    let last = (signal.len() - 1) as f32;
    signal
        .iter()
        .enumerate()
        .map(|(i, &v)| v * (i as f32 / last).powf(balance))
        .collect()
}

/// Moving average over the inclusive window `[i - window, i + window]`.
///
/// Windows are clamped at both ends of the array, so edge bins average fewer
/// samples instead of being padded with zeros.
pub fn smooth(signal: &[f32], window: usize) -> Vec<f32> {
    if window == 0 || signal.is_empty() {
        return signal.to_vec();
    }

    // Prefix sums keep this O(n) regardless of the window size.
    let mut prefix = Vec::with_capacity(signal.len() + 1);
    prefix.push(0.0f64);
    for &v in signal {
        let last = *prefix.last().unwrap_or(&0.0);
        prefix.push(last + v as f64);
    }

    (0..signal.len())
        .map(|i| {
            let start = i.saturating_sub(window);
            let end = (i + window + 1).min(signal.len());
            ((prefix[end] - prefix[start]) / (end - start) as f64) as f32
        })
        .collect()
}

/// Apply equalize then smooth to a raw byte snapshot.
pub fn condition(raw: &[u8], config: &ConditionerConfig) -> Vec<f32> {
    let widened: Vec<f32> = raw.iter().map(|&b| b as f32).collect();
    let equalized = equalize(&widened, config.balance);
    smooth(&equalized, config.window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equalize_zero_balance_is_identity() {
        let signal = vec![12.0, 200.0, 0.0, 255.0, 31.5];
        assert_eq!(equalize(&signal, 0.0), signal);
        assert_eq!(equalize(&signal, -1.0), signal);
    }

    #[test]
    fn test_smooth_zero_window_is_identity() {
        let signal = vec![5.0, 80.0, 3.0];
        assert_eq!(smooth(&signal, 0), signal);
    }

    #[test]
    fn test_smooth_edges_use_shorter_windows() {
        let out = smooth(&[10.0, 20.0, 30.0], 1);
        assert_eq!(out, vec![15.0, 20.0, 25.0]);
    }

    #[test]
    fn test_smooth_window_wider_than_signal() {
        let out = smooth(&[0.0, 30.0, 60.0], 10);
        for v in out {
            assert!((v - 30.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_equalize_linear_balance() {
        let out = equalize(&[100.0; 4], 1.0);
        let expected = [0.0, 33.333, 66.667, 100.0];
        for (got, want) in out.iter().zip(expected) {
            assert!((got - want).abs() < 0.01, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_equalize_weights_non_decreasing() {
        let flat = vec![200.0; 64];
        for balance in [0.25, 0.5, 1.0, 2.0] {
            let out = equalize(&flat, balance);
            assert!(out.windows(2).all(|w| w[1] >= w[0]), "balance {balance}");
        }
    }

    #[test]
    fn test_condition_order_and_purity() {
        let raw: Vec<u8> = vec![0, 255, 0, 255];
        let config = ConditionerConfig {
            balance: 1.0,
            window: 1,
        };
        let out = condition(&raw, &config);
        let expected = smooth(&equalize(&[0.0, 255.0, 0.0, 255.0], 1.0), 1);
        assert_eq!(out, expected);
        assert_eq!(raw, vec![0, 255, 0, 255]);
    }

    #[test]
    fn test_single_bin_signal() {
        assert_eq!(equalize(&[42.0], 2.0), vec![42.0]);
        assert_eq!(smooth(&[42.0], 3), vec![42.0]);
    }
}
