//! Synthetic signals for tests, benches and demos.
//!
//! Time-domain generators (sine, noise, click track, test beat) feed the
//! analyser end to end; [`synthetic_snapshot`] skips the FFT and shapes a
//! byte snapshot directly.

use std::f32::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sine wave of `duration` seconds.
pub fn generate_sine(frequency: f32, sample_rate: u32, duration: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Seeded uniform white noise.
pub fn generate_white_noise(sample_rate: u32, duration: f32, amplitude: f32, seed: u64) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_samples)
        .map(|_| amplitude * rng.random_range(-1.0f32..=1.0))
        .collect()
}

/// Metronome: 10 ms decaying clicks every beat.
pub fn generate_click_track(bpm: f32, sample_rate: u32, duration: f32, click_freq: f32) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    let samples_per_beat = ((60.0 / bpm * sample_rate as f32) as usize).max(1);
    let click_samples = (sample_rate as f32 * 0.01) as usize;

    let mut samples = vec![0.0; num_samples];
    for pos in (0..num_samples).step_by(samples_per_beat) {
        for i in 0..click_samples.min(num_samples - pos) {
            let t = i as f32 / sample_rate as f32;
            let envelope = (1.0 - i as f32 / click_samples as f32).powi(2);
            samples[pos + i] = envelope * (2.0 * PI * click_freq * t).sin();
        }
    }
    samples
}

/// 150 ms kick drum: pitch falls from 150 Hz to 50 Hz.
pub fn generate_kick(sample_rate: u32) -> Vec<f32> {
    let num_samples = (0.15 * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let freq = 50.0 + 100.0 * (-t * 30.0).exp();
            (-t * 15.0).exp() * (2.0 * PI * freq * t).sin()
        })
        .collect()
}

/// 4/4 pattern: kicks on beats 1 and 3, hi-hats on every eighth. Peak-normalized.
pub fn generate_test_beat(bpm: f32, sample_rate: u32, duration: f32) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    let samples_per_beat = (60.0 / bpm * sample_rate as f32) as usize;
    let samples_per_16th = (samples_per_beat / 4).max(1);

    let kick = generate_kick(sample_rate);
    let hihat_samples = (sample_rate as f32 * 0.05) as usize;
    let mut rng = StdRng::seed_from_u64(0x4a7);

    let mut samples = vec![0.0; num_samples];
    for (step, pos) in (0..num_samples).step_by(samples_per_16th).enumerate() {
        if step % 8 == 0 || step % 8 == 4 {
            for (out, &k) in samples[pos..].iter_mut().zip(&kick) {
                *out += k * 0.8;
            }
        }
        if step % 2 == 0 {
            for i in 0..hihat_samples.min(num_samples - pos) {
                let t = i as f32 / sample_rate as f32;
                let amp = (-t * 50.0).exp() * 0.3;
                samples[pos + i] += amp * rng.random_range(-1.0f32..=1.0);
            }
        }
    }

    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    if peak > 1.0 {
        for s in &mut samples {
            *s /= peak;
        }
    }
    samples
}

/// Byte snapshot of `bins` bins with `bass` (0..=1) in the lowest eighth
/// and `treble` (0..=1) tapering across the rest.
pub fn synthetic_snapshot(bins: usize, bass: f32, treble: f32) -> Vec<u8> {
    let bass_bins = (bins / 8).max(1);
    (0..bins)
        .map(|i| {
            let level = if i < bass_bins {
                bass
            } else {
                treble * (1.0 - i as f32 / bins as f32)
            };
            (level.clamp(0.0, 1.0) * 255.0).round() as u8
        })
        .collect()
}

/// Write mono samples as a 16-bit PCM WAV file.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    let data_size = samples.len() as u32 * 2;
    file.write_all(b"RIFF")?;
    file.write_all(&(36 + data_size).to_le_bytes())?;
    file.write_all(b"WAVE")?;

    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?;
    file.write_all(&1u16.to_le_bytes())?; // PCM
    file.write_all(&1u16.to_le_bytes())?; // mono
    file.write_all(&sample_rate.to_le_bytes())?;
    file.write_all(&(sample_rate * 2).to_le_bytes())?;
    file.write_all(&2u16.to_le_bytes())?;
    file.write_all(&16u16.to_le_bytes())?;

    file.write_all(b"data")?;
    file.write_all(&data_size.to_le_bytes())?;
    for &sample in samples {
        let int_sample = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
        file.write_all(&int_sample.to_le_bytes())?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sine() {
        let samples = generate_sine(440.0, 44100, 1.0, 0.5);
        assert_eq!(samples.len(), 44100);
        let max = samples.iter().cloned().fold(0.0f32, f32::max);
        assert!((max - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_white_noise_is_seeded() {
        let a = generate_white_noise(8000, 0.1, 1.0, 12345);
        let b = generate_white_noise(8000, 0.1, 1.0, 12345);
        assert_eq!(a, b);
        assert!(a.iter().any(|&s| s > 0.0) && a.iter().any(|&s| s < 0.0));
    }

    #[test]
    fn test_generate_click_track() {
        let samples = generate_click_track(120.0, 44100, 2.0, 1000.0);
        assert_eq!(samples.len(), 88200);
        // Second click starts half a second in.
        assert!(samples[22050..22100].iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn test_generate_kick_decays() {
        let kick = generate_kick(44100);
        let peak = kick[..kick.len() / 10].iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        let late = kick[kick.len() / 2..].iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        assert!(peak > late, "Kick should decay over time");
    }

    #[test]
    fn test_generate_test_beat_normalized() {
        let samples = generate_test_beat(120.0, 44100, 2.0);
        assert_eq!(samples.len(), 88200);
        let max = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        assert!(max <= 1.0);
    }

    #[test]
    fn test_synthetic_snapshot_shape() {
        let snapshot = synthetic_snapshot(64, 1.0, 0.5);
        assert_eq!(snapshot.len(), 64);
        assert!(snapshot[..8].iter().all(|&b| b == 255));
        assert!(snapshot[8] > snapshot[63]);
        assert!(synthetic_snapshot(16, 0.0, 0.0).iter().all(|&b| b == 0));
    }
}
