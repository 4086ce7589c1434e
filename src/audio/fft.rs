//! FFT spectrum analysis using RustFFT.
//!
//! Magnitudes follow the Web-audio analyser conventions: Hann window,
//! `|X| / N` scaling and a decibel floor, so the byte mapping in
//! [`super::source`] lines up with what browser visualizers expect.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::AudioError;

/// Floor applied before converting magnitudes to decibels.
pub const DECIBEL_FLOOR: f32 = -100.0;

/// Spectrum analyzer for mono audio.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer; `fft_size` must be a power of two of at least 32.
    ///
    /// Larger sizes give better frequency resolution but worse time resolution.
    pub fn new(fft_size: usize) -> Result<Self, AudioError> {
        if !fft_size.is_power_of_two() || fft_size < 32 {
            return Err(AudioError::InvalidFftSize(fft_size));
        }

        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                let t = i as f32 / fft_size as f32;
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * t).cos())
            })
            .collect();

        Ok(Self {
            fft: FftPlanner::new().plan_fft_forward(fft_size),
            fft_size,
            window,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of frequency bins in the output (FFT size / 2).
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Linear magnitudes from 0 Hz up to (not including) Nyquist.
    ///
    /// Short input is zero-padded at the front, so the newest sample always
    /// sits at the end of the window.
    pub fn analyze(&mut self, samples: &[f32]) -> Vec<f32> {
        let take = samples.len().min(self.fft_size);
        let pad = self.fft_size - take;
        let recent = &samples[samples.len() - take..];

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        let scale = 1.0 / self.fft_size as f32;
        self.buffer[..self.num_bins()]
            .iter()
            .map(|c| c.norm() * scale)
            .collect()
    }

    pub fn bin_to_freq(&self, bin: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / self.fft_size as f32
    }

    pub fn freq_to_bin(&self, freq: f32, sample_rate: u32) -> usize {
        (freq * self.fft_size as f32 / sample_rate as f32).round() as usize
    }

    /// Spectrum in decibels, floored at [`DECIBEL_FLOOR`].
    pub fn analyze_db(&mut self, samples: &[f32]) -> Vec<f32> {
        self.analyze(samples).into_iter().map(to_decibels).collect()
    }
}

pub fn to_decibels(magnitude: f32) -> f32 {
    (20.0 * magnitude.max(1e-10).log10()).max(DECIBEL_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::synth::generate_sine;

    #[test]
    fn test_spectrum_analyzer_creation() {
        let analyzer = SpectrumAnalyzer::new(1024).unwrap();
        assert_eq!(analyzer.fft_size(), 1024);
        assert_eq!(analyzer.num_bins(), 512);
        assert!(matches!(
            SpectrumAnalyzer::new(1000),
            Err(AudioError::InvalidFftSize(1000))
        ));
    }

    #[test]
    fn test_sine_wave_peak() {
        let sample_rate = 44100;
        let freq = 440.0;
        let samples = generate_sine(freq, sample_rate, 0.1, 1.0);

        let mut analyzer = SpectrumAnalyzer::new(2048).unwrap();
        let spectrum = analyzer.analyze(&samples);

        let peak_bin = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        let peak_freq = analyzer.bin_to_freq(peak_bin, sample_rate);
        assert!(
            (peak_freq - freq).abs() < 50.0,
            "Expected peak near {} Hz, got {} Hz",
            freq,
            peak_freq
        );
        // Full-scale sine through a Hann window peaks near |X|/N = 0.25.
        assert!((spectrum[peak_bin] - 0.25).abs() < 0.08);
    }

    #[test]
    fn test_short_input_is_padded() {
        let mut analyzer = SpectrumAnalyzer::new(64).unwrap();
        assert_eq!(analyzer.analyze(&[0.5; 10]).len(), 32);
        assert!(analyzer.analyze(&[]).iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_bin_freq_conversion() {
        let analyzer = SpectrumAnalyzer::new(2048).unwrap();
        assert_eq!(analyzer.freq_to_bin(22050.0, 44100), 1024);
        let bin = analyzer.freq_to_bin(1000.0, 44100);
        assert!((analyzer.bin_to_freq(bin, 44100) - 1000.0).abs() < 50.0);
    }

    #[test]
    fn test_analyze_db_floor() {
        let mut analyzer = SpectrumAnalyzer::new(256).unwrap();
        let db = analyzer.analyze_db(&[0.0; 256]);
        assert!(db.iter().all(|&d| d == DECIBEL_FLOOR));
    }
}
