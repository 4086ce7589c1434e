//! Frequency sources feeding the pipeline.
//!
//! [`TrackAnalyser`] is the reference analyser for decoded tracks: it
//! windows the samples ending at the current playback position, smooths
//! magnitudes over time and maps decibels onto `0..=255`. [`StaticSource`]
//! and [`NoSource`] cover hosts that bring their own analysis, and tests.

use std::path::Path;

use super::fft::{to_decibels, SpectrumAnalyzer};
use super::loader::{load_audio, AudioData, AudioError};
use crate::pipeline::{FrequencySource, PlaybackClock};

/// Decibel value mapped to byte 0.
pub const MIN_DECIBELS: f32 = -100.0;
/// Decibel value mapped to byte 255.
pub const MAX_DECIBELS: f32 = -30.0;
/// Weight of the previous frame in temporal smoothing.
pub const SMOOTHING_TIME_CONSTANT: f32 = 0.8;
pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Map decibels onto a byte with the analyser's range.
pub fn decibels_to_byte(db: f32) -> u8 {
    let scaled = 255.0 * (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS);
    scaled.clamp(0.0, 255.0) as u8
}

/// Byte snapshots of a decoded mono track at a seekable position.
pub struct TrackAnalyser {
    samples: Vec<f32>,
    sample_rate: u32,
    analyzer: SpectrumAnalyzer,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
    position: f64,
}

impl TrackAnalyser {
    pub fn new(samples: Vec<f32>, sample_rate: u32, fft_size: usize) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::UnknownSampleRate);
        }
        let analyzer = SpectrumAnalyzer::new(fft_size)?;
        let bins = analyzer.num_bins();
        Ok(Self {
            samples,
            sample_rate,
            analyzer,
            smoothed: vec![0.0; bins],
            bytes: vec![0; bins],
            position: 0.0,
        })
    }

    pub fn from_audio(audio: &AudioData, fft_size: usize) -> Result<Self, AudioError> {
        Self::new(audio.to_mono(), audio.sample_rate, fft_size)
    }

    /// Decode `path` and analyse it.
    pub fn open(path: impl AsRef<Path>, fft_size: usize) -> Result<Self, AudioError> {
        let audio = load_audio(path.as_ref())?;
        Self::from_audio(&audio, fft_size)
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bin_count(&self) -> usize {
        self.bytes.len()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Move the playback position; negative times clamp to zero.
    pub fn seek(&mut self, seconds: f64) {
        self.position = seconds.max(0.0);
    }

    fn analyse(&mut self) {
        let end = ((self.position * self.sample_rate as f64) as usize).min(self.samples.len());
        let start = end.saturating_sub(self.analyzer.fft_size());
        let magnitudes = self.analyzer.analyze(&self.samples[start..end]);

        let tau = SMOOTHING_TIME_CONSTANT;
        for ((smoothed, byte), mag) in self
            .smoothed
            .iter_mut()
            .zip(self.bytes.iter_mut())
            .zip(magnitudes)
        {
            *smoothed = tau * *smoothed + (1.0 - tau) * mag;
            *byte = decibels_to_byte(to_decibels(*smoothed));
        }
    }
}

impl FrequencySource for TrackAnalyser {
    fn snapshot(&mut self) -> Option<&[u8]> {
        self.analyse();
        Some(&self.bytes)
    }
}

impl PlaybackClock for TrackAnalyser {
    fn current_time(&self) -> f64 {
        self.position
    }
}

/// A fixed snapshot supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    data: Option<Vec<u8>>,
}

impl StaticSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data: Some(data) }
    }

    pub fn set(&mut self, data: Vec<u8>) {
        self.data = Some(data);
    }

    /// Behave as if no audio were loaded.
    pub fn clear(&mut self) {
        self.data = None;
    }
}

impl FrequencySource for StaticSource {
    fn snapshot(&mut self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

/// No audio loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl FrequencySource for NoSource {
    fn snapshot(&mut self) -> Option<&[u8]> {
        None
    }
}
