//! Audio decoding and reference frequency analysis.
//!
//! This module provides:
//! - Audio file loading via Symphonia (WAV, MP3, FLAC, AAC)
//! - FFT spectrum analysis via RustFFT
//! - Frequency sources implementing the pipeline's pull interface
//! - Synthetic test signals

pub mod fft;
pub mod loader;
pub mod source;
pub mod synth;

pub use fft::SpectrumAnalyzer;
pub use loader::{load_audio, AudioData, AudioError};
pub use source::{decibels_to_byte, NoSource, StaticSource, TrackAnalyser, DEFAULT_FFT_SIZE};
pub use synth::{
    generate_click_track, generate_kick, generate_sine, generate_test_beat, generate_white_noise,
    synthetic_snapshot, write_wav,
};
