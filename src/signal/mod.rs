//! Per-frame signal conditioning.
//!
//! This module provides:
//! - Power-law per-bin equalization and windowed smoothing
//! - Stateless bass-energy beat detection

pub mod beat;
pub mod conditioner;

pub use beat::{BeatDetector, BEAT_THRESHOLD, LOW_BAND_FRACTION};
pub use conditioner::{condition, equalize, smooth, ConditionerConfig};
