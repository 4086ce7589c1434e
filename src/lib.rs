//! Spectra Canvas
//!
//! Audio-reactive 2D raster visualization pipeline.
//!
//! # Features
//!
//! - Signal conditioning (equalization, smoothing) and bass beat detection
//! - Twenty pluggable designs drawing onto a tiny-skia canvas
//! - Particle and shockwave simulation shared across designs
//! - Timed full-screen transitions and a background slideshow
//! - Lyric overlays (classic and scrolling) and a pulsing watermark
//! - Frame scheduling driven by an abstract tick source
//! - Reference audio analysis via Symphonia and RustFFT

pub mod audio;
pub mod background;
pub mod designs;
pub mod effects;
pub mod overlay;
pub mod pipeline;
pub mod render;
pub mod signal;
pub mod transition;

// Re-export commonly used types
pub use audio::{load_audio, AudioData, AudioError, NoSource, StaticSource, TrackAnalyser};
pub use background::{BackgroundCompositor, BackgroundConfig, FitMode};
pub use designs::{create_design, Design, DesignType, Palette, PaletteKind, VisualizationParams};
pub use effects::ParticleSystem;
pub use overlay::{OverlayConfig, SubtitleMode, SubtitleTrack, WatermarkAnchor, WatermarkConfig};
pub use pipeline::{
    FrameInfo, FrequencySource, ManualClock, Pipeline, PipelineError, PlaybackClock, Scheduler,
    VisualizerConfig,
};
pub use render::{parse_hex_color, Canvas, Rgba, TextRenderer};
pub use transition::{TransitionEngine, TransitionKind};
