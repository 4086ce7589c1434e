//! Visualization design system.
//!
//! Every design draws one frame from the conditioned signal:
//! - Bars / MirrorBars: classic spectrum bars
//! - CircularRadial / CircularRing: bars and rings around the centre
//! - WaveformLine / SpectrumMountain: line and filled-area spectra
//! - FramePerimeter: bars along the screen edges
//! - Particles / Orbit / PulseRings / Starfield: particle-driven scenes
//! - LedMatrix / DotGrid / Piano: full-canvas grid layouts
//! - Spiral / Tunnel: geometric scenes
//! - Spectrogram: scrolling time-frequency history
//! - Glitch / DataMosh / PixelRain: pixel displacement and ghost frames

mod bars;
mod circular;
mod frame_perimeter;
mod geometric;
mod glitch;
mod grid;
mod palette;
mod particles;
mod piano;
mod pixel_rain;
mod registry;
pub mod shaping;
mod spectrogram;
mod spectrum_mountain;
mod starfield;
mod waveform_line;

pub use bars::{BarsDesign, MirrorBarsDesign};
pub use circular::{CircularRadialDesign, CircularRingDesign};
pub use frame_perimeter::FramePerimeterDesign;
pub use geometric::{PulseRingsDesign, SpiralDesign, TunnelDesign};
pub use glitch::{DataMoshDesign, GhostFrame, GlitchDesign, MOSH_LIFETIME};
pub use grid::{DotGridDesign, LedMatrixDesign};
pub use palette::{Palette, PaletteKind};
pub use particles::{OrbitDesign, ParticlesDesign};
pub use piano::PianoDesign;
pub use pixel_rain::PixelRainDesign;
pub use registry::create_design;
pub use spectrogram::SpectrogramDesign;
pub use spectrum_mountain::SpectrumMountainDesign;
pub use starfield::StarfieldDesign;
pub use waveform_line::WaveformLineDesign;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::effects::ParticleSystem;
use crate::render::Canvas;

/// Available design types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesignType {
    #[default]
    Bars,
    MirrorBars,
    CircularRadial,
    CircularRing,
    WaveformLine,
    SpectrumMountain,
    FramePerimeter,
    Particles,
    Orbit,
    PulseRings,
    Starfield,
    LedMatrix,
    DotGrid,
    Spiral,
    Tunnel,
    Piano,
    Spectrogram,
    Glitch,
    DataMosh,
    PixelRain,
}

impl DesignType {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bars" => Some(Self::Bars),
            "mirror-bars" | "mirrorbars" | "mirror" => Some(Self::MirrorBars),
            "circular-radial" | "circularradial" | "radial" => Some(Self::CircularRadial),
            "circular-ring" | "circularring" | "ring" => Some(Self::CircularRing),
            "waveform-line" | "waveformline" | "line" | "wave" => Some(Self::WaveformLine),
            "spectrum-mountain" | "spectrummountain" | "mountain" => Some(Self::SpectrumMountain),
            "frame-perimeter" | "frameperimeter" | "perimeter" | "frame" => {
                Some(Self::FramePerimeter)
            }
            "particles" | "particle" => Some(Self::Particles),
            "orbit" | "orbits" => Some(Self::Orbit),
            "pulse-rings" | "pulserings" | "pulse" => Some(Self::PulseRings),
            "starfield" | "stars" => Some(Self::Starfield),
            "led-matrix" | "ledmatrix" | "led" => Some(Self::LedMatrix),
            "dot-grid" | "dotgrid" | "dots" => Some(Self::DotGrid),
            "spiral" => Some(Self::Spiral),
            "tunnel" => Some(Self::Tunnel),
            "piano" | "keys" => Some(Self::Piano),
            "spectrogram" | "waterfall" => Some(Self::Spectrogram),
            "glitch" => Some(Self::Glitch),
            "data-mosh" | "datamosh" | "mosh" => Some(Self::DataMosh),
            "pixel-rain" | "pixelrain" | "rain" => Some(Self::PixelRain),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bars => "bars",
            Self::MirrorBars => "mirror-bars",
            Self::CircularRadial => "circular-radial",
            Self::CircularRing => "circular-ring",
            Self::WaveformLine => "waveform-line",
            Self::SpectrumMountain => "spectrum-mountain",
            Self::FramePerimeter => "frame-perimeter",
            Self::Particles => "particles",
            Self::Orbit => "orbit",
            Self::PulseRings => "pulse-rings",
            Self::Starfield => "starfield",
            Self::LedMatrix => "led-matrix",
            Self::DotGrid => "dot-grid",
            Self::Spiral => "spiral",
            Self::Tunnel => "tunnel",
            Self::Piano => "piano",
            Self::Spectrogram => "spectrogram",
            Self::Glitch => "glitch",
            Self::DataMosh => "data-mosh",
            Self::PixelRain => "pixel-rain",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Bars => "Vertical bars rising from the bottom edge",
            Self::MirrorBars => "Bars mirrored left-right and above/below the centre line",
            Self::CircularRadial => "Bars emanating outward from a pulsing core",
            Self::CircularRing => "Closed rings whose radius follows the spectrum",
            Self::WaveformLine => "Layered oscillating lines across the screen",
            Self::SpectrumMountain => "Mirrored filled-polygon spectrum",
            Self::FramePerimeter => "Bars along all four screen edges",
            Self::Particles => "Core that sheds particles and shockwaves on bass hits",
            Self::Orbit => "Particles launched into orbit around the centre",
            Self::PulseRings => "Concentric rings breathing with each band",
            Self::Starfield => "Stars streaming outward with energy-driven speed",
            Self::LedMatrix => "LED bar-graph matrix with peak hold",
            Self::DotGrid => "Grid of dots scaled by their column's band",
            Self::Spiral => "Phyllotaxis spiral of pulsing dots",
            Self::Tunnel => "Receding polygons forming a tunnel",
            Self::Piano => "Piano keyboard lighting keys by frequency",
            Self::Spectrogram => "Scrolling time-frequency waterfall",
            Self::Glitch => "Bars torn apart by beat-triggered slice displacement",
            Self::DataMosh => "Ghost frames captured on beats and smeared over later frames",
            Self::PixelRain => "Falling pixel drops with melting ghost trails",
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Bars,
            Self::MirrorBars,
            Self::CircularRadial,
            Self::CircularRing,
            Self::WaveformLine,
            Self::SpectrumMountain,
            Self::FramePerimeter,
            Self::Particles,
            Self::Orbit,
            Self::PulseRings,
            Self::Starfield,
            Self::LedMatrix,
            Self::DotGrid,
            Self::Spiral,
            Self::Tunnel,
            Self::Piano,
            Self::Spectrogram,
            Self::Glitch,
            Self::DataMosh,
            Self::PixelRain,
        ]
    }

    /// Designs laid out in full-canvas coordinates skip the effect scale/offset.
    pub fn ignores_transform(&self) -> bool {
        matches!(
            self,
            Self::FramePerimeter | Self::LedMatrix | Self::Piano | Self::Spectrogram
        )
    }
}

/// Per-frame inputs shared by every design. Immutable within a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualizationParams {
    pub width: u32,
    pub height: u32,
    pub frame_index: u64,
    /// Seconds since the scheduler started; drives slow rotations.
    pub time: f64,
    /// Gain applied after the power-law mapping.
    pub sensitivity: f32,
    /// Palette already resolved for this frame.
    pub palette: Palette,
    pub beat: bool,
    pub stroke_outline: bool,
}

impl VisualizationParams {
    pub fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 * 0.5, self.height as f32 * 0.5)
    }

    pub fn min_dim(&self) -> f32 {
        self.width.min(self.height) as f32
    }
}

impl Default for VisualizationParams {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frame_index: 0,
            time: 0.0,
            sensitivity: 1.0,
            palette: Palette::default(),
            beat: false,
            stroke_outline: false,
        }
    }
}

/// Mutable services handed to a design for one frame.
pub struct EffectContext<'a> {
    pub particles: &'a mut ParticleSystem,
    pub rng: &'a mut StdRng,
}

/// Trait for visualization designs.
pub trait Design: Send {
    /// Design type identifier.
    fn design_type(&self) -> DesignType;

    /// Draw one frame onto `canvas`.
    ///
    /// `signal` is the conditioned snapshot (`0.0..=255.0` per bin).
    fn draw(
        &mut self,
        canvas: &mut Canvas,
        signal: &[f32],
        params: &VisualizationParams,
        fx: &mut EffectContext<'_>,
    );

    /// Frames of private persistent state still pending (ghost frames,
    /// history columns, live drops). Zero for stateless designs.
    fn retained_frames(&self) -> u32 {
        0
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::SeedableRng;

    use super::*;
    use crate::render::Rgba;

    pub struct DrawOutput {
        pub canvas: Canvas,
        pub particles: ParticleSystem,
    }

    pub fn params(width: u32, height: u32, beat: bool) -> VisualizationParams {
        VisualizationParams {
            width,
            height,
            beat,
            ..VisualizationParams::default()
        }
    }

    /// Draw one frame onto a black canvas with a fixed seed.
    pub fn draw_with(
        design: &mut dyn Design,
        signal: &[f32],
        params: &VisualizationParams,
    ) -> DrawOutput {
        let mut canvas = Canvas::new(params.width, params.height).unwrap();
        canvas.clear(Rgba::BLACK);
        let mut particles = ParticleSystem::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut fx = EffectContext {
            particles: &mut particles,
            rng: &mut rng,
        };
        design.draw(&mut canvas, signal, params, &mut fx);
        DrawOutput { canvas, particles }
    }

    pub fn draw_once(design: &mut dyn Design, signal: &[f32], width: u32, height: u32) -> DrawOutput {
        draw_with(design, signal, &params(width, height, false))
    }
}
