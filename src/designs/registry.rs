//! Design registry.
//!
//! The match below is the single place a `DesignType` maps to an
//! implementation; adding a variant without a design fails to compile.

use super::{
    BarsDesign, CircularRadialDesign, CircularRingDesign, DataMoshDesign, Design, DesignType,
    DotGridDesign, FramePerimeterDesign, GlitchDesign, LedMatrixDesign, MirrorBarsDesign,
    OrbitDesign, ParticlesDesign, PianoDesign, PixelRainDesign, PulseRingsDesign,
    SpectrogramDesign, SpectrumMountainDesign, SpiralDesign, StarfieldDesign, TunnelDesign,
    WaveformLineDesign,
};

/// Create a fresh design instance (with empty private state) from type.
///
/// # Example
/// ```
/// use spectra_canvas::designs::{create_design, DesignType};
///
/// let design = create_design(DesignType::Bars);
/// assert_eq!(design.design_type(), DesignType::Bars);
/// ```
pub fn create_design(design_type: DesignType) -> Box<dyn Design> {
    match design_type {
        DesignType::Bars => Box::new(BarsDesign),
        DesignType::MirrorBars => Box::new(MirrorBarsDesign),
        DesignType::CircularRadial => Box::new(CircularRadialDesign),
        DesignType::CircularRing => Box::new(CircularRingDesign),
        DesignType::WaveformLine => Box::new(WaveformLineDesign),
        DesignType::SpectrumMountain => Box::new(SpectrumMountainDesign),
        DesignType::FramePerimeter => Box::new(FramePerimeterDesign),
        DesignType::Particles => Box::new(ParticlesDesign),
        DesignType::Orbit => Box::new(OrbitDesign),
        DesignType::PulseRings => Box::new(PulseRingsDesign),
        DesignType::Starfield => Box::new(StarfieldDesign::new()),
        DesignType::LedMatrix => Box::new(LedMatrixDesign::new()),
        DesignType::DotGrid => Box::new(DotGridDesign),
        DesignType::Spiral => Box::new(SpiralDesign),
        DesignType::Tunnel => Box::new(TunnelDesign),
        DesignType::Piano => Box::new(PianoDesign),
        DesignType::Spectrogram => Box::new(SpectrogramDesign::new()),
        DesignType::Glitch => Box::new(GlitchDesign),
        DesignType::DataMosh => Box::new(DataMoshDesign::new()),
        DesignType::PixelRain => Box::new(PixelRainDesign::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_design_returns_correct_type() {
        for design_type in DesignType::all() {
            let design = create_design(*design_type);
            assert_eq!(design.design_type(), *design_type);
        }
    }

    #[test]
    fn test_fresh_designs_hold_no_state() {
        for design_type in DesignType::all() {
            assert_eq!(create_design(*design_type).retained_frames(), 0);
        }
    }
}
