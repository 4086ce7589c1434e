//! Named colour palettes.

use serde::{Deserialize, Serialize};

use crate::render::Rgba;

/// Palette identifiers accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteKind {
    #[default]
    Neon,
    Sunset,
    Ocean,
    Forest,
    Fire,
    Vaporwave,
    /// Greyscale; element colour depends only on amplitude.
    Achromatic,
    /// Hue cycles continuously with the frame index.
    Rainbow,
}

impl PaletteKind {
    pub fn all() -> &'static [Self] {
        &[
            Self::Neon,
            Self::Sunset,
            Self::Ocean,
            Self::Forest,
            Self::Fire,
            Self::Vaporwave,
            Self::Achromatic,
            Self::Rainbow,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Neon => "neon",
            Self::Sunset => "sunset",
            Self::Ocean => "ocean",
            Self::Forest => "forest",
            Self::Fire => "fire",
            Self::Vaporwave => "vaporwave",
            Self::Achromatic => "achromatic",
            Self::Rainbow => "rainbow",
        }
    }
}

/// Hue advance per frame for the rainbow palette, in degrees.
const RAINBOW_SPEED: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub kind: PaletteKind,
    pub primary: Rgba,
    pub secondary: Rgba,
    pub accent: Rgba,
    pub background_glow: Rgba,
    /// Hue span in degrees that discrete elements are spread across.
    pub hue_range: (f32, f32),
}

impl Palette {
    pub fn preset(kind: PaletteKind) -> Self {
        let hsl = Rgba::from_hsl;
        let (primary, secondary, accent, glow, hue_range) = match kind {
            PaletteKind::Neon => (
                hsl(150.0, 1.0, 0.5),
                hsl(190.0, 1.0, 0.5),
                hsl(320.0, 1.0, 0.6),
                hsl(170.0, 1.0, 0.15),
                (140.0, 320.0),
            ),
            PaletteKind::Sunset => (
                hsl(20.0, 0.95, 0.55),
                hsl(340.0, 0.85, 0.55),
                hsl(45.0, 1.0, 0.6),
                hsl(350.0, 0.7, 0.15),
                (330.0, 410.0),
            ),
            PaletteKind::Ocean => (
                hsl(200.0, 0.9, 0.5),
                hsl(175.0, 0.8, 0.45),
                hsl(230.0, 0.9, 0.7),
                hsl(210.0, 0.8, 0.12),
                (170.0, 240.0),
            ),
            PaletteKind::Forest => (
                hsl(110.0, 0.7, 0.45),
                hsl(80.0, 0.6, 0.45),
                hsl(50.0, 0.9, 0.6),
                hsl(120.0, 0.5, 0.1),
                (60.0, 150.0),
            ),
            PaletteKind::Fire => (
                hsl(15.0, 1.0, 0.5),
                hsl(40.0, 1.0, 0.5),
                hsl(55.0, 1.0, 0.7),
                hsl(5.0, 0.9, 0.12),
                (0.0, 55.0),
            ),
            PaletteKind::Vaporwave => (
                hsl(300.0, 0.9, 0.65),
                hsl(185.0, 0.9, 0.6),
                hsl(260.0, 0.9, 0.7),
                hsl(280.0, 0.6, 0.15),
                (180.0, 320.0),
            ),
            PaletteKind::Achromatic => (
                Rgba::WHITE,
                hsl(0.0, 0.0, 0.75),
                hsl(0.0, 0.0, 0.9),
                hsl(0.0, 0.0, 0.12),
                (0.0, 0.0),
            ),
            PaletteKind::Rainbow => (
                hsl(0.0, 1.0, 0.55),
                hsl(120.0, 1.0, 0.55),
                hsl(240.0, 1.0, 0.65),
                hsl(0.0, 0.8, 0.12),
                (0.0, 360.0),
            ),
        };
        Self {
            kind,
            primary,
            secondary,
            accent,
            background_glow: glow,
            hue_range,
        }
    }

    /// The palette as seen on `frame_index`.
    ///
    /// Static palettes are returned unchanged; the rainbow palette rotates
    /// its hues with the frame index.
    pub fn at_frame(&self, frame_index: u64) -> Self {
        if self.kind != PaletteKind::Rainbow {
            return *self;
        }
        let shift = (frame_index as f32 * RAINBOW_SPEED) % 360.0;
        Self {
            primary: Rgba::from_hsl(shift, 1.0, 0.55),
            secondary: Rgba::from_hsl(shift + 120.0, 1.0, 0.55),
            accent: Rgba::from_hsl(shift + 240.0, 1.0, 0.65),
            background_glow: Rgba::from_hsl(shift, 0.8, 0.12),
            hue_range: (shift, shift + 360.0),
            ..*self
        }
    }

    /// Hue (degrees) for element `index` of `count`.
    pub fn hue_at(&self, index: usize, count: usize) -> f32 {
        let t = if count == 0 {
            0.0
        } else {
            index as f32 / count as f32
        };
        self.hue_range.0 + (self.hue_range.1 - self.hue_range.0) * t
    }

    /// Colour for element `index` of `count` with normalised amplitude `amp`.
    ///
    /// Beat frames render with full saturation.
    pub fn element_color(&self, index: usize, count: usize, amp: f32, beat: bool) -> Rgba {
        let amp = amp.clamp(0.0, 1.0);
        if self.kind == PaletteKind::Achromatic {
            return Rgba::from_hsl(0.0, 0.0, 0.6 + amp * 0.35);
        }
        let saturation = if beat { 1.0 } else { 0.82 };
        Rgba::from_hsl(self.hue_at(index, count), saturation, 0.45 + amp * 0.2)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::preset(PaletteKind::default())
    }
}
