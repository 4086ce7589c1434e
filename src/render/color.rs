//! Colour values, HSL conversion and hex parsing.

use resvg::tiny_skia;
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA colour with `0.0..=1.0` channels.
///
/// Serialises as a `#rrggbb` / `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    /// Near-black used beneath primitives in stroke-outline mode.
    pub const OUTLINE: Rgba = Rgba {
        r: 0.03,
        g: 0.03,
        b: 0.04,
        a: 0.92,
    };

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Build a colour from hue (degrees), saturation and lightness (`0..=1`).
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::rgb(l, l, l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::rgb(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Multiply the current alpha by `factor`.
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
        .unwrap_or(tiny_skia::Color::BLACK)
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_hex_color(&value).ok_or_else(|| format!("invalid colour: {value}"))
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_hex()
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex_color(hex: &str) -> Option<Rgba> {
    let hex = hex.trim().trim_start_matches('#');
    if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some(Rgba {
        r: channel(0)? as f32 / 255.0,
        g: channel(2)? as f32 / 255.0,
        b: channel(4)? as f32 / 255.0,
        a: alpha as f32 / 255.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_hex_color("#00ff88"),
            Some(Rgba::rgb(0.0, 1.0, 136.0 / 255.0))
        );
        assert_eq!(parse_hex_color("ffffff"), Some(Rgba::WHITE));
        assert_eq!(parse_hex_color("#00000000"), Some(Rgba::TRANSPARENT));
        assert_eq!(parse_hex_color("invalid"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_hsl_primaries() {
        let red = Rgba::from_hsl(0.0, 1.0, 0.5);
        assert!((red.r - 1.0).abs() < 1e-4 && red.g.abs() < 1e-4 && red.b.abs() < 1e-4);
        let green = Rgba::from_hsl(120.0, 1.0, 0.5);
        assert!((green.g - 1.0).abs() < 1e-4);
        let wrapped = Rgba::from_hsl(480.0, 1.0, 0.5);
        assert!((wrapped.g - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_hex_round_trip_through_serde() {
        let c = Rgba::from_rgb8(0x12, 0xab, 0xef).with_alpha(0.5);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#12abef80\"");
        let back: Rgba = serde_json::from_str("\"#12abef\"").unwrap();
        assert_eq!(back.to_rgba8(), [0x12, 0xab, 0xef, 255]);
    }
}
