//! Text rasterization through usvg/resvg.
//!
//! Each call lays out a single line as an SVG `<text>` node, converts it with
//! the shared font database and rasterizes it into a transparent layer the
//! size of the canvas. Callers composite the layer (possibly several times,
//! offset and tinted) onto the frame.

use std::path::Path;
use std::sync::Arc;

use resvg::tiny_skia::{Pixmap, Transform};

use super::color::Rgba;

/// Horizontal alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Middle,
    End,
}

impl TextAlign {
    fn svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Layout and paint options for one line of text.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub color: Rgba,
    pub align: TextAlign,
    /// Gaussian blur radius; non-zero renders a soft glow pass instead of crisp text.
    pub blur: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 32.0,
            bold: false,
            color: Rgba::WHITE,
            align: TextAlign::Middle,
            blur: 0.0,
        }
    }
}

/// Measured extent of a rasterized line in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub struct TextLayer {
    pub pixmap: Pixmap,
    pub bounds: TextBounds,
}

/// Shared font database plus the line rasterizer.
#[derive(Clone)]
pub struct TextRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::empty()
    }
}

impl TextRenderer {
    /// Renderer with no fonts; every rasterize call yields `None`.
    pub fn empty() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Load the system fonts plus any font files found in `extra_dirs`.
    pub fn with_system_fonts(extra_dirs: &[&Path]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in extra_dirs {
            db.load_fonts_dir(dir);
        }
        log::debug!("text renderer loaded {} font faces", db.len());
        Self {
            fontdb: Arc::new(db),
        }
    }

    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Rasterize `text` with its anchor (vertical centre) at `(x, y)`.
    ///
    /// Returns `None` when nothing would be drawn: empty text, no usable font,
    /// or an SVG that fails to parse.
    pub fn rasterize(
        &self,
        text: &str,
        style: &TextStyle,
        (x, y): (f32, f32),
        (width, height): (u32, u32),
    ) -> Option<TextLayer> {
        if text.trim().is_empty() || self.fontdb.is_empty() || style.font_size <= 0.0 {
            return None;
        }

        let svg = self.build_svg(text, style, (x, y), (width, height));
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..usvg::Options::default()
        };
        let tree = match usvg::Tree::from_str(&svg, &options) {
            Ok(tree) => tree,
            Err(e) => {
                log::debug!("skipping text layer: {e}");
                return None;
            }
        };
        if !tree.root().has_children() {
            return None;
        }

        let bbox = tree.root().abs_bounding_box();
        let bounds = TextBounds {
            x: bbox.x(),
            y: bbox.y(),
            width: bbox.width(),
            height: bbox.height(),
        };

        let mut pixmap = Pixmap::new(width, height)?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Some(TextLayer { pixmap, bounds })
    }

    fn build_svg(
        &self,
        text: &str,
        style: &TextStyle,
        (x, y): (f32, f32),
        (width, height): (u32, u32),
    ) -> String {
        let [r, g, b, _] = style.color.to_rgba8();
        let (defs, filter) = if style.blur > 0.0 {
            (
                format!(
                    r#"<defs><filter id="glow" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="{:.2}"/></filter></defs>"#,
                    style.blur
                ),
                r#" filter="url(#glow)""#,
            )
        } else {
            (String::new(), "")
        };
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{defs}<text x="{x:.2}" y="{y:.2}" font-family="{family}" font-size="{size:.2}" font-weight="{weight}" fill="#{r:02x}{g:02x}{b:02x}" fill-opacity="{alpha:.3}" text-anchor="{anchor}" dominant-baseline="central"{filter}>{body}</text></svg>"##,
            family = escape_xml(&style.font_family),
            size = style.font_size,
            weight = if style.bold { 700 } else { 400 },
            alpha = style.color.a.clamp(0.0, 1.0),
            anchor = style.align.svg_value(),
            body = escape_xml(text),
        )
    }
}

fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("tab\there"), "tabhere");
    }

    #[test]
    fn test_empty_renderer_draws_nothing() {
        let renderer = TextRenderer::empty();
        assert_eq!(renderer.face_count(), 0);
        let layer = renderer.rasterize("hello", &TextStyle::default(), (10.0, 10.0), (64, 64));
        assert!(layer.is_none());
    }

    #[test]
    fn test_svg_contains_glow_filter_only_when_blurred() {
        let renderer = TextRenderer::empty();
        let crisp = renderer.build_svg("x", &TextStyle::default(), (0.0, 0.0), (10, 10));
        assert!(!crisp.contains("feGaussianBlur"));
        let glow = renderer.build_svg(
            "x",
            &TextStyle {
                blur: 4.0,
                ..TextStyle::default()
            },
            (0.0, 0.0),
            (10, 10),
        );
        assert!(glow.contains("feGaussianBlur"));
    }
}
