//! Raster drawing surface.
//!
//! `Canvas` wraps a tiny-skia pixmap with the small set of primitives the
//! designs, transitions and overlays need, plus two pieces of ambient state
//! applied to every primitive:
//!
//! - an optional glow halo drawn beneath the primitive
//! - stroke-outline mode, a thick near-black outline drawn beneath everything
//!
//! Path primitives honour the current transform; pixel operations
//! (`copy_region`, `draw_layer`, `fill_device_rect`) always work in device
//! pixels.

use resvg::tiny_skia::{
    self, BlendMode, ColorU8, FillRule, IntRect, LineCap, LineJoin, Paint, Path, PathBuilder,
    Pixmap, PixmapPaint, Rect, Stroke, Transform,
};
use thiserror::Error;

use super::color::Rgba;

/// Width of the dark outline drawn beneath primitives in outline mode.
const OUTLINE_EXTRA: f32 = 4.0;

#[derive(Error, Debug, PartialEq)]
pub enum CanvasError {
    #[error("invalid canvas size {0}x{1}")]
    InvalidSize(u32, u32),

    #[error("region {0:?} lies outside the canvas")]
    EmptyRegion((i32, i32, i32, i32)),
}

/// Soft halo drawn beneath primitives (the raster equivalent of a shadow blur).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub radius: f32,
}

pub struct Canvas {
    pixmap: Pixmap,
    transform: Transform,
    glow: Option<Glow>,
    outline: bool,
    blend_mode: BlendMode,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let pixmap = Pixmap::new(width, height).ok_or(CanvasError::InvalidSize(width, height))?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            glow: None,
            outline: false,
            blend_mode: BlendMode::SourceOver,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Replace the backing pixmap with a blank one of the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        if width == self.width() && height == self.height() {
            return Ok(());
        }
        self.pixmap = Pixmap::new(width, height).ok_or(CanvasError::InvalidSize(width, height))?;
        Ok(())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Reset per-frame drawing state (transform, glow, outline, blend).
    pub fn reset_state(&mut self) {
        self.transform = Transform::identity();
        self.glow = None;
        self.outline = false;
        self.blend_mode = BlendMode::SourceOver;
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn set_glow(&mut self, glow: Option<Glow>) {
        self.glow = glow.filter(|g| g.radius > 0.0);
    }

    pub fn glow(&self) -> Option<Glow> {
        self.glow
    }

    pub fn set_outline(&mut self, outline: bool) {
        self.outline = outline;
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    // ------------------------------------------------------------------
    // Path primitives
    // ------------------------------------------------------------------

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
        let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
        if let Some(path) = Rect::from_xywh(x, y, w.max(0.5), h.max(0.5)).map(PathBuilder::from_rect) {
            self.fill_path(&path, color);
        }
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgba) {
        if let Some(path) = Rect::from_xywh(x, y, w.max(0.5), h.max(0.5)).map(PathBuilder::from_rect) {
            self.stroke_path(&path, width, color);
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius.max(0.25)) {
            self.fill_path(&path, color);
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, width: f32, color: Rgba) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius.max(0.25)) {
            self.stroke_path(&path, width, color);
        }
    }

    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Rgba) {
        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        if let Some(path) = pb.finish() {
            self.stroke_path(&path, width, color);
        }
    }

    pub fn polyline(&mut self, points: &[(f32, f32)], width: f32, color: Rgba, closed: bool) {
        if let Some(path) = polygon_path(points, closed) {
            self.stroke_path(&path, width, color);
        }
    }

    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgba) {
        if let Some(path) = polygon_path(points, true) {
            self.fill_path(&path, color);
        }
    }

    /// Fill several closed outlines as one even-odd path, so inner outlines cut holes.
    pub fn fill_compound(&mut self, outlines: &[Vec<(f32, f32)>], color: Rgba) {
        let mut pb = PathBuilder::new();
        for outline in outlines {
            let Some((first, rest)) = outline.split_first() else {
                continue;
            };
            pb.move_to(first.0, first.1);
            for &(x, y) in rest {
                pb.line_to(x, y);
            }
            pb.close();
        }
        if let Some(path) = pb.finish() {
            let paint = self.paint(color);
            self.pixmap
                .fill_path(&path, &paint, FillRule::EvenOdd, self.transform, None);
        }
    }

    pub fn fill_path(&mut self, path: &Path, color: Rgba) {
        if self.outline {
            self.raw_stroke(path, OUTLINE_EXTRA, Rgba::OUTLINE);
        }
        if let Some(glow) = self.glow {
            self.raw_stroke(path, glow.radius, glow.color.fade(0.25));
            self.raw_stroke(path, glow.radius * 0.5, glow.color.fade(0.35));
        }
        let paint = self.paint(color);
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, self.transform, None);
    }

    pub fn stroke_path(&mut self, path: &Path, width: f32, color: Rgba) {
        if self.outline {
            self.raw_stroke(path, width + OUTLINE_EXTRA * 2.0, Rgba::OUTLINE);
        }
        if let Some(glow) = self.glow {
            self.raw_stroke(path, width + glow.radius, glow.color.fade(0.18));
            self.raw_stroke(path, width + glow.radius * 0.5, glow.color.fade(0.3));
        }
        self.raw_stroke(path, width, color);
    }

    fn raw_stroke(&mut self, path: &Path, width: f32, color: Rgba) {
        let paint = self.paint(color);
        let stroke = Stroke {
            width: width.max(0.1),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, self.transform, None);
    }

    fn paint(&self, color: Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        paint.blend_mode = self.blend_mode;
        paint
    }

    // ------------------------------------------------------------------
    // Device-space pixel operations
    // ------------------------------------------------------------------

    /// Fill a rectangle in device pixels, ignoring transform, glow and outline.
    pub fn fill_device_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let Some(rect) = Rect::from_xywh(x, y, w.max(0.5), h.max(0.5)) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.blend_mode = self.blend_mode;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Copy a device-space region of the current frame onto itself at an offset.
    ///
    /// The region is first cloned into its own buffer, so overlapping source
    /// and destination never read pixels that were already overwritten.
    pub fn copy_region(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        dx: i32,
        dy: i32,
    ) -> Result<(), CanvasError> {
        let region = self.clip_region(x, y, w, h)?;
        let buffer = self
            .pixmap
            .clone_rect(region)
            .ok_or(CanvasError::EmptyRegion((x, y, w, h)))?;
        self.pixmap.draw_pixmap(
            region.x() + dx,
            region.y() + dy,
            buffer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    fn clip_region(&self, x: i32, y: i32, w: i32, h: i32) -> Result<IntRect, CanvasError> {
        let left = x.max(0);
        let top = y.max(0);
        let right = (x + w).min(self.width() as i32);
        let bottom = (y + h).min(self.height() as i32);
        if right <= left || bottom <= top {
            return Err(CanvasError::EmptyRegion((x, y, w, h)));
        }
        IntRect::from_ltrb(left, top, right, bottom).ok_or(CanvasError::EmptyRegion((x, y, w, h)))
    }

    /// Copy of the current frame's pixels.
    pub fn snapshot(&self) -> Pixmap {
        self.pixmap.clone()
    }

    /// Composite another pixmap at a device offset.
    pub fn draw_layer(&mut self, layer: &Pixmap, dx: i32, dy: i32, opacity: f32, blend_mode: BlendMode) {
        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            blend_mode,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(dx, dy, layer.as_ref(), &paint, Transform::identity(), None);
    }

    /// Composite another pixmap through an arbitrary transform.
    ///
    /// `smooth` selects bilinear filtering (backgrounds) over nearest
    /// neighbour (blocky noise layers).
    pub fn draw_layer_transformed(
        &mut self,
        layer: &Pixmap,
        transform: Transform,
        opacity: f32,
        smooth: bool,
    ) {
        let quality = if smooth {
            tiny_skia::FilterQuality::Bilinear
        } else {
            tiny_skia::FilterQuality::Nearest
        };
        let paint = PixmapPaint {
            opacity: opacity.clamp(0.0, 1.0),
            quality,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, layer.as_ref(), &paint, transform, None);
    }

    /// Straight-alpha colour of one device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba {
            r: c.red() as f32 / 255.0,
            g: c.green() as f32 / 255.0,
            b: c.blue() as f32 / 255.0,
            a: c.alpha() as f32 / 255.0,
        })
    }

    /// Demultiplied RGBA copy of the surface.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut raw = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            raw.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image::RgbaImage::from_raw(self.width(), self.height(), raw)
            .unwrap_or_else(|| image::RgbaImage::new(self.width(), self.height()))
    }
}

/// Convert a straight-alpha image into a premultiplied pixmap.
pub fn pixmap_from_image(image: &image::RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Points approximating a circle, for compound fills.
pub fn circle_points(cx: f32, cy: f32, radius: f32, segments: usize) -> Vec<(f32, f32)> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * std::f32::consts::TAU;
            (cx + a.cos() * radius, cy + a.sin() * radius)
        })
        .collect()
}

fn polygon_path(points: &[(f32, f32)], closed: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_size() {
        assert!(matches!(Canvas::new(0, 10), Err(CanvasError::InvalidSize(0, 10))));
    }

    #[test]
    fn test_fill_rect_writes_pixels() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.clear(Rgba::BLACK);
        canvas.fill_rect(5.0, 5.0, 10.0, 10.0, Rgba::WHITE);
        let c = canvas.pixel(10, 10).unwrap();
        assert!(c.r > 0.99);
        assert!(canvas.pixel(1, 1).unwrap().r < 0.01);
    }

    #[test]
    fn test_copy_region_moves_pixels() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.clear(Rgba::BLACK);
        canvas.fill_device_rect(0.0, 0.0, 4.0, 4.0, Rgba::WHITE);
        canvas.copy_region(0, 0, 4, 4, 10, 10).unwrap();
        assert!(canvas.pixel(12, 12).unwrap().r > 0.99);
        assert!(canvas.pixel(2, 2).unwrap().r > 0.99);
    }

    #[test]
    fn test_copy_region_outside_is_error() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        assert!(canvas.copy_region(30, 30, 5, 5, 1, 1).is_err());
    }

    #[test]
    fn test_outline_draws_dark_border() {
        let mut canvas = Canvas::new(40, 40).unwrap();
        canvas.clear(Rgba::WHITE);
        canvas.set_outline(true);
        canvas.fill_rect(10.0, 10.0, 20.0, 20.0, Rgba::rgb(1.0, 0.0, 0.0));
        // Just outside the filled area the outline darkens the white background.
        let edge = canvas.pixel(9, 20).unwrap();
        assert!(edge.g < 0.5);
    }

    #[test]
    fn test_compound_fill_cuts_hole() {
        let mut canvas = Canvas::new(40, 40).unwrap();
        canvas.clear(Rgba::WHITE);
        let outer = vec![(0.0, 0.0), (40.0, 0.0), (40.0, 40.0), (0.0, 40.0)];
        let hole = circle_points(20.0, 20.0, 10.0, 32);
        canvas.fill_compound(&[outer, hole], Rgba::BLACK);
        assert!(canvas.pixel(20, 20).unwrap().r > 0.99);
        assert!(canvas.pixel(2, 2).unwrap().r < 0.01);
    }

    #[test]
    fn test_image_round_trip() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.clear(Rgba::rgb(0.0, 1.0, 0.0));
        let image = canvas.to_rgba_image();
        assert_eq!(image.get_pixel(0, 0).0, [0, 255, 0, 255]);
        let pixmap = pixmap_from_image(&image).unwrap();
        assert_eq!(pixmap.width(), 4);
    }
}
