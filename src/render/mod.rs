//! CPU raster rendering.
//!
//! This module provides:
//! - `Canvas`, the tiny-skia backed drawing surface shared by every stage
//! - Colour helpers (HSL, hex parsing)
//! - Single-line text rasterization via usvg/resvg

pub mod canvas;
pub mod color;
pub mod text;

pub use canvas::{circle_points, pixmap_from_image, Canvas, CanvasError, Glow};
pub use color::{parse_hex_color, Rgba};
pub use text::{TextAlign, TextBounds, TextLayer, TextRenderer, TextStyle};
