//! Background compositor.
//!
//! Clears the surface, paints the current slide fitted to the canvas and
//! hosts the transition overlay. With more than one slide and a positive
//! interval the compositor runs a slideshow: each change starts a
//! transition and the slide is swapped once the mask covers the screen.

use std::path::{Path, PathBuf};

use rand::Rng;
use resvg::tiny_skia::{Pixmap, Transform};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{pixmap_from_image, Canvas, Rgba};
use crate::transition::{draw as transition_draw, TransitionEngine, TransitionFrame, TransitionKind};

#[derive(Error, Debug)]
pub enum BackgroundError {
    #[error("failed to load background image {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("background image {0} has zero size")]
    EmptyImage(String),
}

/// How a slide is fitted to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// Whole image visible, letterboxed.
    #[default]
    Contain,
    /// Canvas fully covered, image cropped.
    Cover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub color: Rgba,
    pub fit: FitMode,
    pub images: Vec<PathBuf>,
    /// Seconds between slide changes; 0 disables the slideshow.
    pub slide_interval: f64,
    /// Transition used for slide changes; `None` picks one at random each time.
    pub transition: Option<TransitionKind>,
    /// Base transition duration in seconds.
    pub transition_duration: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            fit: FitMode::default(),
            images: Vec::new(),
            slide_interval: 0.0,
            transition: None,
            transition_duration: 1.0,
        }
    }
}

/// Transform placing an `image_w`×`image_h` image on a `canvas_w`×`canvas_h`
/// surface, centred.
pub fn fit_transform(
    fit: FitMode,
    (image_w, image_h): (f32, f32),
    (canvas_w, canvas_h): (f32, f32),
) -> Transform {
    if image_w <= 0.0 || image_h <= 0.0 {
        return Transform::identity();
    }
    let sx = canvas_w / image_w;
    let sy = canvas_h / image_h;
    let scale = match fit {
        FitMode::Contain => sx.min(sy),
        FitMode::Cover => sx.max(sy),
    };
    let tx = (canvas_w - image_w * scale) * 0.5;
    let ty = (canvas_h - image_h * scale) * 0.5;
    Transform::from_row(scale, 0.0, 0.0, scale, tx, ty)
}

/// Load one image file as a premultiplied pixmap.
pub fn load_slide(path: &Path) -> Result<Pixmap, BackgroundError> {
    let image = image::open(path)
        .map_err(|source| BackgroundError::Load {
            path: path.display().to_string(),
            source,
        })?
        .to_rgba8();
    pixmap_from_image(&image).ok_or_else(|| BackgroundError::EmptyImage(path.display().to_string()))
}

pub struct BackgroundCompositor {
    config: BackgroundConfig,
    slides: Vec<Pixmap>,
    current: usize,
    engine: TransitionEngine,
    last_change: Option<f64>,
    swap_pending: bool,
}

impl BackgroundCompositor {
    /// Build the compositor, loading every configured image once.
    ///
    /// Images that fail to load are logged and dropped.
    pub fn new(config: BackgroundConfig) -> Self {
        let mut compositor = Self {
            engine: TransitionEngine::new(config.transition_duration),
            config,
            slides: Vec::new(),
            current: 0,
            last_change: None,
            swap_pending: false,
        };
        let paths = compositor.config.images.clone();
        for path in &paths {
            compositor.load(path);
        }
        compositor
    }

    /// Try to add a slide from disk; returns whether it was added.
    pub fn load(&mut self, path: &Path) -> bool {
        match load_slide(path) {
            Ok(pixmap) => {
                log::debug!("loaded background {}", path.display());
                self.slides.push(pixmap);
                true
            }
            Err(e) => {
                log::warn!("{e}; continuing without this background");
                false
            }
        }
    }

    pub fn push_slide(&mut self, pixmap: Pixmap) {
        self.slides.push(pixmap);
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn current_slide(&self) -> Option<usize> {
        (!self.slides.is_empty()).then_some(self.current)
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    pub fn transition(&self) -> &TransitionEngine {
        &self.engine
    }

    /// Start a transition that swaps to the next slide once its mask hides
    /// the screen.
    ///
    /// Rejected while another transition is running.
    pub fn start_transition(&mut self, kind: TransitionKind, now: f64) -> bool {
        if !self.engine.start(kind, now) {
            return false;
        }
        self.swap_pending = self.slides.len() > 1;
        self.last_change = Some(now);
        true
    }

    fn next_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> TransitionKind {
        self.config
            .transition
            .unwrap_or_else(|| TransitionKind::random(rng))
    }

    fn advance_slideshow<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) {
        if self.slides.len() < 2 || self.config.slide_interval <= 0.0 || self.engine.is_active() {
            return;
        }
        let Some(last) = self.last_change else {
            self.last_change = Some(now);
            return;
        };
        if now - last >= self.config.slide_interval {
            let kind = self.next_kind(rng);
            self.start_transition(kind, now);
        }
    }

    /// Paint the background for the frame at `now` and return the
    /// transition frame drawn on top of it, if any.
    pub fn compose<R: Rng + ?Sized>(
        &mut self,
        canvas: &mut Canvas,
        now: f64,
        rng: &mut R,
    ) -> Option<TransitionFrame> {
        canvas.reset_state();
        canvas.clear(self.config.color);

        self.advance_slideshow(now, rng);
        let frame = self.engine.frame(now);
        if let Some(frame) = frame {
            if self.swap_pending && frame.raw >= frame.kind.swap_progress() {
                self.current = (self.current + 1) % self.slides.len().max(1);
                self.swap_pending = false;
                log::debug!("background swapped to slide {}", self.current);
            }
        }

        if let Some(slide) = self.slides.get(self.current) {
            let size = (canvas.width() as f32, canvas.height() as f32);
            let transform = fit_transform(
                self.config.fit,
                (slide.width() as f32, slide.height() as f32),
                size,
            );
            canvas.draw_layer_transformed(slide, transform, 1.0, true);
        }

        if let Some(frame) = frame {
            let (w, h) = (canvas.width() as f32, canvas.height() as f32);
            transition_draw::draw(frame.kind, canvas, w, h, frame.eased, rng);
        }
        frame
    }
}
