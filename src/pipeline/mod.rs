//! Per-frame render pipeline.
//!
//! One [`Pipeline::tick`] runs every stage in order: pull the snapshot,
//! condition it, detect the beat, paint the background (and any running
//! transition), dispatch the selected design, update the particle system
//! and finally draw the text overlays. Missing inputs skip only the stage
//! that needs them; a tick never fails.

mod config;
pub mod scheduler;

pub use config::{ConfigError, EffectTransform, VisualizerConfig, MAX_DIMENSION};
pub use scheduler::{
    FixedStepTicks, ManualTicks, PlayState, RealtimeTicks, Scheduler, TickSource,
    PAUSE_SETTLE_DELAY,
};

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use resvg::tiny_skia::Transform;

use crate::background::BackgroundCompositor;
use crate::designs::{create_design, Design, DesignType, EffectContext, Palette, VisualizationParams};
use crate::effects::ParticleSystem;
use crate::overlay::{OverlayConfig, OverlayError, OverlayFrame, OverlayRenderer, SubtitleTrack};
use crate::render::{Canvas, CanvasError, TextRenderer};
use crate::signal::{condition, BeatDetector};
use crate::transition::{TransitionFrame, TransitionKind};

/// Errors raised while building or reconfiguring a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Subtitle error: {0}")]
    Overlay(#[from] OverlayError),
}

/// Pull-based accessor for the latest frequency snapshot.
///
/// `None` means no audio is loaded; the pipeline then skips design dispatch.
pub trait FrequencySource {
    fn snapshot(&mut self) -> Option<&[u8]>;
}

/// Read-only playback position in seconds, consumed by the overlays.
pub trait PlaybackClock {
    fn current_time(&self) -> f64;
}

/// Clock set explicitly by the host or a test.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    time: f64,
}

impl ManualClock {
    pub fn new(time: f64) -> Self {
        Self { time }
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }
}

impl PlaybackClock for ManualClock {
    fn current_time(&self) -> f64 {
        self.time
    }
}

/// Summary of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub frame_index: u64,
    /// Tick time in seconds.
    pub time: f64,
    pub beat: bool,
    pub bass_energy: f32,
    /// Whether a design drew this frame.
    pub dispatched: bool,
    pub transition: Option<TransitionFrame>,
}

/// Zoom about the centre followed by a pan, in canvas pixels.
pub fn effect_transform(effect: &EffectTransform, width: f32, height: f32) -> Transform {
    let (cx, cy) = (width * 0.5, height * 0.5);
    Transform::from_translate(cx + effect.offset_x * width, cy + effect.offset_y * height)
        .pre_scale(effect.scale, effect.scale)
        .pre_translate(-cx, -cy)
}

pub struct Pipeline {
    config: VisualizerConfig,
    canvas: Canvas,
    beat: BeatDetector,
    design: Box<dyn Design>,
    particles: ParticleSystem,
    background: BackgroundCompositor,
    overlay: OverlayRenderer,
    subtitles: Option<SubtitleTrack>,
    rng: StdRng,
    pending_resize: Option<(u32, u32)>,
    snapshot_len: Option<usize>,
}

impl Pipeline {
    /// Build a pipeline without fonts; text overlays stay blank until
    /// [`Pipeline::set_text_renderer`] provides some.
    pub fn new(config: VisualizerConfig) -> Result<Self, PipelineError> {
        Self::with_text_renderer(config, TextRenderer::empty())
    }

    pub fn with_text_renderer(
        config: VisualizerConfig,
        text: TextRenderer,
    ) -> Result<Self, PipelineError> {
        let config = config.validate()?;
        let canvas = Canvas::new(config.width, config.height)?;
        log::info!(
            "pipeline {}x{} with design {}",
            config.width,
            config.height,
            config.design.name()
        );
        Ok(Self {
            canvas,
            beat: BeatDetector::new(),
            design: create_design(config.design),
            particles: ParticleSystem::new(),
            background: BackgroundCompositor::new(config.background.clone()),
            overlay: OverlayRenderer::new(text),
            subtitles: None,
            rng: StdRng::seed_from_u64(config.seed),
            pending_resize: None,
            snapshot_len: None,
            config,
        })
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn design(&self) -> &dyn Design {
        self.design.as_ref()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn background(&self) -> &BackgroundCompositor {
        &self.background
    }

    /// Snapshot length recorded for this session, once the first snapshot arrived.
    pub fn snapshot_len(&self) -> Option<usize> {
        self.snapshot_len
    }

    /// Switch designs; particles and all per-design state are dropped.
    pub fn set_design(&mut self, design: DesignType) {
        log::info!(
            "switching design {} -> {}",
            self.config.design.name(),
            design.name()
        );
        self.config.design = design;
        self.design = create_design(design);
        self.particles.clear();
    }

    pub fn set_palette(&mut self, palette: crate::designs::PaletteKind) {
        self.config.palette = palette;
    }

    pub fn set_overlay(&mut self, overlay: OverlayConfig) {
        self.config.overlay = overlay;
    }

    pub fn set_text_renderer(&mut self, text: TextRenderer) {
        self.overlay = OverlayRenderer::new(text);
    }

    pub fn set_subtitles(&mut self, track: Option<SubtitleTrack>) {
        self.subtitles = track;
    }

    pub fn load_subtitles(&mut self, path: impl AsRef<Path>) -> Result<usize, PipelineError> {
        let track = SubtitleTrack::load_lrc(path)?;
        let lines = track.len();
        self.subtitles = Some(track);
        Ok(lines)
    }

    /// Start a background transition at tick time `now`.
    pub fn start_transition(&mut self, kind: TransitionKind, now: f64) -> bool {
        self.background.start_transition(kind, now)
    }

    /// Queue a surface resize; it takes effect at the start of the next tick.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pending_resize = Some((width, height));
    }

    fn apply_resize(&mut self) {
        let Some((width, height)) = self.pending_resize.take() else {
            return;
        };
        match self.canvas.resize(width, height) {
            Ok(()) => {
                log::info!("canvas resized to {width}x{height}");
                self.config.width = width;
                self.config.height = height;
            }
            Err(e) => log::warn!("ignoring resize to {width}x{height}: {e}"),
        }
    }

    /// Pull and condition the snapshot, enforcing a fixed length per session.
    fn pull_signal(&mut self, source: &mut dyn FrequencySource) -> Option<Vec<f32>> {
        let raw = source.snapshot()?;
        match self.snapshot_len {
            None => self.snapshot_len = Some(raw.len()),
            Some(len) if len != raw.len() => {
                log::warn!(
                    "snapshot length changed from {len} to {}; skipping frame",
                    raw.len()
                );
                return None;
            }
            Some(_) => {}
        }
        Some(condition(raw, &self.config.conditioner))
    }

    /// Render one frame.
    ///
    /// `now` is the tick time driving transitions and slideshows; the
    /// overlays read the playback clock instead.
    pub fn tick(
        &mut self,
        frame_index: u64,
        now: f64,
        source: &mut dyn FrequencySource,
        clock: &dyn PlaybackClock,
    ) -> FrameInfo {
        self.apply_resize();

        let signal = self.pull_signal(source);
        let (beat, bass_energy) = match &signal {
            Some(s) => (self.beat.detect(s), self.beat.bass_energy(s)),
            None => (false, 0.0),
        };

        let transition = self.background.compose(&mut self.canvas, now, &mut self.rng);

        let (width, height) = (self.canvas.width(), self.canvas.height());
        self.canvas.reset_state();
        if !self.config.design.ignores_transform() && !self.config.effect.is_identity() {
            self.canvas.set_transform(effect_transform(
                &self.config.effect,
                width as f32,
                height as f32,
            ));
        }

        if let Some(signal) = &signal {
            let params = VisualizationParams {
                width,
                height,
                frame_index,
                time: now,
                sensitivity: self.config.sensitivity,
                palette: Palette::preset(self.config.palette).at_frame(frame_index),
                beat,
                stroke_outline: self.config.stroke_outline,
            };
            self.canvas.set_outline(params.stroke_outline);
            let mut fx = EffectContext {
                particles: &mut self.particles,
                rng: &mut self.rng,
            };
            self.design.draw(&mut self.canvas, signal, &params, &mut fx);
            self.canvas.set_glow(None);
        }

        self.particles.advance();
        self.particles.cull(height as f32);
        self.particles.draw(&mut self.canvas);

        let frame = OverlayFrame {
            time: clock.current_time(),
            beat,
            bass_energy,
        };
        self.overlay.draw(
            &mut self.canvas,
            &self.config.overlay,
            self.subtitles.as_ref(),
            &frame,
            &mut self.rng,
        );

        FrameInfo {
            frame_index,
            time: now,
            beat,
            bass_energy,
            dispatched: signal.is_some(),
            transition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<u8>);

    impl FrequencySource for Fixed {
        fn snapshot(&mut self) -> Option<&[u8]> {
            Some(&self.0)
        }
    }

    fn small_config() -> VisualizerConfig {
        VisualizerConfig {
            width: 64,
            height: 48,
            ..VisualizerConfig::default()
        }
    }

    #[test]
    fn test_effect_transform_identity_and_zoom() {
        let identity = effect_transform(&EffectTransform::default(), 100.0, 50.0);
        assert_eq!(identity, Transform::identity());

        let zoom = effect_transform(
            &EffectTransform {
                scale: 2.0,
                ..EffectTransform::default()
            },
            100.0,
            50.0,
        );
        // The centre stays put.
        let mut p = [resvg::tiny_skia::Point::from_xy(50.0, 25.0)];
        zoom.map_points(&mut p);
        assert!((p[0].x - 50.0).abs() < 1e-4 && (p[0].y - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_snapshot_length_mismatch_skips_dispatch() {
        let mut pipeline = Pipeline::new(small_config()).unwrap();
        let clock = ManualClock::default();
        let info = pipeline.tick(0, 0.0, &mut Fixed(vec![0; 64]), &clock);
        assert!(info.dispatched);
        assert_eq!(pipeline.snapshot_len(), Some(64));

        let info = pipeline.tick(1, 0.1, &mut Fixed(vec![0; 32]), &clock);
        assert!(!info.dispatched);
        assert_eq!(pipeline.snapshot_len(), Some(64));
    }

    #[test]
    fn test_loud_bass_reports_beat() {
        let mut pipeline = Pipeline::new(small_config()).unwrap();
        let info = pipeline.tick(0, 0.0, &mut Fixed(vec![255; 64]), &ManualClock::default());
        assert!(info.beat);
        assert!((info.bass_energy - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_resize_is_ignored() {
        let mut pipeline = Pipeline::new(small_config()).unwrap();
        pipeline.resize(0, 0);
        pipeline.tick(0, 0.0, &mut Fixed(vec![0; 16]), &ManualClock::default());
        assert_eq!(pipeline.canvas().width(), 64);
    }
}
