//! Timed full-screen transitions masking a background swap.
//!
//! The engine is a two-state machine (`Idle` / `Active`). While active,
//! raw progress is `elapsed / duration(kind)` clamped to `[0, 1]`; each kind
//! then eases that value with its own curve before its draw routine in
//! [`draw`] renders the mask. Every mask hides the whole screen for a
//! stretch of its cycle; [`TransitionKind::swap_progress`] marks where that
//! stretch begins, which is when the background should be swapped.

pub mod draw;

use std::f32::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::render::Canvas;

/// Eased progress at which a closing mask is swapped behind.
const SWAP_EASED: f32 = 0.4;
/// Eased progress at which a peaking mask is swapped behind.
const PEAK_SWAP: f32 = 0.9;

/// Available transition effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    Fade,
    WipeLeft,
    WipeRight,
    WipeUp,
    WipeDown,
    CircleOpen,
    CircleClose,
    Spiral,
    Wave,
    Diamond,
    Blinds,
    Checkerboard,
    Pixels,
    Static,
}

impl TransitionKind {
    pub fn all() -> &'static [Self] {
        &[
            Self::Fade,
            Self::WipeLeft,
            Self::WipeRight,
            Self::WipeUp,
            Self::WipeDown,
            Self::CircleOpen,
            Self::CircleClose,
            Self::Spiral,
            Self::Wave,
            Self::Diamond,
            Self::Blinds,
            Self::Checkerboard,
            Self::Pixels,
            Self::Static,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::WipeLeft => "wipe-left",
            Self::WipeRight => "wipe-right",
            Self::WipeUp => "wipe-up",
            Self::WipeDown => "wipe-down",
            Self::CircleOpen => "circle-open",
            Self::CircleClose => "circle-close",
            Self::Spiral => "spiral",
            Self::Wave => "wave",
            Self::Diamond => "diamond",
            Self::Blinds => "blinds",
            Self::Checkerboard => "checkerboard",
            Self::Pixels => "pixels",
            Self::Static => "static",
        }
    }

    /// Pick a kind uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let all = Self::all();
        all[rng.random_range(0..all.len())]
    }

    /// Multiplier applied to the configured base duration.
    pub fn duration_scale(&self) -> f64 {
        match self {
            Self::Static => 0.6,
            Self::Checkerboard | Self::Pixels | Self::Spiral => 1.25,
            _ => 1.0,
        }
    }

    /// Map raw progress `t` in `[0, 1]` through this kind's easing curve.
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Fade | Self::Wave | Self::Spiral => (t * PI).sin().max(0.0),
            Self::WipeLeft | Self::WipeRight | Self::WipeUp | Self::WipeDown => {
                1.0 - (1.0 - t).powi(3)
            }
            Self::CircleOpen | Self::CircleClose | Self::Diamond => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::Blinds | Self::Checkerboard | Self::Pixels => t,
            Self::Static => {
                // Flicker fades out towards the peak.
                let base = (t * PI).sin();
                let flicker = (t * PI * 24.0).sin() * 0.15;
                (base + flicker * (1.0 - base)).clamp(0.0, 1.0)
            }
        }
    }

    /// Whether eased progress rises to 1 mid-cycle and falls back, rather
    /// than running from 0 to 1.
    pub fn peaks_mid_cycle(&self) -> bool {
        matches!(self, Self::Fade | Self::Wave | Self::Spiral | Self::Static)
    }

    /// Raw progress at which the mask first hides the whole screen.
    pub fn swap_progress(&self) -> f32 {
        match self {
            Self::Fade | Self::Wave | Self::Spiral | Self::Static => PEAK_SWAP.asin() / PI,
            Self::WipeLeft | Self::WipeRight | Self::WipeUp | Self::WipeDown => {
                1.0 - (1.0 - SWAP_EASED).cbrt()
            }
            Self::CircleOpen | Self::CircleClose | Self::Diamond => (SWAP_EASED / 2.0).sqrt(),
            Self::Blinds | Self::Checkerboard | Self::Pixels => SWAP_EASED,
        }
    }

    /// Whether the draw routine consumes randomness.
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Self::Pixels | Self::Static)
    }
}

/// Engine state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    Idle,
    Active { kind: TransitionKind, started_at: f64 },
}

/// One frame's view of the running transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    pub kind: TransitionKind,
    /// Clamped linear progress.
    pub raw: f32,
    /// Progress after the kind's easing curve.
    pub eased: f32,
}

#[derive(Debug, Clone)]
pub struct TransitionEngine {
    state: TransitionState,
    base_duration: f64,
}

impl TransitionEngine {
    pub fn new(base_duration: f64) -> Self {
        Self {
            state: TransitionState::Idle,
            base_duration: base_duration.max(0.01),
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TransitionState::Active { .. })
    }

    pub fn set_base_duration(&mut self, seconds: f64) {
        self.base_duration = seconds.max(0.01);
    }

    pub fn duration(&self, kind: TransitionKind) -> f64 {
        self.base_duration * kind.duration_scale()
    }

    /// Begin a transition at `now` (seconds).
    ///
    /// A request while another transition is running is rejected and the
    /// running one continues untouched.
    pub fn start(&mut self, kind: TransitionKind, now: f64) -> bool {
        if let TransitionState::Active { kind: running, .. } = self.state {
            log::debug!(
                "ignoring {} transition request, {} still running",
                kind.name(),
                running.name()
            );
            return false;
        }
        log::debug!("starting {} transition", kind.name());
        self.state = TransitionState::Active {
            kind,
            started_at: now,
        };
        true
    }

    /// Clamped linear progress at `now`, or `None` while idle.
    pub fn raw_progress(&self, now: f64) -> Option<f32> {
        match self.state {
            TransitionState::Idle => None,
            TransitionState::Active { kind, started_at } => {
                let elapsed = (now - started_at).max(0.0);
                Some((elapsed / self.duration(kind)).clamp(0.0, 1.0) as f32)
            }
        }
    }

    /// Progress for this frame; returns to `Idle` once progress reaches 1.
    ///
    /// The final frame (progress exactly 1) is still reported so callers can
    /// finish any swap before the engine goes idle.
    pub fn frame(&mut self, now: f64) -> Option<TransitionFrame> {
        let TransitionState::Active { kind, .. } = self.state else {
            return None;
        };
        let raw = self.raw_progress(now).unwrap_or(1.0);
        if raw >= 1.0 {
            self.state = TransitionState::Idle;
        }
        Some(TransitionFrame {
            kind,
            raw,
            eased: kind.ease(raw),
        })
    }

    /// Abort any running transition.
    pub fn cancel(&mut self) {
        self.state = TransitionState::Idle;
    }

    /// Advance and draw in one step.
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        canvas: &mut Canvas,
        now: f64,
        rng: &mut R,
    ) -> Option<TransitionFrame> {
        let frame = self.frame(now)?;
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        draw::draw(frame.kind, canvas, w, h, frame.eased, rng);
        Some(frame)
    }
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new(1.0)
    }
}
