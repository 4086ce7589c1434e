//! Frame scheduling.
//!
//! The scheduler owns the pipeline, the frequency source, the playback
//! clock and the frame counter. Ticks come from an abstract [`TickSource`]
//! so the same loop runs against a display refresh, a fixed offline frame
//! rate or hand-fed times in tests.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::{FrameInfo, FrequencySource, Pipeline, PlaybackClock};
use crate::render::Canvas;

/// Delay before the single deferred tick that renders the paused frame.
pub const PAUSE_SETTLE_DELAY: f64 = 0.05;

/// Supplies tick times in seconds, in increasing order.
pub trait TickSource {
    /// Time of the next tick, or `None` when the source is exhausted.
    fn next_tick(&mut self) -> Option<f64>;
}

/// Ticks pushed by hand, for tests and host callbacks.
#[derive(Debug, Clone, Default)]
pub struct ManualTicks {
    queue: VecDeque<f64>,
}

impl ManualTicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: f64) {
        self.queue.push_back(time);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl FromIterator<f64> for ManualTicks {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

impl TickSource for ManualTicks {
    fn next_tick(&mut self) -> Option<f64> {
        self.queue.pop_front()
    }
}

/// Evenly spaced ticks at `fps`, for offline rendering.
#[derive(Debug, Clone)]
pub struct FixedStepTicks {
    fps: f64,
    next: u64,
    total: Option<u64>,
}

impl FixedStepTicks {
    /// `total` bounds the number of ticks; `None` runs forever.
    pub fn new(fps: f64, total: Option<u64>) -> Self {
        Self {
            fps: fps.max(1.0),
            next: 0,
            total,
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}

impl TickSource for FixedStepTicks {
    fn next_tick(&mut self) -> Option<f64> {
        if self.total.is_some_and(|total| self.next >= total) {
            return None;
        }
        let time = self.next as f64 / self.fps;
        self.next += 1;
        Some(time)
    }
}

/// Wall-clock ticks at `fps`, sleeping until each frame is due.
#[derive(Debug, Clone)]
pub struct RealtimeTicks {
    interval: Duration,
    start: Option<Instant>,
    next: u32,
    limit: Option<Duration>,
}

impl RealtimeTicks {
    pub fn new(fps: f64, limit: Option<Duration>) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / fps.max(1.0)),
            start: None,
            next: 0,
            limit,
        }
    }
}

impl TickSource for RealtimeTicks {
    fn next_tick(&mut self) -> Option<f64> {
        let start = *self.start.get_or_insert_with(Instant::now);
        let due = self.interval.saturating_mul(self.next);
        if self.limit.is_some_and(|limit| due > limit) {
            return None;
        }
        let elapsed = start.elapsed();
        if due > elapsed {
            std::thread::sleep(due - elapsed);
        }
        self.next = self.next.saturating_add(1);
        Some(start.elapsed().as_secs_f64())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayState {
    Playing,
    /// `settle_at` is the deferred tick still owed, if any.
    Paused { settle_at: Option<f64> },
}

pub struct Scheduler<S, C> {
    pipeline: Pipeline,
    source: S,
    clock: C,
    frame_index: u64,
    state: PlayState,
}

impl<S: FrequencySource, C: PlaybackClock> Scheduler<S, C> {
    /// New scheduler, paused with nothing owed.
    pub fn new(pipeline: Pipeline, source: S, clock: C) -> Self {
        Self {
            pipeline,
            source,
            clock,
            frame_index: 0,
            state: PlayState::Paused { settle_at: None },
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn play(&mut self) {
        self.state = PlayState::Playing;
    }

    /// Stop scheduling and owe one tick at `now + PAUSE_SETTLE_DELAY`.
    pub fn pause(&mut self, now: f64) {
        if self.is_playing() {
            self.state = PlayState::Paused {
                settle_at: Some(now + PAUSE_SETTLE_DELAY),
            };
        }
    }

    /// Handle the tick at `now`.
    ///
    /// Every rendered tick consumes the next frame index. While paused only
    /// the owed settle tick renders.
    pub fn step(&mut self, now: f64) -> Option<FrameInfo> {
        match self.state {
            PlayState::Playing => Some(self.render(now)),
            PlayState::Paused {
                settle_at: Some(due),
            } if now >= due => {
                self.state = PlayState::Paused { settle_at: None };
                Some(self.render(now))
            }
            PlayState::Paused { .. } => None,
        }
    }

    fn render(&mut self, now: f64) -> FrameInfo {
        let info = self
            .pipeline
            .tick(self.frame_index, now, &mut self.source, &self.clock);
        self.frame_index += 1;
        info
    }

    /// Drain `ticks`, calling `on_frame` after every rendered frame.
    ///
    /// Stops early when `on_frame` returns `false`. Returns the number of
    /// frames rendered.
    pub fn run<T, F>(&mut self, ticks: &mut T, mut on_frame: F) -> u64
    where
        T: TickSource + ?Sized,
        F: FnMut(&FrameInfo, &Canvas) -> bool,
    {
        let mut rendered = 0;
        while let Some(now) = ticks.next_tick() {
            let Some(info) = self.step(now) else {
                continue;
            };
            rendered += 1;
            if !on_frame(&info, self.pipeline.canvas()) {
                break;
            }
        }
        rendered
    }
}
