//! Timed subtitle / lyric track and its two presentation modes.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{draw_styled_text, OverlayError, TextEffects};
use crate::render::{Canvas, Rgba, TextAlign, TextRenderer, TextStyle};

/// Lines shown before and after the current one in scroll mode.
pub const SCROLL_BEFORE: usize = 5;
pub const SCROLL_AFTER: usize = 4;
/// Font scale of the current line in scroll mode.
pub const CURRENT_LINE_SCALE: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub timestamp_seconds: f64,
    pub text: String,
}

/// Time-ordered, immutable sequence of subtitles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtitleTrack {
    lines: Vec<Subtitle>,
}

impl SubtitleTrack {
    /// Build a track; entries are sorted by timestamp (stable for ties).
    pub fn new(mut lines: Vec<Subtitle>) -> Self {
        lines.sort_by(|a, b| a.timestamp_seconds.total_cmp(&b.timestamp_seconds));
        Self { lines }
    }

    pub fn load_lrc(path: impl AsRef<Path>) -> Result<Self, OverlayError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| OverlayError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse_lrc(&raw)
    }

    /// Parse LRC text: `[mm:ss.xx]` stamps (several per line allowed);
    /// metadata tags such as `[ar:...]` are skipped.
    pub fn parse_lrc(input: &str) -> Result<Self, OverlayError> {
        let mut lines = Vec::new();
        for raw_line in input.lines() {
            let (stamps, text) = split_stamps(raw_line.trim());
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            for timestamp_seconds in stamps {
                lines.push(Subtitle {
                    timestamp_seconds,
                    text: text.to_string(),
                });
            }
        }
        if lines.is_empty() {
            return Err(OverlayError::NoTimedLines);
        }
        Ok(Self::new(lines))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Subtitle] {
        &self.lines
    }

    /// Index of the latest subtitle whose timestamp is `<= time`.
    pub fn current_index(&self, time: f64) -> Option<usize> {
        let idx = self.lines.partition_point(|l| l.timestamp_seconds <= time);
        idx.checked_sub(1)
    }

    pub fn current(&self, time: f64) -> Option<&Subtitle> {
        self.current_index(time).map(|i| &self.lines[i])
    }

    /// Lines visible in scroll mode at `time`, in display order.
    ///
    /// Before the first timestamp there is no current line and only the
    /// upcoming lines are listed.
    pub fn scroll_window(&self, time: f64) -> Vec<(usize, LineRole)> {
        match self.current_index(time) {
            Some(current) => {
                let first = current.saturating_sub(SCROLL_BEFORE);
                let last = (current + SCROLL_AFTER).min(self.lines.len() - 1);
                (first..=last)
                    .map(|i| {
                        let role = match i.cmp(&current) {
                            std::cmp::Ordering::Less => LineRole::Past,
                            std::cmp::Ordering::Equal => LineRole::Current,
                            std::cmp::Ordering::Greater => LineRole::Future,
                        };
                        (i, role)
                    })
                    .collect()
            }
            None => (0..SCROLL_AFTER.min(self.lines.len()))
                .map(|i| (i, LineRole::Future))
                .collect(),
        }
    }
}

/// Position of a line relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Past,
    Current,
    Future,
}

impl LineRole {
    fn opacity(self) -> f32 {
        match self {
            Self::Past => 0.35,
            Self::Current => 1.0,
            Self::Future => 0.55,
        }
    }
}

fn split_stamps(line: &str) -> (Vec<f64>, &str) {
    let mut rest = line;
    let mut stamps = Vec::new();
    while let Some(after_open) = rest.strip_prefix('[') {
        let Some(close) = after_open.find(']') else {
            break;
        };
        if let Some(ts) = parse_stamp(&after_open[..close]) {
            stamps.push(ts);
        }
        rest = &after_open[close + 1..];
    }
    (stamps, rest)
}

/// `mm:ss`, `mm:ss.xx` or `hh:mm:ss.xx`; metadata tags yield `None`.
fn parse_stamp(token: &str) -> Option<f64> {
    if token.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let seconds = |s: &str| s.replace(',', ".").parse::<f64>().ok();
    let parts: Vec<&str> = token.split(':').collect();
    match parts.as_slice() {
        [m, s] => Some(m.parse::<u32>().ok()? as f64 * 60.0 + seconds(s)?),
        [h, m, s] => {
            let hours = h.parse::<u32>().ok()? as f64;
            let minutes = m.parse::<u32>().ok()? as f64;
            Some(hours * 3600.0 + minutes * 60.0 + seconds(s)?)
        }
        _ => None,
    }
}

/// Which lyric presentation is active. The two modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubtitleMode {
    Off,
    #[default]
    Classic,
    Scroll,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleStyle {
    pub font_family: String,
    pub font_size: f32,
    pub color: Rgba,
    /// Colour of the current line in scroll mode.
    pub accent: Rgba,
    /// Background plate behind each line.
    pub plate: Option<Rgba>,
    pub glow: bool,
    /// Beat-gated chromatic glitch.
    pub glitch: bool,
    /// Vertical centre of the scroll block as a fraction of height.
    pub scroll_position: f32,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 36.0,
            color: Rgba::WHITE,
            accent: Rgba::rgb(1.0, 0.85, 0.3),
            plate: None,
            glow: false,
            glitch: false,
            scroll_position: 0.5,
        }
    }
}

impl SubtitleStyle {
    fn text_style(&self, size: f32, color: Rgba) -> TextStyle {
        TextStyle {
            font_family: self.font_family.clone(),
            font_size: size,
            bold: true,
            color,
            align: TextAlign::Middle,
            blur: 0.0,
        }
    }

    fn effects(&self) -> TextEffects {
        TextEffects {
            glow: self.glow,
            glitch: self.glitch,
            plate: self.plate,
        }
    }
}

/// Current line bottom-centre.
pub(crate) fn draw_classic<R: Rng + ?Sized>(
    canvas: &mut Canvas,
    renderer: &TextRenderer,
    track: &SubtitleTrack,
    style: &SubtitleStyle,
    time: f64,
    beat: bool,
    rng: &mut R,
) {
    let Some(line) = track.current(time) else {
        return;
    };
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let text_style = style.text_style(style.font_size, style.color);
    draw_styled_text(
        canvas,
        renderer,
        &line.text,
        &text_style,
        (w * 0.5, h * 0.88),
        &style.effects(),
        beat,
        rng,
    );
}

/// Window of lines around the current one, stacked vertically.
pub(crate) fn draw_scroll<R: Rng + ?Sized>(
    canvas: &mut Canvas,
    renderer: &TextRenderer,
    track: &SubtitleTrack,
    style: &SubtitleStyle,
    time: f64,
    beat: bool,
    rng: &mut R,
) {
    let window = track.scroll_window(time);
    if window.is_empty() {
        return;
    }
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let spacing = style.font_size * 1.5;
    let center_y = h * style.scroll_position.clamp(0.0, 1.0);
    // Slot of the current line; before the first stamp it is the empty slot above line 0.
    let anchor = track.current_index(time).map(|i| i as f32).unwrap_or(-1.0);

    for (index, role) in window {
        let rel = index as f32 - anchor;
        // Extra room around the enlarged current line.
        let gap = if rel == 0.0 {
            0.0
        } else {
            rel.signum() * style.font_size * (CURRENT_LINE_SCALE - 1.0)
        };
        let y = center_y + rel * spacing + gap;
        let (size, color, effects) = match role {
            LineRole::Current => (
                style.font_size * CURRENT_LINE_SCALE,
                style.accent,
                style.effects(),
            ),
            _ => (
                style.font_size,
                style.color.fade(role.opacity()),
                TextEffects {
                    glow: false,
                    glitch: false,
                    plate: style.plate.map(|p| p.fade(role.opacity())),
                },
            ),
        };
        let text_style = style.text_style(size, color);
        draw_styled_text(
            canvas,
            renderer,
            &track.lines()[index].text,
            &text_style,
            (w * 0.5, y),
            &effects,
            beat && role == LineRole::Current,
            rng,
        );
    }
}
