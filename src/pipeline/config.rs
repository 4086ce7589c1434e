//! Visualizer configuration bundle.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::background::BackgroundConfig;
use crate::designs::{DesignType, PaletteKind};
use crate::overlay::OverlayConfig;
use crate::signal::ConditionerConfig;

/// Largest accepted canvas edge in pixels.
pub const MAX_DIMENSION: u32 = 8192;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid canvas size {0}x{1}")]
    InvalidSize(u32, u32),
}

/// Ambient zoom and pan applied before design dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTransform {
    /// Zoom about the canvas centre.
    pub scale: f32,
    /// Horizontal pan as a fraction of width.
    pub offset_x: f32,
    /// Vertical pan as a fraction of height.
    pub offset_y: f32,
}

impl Default for EffectTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl EffectTransform {
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset_x == 0.0 && self.offset_y == 0.0
    }
}

/// Everything the pipeline reads from its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub width: u32,
    pub height: u32,
    pub design: DesignType,
    pub palette: PaletteKind,
    pub sensitivity: f32,
    pub conditioner: ConditionerConfig,
    pub stroke_outline: bool,
    pub effect: EffectTransform,
    pub background: BackgroundConfig,
    pub overlay: OverlayConfig,
    /// Seed for the stylistic RNG.
    pub seed: u64,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            design: DesignType::default(),
            palette: PaletteKind::default(),
            sensitivity: 1.0,
            conditioner: ConditionerConfig::default(),
            stroke_outline: false,
            effect: EffectTransform::default(),
            background: BackgroundConfig::default(),
            overlay: OverlayConfig::default(),
            seed: 0x5eed,
        }
    }
}

impl VisualizerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Reject unusable sizes and clamp everything else into range.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_DIMENSION
            || self.height > MAX_DIMENSION
        {
            return Err(ConfigError::InvalidSize(self.width, self.height));
        }
        if !self.sensitivity.is_finite() || self.sensitivity < 0.0 {
            log::warn!("sensitivity {} out of range, using 1.0", self.sensitivity);
            self.sensitivity = 1.0;
        }
        if !self.conditioner.balance.is_finite() {
            self.conditioner.balance = 0.0;
        }
        if !self.effect.scale.is_finite() || self.effect.scale <= 0.0 {
            log::warn!("effect scale {} out of range, using 1.0", self.effect.scale);
            self.effect.scale = 1.0;
        }
        self.effect.offset_x = self.effect.offset_x.clamp(-1.0, 1.0);
        self.effect.offset_y = self.effect.offset_y.clamp(-1.0, 1.0);
        if !self.background.slide_interval.is_finite() || self.background.slide_interval < 0.0 {
            self.background.slide_interval = 0.0;
        }
        if !self.background.transition_duration.is_finite()
            || self.background.transition_duration <= 0.0
        {
            self.background.transition_duration = 1.0;
        }
        let style = &mut self.overlay.subtitle_style;
        style.font_size = style.font_size.max(1.0);
        style.scroll_position = style.scroll_position.clamp(0.0, 1.0);
        self.overlay.watermark.font_size = self.overlay.watermark.font_size.max(1.0);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::SubtitleMode;
    use crate::transition::TransitionKind;

    #[test]
    fn test_default_config() {
        let config = VisualizerConfig::default();
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert_eq!(config.design, DesignType::Bars);
        assert_eq!(config.conditioner.window, 1);
        assert!(config.effect.is_identity());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = VisualizerConfig::from_json_str(
            r##"{
                "design": "data-mosh",
                "palette": "rainbow",
                "conditioner": { "balance": 0.5 },
                "background": { "color": "#102030", "transition": "circle-open" },
                "overlay": { "subtitle_mode": "off" }
            }"##,
        )
        .unwrap();
        assert_eq!(config.design, DesignType::DataMosh);
        assert_eq!(config.palette, PaletteKind::Rainbow);
        assert_eq!(config.conditioner.balance, 0.5);
        assert_eq!(config.conditioner.window, 1);
        assert_eq!(config.background.transition, Some(TransitionKind::CircleOpen));
        assert_eq!(config.overlay.subtitle_mode, SubtitleMode::Off);
        assert_eq!(config.width, 1280);
    }

    #[test]
    fn test_validate_clamps_and_rejects() {
        let config = VisualizerConfig {
            sensitivity: -3.0,
            effect: EffectTransform {
                scale: 0.0,
                offset_x: 5.0,
                offset_y: -5.0,
            },
            ..VisualizerConfig::default()
        }
        .validate()
        .unwrap();
        assert_eq!(config.sensitivity, 1.0);
        assert_eq!(config.effect.scale, 1.0);
        assert_eq!((config.effect.offset_x, config.effect.offset_y), (1.0, -1.0));

        let err = VisualizerConfig {
            width: 0,
            ..VisualizerConfig::default()
        }
        .validate();
        assert!(matches!(err, Err(ConfigError::InvalidSize(0, 720))));
    }

    #[test]
    fn test_unknown_design_is_a_parse_error() {
        let err = VisualizerConfig::from_json_str(r#"{ "design": "lasers" }"#);
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "width": 640, "height": 360 }"#).unwrap();
        let config = VisualizerConfig::from_json_file(&path).unwrap();
        assert_eq!((config.width, config.height), (640, 360));

        let missing = VisualizerConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
