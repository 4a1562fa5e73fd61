//! Editor configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides. Hosts resolve the file from `--config <path>` or the
//! `STRATA_CONFIG` environment variable; with neither, defaults apply.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, StrataError};
use crate::limits;
use crate::time::{TimeScale, Zoom, BASE_PIXELS_PER_SECOND, FRAME_RATE};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "STRATA_CONFIG";

/// Tunables for the timeline core and its egui surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Pixels per second at zoom 1.0.
    pub base_pixels_per_second: f64,
    /// Initial zoom.
    pub zoom: Zoom,
    /// Maximum number of layers (1..=10).
    pub max_layers: usize,
    /// Height of the clip lane of one layer.
    pub clip_lane_height: f32,
    /// Height of the audio lane of one layer.
    pub audio_lane_height: f32,
    /// Height of the ruler strip.
    pub ruler_height: f32,
    /// Width of the trim handle hit zone at each clip edge.
    pub trim_handle_width: f32,
    /// Horizontal distance a press must travel before it becomes a drag.
    pub drag_dead_zone: f32,
    /// Shortest clip trimming may produce, in seconds.
    pub min_clip_duration: f64,
    /// Frame rate for keyboard stepping.
    pub frame_rate: f64,
    /// Width of one thumbnail tile.
    pub thumbnail_tile_width: f32,
    /// Snap radius in pixels for free-mode dragging.
    pub snap_distance_px: f32,
    /// Duration given to newly dropped transitions.
    pub default_transition_duration: f64,
    /// Display duration given to still images without one.
    pub default_image_duration: f64,
    /// Source length assumed for dropped video without a known length.
    pub default_video_duration: f64,
    /// Width of the drop zone between two adjacent clips.
    pub transition_zone_width: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            base_pixels_per_second: BASE_PIXELS_PER_SECOND,
            zoom: Zoom::ONE,
            max_layers: limits::MAX_LAYERS,
            clip_lane_height: 48.0,
            audio_lane_height: 24.0,
            ruler_height: 24.0,
            trim_handle_width: 6.0,
            drag_dead_zone: 5.0,
            min_clip_duration: limits::MIN_CLIP_DURATION,
            frame_rate: FRAME_RATE,
            thumbnail_tile_width: 60.0,
            snap_distance_px: 8.0,
            default_transition_duration: limits::DEFAULT_TRANSITION_DURATION,
            default_image_duration: limits::DEFAULT_IMAGE_DURATION,
            default_video_duration: limits::DEFAULT_VIDEO_DURATION,
            transition_zone_width: 16.0,
        }
    }
}

impl TimelineConfig {
    /// Parse a JSON config document and validate it.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| StrataError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let config = Self::from_json(&data)?;
        info!(path = %path.display(), "Loaded timeline config");
        Ok(config)
    }

    /// Resolve the config from an explicit path, then `STRATA_CONFIG`, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        match path {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Reject values the timeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_layers == 0 || self.max_layers > limits::MAX_LAYERS {
            return Err(StrataError::Config(format!(
                "max_layers must be in 1..={}, got {}",
                limits::MAX_LAYERS,
                self.max_layers
            )));
        }
        if !(self.base_pixels_per_second > 0.0) {
            return Err(StrataError::Config(
                "base_pixels_per_second must be positive".into(),
            ));
        }
        if !(self.min_clip_duration > 0.0) {
            return Err(StrataError::Config(
                "min_clip_duration must be positive".into(),
            ));
        }
        if !(self.default_image_duration >= self.min_clip_duration)
            || !(self.default_video_duration >= self.min_clip_duration)
        {
            return Err(StrataError::Config(
                "default media durations must be at least min_clip_duration".into(),
            ));
        }
        if !(self.frame_rate > 0.0) {
            return Err(StrataError::Config("frame_rate must be positive".into()));
        }
        if self.clip_lane_height <= 0.0 || self.audio_lane_height < 0.0 {
            return Err(StrataError::Config("lane heights must be positive".into()));
        }
        if self.thumbnail_tile_width < 1.0 {
            return Err(StrataError::Config(
                "thumbnail_tile_width must be at least one pixel".into(),
            ));
        }
        Ok(())
    }

    /// Height of one layer row (clip lane plus audio lane).
    pub fn layer_height(&self) -> f32 {
        self.clip_lane_height + self.audio_lane_height
    }

    /// Time scale at the configured base density and zoom.
    pub fn time_scale(&self) -> TimeScale {
        TimeScale::with_base(self.base_pixels_per_second, self.zoom)
    }

    /// Duration of one keyboard frame step.
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.frame_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = TimelineConfig::from_json(br#"{ "max_layers": 4, "zoom": 2.1 }"#).unwrap();
        assert_eq!(config.max_layers, 4);
        assert_eq!(config.zoom.value(), 2.0);
        assert_eq!(config.drag_dead_zone, 5.0);
        assert_eq!(config.thumbnail_tile_width, 60.0);
    }

    #[test]
    fn test_rejects_too_many_layers() {
        let result = TimelineConfig::from_json(br#"{ "max_layers": 50 }"#);
        assert!(matches!(result, Err(StrataError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_length_video_default() {
        let result = TimelineConfig::from_json(br#"{ "default_video_duration": 0.0 }"#);
        assert!(matches!(result, Err(StrataError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(TimelineConfig::from_json(b"{ not json").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "frame_rate": 25.0 }"#).unwrap();
        let config = TimelineConfig::resolve(Some(file.path())).unwrap();
        assert_eq!(config.frame_rate, 25.0);
        assert!((config.frame_duration() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_layer_height() {
        let config = TimelineConfig::default();
        assert_eq!(config.layer_height(), 72.0);
        assert_eq!(config.time_scale().pixels_per_second(), 50.0);
    }
}
