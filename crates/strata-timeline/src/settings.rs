//! Per-clip playback/trim settings and their default resolution.
//!
//! Settings belong to the host. The timeline reads them through
//! [`SettingsSource`] and writes them back as [`SettingsPatch`] intents.
//! Every consumer (layout, rendering, trimming, splitting) resolves raw
//! settings through [`ClipSettings::resolve`], which owns the default table:
//!
//! | field               | default                          |
//! |---------------------|----------------------------------|
//! | `muted`             | `false`                          |
//! | `volume`            | `1.0`                            |
//! | `speed`             | `1.0` (also for non-positive)    |
//! | `trim_start`        | `0.0`                            |
//! | `trim_end`          | `original_duration`              |
//! | `original_duration` | `0.0` for video                  |
//! | `display_duration`  | 5 s for images                   |
//! | `position_seconds`  | none (auto-sequenced)            |
//!
//! A clip with no settings record at all resolves to zero duration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strata_core::limits::DEFAULT_IMAGE_DURATION;
use strata_core::{Result, StrataError};
use tracing::warn;

use crate::clip::{Clip, ClipId, ClipKind};

/// Raw settings as the host stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSettings {
    pub muted: bool,
    /// 0..=1
    pub volume: f32,
    /// Playback speed multiplier, > 0
    pub speed: f64,
    /// Source seconds skipped at the head (video)
    pub trim_start: f64,
    /// Source second where playback stops (video); `None` = end of source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim_end: Option<f64>,
    /// Length of the source media (video)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_duration: Option<f64>,
    /// On-timeline length (images)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_duration: Option<f64>,
    /// Manual start time, honoured in free layout mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_seconds: Option<f64>,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: 1.0,
            speed: 1.0,
            trim_start: 0.0,
            trim_end: None,
            original_duration: None,
            display_duration: None,
            position_seconds: None,
        }
    }
}

impl ClipSettings {
    /// Settings for an untrimmed video of the given source length.
    pub fn for_video(original_duration: f64) -> Self {
        Self {
            original_duration: Some(original_duration),
            trim_end: Some(original_duration),
            ..Self::default()
        }
    }

    /// Settings for a still shown for `display_duration` seconds.
    pub fn for_image(display_duration: f64) -> Self {
        Self {
            display_duration: Some(display_duration),
            ..Self::default()
        }
    }

    /// Resolve defaults and clamp into a consistent view.
    pub fn resolve(&self, kind: ClipKind) -> ResolvedSettings {
        let speed = if self.speed.is_finite() && self.speed > 0.0 {
            self.speed
        } else {
            1.0
        };
        let volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let position = self
            .position_seconds
            .filter(|p| p.is_finite())
            .map(|p| p.max(0.0));

        match kind {
            ClipKind::Image => {
                let display = self
                    .display_duration
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .unwrap_or(DEFAULT_IMAGE_DURATION);
                ResolvedSettings {
                    kind,
                    muted: self.muted,
                    volume,
                    speed,
                    trim_start: 0.0,
                    trim_end: display,
                    original_duration: display,
                    duration: display,
                    position,
                }
            }
            ClipKind::Video => {
                let original = self
                    .original_duration
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .unwrap_or(0.0);
                let trim_start = finite_or(self.trim_start, 0.0).clamp(0.0, original);
                let trim_end = self
                    .trim_end
                    .filter(|e| e.is_finite())
                    .unwrap_or(original)
                    .clamp(trim_start, original);
                ResolvedSettings {
                    kind,
                    muted: self.muted,
                    volume,
                    speed,
                    trim_start,
                    trim_end,
                    original_duration: original,
                    duration: (trim_end - trim_start) / speed,
                    position,
                }
            }
        }
    }

    /// Pull trim fields back inside the source, keeping at least
    /// `min_duration` seconds between them.
    pub fn clamp_trim(&mut self, kind: ClipKind, min_duration: f64) {
        match kind {
            ClipKind::Image => {
                if let Some(display) = self.display_duration {
                    let display = finite_or(display, DEFAULT_IMAGE_DURATION);
                    self.display_duration = Some(display.max(min_duration));
                }
            }
            ClipKind::Video => {
                let Some(original) = self
                    .original_duration
                    .filter(|d| d.is_finite() && *d > 0.0)
                else {
                    return;
                };
                let min_duration = min_duration.clamp(0.0, original);
                self.trim_start = finite_or(self.trim_start, 0.0).clamp(0.0, original - min_duration);
                let end = self.trim_end.filter(|e| e.is_finite()).unwrap_or(original);
                let lowest_end = (self.trim_start + min_duration).min(original);
                self.trim_end = Some(end.clamp(lowest_end, original));
            }
        }
    }

    /// Strict check used when a host hands the document new settings.
    pub fn validate(&self, kind: ClipKind) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(StrataError::InvalidSettings(format!(
                "volume {} outside 0..=1",
                self.volume
            )));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(StrataError::InvalidSettings(format!(
                "speed {} must be positive",
                self.speed
            )));
        }
        if let Some(position) = self.position_seconds {
            if !(position.is_finite() && position >= 0.0) {
                return Err(StrataError::InvalidSettings(format!(
                    "position {} must be non-negative",
                    position
                )));
            }
        }
        match kind {
            ClipKind::Image => {
                if let Some(display) = self.display_duration {
                    if !(display.is_finite() && display > 0.0) {
                        return Err(StrataError::InvalidSettings(format!(
                            "display duration {} must be positive",
                            display
                        )));
                    }
                }
            }
            ClipKind::Video => {
                let original = self.original_duration.ok_or_else(|| {
                    StrataError::InvalidSettings("video settings need an original duration".into())
                })?;
                let trim_end = self.trim_end.unwrap_or(original);
                let ordered = 0.0 <= self.trim_start
                    && self.trim_start < trim_end
                    && trim_end <= original;
                if !ordered {
                    return Err(StrataError::InvalidSettings(format!(
                        "trim range [{}, {}] not inside [0, {}]",
                        self.trim_start, trim_end, original
                    )));
                }
            }
        }
        Ok(())
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Settings after default resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSettings {
    pub kind: ClipKind,
    pub muted: bool,
    pub volume: f32,
    pub speed: f64,
    pub trim_start: f64,
    pub trim_end: f64,
    pub original_duration: f64,
    /// Effective on-timeline duration
    pub duration: f64,
    pub position: Option<f64>,
}

impl ResolvedSettings {
    /// What a clip without any settings record resolves to.
    pub fn missing(kind: ClipKind) -> Self {
        Self {
            kind,
            muted: false,
            volume: 1.0,
            speed: 1.0,
            trim_start: 0.0,
            trim_end: 0.0,
            original_duration: 0.0,
            duration: 0.0,
            position: None,
        }
    }

    /// Convert a clip-local timeline offset to a source time inside the trim range.
    pub fn local_to_source(&self, local: f64) -> f64 {
        match self.kind {
            ClipKind::Image => local.clamp(0.0, self.duration),
            ClipKind::Video => (self.trim_start + local * self.speed).clamp(self.trim_start, self.trim_end),
        }
    }
}

/// Read access to host-owned settings.
pub trait SettingsSource {
    fn clip_settings(&self, id: &ClipId) -> Option<ClipSettings>;

    /// Resolve a clip's settings, falling back to zero duration when the
    /// host has no record for it.
    fn resolve(&self, clip: &Clip) -> ResolvedSettings {
        match self.clip_settings(&clip.id) {
            Some(settings) => settings.resolve(clip.kind),
            None => {
                warn!(clip = %clip.id, "No settings for clip, treating as zero duration");
                ResolvedSettings::missing(clip.kind)
            }
        }
    }
}

impl SettingsSource for HashMap<ClipId, ClipSettings> {
    fn clip_settings(&self, id: &ClipId) -> Option<ClipSettings> {
        self.get(id).cloned()
    }
}

impl<F> SettingsSource for F
where
    F: Fn(&ClipId) -> Option<ClipSettings>,
{
    fn clip_settings(&self, id: &ClipId) -> Option<ClipSettings> {
        self(id)
    }
}

/// Partial update to a clip's settings. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub muted: Option<bool>,
    pub volume: Option<f32>,
    pub speed: Option<f64>,
    pub trim_start: Option<f64>,
    pub trim_end: Option<f64>,
    pub display_duration: Option<f64>,
    /// `Some(None)` clears a manual position; in JSON that is an explicit
    /// `null`, while a missing key leaves it alone.
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub position_seconds: Option<Option<f64>>,
}

fn explicit_null<'de, D>(deserializer: D) -> std::result::Result<Option<Option<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

impl SettingsPatch {
    pub fn trim(trim_start: f64, trim_end: f64) -> Self {
        Self {
            trim_start: Some(trim_start),
            trim_end: Some(trim_end),
            ..Self::default()
        }
    }

    pub fn position(position: f64) -> Self {
        Self {
            position_seconds: Some(Some(position)),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write the patch into `settings`.
    pub fn apply_to(&self, settings: &mut ClipSettings) {
        if let Some(muted) = self.muted {
            settings.muted = muted;
        }
        if let Some(volume) = self.volume {
            settings.volume = volume.clamp(0.0, 1.0);
        }
        if let Some(speed) = self.speed.filter(|s| s.is_finite() && *s > 0.0) {
            settings.speed = speed;
        }
        if let Some(trim_start) = self.trim_start {
            settings.trim_start = trim_start;
        }
        if let Some(trim_end) = self.trim_end {
            settings.trim_end = Some(trim_end);
        }
        if let Some(display) = self.display_duration {
            settings.display_duration = Some(display);
        }
        if let Some(position) = self.position_seconds {
            settings.position_seconds = position.map(|p| p.max(0.0));
        }
    }
}
