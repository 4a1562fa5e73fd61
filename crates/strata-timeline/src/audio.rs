//! Audio tracks: music, voice and sound effects placed on layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use strata_core::limits::MAX_FADE_OUT;
use strata_core::{Result, StrataError};
use uuid::Uuid;

use crate::layer::LayerId;

/// Identifier of an audio track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioId(String);

impl AudioId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AudioId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AudioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCategory {
    Music,
    Voice,
    Sfx,
}

/// An audio clip, positioned explicitly on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
    pub id: AudioId,
    pub url: String,
    pub name: String,
    pub category: AudioCategory,
    /// 0..=1
    pub volume: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<LayerId>,
    /// Timeline start in seconds
    pub position: f64,
    pub original_duration: f64,
    pub trim_start: f64,
    pub trim_end: f64,
    /// Seconds of fade at the tail, 0..=10 and never longer than the track
    #[serde(default)]
    pub fade_out: f64,
}

impl AudioTrack {
    /// Untrimmed track at `position`.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        category: AudioCategory,
        original_duration: f64,
        position: f64,
    ) -> Self {
        let original_duration = original_duration.max(0.0);
        Self {
            id: AudioId::generate(),
            url: url.into(),
            name: name.into(),
            category,
            volume: 1.0,
            layer: None,
            position: position.max(0.0),
            original_duration,
            trim_start: 0.0,
            trim_end: original_duration,
            fade_out: 0.0,
        }
    }

    pub fn on_layer(mut self, layer: LayerId) -> Self {
        self.layer = Some(layer);
        self
    }

    #[inline]
    pub fn layer_id(&self) -> LayerId {
        self.layer.unwrap_or_default()
    }

    /// Played length: the trim range.
    pub fn effective_duration(&self) -> f64 {
        (self.trim_end - self.trim_start).max(0.0)
    }

    pub fn end(&self) -> f64 {
        self.position.max(0.0) + self.effective_duration()
    }

    /// Fade-out as applied: clamped to `[0, min(10, effective duration)]`.
    pub fn clamped_fade_out(&self) -> f64 {
        if !self.fade_out.is_finite() {
            return 0.0;
        }
        self.fade_out
            .clamp(0.0, MAX_FADE_OUT)
            .min(self.effective_duration())
    }

    /// Pull every field back into its valid range.
    pub fn sanitize(&mut self, min_duration: f64) {
        self.original_duration = self.original_duration.max(0.0);
        self.volume = self.volume.clamp(0.0, 1.0);
        self.position = self.position.max(0.0);
        let min_duration = min_duration.min(self.original_duration);
        self.trim_start = self
            .trim_start
            .clamp(0.0, (self.original_duration - min_duration).max(0.0));
        let lowest_end = (self.trim_start + min_duration).min(self.original_duration);
        self.trim_end = self.trim_end.clamp(lowest_end, self.original_duration);
        self.fade_out = self.clamped_fade_out();
    }

    /// Strict check for host-supplied records.
    pub fn validate(&self) -> Result<()> {
        let ordered = 0.0 <= self.trim_start
            && self.trim_start < self.trim_end
            && self.trim_end <= self.original_duration;
        if !ordered {
            return Err(StrataError::InvalidParameter(format!(
                "audio {} trim range [{}, {}] not inside [0, {}]",
                self.id, self.trim_start, self.trim_end, self.original_duration
            )));
        }
        if !(0.0..=MAX_FADE_OUT).contains(&self.fade_out)
            || self.fade_out > self.effective_duration()
        {
            return Err(StrataError::InvalidParameter(format!(
                "audio {} fade-out {} out of range",
                self.id, self.fade_out
            )));
        }
        Ok(())
    }
}

/// Partial update to an audio track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioPatch {
    pub volume: Option<f32>,
    pub position: Option<f64>,
    pub trim_start: Option<f64>,
    pub trim_end: Option<f64>,
    pub fade_out: Option<f64>,
    pub layer: Option<LayerId>,
}

impl AudioPatch {
    pub fn position(position: f64) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, track: &mut AudioTrack) {
        if let Some(volume) = self.volume {
            track.volume = volume;
        }
        if let Some(position) = self.position {
            track.position = position;
        }
        if let Some(trim_start) = self.trim_start {
            track.trim_start = trim_start;
        }
        if let Some(trim_end) = self.trim_end {
            track.trim_end = trim_end;
        }
        if let Some(fade_out) = self.fade_out {
            track.fade_out = fade_out;
        }
        if let Some(layer) = self.layer {
            track.layer = Some(layer);
        }
    }
}
