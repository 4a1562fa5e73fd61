//! Clip layout engine.
//!
//! Turns raw records (clips in list order, settings, transitions, audio
//! tracks) into start times, durations and pixel extents.
//!
//! In snap mode each layer keeps its own running time. Clips are taken in
//! list order, which is the authoritative order within a layer; a clip
//! starts where the previous clip on its layer ended, pulled back by the
//! transition between them. Layers accumulate independently and may overlap.
//!
//! Free mode uses a clip's manual `position_seconds` when it has one and the
//! snap-mode position otherwise.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strata_core::TimeScale;
use tracing::warn;

use crate::audio::{AudioId, AudioTrack};
use crate::clip::{Clip, ClipId};
use crate::layer::LayerId;
use crate::settings::{ResolvedSettings, SettingsSource};
use crate::transition::{find_transition, Transition};

/// How clip start times are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Clips sequenced back to back per layer.
    #[default]
    Snap,
    /// Clips may carry a manual start time.
    Free,
}

/// Computed placement of one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSlot {
    pub clip_id: ClipId,
    /// Index in the clip list
    pub index: usize,
    pub layer: LayerId,
    /// Index among the clips of `layer`, in list order
    pub layer_index: usize,
    pub start: f64,
    pub duration: f64,
    /// Pixel offset of the left edge
    pub left: f64,
    /// Pixel width
    pub width: f64,
}

impl ClipSlot {
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn contains_time(&self, time: f64) -> bool {
        time >= self.start && time < self.end()
    }
}

/// Computed placement of one audio track.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSlot {
    pub audio_id: AudioId,
    pub index: usize,
    pub layer: LayerId,
    pub start: f64,
    pub duration: f64,
    pub fade_out: f64,
    pub left: f64,
    pub width: f64,
}

impl AudioSlot {
    #[inline]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Conditions the layout tolerated but the host should know about.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutWarning {
    /// A transition is longer than one of the clips it joins.
    TransitionTooLong {
        layer: LayerId,
        after_clip_index: usize,
        duration: f64,
        neighbour_duration: f64,
    },
    /// A transition pulled a clip before zero; the start was clamped.
    StartClamped {
        clip_id: ClipId,
        requested: f64,
    },
    /// The host had no settings for a clip.
    MissingSettings { clip_id: ClipId },
    /// A clip produced zero duration.
    ZeroDuration { clip_id: ClipId },
}

/// Records fed to the layout engine.
pub struct LayoutInput<'a> {
    pub clips: &'a [Clip],
    pub settings: &'a dyn SettingsSource,
    pub transitions: &'a [Transition],
    pub audio: &'a [AudioTrack],
    pub mode: LayoutMode,
}

/// The result of a layout pass.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    clips: Vec<ClipSlot>,
    audio: Vec<AudioSlot>,
    warnings: Vec<LayoutWarning>,
    total_duration: f64,
}

/// Running state of one layer during a snap pass.
#[derive(Debug, Clone, Copy)]
struct LayerCursor {
    layer: LayerId,
    running: f64,
    count: usize,
    last_duration: f64,
}

impl Layout {
    /// Lay out clips and audio tracks.
    pub fn compute(input: &LayoutInput<'_>, scale: &TimeScale) -> Self {
        let mut cursors: SmallVec<[LayerCursor; 10]> = SmallVec::new();
        let mut clips = Vec::with_capacity(input.clips.len());
        let mut warnings = Vec::new();

        for (index, clip) in input.clips.iter().enumerate() {
            let layer = clip.layer_id();
            let resolved = match input.settings.clip_settings(&clip.id) {
                Some(settings) => settings.resolve(clip.kind),
                None => {
                    warnings.push(LayoutWarning::MissingSettings {
                        clip_id: clip.id.clone(),
                    });
                    ResolvedSettings::missing(clip.kind)
                }
            };
            let duration = resolved.duration.max(0.0);
            if duration <= 0.0 {
                warnings.push(LayoutWarning::ZeroDuration {
                    clip_id: clip.id.clone(),
                });
            }

            let slot = match cursors.iter().position(|c| c.layer == layer) {
                Some(i) => i,
                None => {
                    cursors.push(LayerCursor {
                        layer,
                        running: 0.0,
                        count: 0,
                        last_duration: 0.0,
                    });
                    cursors.len() - 1
                }
            };
            let cursor = &mut cursors[slot];

            let layer_index = cursor.count;
            let overlap = if layer_index > 0 {
                find_transition(input.transitions, layer, layer_index - 1)
                    .map(|t| {
                        let overlap = t.overlap();
                        let shorter = duration.min(cursor.last_duration);
                        if overlap > shorter {
                            warnings.push(LayoutWarning::TransitionTooLong {
                                layer,
                                after_clip_index: layer_index - 1,
                                duration: overlap,
                                neighbour_duration: shorter,
                            });
                        }
                        overlap
                    })
                    .unwrap_or(0.0)
            } else {
                0.0
            };

            let requested = cursor.running - overlap;
            if requested < 0.0 {
                warnings.push(LayoutWarning::StartClamped {
                    clip_id: clip.id.clone(),
                    requested,
                });
            }
            let sequenced = requested.max(0.0);
            cursor.running = sequenced + duration;
            cursor.count += 1;
            cursor.last_duration = duration;

            let start = match input.mode {
                LayoutMode::Snap => sequenced,
                LayoutMode::Free => resolved.position.unwrap_or(sequenced),
            };

            clips.push(ClipSlot {
                clip_id: clip.id.clone(),
                index,
                layer,
                layer_index,
                start,
                duration,
                left: scale.time_to_pixels(start),
                width: scale.time_to_pixels(duration),
            });
        }

        let audio: Vec<AudioSlot> = input
            .audio
            .iter()
            .enumerate()
            .map(|(index, track)| {
                let start = track.position.max(0.0);
                let duration = track.effective_duration();
                AudioSlot {
                    audio_id: track.id.clone(),
                    index,
                    layer: track.layer_id(),
                    start,
                    duration,
                    fade_out: track.clamped_fade_out(),
                    left: scale.time_to_pixels(start),
                    width: scale.time_to_pixels(duration),
                }
            })
            .collect();

        for warning in &warnings {
            match warning {
                LayoutWarning::TransitionTooLong {
                    layer,
                    after_clip_index,
                    duration,
                    neighbour_duration,
                } => warn!(
                    %layer,
                    after_clip_index,
                    duration,
                    neighbour_duration,
                    "Transition longer than a neighbouring clip"
                ),
                LayoutWarning::StartClamped { clip_id, requested } => {
                    warn!(clip = %clip_id, requested, "Clip start clamped to zero")
                }
                LayoutWarning::MissingSettings { clip_id } => {
                    warn!(clip = %clip_id, "No settings for clip, treating as zero duration")
                }
                LayoutWarning::ZeroDuration { .. } => {}
            }
        }

        let total_duration = clips
            .iter()
            .map(ClipSlot::end)
            .chain(audio.iter().map(AudioSlot::end))
            .fold(0.0, f64::max);

        Self {
            clips,
            audio,
            warnings,
            total_duration,
        }
    }

    /// Clip slots in list order.
    pub fn clips(&self) -> &[ClipSlot] {
        &self.clips
    }

    /// Audio slots in list order.
    pub fn audio(&self) -> &[AudioSlot] {
        &self.audio
    }

    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }

    /// Latest end time across all clips and audio tracks.
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn clip(&self, id: &ClipId) -> Option<&ClipSlot> {
        self.clips.iter().find(|s| &s.clip_id == id)
    }

    pub fn audio_slot(&self, id: &AudioId) -> Option<&AudioSlot> {
        self.audio.iter().find(|s| &s.audio_id == id)
    }

    /// Clips of one layer, in layer order.
    pub fn clips_on_layer(&self, layer: LayerId) -> impl Iterator<Item = &ClipSlot> + '_ {
        self.clips.iter().filter(move |s| s.layer == layer)
    }

    pub fn audio_on_layer(&self, layer: LayerId) -> impl Iterator<Item = &AudioSlot> + '_ {
        self.audio.iter().filter(move |s| s.layer == layer)
    }

    /// Clip of `layer` covering `time`. Later clips win where clips overlap.
    pub fn clip_at_time(&self, layer: LayerId, time: f64) -> Option<&ClipSlot> {
        self.clips_on_layer(layer)
            .filter(|s| s.contains_time(time))
            .last()
    }

    /// The two clips joined by a transition at `(layer, after_clip_index)`.
    pub fn adjacent_pair(
        &self,
        layer: LayerId,
        after_clip_index: usize,
    ) -> Option<(&ClipSlot, &ClipSlot)> {
        let mut on_layer = self
            .clips_on_layer(layer)
            .skip_while(|s| s.layer_index < after_clip_index);
        let before = on_layer.next().filter(|s| s.layer_index == after_clip_index)?;
        let after = on_layer.next()?;
        Some((before, after))
    }

    /// Number of clips on a layer.
    pub fn layer_len(&self, layer: LayerId) -> usize {
        self.clips_on_layer(layer).count()
    }

    /// Highest layer referenced by any clip or audio track.
    pub fn highest_layer(&self) -> Option<LayerId> {
        self.clips
            .iter()
            .map(|s| s.layer)
            .chain(self.audio.iter().map(|s| s.layer))
            .max()
    }
}
