//! Mutation intents and undo history.
//!
//! The timeline never mutates records itself. Every user action becomes a
//! `TimelineIntent` handed to the host, which applies it as a single state
//! update. The host keeps whole-project snapshots for undo/redo.

use serde::{Deserialize, Serialize};
use strata_core::Zoom;

use crate::audio::{AudioCategory, AudioId, AudioPatch};
use crate::clip::{ClipId, ClipKind};
use crate::layer::LayerId;
use crate::layout::LayoutMode;
use crate::settings::SettingsPatch;
use crate::transition::{Transition, TransitionKind};

/// Media dragged in from a library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaPayload {
    Visual {
        name: String,
        url: String,
        thumbnail_url: Option<String>,
        kind: ClipKind,
        /// Source length for video, display length for images
        duration: Option<f64>,
    },
    Audio {
        name: String,
        url: String,
        category: AudioCategory,
        duration: f64,
    },
}

/// A requested change to the timeline, applied by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineIntent {
    /// Replace the selection.
    Select(Vec<ClipId>),
    /// Remove clips (and their settings).
    RemoveClips(Vec<ClipId>),
    /// Move the clip at list index `from` so it ends up at list index `to`
    /// (indexed after removal).
    Reorder { from: usize, to: usize },
    /// Insert a copy right after the clip.
    Duplicate(ClipId),
    /// Replace a clip by two whose trim ranges meet at source time `at`.
    Split { clip_id: ClipId, at: f64 },
    /// Reassign a clip to a layer. `position` is the start time it was
    /// dropped at: free mode pins it there, snap mode slots it into the
    /// target layer's sequence by midpoint.
    ChangeLayer {
        clip_id: ClipId,
        layer: LayerId,
        position: Option<f64>,
    },
    /// Trim/speed/mute/volume/position change.
    UpdateSettings { clip_id: ClipId, patch: SettingsPatch },
    AddTransition(Transition),
    EditTransition {
        layer: LayerId,
        after_clip_index: usize,
        kind: Option<TransitionKind>,
        duration: Option<f64>,
    },
    RemoveTransition { layer: LayerId, after_clip_index: usize },
    RemoveAudio(AudioId),
    UpdateAudio { id: AudioId, patch: AudioPatch },
    /// Split an audio track at source time `at`.
    SplitAudio { id: AudioId, at: f64 },
    /// Library media dropped onto a layer at a time offset.
    MediaDrop {
        media: MediaPayload,
        layer: LayerId,
        time: f64,
    },
    /// Move the playhead.
    Seek(f64),
    TogglePlay,
    SetZoom(Zoom),
    SetLayoutMode(LayoutMode),
    /// Forget every manual clip position.
    ResetPositions,
    AddLayer,
    RemoveLayer(LayerId),
    ToggleLayerLock(LayerId),
    ToggleLayerVisibility(LayerId),
    Undo,
    Redo,
}

impl TimelineIntent {
    /// Whether applying this intent changes persisted project content.
    pub fn is_edit(&self) -> bool {
        !matches!(
            self,
            Self::Select(_)
                | Self::Seek(_)
                | Self::TogglePlay
                | Self::SetZoom(_)
                | Self::Undo
                | Self::Redo
        )
    }
}

// ── Undo stack ──────────────────────────────────────────────────

/// Snapshot-based undo/redo history.
#[derive(Debug, Clone)]
pub struct History<T> {
    /// States before each executed edit (most recent last).
    undo: Vec<T>,
    /// States undone (most recent last).
    redo: Vec<T>,
    /// Maximum history depth.
    max_depth: usize,
}

impl<T: Clone> History<T> {
    /// Create a new history with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record the state as it was before an edit.
    /// Clears the redo stack (new action invalidates redo history).
    pub fn record(&mut self, before: T) {
        self.redo.clear();
        self.undo.push(before);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Step back. `current` is stashed for redo; returns the state to restore.
    pub fn undo(&mut self, current: T) -> Option<T> {
        let previous = self.undo.pop()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward again. `current` is stashed for undo; returns the state to restore.
    pub fn redo(&mut self, current: T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut history = History::new(100);
        history.record(1);
        assert!(history.can_undo());
        assert!(!history.can_redo());

        assert_eq!(history.undo(2), Some(1));
        assert!(!history.can_undo());
        assert!(history.can_redo());

        assert_eq!(history.redo(1), Some(2));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_action_clears_redo() {
        let mut history = History::new(100);
        history.record("a");
        history.undo("b");
        assert!(history.can_redo());

        history.record("a");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_max_depth() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.record(i);
        }
        assert_eq!(history.undo_count(), 3);
        assert_eq!(history.undo(99), Some(4));
    }

    #[test]
    fn test_empty_undo_is_none() {
        let mut history: History<u8> = History::default();
        assert_eq!(history.undo(0), None);
        assert_eq!(history.redo(0), None);
    }

    #[test]
    fn test_intent_classification() {
        assert!(TimelineIntent::AddLayer.is_edit());
        assert!(TimelineIntent::ResetPositions.is_edit());
        assert!(!TimelineIntent::Seek(3.0).is_edit());
        assert!(!TimelineIntent::Select(vec![]).is_edit());
    }

    #[test]
    fn test_media_payload_tagging() {
        let payload = MediaPayload::Audio {
            name: "vo".into(),
            url: "vo.wav".into(),
            category: AudioCategory::Voice,
            duration: 4.0,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "audio");
        assert_eq!(json["category"], "voice");
    }
}
