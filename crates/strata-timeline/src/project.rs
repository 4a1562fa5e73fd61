//! The persisted record set of one edit.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strata_core::TimeScale;
use tracing::debug;
use uuid::Uuid;

use crate::audio::{AudioId, AudioTrack};
use crate::clip::{Clip, ClipId};
use crate::layer::{LayerId, LayerRegistry};
use crate::layout::{Layout, LayoutInput, LayoutMode};
use crate::settings::{ClipSettings, SettingsSource};
use crate::transition::Transition;

/// Clips, settings, transitions, audio and layers of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Clips in list order; the order within a layer is authoritative
    #[serde(default)]
    pub clips: Vec<Clip>,
    #[serde(default)]
    pub settings: HashMap<ClipId, ClipSettings>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub audio: Vec<AudioTrack>,
    #[serde(default)]
    pub layers: LayerRegistry,
    #[serde(default)]
    pub mode: LayoutMode,
}

impl Project {
    /// Create a new empty project.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            clips: Vec::new(),
            settings: HashMap::new(),
            transitions: Vec::new(),
            audio: Vec::new(),
            layers: LayerRegistry::default(),
            mode: LayoutMode::default(),
        }
    }

    /// Lay out every clip and audio track.
    pub fn layout(&self, scale: &TimeScale) -> Layout {
        let input = LayoutInput {
            clips: &self.clips,
            settings: self,
            transitions: &self.transitions,
            audio: &self.audio,
            mode: self.mode,
        };
        Layout::compute(&input, scale)
    }

    pub fn clip(&self, id: &ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| &c.id == id)
    }

    pub fn clip_index(&self, id: &ClipId) -> Option<usize> {
        self.clips.iter().position(|c| &c.id == id)
    }

    pub fn audio_track(&self, id: &AudioId) -> Option<&AudioTrack> {
        self.audio.iter().find(|t| &t.id == id)
    }

    pub fn audio_index(&self, id: &AudioId) -> Option<usize> {
        self.audio.iter().position(|t| &t.id == id)
    }

    /// Ids of the clips on a layer, in layer order.
    pub fn layer_clip_ids(&self, layer: LayerId) -> Vec<ClipId> {
        self.clips
            .iter()
            .filter(|c| c.layer_id() == layer)
            .map(|c| c.id.clone())
            .collect()
    }

    /// Whether any clip or audio track sits on `layer`.
    pub fn layer_in_use(&self, layer: LayerId) -> bool {
        self.clips.iter().any(|c| c.layer_id() == layer)
            || self.audio.iter().any(|t| t.layer_id() == layer)
    }

    /// Highest layer referenced by a clip, audio track or transition.
    pub fn highest_referenced_layer(&self) -> Option<LayerId> {
        self.clips
            .iter()
            .map(Clip::layer_id)
            .chain(self.audio.iter().map(AudioTrack::layer_id))
            .chain(self.transitions.iter().map(Transition::layer_id))
            .max()
    }

    /// Bring loaded records into a consistent state. The registry is
    /// repaired to hold at most `max_layers`, covers every referenced layer
    /// it has room for, and records left on a layer it lacks move to the
    /// highest one. Audio tracks are clamped into range.
    pub fn normalize(&mut self, max_layers: usize, min_duration: f64) {
        self.layers.repair(max_layers);
        if let Some(highest) = self.highest_referenced_layer() {
            self.layers.ensure_covers(highest);
        }

        let fallback = self.layers.highest();
        let anchors = self.anchor_transitions();
        let mut orphans = 0usize;
        for clip in &mut self.clips {
            if !self.layers.contains(clip.layer_id()) {
                clip.layer = Some(fallback);
                orphans += 1;
            }
        }
        for track in &mut self.audio {
            if !self.layers.contains(track.layer_id()) {
                track.layer = Some(fallback);
                orphans += 1;
            }
            track.sanitize(min_duration);
        }
        if orphans > 0 {
            debug!(orphans, layer = %fallback, "Records moved off missing layers");
            self.rebind_transitions(anchors);
        }
    }

    /// Pin every transition to the clip ids it joins.
    pub(crate) fn anchor_transitions(&self) -> Vec<AnchoredTransition> {
        self.transitions
            .iter()
            .filter_map(|t| {
                let ids = self.layer_clip_ids(t.layer_id());
                let before = ids.get(t.after_clip_index)?.clone();
                let after = ids.get(t.after_clip_index + 1)?.clone();
                Some(AnchoredTransition {
                    transition: t.clone(),
                    before,
                    after,
                })
            })
            .collect()
    }

    /// Recompute transition positions after clips moved. Transitions whose
    /// clips are gone or no longer adjacent on one layer are dropped.
    pub(crate) fn rebind_transitions(&mut self, anchors: Vec<AnchoredTransition>) {
        let mut rebound: Vec<Transition> = Vec::with_capacity(anchors.len());
        for anchor in anchors {
            let Some(layer) = self.clip(&anchor.before).map(Clip::layer_id) else {
                debug!(clip = %anchor.before, "Transition dropped with its clip");
                continue;
            };
            let ids = self.layer_clip_ids(layer);
            let Some(index) = ids.iter().position(|id| id == &anchor.before) else {
                continue;
            };
            if ids.get(index + 1) != Some(&anchor.after) {
                debug!(
                    before = %anchor.before,
                    after = %anchor.after,
                    "Transition dropped, clips no longer adjacent"
                );
                continue;
            }
            if rebound.iter().any(|t| t.is_at(layer, index)) {
                continue;
            }
            let mut transition = anchor.transition;
            transition.layer = Some(layer);
            transition.after_clip_index = index;
            rebound.push(transition);
        }
        self.transitions = rebound;
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}

impl SettingsSource for Project {
    fn clip_settings(&self, id: &ClipId) -> Option<ClipSettings> {
        self.settings.get(id).cloned()
    }
}

/// A transition tied to the ids of the clips on either side.
#[derive(Debug, Clone)]
pub(crate) struct AnchoredTransition {
    pub transition: Transition,
    pub before: ClipId,
    pub after: ClipId,
}

impl AnchoredTransition {
    /// Retarget the anchor when `from` is replaced.
    pub fn replace(&mut self, from: &ClipId, before: &ClipId, after: &ClipId) {
        if &self.before == from {
            self.before = before.clone();
        }
        if &self.after == from {
            self.after = after.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipKind;
    use crate::transition::TransitionKind;

    fn project_with(ids: &[(&str, u32)]) -> Project {
        let mut project = Project::new("test");
        for (id, layer) in ids {
            let mut clip = Clip::new(*id, format!("{id}.mp4"), ClipKind::Video).on_layer(LayerId::new(*layer));
            clip.id = ClipId::from(*id);
            project.settings.insert(clip.id.clone(), ClipSettings::for_video(4.0));
            project.clips.push(clip);
        }
        project
    }

    #[test]
    fn test_layer_queries() {
        let project = project_with(&[("a", 1), ("b", 2), ("c", 1)]);
        assert_eq!(
            project.layer_clip_ids(LayerId::new(1)),
            vec![ClipId::from("a"), ClipId::from("c")]
        );
        assert!(project.layer_in_use(LayerId::new(2)));
        assert!(!project.layer_in_use(LayerId::new(3)));
        assert_eq!(project.highest_referenced_layer(), Some(LayerId::new(2)));
    }

    #[test]
    fn test_normalize_extends_registry() {
        let mut project = project_with(&[("a", 4)]);
        project.normalize(10, 0.1);
        assert_eq!(project.layers.len(), 4);
    }

    #[test]
    fn test_normalize_moves_records_off_missing_layers() {
        let mut project = project_with(&[("a", 1), ("b", 5), ("c", 5)]);
        project
            .transitions
            .push(Transition::new(LayerId::new(5), 0, TransitionKind::Fade, 1.0));
        project.normalize(3, 0.1);
        assert_eq!(project.layers.len(), 3);
        assert_eq!(project.clip(&ClipId::from("b")).unwrap().layer_id(), LayerId::new(3));
        assert_eq!(project.layer_clip_ids(LayerId::new(3)).len(), 2);
        assert_eq!(project.transitions.len(), 1);
        assert_eq!(project.transitions[0].layer_id(), LayerId::new(3));
    }

    #[test]
    fn test_rebind_follows_clips() {
        let mut project = project_with(&[("a", 1), ("b", 1), ("c", 1)]);
        project
            .transitions
            .push(Transition::new(LayerId::new(1), 1, TransitionKind::Dissolve, 1.0));
        let anchors = project.anchor_transitions();

        let first = project.clips.remove(0);
        project.clips.push(first);
        project.rebind_transitions(anchors);
        assert_eq!(project.transitions[0].after_clip_index, 0);
    }

    #[test]
    fn test_rebind_drops_separated_pair() {
        let mut project = project_with(&[("a", 1), ("b", 1), ("c", 1)]);
        project
            .transitions
            .push(Transition::new(LayerId::new(1), 0, TransitionKind::Fade, 1.0));
        let anchors = project.anchor_transitions();
        project.clips.swap(1, 2);
        project.rebind_transitions(anchors);
        assert!(project.transitions.is_empty());
    }

    #[test]
    fn test_layout_through_project() {
        let project = project_with(&[("a", 1), ("b", 1)]);
        let layout = project.layout(&TimeScale::default());
        assert_eq!(layout.total_duration(), 8.0);
    }
}
