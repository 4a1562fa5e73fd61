//! In-memory host for the timeline.
//!
//! `TimelineDocument` owns a [`Project`] plus view state (playhead, play
//! state, zoom, selection) and applies [`TimelineIntent`]s. Each intent is
//! one state update: the layout is recomputed once afterwards, so a clip
//! moved across layers is never observed half-moved. Edits that change the
//! project are recorded for undo.

use std::path::Path;
use strata_core::{Result, StrataError, TimeScale, TimelineConfig, Zoom};
use tracing::{debug, info};

use crate::audio::{AudioId, AudioPatch, AudioTrack};
use crate::clip::{Clip, ClipId, ClipKind};
use crate::edit::{History, MediaPayload, TimelineIntent};
use crate::layer::LayerId;
use crate::layout::{Layout, LayoutMode};
use crate::project::Project;
use crate::serialization::ProjectFile;
use crate::settings::{ClipSettings, ResolvedSettings, SettingsPatch, SettingsSource};
use crate::transition::{max_transition_duration, Transition, TransitionKind};

/// A project being edited.
#[derive(Debug, Clone)]
pub struct TimelineDocument {
    project: Project,
    config: TimelineConfig,
    scale: TimeScale,
    layout: Layout,
    playhead: f64,
    playing: bool,
    selection: Vec<ClipId>,
    history: History<Project>,
}

impl TimelineDocument {
    /// Empty document.
    pub fn new(config: TimelineConfig) -> Self {
        Self::with_project(Project::default(), config)
    }

    /// Wrap an existing project, normalizing its records.
    pub fn with_project(mut project: Project, config: TimelineConfig) -> Self {
        project.normalize(config.max_layers, config.min_clip_duration);
        let scale = config.time_scale();
        let layout = project.layout(&scale);
        Self {
            project,
            config,
            scale,
            layout,
            playhead: 0.0,
            playing: false,
            selection: Vec::new(),
            history: History::default(),
        }
    }

    /// Open a project file.
    pub fn open(path: &Path, config: TimelineConfig) -> Result<Self> {
        let file = ProjectFile::load_from_file(path)?;
        info!(path = %path.display(), name = %file.project.name, "Opened project");
        Ok(Self::with_project(file.project, config))
    }

    /// Write the project to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        ProjectFile::new(self.project.clone()).save_to_file(path)?;
        info!(path = %path.display(), "Saved project");
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    pub fn zoom(&self) -> Zoom {
        self.scale.zoom()
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn selection(&self) -> &[ClipId] {
        &self.selection
    }

    pub fn total_duration(&self) -> f64 {
        self.layout.total_duration()
    }

    /// Resolved settings of a clip.
    pub fn resolved(&self, id: &ClipId) -> Option<ResolvedSettings> {
        self.project.clip(id).map(|clip| self.project.resolve(clip))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Direct record insertion ─────────────────────────────────

    /// Append a clip with its settings. Settings are validated.
    pub fn insert_clip(&mut self, clip: Clip, settings: ClipSettings) -> Result<()> {
        settings.validate(clip.kind)?;
        let layer = clip.layer_id();
        if !self.project.layers.contains(layer) {
            return Err(StrataError::LayerNotFound(layer.to_string()));
        }
        self.record();
        self.project.settings.insert(clip.id.clone(), settings);
        self.project.clips.push(clip);
        self.relayout();
        Ok(())
    }

    /// Replace the settings of an existing clip.
    pub fn set_settings(&mut self, id: &ClipId, settings: ClipSettings) -> Result<()> {
        let clip = self
            .project
            .clip(id)
            .ok_or_else(|| StrataError::ClipNotFound(id.to_string()))?;
        settings.validate(clip.kind)?;
        self.record();
        self.project.settings.insert(id.clone(), settings);
        self.relayout();
        Ok(())
    }

    /// Append an audio track.
    pub fn insert_audio(&mut self, track: AudioTrack) -> Result<()> {
        track.validate()?;
        let layer = track.layer_id();
        if !self.project.layers.contains(layer) {
            return Err(StrataError::LayerNotFound(layer.to_string()));
        }
        self.record();
        self.project.audio.push(track);
        self.relayout();
        Ok(())
    }

    /// Add a transition, failing when the two clips do not exist.
    pub fn insert_transition(&mut self, transition: Transition) -> Result<()> {
        let layer = transition.layer_id();
        if self
            .layout
            .adjacent_pair(layer, transition.after_clip_index)
            .is_none()
        {
            return Err(StrataError::InvalidParameter(format!(
                "no clips to join after index {} on {}",
                transition.after_clip_index, layer
            )));
        }
        self.apply(TimelineIntent::AddTransition(transition));
        Ok(())
    }

    // ── Intents ─────────────────────────────────────────────────

    /// Apply one intent. Returns whether anything changed.
    pub fn apply(&mut self, intent: TimelineIntent) -> bool {
        match intent {
            TimelineIntent::Undo => return self.undo(),
            TimelineIntent::Redo => return self.redo(),
            _ => {}
        }

        let snapshot = intent.is_edit().then(|| self.project.clone());
        let changed = self.apply_intent(intent);
        if changed {
            if let Some(before) = snapshot {
                if before != self.project {
                    self.history.record(before);
                }
            }
            self.relayout();
        }
        changed
    }

    /// Apply several intents in order. Returns whether any changed state.
    pub fn apply_all(&mut self, intents: impl IntoIterator<Item = TimelineIntent>) -> bool {
        intents
            .into_iter()
            .fold(false, |changed, intent| self.apply(intent) | changed)
    }

    /// Step the playhead forward while playing, stopping at the end.
    pub fn advance(&mut self, dt: f64) -> bool {
        if !self.playing || dt <= 0.0 {
            return false;
        }
        let end = self.total_duration();
        self.playhead = (self.playhead + dt).min(end);
        if self.playhead >= end {
            self.playing = false;
            debug!("Reached end of timeline, playback stopped");
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.project.clone()) {
            Some(previous) => {
                self.project = previous;
                self.after_restore();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.project.clone()) {
            Some(next) => {
                self.project = next;
                self.after_restore();
                true
            }
            None => false,
        }
    }

    fn apply_intent(&mut self, intent: TimelineIntent) -> bool {
        match intent {
            TimelineIntent::Select(ids) => self.select(ids),
            TimelineIntent::RemoveClips(ids) => self.remove_clips(&ids),
            TimelineIntent::Reorder { from, to } => self.reorder(from, to),
            TimelineIntent::Duplicate(id) => self.duplicate(&id),
            TimelineIntent::Split { clip_id, at } => self.split(&clip_id, at),
            TimelineIntent::ChangeLayer {
                clip_id,
                layer,
                position,
            } => self.change_layer(&clip_id, layer, position),
            TimelineIntent::UpdateSettings { clip_id, patch } => {
                self.update_settings(&clip_id, &patch)
            }
            TimelineIntent::AddTransition(transition) => self.add_transition(transition),
            TimelineIntent::EditTransition {
                layer,
                after_clip_index,
                kind,
                duration,
            } => self.edit_transition(layer, after_clip_index, kind, duration),
            TimelineIntent::RemoveTransition {
                layer,
                after_clip_index,
            } => {
                let before = self.project.transitions.len();
                self.project
                    .transitions
                    .retain(|t| !t.is_at(layer, after_clip_index));
                self.project.transitions.len() != before
            }
            TimelineIntent::RemoveAudio(id) => {
                let before = self.project.audio.len();
                self.project.audio.retain(|t| t.id != id);
                self.project.audio.len() != before
            }
            TimelineIntent::UpdateAudio { id, patch } => self.update_audio(&id, &patch),
            TimelineIntent::SplitAudio { id, at } => self.split_audio(&id, at),
            TimelineIntent::MediaDrop { media, layer, time } => self.drop_media(media, layer, time),
            TimelineIntent::Seek(time) => self.seek(time),
            TimelineIntent::TogglePlay => {
                self.playing = !self.playing;
                true
            }
            TimelineIntent::SetZoom(zoom) => {
                if zoom == self.scale.zoom() {
                    return false;
                }
                self.scale.set_zoom(zoom);
                true
            }
            TimelineIntent::SetLayoutMode(mode) => {
                let changed = self.project.mode != mode;
                self.project.mode = mode;
                changed
            }
            TimelineIntent::ResetPositions => {
                let mut changed = false;
                for settings in self.project.settings.values_mut() {
                    changed |= settings.position_seconds.take().is_some();
                }
                changed
            }
            TimelineIntent::AddLayer => self.project.layers.add_layer().is_some(),
            TimelineIntent::RemoveLayer(id) => {
                let in_use = self.project.layer_in_use(id);
                self.project.layers.remove_layer(id, |_| in_use)
            }
            TimelineIntent::ToggleLayerLock(id) => self.project.layers.toggle_lock(id).is_some(),
            TimelineIntent::ToggleLayerVisibility(id) => {
                self.project.layers.toggle_visibility(id).is_some()
            }
            TimelineIntent::Undo | TimelineIntent::Redo => false,
        }
    }

    // ── Clip edits ──────────────────────────────────────────────

    fn select(&mut self, ids: Vec<ClipId>) -> bool {
        let mut selection: Vec<ClipId> = Vec::with_capacity(ids.len());
        for id in ids {
            if self.project.clip(&id).is_some() && !selection.contains(&id) {
                selection.push(id);
            }
        }
        if selection == self.selection {
            return false;
        }
        self.selection = selection;
        true
    }

    fn remove_clips(&mut self, ids: &[ClipId]) -> bool {
        let anchors = self.project.anchor_transitions();
        let before = self.project.clips.len();
        self.project.clips.retain(|c| !ids.contains(&c.id));
        if self.project.clips.len() == before {
            debug!("Remove ignored, no matching clips");
            return false;
        }
        for id in ids {
            self.project.settings.remove(id);
        }
        self.selection.retain(|id| !ids.contains(id));
        self.project.rebind_transitions(anchors);
        true
    }

    fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.project.clips.len();
        if from >= len || from == to {
            debug!(from, to, len, "Reorder ignored");
            return false;
        }
        let anchors = self.project.anchor_transitions();
        let clip = self.project.clips.remove(from);
        let to = to.min(self.project.clips.len());
        self.project.clips.insert(to, clip);
        self.project.rebind_transitions(anchors);
        true
    }

    fn duplicate(&mut self, id: &ClipId) -> bool {
        let Some(index) = self.project.clip_index(id) else {
            debug!(clip = %id, "Duplicate ignored, unknown clip");
            return false;
        };
        let mut anchors = self.project.anchor_transitions();
        let copy = self.project.clips[index].duplicate();
        if let Some(settings) = self.project.settings.get(id).cloned() {
            self.project.settings.insert(copy.id.clone(), settings);
        }
        for anchor in &mut anchors {
            if &anchor.before == id {
                anchor.before = copy.id.clone();
            }
        }
        self.project.clips.insert(index + 1, copy);
        self.project.rebind_transitions(anchors);
        true
    }

    /// Split at source time `at`. Both halves must keep at least the
    /// minimum clip duration.
    fn split(&mut self, id: &ClipId, at: f64) -> bool {
        let Some(index) = self.project.clip_index(id) else {
            debug!(clip = %id, "Split ignored, unknown clip");
            return false;
        };
        let original = self.project.clips[index].clone();
        let Some(settings) = self.project.settings.get(id).cloned() else {
            debug!(clip = %id, "Split ignored, clip has no settings");
            return false;
        };
        let resolved = settings.resolve(original.kind);
        let min = self.config.min_clip_duration;

        let (mut left, mut right) = (settings.clone(), settings);
        match original.kind {
            ClipKind::Video => {
                let head = (at - resolved.trim_start) / resolved.speed;
                let tail = (resolved.trim_end - at) / resolved.speed;
                if !(head >= min && tail >= min) {
                    debug!(clip = %id, at, "Split point too close to a clip edge");
                    return false;
                }
                left.trim_start = resolved.trim_start;
                left.trim_end = Some(at);
                right.trim_start = at;
                right.trim_end = Some(resolved.trim_end);
                right.position_seconds = resolved.position.map(|p| p + head);
            }
            ClipKind::Image => {
                let tail = resolved.duration - at;
                if !(at >= min && tail >= min) {
                    debug!(clip = %id, at, "Split point too close to a clip edge");
                    return false;
                }
                left.display_duration = Some(at);
                right.display_duration = Some(tail);
                right.position_seconds = resolved.position.map(|p| p + at);
            }
        }

        let mut anchors = self.project.anchor_transitions();
        let head_clip = original.duplicate();
        let mut tail_clip = original.duplicate();
        tail_clip.name = format!("{} (split)", original.name);
        for anchor in &mut anchors {
            anchor.replace(id, &tail_clip.id, &head_clip.id);
        }

        self.project.settings.remove(id);
        self.project.settings.insert(head_clip.id.clone(), left);
        self.project.settings.insert(tail_clip.id.clone(), right);
        for selected in &mut self.selection {
            if selected == id {
                *selected = head_clip.id.clone();
            }
        }
        self.project.clips[index] = head_clip;
        self.project.clips.insert(index + 1, tail_clip);
        self.project.rebind_transitions(anchors);
        true
    }

    /// Move a clip to `layer`. With a `position` (the drop's start time)
    /// the clip is pinned there in free mode, and in snap mode it takes the
    /// list slot on the target layer that the midpoint rule gives it.
    fn change_layer(&mut self, id: &ClipId, layer: LayerId, position: Option<f64>) -> bool {
        if !self.project.layers.contains(layer) {
            debug!(clip = %id, %layer, "Layer change ignored, unknown layer");
            return false;
        }
        let Some(index) = self.project.clip_index(id) else {
            debug!(clip = %id, "Layer change ignored, unknown clip");
            return false;
        };
        let position = position.filter(|p| p.is_finite()).map(|p| p.max(0.0));
        let anchors = self.project.anchor_transitions();
        let moved = self.project.clips[index].layer_id() != layer;

        match (self.project.mode, position) {
            (LayoutMode::Snap, Some(start)) => {
                let duration = self.layout.clip(id).map_or(0.0, |s| s.duration);
                let to = self.insertion_index(layer, start + duration / 2.0, Some(index));
                let mut clip = self.project.clips.remove(index);
                clip.layer = Some(layer);
                self.project.clips.insert(to, clip);
            }
            (LayoutMode::Free, Some(start)) => {
                self.project.clips[index].layer = Some(layer);
                self.project
                    .settings
                    .entry(id.clone())
                    .or_default()
                    .position_seconds = Some(start);
            }
            (_, None) => self.project.clips[index].layer = Some(layer),
        }
        self.project.rebind_transitions(anchors);
        moved || position.is_some()
    }

    fn update_settings(&mut self, id: &ClipId, patch: &SettingsPatch) -> bool {
        let Some(kind) = self.project.clip(id).map(|c| c.kind) else {
            debug!(clip = %id, "Settings change ignored, unknown clip");
            return false;
        };
        let min = self.config.min_clip_duration;
        let settings = self.project.settings.entry(id.clone()).or_default();
        let before = settings.clone();
        patch.apply_to(settings);
        settings.clamp_trim(kind, min);
        *settings != before
    }

    // ── Transitions ─────────────────────────────────────────────

    /// Longest transition allowed at a boundary, or `None` when there is
    /// no pair of clips there.
    fn transition_limit(&self, layer: LayerId, after_clip_index: usize) -> Option<f64> {
        self.layout
            .adjacent_pair(layer, after_clip_index)
            .map(|(before, after)| max_transition_duration(before.duration, after.duration))
    }

    fn add_transition(&mut self, mut transition: Transition) -> bool {
        let layer = transition.layer_id();
        let index = transition.after_clip_index;
        let Some(limit) = self.transition_limit(layer, index) else {
            debug!(%layer, index, "Transition ignored, no adjacent clips");
            return false;
        };
        let requested = if transition.duration.is_finite() && transition.duration > 0.0 {
            transition.duration
        } else {
            self.config.default_transition_duration
        };
        transition.layer = Some(layer);
        transition.duration = requested.min(limit);
        self.project.transitions.retain(|t| !t.is_at(layer, index));
        self.project.transitions.push(transition);
        true
    }

    fn edit_transition(
        &mut self,
        layer: LayerId,
        index: usize,
        kind: Option<TransitionKind>,
        duration: Option<f64>,
    ) -> bool {
        let limit = self.transition_limit(layer, index).unwrap_or(0.0);
        let Some(transition) = self
            .project
            .transitions
            .iter_mut()
            .find(|t| t.is_at(layer, index))
        else {
            debug!(%layer, index, "Edit ignored, no transition there");
            return false;
        };
        let before = transition.clone();
        if let Some(kind) = kind {
            transition.kind = kind;
        }
        if let Some(duration) = duration.filter(|d| d.is_finite()) {
            transition.duration = duration.clamp(0.0, limit);
        }
        *transition != before
    }

    // ── Audio ───────────────────────────────────────────────────

    fn update_audio(&mut self, id: &AudioId, patch: &AudioPatch) -> bool {
        if let Some(layer) = patch.layer {
            if !self.project.layers.contains(layer) {
                debug!(audio = %id, %layer, "Audio update ignored, unknown layer");
                return false;
            }
        }
        let min = self.config.min_clip_duration;
        let Some(track) = self.project.audio.iter_mut().find(|t| &t.id == id) else {
            debug!(audio = %id, "Audio update ignored, unknown track");
            return false;
        };
        let before = track.clone();
        patch.apply_to(track);
        track.sanitize(min);
        *track != before
    }

    fn split_audio(&mut self, id: &AudioId, at: f64) -> bool {
        let Some(index) = self.project.audio_index(id) else {
            debug!(audio = %id, "Audio split ignored, unknown track");
            return false;
        };
        let min = self.config.min_clip_duration;
        let track = &self.project.audio[index];
        if !(at - track.trim_start >= min && track.trim_end - at >= min) {
            debug!(audio = %id, at, "Audio split point too close to an edge");
            return false;
        }
        let mut head = track.clone();
        let mut tail = track.clone();
        head.trim_end = at;
        head.fade_out = 0.0;
        tail.id = AudioId::generate();
        tail.name = format!("{} (split)", track.name);
        tail.trim_start = at;
        tail.position = track.position + (at - track.trim_start);
        tail.sanitize(min);

        self.project.audio[index] = head;
        self.project.audio.insert(index + 1, tail);
        true
    }

    // ── Drops and transport ─────────────────────────────────────

    fn drop_media(&mut self, media: MediaPayload, layer: LayerId, time: f64) -> bool {
        if !self.project.layers.contains(layer) {
            debug!(%layer, "Drop ignored, unknown layer");
            return false;
        }
        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        match media {
            MediaPayload::Visual {
                name,
                url,
                thumbnail_url,
                kind,
                duration,
            } => {
                let mut clip = Clip::new(name, url, kind).on_layer(layer);
                clip.thumbnail_url = thumbnail_url;
                let duration = duration.filter(|d| d.is_finite() && *d > 0.0);
                let mut settings = match kind {
                    ClipKind::Video => ClipSettings::for_video(
                        duration.unwrap_or(self.config.default_video_duration),
                    ),
                    ClipKind::Image => ClipSettings::for_image(
                        duration.unwrap_or(self.config.default_image_duration),
                    ),
                };

                let anchors = self.project.anchor_transitions();
                let index = match self.project.mode {
                    LayoutMode::Snap => self.insertion_index(layer, time, None),
                    LayoutMode::Free => {
                        settings.position_seconds = Some(time);
                        self.project.clips.len()
                    }
                };
                debug!(clip = %clip.id, %layer, index, "Media dropped");
                self.project.settings.insert(clip.id.clone(), settings);
                self.selection = vec![clip.id.clone()];
                self.project.clips.insert(index, clip);
                self.project.rebind_transitions(anchors);
            }
            MediaPayload::Audio {
                name,
                url,
                category,
                duration,
            } => {
                let mut track = AudioTrack::new(name, url, category, duration, time).on_layer(layer);
                track.sanitize(self.config.min_clip_duration);
                debug!(audio = %track.id, %layer, "Audio dropped");
                self.project.audio.push(track);
            }
        }
        true
    }

    /// List index that puts a clip before the first clip on `layer` whose
    /// midpoint lies after `mid`. With `moving`, that list entry is skipped
    /// and the index counts as if it were already taken out.
    fn insertion_index(&self, layer: LayerId, mid: f64, moving: Option<usize>) -> usize {
        let after_removal = |i: usize| match moving {
            Some(m) if i > m => i - 1,
            _ => i,
        };
        let mut last = None;
        for slot in self.layout.clips_on_layer(layer) {
            if Some(slot.index) == moving {
                continue;
            }
            if slot.start + slot.duration / 2.0 > mid {
                return after_removal(slot.index);
            }
            last = Some(slot.index);
        }
        match last {
            Some(i) => after_removal(i) + 1,
            None => moving.unwrap_or(self.project.clips.len()),
        }
    }

    fn seek(&mut self, time: f64) -> bool {
        let time = if time.is_finite() { time } else { 0.0 };
        let clamped = time.clamp(0.0, self.total_duration().max(0.0));
        if clamped == self.playhead {
            return false;
        }
        self.playhead = clamped;
        true
    }

    // ── Internals ───────────────────────────────────────────────

    fn record(&mut self) {
        self.history.record(self.project.clone());
    }

    fn relayout(&mut self) {
        self.layout = self.project.layout(&self.scale);
        self.playhead = self.playhead.clamp(0.0, self.layout.total_duration().max(0.0));
    }

    fn after_restore(&mut self) {
        let project = &self.project;
        self.selection.retain(|id| project.clip(id).is_some());
        self.relayout();
    }
}

impl Default for TimelineDocument {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioCategory;

    fn doc_with(durations: &[f64]) -> (TimelineDocument, Vec<ClipId>) {
        let mut doc = TimelineDocument::default();
        let mut ids = Vec::new();
        for (i, d) in durations.iter().enumerate() {
            let clip = Clip::new(format!("clip {i}"), format!("media/{i}.mp4"), ClipKind::Video);
            ids.push(clip.id.clone());
            doc.insert_clip(clip, ClipSettings::for_video(*d)).unwrap();
        }
        (doc, ids)
    }

    fn starts(doc: &TimelineDocument) -> Vec<f64> {
        doc.layout().clips().iter().map(|s| s.start).collect()
    }

    #[test]
    fn test_insert_validates() {
        let mut doc = TimelineDocument::default();
        let clip = Clip::new("x", "x.mp4", ClipKind::Video);
        assert!(doc.insert_clip(clip.clone(), ClipSettings::default()).is_err());
        let far = clip.on_layer(LayerId::new(5));
        assert!(matches!(
            doc.insert_clip(far, ClipSettings::for_video(2.0)),
            Err(StrataError::LayerNotFound(_))
        ));
        assert!(matches!(
            doc.set_settings(&ClipId::from("nope"), ClipSettings::for_image(1.0)),
            Err(StrataError::ClipNotFound(_))
        ));
    }

    #[test]
    fn test_reorder_moves_clip() {
        let (mut doc, ids) = doc_with(&[5.0, 3.0, 4.0]);
        assert!(doc.apply(TimelineIntent::Reorder { from: 0, to: 2 }));
        assert_eq!(doc.project().clips[2].id, ids[0]);
        assert_eq!(starts(&doc), vec![0.0, 3.0, 7.0]);
        assert!(!doc.apply(TimelineIntent::Reorder { from: 9, to: 0 }));
    }

    #[test]
    fn test_remove_drops_selection_and_settings() {
        let (mut doc, ids) = doc_with(&[5.0, 3.0]);
        doc.apply(TimelineIntent::Select(vec![ids[0].clone()]));
        assert!(doc.apply(TimelineIntent::RemoveClips(vec![ids[0].clone()])));
        assert!(doc.selection().is_empty());
        assert!(!doc.project().settings.contains_key(&ids[0]));
        assert_eq!(doc.total_duration(), 3.0);
    }

    #[test]
    fn test_duplicate_inserts_after() {
        let (mut doc, ids) = doc_with(&[5.0, 3.0]);
        assert!(doc.apply(TimelineIntent::Duplicate(ids[0].clone())));
        assert_eq!(doc.project().clips.len(), 3);
        assert_eq!(doc.project().clips[0].id, ids[0]);
        assert_ne!(doc.project().clips[1].id, ids[0]);
        assert_eq!(starts(&doc), vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_split_partitions_trim_range() {
        let (mut doc, ids) = doc_with(&[10.0]);
        doc.apply(TimelineIntent::UpdateSettings {
            clip_id: ids[0].clone(),
            patch: SettingsPatch::trim(2.0, 8.0),
        });
        assert!(doc.apply(TimelineIntent::Split {
            clip_id: ids[0].clone(),
            at: 5.0,
        }));
        let clips = &doc.project().clips;
        assert_eq!(clips.len(), 2);
        assert!(clips[1].name.ends_with("(split)"));
        let left = doc.resolved(&clips[0].id).unwrap();
        let right = doc.resolved(&clips[1].id).unwrap();
        assert_eq!((left.trim_start, left.trim_end), (2.0, 5.0));
        assert_eq!((right.trim_start, right.trim_end), (5.0, 8.0));
        assert_eq!(left.duration + right.duration, 6.0);
    }

    #[test]
    fn test_split_at_edge_ignored() {
        let (mut doc, ids) = doc_with(&[10.0]);
        assert!(!doc.apply(TimelineIntent::Split {
            clip_id: ids[0].clone(),
            at: 0.05,
        }));
        assert_eq!(doc.project().clips.len(), 1);
    }

    #[test]
    fn test_transition_clamped_to_shorter_neighbour() {
        let (mut doc, _) = doc_with(&[5.0, 2.0]);
        assert!(doc.apply(TimelineIntent::AddTransition(Transition::new(
            LayerId::DEFAULT,
            0,
            TransitionKind::Fade,
            4.0,
        ))));
        assert_eq!(doc.project().transitions[0].duration, 2.0);
        assert!(!doc.apply(TimelineIntent::AddTransition(Transition::new(
            LayerId::DEFAULT,
            1,
            TransitionKind::Fade,
            1.0,
        ))));
    }

    #[test]
    fn test_edit_and_remove_transition() {
        let (mut doc, _) = doc_with(&[5.0, 3.0]);
        doc.apply(TimelineIntent::AddTransition(Transition::new(
            LayerId::DEFAULT,
            0,
            TransitionKind::Fade,
            1.0,
        )));
        assert!(doc.apply(TimelineIntent::EditTransition {
            layer: LayerId::DEFAULT,
            after_clip_index: 0,
            kind: Some(TransitionKind::WipeLeft),
            duration: Some(0.5),
        }));
        assert_eq!(doc.project().transitions[0].kind, TransitionKind::WipeLeft);
        assert_eq!(starts(&doc), vec![0.0, 4.5]);
        assert!(doc.apply(TimelineIntent::RemoveTransition {
            layer: LayerId::DEFAULT,
            after_clip_index: 0,
        }));
        assert_eq!(starts(&doc), vec![0.0, 5.0]);
    }

    #[test]
    fn test_seek_clamps() {
        let (mut doc, _) = doc_with(&[5.0]);
        doc.apply(TimelineIntent::Seek(50.0));
        assert_eq!(doc.playhead(), 5.0);
        doc.apply(TimelineIntent::Seek(-1.0));
        assert_eq!(doc.playhead(), 0.0);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let (mut doc, _) = doc_with(&[1.0]);
        doc.apply(TimelineIntent::TogglePlay);
        assert!(doc.is_playing());
        doc.advance(0.5);
        assert_eq!(doc.playhead(), 0.5);
        doc.advance(2.0);
        assert_eq!(doc.playhead(), 1.0);
        assert!(!doc.is_playing());
    }

    #[test]
    fn test_undo_redo() {
        let (mut doc, ids) = doc_with(&[5.0, 3.0]);
        doc.apply(TimelineIntent::RemoveClips(vec![ids[1].clone()]));
        assert_eq!(doc.project().clips.len(), 1);
        assert!(doc.apply(TimelineIntent::Undo));
        assert_eq!(doc.project().clips.len(), 2);
        assert!(doc.apply(TimelineIntent::Redo));
        assert_eq!(doc.project().clips.len(), 1);
    }

    #[test]
    fn test_seek_not_recorded() {
        let (mut doc, _) = doc_with(&[5.0]);
        let depth = doc.history.undo_count();
        doc.apply(TimelineIntent::Seek(2.0));
        doc.apply(TimelineIntent::SetZoom(Zoom::new(2.0)));
        assert_eq!(doc.history.undo_count(), depth);
    }

    #[test]
    fn test_media_drop_inserts_by_time() {
        let (mut doc, ids) = doc_with(&[4.0, 4.0]);
        let dropped = doc.apply(TimelineIntent::MediaDrop {
            media: MediaPayload::Visual {
                name: "still".into(),
                url: "still.png".into(),
                thumbnail_url: None,
                kind: ClipKind::Image,
                duration: None,
            },
            layer: LayerId::DEFAULT,
            time: 5.0,
        });
        assert!(dropped);
        let clips = &doc.project().clips;
        assert_eq!(clips[0].id, ids[0]);
        assert_eq!(clips[1].kind, ClipKind::Image);
        assert_eq!(clips[2].id, ids[1]);
        assert_eq!(doc.selection(), &[clips[1].id.clone()]);
        assert_eq!(starts(&doc), vec![0.0, 4.0, 9.0]);
    }

    #[test]
    fn test_video_drop_without_length_uses_default() {
        let mut doc = TimelineDocument::default();
        doc.apply(TimelineIntent::MediaDrop {
            media: MediaPayload::Visual {
                name: "raw".into(),
                url: "raw.mov".into(),
                thumbnail_url: None,
                kind: ClipKind::Video,
                duration: None,
            },
            layer: LayerId::DEFAULT,
            time: 0.0,
        });
        let id = doc.project().clips[0].id.clone();
        let resolved = doc.resolved(&id).unwrap();
        assert_eq!(resolved.duration, doc.config().default_video_duration);
        assert_eq!(doc.total_duration(), 10.0);
        assert!(doc.project().settings[&id].validate(ClipKind::Video).is_ok());
    }

    #[test]
    fn test_media_drop_free_mode_positions() {
        let (mut doc, _) = doc_with(&[4.0]);
        doc.apply(TimelineIntent::SetLayoutMode(LayoutMode::Free));
        doc.apply(TimelineIntent::MediaDrop {
            media: MediaPayload::Visual {
                name: "b".into(),
                url: "b.mp4".into(),
                thumbnail_url: None,
                kind: ClipKind::Video,
                duration: Some(2.0),
            },
            layer: LayerId::DEFAULT,
            time: 10.0,
        });
        assert_eq!(starts(&doc), vec![0.0, 10.0]);
        assert_eq!(doc.total_duration(), 12.0);
    }

    #[test]
    fn test_audio_drop_update_split() {
        let mut doc = TimelineDocument::default();
        doc.apply(TimelineIntent::MediaDrop {
            media: MediaPayload::Audio {
                name: "bed".into(),
                url: "bed.mp3".into(),
                category: AudioCategory::Music,
                duration: 20.0,
            },
            layer: LayerId::DEFAULT,
            time: 2.0,
        });
        let id = doc.project().audio[0].id.clone();
        assert!(doc.apply(TimelineIntent::UpdateAudio {
            id: id.clone(),
            patch: AudioPatch {
                fade_out: Some(30.0),
                ..AudioPatch::default()
            },
        }));
        assert_eq!(doc.project().audio[0].fade_out, 10.0);

        assert!(doc.apply(TimelineIntent::SplitAudio { id, at: 8.0 }));
        let audio = &doc.project().audio;
        assert_eq!(audio.len(), 2);
        assert_eq!(audio[0].trim_end, 8.0);
        assert_eq!(audio[0].fade_out, 0.0);
        assert_eq!(audio[1].position, 10.0);
        assert_eq!(audio[1].fade_out, 10.0);
        assert_eq!(doc.total_duration(), 22.0);
    }

    #[test]
    fn test_layer_intents() {
        let (mut doc, ids) = doc_with(&[2.0]);
        assert!(doc.apply(TimelineIntent::AddLayer));
        assert!(doc.apply(TimelineIntent::ChangeLayer {
            clip_id: ids[0].clone(),
            layer: LayerId::new(2),
            position: None,
        }));
        assert!(!doc.apply(TimelineIntent::RemoveLayer(LayerId::new(2))));
        assert!(doc.apply(TimelineIntent::ToggleLayerLock(LayerId::new(2))));
        assert!(doc.project().layers.is_locked(LayerId::new(2)));
        assert!(!doc.apply(TimelineIntent::RemoveLayer(LayerId::new(1))));
    }

    #[test]
    fn test_config_caps_layers() {
        let config = TimelineConfig {
            max_layers: 2,
            ..TimelineConfig::default()
        };
        let mut doc = TimelineDocument::new(config.clone());
        assert!(doc.apply(TimelineIntent::AddLayer));
        assert!(!doc.apply(TimelineIntent::AddLayer));
        assert_eq!(doc.project().layers.max_layers(), 2);

        let mut project = Project::new("wide");
        for _ in 0..4 {
            project.layers.add_layer();
        }
        let doc = TimelineDocument::with_project(project, config);
        assert_eq!(doc.project().layers.len(), 2);
    }

    #[test]
    fn test_change_layer_lands_at_drop_time() {
        let (mut doc, ids) = doc_with(&[5.0]);
        doc.apply(TimelineIntent::AddLayer);
        for name in ["b", "c"] {
            let clip = Clip::new(name, format!("{name}.mp4"), ClipKind::Video).on_layer(LayerId::new(2));
            doc.insert_clip(clip, ClipSettings::for_video(4.0)).unwrap();
        }
        assert!(doc.apply(TimelineIntent::ChangeLayer {
            clip_id: ids[0].clone(),
            layer: LayerId::new(2),
            position: Some(9.0),
        }));
        let layer2: Vec<f64> = doc
            .layout()
            .clips_on_layer(LayerId::new(2))
            .map(|s| s.start)
            .collect();
        assert_eq!(layer2, vec![0.0, 4.0, 8.0]);
        assert_eq!(doc.layout().clip(&ids[0]).unwrap().start, 8.0);
        // snap mode keeps no manual position
        assert_eq!(doc.project().settings[&ids[0]].position_seconds, None);

        assert!(doc.apply(TimelineIntent::ChangeLayer {
            clip_id: ids[0].clone(),
            layer: LayerId::new(2),
            position: Some(0.5),
        }));
        // midpoint 3.0 passes the first clip's but not the second's
        assert_eq!(doc.layout().clip(&ids[0]).unwrap().start, 4.0);
        assert!(doc.undo());
        assert_eq!(doc.layout().clip(&ids[0]).unwrap().start, 8.0);
    }

    #[test]
    fn test_change_layer_free_mode_pins_position() {
        let (mut doc, ids) = doc_with(&[5.0]);
        doc.apply(TimelineIntent::AddLayer);
        doc.apply(TimelineIntent::SetLayoutMode(LayoutMode::Free));
        doc.apply(TimelineIntent::ChangeLayer {
            clip_id: ids[0].clone(),
            layer: LayerId::new(2),
            position: Some(3.0),
        });
        let slot = doc.layout().clip(&ids[0]).unwrap();
        assert_eq!((slot.layer, slot.start), (LayerId::new(2), 3.0));
    }

    #[test]
    fn test_reset_positions() {
        let (mut doc, ids) = doc_with(&[2.0, 2.0]);
        doc.apply(TimelineIntent::SetLayoutMode(LayoutMode::Free));
        doc.apply(TimelineIntent::UpdateSettings {
            clip_id: ids[0].clone(),
            patch: SettingsPatch::position(6.0),
        });
        assert_eq!(starts(&doc), vec![6.0, 2.0]);
        assert!(doc.apply(TimelineIntent::ResetPositions));
        assert_eq!(starts(&doc), vec![0.0, 2.0]);
        assert!(!doc.apply(TimelineIntent::ResetPositions));
    }
}
