//! Pointer, keyboard and drop handling for the timeline.
//!
//! `TimelineController` is an explicit gesture state machine:
//!
//! ```text
//! Idle ──down on block──▶ Pressed ──move > dead zone──▶ Dragging ──up──▶ Idle
//!   │                        └──────────up (click)──────────────────────▶ Idle
//!   ├──down on handle──▶ Trimming ──up──▶ Idle
//!   └──down on ruler/lane──▶ Scrubbing ──up──▶ Idle
//! ```
//!
//! A secondary click remembers what it landed on as the menu target. Menu
//! choices then arrive as [`ControllerInput::Menu`] and act on that target.
//!
//! Every non-idle state holds the pointer. Capture ends on pointer-up, on
//! [`TimelineController::cancel`], or when the controller is dropped.
//!
//! The controller never touches records. It reads a [`TimelineContext`] and
//! returns [`TimelineIntent`]s for the host to apply. Drags and trims emit
//! their intent once, on release, so one gesture is one undo step.

use egui::{Pos2, Rect, Vec2};
use strata_core::TimelineConfig;
use strata_timeline::{
    AudioId, AudioPatch, AudioTrack, ClipId, LayerId, Layout, LayoutMode, MediaPayload, Project,
    ResolvedSettings, SettingsPatch, SettingsSource, TimelineDocument, TimelineIntent, Transition,
    TransitionKind,
};
use tracing::debug;

use crate::scene::{Hit, TimelineScene};
use crate::selection;
use crate::shortcuts::{Keymap, Modifiers, Shortcut, TimelineCommand};
use crate::snapping::SnappingEngine;
use crate::transport::Transport;
use crate::trim::{trim_audio, trim_clip, TrimEdge, TrimTarget};

// ── Inputs ──────────────────────────────────────────────────────

/// Something dragged onto the timeline from outside.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    Media(MediaPayload),
    Transition(TransitionKind),
}

/// One input event, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerInput {
    PointerDown { pos: Pos2, modifiers: Modifiers },
    PointerMove { pos: Pos2 },
    PointerUp { pos: Pos2 },
    Key(Shortcut),
    Drop { pos: Pos2, payload: DropPayload },
    /// Secondary click, opening a context menu.
    ContextMenu { pos: Pos2 },
    Menu(MenuChoice),
}

/// What a context menu was opened on.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuTarget {
    Clip(ClipId),
    Audio(AudioId),
    Transition { layer: LayerId, after_clip_index: usize },
}

/// An entry picked from a context menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuChoice {
    Remove,
    Duplicate,
    ToggleMute,
    Volume(f32),
    Speed(f64),
    FadeOut(f64),
    TransitionKind(TransitionKind),
    TransitionDuration(f64),
}

/// Read-only view of the host state for one event.
pub struct TimelineContext<'a> {
    pub scene: &'a TimelineScene,
    pub project: &'a Project,
    pub layout: &'a Layout,
    pub config: &'a TimelineConfig,
    pub transport: Transport,
    pub selection: &'a [ClipId],
}

impl<'a> TimelineContext<'a> {
    pub fn new(document: &'a TimelineDocument, scene: &'a TimelineScene) -> Self {
        let config = document.config();
        Self {
            scene,
            project: document.project(),
            layout: document.layout(),
            config,
            transport: Transport::new(
                document.playhead(),
                document.total_duration(),
                document.is_playing(),
                config.frame_duration(),
            ),
            selection: document.selection(),
        }
    }
}

// ── Gesture state ───────────────────────────────────────────────

/// A block picked up by the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSubject {
    Clip {
        id: ClipId,
        index: usize,
        layer: LayerId,
        start: f64,
        duration: f64,
    },
    Audio {
        id: AudioId,
        layer: LayerId,
        start: f64,
        duration: f64,
    },
}

/// Snapshot a trim works against.
#[derive(Debug, Clone, PartialEq)]
pub enum TrimSubject {
    Clip {
        id: ClipId,
        anchor: ResolvedSettings,
    },
    Audio(AudioTrack),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pressed {
        subject: DragSubject,
        origin: Pos2,
    },
    Dragging {
        subject: DragSubject,
        origin: Pos2,
        current: Pos2,
    },
    Trimming {
        subject: TrimSubject,
        edge: TrimEdge,
        anchor_x: f32,
        current_x: f32,
    },
    Scrubbing,
}

// ── Controller ──────────────────────────────────────────────────

/// Turns input events into timeline intents.
#[derive(Debug)]
pub struct TimelineController {
    state: GestureState,
    keymap: Keymap,
    snapping: SnappingEngine,
    dead_zone: f32,
    menu: Option<MenuTarget>,
}

impl TimelineController {
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            state: GestureState::Idle,
            keymap: Keymap::default(),
            snapping: SnappingEngine::new(config.snap_distance_px),
            dead_zone: config.drag_dead_zone,
            menu: None,
        }
    }

    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn snapping_mut(&mut self) -> &mut SnappingEngine {
        &mut self.snapping
    }

    pub fn menu_target(&self) -> Option<&MenuTarget> {
        self.menu.as_ref()
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    /// Whether a gesture currently holds the pointer.
    pub fn is_capturing(&self) -> bool {
        self.state != GestureState::Idle
    }

    /// Abandon the active gesture without emitting anything.
    pub fn cancel(&mut self) {
        if self.is_capturing() {
            debug!("Gesture cancelled");
        }
        self.state = GestureState::Idle;
    }

    /// Handle one input event.
    pub fn handle(&mut self, input: ControllerInput, cx: &TimelineContext<'_>) -> Vec<TimelineIntent> {
        match input {
            ControllerInput::PointerDown { pos, modifiers } => self.pointer_down(pos, modifiers, cx),
            ControllerInput::PointerMove { pos } => self.pointer_move(pos, cx),
            ControllerInput::PointerUp { pos } => self.pointer_up(pos, cx),
            ControllerInput::Key(shortcut) => self.key(shortcut, cx),
            ControllerInput::Drop { pos, payload } => self.drop_payload(pos, payload, cx),
            ControllerInput::ContextMenu { pos } => self.open_menu(pos, cx),
            ControllerInput::Menu(choice) => self.menu_choice(choice, cx),
        }
    }

    /// Where the grabbed block would land, for drawing a ghost.
    pub fn preview(&self, scene: &TimelineScene) -> Option<Rect> {
        match &self.state {
            GestureState::Dragging {
                subject,
                origin,
                current,
            } => {
                let rect = match subject {
                    DragSubject::Clip { id, .. } => scene.clip_block(id)?.rect,
                    DragSubject::Audio { id, .. } => scene.audio_block(id)?.rect,
                };
                let rows = row_delta(current.y - origin.y, scene.metrics().layer_height());
                Some(rect.translate(Vec2::new(
                    current.x - origin.x,
                    rows as f32 * scene.metrics().layer_height(),
                )))
            }
            GestureState::Trimming {
                subject,
                edge,
                anchor_x,
                current_x,
            } => {
                let mut rect = match subject {
                    TrimSubject::Clip { id, .. } => scene.clip_block(id)?.rect,
                    TrimSubject::Audio(track) => scene.audio_block(&track.id)?.rect,
                };
                let dx = current_x - anchor_x;
                match edge {
                    TrimEdge::Left => rect.min.x = (rect.min.x + dx).min(rect.max.x - 1.0),
                    TrimEdge::Right => rect.max.x = (rect.max.x + dx).max(rect.min.x + 1.0),
                }
                Some(rect)
            }
            _ => None,
        }
    }

    // ── Pointer ─────────────────────────────────────────────────

    fn pointer_down(
        &mut self,
        pos: Pos2,
        modifiers: Modifiers,
        cx: &TimelineContext<'_>,
    ) -> Vec<TimelineIntent> {
        self.cancel();
        self.menu = None;
        let mut intents = Vec::new();

        match cx.scene.hit_test(pos) {
            Hit::Ruler { time } => {
                self.state = GestureState::Scrubbing;
                intents.extend(cx.transport.seek(time));
            }
            Hit::TrimHandle { target, edge } => {
                if let Some(subject) = self.trim_subject(&target, cx) {
                    self.state = GestureState::Trimming {
                        subject,
                        edge,
                        anchor_x: pos.x,
                        current_x: pos.x,
                    };
                }
            }
            Hit::Clip(id) => {
                let next = selection::click(cx.selection, &id, modifiers.shift);
                if next != cx.selection {
                    intents.push(TimelineIntent::Select(next));
                }
                let Some(block) = cx.scene.clip_block(&id) else {
                    return intents;
                };
                if block.locked {
                    debug!(clip = %id, layer = %block.layer, "Drag refused, layer is locked");
                    return intents;
                }
                self.state = GestureState::Pressed {
                    subject: DragSubject::Clip {
                        id: id.clone(),
                        index: block.index,
                        layer: block.layer,
                        start: block.start,
                        duration: block.duration,
                    },
                    origin: pos,
                };
            }
            Hit::Audio(id) => {
                let Some(block) = cx.scene.audio_block(&id) else {
                    return intents;
                };
                if block.locked {
                    debug!(audio = %id, layer = %block.layer, "Drag refused, layer is locked");
                    return intents;
                }
                self.state = GestureState::Pressed {
                    subject: DragSubject::Audio {
                        id: id.clone(),
                        layer: block.layer,
                        start: block.start,
                        duration: block.duration,
                    },
                    origin: pos,
                };
            }
            Hit::Lane { time, .. } => {
                if !modifiers.shift && !cx.selection.is_empty() {
                    intents.push(TimelineIntent::Select(Vec::new()));
                }
                self.state = GestureState::Scrubbing;
                intents.extend(cx.transport.seek(time));
            }
            Hit::TransitionBadge { .. } | Hit::None => {}
        }

        intents
    }

    fn trim_subject(&self, target: &TrimTarget, cx: &TimelineContext<'_>) -> Option<TrimSubject> {
        match target {
            TrimTarget::Clip(id) => {
                let block = cx.scene.clip_block(id)?;
                if block.locked {
                    debug!(clip = %id, "Trim refused, layer is locked");
                    return None;
                }
                let clip = cx.project.clip(id)?;
                Some(TrimSubject::Clip {
                    id: id.clone(),
                    anchor: cx.project.resolve(clip),
                })
            }
            TrimTarget::Audio(id) => {
                let block = cx.scene.audio_block(id)?;
                if block.locked {
                    debug!(audio = %id, "Trim refused, layer is locked");
                    return None;
                }
                cx.project.audio_track(id).cloned().map(TrimSubject::Audio)
            }
        }
    }

    fn pointer_move(&mut self, pos: Pos2, cx: &TimelineContext<'_>) -> Vec<TimelineIntent> {
        match &mut self.state {
            GestureState::Idle => Vec::new(),
            GestureState::Pressed { subject, origin } => {
                if pos.distance(*origin) > self.dead_zone {
                    self.state = GestureState::Dragging {
                        subject: subject.clone(),
                        origin: *origin,
                        current: pos,
                    };
                }
                Vec::new()
            }
            GestureState::Dragging { current, .. } => {
                *current = pos;
                Vec::new()
            }
            GestureState::Trimming { current_x, .. } => {
                *current_x = pos.x;
                Vec::new()
            }
            GestureState::Scrubbing => cx
                .transport
                .seek(cx.scene.x_to_time(pos.x))
                .into_iter()
                .collect(),
        }
    }

    fn pointer_up(&mut self, pos: Pos2, cx: &TimelineContext<'_>) -> Vec<TimelineIntent> {
        self.pointer_move(pos, cx);
        match std::mem::take(&mut self.state) {
            GestureState::Dragging {
                subject, origin, ..
            } => self.finish_drag(subject, pos - origin, cx),
            GestureState::Trimming {
                subject,
                edge,
                anchor_x,
                ..
            } => finish_trim(subject, edge, pos.x - anchor_x, cx),
            GestureState::Scrubbing => cx
                .transport
                .seek(cx.scene.x_to_time(pos.x))
                .into_iter()
                .collect(),
            GestureState::Idle | GestureState::Pressed { .. } => Vec::new(),
        }
    }

    fn finish_drag(
        &self,
        subject: DragSubject,
        delta: Vec2,
        cx: &TimelineContext<'_>,
    ) -> Vec<TimelineIntent> {
        let scale = cx.scene.scale();
        let rows = row_delta(delta.y, cx.scene.metrics().layer_height());
        let moved_horizontally = delta.x.abs() > self.dead_zone;
        let dt = scale.pixels_to_delta(f64::from(delta.x));

        match subject {
            DragSubject::Clip {
                id,
                index,
                layer,
                start,
                duration,
            } => {
                if rows != 0 {
                    let Some(target) = self.target_layer(layer, rows, cx) else {
                        return Vec::new();
                    };
                    let position = match cx.project.mode {
                        LayoutMode::Free => self.snapped_start(&id, start + dt, duration, cx),
                        LayoutMode::Snap => (start + dt).max(0.0),
                    };
                    return vec![TimelineIntent::ChangeLayer {
                        clip_id: id,
                        layer: target,
                        position: Some(position),
                    }];
                }
                if !moved_horizontally {
                    return Vec::new();
                }
                match cx.project.mode {
                    LayoutMode::Snap => reorder_target(cx.layout, &id, index, layer, start + dt, duration)
                        .map(|to| TimelineIntent::Reorder { from: index, to })
                        .into_iter()
                        .collect(),
                    LayoutMode::Free => {
                        let position = self.snapped_start(&id, start + dt, duration, cx);
                        vec![TimelineIntent::UpdateSettings {
                            clip_id: id,
                            patch: SettingsPatch::position(position),
                        }]
                    }
                }
            }
            DragSubject::Audio {
                id,
                layer,
                start,
                duration,
            } => {
                let mut patch = AudioPatch::default();
                if rows != 0 {
                    patch.layer = Some(self.target_layer(layer, rows, cx).unwrap_or(layer));
                }
                if moved_horizontally {
                    let points = SnappingEngine::collect_snap_points(
                        cx.layout,
                        cx.transport.time,
                        None,
                    );
                    let position = self
                        .snapping
                        .snap_clip((start + dt).max(0.0), duration, &points, scale);
                    patch.position = Some(position.max(0.0));
                }
                if patch.layer == Some(layer) {
                    patch.layer = None;
                }
                if patch == AudioPatch::default() {
                    return Vec::new();
                }
                vec![TimelineIntent::UpdateAudio { id, patch }]
            }
        }
    }

    /// Layer `rows` away, clamped to the registry. `None` when that is the
    /// same layer or a locked one.
    fn target_layer(&self, layer: LayerId, rows: i32, cx: &TimelineContext<'_>) -> Option<LayerId> {
        let target = cx.project.layers.offset(layer, rows);
        if target == layer {
            return None;
        }
        if cx.project.layers.is_locked(target) {
            debug!(%target, "Move refused, target layer is locked");
            return None;
        }
        Some(target)
    }

    fn snapped_start(&self, id: &ClipId, start: f64, duration: f64, cx: &TimelineContext<'_>) -> f64 {
        let points = SnappingEngine::collect_snap_points(cx.layout, cx.transport.time, Some(id));
        self.snapping
            .snap_clip(start.max(0.0), duration, &points, cx.scene.scale())
            .max(0.0)
    }

    // ── Keyboard ────────────────────────────────────────────────

    fn key(&mut self, shortcut: Shortcut, cx: &TimelineContext<'_>) -> Vec<TimelineIntent> {
        let Some(command) = self.keymap.get(&shortcut) else {
            return Vec::new();
        };
        let transport = &cx.transport;

        let intent = match command {
            TimelineCommand::PlayPause => Some(transport.toggle_play()),
            TimelineCommand::FrameBack => transport.step_frames(-1),
            TimelineCommand::FrameForward => transport.step_frames(1),
            TimelineCommand::SecondBack => transport.step_seconds(-1.0),
            TimelineCommand::SecondForward => transport.step_seconds(1.0),
            TimelineCommand::SkipToStart => transport.skip_to_start(),
            TimelineCommand::SkipToEnd => transport.skip_to_end(),
            TimelineCommand::SelectAll => {
                let all = selection::select_all(cx.project.clips.iter().map(|c| &c.id));
                (all != cx.selection).then_some(TimelineIntent::Select(all))
            }
            TimelineCommand::Escape => {
                if self.is_capturing() {
                    self.cancel();
                    None
                } else {
                    (!cx.selection.is_empty()).then(|| TimelineIntent::Select(Vec::new()))
                }
            }
            TimelineCommand::DeleteSelected => {
                let ids: Vec<ClipId> = cx
                    .selection
                    .iter()
                    .filter(|id| !clip_locked(cx, id))
                    .cloned()
                    .collect();
                (!ids.is_empty()).then_some(TimelineIntent::RemoveClips(ids))
            }
            TimelineCommand::SplitAtPlayhead => return split_at_playhead(cx),
            TimelineCommand::Duplicate => {
                return cx
                    .selection
                    .iter()
                    .filter(|id| !clip_locked(cx, id))
                    .map(|id| TimelineIntent::Duplicate(id.clone()))
                    .collect();
            }
            TimelineCommand::Undo => Some(TimelineIntent::Undo),
            TimelineCommand::Redo => Some(TimelineIntent::Redo),
            TimelineCommand::ZoomIn => {
                let zoom = cx.scene.scale().zoom();
                (!zoom.is_max()).then(|| TimelineIntent::SetZoom(zoom.step_in()))
            }
            TimelineCommand::ZoomOut => {
                let zoom = cx.scene.scale().zoom();
                (!zoom.is_min()).then(|| TimelineIntent::SetZoom(zoom.step_out()))
            }
        };

        intent.into_iter().collect()
    }

    // ── Drops ───────────────────────────────────────────────────

    fn drop_payload(
        &mut self,
        pos: Pos2,
        payload: DropPayload,
        cx: &TimelineContext<'_>,
    ) -> Vec<TimelineIntent> {
        match payload {
            DropPayload::Media(media) => {
                let Some((layer, _)) = cx.scene.lane_at_y(pos.y) else {
                    debug!("Drop ignored, not over a lane");
                    return Vec::new();
                };
                if cx.project.layers.is_locked(layer) {
                    debug!(%layer, "Drop refused, layer is locked");
                    return Vec::new();
                }
                vec![TimelineIntent::MediaDrop {
                    media,
                    layer,
                    time: cx.scene.x_to_time(pos.x),
                }]
            }
            DropPayload::Transition(kind) => {
                let Some(zone) = cx.scene.zone_at(pos) else {
                    debug!("Transition drop ignored, not between two clips");
                    return Vec::new();
                };
                if zone.locked {
                    debug!(layer = %zone.layer, "Drop refused, layer is locked");
                    return Vec::new();
                }
                let intent = if zone.occupied {
                    TimelineIntent::EditTransition {
                        layer: zone.layer,
                        after_clip_index: zone.after_clip_index,
                        kind: Some(kind),
                        duration: None,
                    }
                } else {
                    TimelineIntent::AddTransition(Transition::new(
                        zone.layer,
                        zone.after_clip_index,
                        kind,
                        cx.config.default_transition_duration,
                    ))
                };
                vec![intent]
            }
        }
    }
}

impl TimelineController {
    // ── Context menus ───────────────────────────────────────────

    fn open_menu(&mut self, pos: Pos2, cx: &TimelineContext<'_>) -> Vec<TimelineIntent> {
        self.cancel();
        self.menu = None;
        let (target, layer) = match cx.scene.hit_test(pos) {
            Hit::Clip(id)
            | Hit::TrimHandle {
                target: TrimTarget::Clip(id),
                ..
            } => {
                let Some(layer) = cx.scene.clip_block(&id).map(|b| b.layer) else {
                    return Vec::new();
                };
                (MenuTarget::Clip(id), layer)
            }
            Hit::Audio(id)
            | Hit::TrimHandle {
                target: TrimTarget::Audio(id),
                ..
            } => {
                let Some(layer) = cx.scene.audio_block(&id).map(|b| b.layer) else {
                    return Vec::new();
                };
                (MenuTarget::Audio(id), layer)
            }
            Hit::TransitionBadge {
                layer,
                after_clip_index,
            } => (
                MenuTarget::Transition {
                    layer,
                    after_clip_index,
                },
                layer,
            ),
            _ => return Vec::new(),
        };
        if cx.project.layers.is_locked(layer) {
            debug!(%layer, "Menu refused, layer is locked");
            return Vec::new();
        }

        let select = match &target {
            MenuTarget::Clip(id) if !cx.selection.contains(id) => {
                Some(TimelineIntent::Select(vec![id.clone()]))
            }
            _ => None,
        };
        self.menu = Some(target);
        select.into_iter().collect()
    }

    fn menu_choice(&mut self, choice: MenuChoice, cx: &TimelineContext<'_>) -> Vec<TimelineIntent> {
        let Some(target) = self.menu.take() else {
            debug!(?choice, "Menu choice without an open menu");
            return Vec::new();
        };
        let intent = match (target, choice) {
            (MenuTarget::Clip(id), MenuChoice::Remove) => Some(TimelineIntent::RemoveClips(vec![id])),
            (MenuTarget::Clip(id), MenuChoice::Duplicate) => Some(TimelineIntent::Duplicate(id)),
            (MenuTarget::Clip(id), MenuChoice::ToggleMute) => {
                cx.project.clip(&id).map(|clip| {
                    let muted = cx.project.resolve(clip).muted;
                    TimelineIntent::UpdateSettings {
                        clip_id: id,
                        patch: SettingsPatch {
                            muted: Some(!muted),
                            ..SettingsPatch::default()
                        },
                    }
                })
            }
            (MenuTarget::Clip(id), MenuChoice::Volume(volume)) => Some(TimelineIntent::UpdateSettings {
                clip_id: id,
                patch: SettingsPatch {
                    volume: Some(volume.clamp(0.0, 1.0)),
                    ..SettingsPatch::default()
                },
            }),
            (MenuTarget::Clip(id), MenuChoice::Speed(speed)) => Some(TimelineIntent::UpdateSettings {
                clip_id: id,
                patch: SettingsPatch {
                    speed: Some(speed),
                    ..SettingsPatch::default()
                },
            }),
            (MenuTarget::Audio(id), MenuChoice::Remove) => Some(TimelineIntent::RemoveAudio(id)),
            (MenuTarget::Audio(id), MenuChoice::Volume(volume)) => Some(TimelineIntent::UpdateAudio {
                id,
                patch: AudioPatch {
                    volume: Some(volume.clamp(0.0, 1.0)),
                    ..AudioPatch::default()
                },
            }),
            (MenuTarget::Audio(id), MenuChoice::FadeOut(seconds)) => Some(TimelineIntent::UpdateAudio {
                id,
                patch: AudioPatch {
                    fade_out: Some(seconds.max(0.0)),
                    ..AudioPatch::default()
                },
            }),
            (
                MenuTarget::Transition {
                    layer,
                    after_clip_index,
                },
                MenuChoice::Remove,
            ) => Some(TimelineIntent::RemoveTransition {
                layer,
                after_clip_index,
            }),
            (
                MenuTarget::Transition {
                    layer,
                    after_clip_index,
                },
                MenuChoice::TransitionKind(kind),
            ) => Some(TimelineIntent::EditTransition {
                layer,
                after_clip_index,
                kind: Some(kind),
                duration: None,
            }),
            (
                MenuTarget::Transition {
                    layer,
                    after_clip_index,
                },
                MenuChoice::TransitionDuration(duration),
            ) => Some(TimelineIntent::EditTransition {
                layer,
                after_clip_index,
                kind: None,
                duration: Some(duration),
            }),
            (target, choice) => {
                debug!(?target, ?choice, "Menu choice does not apply to its target");
                None
            }
        };
        intent.into_iter().collect()
    }
}

impl Drop for TimelineController {
    fn drop(&mut self) {
        if self.is_capturing() {
            debug!("Controller dropped mid-gesture, pointer released");
            self.state = GestureState::Idle;
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────

/// Whole rows moved; a row changes once the pointer passes half its height.
fn row_delta(dy: f32, layer_height: f32) -> i32 {
    if layer_height <= 0.0 {
        return 0;
    }
    (dy / layer_height).round() as i32
}

fn clip_locked(cx: &TimelineContext<'_>, id: &ClipId) -> bool {
    cx.project
        .clip(id)
        .is_some_and(|c| cx.project.layers.is_locked(c.layer_id()))
}

fn finish_trim(
    subject: TrimSubject,
    edge: TrimEdge,
    dx: f32,
    cx: &TimelineContext<'_>,
) -> Vec<TimelineIntent> {
    let delta = cx.scene.scale().pixels_to_delta(f64::from(dx));
    let min = cx.config.min_clip_duration;
    let intent = match subject {
        TrimSubject::Clip { id, anchor } => trim_clip(&anchor, edge, delta, min)
            .map(|patch| TimelineIntent::UpdateSettings { clip_id: id, patch }),
        TrimSubject::Audio(track) => trim_audio(&track, edge, delta, min)
            .map(|patch| TimelineIntent::UpdateAudio {
                id: track.id.clone(),
                patch,
            }),
    };
    intent.into_iter().collect()
}

/// List index (after removal of `from`) that puts the dragged clip before
/// the first other clip on its layer whose midpoint lies after the dragged
/// clip's new midpoint. `None` when the order would not change.
fn reorder_target(
    layout: &Layout,
    id: &ClipId,
    from: usize,
    layer: LayerId,
    new_start: f64,
    duration: f64,
) -> Option<usize> {
    let mid = new_start + duration / 2.0;
    let others: Vec<_> = layout
        .clips_on_layer(layer)
        .filter(|s| &s.clip_id != id)
        .collect();
    let last = others.last()?;

    let post_removal = |index: usize| if index > from { index - 1 } else { index };
    let to = match others.iter().find(|s| s.start + s.duration / 2.0 > mid) {
        Some(next) => post_removal(next.index),
        None => post_removal(last.index) + 1,
    };
    (to != from).then_some(to)
}

/// Split requests for the selected clips under the playhead, or every clip
/// under it when nothing is selected. Audio under the playhead is split when
/// no clip is.
fn split_at_playhead(cx: &TimelineContext<'_>) -> Vec<TimelineIntent> {
    let time = cx.transport.time;
    let candidates: Vec<&ClipId> = if cx.selection.is_empty() {
        cx.scene.clips.iter().map(|b| &b.clip_id).collect()
    } else {
        cx.selection.iter().collect()
    };

    let clips: Vec<TimelineIntent> = candidates
        .into_iter()
        .filter_map(|id| {
            let block = cx.scene.clip_block(id)?;
            if block.locked || !(time > block.start && time < block.start + block.duration) {
                return None;
            }
            let clip = cx.project.clip(id)?;
            let at = cx.project.resolve(clip).local_to_source(time - block.start);
            Some(TimelineIntent::Split {
                clip_id: id.clone(),
                at,
            })
        })
        .collect();
    if !clips.is_empty() || !cx.selection.is_empty() {
        return clips;
    }

    cx.scene
        .audio
        .iter()
        .filter(|b| !b.locked && time > b.start && time < b.start + b.duration)
        .filter_map(|b| {
            let track = cx.project.audio_track(&b.audio_id)?;
            Some(TimelineIntent::SplitAudio {
                id: b.audio_id.clone(),
                at: track.trim_start + (time - b.start),
            })
        })
        .collect()
}
