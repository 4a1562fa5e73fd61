//! Timeline geometry.
//!
//! `TimelineScene` turns a [`Layout`] into screen rectangles: lane rows,
//! clip and audio blocks, trim handles, thumbnail tiles, transition badges
//! and drop zones, ruler ticks and the playhead. The painter draws exactly
//! this geometry and the controller hit-tests against it, so what is drawn
//! is what can be grabbed.
//!
//! Hidden layers keep their lane row (so the header stays clickable) but
//! contribute no blocks, badges or zones.

use egui::{Pos2, Rect, Vec2};
use strata_core::{TimeScale, TimelineConfig};
use strata_timeline::{
    find_transition, AudioCategory, AudioId, ClipId, ClipKind, LayerId, Layout, Project,
    TransitionKind,
};

use crate::trim::{hit_test_trim_handle, TrimEdge, TrimTarget};

/// Candidate major ruler intervals, in seconds.
pub const RULER_INTERVALS: [f64; 7] = [1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0];

/// Minimum pixel distance between two ruler labels.
pub const MIN_LABEL_SPACING: f64 = 60.0;

/// Minor ticks per major interval.
const MINOR_DIVISIONS: i64 = 4;

/// Minor ticks closer than this are skipped.
const MIN_MINOR_SPACING: f64 = 6.0;

/// Vertical inset of blocks inside their lane.
const BLOCK_INSET: f32 = 2.0;

// ── Inputs ──────────────────────────────────────────────────────

/// Pixel metrics taken from the configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneMetrics {
    pub ruler_height: f32,
    pub clip_lane_height: f32,
    pub audio_lane_height: f32,
    pub handle_width: f32,
    pub tile_width: f32,
    pub zone_width: f32,
}

impl SceneMetrics {
    pub fn from_config(config: &TimelineConfig) -> Self {
        Self {
            ruler_height: config.ruler_height,
            clip_lane_height: config.clip_lane_height,
            audio_lane_height: config.audio_lane_height,
            handle_width: config.trim_handle_width,
            tile_width: config.thumbnail_tile_width,
            zone_width: config.transition_zone_width,
        }
    }

    pub fn layer_height(&self) -> f32 {
        self.clip_lane_height + self.audio_lane_height
    }
}

impl Default for SceneMetrics {
    fn default() -> Self {
        Self::from_config(&TimelineConfig::default())
    }
}

/// Visible window onto the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen position of time zero at scroll 0, top of the ruler
    pub origin: Pos2,
    pub width: f32,
    /// Horizontal scroll in pixels
    pub scroll_x: f32,
}

impl Viewport {
    pub fn new(origin: Pos2, width: f32) -> Self {
        Self {
            origin,
            width,
            scroll_x: 0.0,
        }
    }
}

/// Everything the scene is built from.
pub struct SceneInput<'a> {
    pub project: &'a Project,
    pub layout: &'a Layout,
    pub scale: TimeScale,
    pub metrics: SceneMetrics,
    pub viewport: Viewport,
    pub playhead: f64,
    pub selection: &'a [ClipId],
}

// ── Scene elements ──────────────────────────────────────────────

/// Which half of a layer row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    Clip,
    Audio,
}

/// One layer row: a clip lane over an audio lane.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneRow {
    pub layer: LayerId,
    pub row: usize,
    pub clip_rect: Rect,
    pub audio_rect: Rect,
    pub locked: bool,
    pub visible: bool,
}

impl LaneRow {
    pub fn rect(&self) -> Rect {
        self.clip_rect.union(self.audio_rect)
    }
}

/// A slice of a clip's thumbnail strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailTile {
    pub rect: Rect,
    /// Fraction of the texture width shown (1.0 except for the clipped last tile)
    pub uv_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipBlock {
    pub clip_id: ClipId,
    pub index: usize,
    pub layer: LayerId,
    pub layer_index: usize,
    pub kind: ClipKind,
    pub name: String,
    pub thumbnail: Option<String>,
    pub start: f64,
    pub duration: f64,
    pub rect: Rect,
    pub selected: bool,
    pub locked: bool,
    /// Stills have no left handle
    pub left_handle: Option<Rect>,
    pub right_handle: Rect,
    pub tiles: Vec<ThumbnailTile>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlock {
    pub audio_id: AudioId,
    pub index: usize,
    pub layer: LayerId,
    pub category: AudioCategory,
    pub name: String,
    pub start: f64,
    pub duration: f64,
    pub rect: Rect,
    /// Right-aligned fade-out overlay
    pub fade_rect: Option<Rect>,
    pub locked: bool,
}

/// Transition marker centred on the overlap of two clips.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionBadge {
    pub layer: LayerId,
    pub after_clip_index: usize,
    pub kind: TransitionKind,
    pub duration: f64,
    pub rect: Rect,
}

/// Drop target between two adjacent clips.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionZone {
    pub layer: LayerId,
    pub after_clip_index: usize,
    pub rect: Rect,
    /// A transition already sits here
    pub occupied: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RulerTick {
    pub x: f32,
    pub time: f64,
    pub major: bool,
    pub label: Option<String>,
}

/// What lies under a pointer position.
#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    Ruler {
        time: f64,
    },
    TrimHandle {
        target: TrimTarget,
        edge: TrimEdge,
    },
    Clip(ClipId),
    Audio(AudioId),
    TransitionBadge {
        layer: LayerId,
        after_clip_index: usize,
    },
    Lane {
        layer: LayerId,
        lane: LaneKind,
        time: f64,
    },
    None,
}

// ── Scene ───────────────────────────────────────────────────────

/// Screen geometry of one frame of the timeline.
#[derive(Debug, Clone)]
pub struct TimelineScene {
    scale: TimeScale,
    metrics: SceneMetrics,
    viewport: Viewport,
    pub ruler_rect: Rect,
    pub lanes: Vec<LaneRow>,
    pub clips: Vec<ClipBlock>,
    pub audio: Vec<AudioBlock>,
    pub badges: Vec<TransitionBadge>,
    pub zones: Vec<TransitionZone>,
    pub ticks: Vec<RulerTick>,
    pub playhead_x: f32,
}

impl TimelineScene {
    pub fn build(input: &SceneInput<'_>) -> Self {
        let SceneInput {
            project,
            layout,
            scale,
            metrics,
            viewport,
            playhead,
            selection,
        } = *input;

        let mut scene = Self {
            scale,
            metrics,
            viewport,
            ruler_rect: Rect::from_min_size(
                viewport.origin,
                Vec2::new(viewport.width, metrics.ruler_height),
            ),
            lanes: Vec::with_capacity(project.layers.len()),
            clips: Vec::with_capacity(layout.clips().len()),
            audio: Vec::with_capacity(layout.audio().len()),
            badges: Vec::new(),
            zones: Vec::new(),
            ticks: Vec::new(),
            playhead_x: 0.0,
        };
        scene.playhead_x = scene.time_to_x(playhead);

        let layer_height = metrics.layer_height();
        for (row, layer) in project.layers.iter().enumerate() {
            let top = viewport.origin.y + metrics.ruler_height + row as f32 * layer_height;
            let clip_rect = Rect::from_min_size(
                Pos2::new(viewport.origin.x, top),
                Vec2::new(viewport.width, metrics.clip_lane_height),
            );
            let audio_rect = Rect::from_min_size(
                Pos2::new(viewport.origin.x, clip_rect.bottom()),
                Vec2::new(viewport.width, metrics.audio_lane_height),
            );
            scene.lanes.push(LaneRow {
                layer: layer.id,
                row,
                clip_rect,
                audio_rect,
                locked: layer.locked,
                visible: layer.visible,
            });
        }

        scene.build_clips(project, layout, selection);
        scene.build_audio(project, layout);
        scene.build_transitions(project, layout);
        scene.build_ruler();
        scene
    }

    fn build_clips(&mut self, project: &Project, layout: &Layout, selection: &[ClipId]) {
        for slot in layout.clips() {
            let Some(lane) = self.visible_lane(slot.layer) else {
                continue;
            };
            let (lane_rect, locked) = (lane.clip_rect, lane.locked);
            let Some(clip) = project
                .clips
                .get(slot.index)
                .filter(|c| c.id == slot.clip_id)
                .or_else(|| project.clip(&slot.clip_id))
            else {
                continue;
            };

            let rect = Rect::from_min_max(
                Pos2::new(self.time_to_x(slot.start), lane_rect.top() + BLOCK_INSET),
                Pos2::new(self.time_to_x(slot.end()), lane_rect.bottom() - BLOCK_INSET),
            );
            let handle = self.metrics.handle_width.min(rect.width() / 3.0);
            let left_handle = (clip.kind == ClipKind::Video)
                .then(|| Rect::from_min_size(rect.min, Vec2::new(handle, rect.height())));
            let right_handle = Rect::from_min_max(Pos2::new(rect.right() - handle, rect.top()), rect.max);
            let tiles = if clip.thumbnail_url.is_some() {
                self.thumbnail_tiles(rect)
            } else {
                Vec::new()
            };

            self.clips.push(ClipBlock {
                clip_id: clip.id.clone(),
                index: slot.index,
                layer: slot.layer,
                layer_index: slot.layer_index,
                kind: clip.kind,
                name: clip.name.clone(),
                thumbnail: clip.thumbnail_url.clone(),
                start: slot.start,
                duration: slot.duration,
                rect,
                selected: selection.contains(&clip.id),
                locked,
                left_handle,
                right_handle,
                tiles,
            });
        }
    }

    /// Fixed-width tiles from the left edge; the last one is clipped, never
    /// stretched. Only tiles inside the viewport are produced.
    fn thumbnail_tiles(&self, rect: Rect) -> Vec<ThumbnailTile> {
        let tile = self.metrics.tile_width;
        if tile <= 0.0 || rect.width() <= 0.0 {
            return Vec::new();
        }
        let view_left = self.viewport.origin.x;
        let view_right = view_left + self.viewport.width;
        let first = ((view_left - rect.left()) / tile).floor().max(0.0) as usize;
        let stop = rect.right().min(view_right);

        let mut tiles = Vec::new();
        let mut x = rect.left() + first as f32 * tile;
        while x < stop {
            let width = (rect.right() - x).min(tile);
            tiles.push(ThumbnailTile {
                rect: Rect::from_min_size(Pos2::new(x, rect.top()), Vec2::new(width, rect.height())),
                uv_width: width / tile,
            });
            x += tile;
        }
        tiles
    }

    fn build_audio(&mut self, project: &Project, layout: &Layout) {
        for slot in layout.audio() {
            let Some(lane) = self.visible_lane(slot.layer) else {
                continue;
            };
            let (lane_rect, locked) = (lane.audio_rect, lane.locked);
            let Some(track) = project
                .audio
                .get(slot.index)
                .filter(|t| t.id == slot.audio_id)
                .or_else(|| project.audio_track(&slot.audio_id))
            else {
                continue;
            };

            let rect = Rect::from_min_max(
                Pos2::new(self.time_to_x(slot.start), lane_rect.top() + BLOCK_INSET),
                Pos2::new(self.time_to_x(slot.end()), lane_rect.bottom() - BLOCK_INSET),
            );
            let fade_rect = (slot.fade_out > 0.0 && slot.duration > 0.0).then(|| {
                let width = rect.width() * (slot.fade_out / slot.duration) as f32;
                Rect::from_min_max(Pos2::new(rect.right() - width, rect.top()), rect.max)
            });

            self.audio.push(AudioBlock {
                audio_id: track.id.clone(),
                index: slot.index,
                layer: slot.layer,
                category: track.category,
                name: track.name.clone(),
                start: slot.start,
                duration: slot.duration,
                rect,
                fade_rect,
                locked,
            });
        }
    }

    fn build_transitions(&mut self, project: &Project, layout: &Layout) {
        let badge_height = self.metrics.clip_lane_height * 0.5;

        for transition in &project.transitions {
            let layer = transition.layer_id();
            let Some(lane) = self.visible_lane(layer) else {
                continue;
            };
            let center_y = lane.clip_rect.center().y;
            let Some((before, after)) = layout.adjacent_pair(layer, transition.after_clip_index)
            else {
                continue;
            };
            let center = self.time_to_x((before.end() + after.start) / 2.0);
            let width = self.scale.time_to_pixels(transition.duration) as f32;
            self.badges.push(TransitionBadge {
                layer,
                after_clip_index: transition.after_clip_index,
                kind: transition.kind,
                duration: transition.duration,
                rect: Rect::from_center_size(Pos2::new(center, center_y), Vec2::new(width, badge_height)),
            });
        }

        let zone_size = Vec2::new(self.metrics.zone_width, self.metrics.clip_lane_height);
        let mut zones = Vec::new();
        for lane in self.lanes.iter().filter(|l| l.visible) {
            let slots: Vec<_> = layout.clips_on_layer(lane.layer).collect();
            for pair in slots.windows(2) {
                let (before, after) = (pair[0], pair[1]);
                let center = self.time_to_x((before.end() + after.start) / 2.0);
                zones.push(TransitionZone {
                    layer: lane.layer,
                    after_clip_index: before.layer_index,
                    rect: Rect::from_center_size(
                        Pos2::new(center, lane.clip_rect.center().y),
                        zone_size,
                    ),
                    occupied: find_transition(&project.transitions, lane.layer, before.layer_index)
                        .is_some(),
                    locked: lane.locked,
                });
            }
        }
        self.zones = zones;
    }

    fn build_ruler(&mut self) {
        let pps = self.scale.pixels_per_second();
        if pps <= 0.0 {
            return;
        }
        let major = major_interval(pps);
        let minor = major / MINOR_DIVISIONS as f64;
        let (step, divisions) = if minor * pps >= MIN_MINOR_SPACING {
            (minor, MINOR_DIVISIONS)
        } else {
            (major, 1)
        };

        let t0 = f64::from(self.viewport.scroll_x) / pps;
        let t1 = f64::from(self.viewport.scroll_x + self.viewport.width) / pps;
        let first = (t0 / step).floor().max(0.0) as i64;
        let last = (t1 / step).ceil() as i64;

        self.ticks = (first..=last)
            .map(|k| {
                let time = k as f64 * step;
                let is_major = k % divisions == 0;
                RulerTick {
                    x: self.time_to_x(time),
                    time,
                    major: is_major,
                    label: is_major.then(|| format_ruler_label(time)),
                }
            })
            .collect();
    }

    // ── Coordinates ─────────────────────────────────────────────

    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    pub fn metrics(&self) -> &SceneMetrics {
        &self.metrics
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn time_to_x(&self, time: f64) -> f32 {
        self.viewport.origin.x + self.scale.time_to_pixels(time) as f32 - self.viewport.scroll_x
    }

    /// Screen x to timeline seconds, never negative.
    pub fn x_to_time(&self, x: f32) -> f64 {
        let offset = f64::from(x - self.viewport.origin.x + self.viewport.scroll_x);
        self.scale.pixels_to_delta(offset).max(0.0)
    }

    /// Bottom of the last lane.
    pub fn content_bottom(&self) -> f32 {
        self.lanes
            .last()
            .map_or(self.ruler_rect.bottom(), |l| l.audio_rect.bottom())
    }

    // ── Lookup ──────────────────────────────────────────────────

    pub fn lane(&self, layer: LayerId) -> Option<&LaneRow> {
        self.lanes.iter().find(|l| l.layer == layer)
    }

    fn visible_lane(&self, layer: LayerId) -> Option<&LaneRow> {
        self.lane(layer).filter(|l| l.visible)
    }

    pub fn clip_block(&self, id: &ClipId) -> Option<&ClipBlock> {
        self.clips.iter().find(|b| &b.clip_id == id)
    }

    pub fn audio_block(&self, id: &AudioId) -> Option<&AudioBlock> {
        self.audio.iter().find(|b| &b.audio_id == id)
    }

    /// Layer and lane under a y coordinate.
    pub fn lane_at_y(&self, y: f32) -> Option<(LayerId, LaneKind)> {
        self.lanes.iter().find_map(|lane| {
            if lane.clip_rect.y_range().contains(y) {
                Some((lane.layer, LaneKind::Clip))
            } else if lane.audio_rect.y_range().contains(y) {
                Some((lane.layer, LaneKind::Audio))
            } else {
                None
            }
        })
    }

    /// Transition drop zone under a position.
    pub fn zone_at(&self, pos: Pos2) -> Option<&TransitionZone> {
        self.zones.iter().find(|z| z.rect.contains(pos))
    }

    /// What the pointer is over. Later blocks are drawn on top and win.
    pub fn hit_test(&self, pos: Pos2) -> Hit {
        if self.ruler_rect.contains(pos) {
            return Hit::Ruler {
                time: self.x_to_time(pos.x),
            };
        }

        if let Some(badge) = self.badges.iter().rev().find(|b| b.rect.contains(pos)) {
            return Hit::TransitionBadge {
                layer: badge.layer,
                after_clip_index: badge.after_clip_index,
            };
        }

        if let Some(block) = self.clips.iter().rev().find(|b| b.rect.contains(pos)) {
            let left_enabled = block.left_handle.is_some();
            return match hit_test_trim_handle(block.rect, pos, self.metrics.handle_width, left_enabled) {
                Some(edge) => Hit::TrimHandle {
                    target: TrimTarget::Clip(block.clip_id.clone()),
                    edge,
                },
                None => Hit::Clip(block.clip_id.clone()),
            };
        }

        if let Some(block) = self.audio.iter().rev().find(|b| b.rect.contains(pos)) {
            return match hit_test_trim_handle(block.rect, pos, self.metrics.handle_width, true) {
                Some(edge) => Hit::TrimHandle {
                    target: TrimTarget::Audio(block.audio_id.clone()),
                    edge,
                },
                None => Hit::Audio(block.audio_id.clone()),
            };
        }

        let view = self.viewport.origin.x..=self.viewport.origin.x + self.viewport.width;
        if view.contains(&pos.x) {
            if let Some((layer, lane)) = self.lane_at_y(pos.y) {
                return Hit::Lane {
                    layer,
                    lane,
                    time: self.x_to_time(pos.x),
                };
            }
        }

        Hit::None
    }
}

/// Smallest candidate interval whose labels are at least
/// [`MIN_LABEL_SPACING`] pixels apart.
pub fn major_interval(pixels_per_second: f64) -> f64 {
    if pixels_per_second <= 0.0 || !pixels_per_second.is_finite() {
        return RULER_INTERVALS[RULER_INTERVALS.len() - 1];
    }
    if let Some(interval) = RULER_INTERVALS
        .iter()
        .copied()
        .find(|s| s * pixels_per_second >= MIN_LABEL_SPACING)
    {
        return interval;
    }
    let mut interval = RULER_INTERVALS[RULER_INTERVALS.len() - 1];
    while interval * pixels_per_second < MIN_LABEL_SPACING {
        interval *= 2.0;
    }
    interval
}

/// Ruler label as `M:SS`.
pub fn format_ruler_label(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
