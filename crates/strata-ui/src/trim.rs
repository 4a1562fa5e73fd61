//! Trim handle hit testing and trim math for clips and audio tracks.
//!
//! Trimming works on a snapshot taken at pointer-down. The pointer's total
//! horizontal travel (in timeline seconds) is applied to that snapshot, so the
//! result never drifts no matter how many move events arrive.

use egui::{CursorIcon, Pos2, Rect, Vec2};
use strata_timeline::{
    AudioId, AudioPatch, AudioTrack, ClipId, ClipKind, ResolvedSettings, SettingsPatch,
};

/// Which edge of a clip is being trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimEdge {
    Left,
    Right,
}

/// The block whose handle was grabbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrimTarget {
    Clip(ClipId),
    Audio(AudioId),
}

/// Hit test a position against a block's trim handles.
///
/// Returns `Some(TrimEdge)` if the position is over a trim handle, otherwise `None`.
/// Blocks without a left handle (stills) pass `left_enabled = false`.
pub fn hit_test_trim_handle(
    rect: Rect,
    pos: Pos2,
    handle_width: f32,
    left_enabled: bool,
) -> Option<TrimEdge> {
    if !rect.contains(pos) {
        return None;
    }

    // Narrow blocks keep a grabbable body between the handles.
    let handle_width = handle_width.min(rect.width() / 3.0);

    let left_handle = Rect::from_min_size(rect.min, Vec2::new(handle_width, rect.height()));
    if left_enabled && left_handle.contains(pos) {
        return Some(TrimEdge::Left);
    }

    let right_handle = Rect::from_min_size(
        Pos2::new(rect.right() - handle_width, rect.top()),
        Vec2::new(handle_width, rect.height()),
    );
    if right_handle.contains(pos) {
        return Some(TrimEdge::Right);
    }

    None
}

/// Get the appropriate cursor icon for a trim edge.
pub fn trim_cursor(edge: TrimEdge) -> CursorIcon {
    match edge {
        TrimEdge::Left => CursorIcon::ResizeWest,
        TrimEdge::Right => CursorIcon::ResizeEast,
    }
}

/// Trim a clip by `delta` timeline seconds.
///
/// Video trims move `trim_start`/`trim_end` in source time (`delta * speed`),
/// clamped to `[0, trim_end - min]` and `[trim_start + min, original]`.
/// Stills only trim from the right, changing their display duration.
/// A manually positioned clip trimmed from the left moves its position so the
/// remaining content stays where it was.
pub fn trim_clip(
    anchor: &ResolvedSettings,
    edge: TrimEdge,
    delta: f64,
    min_duration: f64,
) -> Option<SettingsPatch> {
    if !delta.is_finite() {
        return None;
    }
    match (anchor.kind, edge) {
        (ClipKind::Image, TrimEdge::Left) => None,
        (ClipKind::Image, TrimEdge::Right) => {
            let display = (anchor.duration + delta).max(min_duration);
            (display != anchor.duration).then(|| SettingsPatch {
                display_duration: Some(display),
                ..SettingsPatch::default()
            })
        }
        (ClipKind::Video, TrimEdge::Left) => {
            let upper = (anchor.trim_end - min_duration).max(0.0);
            let trim_start = (anchor.trim_start + delta * anchor.speed).clamp(0.0, upper);
            if trim_start == anchor.trim_start {
                return None;
            }
            let shift = (trim_start - anchor.trim_start) / anchor.speed;
            Some(SettingsPatch {
                trim_start: Some(trim_start),
                position_seconds: anchor.position.map(|p| Some((p + shift).max(0.0))),
                ..SettingsPatch::default()
            })
        }
        (ClipKind::Video, TrimEdge::Right) => {
            let lower = anchor.trim_start + min_duration;
            let upper = anchor.original_duration.max(lower);
            let trim_end = (anchor.trim_end + delta * anchor.speed).clamp(lower, upper);
            (trim_end != anchor.trim_end).then(|| SettingsPatch {
                trim_end: Some(trim_end),
                ..SettingsPatch::default()
            })
        }
    }
}

/// Trim an audio track by `delta` seconds. Left trims keep the remaining
/// audio anchored in time by shifting the track's position.
pub fn trim_audio(
    anchor: &AudioTrack,
    edge: TrimEdge,
    delta: f64,
    min_duration: f64,
) -> Option<AudioPatch> {
    if !delta.is_finite() {
        return None;
    }
    match edge {
        TrimEdge::Left => {
            let upper = (anchor.trim_end - min_duration).max(0.0);
            let trim_start = (anchor.trim_start + delta).clamp(0.0, upper);
            if trim_start == anchor.trim_start {
                return None;
            }
            Some(AudioPatch {
                trim_start: Some(trim_start),
                position: Some((anchor.position + trim_start - anchor.trim_start).max(0.0)),
                ..AudioPatch::default()
            })
        }
        TrimEdge::Right => {
            let lower = anchor.trim_start + min_duration;
            let upper = anchor.original_duration.max(lower);
            let trim_end = (anchor.trim_end + delta).clamp(lower, upper);
            (trim_end != anchor.trim_end).then(|| AudioPatch {
                trim_end: Some(trim_end),
                ..AudioPatch::default()
            })
        }
    }
}
