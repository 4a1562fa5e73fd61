//! Snapping engine for free-mode clip moves.

use strata_core::TimeScale;
use strata_timeline::{ClipId, Layout};

/// A point on the timeline that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub time: f64,
    pub kind: SnapKind,
}

/// Kind of snap point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    ClipEdge,
    Playhead,
}

/// Engine for computing snap targets.
#[derive(Debug, Clone)]
pub struct SnappingEngine {
    pub enabled: bool,
    /// Snap distance in pixels (converted to seconds at the current zoom).
    pub snap_distance_px: f32,
}

impl SnappingEngine {
    pub fn new(snap_distance_px: f32) -> Self {
        Self {
            enabled: true,
            snap_distance_px,
        }
    }

    /// Collect the playhead and every clip edge except those of `exclude`.
    /// Edges of clips on hidden layers are filtered by the caller's layout.
    pub fn collect_snap_points(
        layout: &Layout,
        playhead: f64,
        exclude: Option<&ClipId>,
    ) -> Vec<SnapPoint> {
        let mut points = vec![SnapPoint {
            time: playhead,
            kind: SnapKind::Playhead,
        }];

        for slot in layout.clips() {
            if Some(&slot.clip_id) == exclude {
                continue;
            }
            points.push(SnapPoint {
                time: slot.start,
                kind: SnapKind::ClipEdge,
            });
            points.push(SnapPoint {
                time: slot.end(),
                kind: SnapKind::ClipEdge,
            });
        }

        points
    }

    /// Find the closest snap point within snap distance.
    /// Returns the snapped time, or None if nothing is close enough.
    pub fn find_snap(&self, time: f64, points: &[SnapPoint], scale: &TimeScale) -> Option<f64> {
        if !self.enabled {
            return None;
        }

        let threshold = scale.pixels_to_delta(f64::from(self.snap_distance_px));

        points
            .iter()
            .map(|p| (p.time, (p.time - time).abs()))
            .filter(|(_, dist)| *dist <= threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(t, _)| t)
    }

    /// Snap a clip's proposed start. The left edge is tried first, then the right.
    pub fn snap_clip(
        &self,
        start: f64,
        duration: f64,
        points: &[SnapPoint],
        scale: &TimeScale,
    ) -> f64 {
        if !self.enabled {
            return start;
        }

        if let Some(snapped) = self.find_snap(start, points, scale) {
            return snapped;
        }
        if let Some(snapped) = self.find_snap(start + duration, points, scale) {
            return (snapped - duration).max(0.0);
        }

        start
    }
}

impl Default for SnappingEngine {
    fn default() -> Self {
        Self::new(8.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Zoom;

    fn make_snap_points() -> Vec<SnapPoint> {
        vec![
            SnapPoint {
                time: 0.0,
                kind: SnapKind::ClipEdge,
            },
            SnapPoint {
                time: 4.0,
                kind: SnapKind::ClipEdge,
            },
            SnapPoint {
                time: 6.0,
                kind: SnapKind::Playhead,
            },
        ]
    }

    #[test]
    fn test_find_snap_near_point() {
        let engine = SnappingEngine::default();
        // 8px at 50px/s is 0.16s
        let result = engine.find_snap(3.9, &make_snap_points(), &TimeScale::default());
        assert_eq!(result, Some(4.0));
    }

    #[test]
    fn test_find_snap_too_far() {
        let engine = SnappingEngine::default();
        let result = engine.find_snap(3.5, &make_snap_points(), &TimeScale::default());
        assert!(result.is_none());
    }

    #[test]
    fn test_threshold_follows_zoom() {
        let engine = SnappingEngine::default();
        let zoomed_out = TimeScale::new(Zoom::new(0.25));
        assert_eq!(engine.find_snap(3.5, &make_snap_points(), &zoomed_out), Some(4.0));
    }

    #[test]
    fn test_find_snap_disabled() {
        let mut engine = SnappingEngine::default();
        engine.enabled = false;
        let result = engine.find_snap(4.0, &make_snap_points(), &TimeScale::default());
        assert!(result.is_none());
    }

    #[test]
    fn test_snap_clip_right_edge() {
        let engine = SnappingEngine::default();
        // right edge at 5.95 snaps to the playhead at 6.0
        let start = engine.snap_clip(3.45, 2.5, &make_snap_points(), &TimeScale::default());
        assert!((start - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_snap_clip_prefers_left_edge() {
        let engine = SnappingEngine::default();
        let start = engine.snap_clip(4.05, 1.95, &make_snap_points(), &TimeScale::default());
        assert_eq!(start, 4.0);
    }
}
