//! Transitions between adjacent clips on a layer.

use serde::{Deserialize, Serialize};

use crate::layer::LayerId;

/// Effect applied across a clip boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    #[default]
    Fade,
    Dissolve,
    WipeLeft,
    WipeRight,
    SlideLeft,
    SlideRight,
    Zoom,
    Blur,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 8] = [
        Self::Fade,
        Self::Dissolve,
        Self::WipeLeft,
        Self::WipeRight,
        Self::SlideLeft,
        Self::SlideRight,
        Self::Zoom,
        Self::Blur,
    ];
}

/// A timed overlap between clip `after_clip_index` and the next clip on the
/// same layer. The index counts clips in list order within the layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub after_clip_index: usize,
    pub kind: TransitionKind,
    /// Overlap in seconds
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<LayerId>,
}

impl Transition {
    pub fn new(layer: LayerId, after_clip_index: usize, kind: TransitionKind, duration: f64) -> Self {
        Self {
            after_clip_index,
            kind,
            duration,
            layer: Some(layer),
        }
    }

    #[inline]
    pub fn layer_id(&self) -> LayerId {
        self.layer.unwrap_or_default()
    }

    /// Overlap actually applied by the layout; negative and non-finite durations count as none.
    pub fn overlap(&self) -> f64 {
        if self.duration.is_finite() {
            self.duration.max(0.0)
        } else {
            0.0
        }
    }

    /// Whether this transition sits at `(layer, after_clip_index)`.
    pub fn is_at(&self, layer: LayerId, after_clip_index: usize) -> bool {
        self.layer_id() == layer && self.after_clip_index == after_clip_index
    }
}

/// Find the transition at a boundary.
pub fn find_transition(
    transitions: &[Transition],
    layer: LayerId,
    after_clip_index: usize,
) -> Option<&Transition> {
    transitions.iter().find(|t| t.is_at(layer, after_clip_index))
}

/// Largest duration a transition between two clips may have.
pub fn max_transition_duration(before: f64, after: f64) -> f64 {
    before.min(after).max(0.0)
}
