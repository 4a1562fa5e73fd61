//! Layers: parallel lanes holding clips and audio tracks.
//!
//! Layers live in an arena keyed by stable integer ids. Ids are handed out
//! from a monotonic counter and never reused, so removing a layer cannot
//! shift another layer's identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strata_core::limits::MAX_LAYERS;
use thiserror::Error;
use tracing::debug;

/// Stable layer identifier, written as `layer-N` (N >= 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LayerId(u32);

impl LayerId {
    /// Layer 1, where clips without an assignment live.
    pub const DEFAULT: Self = Self(1);

    /// Create a layer id. Zero is bumped to 1.
    pub const fn new(number: u32) -> Self {
        if number == 0 {
            Self(1)
        } else {
            Self(number)
        }
    }

    #[inline]
    pub fn number(self) -> u32 {
        self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Error for strings that are not of the form `layer-N`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid layer id `{0}`, expected `layer-N` with N >= 1")]
pub struct ParseLayerIdError(String);

impl FromStr for LayerId {
    type Err = ParseLayerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("layer-")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n >= 1)
            .map(Self)
            .ok_or_else(|| ParseLayerIdError(s.to_string()))
    }
}

impl TryFrom<String> for LayerId {
    type Error = ParseLayerIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LayerId> for String {
    fn from(id: LayerId) -> Self {
        id.to_string()
    }
}

/// A horizontal lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    /// Advisory: the interaction layer refuses gestures on locked layers,
    /// the registry and document do not.
    pub locked: bool,
    /// Hidden layers are not drawn; their content is kept.
    pub visible: bool,
}

impl Layer {
    fn new(id: LayerId) -> Self {
        Self {
            id,
            locked: false,
            visible: true,
        }
    }
}

/// The set of layers, always holding at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRegistry {
    /// Sorted by id; this is also render order, top to bottom.
    layers: Vec<Layer>,
    next_id: u32,
    max_layers: usize,
}

impl LayerRegistry {
    /// Registry with layer 1 and the given capacity (clamped to 1..=MAX_LAYERS).
    pub fn new(max_layers: usize) -> Self {
        Self {
            layers: vec![Layer::new(LayerId::DEFAULT)],
            next_id: 2,
            max_layers: max_layers.clamp(1, MAX_LAYERS),
        }
    }

    pub fn max_layers(&self) -> usize {
        self.max_layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.layers.len() >= self.max_layers
    }

    /// Layers in render order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.iter().map(|l| l.id)
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    /// Highest-numbered layer.
    pub fn highest(&self) -> LayerId {
        self.layers.last().map(|l| l.id).unwrap_or_default()
    }

    /// Append a layer. Returns `None` when the registry is full.
    pub fn add_layer(&mut self) -> Option<LayerId> {
        if self.is_full() {
            debug!(max = self.max_layers, "Layer limit reached, add ignored");
            return None;
        }
        let id = LayerId::new(self.next_id);
        self.next_id += 1;
        self.layers.push(Layer::new(id));
        Some(id)
    }

    /// Remove `id` if it is the highest layer, not the only one, and `in_use`
    /// reports it empty. Returns whether a layer was removed.
    pub fn remove_layer(&mut self, id: LayerId, in_use: impl Fn(LayerId) -> bool) -> bool {
        if self.layers.len() <= 1 {
            debug!(layer = %id, "Refusing to remove the only layer");
            return false;
        }
        if self.highest() != id {
            debug!(layer = %id, "Only the highest layer can be removed");
            return false;
        }
        if in_use(id) {
            debug!(layer = %id, "Layer still holds content, remove ignored");
            return false;
        }
        self.layers.pop();
        true
    }

    /// Flip the lock flag. Returns the new state, or `None` for unknown ids.
    pub fn toggle_lock(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.layers.iter_mut().find(|l| l.id == id)?;
        layer.locked = !layer.locked;
        Some(layer.locked)
    }

    /// Flip the visibility flag. Returns the new state, or `None` for unknown ids.
    pub fn toggle_visibility(&mut self, id: LayerId) -> Option<bool> {
        let layer = self.layers.iter_mut().find(|l| l.id == id)?;
        layer.visible = !layer.visible;
        Some(layer.visible)
    }

    pub fn is_locked(&self, id: LayerId) -> bool {
        self.get(id).is_some_and(|l| l.locked)
    }

    /// Unknown layers count as hidden.
    pub fn is_visible(&self, id: LayerId) -> bool {
        self.get(id).is_some_and(|l| l.visible)
    }

    /// Restore the registry after deserialization. The capacity is clamped
    /// to `1..=MAX_LAYERS`, ids are sorted and unique, layers past the
    /// capacity are dropped, an empty list gets layer 1 back, and `next_id`
    /// is moved past every id in use.
    pub fn repair(&mut self, max_layers: usize) {
        self.max_layers = max_layers.clamp(1, MAX_LAYERS);
        self.layers.sort_by_key(|l| l.id);
        self.layers.dedup_by_key(|l| l.id);
        if self.layers.len() > self.max_layers {
            debug!(
                count = self.layers.len(),
                max = self.max_layers,
                "Registry over capacity, extra layers dropped"
            );
            self.layers.truncate(self.max_layers);
        }
        if self.layers.is_empty() {
            debug!("Registry had no layers, layer 1 restored");
            self.layers.push(Layer::new(LayerId::DEFAULT));
        }
        self.next_id = self.next_id.max(self.highest().number() + 1);
    }

    /// Make sure every id up to `highest` exists, within capacity.
    /// Used after loading records that reference layers the registry lacks.
    pub fn ensure_covers(&mut self, highest: LayerId) {
        for number in 1..=highest.number() {
            if self.is_full() {
                break;
            }
            let id = LayerId::new(number);
            if !self.contains(id) {
                self.layers.push(Layer::new(id));
            }
        }
        self.layers.sort_by_key(|l| l.id);
        self.next_id = self.next_id.max(self.highest().number() + 1);
    }

    /// Row index of a layer in render order.
    pub fn row_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Layer at a render row.
    pub fn at_row(&self, row: usize) -> Option<LayerId> {
        self.layers.get(row).map(|l| l.id)
    }

    /// Layer `delta` rows away from `id`, clamped to the first/last row.
    pub fn offset(&self, id: LayerId, delta: i32) -> LayerId {
        let Some(row) = self.row_of(id) else {
            return id;
        };
        let last = self.layers.len() as i64 - 1;
        let target = (row as i64 + delta as i64).clamp(0, last) as usize;
        self.layers[target].id
    }
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new(MAX_LAYERS)
    }
}
