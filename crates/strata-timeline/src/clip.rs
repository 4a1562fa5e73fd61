//! Clip types for the timeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::layer::LayerId;

/// Identifier of a clip, unique within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(String);

impl ClipId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClipId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ClipId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a clip's media is. Governs how its duration is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipKind {
    Video,
    Image,
}

/// One visual segment placed on a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Clip name (displayed in UI)
    pub name: String,
    /// Media URL
    pub url: String,
    /// Thumbnail URL, tiled across the clip block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Video or still image
    pub kind: ClipKind,
    /// Layer assignment; absent means layer 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<LayerId>,
}

impl Clip {
    /// Create a clip with a fresh id on the default layer.
    pub fn new(name: impl Into<String>, url: impl Into<String>, kind: ClipKind) -> Self {
        Self {
            id: ClipId::generate(),
            name: name.into(),
            url: url.into(),
            thumbnail_url: None,
            kind,
            layer: None,
        }
    }

    /// Builder: place the clip on a layer.
    pub fn on_layer(mut self, layer: LayerId) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Builder: set the thumbnail.
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// The layer this clip renders on.
    #[inline]
    pub fn layer_id(&self) -> LayerId {
        self.layer.unwrap_or_default()
    }

    /// Copy of this clip under a new id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ClipId::generate(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layer_is_one() {
        let clip = Clip::new("intro", "media/intro.mp4", ClipKind::Video);
        assert_eq!(clip.layer_id(), LayerId::new(1));
        let clip = clip.on_layer(LayerId::new(3));
        assert_eq!(clip.layer_id(), LayerId::new(3));
    }

    #[test]
    fn test_duplicate_gets_new_id() {
        let clip = Clip::new("intro", "media/intro.mp4", ClipKind::Video).with_thumbnail("t.jpg");
        let copy = clip.duplicate();
        assert_ne!(clip.id, copy.id);
        assert_eq!(copy.thumbnail_url.as_deref(), Some("t.jpg"));
        assert_eq!(copy.name, "intro");
    }

    #[test]
    fn test_clip_serde_shape() {
        let mut clip = Clip::new("still", "media/a.png", ClipKind::Image).on_layer(LayerId::new(2));
        clip.id = ClipId::from("c1");
        let json = serde_json::to_value(&clip).unwrap();
        assert_eq!(json["id"], "c1");
        assert_eq!(json["kind"], "image");
        assert_eq!(json["layer"], "layer-2");
        assert!(json.get("thumbnail_url").is_none());
    }
}
