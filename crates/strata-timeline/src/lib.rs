//! Strata Timeline - timeline data model and layout
//!
//! Implements the records a multi-layer editing timeline works on:
//! - Clips, per-clip settings with one default table, transitions, audio
//! - A layer registry with stable ids
//! - Snap/free layout per layer
//! - Mutation intents, a reference host document and undo history
//! - Versioned project files

pub mod audio;
pub mod clip;
pub mod document;
pub mod edit;
pub mod layer;
pub mod layout;
pub mod project;
pub mod serialization;
pub mod settings;
pub mod transition;

pub use audio::{AudioCategory, AudioId, AudioPatch, AudioTrack};
pub use clip::{Clip, ClipId, ClipKind};
pub use document::TimelineDocument;
pub use edit::{History, MediaPayload, TimelineIntent};
pub use layer::{Layer, LayerId, LayerRegistry, ParseLayerIdError};
pub use layout::{AudioSlot, ClipSlot, Layout, LayoutInput, LayoutMode, LayoutWarning};
pub use project::Project;
pub use serialization::ProjectFile;
pub use settings::{ClipSettings, ResolvedSettings, SettingsPatch, SettingsSource};
pub use transition::{find_transition, max_transition_duration, Transition, TransitionKind};
