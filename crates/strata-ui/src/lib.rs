//! Strata UI - timeline rendering and interaction
//!
//! Provides:
//! - Scene geometry (lanes, blocks, ruler, badges) and hit testing
//! - The interaction controller turning pointer, keyboard and menu input into intents
//! - Trim math, snapping, selection rules and the keyboard map
//! - Transport controls
//! - The egui timeline panel and theme

pub mod interaction;
pub mod scene;
pub mod selection;
pub mod shortcuts;
pub mod snapping;
pub mod theme;
pub mod timeline;
pub mod transport;
pub mod trim;
pub mod widgets;

pub use interaction::{
    ControllerInput, DropPayload, GestureState, MenuChoice, MenuTarget, TimelineContext,
    TimelineController,
};
pub use scene::{Hit, SceneInput, SceneMetrics, TimelineScene, Viewport};
pub use shortcuts::{Keymap, Modifiers, Shortcut, TimelineCommand};
pub use snapping::{SnapKind, SnapPoint, SnappingEngine};
pub use theme::{kind_style, KindStyle, StyleKey, Theme};
pub use timeline::{show_timeline, ThumbnailSource, TimelineView};
pub use transport::{show_transport, Transport};
pub use trim::{TrimEdge, TrimTarget};
