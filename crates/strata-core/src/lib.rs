//! Strata Core - Foundation types for the timeline editor
//!
//! This crate provides the pieces every other Strata crate leans on:
//! - Time/pixel mapping (TimeScale, Zoom)
//! - Error handling (StrataError, Result)
//! - Editor configuration (TimelineConfig)

pub mod config;
pub mod error;
pub mod time;

pub use config::TimelineConfig;
pub use error::{Result, StrataError};
pub use time::{
    format_timecode, TimeScale, Zoom, BASE_PIXELS_PER_SECOND, FRAME_DURATION, FRAME_RATE,
};

/// Interaction limits shared by the layout engine and the controller.
pub mod limits {
    /// Maximum number of parallel layers.
    pub const MAX_LAYERS: usize = 10;

    /// Shortest clip the trim handles may produce, in seconds.
    pub const MIN_CLIP_DURATION: f64 = 0.1;

    /// Longest audio fade-out, in seconds.
    pub const MAX_FADE_OUT: f64 = 10.0;

    /// Display duration given to still images without an explicit one.
    pub const DEFAULT_IMAGE_DURATION: f64 = 5.0;

    /// Source length assumed for video whose real length is not known.
    pub const DEFAULT_VIDEO_DURATION: f64 = 10.0;

    /// Duration of a freshly dropped transition, in seconds.
    pub const DEFAULT_TRANSITION_DURATION: f64 = 1.0;
}
