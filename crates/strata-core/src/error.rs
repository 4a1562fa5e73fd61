//! Error types for Strata.
//!
//! Interactive edits never fail; invalid gestures are clamped or ignored.
//! These errors surface only at the edges: settings validation, direct
//! document calls with unknown ids, persistence, and configuration.

use thiserror::Error;

/// Main error type for Strata operations.
#[derive(Error, Debug)]
pub enum StrataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    #[error("Audio track not found: {0}")]
    AudioNotFound(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Invalid clip settings: {0}")]
    InvalidSettings(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Strata operations.
pub type Result<T> = std::result::Result<T, StrataError>;
