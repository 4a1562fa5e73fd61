//! Project files: JSON with a schema version and migrations.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use strata_core::limits::{MAX_LAYERS, MIN_CLIP_DURATION};
use strata_core::{Result, StrataError};
use tracing::{debug, info};

use crate::project::Project;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned project file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Schema version for migration.
    pub version: u32,
    /// The project data.
    pub project: Project,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl ProjectFile {
    pub fn new(project: Project) -> Self {
        Self {
            version: CURRENT_VERSION,
            project,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| StrataError::Serialization(format!("Failed to serialize project: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| StrataError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
        if version > CURRENT_VERSION {
            return Err(StrataError::Serialization(format!(
                "Project file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;
        let mut file: Self = serde_json::from_value(migrated)
            .map_err(|e| StrataError::Serialization(format!("Failed to parse project: {}", e)))?;
        check_records(&mut file.project)?;
        Ok(file)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            // v0 files are a bare project with no wrapper
            0 => {
                info!("Migrating unversioned project file");
                data = serde_json::json!({
                    "version": 1,
                    "project": data,
                    "app_version": "0.0.0",
                });
                version = 1;
            }
            _ => {
                return Err(StrataError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

/// Reject record sets that cannot be edited safely and repair the rest.
///
/// Duplicate clip or audio ids are errors. Settings for clips that do not
/// exist are dropped, and the layer registry is brought back within
/// `1..=MAX_LAYERS` with every record on a layer it holds.
fn check_records(project: &mut Project) -> Result<()> {
    let mut clip_ids = HashSet::with_capacity(project.clips.len());
    for clip in &project.clips {
        if !clip_ids.insert(&clip.id) {
            return Err(StrataError::Serialization(format!(
                "Duplicate clip id {}",
                clip.id
            )));
        }
    }
    let mut audio_ids = HashSet::with_capacity(project.audio.len());
    for track in &project.audio {
        if !audio_ids.insert(&track.id) {
            return Err(StrataError::Serialization(format!(
                "Duplicate audio id {}",
                track.id
            )));
        }
    }

    let before = project.settings.len();
    let clips = &project.clips;
    project
        .settings
        .retain(|id, _| clips.iter().any(|c| &c.id == id));
    if project.settings.len() != before {
        debug!(
            dropped = before - project.settings.len(),
            "Settings without a clip dropped"
        );
    }

    project.normalize(MAX_LAYERS, MIN_CLIP_DURATION);
    Ok(())
}
