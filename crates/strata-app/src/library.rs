//! Media and transition library panel.
//!
//! Items are drag sources carrying a [`DropPayload`]; the timeline panel
//! decides where they land.

use eframe::egui;
use std::path::Path;
use strata_timeline::{AudioCategory, ClipKind, MediaPayload, TransitionKind};
use strata_ui::{kind_style, DropPayload, StyleKey, Theme};
use tracing::{debug, info};

/// Length given to imported audio until its real length is known.
const UNKNOWN_AUDIO_SECONDS: f64 = 10.0;

#[derive(Debug, Default)]
pub struct Library {
    items: Vec<MediaPayload>,
}

impl Library {
    /// Take files dropped on the window from the OS.
    pub fn import_dropped(&mut self, ctx: &egui::Context) {
        let files = ctx.input(|i| i.raw.dropped_files.clone());
        for file in files {
            let Some(path) = file.path else {
                continue;
            };
            match media_from_path(&path) {
                Some(media) => {
                    info!(path = %path.display(), "Imported media");
                    self.items.push(media);
                }
                None => debug!(path = %path.display(), "Ignoring unsupported file"),
            }
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new("Media")
                .size(Theme::FONT_SM)
                .color(Theme::t1()),
        );
        if self.items.is_empty() {
            ui.label(
                egui::RichText::new("Drop video, image or audio files here")
                    .size(Theme::FONT_XS)
                    .color(Theme::t3()),
            );
        }
        for (i, media) in self.items.iter().enumerate() {
            let (name, key) = match media {
                MediaPayload::Visual { name, kind, .. } => (name, StyleKey::Clip(*kind)),
                MediaPayload::Audio { name, category, .. } => (name, StyleKey::Audio(*category)),
            };
            let style = kind_style(key);
            ui.dnd_drag_source(
                egui::Id::new(("library_media", i)),
                DropPayload::Media(media.clone()),
                |ui| {
                    ui.label(
                        egui::RichText::new(format!("{} {}", style.glyph, name))
                            .size(Theme::FONT_XS)
                            .color(style.color),
                    );
                },
            );
        }

        ui.separator();
        ui.label(
            egui::RichText::new("Transitions")
                .size(Theme::FONT_SM)
                .color(Theme::t1()),
        );
        for kind in TransitionKind::ALL {
            let style = kind_style(StyleKey::Transition(kind));
            ui.dnd_drag_source(
                egui::Id::new(("library_transition", style.label)),
                DropPayload::Transition(kind),
                |ui| {
                    ui.label(
                        egui::RichText::new(format!("{} {}", style.glyph, style.label))
                            .size(Theme::FONT_XS)
                            .color(style.color),
                    );
                },
            );
        }
    }
}

/// Guess a media payload from a file extension.
pub fn media_from_path(path: &Path) -> Option<MediaPayload> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let name = path.file_stem()?.to_string_lossy().into_owned();
    let url = path.to_string_lossy().into_owned();
    let visual = |kind| MediaPayload::Visual {
        name: name.clone(),
        url: url.clone(),
        thumbnail_url: (kind == ClipKind::Image).then(|| url.clone()),
        kind,
        duration: None,
    };
    match ext.as_str() {
        "mp4" | "mov" | "webm" | "mkv" => Some(visual(ClipKind::Video)),
        "png" | "jpg" | "jpeg" | "webp" | "gif" => Some(visual(ClipKind::Image)),
        "mp3" | "wav" | "ogg" | "flac" | "m4a" => Some(MediaPayload::Audio {
            name,
            url,
            category: AudioCategory::Music,
            duration: UNKNOWN_AUDIO_SECONDS,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_from_extension() {
        match media_from_path(Path::new("/tmp/Intro.MP4")) {
            Some(MediaPayload::Visual { name, kind, thumbnail_url, .. }) => {
                assert_eq!(name, "Intro");
                assert_eq!(kind, ClipKind::Video);
                assert!(thumbnail_url.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            media_from_path(Path::new("still.png")),
            Some(MediaPayload::Visual { kind: ClipKind::Image, .. })
        ));
        assert!(matches!(
            media_from_path(Path::new("song.wav")),
            Some(MediaPayload::Audio { .. })
        ));
    }

    #[test]
    fn test_unsupported_files_ignored() {
        assert!(media_from_path(Path::new("notes.txt")).is_none());
        assert!(media_from_path(Path::new("no_extension")).is_none());
    }
}
