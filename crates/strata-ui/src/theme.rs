//! Dark timeline palette and the kind -> style lookup table.

use egui::{Color32, Rounding, Stroke};
use strata_timeline::{AudioCategory, ClipKind, TransitionKind};

/// Central theme.
pub struct Theme;

impl Theme {
    // ── Typography ─────────────────────────────────────────────
    pub const FONT_XS: f32 = 11.0; // ruler labels, badges
    pub const FONT_SM: f32 = 13.0; // clip names, buttons

    // ── Spacing (4px base) ─────────────────────────────────────
    pub const SPACE_XS: f32 = 4.0;
    pub const SPACE_SM: f32 = 8.0;
    pub const SPACE_MD: f32 = 16.0;

    // ── Border radius ──────────────────────────────────────────
    pub const RADIUS: f32 = 6.0;

    // ── Stroke widths ──────────────────────────────────────────
    pub const STROKE_SUBTLE: f32 = 0.5;
    pub const STROKE_EMPHASIS: f32 = 1.0;

    // ── Backgrounds ────────────────────────────────────────────
    pub const fn bg() -> Color32 {
        Color32::from_rgb(18, 18, 22)
    }
    pub const fn bg1() -> Color32 {
        Color32::from_rgb(28, 28, 34)
    }
    pub const fn bg2() -> Color32 {
        Color32::from_rgb(35, 35, 42)
    }

    // ── Text (opacity-based white) ─────────────────────────────
    pub const fn t1() -> Color32 {
        Color32::from_rgba_premultiplied(235, 235, 235, 235)
    }
    pub const fn t2() -> Color32 {
        Color32::from_rgba_premultiplied(153, 153, 153, 153)
    }
    pub const fn t3() -> Color32 {
        Color32::from_rgba_premultiplied(89, 89, 89, 89)
    }

    // ── Accent ─────────────────────────────────────────────────
    pub const fn accent() -> Color32 {
        Color32::from_rgb(86, 130, 255)
    }

    // ── White-alpha overlay helpers ────────────────────────────
    pub const fn white_02() -> Color32 {
        Color32::from_rgba_premultiplied(5, 5, 5, 5)
    }
    pub const fn white_04() -> Color32 {
        Color32::from_rgba_premultiplied(10, 10, 10, 10)
    }
    pub const fn white_08() -> Color32 {
        Color32::from_rgba_premultiplied(20, 20, 20, 20)
    }
    pub const fn white_10() -> Color32 {
        Color32::from_rgba_premultiplied(26, 26, 26, 26)
    }
    pub const fn white_25() -> Color32 {
        Color32::from_rgba_premultiplied(64, 64, 64, 64)
    }

    // ── Semantic colors ────────────────────────────────────────
    pub const fn red() -> Color32 {
        Color32::from_rgb(255, 88, 85)
    }
    pub const fn green() -> Color32 {
        Color32::from_rgb(48, 213, 160)
    }
    pub const fn amber() -> Color32 {
        Color32::from_rgb(255, 184, 48)
    }
    pub const fn purple() -> Color32 {
        Color32::from_rgb(167, 139, 250)
    }
    pub const fn pink() -> Color32 {
        Color32::from_rgb(244, 114, 182)
    }
    pub const fn cyan() -> Color32 {
        Color32::from_rgb(34, 211, 238)
    }

    // ── Color helpers ──────────────────────────────────────────

    /// Return a color with replaced alpha.
    pub const fn with_alpha(c: Color32, a: u8) -> Color32 {
        Color32::from_rgba_premultiplied(
            (c.r() as u16 * a as u16 / 255) as u8,
            (c.g() as u16 * a as u16 / 255) as u8,
            (c.b() as u16 * a as u16 / 255) as u8,
            a,
        )
    }

    /// Apply the timeline theme to an egui context.
    pub fn apply(ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let visuals = &mut style.visuals;
        *visuals = egui::Visuals::dark();

        visuals.panel_fill = Self::bg1();
        visuals.window_fill = Self::bg2();
        visuals.extreme_bg_color = Self::bg();

        visuals.widgets.inactive.bg_stroke = Stroke::new(Self::STROKE_SUBTLE, Self::white_04());
        visuals.widgets.inactive.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.hovered.rounding = Rounding::same(Self::RADIUS);
        visuals.widgets.active.fg_stroke = Stroke::new(Self::STROKE_EMPHASIS, Self::accent());
        visuals.widgets.active.rounding = Rounding::same(Self::RADIUS);

        visuals.selection.stroke = Stroke::new(1.0, Self::accent());

        ctx.set_style(style);
    }
}

// ── Kind styles ─────────────────────────────────────────────────

/// Rendering metadata for one discrete kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindStyle {
    pub label: &'static str,
    pub color: Color32,
    pub glyph: &'static str,
}

/// Everything the timeline draws with a per-kind style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Clip(ClipKind),
    Audio(AudioCategory),
    Transition(TransitionKind),
}

const fn style(label: &'static str, color: Color32, glyph: &'static str) -> KindStyle {
    KindStyle {
        label,
        color,
        glyph,
    }
}

static CLIP_STYLES: [(ClipKind, KindStyle); 2] = [
    (ClipKind::Video, style("Video", Theme::accent(), "\u{25B6}")),
    (ClipKind::Image, style("Image", Theme::purple(), "\u{25A3}")),
];

static AUDIO_STYLES: [(AudioCategory, KindStyle); 3] = [
    (AudioCategory::Music, style("Music", Theme::green(), "\u{266B}")),
    (AudioCategory::Voice, style("Voice", Theme::amber(), "\u{25CF}")),
    (AudioCategory::Sfx, style("SFX", Theme::pink(), "\u{2726}")),
];

static TRANSITION_STYLES: [(TransitionKind, KindStyle); 8] = [
    (TransitionKind::Fade, style("Fade", Theme::cyan(), "\u{25D0}")),
    (TransitionKind::Dissolve, style("Dissolve", Theme::cyan(), "\u{2592}")),
    (TransitionKind::WipeLeft, style("Wipe Left", Theme::amber(), "\u{25C0}")),
    (TransitionKind::WipeRight, style("Wipe Right", Theme::amber(), "\u{25B6}")),
    (TransitionKind::SlideLeft, style("Slide Left", Theme::pink(), "\u{21E0}")),
    (TransitionKind::SlideRight, style("Slide Right", Theme::pink(), "\u{21E2}")),
    (TransitionKind::Zoom, style("Zoom", Theme::purple(), "\u{2295}")),
    (TransitionKind::Blur, style("Blur", Theme::green(), "\u{2248}")),
];

static FALLBACK: KindStyle = style("?", Theme::t3(), "?");

fn lookup<K: PartialEq + 'static>(table: &'static [(K, KindStyle)], key: &K) -> &'static KindStyle {
    table
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, s)| s)
        .unwrap_or(&FALLBACK)
}

/// Label, colour and glyph for a kind.
pub fn kind_style(key: StyleKey) -> &'static KindStyle {
    match key {
        StyleKey::Clip(kind) => lookup(&CLIP_STYLES, &kind),
        StyleKey::Audio(category) => lookup(&AUDIO_STYLES, &category),
        StyleKey::Transition(kind) => lookup(&TRANSITION_STYLES, &kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_transition_has_a_style() {
        for kind in TransitionKind::ALL {
            assert_ne!(kind_style(StyleKey::Transition(kind)), &FALLBACK);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(kind_style(StyleKey::Clip(ClipKind::Image)).label, "Image");
        assert_eq!(kind_style(StyleKey::Audio(AudioCategory::Sfx)).label, "SFX");
        assert_eq!(
            kind_style(StyleKey::Transition(TransitionKind::WipeLeft)).label,
            "Wipe Left"
        );
    }

    #[test]
    fn test_with_alpha() {
        let c = Theme::with_alpha(Color32::from_rgb(255, 0, 0), 128);
        assert_eq!(c.a(), 128);
        assert_eq!(c.r(), 128);
    }
}
