//! Small shared widgets.

use crate::theme::Theme;
use egui::{Pos2, Rounding, Stroke, Vec2};

const TRACK_SIZE: Vec2 = Vec2::new(30.0, 16.0);
const THUMB_RADIUS: f32 = 6.0;

/// Pill-shaped on/off switch. Returns `true` when clicked; the caller owns
/// the state and decides what a click means.
pub fn toggle_switch(ui: &mut egui::Ui, on: bool) -> bool {
    let (resp, painter) = ui.allocate_painter(TRACK_SIZE, egui::Sense::click());
    let rect = resp.rect;

    let pill = Rounding::same(rect.height() / 2.0);
    let (fill, border) = if on {
        (
            Theme::with_alpha(Theme::accent(), 90),
            Theme::with_alpha(Theme::accent(), 130),
        )
    } else {
        (Theme::white_04(), Theme::white_08())
    };
    painter.rect_filled(rect, pill, fill);
    painter.rect_stroke(rect, pill, Stroke::new(Theme::STROKE_SUBTLE, border));

    let t = ui
        .ctx()
        .animate_bool_with_time(resp.id.with("toggle_anim"), on, 0.15);
    let x = egui::lerp(
        rect.left() + THUMB_RADIUS + 2.0..=rect.right() - THUMB_RADIUS - 2.0,
        t,
    );
    let thumb = if on {
        Theme::accent()
    } else {
        Theme::white_25()
    };
    painter.circle_filled(Pos2::new(x, rect.center().y), THUMB_RADIUS, thumb);

    if resp.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    resp.clicked()
}
