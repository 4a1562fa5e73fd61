//! Transport: playhead moves and play state.
//!
//! Every playhead change (canvas click, ruler scrub, buttons, keys) goes
//! through [`Transport::seek`], which clamps to `[0, duration]`. The core
//! only reports state; the host advances the playhead while playing.

use egui::{Pos2, Rect, Rounding, Vec2};
use strata_core::format_timecode;
use strata_timeline::TimelineIntent;

use crate::theme::Theme;

/// Snapshot of the host's playback state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    pub time: f64,
    pub duration: f64,
    pub playing: bool,
    pub frame_duration: f64,
}

impl Transport {
    pub fn new(time: f64, duration: f64, playing: bool, frame_duration: f64) -> Self {
        Self {
            time,
            duration: duration.max(0.0),
            playing,
            frame_duration,
        }
    }

    /// Clamp `time` into `[0, duration]`; non-finite input maps to 0.
    pub fn clamp(&self, time: f64) -> f64 {
        if time.is_finite() {
            time.clamp(0.0, self.duration)
        } else {
            0.0
        }
    }

    /// Seek intent, or `None` when the playhead would not move.
    pub fn seek(&self, time: f64) -> Option<TimelineIntent> {
        let target = self.clamp(time);
        (target != self.time).then_some(TimelineIntent::Seek(target))
    }

    pub fn step_frames(&self, frames: i32) -> Option<TimelineIntent> {
        self.seek(self.time + f64::from(frames) * self.frame_duration)
    }

    pub fn step_seconds(&self, seconds: f64) -> Option<TimelineIntent> {
        self.seek(self.time + seconds)
    }

    pub fn skip_to_start(&self) -> Option<TimelineIntent> {
        self.seek(0.0)
    }

    pub fn skip_to_end(&self) -> Option<TimelineIntent> {
        self.seek(self.duration)
    }

    pub fn toggle_play(&self) -> TimelineIntent {
        TimelineIntent::TogglePlay
    }
}

// ── Transport bar ───────────────────────────────────────────────

const BUTTON_SIZE: f32 = 26.0;
const BAR_HEIGHT: f32 = 36.0;

/// Draw the transport bar and return the intents its buttons produced.
pub fn show_transport(ui: &mut egui::Ui, transport: &Transport) -> Vec<TimelineIntent> {
    let mut intents = Vec::new();
    let width = ui.available_width();
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, BAR_HEIGHT), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Theme::bg2());

    let play_icon = if transport.playing {
        "\u{23F8}"
    } else {
        "\u{25B6}"
    };
    let buttons: [(&str, fn(&Transport) -> Option<TimelineIntent>); 5] = [
        ("\u{23EE}", |t| t.skip_to_start()),
        ("\u{25C0}", |t| t.step_frames(-1)),
        (play_icon, |t| Some(t.toggle_play())),
        ("\u{25B6}\u{258F}", |t| t.step_frames(1)),
        ("\u{23ED}", |t| t.skip_to_end()),
    ];

    let y = rect.center().y;
    let mut x = rect.left() + Theme::SPACE_SM;
    for (i, (icon, action)) in buttons.iter().enumerate() {
        let button = Rect::from_min_size(
            Pos2::new(x, y - BUTTON_SIZE / 2.0),
            Vec2::splat(BUTTON_SIZE),
        );
        let response = ui.interact(button, ui.id().with(("transport", i)), egui::Sense::click());
        let is_play = i == 2;
        let fill = if is_play && transport.playing {
            Theme::red()
        } else if is_play {
            Theme::accent()
        } else if response.hovered() {
            Theme::white_10()
        } else {
            Theme::white_04()
        };
        painter.rect_filled(button, Rounding::same(Theme::RADIUS), fill);
        painter.text(
            button.center(),
            egui::Align2::CENTER_CENTER,
            *icon,
            egui::FontId::proportional(Theme::FONT_SM),
            Theme::t1(),
        );
        if response.clicked() {
            intents.extend(action(transport));
        }
        x += BUTTON_SIZE + Theme::SPACE_XS;
    }

    painter.text(
        Pos2::new(x + Theme::SPACE_SM, y),
        egui::Align2::LEFT_CENTER,
        format!(
            "{} / {}",
            format_timecode(transport.time),
            format_timecode(transport.duration)
        ),
        egui::FontId::monospace(Theme::FONT_SM),
        Theme::t1(),
    );

    intents
}
