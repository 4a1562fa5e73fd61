//! Timeline panel: toolbar, layer headers and the painted canvas.
//!
//! The canvas paints a [`TimelineScene`] and feeds egui input to the
//! [`TimelineController`]. Nothing here mutates the document; every change
//! leaves as a [`TimelineIntent`] for the host to apply.

use egui::{Color32, CursorIcon, Pos2, Rect, Rounding, Stroke, Vec2};
use strata_core::format_timecode;
use strata_timeline::{ClipKind, LayoutMode, TimelineDocument, TimelineIntent, TransitionKind};

use crate::interaction::{
    ControllerInput, DropPayload, GestureState, MenuChoice, MenuTarget, TimelineContext,
    TimelineController,
};
use crate::scene::{
    AudioBlock, ClipBlock, Hit, SceneInput, SceneMetrics, TimelineScene, TransitionBadge, Viewport,
};
use crate::shortcuts::{Modifiers, Shortcut};
use crate::theme::{kind_style, StyleKey, Theme};
use crate::trim::trim_cursor;
use crate::widgets;

const TOOLBAR_HEIGHT: f32 = 28.0;
const HEADER_WIDTH: f32 = 72.0;
const HEADER_BUTTON: f32 = 16.0;
const MIN_LABEL_WIDTH: f32 = 24.0;
/// Seconds of empty canvas kept after the last clip.
const TAIL_SECONDS: f64 = 5.0;

const VOLUME_STEPS: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
const SPEED_STEPS: [f64; 5] = [0.5, 0.75, 1.0, 1.5, 2.0];
const FADE_STEPS: [f64; 5] = [0.0, 0.5, 1.0, 2.0, 5.0];
const TRANSITION_STEPS: [f64; 4] = [0.25, 0.5, 1.0, 2.0];

/// Texture lookup for clip thumbnails. Tiles without a texture are drawn as
/// flat colour.
pub trait ThumbnailSource {
    fn texture(&self, url: &str) -> Option<egui::TextureId>;
}

/// Per-panel state that survives between frames.
pub struct TimelineView {
    controller: TimelineController,
    scroll_x: f32,
    thumbnails: Option<Box<dyn ThumbnailSource>>,
}

impl TimelineView {
    pub fn new(document: &TimelineDocument) -> Self {
        Self {
            controller: TimelineController::new(document.config()),
            scroll_x: 0.0,
            thumbnails: None,
        }
    }

    pub fn with_thumbnails(mut self, source: Box<dyn ThumbnailSource>) -> Self {
        self.thumbnails = Some(source);
        self
    }

    pub fn controller(&self) -> &TimelineController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TimelineController {
        &mut self.controller
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }
}

// ── Rendering ──────────────────────────────────────────────────

/// Draw the timeline panel and return the intents produced this frame.
pub fn show_timeline(
    ui: &mut egui::Ui,
    view: &mut TimelineView,
    document: &TimelineDocument,
) -> Vec<TimelineIntent> {
    let mut intents = Vec::new();
    let metrics = SceneMetrics::from_config(document.config());

    ui.vertical(|ui| {
        ui.spacing_mut().item_spacing = Vec2::ZERO;
        draw_toolbar(ui, document, &mut intents);

        let available = ui.available_size();
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing = Vec2::ZERO;
            let (header_rect, _) = ui.allocate_exact_size(
                Vec2::new(HEADER_WIDTH, available.y),
                egui::Sense::hover(),
            );

            let canvas_width = (available.x - HEADER_WIDTH).max(0.0);
            let (response, painter) = ui.allocate_painter(
                Vec2::new(canvas_width, available.y),
                egui::Sense::click_and_drag(),
            );
            let rect = response.rect;

            update_scroll(ui, &response, view, document, canvas_width);

            let scene = TimelineScene::build(&SceneInput {
                project: document.project(),
                layout: document.layout(),
                scale: *document.scale(),
                metrics,
                viewport: Viewport {
                    origin: rect.min,
                    width: canvas_width,
                    scroll_x: view.scroll_x,
                },
                playhead: document.playhead(),
                selection: document.selection(),
            });

            draw_layer_headers(ui, header_rect, &scene, document, &mut intents);

            let painter = painter.with_clip_rect(rect);
            painter.rect_filled(rect, 0.0, Theme::bg());
            draw_lanes(&painter, &scene, rect);
            if scene.clips.is_empty() && scene.audio.is_empty() {
                draw_empty_state(&painter, &scene, rect);
            }
            for block in &scene.clips {
                draw_clip(&painter, block, view.thumbnails.as_deref());
            }
            for block in &scene.audio {
                draw_audio(&painter, block);
            }
            draw_zones(ui, &painter, &response, &scene);
            for badge in &scene.badges {
                draw_badge(&painter, badge);
            }
            if let Some(ghost) = view.controller.preview(&scene) {
                painter.rect_stroke(
                    ghost,
                    Rounding::same(Theme::RADIUS),
                    Stroke::new(Theme::STROKE_EMPHASIS, Theme::with_alpha(Theme::t1(), 160)),
                );
            }
            draw_ruler(&painter, &scene);
            draw_playhead(&painter, &scene, rect);

            let cx = TimelineContext::new(document, &scene);
            intents.extend(route_input(ui, &response, &mut view.controller, &cx));

            let mut choice = None;
            response.context_menu(|ui| match view.controller.menu_target() {
                Some(target) => choice = context_menu(ui, target, document),
                None => ui.close_menu(),
            });
            if let Some(choice) = choice {
                intents.extend(view.controller.handle(ControllerInput::Menu(choice), &cx));
            }

            update_cursor(ui, &response, &view.controller, &scene);
        });
    });

    intents
}

/// Wheel scrolling over the canvas, and keeping the playhead on screen
/// while playing.
fn update_scroll(
    ui: &egui::Ui,
    response: &egui::Response,
    view: &mut TimelineView,
    document: &TimelineDocument,
    width: f32,
) {
    let scale = document.scale();
    let content = scale.time_to_pixels(document.total_duration() + TAIL_SECONDS) as f32;
    let max_scroll = (content - width).max(0.0);

    if response.hovered() {
        let delta = ui.input(|i| i.smooth_scroll_delta);
        view.scroll_x -= delta.x + delta.y;
    }

    if document.is_playing() {
        let x = scale.time_to_pixels(document.playhead()) as f32 - view.scroll_x;
        if x > width * 0.9 {
            view.scroll_x += x - width * 0.5;
        } else if x < 0.0 {
            view.scroll_x += x;
        }
    }

    view.scroll_x = view.scroll_x.clamp(0.0, max_scroll);
}

// ── Input ──────────────────────────────────────────────────────

fn route_input(
    ui: &egui::Ui,
    response: &egui::Response,
    controller: &mut TimelineController,
    cx: &TimelineContext<'_>,
) -> Vec<TimelineIntent> {
    let mut intents = Vec::new();
    let (pressed, released, pos, moved, modifiers) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.latest_pos(),
            i.pointer.is_moving(),
            i.modifiers,
        )
    });

    if response.secondary_clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            intents.extend(controller.handle(ControllerInput::ContextMenu { pos }, cx));
        }
        return intents;
    }

    if let Some(payload) = response.dnd_release_payload::<DropPayload>() {
        if let Some(pos) = pos {
            intents.extend(controller.handle(
                ControllerInput::Drop {
                    pos,
                    payload: (*payload).clone(),
                },
                cx,
            ));
        }
        return intents;
    }

    if let Some(pos) = pos {
        if pressed && response.hovered() {
            response.request_focus();
            intents.extend(controller.handle(
                ControllerInput::PointerDown {
                    pos,
                    modifiers: Modifiers::from_egui(modifiers),
                },
                cx,
            ));
        } else if moved && controller.is_capturing() {
            intents.extend(controller.handle(ControllerInput::PointerMove { pos }, cx));
        }
        if released && controller.is_capturing() {
            intents.extend(controller.handle(ControllerInput::PointerUp { pos }, cx));
        }
    } else if released {
        controller.cancel();
    }

    if response.has_focus() || response.hovered() {
        let keys: Vec<Shortcut> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => Some(Shortcut::new(Modifiers::from_egui(*modifiers), *key)),
                    _ => None,
                })
                .collect()
        });
        for shortcut in keys {
            intents.extend(controller.handle(ControllerInput::Key(shortcut), cx));
        }
    }

    intents
}

// ── Context menu ───────────────────────────────────────────────

/// Entries for the block the menu was opened on. Returns the picked entry.
fn context_menu(
    ui: &mut egui::Ui,
    target: &MenuTarget,
    document: &TimelineDocument,
) -> Option<MenuChoice> {
    let mut choice = None;
    match target {
        MenuTarget::Clip(id) => {
            let Some(settings) = document.resolved(id) else {
                ui.close_menu();
                return None;
            };
            let mute = if settings.muted { "Unmute" } else { "Mute" };
            if ui.button(mute).clicked() {
                choice = Some(MenuChoice::ToggleMute);
            }
            ui.menu_button("Volume", |ui| {
                for step in VOLUME_STEPS {
                    let current = (settings.volume - step).abs() < 1e-3;
                    if ui
                        .selectable_label(current, format!("{:.0}%", step * 100.0))
                        .clicked()
                    {
                        choice = Some(MenuChoice::Volume(step));
                    }
                }
            });
            if settings.kind == ClipKind::Video {
                ui.menu_button("Speed", |ui| {
                    for step in SPEED_STEPS {
                        let current = (settings.speed - step).abs() < 1e-9;
                        if ui.selectable_label(current, format!("{}×", step)).clicked() {
                            choice = Some(MenuChoice::Speed(step));
                        }
                    }
                });
            }
            ui.separator();
            if ui.button("Duplicate").clicked() {
                choice = Some(MenuChoice::Duplicate);
            }
            if ui.button("Delete").clicked() {
                choice = Some(MenuChoice::Remove);
            }
        }
        MenuTarget::Audio(id) => {
            let Some(track) = document.project().audio_track(id) else {
                ui.close_menu();
                return None;
            };
            ui.menu_button("Volume", |ui| {
                for step in VOLUME_STEPS {
                    let current = (track.volume - step).abs() < 1e-3;
                    if ui
                        .selectable_label(current, format!("{:.0}%", step * 100.0))
                        .clicked()
                    {
                        choice = Some(MenuChoice::Volume(step));
                    }
                }
            });
            ui.menu_button("Fade out", |ui| {
                let longest = track.effective_duration();
                for step in FADE_STEPS.into_iter().filter(|s| *s <= longest) {
                    let current = (track.fade_out - step).abs() < 1e-9;
                    let label = if step == 0.0 {
                        "None".to_string()
                    } else {
                        format!("{} s", step)
                    };
                    if ui.selectable_label(current, label).clicked() {
                        choice = Some(MenuChoice::FadeOut(step));
                    }
                }
            });
            ui.separator();
            if ui.button("Remove audio").clicked() {
                choice = Some(MenuChoice::Remove);
            }
        }
        MenuTarget::Transition {
            layer,
            after_clip_index,
        } => {
            let Some(transition) = document
                .project()
                .transitions
                .iter()
                .find(|t| t.is_at(*layer, *after_clip_index))
            else {
                ui.close_menu();
                return None;
            };
            ui.menu_button("Type", |ui| {
                for kind in TransitionKind::ALL {
                    let style = kind_style(StyleKey::Transition(kind));
                    let label = format!("{} {}", style.glyph, style.label);
                    if ui.selectable_label(transition.kind == kind, label).clicked() {
                        choice = Some(MenuChoice::TransitionKind(kind));
                    }
                }
            });
            ui.menu_button("Duration", |ui| {
                for step in TRANSITION_STEPS {
                    let current = (transition.duration - step).abs() < 1e-9;
                    if ui.selectable_label(current, format!("{} s", step)).clicked() {
                        choice = Some(MenuChoice::TransitionDuration(step));
                    }
                }
            });
            ui.separator();
            if ui.button("Remove transition").clicked() {
                choice = Some(MenuChoice::Remove);
            }
        }
    }
    if choice.is_some() {
        ui.close_menu();
    }
    choice
}

fn update_cursor(
    ui: &egui::Ui,
    response: &egui::Response,
    controller: &TimelineController,
    scene: &TimelineScene,
) {
    let icon = match controller.state() {
        GestureState::Trimming { edge, .. } => Some(trim_cursor(*edge)),
        GestureState::Dragging { .. } => Some(CursorIcon::Grabbing),
        GestureState::Scrubbing => Some(CursorIcon::ResizeHorizontal),
        GestureState::Pressed { .. } => None,
        GestureState::Idle => response.hover_pos().and_then(|pos| match scene.hit_test(pos) {
            Hit::TrimHandle { edge, .. } => Some(trim_cursor(edge)),
            Hit::Clip(_) | Hit::Audio(_) => Some(CursorIcon::Grab),
            _ => None,
        }),
    };
    if let Some(icon) = icon {
        ui.ctx().set_cursor_icon(icon);
    }
}

// ── Canvas ─────────────────────────────────────────────────────

fn draw_lanes(painter: &egui::Painter, scene: &TimelineScene, rect: Rect) {
    for lane in &scene.lanes {
        let fill = if lane.row % 2 == 0 {
            Theme::white_02()
        } else {
            Color32::TRANSPARENT
        };
        painter.rect_filled(lane.clip_rect, 0.0, fill);
        painter.rect_filled(lane.audio_rect, 0.0, Theme::with_alpha(Theme::bg2(), 120));
        if lane.locked {
            painter.rect_filled(lane.rect(), 0.0, Theme::with_alpha(Theme::bg(), 90));
        }
        let bottom = lane.rect().bottom();
        painter.line_segment(
            [Pos2::new(rect.left(), bottom), Pos2::new(rect.right(), bottom)],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::white_04()),
        );
    }
}

fn draw_empty_state(painter: &egui::Painter, scene: &TimelineScene, rect: Rect) {
    let top = scene.ruler_rect.bottom();
    let center = Pos2::new(rect.center().x, top + (scene.content_bottom() - top) * 0.5);
    painter.text(
        center,
        egui::Align2::CENTER_CENTER,
        "Drag media here to start editing",
        egui::FontId::proportional(Theme::FONT_XS),
        Theme::t3(),
    );
}

fn draw_clip(painter: &egui::Painter, block: &ClipBlock, thumbnails: Option<&dyn ThumbnailSource>) {
    let style = kind_style(StyleKey::Clip(block.kind));
    let rounding = Rounding::same(Theme::RADIUS);

    painter.rect_filled(block.rect, rounding, Theme::with_alpha(style.color, 40));

    let texture = thumbnails
        .zip(block.thumbnail.as_deref())
        .and_then(|(source, url)| source.texture(url));
    if let Some(texture) = texture {
        for tile in &block.tiles {
            painter.image(
                texture,
                tile.rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(tile.uv_width, 1.0)),
                Theme::with_alpha(Color32::WHITE, 200),
            );
        }
    } else {
        for tile in block.tiles.iter().skip(1) {
            painter.line_segment(
                [tile.rect.left_top(), tile.rect.left_bottom()],
                Stroke::new(Theme::STROKE_SUBTLE, Theme::with_alpha(style.color, 60)),
            );
        }
    }

    let (border_alpha, border_width) = if block.selected {
        (200, Theme::STROKE_EMPHASIS * 2.0)
    } else {
        (90, Theme::STROKE_EMPHASIS)
    };
    painter.rect_stroke(
        block.rect,
        rounding,
        Stroke::new(border_width, Theme::with_alpha(style.color, border_alpha)),
    );

    if !block.locked {
        let handle_fill = Theme::with_alpha(style.color, if block.selected { 140 } else { 60 });
        if let Some(left) = block.left_handle {
            painter.rect_filled(
                left,
                Rounding {
                    nw: Theme::RADIUS,
                    sw: Theme::RADIUS,
                    ne: 0.0,
                    se: 0.0,
                },
                handle_fill,
            );
        }
        painter.rect_filled(
            block.right_handle,
            Rounding {
                nw: 0.0,
                sw: 0.0,
                ne: Theme::RADIUS,
                se: Theme::RADIUS,
            },
            handle_fill,
        );
    }

    let text_rect = block.rect.shrink2(Vec2::new(Theme::SPACE_SM, 0.0));
    if text_rect.width() > MIN_LABEL_WIDTH {
        painter.with_clip_rect(text_rect.intersect(painter.clip_rect())).text(
            Pos2::new(text_rect.left(), block.rect.top() + Theme::SPACE_SM),
            egui::Align2::LEFT_TOP,
            format!("{} {}", style.glyph, block.name),
            egui::FontId::proportional(Theme::FONT_XS),
            Theme::t1(),
        );
    }
}

fn draw_audio(painter: &egui::Painter, block: &AudioBlock) {
    let style = kind_style(StyleKey::Audio(block.category));
    let rounding = Rounding::same(Theme::RADIUS / 2.0);

    painter.rect_filled(block.rect, rounding, Theme::with_alpha(style.color, 50));

    // Placeholder waveform bars.
    let mut x = block.rect.left() + 2.0;
    while x < block.rect.right() - 2.0 {
        painter.line_segment(
            [
                Pos2::new(x, block.rect.top() + Theme::SPACE_XS),
                Pos2::new(x, block.rect.bottom() - Theme::SPACE_XS),
            ],
            Stroke::new(1.0, Theme::with_alpha(style.color, 30)),
        );
        x += 3.0;
    }

    if let Some(fade) = block.fade_rect {
        let shape = egui::epaint::PathShape::convex_polygon(
            vec![fade.left_top(), fade.right_bottom(), fade.left_bottom()],
            Theme::with_alpha(Theme::bg(), 140),
            Stroke::NONE,
        );
        painter.add(shape);
    }

    painter.rect_stroke(
        block.rect,
        rounding,
        Stroke::new(Theme::STROKE_SUBTLE, Theme::with_alpha(style.color, 120)),
    );

    let text_rect = block.rect.shrink2(Vec2::new(Theme::SPACE_XS, 0.0));
    if text_rect.width() > MIN_LABEL_WIDTH {
        painter.with_clip_rect(text_rect.intersect(painter.clip_rect())).text(
            Pos2::new(text_rect.left(), text_rect.center().y),
            egui::Align2::LEFT_CENTER,
            format!("{} {}", style.glyph, block.name),
            egui::FontId::proportional(Theme::FONT_XS),
            Theme::t2(),
        );
    }
}

/// Transition zones are only shown while a transition is being dragged.
fn draw_zones(
    ui: &egui::Ui,
    painter: &egui::Painter,
    response: &egui::Response,
    scene: &TimelineScene,
) {
    let dragging_transition = egui::DragAndDrop::payload::<DropPayload>(ui.ctx())
        .is_some_and(|payload| matches!(*payload, DropPayload::Transition(_)));
    if !dragging_transition {
        return;
    }
    let hover = response.hover_pos();
    for zone in scene.zones.iter().filter(|z| !z.locked) {
        let hovered = hover.is_some_and(|p| zone.rect.contains(p));
        let alpha = if hovered { 120 } else { 40 };
        painter.rect_filled(
            zone.rect,
            Rounding::same(Theme::RADIUS / 2.0),
            Theme::with_alpha(Theme::cyan(), alpha),
        );
    }
}

fn draw_badge(painter: &egui::Painter, badge: &TransitionBadge) {
    let style = kind_style(StyleKey::Transition(badge.kind));
    painter.rect_filled(
        badge.rect,
        Rounding::same(Theme::RADIUS / 2.0),
        Theme::with_alpha(style.color, 150),
    );
    painter.rect_stroke(
        badge.rect,
        Rounding::same(Theme::RADIUS / 2.0),
        Stroke::new(Theme::STROKE_EMPHASIS, style.color),
    );
    painter.text(
        badge.rect.center(),
        egui::Align2::CENTER_CENTER,
        style.glyph,
        egui::FontId::proportional(Theme::FONT_XS),
        Theme::t1(),
    );
}

fn draw_ruler(painter: &egui::Painter, scene: &TimelineScene) {
    let ruler = scene.ruler_rect;
    painter.rect_filled(ruler, 0.0, Theme::bg1());
    painter.line_segment(
        [ruler.left_bottom(), ruler.right_bottom()],
        Stroke::new(Theme::STROKE_SUBTLE, Theme::white_08()),
    );

    for tick in &scene.ticks {
        let height = if tick.major {
            ruler.height() * 0.5
        } else {
            ruler.height() * 0.2
        };
        let color = if tick.major {
            Theme::white_25()
        } else {
            Theme::white_10()
        };
        painter.line_segment(
            [
                Pos2::new(tick.x, ruler.bottom() - height),
                Pos2::new(tick.x, ruler.bottom()),
            ],
            Stroke::new(Theme::STROKE_SUBTLE, color),
        );
        if let Some(label) = &tick.label {
            painter.text(
                Pos2::new(tick.x + 3.0, ruler.top() + 2.0),
                egui::Align2::LEFT_TOP,
                label,
                egui::FontId::monospace(Theme::FONT_XS),
                Theme::t3(),
            );
        }
    }
}

fn draw_playhead(painter: &egui::Painter, scene: &TimelineScene, rect: Rect) {
    let x = scene.playhead_x;
    if x < rect.left() || x > rect.right() {
        return;
    }
    let ruler = scene.ruler_rect;
    let tri = egui::epaint::PathShape::convex_polygon(
        vec![
            Pos2::new(x - 5.0, ruler.bottom() - 6.0),
            Pos2::new(x + 5.0, ruler.bottom() - 6.0),
            Pos2::new(x, ruler.bottom()),
        ],
        Theme::red(),
        Stroke::NONE,
    );
    painter.add(tri);
    painter.line_segment(
        [Pos2::new(x, ruler.bottom()), Pos2::new(x, rect.bottom())],
        Stroke::new(4.0, Theme::with_alpha(Theme::red(), 30)),
    );
    painter.line_segment(
        [Pos2::new(x, ruler.bottom()), Pos2::new(x, rect.bottom())],
        Stroke::new(1.5, Theme::red()),
    );
}

// ── Sub-components ─────────────────────────────────────────────

fn draw_toolbar(ui: &mut egui::Ui, document: &TimelineDocument, intents: &mut Vec<TimelineIntent>) {
    let toolbar_frame = egui::Frame::none()
        .fill(Theme::bg1())
        .stroke(Stroke::new(Theme::STROKE_SUBTLE, Theme::white_04()))
        .inner_margin(egui::Margin::symmetric(Theme::SPACE_SM, 0.0));

    toolbar_frame.show(ui, |ui| {
        ui.set_height(TOOLBAR_HEIGHT);
        ui.horizontal_centered(|ui| {
            ui.spacing_mut().item_spacing = Vec2::new(Theme::SPACE_SM, 0.0);

            let free = document.project().mode == LayoutMode::Free;
            if widgets::toggle_switch(ui, free) {
                let mode = if free {
                    LayoutMode::Snap
                } else {
                    LayoutMode::Free
                };
                intents.push(TimelineIntent::SetLayoutMode(mode));
            }
            ui.label(
                egui::RichText::new(if free { "Free" } else { "Snap" })
                    .size(Theme::FONT_XS)
                    .color(Theme::t2()),
            );
            if free && small_button(ui, "Reset positions", true) {
                intents.push(TimelineIntent::ResetPositions);
            }

            ui.add_space(Theme::SPACE_MD);

            let zoom = document.zoom();
            if small_button(ui, "\u{2212}", !zoom.is_min()) {
                intents.push(TimelineIntent::SetZoom(zoom.step_out()));
            }
            ui.label(
                egui::RichText::new(format!("{:.0}%", zoom.value() * 100.0))
                    .size(Theme::FONT_XS)
                    .monospace()
                    .color(Theme::t2()),
            );
            if small_button(ui, "+", !zoom.is_max()) {
                intents.push(TimelineIntent::SetZoom(zoom.step_in()));
            }

            ui.add_space(Theme::SPACE_MD);

            if small_button(ui, "\u{21B6}", document.can_undo()) {
                intents.push(TimelineIntent::Undo);
            }
            if small_button(ui, "\u{21B7}", document.can_redo()) {
                intents.push(TimelineIntent::Redo);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{} / {}",
                        format_timecode(document.playhead()),
                        format_timecode(document.total_duration())
                    ))
                    .size(Theme::FONT_XS)
                    .monospace()
                    .color(Theme::t1()),
                );
            });
        });
    });
}

fn small_button(ui: &mut egui::Ui, label: &str, enabled: bool) -> bool {
    ui.add_enabled(
        enabled,
        egui::Button::new(egui::RichText::new(label).size(Theme::FONT_XS)).small(),
    )
    .clicked()
}

/// One header row per visible lane, then the hidden layers (which have no
/// lane) and the add-layer button.
fn draw_layer_headers(
    ui: &mut egui::Ui,
    rect: Rect,
    scene: &TimelineScene,
    document: &TimelineDocument,
    intents: &mut Vec<TimelineIntent>,
) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, Theme::bg1());
    let layers = &document.project().layers;
    let can_remove = layers.len() > 1;

    for lane in &scene.lanes {
        let row = Rect::from_x_y_ranges(rect.x_range(), lane.rect().y_range());
        painter.line_segment(
            [row.left_bottom(), row.right_bottom()],
            Stroke::new(Theme::STROKE_SUBTLE, Theme::white_04()),
        );
        painter.text(
            Pos2::new(row.left() + Theme::SPACE_XS, lane.clip_rect.top() + Theme::SPACE_XS),
            egui::Align2::LEFT_TOP,
            format!("L{}", lane.layer.number()),
            egui::FontId::proportional(Theme::FONT_XS),
            Theme::t2(),
        );

        let y = lane.clip_rect.bottom() - HEADER_BUTTON - 2.0;
        let mut x = row.left() + 2.0;
        let lock_icon = if lane.locked { "\u{25A0}" } else { "\u{25A1}" };
        if header_button(ui, &painter, Pos2::new(x, y), lock_icon, lane.locked, ("lock", lane.layer)) {
            intents.push(TimelineIntent::ToggleLayerLock(lane.layer));
        }
        x += HEADER_BUTTON + 2.0;
        if header_button(ui, &painter, Pos2::new(x, y), "\u{25C9}", true, ("eye", lane.layer)) {
            intents.push(TimelineIntent::ToggleLayerVisibility(lane.layer));
        }
        x += HEADER_BUTTON + 2.0;
        if can_remove
            && !document.project().layer_in_use(lane.layer)
            && header_button(ui, &painter, Pos2::new(x, y), "\u{00D7}", false, ("remove", lane.layer))
        {
            intents.push(TimelineIntent::RemoveLayer(lane.layer));
        }
    }

    let mut y = scene.content_bottom() + Theme::SPACE_XS;
    for layer in layers.iter().filter(|l| !l.visible) {
        painter.text(
            Pos2::new(rect.left() + Theme::SPACE_XS, y + HEADER_BUTTON / 2.0),
            egui::Align2::LEFT_CENTER,
            format!("L{}", layer.id.number()),
            egui::FontId::proportional(Theme::FONT_XS),
            Theme::t3(),
        );
        let pos = Pos2::new(rect.right() - HEADER_BUTTON - Theme::SPACE_XS, y);
        if header_button(ui, &painter, pos, "\u{25CB}", false, ("eye", layer.id)) {
            intents.push(TimelineIntent::ToggleLayerVisibility(layer.id));
        }
        y += HEADER_BUTTON + Theme::SPACE_XS;
    }

    if !layers.is_full()
        && header_button(
            ui,
            &painter,
            Pos2::new(rect.left() + Theme::SPACE_XS, y),
            "+",
            false,
            "add_layer",
        )
    {
        intents.push(TimelineIntent::AddLayer);
    }
}

fn header_button(
    ui: &mut egui::Ui,
    painter: &egui::Painter,
    min: Pos2,
    icon: &str,
    active: bool,
    id: impl std::hash::Hash,
) -> bool {
    let rect = Rect::from_min_size(min, Vec2::splat(HEADER_BUTTON));
    let response = ui.interact(rect, ui.id().with(("layer_header", id)), egui::Sense::click());
    let fill = if active {
        Theme::with_alpha(Theme::accent(), 90)
    } else if response.hovered() {
        Theme::white_10()
    } else {
        Theme::white_04()
    };
    painter.rect_filled(rect, Rounding::same(Theme::RADIUS / 2.0), fill);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(Theme::FONT_XS),
        Theme::t1(),
    );
    response.clicked()
}
