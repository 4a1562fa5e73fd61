//! The desktop host: owns the document and applies timeline intents.

use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;
use strata_core::format_timecode;
use strata_timeline::{TimelineDocument, TimelineIntent};
use strata_ui::{show_timeline, show_transport, Theme, TimelineView, Transport};
use tracing::{error, info};

use crate::library::Library;

pub struct StrataApp {
    document: TimelineDocument,
    view: TimelineView,
    library: Library,
    project_path: Option<PathBuf>,
    last_tick: Instant,
    status: Option<String>,
}

impl StrataApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        document: TimelineDocument,
        project_path: Option<PathBuf>,
    ) -> Self {
        Theme::apply(&cc.egui_ctx);
        let view = TimelineView::new(&document);
        Self {
            document,
            view,
            library: Library::default(),
            project_path,
            last_tick: Instant::now(),
            status: None,
        }
    }

    fn apply(&mut self, intents: Vec<TimelineIntent>) {
        if !intents.is_empty() && self.document.apply_all(intents) {
            self.status = None;
        }
    }

    fn save(&mut self) {
        let Some(path) = self.project_path.clone() else {
            self.status = Some("Start Strata with a project path to save".into());
            return;
        };
        match self.document.save(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Project saved");
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                error!("Save failed: {}", e);
                self.status = Some(format!("Save failed: {}", e));
            }
        }
    }

    fn transport(&self) -> Transport {
        Transport::new(
            self.document.playhead(),
            self.document.total_duration(),
            self.document.is_playing(),
            self.document.config().frame_duration(),
        )
    }
}

impl eframe::App for StrataApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        if self.document.advance(dt) {
            ctx.request_repaint();
        }

        self.library.import_dropped(ctx);

        let mut intents = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Project").clicked() {
                        self.document = TimelineDocument::new(self.document.config().clone());
                        self.view = TimelineView::new(&self.document);
                        ui.close_menu();
                    }
                    if ui.button("Save").clicked() {
                        self.save();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Edit", |ui| {
                    if ui
                        .add_enabled(self.document.can_undo(), egui::Button::new("Undo"))
                        .clicked()
                    {
                        intents.push(TimelineIntent::Undo);
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(self.document.can_redo(), egui::Button::new("Redo"))
                        .clicked()
                    {
                        intents.push(TimelineIntent::Redo);
                        ui.close_menu();
                    }
                });
                if let Some(status) = &self.status {
                    ui.label(
                        egui::RichText::new(status)
                            .size(Theme::FONT_XS)
                            .color(Theme::t3()),
                    );
                }
            });
        });

        egui::SidePanel::left("library_panel")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.library.show(ui));
            });

        let transport = self.transport();
        egui::TopBottomPanel::bottom("timeline_panel")
            .resizable(true)
            .min_height(160.0)
            .default_height(320.0)
            .show(ctx, |ui| {
                intents.extend(show_transport(ui, &transport));
                intents.extend(show_timeline(ui, &mut self.view, &self.document));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::hover());
            let rect = response.rect;
            painter.rect_filled(rect, 0.0, Theme::bg());

            let playhead = self.document.playhead();
            let layout = self.document.layout();
            let active = self
                .document
                .project()
                .layers
                .iter()
                .filter(|l| l.visible)
                .filter_map(|l| layout.clip_at_time(l.id, playhead))
                .last()
                .and_then(|slot| self.document.project().clip(&slot.clip_id));
            let caption = match active {
                Some(clip) => format!("{}  {}", clip.name, format_timecode(playhead)),
                None => format_timecode(playhead),
            };
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                caption,
                egui::FontId::proportional(Theme::FONT_SM),
                Theme::t2(),
            );
        });

        self.apply(intents);
        if self.view.controller().is_capturing() {
            ctx.request_repaint();
        }
    }
}
