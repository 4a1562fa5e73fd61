//! Drives a document through the controller the way the egui panel does.

use egui::Pos2;
use strata_timeline::{Clip, ClipId, ClipKind, ClipSettings, LayerId, TimelineDocument, TimelineIntent};
use strata_ui::{
    ControllerInput, Modifiers, SceneInput, SceneMetrics, Shortcut, TimelineContext,
    TimelineController, TimelineScene, Viewport,
};

/// Vertical centre of layer 1's clip lane with the default config.
pub const CLIP_Y: f32 = 48.0;

pub struct Harness {
    pub doc: TimelineDocument,
    pub ctrl: TimelineController,
    pub ids: Vec<ClipId>,
}

impl Harness {
    /// Video clips of the given lengths, in order, on layer 1.
    pub fn with_clips(durations: &[f64]) -> Self {
        let mut doc = TimelineDocument::default();
        let mut ids = Vec::new();
        for (i, d) in durations.iter().enumerate() {
            let clip = Clip::new(format!("clip {}", i + 1), format!("media/{i}.mp4"), ClipKind::Video);
            ids.push(clip.id.clone());
            doc.insert_clip(clip, ClipSettings::for_video(*d)).unwrap();
        }
        let ctrl = TimelineController::new(doc.config());
        Self { doc, ctrl, ids }
    }

    pub fn scene(&self) -> TimelineScene {
        TimelineScene::build(&SceneInput {
            project: self.doc.project(),
            layout: self.doc.layout(),
            scale: *self.doc.scale(),
            metrics: SceneMetrics::from_config(self.doc.config()),
            viewport: Viewport::new(Pos2::ZERO, 1200.0),
            playhead: self.doc.playhead(),
            selection: self.doc.selection(),
        })
    }

    /// Feed one input and apply what it produced as one update.
    pub fn send(&mut self, input: ControllerInput) -> Vec<TimelineIntent> {
        let scene = self.scene();
        let intents = {
            let cx = TimelineContext::new(&self.doc, &scene);
            self.ctrl.handle(input, &cx)
        };
        self.doc.apply_all(intents.clone());
        intents
    }

    pub fn apply(&mut self, intent: TimelineIntent) -> bool {
        self.doc.apply(intent)
    }

    pub fn drag(&mut self, from: Pos2, to: Pos2) -> Vec<TimelineIntent> {
        let mut intents = self.send(ControllerInput::PointerDown {
            pos: from,
            modifiers: Modifiers::NONE,
        });
        intents.extend(self.send(ControllerInput::PointerMove { pos: to }));
        intents.extend(self.send(ControllerInput::PointerUp { pos: to }));
        intents
    }

    pub fn key(&mut self, modifiers: Modifiers, key: egui::Key) -> Vec<TimelineIntent> {
        self.send(ControllerInput::Key(Shortcut::new(modifiers, key)))
    }

    /// Start times in list order.
    pub fn starts(&self) -> Vec<f64> {
        self.doc.layout().clips().iter().map(|s| s.start).collect()
    }

    pub fn layer_starts(&self, layer: u32) -> Vec<f64> {
        self.doc
            .layout()
            .clips_on_layer(LayerId::new(layer))
            .map(|s| s.start)
            .collect()
    }
}
