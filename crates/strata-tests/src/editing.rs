//! End-to-end editing flows: input events through the controller, applied
//! by the document, observed through the layout and the scene.

use egui::{Key, Pos2};
use strata_timeline::{
    ClipKind, LayerId, MediaPayload, TimelineDocument, TimelineIntent, TransitionKind,
};
use strata_ui::{ControllerInput, DropPayload, Modifiers};

use crate::harness::{Harness, CLIP_Y};

#[test]
fn split_at_playhead_partitions_clip() {
    let mut h = Harness::with_clips(&[10.0]);
    h.apply(TimelineIntent::Seek(4.0));
    h.key(Modifiers::NONE, Key::S);

    let clips = h.doc.project().clips.clone();
    assert_eq!(clips.len(), 2);
    let head = h.doc.resolved(&clips[0].id).unwrap();
    let tail = h.doc.resolved(&clips[1].id).unwrap();
    assert_eq!((head.trim_start, head.trim_end), (0.0, 4.0));
    assert_eq!((tail.trim_start, tail.trim_end), (4.0, 10.0));
    assert_eq!(h.doc.total_duration(), 10.0);
    assert_eq!(h.starts(), vec![0.0, 4.0]);
}

#[test]
fn drag_reorder_is_one_undo_step() {
    let mut h = Harness::with_clips(&[5.0, 3.0, 4.0]);
    let original: Vec<_> = h.doc.project().clips.iter().map(|c| c.id.clone()).collect();

    h.drag(Pos2::new(100.0, CLIP_Y), Pos2::new(400.0, CLIP_Y));
    assert_eq!(h.starts(), vec![0.0, 3.0, 8.0]);

    h.key(Modifiers::CMD, Key::Z);
    let order: Vec<_> = h.doc.project().clips.iter().map(|c| c.id.clone()).collect();
    assert_eq!(order, original);
    assert_eq!(h.starts(), vec![0.0, 5.0, 8.0]);

    h.key(Modifiers::CMD_SHIFT, Key::Z);
    assert_eq!(h.starts(), vec![0.0, 3.0, 8.0]);
}

#[test]
fn trim_then_delete_then_undo() {
    let mut h = Harness::with_clips(&[5.0, 3.0]);
    // Right handle of clip 1 sits at 250 px; pull it back one second.
    h.drag(Pos2::new(248.0, CLIP_Y), Pos2::new(198.0, CLIP_Y));
    assert_eq!(h.starts(), vec![0.0, 4.0]);

    h.send(ControllerInput::PointerDown {
        pos: Pos2::new(250.0, CLIP_Y),
        modifiers: Modifiers::NONE,
    });
    h.send(ControllerInput::PointerUp {
        pos: Pos2::new(250.0, CLIP_Y),
    });
    assert_eq!(h.doc.selection(), &[h.ids[1].clone()]);

    h.key(Modifiers::NONE, Key::Delete);
    assert_eq!(h.doc.project().clips.len(), 1);
    assert_eq!(h.doc.total_duration(), 4.0);

    assert!(h.doc.undo());
    assert_eq!(h.doc.project().clips.len(), 2);
    assert!(h.doc.undo());
    assert_eq!(h.starts(), vec![0.0, 5.0]);
}

#[test]
fn transition_drop_draws_a_badge() {
    let mut h = Harness::with_clips(&[5.0, 3.0]);
    h.send(ControllerInput::Drop {
        pos: Pos2::new(250.0, CLIP_Y),
        payload: DropPayload::Transition(TransitionKind::Fade),
    });

    let transition = h.doc.project().transitions[0].clone();
    assert_eq!(transition.after_clip_index, 0);
    assert_eq!(h.starts()[1], 5.0 - transition.duration);

    let scene = h.scene();
    assert_eq!(scene.badges.len(), 1);
    assert_eq!(scene.badges[0].kind, TransitionKind::Fade);
    assert!(scene.zones[0].occupied);
}

#[test]
fn hidden_layer_keeps_content_but_is_not_drawn() {
    let mut h = Harness::with_clips(&[5.0, 3.0]);
    h.apply(TimelineIntent::AddLayer);
    h.apply(TimelineIntent::ChangeLayer {
        clip_id: h.ids[1].clone(),
        layer: LayerId::new(2),
        position: None,
    });
    assert_eq!(h.scene().clips.len(), 2);

    h.apply(TimelineIntent::ToggleLayerVisibility(LayerId::new(2)));
    let scene = h.scene();
    // the row stays so its header can be shown again
    assert_eq!(scene.lanes.len(), 2);
    assert!(!scene.lanes[1].visible);
    assert_eq!(scene.clips.len(), 1);
    assert_eq!(h.doc.layout().clips().len(), 2);
    assert_eq!(h.doc.total_duration(), 5.0);
}

#[test]
fn playback_runs_to_the_end_and_stops() {
    let mut h = Harness::with_clips(&[2.0, 1.0]);
    h.key(Modifiers::NONE, Key::Space);
    assert!(h.doc.is_playing());
    assert!(h.doc.advance(1.0));
    assert_eq!(h.doc.playhead(), 1.0);
    h.doc.advance(10.0);
    assert_eq!(h.doc.playhead(), 3.0);
    assert!(!h.doc.is_playing());

    h.key(Modifiers::NONE, Key::Home);
    assert_eq!(h.doc.playhead(), 0.0);
}

#[test]
fn dropped_media_survives_save_and_open() {
    let mut h = Harness::with_clips(&[5.0, 3.0]);
    h.send(ControllerInput::Drop {
        pos: Pos2::new(100.0, CLIP_Y),
        payload: DropPayload::Media(MediaPayload::Visual {
            name: "title card".into(),
            url: "media/title.png".into(),
            thumbnail_url: Some("media/title.png".into()),
            kind: ClipKind::Image,
            duration: Some(2.0),
        }),
    });
    assert_eq!(h.doc.project().clips[0].name, "title card");
    assert_eq!(h.starts(), vec![0.0, 2.0, 7.0]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edit.json");
    h.doc.save(&path).unwrap();

    let reopened = TimelineDocument::open(&path, h.doc.config().clone()).unwrap();
    assert_eq!(reopened.project(), h.doc.project());
    let starts: Vec<f64> = reopened.layout().clips().iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![0.0, 2.0, 7.0]);
}
