//! The worked timeline scenarios: sequencing, transition overlap, moving a
//! clip to another layer and the zoom round trip.

use strata_core::{Zoom, BASE_PIXELS_PER_SECOND};
use strata_timeline::{
    Clip, ClipKind, ClipSettings, LayerId, TimelineIntent, Transition, TransitionKind,
};

use crate::harness::Harness;

fn approx(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
    }
}

// ── Sequencing ─────────────────────────────────────────────────

#[test]
fn three_clips_sequence_back_to_back() {
    let h = Harness::with_clips(&[5.0, 3.0, 4.0]);
    assert_eq!(h.doc.total_duration(), 12.0);
    approx(&h.starts(), &[0.0, 5.0, 8.0]);
}

#[test]
fn transition_pulls_following_clips_back() {
    let mut h = Harness::with_clips(&[5.0, 3.0, 4.0]);
    assert!(h.apply(TimelineIntent::AddTransition(Transition::new(
        LayerId::DEFAULT,
        0,
        TransitionKind::Fade,
        1.0,
    ))));
    approx(&h.starts(), &[0.0, 4.0, 7.0]);
    assert!((h.doc.total_duration() - 11.0).abs() < 1e-9);
}

#[test]
fn removing_the_transition_restores_the_sequence() {
    let mut h = Harness::with_clips(&[5.0, 3.0, 4.0]);
    h.apply(TimelineIntent::AddTransition(Transition::new(
        LayerId::DEFAULT,
        1,
        TransitionKind::Dissolve,
        2.0,
    )));
    approx(&h.starts(), &[0.0, 5.0, 6.0]);
    assert!(h.apply(TimelineIntent::RemoveTransition {
        layer: LayerId::DEFAULT,
        after_clip_index: 1,
    }));
    approx(&h.starts(), &[0.0, 5.0, 8.0]);
}

// ── Layers ─────────────────────────────────────────────────────

#[test]
fn moving_a_clip_to_layer_two_resequences_both_layers() {
    let mut h = Harness::with_clips(&[5.0, 3.0, 4.0]);
    assert!(h.apply(TimelineIntent::AddLayer));
    assert!(h.apply(TimelineIntent::ChangeLayer {
        clip_id: h.ids[1].clone(),
        layer: LayerId::new(2),
        position: None,
    }));

    approx(&h.layer_starts(1), &[0.0, 5.0]);
    approx(&h.layer_starts(2), &[0.0]);
    let moved = h.doc.layout().clip(&h.ids[1]).unwrap();
    assert_eq!(moved.layer, LayerId::new(2));
    assert_eq!(h.doc.total_duration(), 9.0);
}

#[test]
fn moving_through_the_canvas_matches_the_intent() {
    let mut h = Harness::with_clips(&[5.0, 3.0, 4.0]);
    h.apply(TimelineIntent::AddLayer);
    // Clip 2 spans 250..400 px; one layer down is 80 px lower.
    h.drag(
        egui::Pos2::new(300.0, crate::harness::CLIP_Y),
        egui::Pos2::new(302.0, crate::harness::CLIP_Y + 80.0),
    );
    approx(&h.layer_starts(1), &[0.0, 5.0]);
    approx(&h.layer_starts(2), &[0.0]);
}

#[test]
fn dragging_onto_a_busy_layer_keeps_the_drop_time() {
    let mut h = Harness::with_clips(&[5.0]);
    h.apply(TimelineIntent::AddLayer);
    for name in ["b", "c"] {
        let clip = Clip::new(name, format!("{name}.mp4"), ClipKind::Video).on_layer(LayerId::new(2));
        h.doc.insert_clip(clip, ClipSettings::for_video(4.0)).unwrap();
    }
    // start dragged from 0 s to 9 s, one row down
    h.drag(
        egui::Pos2::new(100.0, crate::harness::CLIP_Y),
        egui::Pos2::new(550.0, crate::harness::CLIP_Y + 72.0),
    );
    approx(&h.layer_starts(1), &[]);
    approx(&h.layer_starts(2), &[0.0, 4.0, 8.0]);
    let moved = h.doc.layout().clip(&h.ids[0]).unwrap();
    assert_eq!(moved.layer, LayerId::new(2));
    assert!(moved.start >= 8.0);
}

#[test]
fn deleting_the_only_layer_is_rejected() {
    let mut h = Harness::with_clips(&[]);
    assert!(!h.apply(TimelineIntent::RemoveLayer(LayerId::DEFAULT)));
    assert_eq!(h.doc.project().layers.len(), 1);

    h.apply(TimelineIntent::AddLayer);
    assert!(h.apply(TimelineIntent::RemoveLayer(LayerId::new(2))));
    assert!(!h.apply(TimelineIntent::RemoveLayer(LayerId::DEFAULT)));
    assert_eq!(h.doc.project().layers.len(), 1);
}

// ── Zoom ───────────────────────────────────────────────────────

#[test]
fn zoom_round_trip_restores_clip_width() {
    let mut h = Harness::with_clips(&[5.0]);
    for zoom in [0.25, 3.0, 1.0] {
        h.apply(TimelineIntent::SetZoom(Zoom::new(zoom)));
    }
    let width = h.doc.layout().clips()[0].width;
    assert!((width - 5.0 * BASE_PIXELS_PER_SECOND).abs() < 1e-9);
    assert!((width - 250.0).abs() < 1e-9);
}

#[test]
fn zoom_changes_pixels_not_times() {
    let mut h = Harness::with_clips(&[5.0, 3.0]);
    h.apply(TimelineIntent::SetZoom(Zoom::new(2.0)));
    approx(&h.starts(), &[0.0, 5.0]);
    let slot = &h.doc.layout().clips()[1];
    assert!((slot.left - 500.0).abs() < 1e-9);
    assert!((slot.width - 300.0).abs() < 1e-9);
}
