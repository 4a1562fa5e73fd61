//! Property tests over the document, layout engine and controller together.

use egui::Pos2;
use proptest::prelude::*;
use strata_core::{TimeScale, Zoom};
use strata_timeline::{
    find_transition, Clip, ClipKind, ClipSettings, LayerId, TimelineDocument, TimelineIntent,
    Transition, TransitionKind,
};

use crate::harness::{Harness, CLIP_Y};

const EPS: f64 = 0.1;
const TOLERANCE: f64 = 1e-9;

proptest! {
    #[test]
    fn snap_mode_starts_respect_overlaps(
        durations in prop::collection::vec(0.5f64..10.0, 1..6),
        transitions in prop::collection::vec((0usize..5, 0.1f64..6.0), 0..4),
    ) {
        let mut h = Harness::with_clips(&durations);
        for (index, duration) in transitions {
            h.apply(TimelineIntent::AddTransition(Transition::new(
                LayerId::DEFAULT,
                index,
                TransitionKind::Dissolve,
                duration,
            )));
        }

        let layout = h.doc.layout();
        let slots = layout.clips();
        let stored = &h.doc.project().transitions;
        for i in 1..slots.len() {
            let overlap = find_transition(stored, LayerId::DEFAULT, i - 1)
                .map(|t| t.overlap())
                .unwrap_or(0.0);
            let prev = &slots[i - 1];
            prop_assert!(slots[i].start >= prev.start - TOLERANCE);
            prop_assert!(slots[i].start >= prev.start + prev.duration - overlap - TOLERANCE);
        }
    }

    #[test]
    fn time_pixel_round_trip(t in 0.0f64..3600.0, step in 0u32..=11) {
        let zoom = Zoom::new(Zoom::MIN + f64::from(step) * Zoom::STEP);
        let scale = TimeScale::new(zoom);
        let back = scale.pixels_to_time(scale.time_to_pixels(t), 3600.0);
        prop_assert!((back - t).abs() <= TOLERANCE * t.max(1.0));
    }

    #[test]
    fn trim_drags_never_invert(dx in -800.0f32..800.0, left in any::<bool>()) {
        let mut h = Harness::with_clips(&[10.0]);
        // The clip spans 0..500 px at zoom 1.
        let x = if left { 2.0 } else { 498.0 };
        h.drag(Pos2::new(x, CLIP_Y), Pos2::new(x + dx, CLIP_Y));

        let resolved = h.doc.resolved(&h.ids[0]).unwrap();
        prop_assert!(resolved.trim_start >= 0.0);
        prop_assert!(resolved.trim_start < resolved.trim_end);
        prop_assert!(resolved.trim_end - resolved.trim_start >= EPS - TOLERANCE);
        prop_assert!(resolved.trim_end <= 10.0);
    }

    #[test]
    fn split_partitions_the_trim_range(
        duration in 4.0f64..20.0,
        fraction in 0.1f64..0.9,
        speed in 0.5f64..2.0,
    ) {
        let mut doc = TimelineDocument::default();
        let clip = Clip::new("source", "source.mp4", ClipKind::Video);
        let id = clip.id.clone();
        let settings = ClipSettings {
            speed,
            ..ClipSettings::for_video(duration)
        };
        doc.insert_clip(clip, settings).unwrap();
        let before = doc.resolved(&id).unwrap();

        let at = duration * fraction;
        let split = doc.apply(TimelineIntent::Split { clip_id: id.clone(), at });
        prop_assert!(split);

        let clips = &doc.project().clips;
        prop_assert_eq!(clips.len(), 2);
        let head = doc.resolved(&clips[0].id).unwrap();
        let tail = doc.resolved(&clips[1].id).unwrap();
        prop_assert!((head.trim_start - before.trim_start).abs() < TOLERANCE);
        prop_assert!((head.trim_end - at).abs() < TOLERANCE);
        prop_assert!((tail.trim_start - at).abs() < TOLERANCE);
        prop_assert!((tail.trim_end - before.trim_end).abs() < TOLERANCE);
        prop_assert!((head.duration + tail.duration - before.duration).abs() < 1e-6);
    }
}
