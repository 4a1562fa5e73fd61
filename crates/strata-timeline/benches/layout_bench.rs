//! Benchmarks for the layout engine.
//!
//! Run with: cargo bench -p strata-timeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strata_core::TimeScale;
use strata_timeline::{
    Clip, ClipKind, ClipSettings, LayerId, LayoutMode, Project, Transition, TransitionKind,
};

fn project(clips: usize, layers: u32) -> Project {
    let mut project = Project::new("bench");
    for i in 0..clips {
        let layer = LayerId::new(i as u32 % layers + 1);
        let clip = Clip::new(format!("clip {i}"), format!("media/{i}.mp4"), ClipKind::Video)
            .on_layer(layer);
        project
            .settings
            .insert(clip.id.clone(), ClipSettings::for_video(2.0 + (i % 7) as f64));
        project.clips.push(clip);
    }
    for layer in 1..=layers {
        for after in (0..clips / layers as usize).step_by(3) {
            project.transitions.push(Transition::new(
                LayerId::new(layer),
                after,
                TransitionKind::Dissolve,
                0.5,
            ));
        }
    }
    project.normalize(10, 0.1);
    project
}

fn bench_snap_layout(c: &mut Criterion) {
    let project = project(500, 4);
    let scale = TimeScale::default();

    c.bench_function("layout_snap_500_clips", |bencher| {
        bencher.iter(|| black_box(&project).layout(&scale));
    });
}

fn bench_free_layout(c: &mut Criterion) {
    let mut project = project(500, 4);
    project.mode = LayoutMode::Free;
    for (i, settings) in project.settings.values_mut().enumerate() {
        if i % 2 == 0 {
            settings.position_seconds = Some(i as f64);
        }
    }
    let scale = TimeScale::default();

    c.bench_function("layout_free_500_clips", |bencher| {
        bencher.iter(|| black_box(&project).layout(&scale));
    });
}

criterion_group!(benches, bench_snap_layout, bench_free_layout);
criterion_main!(benches);
