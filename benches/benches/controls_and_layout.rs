// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use trellis_scene::{Canvas, ControlKey, LayoutStrategy, ObjectId, ObjectProps, Scene};

fn active_square(angle: f64) -> (Scene, ObjectId) {
    let mut scene = Scene::new();
    scene.attach_canvas(Canvas::new(1000.0, 1000.0));
    let id = scene
        .insert(
            None,
            ObjectProps {
                angle,
                ..ObjectProps::new(400.0, 400.0, 200.0, 120.0)
            },
        )
        .unwrap();
    scene.set_active_object(Some(id));
    (scene, id)
}

fn bench_find_control(c: &mut Criterion) {
    let mut group = c.benchmark_group("controls");
    let (scene, id) = active_square(30.0);
    let pointers: Vec<Point> = (0..64)
        .flat_map(|y| (0..64).map(move |x| Point::new(350.0 + x as f64 * 5.0, 350.0 + y as f64 * 5.0)))
        .collect();

    group.bench_function("find_control_4096_pointers", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for p in &pointers {
                hits += usize::from(scene.find_control(id, *p, false).is_some());
            }
            black_box(hits)
        });
    });

    group.bench_function("control_coords_recompute", |b| {
        let (mut scene, id) = active_square(30.0);
        b.iter(|| {
            scene.invalidate_coords(id);
            black_box(scene.get_control_coords(id))
        });
    });
    group.finish();
}

fn bench_gestures(c: &mut Criterion) {
    let (mut scene, id) = active_square(15.0);
    let start = scene.get_control_coords(id).unwrap().get(&ControlKey::BR).unwrap().position;
    let gesture = scene.begin_gesture(id, ControlKey::BR, start).unwrap();
    c.bench_function("gesture/scale_drag_100_moves", |b| {
        b.iter(|| {
            for step in 0..100 {
                let t = f64::from(step);
                black_box(scene.apply_gesture(&gesture, start + kurbo::Vec2::new(t, t * 0.5)));
            }
        });
    });
}

fn fit_groups(groups: usize, per_group: usize) -> (Scene, Vec<ObjectId>) {
    let mut scene = Scene::new();
    let mut leaves = Vec::new();
    for g in 0..groups {
        let group = scene
            .insert_group(None, ObjectProps::default(), LayoutStrategy::FitContent)
            .unwrap();
        for i in 0..per_group {
            let offset = (g * per_group + i) as f64;
            leaves.push(
                scene
                    .insert(Some(group), ObjectProps::new(offset, offset * 0.5, 20.0, 20.0))
                    .unwrap(),
            );
        }
    }
    let _ = scene.commit();
    (scene, leaves)
}

fn bench_layout(c: &mut Criterion) {
    c.bench_function("layout/commit_after_moving_every_child", |b| {
        b.iter_batched(
            || fit_groups(20, 20),
            |(mut scene, leaves)| {
                for id in &leaves {
                    scene.translate(*id, 3.0, -2.0, false);
                }
                black_box(scene.commit())
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_find_control, bench_gestures, bench_layout);
criterion_main!(benches);
