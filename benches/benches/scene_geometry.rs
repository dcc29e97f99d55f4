// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Affine;
use trellis_plane::matrix::{compose, decompose};
use trellis_scene::{Anchor, LayoutStrategy, ObjectId, ObjectProps, Scene, TransformOptions};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn random_props(rng: &mut Rng, extent: f64) -> ObjectProps {
    ObjectProps {
        angle: rng.next_f64() * 360.0,
        scale_x: 0.5 + rng.next_f64(),
        scale_y: 0.5 + rng.next_f64(),
        skew_x: rng.next_f64() * 20.0 - 10.0,
        ..ObjectProps::new(
            rng.next_f64() * extent,
            rng.next_f64() * extent,
            10.0 + rng.next_f64() * 40.0,
            10.0 + rng.next_f64() * 40.0,
        )
    }
}

/// `groups` rotated groups of `per_group` objects each.
fn build_scene(groups: usize, per_group: usize) -> (Scene, Vec<ObjectId>, Vec<ObjectId>) {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut scene = Scene::new();
    let mut roots = Vec::with_capacity(groups);
    let mut leaves = Vec::with_capacity(groups * per_group);
    for _ in 0..groups {
        let group = scene
            .insert_group(None, random_props(&mut rng, 2000.0), LayoutStrategy::Fixed)
            .unwrap();
        roots.push(group);
        for _ in 0..per_group {
            leaves.push(scene.insert(Some(group), random_props(&mut rng, 200.0)).unwrap());
        }
    }
    (scene, roots, leaves)
}

fn bench_boxes(c: &mut Criterion) {
    let mut group = c.benchmark_group("bbox");
    for &(groups, per_group) in &[(10_usize, 10_usize), (50, 20)] {
        let (mut scene, roots, leaves) = build_scene(groups, per_group);
        group.throughput(Throughput::Elements(leaves.len() as u64));

        group.bench_function(format!("cached_{}", leaves.len()), |b| {
            for id in &leaves {
                let _ = scene.get_bounding_rect(*id);
            }
            b.iter(|| {
                for id in &leaves {
                    black_box(scene.get_bounding_rect(*id));
                }
            });
        });

        group.bench_function(format!("invalidated_{}", leaves.len()), |b| {
            b.iter(|| {
                for root in &roots {
                    scene.invalidate_coords(*root);
                }
                for id in &leaves {
                    black_box(scene.get_bounding_rect(*id));
                }
            });
        });
    }
    group.finish();
}

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    let (mut scene, _, leaves) = build_scene(20, 10);
    group.throughput(Throughput::Elements(leaves.len() as u64));

    group.bench_function("rotate_by_around_corner", |b| {
        let options = TransformOptions::around(Anchor::TOP_LEFT);
        b.iter(|| {
            for id in &leaves {
                black_box(scene.rotate_by(*id, 1.0, options));
            }
        });
    });

    group.bench_function("scale_along_edges", |b| {
        let mut grow = true;
        b.iter(|| {
            let s = if grow { 1.01 } else { 1.0 / 1.01 };
            grow = !grow;
            for id in &leaves {
                black_box(scene.scale(*id, s, s, TransformOptions::default()));
            }
        });
    });

    group.bench_function("shear_by_edges", |b| {
        let mut sign = 1.0;
        b.iter(|| {
            sign = -sign;
            for id in &leaves {
                black_box(scene.shear_by(*id, 0.01 * sign, 0.0, TransformOptions::default()));
            }
        });
    });
    group.finish();
}

fn bench_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("predicates");
    let (scene, _, leaves) = build_scene(10, 20);
    let pairs = leaves.len() * leaves.len();
    group.throughput(Throughput::Elements(pairs as u64));
    group.bench_function("intersects_with_object_all_pairs", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for a in &leaves {
                for other in &leaves {
                    hits += usize::from(scene.intersects_with_object(*a, *other));
                }
            }
            black_box(hits)
        });
    });
    group.finish();
}

fn bench_matrices(c: &mut Criterion) {
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    let matrices: Vec<Affine> = (0..1000)
        .map(|_| random_props(&mut rng, 500.0).own_matrix())
        .collect();
    c.bench_function("matrix/decompose_compose_1000", |b| {
        b.iter(|| {
            for m in &matrices {
                black_box(compose(&decompose(*m)));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_boxes,
    bench_transforms,
    bench_predicates,
    bench_matrices
);
criterion_main!(benches);
