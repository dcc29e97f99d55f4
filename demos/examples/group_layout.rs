// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Groups and layout.
//!
//! Nest objects in a rotated fit-content group, move a child, and commit the
//! layout. Children keep their place on the scene while the group refits.
//!
//! Run:
//! - `cargo run -p trellis_demos --example group_layout`

use trellis_scene::{LayoutStrategy, ObjectProps, Plane, Scene, TransformOptions};

fn main() {
    let mut scene = Scene::new();
    let group = scene
        .insert_group(
            None,
            ObjectProps {
                angle: 20.0,
                stroke_width: 0.0,
                ..ObjectProps::new(200.0, 100.0, 0.0, 0.0)
            },
            LayoutStrategy::FitContent,
        )
        .unwrap();
    let a = scene.insert(Some(group), ObjectProps::new(0.0, 0.0, 40.0, 40.0)).unwrap();
    let b = scene.insert(Some(group), ObjectProps::new(60.0, 20.0, 30.0, 50.0)).unwrap();

    let report = scene.commit();
    println!("laid out {:?}, damage {:?}", report.groups, report.union_rect());
    println!("group size: {:?}", scene.props(group).map(|p| (p.width, p.height)));

    // Rotating a child marks its group; nothing is recomputed until commit.
    let before = scene.get_coords(a).unwrap();
    scene.rotate_by(b, 45.0, TransformOptions::default());
    let report = scene.commit();
    println!("laid out {:?}, damage {:?}", report.groups, report.union_rect());
    let after = scene.get_coords(a).unwrap();
    for (p, q) in before.points().into_iter().zip(after.points()) {
        assert!((p - q).hypot() < 1e-9, "siblings keep their place");
    }

    // Boxes can be read in any plane of the chain.
    let bbox = scene.bbox(b).unwrap();
    println!("b in the scene: {:?}", bbox.bounding_rect());
    println!("b in the group: {:?}", bbox.send_to_plane(Plane::PARENT).bounding_rect());

    // Leaving the group keeps the scene position.
    let center = scene.get_center_point(b);
    scene.remove_from_group(b).unwrap();
    println!("b center before {center:?}, after {:?}", scene.get_center_point(b));
    println!("roots: {:?}", scene.roots());
}
