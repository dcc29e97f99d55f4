// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene basics.
//!
//! Insert an object, move it by different origins, rotate and skew it, and
//! query its boxes.
//!
//! Run:
//! - `cargo run -p trellis_demos --example scene_basics`

use kurbo::Point;
use trellis_scene::{Anchor, Canvas, ObjectProps, Scene, TransformOptions};

fn main() {
    let mut scene = Scene::new();
    scene.attach_canvas(Canvas::new(640.0, 480.0));

    let card = scene
        .insert(
            None,
            ObjectProps {
                stroke_width: 2.0,
                ..ObjectProps::new(100.0, 80.0, 120.0, 60.0)
            },
        )
        .unwrap();
    println!("bounding rect: {:?}", scene.get_bounding_rect(card));

    // Put the bottom-right corner at (400, 300).
    scene.set_xy(card, Point::new(400.0, 300.0), Some(Anchor::BOTTOM_RIGHT));
    println!("top-left now at: {:?}", scene.get_xy(card, Some(Anchor::TOP_LEFT)));

    // Rotate around the center, then skew along the rotated edges.
    let center = scene.get_center_point(card).unwrap();
    scene.rotate(card, 30.0, TransformOptions::around(Anchor::CENTER));
    scene.skew(card, 15.0, 0.0, TransformOptions::around(Anchor::CENTER));
    let moved = scene.get_center_point(card).unwrap();
    assert!((moved - center).hypot() < 1e-9, "the center stays fixed");

    let props = scene.props(card).unwrap();
    println!(
        "angle {:.3}° skew_x {:.3}° scale ({:.3}, {:.3})",
        props.angle, props.skew_x, props.scale_x, props.scale_y
    );
    println!("corners: {:?}", scene.get_coords(card).map(|c| c.points()));
    println!("on screen: {:?}", scene.is_on_screen(card));

    // Zoom the viewport; scene geometry is unchanged, viewport geometry doubles.
    scene.set_zoom(2.0);
    println!("viewport corners: {:?}", scene.get_viewport_coords(card).map(|c| c.points()));
    println!("partially on screen: {:?}", scene.is_partially_on_screen(card));
}
