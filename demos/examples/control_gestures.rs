// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controls and gestures.
//!
//! Find the handle under a pointer, drag it, and customize one object's
//! controls without touching the shared defaults.
//!
//! Run:
//! - `cargo run -p trellis_demos --example control_gestures`

use kurbo::{Point, Vec2};
use trellis_scene::{Canvas, ControlAction, ControlKey, ObjectFlags, ObjectProps, Scene};

fn main() {
    let mut scene = Scene::new();
    scene.attach_canvas(Canvas::new(800.0, 600.0));
    let photo = scene
        .insert(
            None,
            ObjectProps {
                stroke_width: 0.0,
                ..ObjectProps::new(150.0, 150.0, 100.0, 100.0)
            },
        )
        .unwrap();
    scene.set_active_object(Some(photo));

    for (key, coord) in scene.get_control_coords(photo).unwrap().iter() {
        println!("{key:>3} at {:?}", coord.position);
    }

    // Pointer down on the bottom-right handle, then drag it.
    let down = Point::new(250.0, 250.0);
    let found = scene.find_control(photo, down, false).expect("handle under pointer");
    println!("pressed {} ({})", found.key, found.control.action.action_name());
    let gesture = scene.begin_gesture(photo, found.key, down).unwrap();
    for step in 1..=4 {
        let pointer = down + Vec2::new(25.0, 25.0) * f64::from(step);
        scene.apply_gesture(&gesture, pointer);
        println!("scale {:.2}", scene.props(photo).unwrap().scale_x);
    }

    // Rotation handle, with rotation locked.
    scene.set_flags(photo, ObjectFlags::default() | ObjectFlags::LOCK_ROTATION);
    let mtr = scene.get_control_coords(photo).unwrap().get(&ControlKey::MTR).unwrap().position;
    let gesture = scene.begin_gesture(photo, ControlKey::MTR, mtr).unwrap();
    let changed = scene.apply_gesture(&gesture, mtr + Vec2::new(80.0, 0.0));
    println!("rotation locked, changed: {changed}");

    // Turn the top handle of this object into a skew handle.
    scene.customize_control(photo, &ControlKey::MT, |c| c.action = ControlAction::SkewX);
    let mt = scene.get_control_coords(photo).unwrap().get(&ControlKey::MT).unwrap().position;
    let gesture = scene.begin_gesture(photo, ControlKey::MT, mt).unwrap();
    scene.apply_gesture(&gesture, mt + Vec2::new(40.0, 0.0));
    println!("skew_x {:.2}°", scene.props(photo).unwrap().skew_x);
    println!(
        "defaults untouched: {:?}",
        scene.config().controls.get(&ControlKey::MT).map(|c| c.action)
    );
}
