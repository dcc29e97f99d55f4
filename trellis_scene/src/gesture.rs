// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gestures driven by controls.
//!
//! A [`Gesture`] remembers the object's own-to-scene matrix when the pointer
//! went down. Every [`Scene::apply_gesture`] derives the new matrix from that
//! start and the whole pointer displacement, so rounding never accumulates
//! and a layout of the object's groups in between does not shift the result.

use kurbo::{Affine, Point, Vec2};
use trellis_controls::{ControlAction, ControlKey};
use trellis_plane::BBox;
use trellis_plane::matrix::{rotate_matrix, scale_matrix, translate_matrix};
use trellis_plane::plane::{base_change_matrix, transform_vector};
use trellis_plane::vector::{rotate_vector, unit_vector, vector_rotation};

use crate::log::debug;
use crate::scene::Scene;
use crate::types::{Anchor, ObjectFlags, ObjectId};

/// Smallest pointer distance from the anchor that still yields a scale or skew.
const MIN_LEVER: f64 = 1e-6;

/// What a gesture does to its object.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureKind {
    /// Moving the whole object.
    Drag,
    /// Dragging one of the object's controls.
    Control(ControlKey, ControlAction),
}

/// An in-progress pointer interaction with one object.
#[derive(Clone, Debug)]
pub struct Gesture {
    target: ObjectId,
    kind: GestureKind,
    anchor: Anchor,
    start: Affine,
    pointer: Point,
}

impl Gesture {
    /// The object being manipulated.
    pub fn target(&self) -> ObjectId {
        self.target
    }

    /// What the gesture does.
    pub fn kind(&self) -> &GestureKind {
        &self.kind
    }

    /// The point of the object that stays fixed.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// The object's own-to-scene matrix when the gesture began.
    pub fn start(&self) -> Affine {
        self.start
    }
}

impl Scene {
    /// Start dragging control `key` of `id` from `pointer`, in viewport coordinates.
    ///
    /// Scaling and skewing keep the point opposite the control fixed, rotation
    /// keeps the center fixed. Returns `None` for stale ids, unknown keys and
    /// controls without an action. The control becomes the object's active one.
    pub fn begin_gesture(&mut self, id: ObjectId, key: ControlKey, pointer: Point) -> Option<Gesture> {
        let control = self.controls(id)?.get(&key)?.clone();
        let anchor = match control.action {
            ControlAction::None => {
                debug!(?id, %key, "control has no action");
                return None;
            }
            ControlAction::Rotate => Anchor::CENTER,
            _ => Anchor::from_offset(Point::new(-control.x, -control.y)),
        };
        let start = self.calc_transform_matrix(id)?;
        self.set_active_control(id, Some(key.clone()));
        Some(Gesture {
            target: id,
            kind: GestureKind::Control(key, control.action),
            anchor,
            start,
            pointer,
        })
    }

    /// Start moving `id` with the pointer at `pointer`, in viewport coordinates.
    pub fn begin_drag(&mut self, id: ObjectId, pointer: Point) -> Option<Gesture> {
        Some(Gesture {
            target: id,
            kind: GestureKind::Drag,
            anchor: Anchor::CENTER,
            start: self.calc_transform_matrix(id)?,
            pointer,
        })
    }

    /// Update `gesture` for the pointer now at `pointer`, in viewport coordinates.
    ///
    /// A locked action leaves the object as it was when the gesture began.
    /// Returns whether the object's transform differs from before the call;
    /// when it does not, nothing is invalidated and no layout is requested.
    pub fn apply_gesture(&mut self, gesture: &Gesture, pointer: Point) -> bool {
        let id = gesture.target;
        let Some(flags) = self.flags(id) else {
            return false;
        };
        let Some(bbox) = self.bbox_for_transform(id, gesture.start) else {
            return false;
        };
        let start = self.viewport_transform() * gesture.start;
        let bbox = bbox.send_to_viewport();
        let pivot = bbox.point_from_origin(gesture.anchor.offset());
        let m = match &gesture.kind {
            GestureKind::Drag => {
                let mut delta = pointer - gesture.pointer;
                if flags.contains(ObjectFlags::LOCK_MOVEMENT_X) {
                    delta.x = 0.0;
                }
                if flags.contains(ObjectFlags::LOCK_MOVEMENT_Y) {
                    delta.y = 0.0;
                }
                translate_matrix(delta.x, delta.y)
            }
            GestureKind::Control(_, action) => control_action_matrix(
                *action,
                flags,
                &bbox,
                start,
                pivot,
                gesture.pointer,
                pointer,
            ),
        };
        let target = translate_matrix(pivot.x, pivot.y)
            * m
            * translate_matrix(-pivot.x, -pivot.y)
            * start;
        self.set_object_transform(id, target, true)
    }
}

/// The viewport-plane matrix a control applies around `pivot` while the
/// pointer moves from `from` to `to`; the identity when the action is locked.
fn control_action_matrix(
    action: ControlAction,
    flags: ObjectFlags,
    bbox: &BBox,
    start: Affine,
    pivot: Point,
    from: Point,
    to: Point,
) -> Affine {
    match action {
        ControlAction::Rotate => {
            if flags.contains(ObjectFlags::LOCK_ROTATION) {
                return Affine::IDENTITY;
            }
            let delta = vector_rotation(to - pivot) - vector_rotation(from - pivot);
            rotate_matrix(delta.to_degrees())
        }
        ControlAction::ScaleEqually | ControlAction::ScaleX | ControlAction::ScaleY => {
            let theta = bbox.get_rotation();
            let start = rotate_vector(from - pivot, -theta);
            let now = rotate_vector(to - pivot, -theta);
            let ratio = |now: f64, start: f64| {
                if start.abs() < MIN_LEVER { 1.0 } else { now / start }
            };
            let (mut sx, mut sy) = match action {
                ControlAction::ScaleX => (ratio(now.x, start.x), 1.0),
                ControlAction::ScaleY => (1.0, ratio(now.y, start.y)),
                _ => {
                    let s = ratio(now.hypot(), start.hypot());
                    (s, s)
                }
            };
            if flags.contains(ObjectFlags::LOCK_SCALING_FLIP) && (sx < 0.0 || sy < 0.0) {
                debug!("scaling flip is locked");
                return Affine::IDENTITY;
            }
            if flags.contains(ObjectFlags::LOCK_SCALING_X) {
                sx = 1.0;
            }
            if flags.contains(ObjectFlags::LOCK_SCALING_Y) {
                sy = 1.0;
            }
            let degrees = theta.to_degrees();
            rotate_matrix(degrees) * scale_matrix(sx, sy) * rotate_matrix(-degrees)
        }
        ControlAction::SkewX | ControlAction::SkewY => {
            // Coordinates along the object's visible edges.
            let u1 = unit_vector(transform_vector(start, Vec2::new(1.0, 0.0)));
            let u2 = unit_vector(transform_vector(start, Vec2::new(0.0, 1.0)));
            let to_edges = base_change_matrix([u1, u2], [Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);
            let from = transform_vector(to_edges, from - pivot);
            let now = transform_vector(to_edges, to - pivot);
            let (x, y) = if action == ControlAction::SkewX {
                if flags.contains(ObjectFlags::LOCK_SKEWING_X) || from.y.abs() < MIN_LEVER {
                    return Affine::IDENTITY;
                }
                ((now.x - from.x) / from.y, 0.0)
            } else {
                if flags.contains(ObjectFlags::LOCK_SKEWING_Y) || from.x.abs() < MIN_LEVER {
                    return Affine::IDENTITY;
                }
                (0.0, (now.y - from.y) / from.x)
            };
            base_change_matrix([u1, u2], [u1 + u2 * y, u1 * x + u2])
        }
        ControlAction::None => Affine::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::ObjectProps;
    use crate::types::{Canvas, LayoutStrategy, OriginX, OriginY};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-7, "{a} != {b}");
    }

    fn assert_pt(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-7, "{a:?} != {b:?}");
    }

    fn square(scene: &mut Scene) -> ObjectId {
        scene
            .insert(
                None,
                ObjectProps {
                    stroke_width: 0.0,
                    ..ObjectProps::new(0.0, 0.0, 100.0, 100.0)
                },
            )
            .unwrap()
    }

    #[test]
    fn drag_uses_viewport_units_and_locks() {
        let mut scene = Scene::new();
        scene.attach_canvas(Canvas::default().with_viewport_transform(kurbo::Affine::scale(2.0)));
        let id = square(&mut scene);
        let drag = scene.begin_drag(id, Point::new(0.0, 0.0)).unwrap();
        assert!(scene.apply_gesture(&drag, Point::new(10.0, 4.0)));
        assert!(scene.apply_gesture(&drag, Point::new(20.0, 10.0)));
        let props = scene.props(id).unwrap();
        assert_close(props.left, 10.0);
        assert_close(props.top, 5.0);
        assert!(!scene.apply_gesture(&drag, Point::new(20.0, 10.0)), "same pointer");

        scene.set_flags(id, ObjectFlags::default() | ObjectFlags::LOCK_MOVEMENT_X);
        let drag = scene.begin_drag(id, Point::new(0.0, 0.0)).unwrap();
        assert!(scene.apply_gesture(&drag, Point::new(20.0, 20.0)));
        let props = scene.props(id).unwrap();
        assert_close(props.left, 10.0);
        assert_close(props.top, 15.0);
    }

    #[test]
    fn rotation_handle_turns_around_the_center() {
        let mut scene = Scene::new();
        let id = square(&mut scene);
        let gesture = scene
            .begin_gesture(id, ControlKey::MTR, Point::new(50.0, 10.0))
            .unwrap();
        assert_eq!(scene.get_active_control(id), Some(&ControlKey::MTR));
        assert!(scene.apply_gesture(&gesture, Point::new(90.0, 50.0)));
        assert_close(scene.props(id).unwrap().angle, 90.0);
        assert_pt(scene.get_center_point(id).unwrap(), Point::new(50.0, 50.0));

        scene.set_flags(id, ObjectFlags::default() | ObjectFlags::LOCK_ROTATION);
        let gesture = scene
            .begin_gesture(id, ControlKey::MTR, Point::new(50.0, 10.0))
            .unwrap();
        assert!(!scene.apply_gesture(&gesture, Point::new(10.0, 50.0)));
    }

    #[test]
    fn corner_scales_about_the_opposite_corner() {
        let mut scene = Scene::new();
        let id = square(&mut scene);
        let gesture = scene
            .begin_gesture(id, ControlKey::BR, Point::new(100.0, 100.0))
            .unwrap();
        assert_eq!(gesture.anchor().offset(), Point::new(-0.5, -0.5));
        assert!(scene.apply_gesture(&gesture, Point::new(200.0, 200.0)));
        let props = scene.props(id).unwrap();
        assert_close(props.scale_x, 2.0);
        assert_close(props.scale_y, 2.0);
        assert_pt(scene.get_xy(id, Some(Anchor::TOP_LEFT)).unwrap(), Point::ZERO);
        assert!(scene.apply_gesture(&gesture, Point::new(100.0, 100.0)));
        assert_close(scene.props(id).unwrap().scale_x, 1.0);
    }

    #[test]
    fn edge_scales_one_axis_and_may_flip() {
        let mut scene = Scene::new();
        let id = square(&mut scene);
        let gesture = scene
            .begin_gesture(id, ControlKey::MR, Point::new(100.0, 50.0))
            .unwrap();
        assert!(scene.apply_gesture(&gesture, Point::new(150.0, 80.0)));
        let props = scene.props(id).unwrap();
        assert_close(props.scale_x, 1.5);
        assert_close(props.scale_y, 1.0);

        assert!(scene.apply_gesture(&gesture, Point::new(-50.0, 50.0)));
        let r = scene.get_bounding_rect(id).unwrap();
        assert_close(r.x0, -50.0);
        assert_close(r.x1, 0.0);
    }

    #[test]
    fn scaling_flip_and_axis_locks() {
        let mut scene = Scene::new();
        let id = square(&mut scene);
        scene.set_flags(id, ObjectFlags::default() | ObjectFlags::LOCK_SCALING_FLIP);
        let gesture = scene
            .begin_gesture(id, ControlKey::MR, Point::new(100.0, 50.0))
            .unwrap();
        assert!(!scene.apply_gesture(&gesture, Point::new(-50.0, 50.0)));
        assert_close(scene.props(id).unwrap().scale_x, 1.0);

        scene.set_flags(id, ObjectFlags::default() | ObjectFlags::LOCK_SCALING_X);
        let gesture = scene
            .begin_gesture(id, ControlKey::BR, Point::new(100.0, 100.0))
            .unwrap();
        assert!(scene.apply_gesture(&gesture, Point::new(200.0, 200.0)));
        let props = scene.props(id).unwrap();
        assert_close(props.scale_x, 1.0);
        assert_close(props.scale_y, 2.0);
    }

    #[test]
    fn skew_control_keeps_the_opposite_edge() {
        let mut scene = Scene::new();
        let id = square(&mut scene);
        assert!(scene.customize_control(id, &ControlKey::MT, |c| c.action = ControlAction::SkewX));
        let gesture = scene
            .begin_gesture(id, ControlKey::MT, Point::new(50.0, 0.0))
            .unwrap();
        let bottom = Anchor::new(OriginX::Center, OriginY::Bottom);
        assert_eq!(gesture.anchor().offset(), bottom.offset());
        assert!(scene.apply_gesture(&gesture, Point::new(100.0, 0.0)));
        assert_close(scene.props(id).unwrap().skew_x, (-0.5_f64).atan().to_degrees());
        let total = scene.calc_transform_matrix(id).unwrap();
        assert_pt(total * Point::new(-50.0, -50.0), Point::new(50.0, 0.0));
        assert_pt(total * Point::new(-50.0, 50.0), Point::new(0.0, 100.0));
        let r = scene.get_bounding_rect(id).unwrap();
        assert_close(r.x0, 0.0);
        assert_close(r.x1, 150.0);

        scene.set_flags(id, ObjectFlags::default() | ObjectFlags::LOCK_SKEWING_X);
        assert!(scene.apply_gesture(&gesture, Point::new(100.0, 0.0)), "restores the start");
        assert_close(scene.props(id).unwrap().skew_x, 0.0);
    }

    #[test]
    fn replay_after_group_layout_is_stable() {
        let mut scene = Scene::new();
        let group = scene
            .insert_group(
                None,
                ObjectProps {
                    stroke_width: 0.0,
                    ..ObjectProps::default()
                },
                LayoutStrategy::FitContent,
            )
            .unwrap();
        let id = scene
            .insert(
                Some(group),
                ObjectProps {
                    stroke_width: 0.0,
                    ..ObjectProps::new(100.0, 100.0, 50.0, 50.0)
                },
            )
            .unwrap();
        scene.commit();

        let gesture = scene
            .begin_gesture(id, ControlKey::BR, Point::new(150.0, 150.0))
            .unwrap();
        assert!(scene.apply_gesture(&gesture, Point::new(200.0, 200.0)));
        let coords = scene.get_coords(id).unwrap();
        assert_pt(coords.tl, Point::new(100.0, 100.0));
        assert_pt(coords.br, Point::new(200.0, 200.0));
        assert_eq!(scene.commit().groups, [group]);

        let stamp = scene.geometry_stamp(id);
        assert!(!scene.apply_gesture(&gesture, Point::new(200.0, 200.0)));
        assert_eq!(scene.geometry_stamp(id), stamp);
        assert!(scene.pending_layouts().is_empty());
        let replayed = scene.get_coords(id).unwrap();
        assert_pt(replayed.tl, coords.tl);
        assert_pt(replayed.br, coords.br);

        assert!(scene.apply_gesture(&gesture, Point::new(250.0, 250.0)));
        let coords = scene.get_coords(id).unwrap();
        assert_pt(coords.tl, Point::new(100.0, 100.0));
        assert_pt(coords.br, Point::new(250.0, 250.0));
    }

    #[test]
    fn controls_without_action_do_not_start() {
        let mut scene = Scene::new();
        let id = square(&mut scene);
        scene.customize_control(id, &ControlKey::TL, |c| c.action = ControlAction::None);
        assert!(scene.begin_gesture(id, ControlKey::TL, Point::ZERO).is_none());
        assert!(scene.begin_gesture(id, ControlKey::new("missing"), Point::ZERO).is_none());
    }
}
