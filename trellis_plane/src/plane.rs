// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plane change.
//!
//! A plane is described by the matrix that maps it into the scene plane.
//! `None` stands for the scene plane itself. Moving a point from plane `from`
//! to plane `to` multiplies it by `inverse(to) · from`.

use kurbo::{Affine, Point, Vec2};

use crate::matrix::{invert, multiply, try_invert};

/// Matrix re-expressing coordinates of plane `from` in plane `to`.
pub fn plane_change_matrix(from: Option<Affine>, to: Option<Affine>) -> Affine {
    multiply([to.map(invert), from])
}

/// Re-expresses `point` from plane `from` in plane `to`.
///
/// ```
/// use kurbo::{Affine, Point, Vec2};
/// use trellis_plane::plane::send_point_to_plane;
///
/// let group = Affine::translate(Vec2::new(100.0, 0.0)) * Affine::scale(2.0);
/// // A scene point expressed in the group's plane, and back.
/// let local = send_point_to_plane(Point::new(120.0, 10.0), None, Some(group));
/// assert_eq!(local, Point::new(10.0, 5.0));
/// assert_eq!(send_point_to_plane(local, Some(group), None), Point::new(120.0, 10.0));
/// ```
pub fn send_point_to_plane(point: Point, from: Option<Affine>, to: Option<Affine>) -> Point {
    if from.is_none() && to.is_none() {
        return point;
    }
    plane_change_matrix(from, to) * point
}

/// Re-expresses a direction vector; translations do not apply.
pub fn send_vector_to_plane(v: Vec2, from: Option<Affine>, to: Option<Affine>) -> Vec2 {
    transform_vector(plane_change_matrix(from, to), v)
}

/// Linear part of `m` applied to `v`.
pub fn transform_vector(m: Affine, v: Vec2) -> Vec2 {
    let [a, b, c, d, ..] = m.as_coeffs();
    Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
}

/// Linear map sending the basis `from` onto the basis `to`.
///
/// The bases need not be orthogonal. A degenerate `from` basis yields the
/// identity.
pub fn base_change_matrix(from: [Vec2; 2], to: [Vec2; 2]) -> Affine {
    let source = Affine::new([from[0].x, from[0].y, from[1].x, from[1].y, 0.0, 0.0]);
    let target = Affine::new([to[0].x, to[0].y, to[1].x, to[1].y, 0.0, 0.0]);
    match try_invert(source) {
        Ok(inv) => target * inv,
        Err(_) => Affine::IDENTITY,
    }
}
