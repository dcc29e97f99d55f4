// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vector helpers on top of [`kurbo::Vec2`] and [`kurbo::Point`].
//!
//! Kurbo already covers arithmetic, `dot`, `cross`, `hypot` and `atan2`.
//! What lives here are the rotations and normalizations the plane code needs,
//! with exact results at quarter turns so that axis-aligned geometry stays
//! axis-aligned.

use core::f64::consts::FRAC_PI_2;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// Sine and cosine of `radians`, snapped to exact values at multiples of a quarter turn.
pub fn sin_cos(radians: f64) -> (f64, f64) {
    let quarters = radians / FRAC_PI_2;
    if quarters == quarters.trunc() {
        let q = quarters % 4.0;
        let q = if q < 0.0 { q + 4.0 } else { q };
        if q == 0.0 {
            return (0.0, 1.0);
        } else if q == 1.0 {
            return (1.0, 0.0);
        } else if q == 2.0 {
            return (0.0, -1.0);
        } else if q == 3.0 {
            return (-1.0, 0.0);
        }
    }
    (radians.sin(), radians.cos())
}

/// Rotates `v` by `radians` (clockwise on screen, since y points down).
pub fn rotate_vector(v: Vec2, radians: f64) -> Vec2 {
    let (sin, cos) = sin_cos(radians);
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Rotates `p` by `radians` around `origin`.
pub fn rotate_point(p: Point, origin: Point, radians: f64) -> Point {
    origin + rotate_vector(p - origin, radians)
}

/// Returns `v` scaled to unit length, or [`Vec2::ZERO`] for a zero vector.
pub fn unit_vector(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len == 0.0 { Vec2::ZERO } else { v / len }
}

/// Unit vector perpendicular to `v`.
///
/// With `counter_clockwise` the result is `(-v.y, v.x)` normalized, a quarter
/// turn in the positive angle direction; otherwise its negation.
pub fn orthonormal_vector(v: Vec2, counter_clockwise: bool) -> Vec2 {
    let n = Vec2::new(-v.y, v.x);
    unit_vector(if counter_clockwise { n } else { -n })
}

/// Signed angle in radians that turns `a` onto `b`.
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    a.cross(b).atan2(a.dot(b))
}

/// Direction of `v` in radians, measured from the positive x axis.
pub fn vector_rotation(v: Vec2) -> f64 {
    v.y.atan2(v.x)
}

/// Whether `t` lies in the sector swept counter-clockwise from `a` to `b`.
///
/// Both bounding vectors are inside. When `a` to `b` turns clockwise the
/// sector is the reflex one, the complement of the clockwise turn.
pub fn is_between_vectors(t: Vec2, a: Vec2, b: Vec2) -> bool {
    if t == a || t == b {
        return true;
    }
    let a_b = a.cross(b);
    let a_t = a.cross(t);
    let b_t = b.cross(t);
    if a_b >= 0.0 {
        a_t >= 0.0 && b_t <= 0.0
    } else {
        !(a_t <= 0.0 && b_t >= 0.0)
    }
}
