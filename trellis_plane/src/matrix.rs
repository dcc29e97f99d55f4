// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Affine matrix utilities.
//!
//! Matrices are [`kurbo::Affine`] values with coefficients `[a, b, c, d, e, f]`.
//! `m1 * m2` applies `m2` first, and every helper here keeps that order: a
//! chain `[m1, m2, m3]` maps a point through `m3`, then `m2`, then `m1`.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

use crate::log::warn;
use crate::vector::sin_cos;

/// Smallest magnitude a stored scale may take before it is clamped.
///
/// Keeps every composed matrix invertible.
pub const MIN_SCALE: f64 = 1e-4;

/// Determinant magnitude, relative to the squared size of the linear part,
/// under which a matrix is treated as singular.
///
/// Being relative, a uniformly tiny but well-formed matrix still inverts.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Errors produced by matrix operations.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum MatrixError {
    /// The matrix has a (near) zero determinant and cannot be inverted.
    #[error("matrix is singular (determinant {determinant})")]
    Singular {
        /// The offending determinant.
        determinant: f64,
    },
}

/// Multiplies a chain of optional matrices.
///
/// `None` entries are skipped, which lets callers include a factor
/// conditionally. The rightmost matrix applies first.
///
/// ```
/// use kurbo::{Affine, Point, Vec2};
/// use trellis_plane::matrix::multiply;
///
/// let in_viewport = false;
/// let m = multiply([
///     Some(Affine::translate(Vec2::new(10.0, 0.0))),
///     in_viewport.then_some(Affine::scale(2.0)),
///     Some(Affine::scale(3.0)),
/// ]);
/// assert_eq!(m * Point::new(1.0, 1.0), Point::new(13.0, 3.0));
/// ```
pub fn multiply<I>(matrices: I) -> Affine
where
    I: IntoIterator<Item = Option<Affine>>,
{
    matrices
        .into_iter()
        .flatten()
        .fold(Affine::IDENTITY, |acc, m| acc * m)
}

/// Inverts `m`, failing when it is singular.
pub fn try_invert(m: Affine) -> Result<Affine, MatrixError> {
    let [a, b, c, d, ..] = m.as_coeffs();
    let determinant = m.determinant();
    let magnitude = a * a + b * b + c * c + d * d;
    if !determinant.is_finite() || determinant.abs() <= SINGULAR_EPSILON * magnitude {
        return Err(MatrixError::Singular { determinant });
    }
    Ok(m.inverse())
}

/// Inverts `m`, substituting the identity for a singular matrix.
///
/// Geometry queries must always produce an answer; callers that need to know
/// about the degenerate case use [`try_invert`].
pub fn invert(m: Affine) -> Affine {
    match try_invert(m) {
        Ok(inv) => inv,
        Err(_err) => {
            warn!(error = %_err, "inverting a singular matrix, using identity");
            Affine::IDENTITY
        }
    }
}

/// Translation by `(x, y)`.
pub fn translate_matrix(x: f64, y: f64) -> Affine {
    Affine::translate(Vec2::new(x, y))
}

/// Non-uniform scale.
pub fn scale_matrix(x: f64, y: f64) -> Affine {
    Affine::scale_non_uniform(x, y)
}

fn sin_cos_degrees(degrees: f64) -> (f64, f64) {
    let turn = degrees % 360.0;
    let turn = if turn < 0.0 { turn + 360.0 } else { turn };
    if turn == 0.0 {
        (0.0, 1.0)
    } else if turn == 90.0 {
        (1.0, 0.0)
    } else if turn == 180.0 {
        (0.0, -1.0)
    } else if turn == 270.0 {
        (-1.0, 0.0)
    } else {
        sin_cos(degrees.to_radians())
    }
}

/// Rotation by `degrees`, exact at quarter turns.
pub fn rotate_matrix(degrees: f64) -> Affine {
    let (sin, cos) = sin_cos_degrees(degrees);
    Affine::new([cos, sin, -sin, cos, 0.0, 0.0])
}

/// Horizontal skew by `degrees`: `[1, 0, tan, 1, 0, 0]`.
pub fn skew_x_matrix(degrees: f64) -> Affine {
    Affine::new([1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0])
}

/// Vertical skew by `degrees`: `[1, tan, 0, 1, 0, 0]`.
pub fn skew_y_matrix(degrees: f64) -> Affine {
    Affine::new([1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0])
}

/// Shear with factors `x` (horizontal) and `y` (vertical): `[1, y, x, 1, 0, 0]`.
pub fn shear_matrix(x: f64, y: f64) -> Affine {
    Affine::new([1.0, y, x, 1.0, 0.0, 0.0])
}

/// Scalar transform components of an object.
///
/// Angles are in degrees. Flips are kept separate from the scale sign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformComponents {
    /// Horizontal translation.
    pub translate_x: f64,
    /// Vertical translation.
    pub translate_y: f64,
    /// Rotation in degrees.
    pub angle: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
    /// Horizontal skew in degrees.
    pub skew_x: f64,
    /// Vertical skew in degrees.
    pub skew_y: f64,
}

impl Default for TransformComponents {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            flip_x: false,
            flip_y: false,
            skew_x: 0.0,
            skew_y: 0.0,
        }
    }
}

/// The scale, flip and skew part of [`compose`]: `S(±sx, ±sy) · SkX · SkY`.
pub fn dimensions_matrix(c: &TransformComponents) -> Affine {
    let sx = if c.flip_x { -c.scale_x } else { c.scale_x };
    let sy = if c.flip_y { -c.scale_y } else { c.scale_y };
    multiply([
        Some(scale_matrix(sx, sy)),
        (c.skew_x != 0.0).then(|| skew_x_matrix(c.skew_x)),
        (c.skew_y != 0.0).then(|| skew_y_matrix(c.skew_y)),
    ])
}

/// Composes components into `T · R · S(±sx, ±sy) · SkX · SkY`.
pub fn compose(c: &TransformComponents) -> Affine {
    multiply([
        Some(translate_matrix(c.translate_x, c.translate_y)),
        (c.angle != 0.0).then(|| rotate_matrix(c.angle)),
        Some(dimensions_matrix(c)),
    ])
}

/// QR-style decomposition of `m` into components.
///
/// The result never carries a vertical skew or flips: the skew is folded into
/// `skew_x` and a mirrored matrix yields a negative `scale_y`.
/// `compose(&decompose(m))` reproduces `m` up to rounding.
pub fn decompose(m: Affine) -> TransformComponents {
    let [a, b, c, d, e, f] = m.as_coeffs();
    let denom = a * a + b * b;
    let scale_x = denom.sqrt();
    let scale_y = if scale_x == 0.0 {
        0.0
    } else {
        (a * d - c * b) / scale_x
    };
    TransformComponents {
        translate_x: e,
        translate_y: f,
        angle: b.atan2(a).to_degrees(),
        scale_x,
        scale_y,
        flip_x: false,
        flip_y: false,
        skew_x: (a * c + b * d).atan2(denom).to_degrees(),
        skew_y: 0.0,
    }
}

/// Rotation of the plane described by `m`, in radians.
///
/// This is the direction of the transformed x axis and does not go through a
/// full decomposition.
pub fn plane_rotation(m: Affine) -> f64 {
    let [a, b, ..] = m.as_coeffs();
    b.atan2(a)
}

/// Axis-aligned size of a `width × height` box centered on the origin after `m`.
pub fn size_after_transform(width: f64, height: f64, m: Affine) -> Vec2 {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let corners = [
        Point::new(-hw, -hh),
        Point::new(hw, -hh),
        Point::new(-hw, hh),
        Point::new(hw, hh),
    ]
    .map(|p| m * p);
    let rect = crate::intersection::bounding_rect(&corners);
    Vec2::new(rect.width(), rect.height())
}

/// Whether all six coefficients of `a` and `b` are within `epsilon`.
pub fn approx_eq(a: Affine, b: Affine, epsilon: f64) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .all(|(x, y)| (x - y).abs() <= epsilon)
}

/// Whether `m` is exactly the identity.
pub fn is_identity(m: Affine) -> bool {
    m == Affine::IDENTITY
}

/// Clamps a scale factor away from zero.
///
/// Values whose magnitude is under `min_limit`, or under [`MIN_SCALE`] when
/// that is larger, snap to that floor and keep their sign. Zero becomes the
/// positive floor.
pub fn constrain_scale(value: f64, min_limit: f64) -> f64 {
    let floor = min_limit.max(MIN_SCALE);
    if value.abs() >= floor {
        value
    } else if value < 0.0 {
        -floor
    } else {
        floor
    }
}
