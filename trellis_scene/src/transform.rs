// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor-preserving transforms expressed in the scene or viewport plane.
//!
//! Every operation builds a matrix and hands it to [`Scene::transform_object`],
//! which applies it around an anchor of the object's box and writes the result
//! back into the object's properties.

use kurbo::{Affine, Vec2};
use trellis_plane::matrix::{
    approx_eq, invert, multiply, rotate_matrix, scale_matrix, shear_matrix, translate_matrix,
    try_invert,
};
use trellis_plane::plane::{base_change_matrix, transform_vector};
use trellis_plane::vector::{sin_cos, unit_vector};
use trellis_plane::BBox;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::log::{debug, warn};
use crate::scene::Scene;
use crate::types::{Axis, ObjectId, SavedTransform, TransformOptions};

fn rotation(radians: f64) -> Affine {
    let (sin, cos) = sin_cos(radians);
    Affine::new([cos, sin, -sin, cos, 0.0, 0.0])
}

impl Scene {
    fn working_plane(&self, in_viewport: bool) -> Option<Affine> {
        in_viewport.then(|| self.viewport_transform())
    }

    fn working_bbox(&self, id: ObjectId, in_viewport: bool) -> Option<BBox> {
        let bbox = self.bbox(id)?;
        Some(if in_viewport { bbox.send_to_viewport() } else { bbox })
    }

    /// Apply `transform` to `id` around an anchor of its box.
    ///
    /// `transform` is expressed in the scene plane, or in the viewport plane
    /// with [`TransformOptions::in_viewport`]. The anchor defaults to the
    /// object's own origin and stays fixed. Returns `false` for stale ids and
    /// for transforms that leave the own matrix unchanged; only a change
    /// invalidates cached geometry and flags the parent group for layout.
    pub fn transform_object(
        &mut self,
        id: ObjectId,
        transform: Affine,
        options: TransformOptions,
    ) -> bool {
        let Some(anchor) = options.anchor.or_else(|| self.props(id).map(|p| p.origin())) else {
            debug!(?id, "transform of a stale id");
            return false;
        };
        let (Some(bbox), Some(total)) = (self.bbox(id), self.calc_transform_matrix(id)) else {
            return false;
        };
        let plane = self.working_plane(options.in_viewport);
        let pivot = plane.unwrap_or(Affine::IDENTITY) * bbox.point_from_origin(anchor.offset());
        let new_total = multiply([
            Some(translate_matrix(pivot.x, pivot.y)),
            Some(transform),
            Some(translate_matrix(-pivot.x, -pivot.y)),
            plane,
            Some(total),
        ]);
        self.set_object_transform(id, new_total, options.in_viewport)
    }

    /// Make `transform` the object's full own-to-scene matrix (own-to-viewport
    /// with `in_viewport`).
    ///
    /// Returns `false` when the viewport or a parent plane is singular; the
    /// object is then left untouched.
    pub fn set_object_transform(&mut self, id: ObjectId, transform: Affine, in_viewport: bool) -> bool {
        let from_plane = match self.working_plane(in_viewport).map(try_invert).transpose() {
            Ok(inverse) => inverse,
            Err(_err) => {
                warn!(?id, error = %_err, "viewport is singular, transform refused");
                return false;
            }
        };
        self.set_total_matrix(id, multiply([from_plane, Some(transform)]))
    }

    fn set_total_matrix(&mut self, id: ObjectId, total: Affine) -> bool {
        let parent = self.parent(id).and_then(|p| self.calc_transform_matrix(p));
        let to_parent = match parent.map(try_invert).transpose() {
            Ok(inverse) => inverse,
            Err(_err) => {
                warn!(?id, error = %_err, "parent plane is singular, transform refused");
                return false;
            }
        };
        self.apply_transform_to_object(id, multiply([to_parent, Some(total)]))
    }

    /// Move `id` by `(dx, dy)`.
    pub fn translate(&mut self, id: ObjectId, dx: f64, dy: f64, in_viewport: bool) -> bool {
        self.transform_object(
            id,
            translate_matrix(dx, dy),
            TransformOptions {
                anchor: None,
                in_viewport,
            },
        )
    }

    /// Scale `id` along its own edges, measured in the working plane.
    pub fn scale(&mut self, id: ObjectId, sx: f64, sy: f64, options: TransformOptions) -> bool {
        let Some(theta) = self
            .working_bbox(id, options.in_viewport)
            .map(|b| b.get_rotation())
        else {
            return false;
        };
        let m = rotation(theta) * scale_matrix(sx, sy) * rotation(-theta);
        self.transform_object(id, m, options)
    }

    /// Scale `id` along the axes of the working plane.
    pub fn scale_by(&mut self, id: ObjectId, sx: f64, sy: f64, options: TransformOptions) -> bool {
        self.transform_object(id, scale_matrix(sx, sy), options)
    }

    /// Uniformly scale `id` so that its box measures `value` along `axis`.
    ///
    /// The box is the rotated bounding box, so skewed objects fit as well.
    pub fn scale_axis_to(
        &mut self,
        id: ObjectId,
        axis: Axis,
        value: f64,
        options: TransformOptions,
    ) -> bool {
        let Some(transformed) = self.transformed_bbox(id) else {
            return false;
        };
        let mut transformed = transformed.send_to_canvas();
        if options.in_viewport {
            transformed = transformed.send_to_viewport();
        }
        let Some(rotated) = self.working_bbox(id, options.in_viewport) else {
            return false;
        };
        let pick = |v: Vec2| match axis {
            Axis::X => v.x,
            Axis::Y => v.y,
        };
        let transformed = pick(transformed.get_dimensions_vector());
        let rotated = pick(rotated.get_dimensions_vector());
        if transformed == 0.0 || rotated == 0.0 {
            debug!(?id, ?axis, "cannot scale a collapsed axis");
            return false;
        }
        let factor = rotated / transformed;
        let s = value / transformed / factor;
        self.scale(id, s, s, options)
    }

    /// Uniformly scale `id` so that its box is `value` wide.
    pub fn scale_to_width(&mut self, id: ObjectId, value: f64, options: TransformOptions) -> bool {
        self.scale_axis_to(id, Axis::X, value, options)
    }

    /// Uniformly scale `id` so that its box is `value` tall.
    pub fn scale_to_height(&mut self, id: ObjectId, value: f64, options: TransformOptions) -> bool {
        self.scale_axis_to(id, Axis::Y, value, options)
    }

    /// Rotate `id` so that its rotation in the working plane is `angle` degrees.
    pub fn rotate(&mut self, id: ObjectId, angle: f64, options: TransformOptions) -> bool {
        let Some(current) = self
            .working_bbox(id, options.in_viewport)
            .map(|b| b.get_rotation().to_degrees())
        else {
            return false;
        };
        self.rotate_by(id, angle - current, options)
    }

    /// Rotate `id` by `delta` degrees.
    pub fn rotate_by(&mut self, id: ObjectId, delta: f64, options: TransformOptions) -> bool {
        self.transform_object(id, rotate_matrix(delta), options)
    }

    /// Set the shear of `id` relative to its rotated frame.
    ///
    /// The existing horizontal shear is replaced by `(x, y)` while the
    /// rotation and scale are kept.
    pub fn shear(&mut self, id: ObjectId, x: f64, y: f64, options: TransformOptions) -> bool {
        let (Some(bbox), Some(total)) = (
            self.working_bbox(id, options.in_viewport),
            self.calc_transform_matrix(id),
        ) else {
            return false;
        };
        let theta = bbox.get_rotation();
        let linear = multiply([
            Some(rotation(-theta)),
            self.working_plane(options.in_viewport),
            Some(total),
        ]);
        let [_, _, c, d, ..] = linear.as_coeffs();
        let current = if d.abs() < f64::EPSILON { 0.0 } else { c / d };
        let m = multiply([
            Some(rotation(theta)),
            Some(shear_matrix(x, y)),
            Some(invert(shear_matrix(current, 0.0))),
            Some(rotation(-theta)),
        ]);
        self.transform_object(id, m, options)
    }

    /// Shear `id` along its current visual edges.
    ///
    /// The x edge gains `y` times the y edge and the y edge gains `x` times
    /// the x edge, so successive calls compose on what is visible.
    pub fn shear_by(&mut self, id: ObjectId, x: f64, y: f64, options: TransformOptions) -> bool {
        let Some(total) = self.calc_transform_matrix(id) else {
            return false;
        };
        let full = multiply([self.working_plane(options.in_viewport), Some(total)]);
        let u1 = unit_vector(transform_vector(full, Vec2::new(1.0, 0.0)));
        let u2 = unit_vector(transform_vector(full, Vec2::new(0.0, 1.0)));
        let m = base_change_matrix([u1, u2], [u1 + u2 * y, u1 * x + u2]);
        self.transform_object(id, m, options)
    }

    /// Set the skew of `id` to `x` and `y` degrees.
    pub fn skew(&mut self, id: ObjectId, x: f64, y: f64, options: TransformOptions) -> bool {
        self.shear(id, x.to_radians().tan(), y.to_radians().tan(), options)
    }

    /// Skew `id` by `x` and `y` degrees along its current edges.
    pub fn skew_by(&mut self, id: ObjectId, x: f64, y: f64, options: TransformOptions) -> bool {
        self.shear_by(id, x.to_radians().tan(), y.to_radians().tan(), options)
    }

    /// Mirror `id` across the axes of the working plane.
    pub fn flip(&mut self, id: ObjectId, x: bool, y: bool, options: TransformOptions) -> bool {
        let m = scale_matrix(if x { -1.0 } else { 1.0 }, if y { -1.0 } else { 1.0 });
        self.transform_object(id, m, options)
    }

    /// Make `own` the matrix from the object's plane to its parent plane.
    ///
    /// Properties are rewritten from the decomposition of `own`; flips are
    /// folded into scale and angle. Returns `false` if `own` matches the
    /// current own matrix within the configured epsilon.
    pub fn apply_transform_to_object(&mut self, id: ObjectId, own: Affine) -> bool {
        let Some(current) = self.calc_own_matrix(id) else {
            return false;
        };
        if approx_eq(current, own, self.config().epsilon) {
            debug!(?id, "transform leaves the object unchanged");
            return false;
        }
        self.update(id, |p| p.apply_own_matrix(own))
    }

    /// Apply `m` on top of the own matrix, in the parent plane.
    pub fn add_transform_to_object(&mut self, id: ObjectId, m: Affine) -> bool {
        let Some(own) = self.calc_own_matrix(id) else {
            return false;
        };
        self.apply_transform_to_object(id, m * own)
    }

    /// Undo a transform previously added with [`add_transform_to_object`](Self::add_transform_to_object).
    pub fn remove_transform_from_object(&mut self, id: ObjectId, m: Affine) -> bool {
        let Some(own) = self.calc_own_matrix(id) else {
            return false;
        };
        let Ok(inverse) = try_invert(m) else {
            debug!(?id, "cannot remove a singular transform");
            return false;
        };
        self.apply_transform_to_object(id, inverse * own)
    }

    /// Clear scale, skew and flips, then rotate back to zero around the object's origin.
    pub fn reset_object_transform(&mut self, id: ObjectId) -> bool {
        let cleared = self.update(id, |p| {
            p.scale_x = 1.0;
            p.scale_y = 1.0;
            p.skew_x = 0.0;
            p.skew_y = 0.0;
            p.flip_x = false;
            p.flip_y = false;
        });
        let rotated = self.rotate(id, 0.0, TransformOptions::default());
        cleared || rotated
    }

    /// The transform-related properties of `id`.
    pub fn save_object_transform(&self, id: ObjectId) -> Option<SavedTransform> {
        Some(self.props(id)?.save_transform())
    }

    /// Restore properties captured by [`save_object_transform`](Self::save_object_transform).
    pub fn restore_object_transform(&mut self, id: ObjectId, saved: &SavedTransform) -> bool {
        self.update(id, |p| p.restore_transform(saved))
    }
}
