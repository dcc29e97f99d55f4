// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object properties and the positioning math that depends on them alone.

use kurbo::{Affine, Point, Vec2};
use trellis_plane::matrix::{
    compose, constrain_scale, decompose, dimensions_matrix, size_after_transform,
    TransformComponents,
};
use trellis_plane::vector::rotate_point;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::types::{Anchor, OriginX, OriginY, SavedTransform};

/// The geometric state of an object, relative to its parent plane.
///
/// `left` and `top` place the point named by `origin_x`/`origin_y`; angles are in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectProps {
    /// Horizontal position of the origin.
    pub left: f64,
    /// Vertical position of the origin.
    pub top: f64,
    /// Intrinsic width.
    pub width: f64,
    /// Intrinsic height.
    pub height: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Horizontal skew in degrees.
    pub skew_x: f64,
    /// Vertical skew in degrees.
    pub skew_y: f64,
    /// Rotation in degrees, clockwise on screen.
    pub angle: f64,
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
    /// Horizontal origin that `left` refers to.
    pub origin_x: OriginX,
    /// Vertical origin that `top` refers to.
    pub origin_y: OriginY,
    /// Stroke width.
    pub stroke_width: f64,
    /// The stroke keeps its width regardless of the object's transform.
    pub stroke_uniform: bool,
    /// Space between the object and its controls, in viewport units.
    pub padding: f64,
    /// Smallest magnitude either scale may take.
    pub min_scale_limit: f64,
}

impl Default for ObjectProps {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            angle: 0.0,
            flip_x: false,
            flip_y: false,
            origin_x: OriginX::Left,
            origin_y: OriginY::Top,
            stroke_width: 1.0,
            stroke_uniform: false,
            padding: 0.0,
            min_scale_limit: 0.0,
        }
    }
}

impl ObjectProps {
    /// Props of a `width × height` object with its origin at `(left, top)`.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
            ..Self::default()
        }
    }

    /// The anchor named by `origin_x` and `origin_y`.
    pub fn origin(&self) -> Anchor {
        Anchor::new(self.origin_x, self.origin_y)
    }

    /// Stroke width that scales with the object.
    pub fn scaling_stroke(&self) -> f64 {
        if self.stroke_uniform { 0.0 } else { self.stroke_width }
    }

    /// Stroke width that stays constant on screen.
    pub fn uniform_stroke(&self) -> f64 {
        if self.stroke_uniform { self.stroke_width } else { 0.0 }
    }

    /// Intrinsic size including the scaling stroke.
    pub fn stroked_size(&self) -> Vec2 {
        let stroke = self.scaling_stroke();
        Vec2::new(self.width + stroke, self.height + stroke)
    }

    /// The decomposed transform, centered on `center`.
    pub fn components(&self, center: Point) -> TransformComponents {
        TransformComponents {
            angle: self.angle,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            skew_x: self.skew_x,
            skew_y: self.skew_y,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
            translate_x: center.x,
            translate_y: center.y,
        }
    }

    /// Size of the axis-aligned box enclosing the scaled and skewed (but
    /// unrotated) object, used to place origins.
    pub fn positioning_dimensions(&self) -> Vec2 {
        let size = self.stroked_size();
        let dims = size_after_transform(size.x, size.y, dimensions_matrix(&self.components(Point::ORIGIN)));
        let uniform = self.uniform_stroke();
        dims + Vec2::new(uniform, uniform)
    }

    /// Moves `point`, known to sit at origin `from`, to where origin `to` sits,
    /// ignoring rotation.
    pub fn translate_to_given_origin(&self, point: Point, from: Anchor, to: Anchor) -> Point {
        let dims = self.positioning_dimensions();
        let (from, to) = (from.offset(), to.offset());
        point + Vec2::new((to.x - from.x) * dims.x, (to.y - from.y) * dims.y)
    }

    /// The center of the object if `point` is where origin `from` sits.
    pub fn translate_to_center_point(&self, point: Point, from: Anchor) -> Point {
        let center = self.translate_to_given_origin(point, from, Anchor::CENTER);
        if self.angle == 0.0 {
            return center;
        }
        rotate_point(center, point, self.angle.to_radians())
    }

    /// Where origin `to` sits if the object is centered on `center`.
    pub fn translate_to_origin_point(&self, center: Point, to: Anchor) -> Point {
        let point = self.translate_to_given_origin(center, Anchor::CENTER, to);
        if self.angle == 0.0 {
            return point;
        }
        rotate_point(point, center, self.angle.to_radians())
    }

    /// The center of the object in its parent plane.
    pub fn relative_center_point(&self) -> Point {
        self.translate_to_center_point(Point::new(self.left, self.top), self.origin())
    }

    /// Moves the object so that its center lands on `center`, in the parent plane.
    pub fn set_relative_center_point(&mut self, center: Point) {
        let position = self.translate_to_origin_point(center, self.origin());
        self.left = position.x;
        self.top = position.y;
    }

    /// The matrix taking the object's own plane to its parent plane.
    pub fn own_matrix(&self) -> Affine {
        compose(&self.components(self.relative_center_point()))
    }

    /// Replaces the transform properties with the decomposition of `own`.
    ///
    /// Flips are folded into scale and angle; scales respect `min_scale_limit`.
    pub fn apply_own_matrix(&mut self, own: Affine) {
        let c = decompose(own);
        self.flip_x = false;
        self.flip_y = false;
        self.angle = c.angle;
        self.scale_x = c.scale_x;
        self.scale_y = c.scale_y;
        self.skew_x = c.skew_x;
        self.skew_y = c.skew_y;
        self.constrain_scales();
        self.set_relative_center_point(Point::new(c.translate_x, c.translate_y));
    }

    /// Keeps both scales away from zero and at or above `min_scale_limit` in magnitude.
    pub fn constrain_scales(&mut self) {
        self.scale_x = constrain_scale(self.scale_x, self.min_scale_limit);
        self.scale_y = constrain_scale(self.scale_y, self.min_scale_limit);
    }

    /// A copy of the transform-related properties.
    pub fn save_transform(&self) -> SavedTransform {
        SavedTransform {
            left: self.left,
            top: self.top,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            skew_x: self.skew_x,
            skew_y: self.skew_y,
            angle: self.angle,
            flip_x: self.flip_x,
            flip_y: self.flip_y,
        }
    }

    /// Restores properties captured by [`save_transform`](Self::save_transform).
    pub fn restore_transform(&mut self, saved: &SavedTransform) {
        self.left = saved.left;
        self.top = saved.top;
        self.scale_x = saved.scale_x;
        self.scale_y = saved.scale_y;
        self.skew_x = saved.skew_x;
        self.skew_y = saved.skew_y;
        self.angle = saved.angle;
        self.flip_x = saved.flip_x;
        self.flip_y = saved.flip_y;
    }
}
