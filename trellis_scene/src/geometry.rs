// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived geometry: matrices, boxes, origin-aware positioning and overlap predicates.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Vec2};
use trellis_plane::intersection::polygon_intersects_rect;
use trellis_plane::matrix::{plane_rotation, try_invert};
use trellis_plane::{BBox, BBoxSource, Corners, Plane, PlaneChain};

use crate::scene::Scene;
use crate::types::{Anchor, ObjectId};

impl Scene {
    // --- matrices ---

    /// Matrix taking the object's own plane to its parent plane.
    pub fn calc_own_matrix(&self, id: ObjectId) -> Option<Affine> {
        let node = self.node(id)?;
        Some(
            node.cache
                .own_matrix
                .get_or_compute(node.stamp, || node.props.own_matrix()),
        )
    }

    /// Matrix taking the object's own plane to the scene plane.
    pub fn calc_transform_matrix(&self, id: ObjectId) -> Option<Affine> {
        let node = self.node(id)?;
        let own = self.calc_own_matrix(id)?;
        Some(node.cache.transform_matrix.get_or_compute(node.stamp, || {
            match node.parent.and_then(|p| self.calc_transform_matrix(p)) {
                Some(parent) => parent * own,
                None => own,
            }
        }))
    }

    /// Matrix taking the object's own plane to the viewport plane.
    pub fn calc_transform_matrix_in_viewport(&self, id: ObjectId) -> Option<Affine> {
        Some(self.viewport_transform() * self.calc_transform_matrix(id)?)
    }

    /// Rotation of the object in the scene, in degrees, including its groups.
    pub fn total_angle(&self, id: ObjectId) -> Option<f64> {
        Some(plane_rotation(self.calc_transform_matrix(id)?).to_degrees())
    }

    /// The planes of `id`: its own matrix first, then each ancestor's.
    pub fn plane_chain(&self, id: ObjectId) -> Option<PlaneChain> {
        let mut levels = Vec::new();
        let mut cursor = Some(id);
        while let Some(next) = cursor {
            levels.push(self.calc_own_matrix(next)?);
            cursor = self.parent(next);
        }
        Some(PlaneChain::new(levels, self.viewport_transform()))
    }

    fn bbox_source(&self, id: ObjectId) -> Option<BBoxSource> {
        let props = self.props(id)?;
        Some(BBoxSource {
            size: props.stroked_size(),
            uniform_stroke: props.uniform_stroke(),
            chain: self.plane_chain(id)?,
        })
    }

    // --- boxes ---

    /// The rotated bounding box in the scene plane.
    ///
    /// It follows the object's rotation, encloses its skewed outline and
    /// includes the stroke.
    pub fn bbox(&self, id: ObjectId) -> Option<BBox> {
        let node = self.node(id)?;
        let source = self.bbox_source(id)?;
        Some(
            node.cache
                .bbox
                .get_or_compute(node.stamp, || BBox::rotated(&source)),
        )
    }

    /// The rotated box `id` would have if `total` were its own-to-scene matrix.
    ///
    /// `None` for stale ids and when the parent plane cannot be inverted.
    pub(crate) fn bbox_for_transform(&self, id: ObjectId, total: Affine) -> Option<BBox> {
        let mut source = self.bbox_source(id)?;
        let to_parent = match self.parent(id).and_then(|p| self.calc_transform_matrix(p)) {
            Some(parent) => try_invert(parent).ok()?,
            None => Affine::IDENTITY,
        };
        let mut levels = source.chain.levels().to_vec();
        *levels.first_mut()? = to_parent * total;
        source.chain = PlaneChain::new(levels, source.chain.viewport());
        Some(BBox::rotated(&source))
    }

    /// The exact transformed outline in the parent plane.
    pub fn transformed_bbox(&self, id: ObjectId) -> Option<BBox> {
        Some(BBox::transformed(&self.bbox_source(id)?))
    }

    /// The intrinsic box in the object's own plane.
    pub fn own_bbox(&self, id: ObjectId) -> Option<BBox> {
        Some(BBox::own(&self.bbox_source(id)?))
    }

    /// Corners of the rotated box in the scene plane, as `tl, tr, br, bl`.
    pub fn get_coords(&self, id: ObjectId) -> Option<Corners> {
        Some(self.bbox(id)?.get_coords())
    }

    /// Corners of the rotated box in the viewport plane.
    pub fn get_viewport_coords(&self, id: ObjectId) -> Option<Corners> {
        Some(self.bbox(id)?.send_to_viewport().get_coords())
    }

    /// Axis-aligned bounds of the object in the scene plane.
    pub fn get_bounding_rect(&self, id: ObjectId) -> Option<Rect> {
        Some(self.bbox(id)?.bounding_rect())
    }

    /// Width on the scene, after scale and skew, including the stroke.
    pub fn get_scaled_width(&self, id: ObjectId) -> Option<f64> {
        Some(self.scaled_dimensions(id)?.x)
    }

    /// Height on the scene, after scale and skew, including the stroke.
    pub fn get_scaled_height(&self, id: ObjectId) -> Option<f64> {
        Some(self.scaled_dimensions(id)?.y)
    }

    /// Edge lengths of the transformed outline on the scene.
    fn scaled_dimensions(&self, id: ObjectId) -> Option<Vec2> {
        Some(
            self.transformed_bbox(id)?
                .send_to_canvas()
                .get_dimensions_vector(),
        )
    }

    /// Recompute the cached geometry of `id` now.
    ///
    /// Reading geometry recomputes it on demand, so this is only needed to
    /// front-load the work. Repeated calls without changes are no-ops.
    pub fn set_coords(&self, id: ObjectId) -> bool {
        let (Some(node), Some(_)) = (self.node(id), self.bbox(id)) else {
            return false;
        };
        if self.canvas().is_some() && self.get_control_coords(id).is_none() {
            return false;
        }
        node.cache.bbox.is_fresh(node.stamp)
    }

    /// Drop the cached geometry of `id` and its descendants.
    pub fn invalidate_coords(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.invalidate(id);
        true
    }

    /// Whether the cached box of `id` is current.
    pub fn has_fresh_coords(&self, id: ObjectId) -> bool {
        self.node(id)
            .is_some_and(|n| n.cache.bbox.is_fresh(n.stamp))
    }

    // --- origins and positions ---

    /// Move `point`, known to sit at origin `from` of `id`, to where origin `to` sits, ignoring rotation.
    pub fn translate_to_given_origin(
        &self,
        id: ObjectId,
        point: Point,
        from: Anchor,
        to: Anchor,
    ) -> Option<Point> {
        Some(self.props(id)?.translate_to_given_origin(point, from, to))
    }

    /// The center of `id` if `point` is where its origin `from` sits, in the parent plane.
    pub fn translate_to_center_point(&self, id: ObjectId, point: Point, from: Anchor) -> Option<Point> {
        Some(self.props(id)?.translate_to_center_point(point, from))
    }

    /// Where origin `to` of `id` sits if it is centered on `center`, in the parent plane.
    pub fn translate_to_origin_point(&self, id: ObjectId, center: Point, to: Anchor) -> Option<Point> {
        Some(self.props(id)?.translate_to_origin_point(center, to))
    }

    /// The center of `id` in the scene plane.
    pub fn get_center_point(&self, id: ObjectId) -> Option<Point> {
        Some(self.calc_transform_matrix(id)? * Point::ORIGIN)
    }

    /// The center of `id` in its parent plane.
    pub fn get_relative_center_point(&self, id: ObjectId) -> Option<Point> {
        Some(self.props(id)?.relative_center_point())
    }

    /// Move `id` so that its center lands on `center`, in its parent plane.
    pub fn set_relative_center_point(&mut self, id: ObjectId, center: Point) -> bool {
        self.update(id, |p| p.set_relative_center_point(center))
    }

    /// Where origin `anchor` of `id` sits, in its parent plane.
    pub fn get_point_by_origin(&self, id: ObjectId, anchor: Anchor) -> Option<Point> {
        let props = self.props(id)?;
        Some(props.translate_to_origin_point(props.relative_center_point(), anchor))
    }

    /// Move `id` so that its origin `anchor` lands on `position`, in its parent plane.
    pub fn set_position_by_origin(&mut self, id: ObjectId, position: Point, anchor: Anchor) -> bool {
        let Some(props) = self.props(id) else {
            return false;
        };
        let center = props.translate_to_center_point(position, anchor);
        self.set_relative_center_point(id, center)
    }

    /// The point of the box at `anchor` in the scene plane, defaulting to the object's origin.
    pub fn get_xy(&self, id: ObjectId, anchor: Option<Anchor>) -> Option<Point> {
        let anchor = anchor.unwrap_or(self.props(id)?.origin());
        Some(self.bbox(id)?.point_from_origin(anchor.offset()))
    }

    /// Move `id` so the point of its box at `anchor` (default: center) lands on
    /// `point`, given in the scene plane.
    pub fn set_xy(&mut self, id: ObjectId, point: Point, anchor: Option<Anchor>) -> bool {
        let Some(bbox) = self.bbox(id) else {
            return false;
        };
        let anchor = anchor.unwrap_or(Anchor::CENTER);
        let local = bbox.send_to_plane(Plane::PARENT);
        let target = bbox.chain().change(Plane::Scene, Plane::PARENT) * point;
        let delta = local.get_origin_translation(target, anchor.offset());
        if delta == Vec2::ZERO {
            return false;
        }
        self.update(id, |p| {
            p.left += delta.x;
            p.top += delta.y;
        })
    }

    /// Scene x coordinate of the object's origin.
    pub fn get_x(&self, id: ObjectId) -> Option<f64> {
        Some(self.get_xy(id, None)?.x)
    }

    /// Scene y coordinate of the object's origin.
    pub fn get_y(&self, id: ObjectId) -> Option<f64> {
        Some(self.get_xy(id, None)?.y)
    }

    /// Move the object's origin to scene x coordinate `x`.
    pub fn set_x(&mut self, id: ObjectId, x: f64) -> bool {
        let Some(origin) = self.props(id).map(|p| p.origin()) else {
            return false;
        };
        let Some(point) = self.get_xy(id, Some(origin)) else {
            return false;
        };
        self.set_xy(id, Point::new(x, point.y), Some(origin))
    }

    /// Move the object's origin to scene y coordinate `y`.
    pub fn set_y(&mut self, id: ObjectId, y: f64) -> bool {
        let Some(origin) = self.props(id).map(|p| p.origin()) else {
            return false;
        };
        let Some(point) = self.get_xy(id, Some(origin)) else {
            return false;
        };
        self.set_xy(id, Point::new(point.x, y), Some(origin))
    }

    // --- predicates ---

    /// Whether the outlines of `a` and `b` cross, or one contains the other.
    pub fn intersects_with_object(&self, a: ObjectId, b: ObjectId) -> bool {
        match (self.bbox(a), self.bbox(b)) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        }
    }

    /// Whether `a` lies entirely within `b`.
    pub fn is_contained_within_object(&self, a: ObjectId, b: ObjectId) -> bool {
        match (self.bbox(a), self.bbox(b)) {
            (Some(a), Some(b)) => a.is_contained_by(&b),
            _ => false,
        }
    }

    /// Whether `a` and `b` share any area.
    pub fn is_overlapping(&self, a: ObjectId, b: ObjectId) -> bool {
        self.intersects_with_object(a, b)
    }

    /// Whether the scene point `point` is inside the object or on its outline.
    pub fn contains_point(&self, id: ObjectId, point: Point) -> bool {
        self.bbox(id).is_some_and(|b| b.contains_point(point))
    }

    /// Whether the outline of `id` crosses the scene rectangle from `tl` to `br`.
    ///
    /// A rectangle strictly inside the object, or an object strictly inside
    /// the rectangle, does not count.
    pub fn intersects_with_rect(&self, id: ObjectId, tl: Point, br: Point) -> bool {
        self.get_coords(id)
            .is_some_and(|c| polygon_intersects_rect(&c.points(), tl, br))
    }

    /// Whether the bounds of `id` lie inside the scene rectangle from `tl` to `br`.
    pub fn is_contained_within_rect(&self, id: ObjectId, tl: Point, br: Point) -> bool {
        self.get_bounding_rect(id).is_some_and(|r| {
            r.x0 >= tl.x && r.x1 <= br.x && r.y0 >= tl.y && r.y1 <= br.y
        })
    }

    /// The visible area of the canvas, in the viewport plane.
    pub fn viewport_area(&self) -> Option<BBox> {
        Some(self.canvas()?.area())
    }

    /// Whether any part of `id` is visible. `None` without a canvas or for a stale id.
    pub fn is_on_screen(&self, id: ObjectId) -> Option<bool> {
        let area = self.viewport_area()?;
        Some(area.overlaps(&self.bbox(id)?))
    }

    /// Whether `id` is cut by the canvas edge: partly visible, or covering the whole canvas.
    ///
    /// `None` without a canvas or for a stale id.
    pub fn is_partially_on_screen(&self, id: ObjectId) -> Option<bool> {
        let area = self.viewport_area()?;
        let bbox = self.bbox(id)?;
        Some(area.intersects(&bbox) || area.is_contained_by(&bbox))
    }
}
