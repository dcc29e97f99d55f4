// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Oriented bounding boxes anchored in a coordinate plane.
//!
//! A [`BBox`] is the image of the unit square `[-0.5, 0.5]²` under an affine
//! transform, tagged with the [`Plane`] that transform lands in and the
//! [`PlaneChain`] needed to move it to any other plane. Boxes are immutable:
//! every operation returns a new box.

use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::intersection::{bounding_rect, point_in_polygon, polygon_contained_in, polygons_intersect};
use crate::matrix::{invert, plane_rotation, scale_matrix, translate_matrix};
use crate::plane::transform_vector;
use crate::vector::{orthonormal_vector, rotate_vector, sin_cos, unit_vector, vector_rotation};

/// A coordinate plane, relative to the owner of a [`PlaneChain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Plane {
    /// The plane `depth` levels above the owner's own plane.
    ///
    /// `Local(0)` is the owner's own plane, `Local(1)` its parent's plane.
    /// A depth at or beyond the chain length is the scene plane.
    Local(usize),
    /// The scene (canvas) plane, before the viewport transform.
    Scene,
    /// The viewport (screen) plane, after pan and zoom.
    Viewport,
}

impl Plane {
    /// The owner's own plane.
    pub const OWN: Self = Self::Local(0);
    /// The owner's parent plane.
    pub const PARENT: Self = Self::Local(1);
}

/// The stack of matrices linking an owner's planes to the scene and viewport.
///
/// `levels[0]` maps the owner's own plane into its parent, `levels[k]` maps
/// level `k` into level `k + 1`, and the last level lands in the scene.
/// Chains are shared between boxes derived from one another.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneChain {
    levels: Rc<[Affine]>,
    viewport: Affine,
}

impl Default for PlaneChain {
    fn default() -> Self {
        Self::new(Vec::new(), Affine::IDENTITY)
    }
}

impl PlaneChain {
    /// Creates a chain from own-to-parent level matrices and the scene-to-viewport matrix.
    pub fn new(levels: Vec<Affine>, viewport: Affine) -> Self {
        Self {
            levels: levels.into(),
            viewport,
        }
    }

    /// The level matrices, innermost first.
    pub fn levels(&self) -> &[Affine] {
        &self.levels
    }

    /// The scene-to-viewport matrix.
    pub fn viewport(&self) -> Affine {
        self.viewport
    }

    /// Number of levels between the owner's own plane and the scene.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Maps local depths past the end of the chain to [`Plane::Scene`].
    pub fn normalize(&self, plane: Plane) -> Plane {
        match plane {
            Plane::Local(depth) if depth >= self.levels.len() => Plane::Scene,
            other => other,
        }
    }

    /// Matrix taking coordinates of `plane` into the scene plane.
    pub fn to_scene(&self, plane: Plane) -> Affine {
        match self.normalize(plane) {
            Plane::Local(depth) => self.levels[depth..]
                .iter()
                .fold(Affine::IDENTITY, |acc, level| *level * acc),
            Plane::Scene => Affine::IDENTITY,
            Plane::Viewport => invert(self.viewport),
        }
    }

    /// Matrix taking scene coordinates into `plane`.
    pub fn from_scene(&self, plane: Plane) -> Affine {
        match self.normalize(plane) {
            Plane::Scene => Affine::IDENTITY,
            Plane::Viewport => self.viewport,
            local => invert(self.to_scene(local)),
        }
    }

    /// Matrix re-expressing coordinates of `from` in `to`.
    pub fn change(&self, from: Plane, to: Plane) -> Affine {
        let (from, to) = (self.normalize(from), self.normalize(to));
        match (from, to) {
            _ if from == to => Affine::IDENTITY,
            (Plane::Local(f), Plane::Local(t)) if t > f => self.levels[f..t]
                .iter()
                .fold(Affine::IDENTITY, |acc, level| *level * acc),
            _ => self.from_scene(to) * self.to_scene(from),
        }
    }
}

/// The inputs needed to build an object's boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct BBoxSource {
    /// Intrinsic size, including any stroke that scales with the object.
    pub size: Vec2,
    /// Stroke width that does not scale with the object.
    pub uniform_stroke: f64,
    /// Planes of the owner.
    pub chain: PlaneChain,
}

/// The four corners of a box, in traversal order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corners {
    /// Top-left, the image of `(-0.5, -0.5)`.
    pub tl: Point,
    /// Top-right, the image of `(0.5, -0.5)`.
    pub tr: Point,
    /// Bottom-right, the image of `(0.5, 0.5)`.
    pub br: Point,
    /// Bottom-left, the image of `(-0.5, 0.5)`.
    pub bl: Point,
}

impl Corners {
    /// Corners of the unit square centered on the origin.
    pub const UNIT: Self = Self {
        tl: Point::new(-0.5, -0.5),
        tr: Point::new(0.5, -0.5),
        br: Point::new(0.5, 0.5),
        bl: Point::new(-0.5, 0.5),
    };

    /// Applies `m` to every corner.
    pub fn transform(&self, m: Affine) -> Self {
        Self {
            tl: m * self.tl,
            tr: m * self.tr,
            br: m * self.br,
            bl: m * self.bl,
        }
    }

    /// Corners as a polygon: `[tl, tr, br, bl]`.
    pub fn points(&self) -> [Point; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    /// Whether `p` is inside the quadrilateral or on its boundary.
    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(p, &self.points())
    }

    /// Axis-aligned bounds of the corners.
    pub fn bounding_rect(&self) -> Rect {
        bounding_rect(&self.points())
    }
}

/// An oriented box in a named plane.
#[derive(Clone, Debug, PartialEq)]
pub struct BBox {
    transform: Affine,
    rotation: f64,
    plane: Plane,
    chain: PlaneChain,
}

impl BBox {
    /// A box from its unit-square transform, expressed in `plane`.
    ///
    /// The rotation is read from the transform.
    pub fn from_transform(transform: Affine, plane: Plane, chain: PlaneChain) -> Self {
        let plane = chain.normalize(plane);
        Self {
            transform,
            rotation: plane_rotation(transform),
            plane,
            chain,
        }
    }

    /// The object's intrinsic box in its own plane: no position, rotation or skew.
    pub fn own(source: &BBoxSource) -> Self {
        Self::from_transform(
            scale_matrix(source.size.x, source.size.y),
            Plane::OWN,
            source.chain.clone(),
        )
    }

    /// The fully transformed box in the parent plane.
    pub fn transformed(source: &BBoxSource) -> Self {
        let own = source.chain.levels().first().copied().unwrap_or(Affine::IDENTITY);
        Self::from_transform(
            own * scale_matrix(source.size.x, source.size.y),
            Plane::PARENT,
            source.chain.clone(),
        )
    }

    /// The rotated box in the scene plane.
    ///
    /// It is aligned with the rotation of the full transform and encloses the
    /// transformed box, so it keeps right angles under skew. The uniform stroke
    /// is added on every side.
    pub fn rotated(source: &BBoxSource) -> Self {
        let chain = source.chain.clone();
        let total = chain.to_scene(Plane::OWN);
        let rotation = plane_rotation(total);
        let (sin, cos) = sin_cos(rotation);
        let (u, v) = (Vec2::new(cos, sin), Vec2::new(-sin, cos));
        let half = source.size / 2.0;
        let (mut ex, mut ey) = (0.0_f64, 0.0_f64);
        for corner in [Vec2::new(half.x, half.y), Vec2::new(half.x, -half.y)] {
            let d = transform_vector(total, corner);
            ex = ex.max(d.dot(u).abs());
            ey = ey.max(d.dot(v).abs());
        }
        let stroke = source.uniform_stroke / 2.0;
        let center = total * Point::ORIGIN;
        let transform = translate_matrix(center.x, center.y)
            * Affine::new([cos, sin, -sin, cos, 0.0, 0.0])
            * scale_matrix(2.0 * (ex + stroke), 2.0 * (ey + stroke));
        Self {
            transform,
            rotation,
            plane: Plane::Scene,
            chain,
        }
    }

    /// The visible area of a `width × height` viewport with transform `viewport`.
    pub fn viewport_area(width: f64, height: f64, viewport: Affine) -> Self {
        Self::from_transform(
            translate_matrix(width / 2.0, height / 2.0) * scale_matrix(width, height),
            Plane::Viewport,
            PlaneChain::new(Vec::new(), viewport),
        )
    }

    /// Transform from the unit square to this box.
    pub fn get_transformation(&self) -> Affine {
        self.transform
    }

    /// Orientation in radians: the direction of the box's x edge.
    pub fn get_rotation(&self) -> f64 {
        self.rotation
    }

    /// The plane the box is expressed in.
    pub fn plane(&self) -> Plane {
        self.plane
    }

    /// The planes of the box's owner.
    pub fn chain(&self) -> &PlaneChain {
        &self.chain
    }

    /// The corners, in this box's plane.
    pub fn get_coords(&self) -> Corners {
        Corners::UNIT.transform(self.transform)
    }

    /// Center of the box.
    pub fn center(&self) -> Point {
        self.transform * Point::ORIGIN
    }

    /// Point at normalized `origin`, whose components range over `[-0.5, 0.5]`.
    pub fn point_from_origin(&self, origin: Point) -> Point {
        self.transform * origin
    }

    /// How far the box must move so that `origin` lands on `target`.
    pub fn get_origin_translation(&self, target: Point, origin: Point) -> Vec2 {
        target - self.point_from_origin(origin)
    }

    /// Lengths of the x and y edges.
    pub fn get_dimensions_vector(&self) -> Vec2 {
        Vec2::new(
            transform_vector(self.transform, Vec2::new(1.0, 0.0)).hypot(),
            transform_vector(self.transform, Vec2::new(0.0, 1.0)).hypot(),
        )
    }

    /// Axis-aligned bounds in this box's plane.
    pub fn bounding_rect(&self) -> Rect {
        self.get_coords().bounding_rect()
    }

    /// Whether `p`, expressed in this box's plane, is inside the box.
    pub fn contains_point(&self, p: Point) -> bool {
        self.get_coords().contains(p)
    }

    /// The same box expressed in `plane`.
    pub fn send_to_plane(&self, plane: Plane) -> Self {
        let plane = self.chain.normalize(plane);
        if plane == self.plane {
            return self.clone();
        }
        let change = self.chain.change(self.plane, plane);
        let x_edge = transform_vector(change, rotate_vector(Vec2::new(1.0, 0.0), self.rotation));
        Self {
            transform: change * self.transform,
            rotation: vector_rotation(x_edge),
            plane,
            chain: self.chain.clone(),
        }
    }

    /// The same box one level up; boxes in the scene or viewport stay put.
    pub fn send_to_parent(&self) -> Self {
        match self.plane {
            Plane::Local(depth) => self.send_to_plane(Plane::Local(depth + 1)),
            Plane::Scene | Plane::Viewport => self.clone(),
        }
    }

    /// The same box in the scene plane.
    pub fn send_to_canvas(&self) -> Self {
        self.send_to_plane(Plane::Scene)
    }

    /// The same box in the viewport plane.
    pub fn send_to_viewport(&self) -> Self {
        self.send_to_plane(Plane::Viewport)
    }

    /// Grows every edge outward by `padding`, measured in this box's plane.
    ///
    /// A collapsed edge grows along the direction implied by the rotation.
    pub fn inflate(&self, padding: f64) -> Self {
        if padding == 0.0 {
            return self.clone();
        }
        let x_edge = transform_vector(self.transform, Vec2::new(1.0, 0.0));
        let y_edge = transform_vector(self.transform, Vec2::new(0.0, 1.0));
        let ux = if x_edge.hypot() > 0.0 {
            unit_vector(x_edge)
        } else {
            rotate_vector(Vec2::new(1.0, 0.0), self.rotation)
        };
        let uy = if y_edge.hypot() > 0.0 {
            unit_vector(y_edge)
        } else {
            orthonormal_vector(ux, true)
        };
        let x_edge = x_edge + ux * (2.0 * padding);
        let y_edge = y_edge + uy * (2.0 * padding);
        let center = self.center();
        Self {
            transform: Affine::new([x_edge.x, x_edge.y, y_edge.x, y_edge.y, center.x, center.y]),
            rotation: self.rotation,
            plane: self.plane,
            chain: self.chain.clone(),
        }
    }

    fn scene_points(&self) -> [Point; 4] {
        self.send_to_canvas().get_coords().points()
    }

    /// Whether the edges of the two boxes meet, compared in the scene plane.
    pub fn intersects(&self, other: &Self) -> bool {
        polygons_intersect(&self.scene_points(), &other.scene_points())
    }

    /// Whether this box lies within `other`, compared in the scene plane.
    pub fn is_contained_by(&self, other: &Self) -> bool {
        polygon_contained_in(&self.scene_points(), &other.scene_points())
    }

    /// Whether the boxes share any area or boundary.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.intersects(other) || self.is_contained_by(other) || other.is_contained_by(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{compose, rotate_matrix, skew_x_matrix, TransformComponents};
    use alloc::vec;

    fn assert_pt(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    fn assert_corners(a: Corners, b: Corners) {
        for (p, q) in a.points().into_iter().zip(b.points()) {
            assert_pt(p, q);
        }
    }

    fn nested_source() -> BBoxSource {
        let own = compose(&TransformComponents {
            translate_x: 20.0,
            translate_y: -5.0,
            angle: 25.0,
            scale_x: 1.5,
            scale_y: 0.75,
            skew_x: 10.0,
            flip_y: true,
            ..Default::default()
        });
        let group = rotate_matrix(-40.0) * translate_matrix(3.0, 8.0);
        let outer = translate_matrix(100.0, 50.0) * scale_matrix(2.0, 1.0);
        BBoxSource {
            size: Vec2::new(30.0, 20.0),
            uniform_stroke: 0.0,
            chain: PlaneChain::new(vec![own, group, outer], Affine::scale(1.5)),
        }
    }

    #[test]
    fn corners_follow_traversal_order() {
        let b = BBox::from_transform(
            translate_matrix(15.0, 10.0) * scale_matrix(10.0, 20.0),
            Plane::Scene,
            PlaneChain::default(),
        );
        let c = b.get_coords();
        assert_eq!(c.tl, Point::new(10.0, 0.0));
        assert_eq!(c.tr, Point::new(20.0, 0.0));
        assert_eq!(c.br, Point::new(20.0, 20.0));
        assert_eq!(c.bl, Point::new(10.0, 20.0));
        assert_eq!(b.get_dimensions_vector(), Vec2::new(10.0, 20.0));
        assert_eq!(b.point_from_origin(Point::new(0.5, 0.0)), Point::new(20.0, 10.0));
        assert_eq!(
            b.get_origin_translation(Point::new(0.0, 0.0), Point::new(-0.5, -0.5)),
            Vec2::new(-10.0, 0.0)
        );
    }

    #[test]
    fn stepwise_send_to_parent_matches_direct() {
        let source = nested_source();
        let own = BBox::own(&source);
        let stepped = own.send_to_parent().send_to_parent().send_to_parent();
        assert_eq!(stepped.plane(), Plane::Scene);
        assert_corners(stepped.get_coords(), own.send_to_canvas().get_coords());
        assert!((stepped.get_rotation() - own.send_to_canvas().get_rotation()).abs() < 1e-9);

        let transformed = BBox::transformed(&source);
        assert_corners(transformed.get_coords(), own.send_to_parent().get_coords());
        assert_corners(
            transformed.send_to_canvas().get_coords(),
            stepped.get_coords(),
        );
    }

    #[test]
    fn plane_round_trip_is_identity() {
        let source = nested_source();
        let own = BBox::own(&source);
        for plane in [Plane::PARENT, Plane::Local(2), Plane::Scene, Plane::Viewport] {
            let back = own.send_to_plane(plane).send_to_plane(Plane::OWN);
            assert_eq!(back.plane(), Plane::OWN);
            assert_corners(back.get_coords(), own.get_coords());
            assert!(back.get_rotation().abs() < 1e-9);
        }
        assert_eq!(own.send_to_plane(Plane::Local(7)).plane(), Plane::Scene);
    }

    #[test]
    fn viewport_is_scene_times_viewport_transform() {
        let source = nested_source();
        let scene = BBox::rotated(&source);
        let vp = scene.send_to_viewport();
        assert_eq!(vp.plane(), Plane::Viewport);
        assert_corners(vp.get_coords(), scene.get_coords().transform(Affine::scale(1.5)));
        assert_eq!(vp.send_to_parent(), vp);
    }

    #[test]
    fn rotated_box_encloses_skewed_shape() {
        let own = translate_matrix(54.5, 38.5) * skew_x_matrix(45.0);
        let source = BBoxSource {
            size: Vec2::new(12.0, 17.0),
            uniform_stroke: 0.0,
            chain: PlaneChain::new(vec![own], Affine::IDENTITY),
        };
        let c = BBox::rotated(&source).get_coords();
        assert_pt(c.tl, Point::new(40.0, 30.0));
        assert_pt(c.tr, Point::new(69.0, 30.0));
        assert_pt(c.br, Point::new(69.0, 47.0));
        assert_pt(c.bl, Point::new(40.0, 47.0));
    }

    #[test]
    fn rotated_box_keeps_orientation_and_uniform_stroke() {
        let own = rotate_matrix(30.0) * scale_matrix(2.0, 1.0);
        let source = BBoxSource {
            size: Vec2::new(10.0, 10.0),
            uniform_stroke: 4.0,
            chain: PlaneChain::new(vec![own], Affine::IDENTITY),
        };
        let b = BBox::rotated(&source);
        assert!((b.get_rotation().to_degrees() - 30.0).abs() < 1e-9);
        let dims = b.get_dimensions_vector();
        assert!((dims.x - 24.0).abs() < 1e-9);
        assert!((dims.y - 14.0).abs() < 1e-9);
    }

    #[test]
    fn flips_keep_a_simple_quadrilateral() {
        for (fx, fy) in [(false, false), (true, false), (false, true), (true, true)] {
            let own = compose(&TransformComponents {
                translate_x: 50.0,
                translate_y: 50.0,
                angle: 20.0,
                flip_x: fx,
                flip_y: fy,
                ..Default::default()
            });
            let source = BBoxSource {
                size: Vec2::new(40.0, 20.0),
                uniform_stroke: 0.0,
                chain: PlaneChain::new(vec![own], Affine::IDENTITY),
            };
            let p = BBox::rotated(&source).get_coords().points();
            // Consistent winding: every turn has the same sign.
            let turns: Vec<f64> = (0..4)
                .map(|i| (p[(i + 1) % 4] - p[i]).cross(p[(i + 2) % 4] - p[(i + 1) % 4]))
                .collect();
            assert!(turns.iter().all(|t| *t > 0.0), "flip ({fx}, {fy}): {turns:?}");
        }
    }

    #[test]
    fn inflate_grows_each_side() {
        let b = BBox::from_transform(
            translate_matrix(200.0, 200.0) * scale_matrix(100.0, 100.0),
            Plane::Scene,
            PlaneChain::default(),
        );
        let c = b.inflate(25.0).get_coords();
        assert_eq!(c.tl, Point::new(125.0, 125.0));
        assert_eq!(c.br, Point::new(275.0, 275.0));

        let flat = BBox::from_transform(
            rotate_matrix(90.0) * scale_matrix(10.0, 0.0),
            Plane::Scene,
            PlaneChain::default(),
        );
        let dims = flat.inflate(1.0).get_dimensions_vector();
        assert!((dims.x - 12.0).abs() < 1e-9);
        assert!((dims.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn predicates_compare_in_scene_plane() {
        let big = BBox::from_transform(
            translate_matrix(-50.0, -50.0) * scale_matrix(200.0, 200.0),
            Plane::Scene,
            PlaneChain::default(),
        );
        let small = BBox::from_transform(
            translate_matrix(100.0, 100.0) * scale_matrix(100.0, 100.0),
            Plane::Scene,
            PlaneChain::default(),
        );
        assert!(big.intersects(&small));
        assert!(small.intersects(&big));
        assert!(!small.is_contained_by(&big));

        let inner = BBox::from_transform(
            rotate_matrix(45.0) * scale_matrix(20.0, 20.0),
            Plane::Scene,
            PlaneChain::default(),
        );
        assert!(!inner.intersects(&big));
        assert!(inner.is_contained_by(&big));
        assert!(inner.overlaps(&big) && big.overlaps(&inner));

        // A viewport box is compared after leaving the viewport plane.
        let area = BBox::viewport_area(100.0, 100.0, Affine::scale(2.0));
        assert!(!inner.is_contained_by(&area));
        assert!(area.overlaps(&inner));
        assert_corners(
            area.send_to_canvas().get_coords(),
            Corners::UNIT.transform(translate_matrix(25.0, 25.0) * scale_matrix(50.0, 50.0)),
        );
    }

    #[test]
    fn degenerate_boxes_answer_deterministically() {
        let line = BBox::from_transform(
            translate_matrix(5.0, 5.0) * scale_matrix(10.0, 0.0),
            Plane::Scene,
            PlaneChain::default(),
        );
        let square = BBox::from_transform(
            translate_matrix(5.0, 5.0) * scale_matrix(4.0, 4.0),
            Plane::Scene,
            PlaneChain::default(),
        );
        assert!(line.intersects(&square));
        assert!(!line.is_contained_by(&square));
        assert!(line.contains_point(Point::new(2.0, 5.0)));
    }
}
