// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon predicates for arbitrarily oriented quadrilaterals.
//!
//! Boundaries are inclusive everywhere: a point on an edge is inside, and
//! touching or collinear-overlapping segments intersect.

use kurbo::{Point, Rect};

/// Distance under which a point counts as lying on a segment.
pub const EDGE_EPSILON: f64 = 1e-9;

fn orientation(a: Point, b: Point, p: Point) -> f64 {
    (b - a).cross(p - a)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let edge = b - a;
    let len2 = edge.hypot2();
    if len2 == 0.0 {
        return (p - a).hypot();
    }
    let t = ((p - a).dot(edge) / len2).clamp(0.0, 1.0);
    (p - (a + edge * t)).hypot()
}

fn edges(poly: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    poly.iter()
        .zip(poly.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
}

/// Whether `p` lies inside `poly` or on its boundary.
///
/// Uses the crossing-number rule, so any simple polygon works; convex
/// quadrilaterals under rotation and skew are the common case.
pub fn point_in_polygon(p: Point, poly: &[Point]) -> bool {
    if poly.is_empty() {
        return false;
    }
    if edges(poly).any(|(a, b)| distance_to_segment(p, a, b) <= EDGE_EPSILON) {
        return true;
    }
    let mut inside = false;
    for (a, b) in edges(poly) {
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Whether segment `a1`–`a2` meets segment `b1`–`b2`, endpoints included.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);
    let straddles = |x: f64, y: f64| (x > 0.0 && y < 0.0) || (x < 0.0 && y > 0.0);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }
    distance_to_segment(a1, b1, b2) <= EDGE_EPSILON
        || distance_to_segment(a2, b1, b2) <= EDGE_EPSILON
        || distance_to_segment(b1, a1, a2) <= EDGE_EPSILON
        || distance_to_segment(b2, a1, a2) <= EDGE_EPSILON
}

/// Whether any edge of `a` meets any edge of `b`.
///
/// One polygon lying strictly inside the other is not an intersection; combine
/// with [`point_in_polygon`] for overlap.
pub fn polygons_intersect(a: &[Point], b: &[Point]) -> bool {
    edges(a).any(|(a1, a2)| edges(b).any(|(b1, b2)| segments_intersect(a1, a2, b1, b2)))
}

/// Whether `poly` lies entirely inside `container`, boundary included.
pub fn polygon_contained_in(poly: &[Point], container: &[Point]) -> bool {
    !poly.is_empty() && poly.iter().all(|p| point_in_polygon(*p, container))
}

/// Whether an edge of `poly` meets an edge of the axis-aligned rectangle `tl`–`br`.
pub fn polygon_intersects_rect(poly: &[Point], tl: Point, br: Point) -> bool {
    polygons_intersect(poly, &rect_points(Rect::from_points(tl, br)))
}

/// Corners of `rect` in `tl, tr, br, bl` order.
pub fn rect_points(rect: Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
}

/// Smallest axis-aligned rectangle containing `points`, or [`Rect::ZERO`] when empty.
pub fn bounding_rect(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}
