// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: object identifiers, flags, origins, canvas and options.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect};
use trellis_controls::{ControlSet, DEFAULT_CORNER_SIZE, DEFAULT_TOUCH_CORNER_SIZE};
use trellis_plane::BBox;

/// Identifier for an object in a [`Scene`](crate::Scene).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ObjectId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ObjectId`.
///
/// Stale ids never alias a different live object. Every scene operation
/// treats a stale id as absent: queries return `None` and mutations report
/// that nothing changed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObjectId(pub(crate) u32, pub(crate) u32);

impl ObjectId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-object interaction switches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u16 {
        /// Controls are shown and hit-tested while the object is active.
        const HAS_CONTROLS     = 0b0000_0000_0001;
        /// A border is drawn around the object while it is active.
        const HAS_BORDERS      = 0b0000_0000_0010;
        /// The object can become the active object.
        const SELECTABLE       = 0b0000_0000_0100;
        /// Dragging cannot move the object horizontally.
        const LOCK_MOVEMENT_X  = 0b0000_0000_1000;
        /// Dragging cannot move the object vertically.
        const LOCK_MOVEMENT_Y  = 0b0000_0001_0000;
        /// Rotation gestures are ignored.
        const LOCK_ROTATION    = 0b0000_0010_0000;
        /// Scaling gestures keep the horizontal scale.
        const LOCK_SCALING_X   = 0b0000_0100_0000;
        /// Scaling gestures keep the vertical scale.
        const LOCK_SCALING_Y   = 0b0000_1000_0000;
        /// Horizontal skew gestures are ignored.
        const LOCK_SKEWING_X   = 0b0001_0000_0000;
        /// Vertical skew gestures are ignored.
        const LOCK_SKEWING_Y   = 0b0010_0000_0000;
        /// Scaling gestures cannot flip the object through its anchor.
        const LOCK_SCALING_FLIP = 0b0100_0000_0000;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::HAS_CONTROLS | Self::HAS_BORDERS | Self::SELECTABLE
    }
}

/// Horizontal origin of an object or anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum OriginX {
    /// The left edge.
    #[default]
    Left,
    /// The horizontal center.
    Center,
    /// The right edge.
    Right,
    /// A fraction of the width, `0.0` at the left edge and `1.0` at the right.
    Fraction(f64),
}

impl OriginX {
    /// Offset from the center in units of the width, `-0.5` for the left edge.
    pub fn offset(self) -> f64 {
        match self {
            Self::Left => -0.5,
            Self::Center => 0.0,
            Self::Right => 0.5,
            Self::Fraction(v) => v - 0.5,
        }
    }
}

/// Vertical origin of an object or anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum OriginY {
    /// The top edge.
    #[default]
    Top,
    /// The vertical center.
    Center,
    /// The bottom edge.
    Bottom,
    /// A fraction of the height, `0.0` at the top edge and `1.0` at the bottom.
    Fraction(f64),
}

impl OriginY {
    /// Offset from the center in units of the height, `-0.5` for the top edge.
    pub fn offset(self) -> f64 {
        match self {
            Self::Top => -0.5,
            Self::Center => 0.0,
            Self::Bottom => 0.5,
            Self::Fraction(v) => v - 0.5,
        }
    }
}

/// A point on an object named by its origins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Anchor {
    /// Horizontal origin.
    pub x: OriginX,
    /// Vertical origin.
    pub y: OriginY,
}

impl Anchor {
    /// The center of the object.
    pub const CENTER: Self = Self::new(OriginX::Center, OriginY::Center);
    /// The top-left corner.
    pub const TOP_LEFT: Self = Self::new(OriginX::Left, OriginY::Top);
    /// The top-right corner.
    pub const TOP_RIGHT: Self = Self::new(OriginX::Right, OriginY::Top);
    /// The bottom-right corner.
    pub const BOTTOM_RIGHT: Self = Self::new(OriginX::Right, OriginY::Bottom);
    /// The bottom-left corner.
    pub const BOTTOM_LEFT: Self = Self::new(OriginX::Left, OriginY::Bottom);

    /// Creates an anchor from its origins.
    pub const fn new(x: OriginX, y: OriginY) -> Self {
        Self { x, y }
    }

    /// The anchor at normalized offset `p`, whose components range over `[-0.5, 0.5]`.
    pub fn from_offset(p: Point) -> Self {
        Self::new(OriginX::Fraction(p.x + 0.5), OriginY::Fraction(p.y + 0.5))
    }

    /// Normalized offset from the center, `(-0.5, -0.5)` for the top-left corner.
    pub fn offset(self) -> Point {
        Point::new(self.x.offset(), self.y.offset())
    }
}

/// One of the two axes of an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The horizontal axis.
    X,
    /// The vertical axis.
    Y,
}

/// How a group sizes itself around its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutStrategy {
    /// The group keeps its own size and position.
    #[default]
    Fixed,
    /// On [`Scene::commit`](crate::Scene::commit), the group is resized and
    /// re-centered to the bounds of its children, which keep their scene position.
    FitContent,
}

/// The surface a scene is displayed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Canvas {
    /// Width in viewport units.
    pub width: f64,
    /// Height in viewport units.
    pub height: f64,
    /// Matrix taking scene coordinates to viewport coordinates (pan and zoom).
    pub viewport_transform: Affine,
    /// Device pixel ratio applied on top of the viewport.
    pub retina_scaling: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(300.0, 150.0)
    }
}

impl Canvas {
    /// A canvas of the given size with an identity viewport.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            viewport_transform: Affine::IDENTITY,
            retina_scaling: 1.0,
        }
    }

    /// Sets the viewport transform.
    pub fn with_viewport_transform(mut self, viewport_transform: Affine) -> Self {
        self.viewport_transform = viewport_transform;
        self
    }

    /// Sets the device pixel ratio.
    pub fn with_retina_scaling(mut self, retina_scaling: f64) -> Self {
        self.retina_scaling = retina_scaling;
        self
    }

    /// The horizontal zoom factor of the viewport.
    pub fn zoom(&self) -> f64 {
        self.viewport_transform.as_coeffs()[0]
    }

    /// The visible area as a box in the viewport plane.
    pub fn area(&self) -> BBox {
        BBox::viewport_area(self.width, self.height, self.viewport_transform)
    }
}

/// Scene-wide settings.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Control hit-area size given to new objects.
    pub corner_size: f64,
    /// Control hit-area size for touch input given to new objects.
    pub touch_corner_size: f64,
    /// Controls given to new objects. Objects share this set until one customizes it.
    pub controls: ControlSet,
    /// Tolerance under which a transform is considered a no-op.
    pub epsilon: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            corner_size: DEFAULT_CORNER_SIZE,
            touch_corner_size: DEFAULT_TOUCH_CORNER_SIZE,
            controls: ControlSet::defaults(),
            epsilon: 1e-9,
        }
    }
}

/// Options shared by the plane-aware transform operations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformOptions {
    /// The point held fixed; defaults to the object's own origin.
    pub anchor: Option<Anchor>,
    /// Interpret the transform in the viewport plane instead of the scene plane.
    pub in_viewport: bool,
}

impl TransformOptions {
    /// Options holding `anchor` fixed, in the scene plane.
    pub fn around(anchor: Anchor) -> Self {
        Self {
            anchor: Some(anchor),
            in_viewport: false,
        }
    }

    /// The same options, interpreted in the viewport plane.
    pub fn in_viewport(mut self) -> Self {
        self.in_viewport = true;
        self
    }
}

/// The transform-related properties of an object, as saved by
/// [`Scene::save_object_transform`](crate::Scene::save_object_transform).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SavedTransform {
    /// Horizontal position of the origin.
    pub left: f64,
    /// Vertical position of the origin.
    pub top: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Horizontal skew in degrees.
    pub skew_x: f64,
    /// Vertical skew in degrees.
    pub skew_y: f64,
    /// Rotation in degrees.
    pub angle: f64,
    /// Horizontal mirroring.
    pub flip_x: bool,
    /// Vertical mirroring.
    pub flip_y: bool,
}

/// Groups resized by [`Scene::commit`](crate::Scene::commit), and the scene areas that changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutReport {
    /// Groups whose layout changed, deepest first.
    pub groups: Vec<ObjectId>,
    /// Scene-space bounding rectangles of the groups before and after layout.
    pub dirty_rects: Vec<Rect>,
}

impl LayoutReport {
    /// Returns the union of all dirty rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }
}

/// Errors reported by structural scene operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The id does not refer to a live object.
    #[error("object {0:?} is not alive")]
    StaleId(ObjectId),
    /// The id refers to an object that cannot hold children.
    #[error("object {0:?} is not a group")]
    NotAGroup(ObjectId),
    /// The operation would make a group its own ancestor.
    #[error("moving {child:?} into {group:?} would create a cycle")]
    Cycle {
        /// The object being moved.
        child: ObjectId,
        /// The intended parent.
        group: ObjectId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_offsets() {
        assert_eq!(OriginX::Left.offset(), -0.5);
        assert_eq!(OriginX::Right.offset(), 0.5);
        assert_eq!(OriginX::Fraction(0.25).offset(), -0.25);
        assert_eq!(OriginY::Bottom.offset(), 0.5);
        assert_eq!(OriginY::Fraction(1.0).offset(), 0.5);
        assert_eq!(Anchor::CENTER.offset(), Point::ORIGIN);
    }

    #[test]
    fn anchor_from_offset_round_trips() {
        let anchor = Anchor::from_offset(Point::new(0.5, -0.5));
        assert_eq!(anchor.offset(), Point::new(0.5, -0.5));
    }

    #[test]
    fn default_canvas_and_flags() {
        let canvas = Canvas::default();
        assert_eq!((canvas.width, canvas.height), (300.0, 150.0));
        assert_eq!(canvas.zoom(), 1.0);
        let flags = ObjectFlags::default();
        assert!(flags.contains(ObjectFlags::HAS_CONTROLS | ObjectFlags::SELECTABLE));
        assert!(!flags.intersects(ObjectFlags::LOCK_ROTATION));
    }

    #[test]
    fn report_union() {
        let report = LayoutReport {
            groups: Vec::new(),
            dirty_rects: alloc::vec![Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, 5.0, 6.0, 8.0)],
        };
        assert_eq!(report.union_rect(), Some(Rect::new(0.0, 0.0, 6.0, 8.0)));
        assert_eq!(LayoutReport::default().union_rect(), None);
    }
}
