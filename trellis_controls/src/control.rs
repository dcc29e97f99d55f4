// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control descriptors.

use alloc::borrow::Cow;
use core::fmt;

use kurbo::{Point, Vec2};
use trellis_plane::matrix::{multiply, rotate_matrix, scale_matrix, translate_matrix};
use trellis_plane::vector::rotate_vector;
use trellis_plane::{BBox, Corners};

/// Name of a control within a [`ControlSet`](crate::ControlSet).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlKey(Cow<'static, str>);

impl ControlKey {
    /// Middle of the left edge.
    pub const ML: Self = Self::from_static("ml");
    /// Middle of the right edge.
    pub const MR: Self = Self::from_static("mr");
    /// Middle of the bottom edge.
    pub const MB: Self = Self::from_static("mb");
    /// Middle of the top edge.
    pub const MT: Self = Self::from_static("mt");
    /// Top-left corner.
    pub const TL: Self = Self::from_static("tl");
    /// Top-right corner.
    pub const TR: Self = Self::from_static("tr");
    /// Bottom-left corner.
    pub const BL: Self = Self::from_static("bl");
    /// Bottom-right corner.
    pub const BR: Self = Self::from_static("br");
    /// Rotation handle above the top edge.
    pub const MTR: Self = Self::from_static("mtr");

    /// Key from a static name.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Key from any name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The key's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ControlKey {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

/// What dragging a control does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControlAction {
    /// Scale both axes by the same factor.
    #[default]
    ScaleEqually,
    /// Scale along the object's x edge.
    ScaleX,
    /// Scale along the object's y edge.
    ScaleY,
    /// Rotate around the object's center.
    Rotate,
    /// Skew along the object's x edge.
    SkewX,
    /// Skew along the object's y edge.
    SkewY,
    /// The control has no built-in action.
    None,
}

impl ControlAction {
    /// Conventional action name, as reported to cursor and event layers.
    pub fn action_name(self) -> &'static str {
        match self {
            Self::ScaleEqually => "scale",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::Rotate => "rotate",
            Self::SkewX => "skewX",
            Self::SkewY => "skewY",
            Self::None => "none",
        }
    }
}

/// Line from the object's border to a detached handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    /// Start, on the object's box.
    pub from: Point,
    /// End, at the handle.
    pub to: Point,
}

/// Computes the handle center from the control and the object's box.
pub type PositionHandler = fn(&Control, &BBox) -> Point;

/// Computes the connection line given the handle center.
pub type ConnectionHandler = fn(&Control, Point, &BBox) -> Connection;

/// A reusable description of a draggable handle.
///
/// A control holds no per-object state. Objects share controls through a
/// [`ControlSet`](crate::ControlSet) and keep visibility overrides themselves.
#[derive(Clone, Debug)]
pub struct Control {
    /// Normalized x anchor within the box, in `[-0.5, 0.5]`.
    pub x: f64,
    /// Normalized y anchor within the box, in `[-0.5, 0.5]`.
    pub y: f64,
    /// Horizontal pixel offset, rotated with the box.
    pub offset_x: f64,
    /// Vertical pixel offset, rotated with the box.
    pub offset_y: f64,
    /// Pointer hit width; `None` uses the object's corner size.
    pub size_x: Option<f64>,
    /// Pointer hit height; `None` uses the object's corner size.
    pub size_y: Option<f64>,
    /// Touch hit width; `None` uses the object's touch corner size.
    pub touch_size_x: Option<f64>,
    /// Touch hit height; `None` uses the object's touch corner size.
    pub touch_size_y: Option<f64>,
    /// Default visibility, overridable per object.
    pub visible: bool,
    /// Behavior when dragged.
    pub action: ControlAction,
    /// Cursor shown while hovering.
    pub cursor_style: Cow<'static, str>,
    /// Whether a connection line is drawn to the box.
    pub with_connection: bool,
    /// Handle placement.
    pub position_handler: PositionHandler,
    /// Connection placement.
    pub connection_handler: ConnectionHandler,
}

impl Default for Control {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            size_x: None,
            size_y: None,
            touch_size_x: None,
            touch_size_y: None,
            visible: true,
            action: ControlAction::default(),
            cursor_style: Cow::Borrowed("crosshair"),
            with_connection: false,
            position_handler: default_position,
            connection_handler: default_connection,
        }
    }
}

impl Control {
    /// A control anchored at normalized `(x, y)` performing `action`.
    pub fn new(x: f64, y: f64, action: ControlAction) -> Self {
        Self {
            x,
            y,
            action,
            ..Self::default()
        }
    }

    /// Sets the pixel offset.
    pub fn with_offset(mut self, x: f64, y: f64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Sets an explicit pointer hit size.
    pub fn with_size(mut self, x: f64, y: f64) -> Self {
        self.size_x = Some(x);
        self.size_y = Some(y);
        self
    }

    /// Sets an explicit touch hit size.
    pub fn with_touch_size(mut self, x: f64, y: f64) -> Self {
        self.touch_size_x = Some(x);
        self.touch_size_y = Some(y);
        self
    }

    /// Draws a connection line to the box.
    pub fn with_connection(mut self) -> Self {
        self.with_connection = true;
        self
    }

    /// Sets the hover cursor.
    pub fn with_cursor(mut self, cursor: impl Into<Cow<'static, str>>) -> Self {
        self.cursor_style = cursor.into();
        self
    }

    /// Replaces the position handler.
    pub fn with_position_handler(mut self, handler: PositionHandler) -> Self {
        self.position_handler = handler;
        self
    }

    /// Normalized anchor as a point.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Handle center for an object whose box is `bbox`.
    pub fn position(&self, bbox: &BBox) -> Point {
        (self.position_handler)(self, bbox)
    }

    /// Connection line ending at `to`.
    pub fn connection(&self, to: Point, bbox: &BBox) -> Connection {
        (self.connection_handler)(self, to, bbox)
    }

    /// Hit quadrilateral of a handle centered at `center`.
    ///
    /// The unit square is mapped through `T(center) · R(angle) · S(size)`,
    /// where the size comes from the control or falls back to `object_size`.
    pub fn corner_coords(&self, angle: f64, object_size: f64, center: Point, is_touch: bool) -> Corners {
        let (sx, sy) = if is_touch {
            (self.touch_size_x, self.touch_size_y)
        } else {
            (self.size_x, self.size_y)
        };
        let t = multiply([
            Some(translate_matrix(center.x, center.y)),
            (angle != 0.0).then(|| rotate_matrix(angle)),
            Some(scale_matrix(
                sx.unwrap_or(object_size),
                sy.unwrap_or(object_size),
            )),
        ]);
        Corners::UNIT.transform(t)
    }

    /// Whether `pointer` falls inside the hit quadrilateral `corner`, boundary included.
    pub fn should_activate(&self, pointer: Point, corner: &Corners) -> bool {
        corner.contains(pointer)
    }
}

/// Anchor point on the box plus the offset rotated with the box.
pub fn default_position(control: &Control, bbox: &BBox) -> Point {
    bbox.point_from_origin(control.origin())
        + rotate_vector(
            Vec2::new(control.offset_x, control.offset_y),
            bbox.get_rotation(),
        )
}

/// From the anchor point on the box to the handle.
pub fn default_connection(control: &Control, to: Point, bbox: &BBox) -> Connection {
    Connection {
        from: bbox.point_from_origin(control.origin()),
        to,
    }
}
