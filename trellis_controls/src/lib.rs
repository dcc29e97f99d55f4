// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Controls: interactive handle descriptors for oriented boxes.
//!
//! A [`Control`] describes one draggable handle: where it sits relative to an
//! object's box, how far it is offset, how large its hit area is, and what a
//! drag does. Controls are stateless templates collected in a [`ControlSet`],
//! which objects share until one of them customizes its copy.
//!
//! [`ControlCoords::calc`] turns a set and a [`trellis_plane::BBox`] into the
//! handle positions, connection lines and hit quadrilaterals for one frame, and
//! [`ControlCoords::find`] resolves which handle is under a pointer.
//!
//! ## Lookup order
//!
//! Handles are tested in set insertion order and the first hit wins. This is a
//! contract: overlapping handles on a small object resolve to whichever was
//! registered first (`ml` for the default set). Hit areas include their boundary.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Affine, Point, Vec2};
//! use trellis_controls::{ControlCoords, ControlKey, ControlSet, CornerSizes};
//! use trellis_plane::{BBox, Plane, PlaneChain};
//!
//! let bbox = BBox::from_transform(
//!     Affine::translate(Vec2::new(200.0, 200.0)) * Affine::scale(100.0),
//!     Plane::Viewport,
//!     PlaneChain::default(),
//! );
//! let set = ControlSet::defaults();
//! let coords = ControlCoords::calc(&set, &bbox, CornerSizes::default());
//!
//! let rotate = coords.get(&ControlKey::MTR).unwrap();
//! assert_eq!(rotate.position, Point::new(200.0, 110.0));
//!
//! let hit = coords.find(&set, Point::new(252.0, 148.0), false, |_, _| true);
//! assert_eq!(hit.map(|f| f.key), Some(ControlKey::TR));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod control;
pub mod coords;
pub mod set;

pub use control::{
    Connection, ConnectionHandler, Control, ControlAction, ControlKey, PositionHandler,
    default_connection, default_position,
};
pub use coords::{
    ControlCoord, ControlCoords, CornerSizes, DEFAULT_CORNER_SIZE, DEFAULT_TOUCH_CORNER_SIZE,
    FoundControl,
};
pub use set::ControlSet;
