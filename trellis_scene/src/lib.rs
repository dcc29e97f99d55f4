// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Scene: a retained scene of transformable objects for editors.
//!
//! A [`Scene`] owns objects described by [`ObjectProps`] (position, size,
//! scale, skew, angle, flips, origin and stroke) and groups whose children are
//! expressed in the group's plane. Everything an editing surface needs is
//! derived from those properties:
//!
//! - matrices from an object's plane to its parent, the scene and the viewport;
//! - an oriented [`BBox`] with corner coordinates and bounding rectangles;
//! - origin-aware positioning (`get_xy`, `set_xy`, origin translation);
//! - overlap, containment and on-screen predicates;
//! - anchor-preserving transforms (`translate`, `scale`, `rotate`, `skew`,
//!   `shear`, `flip`) in the scene or viewport plane;
//! - control handles, pointer lookup and the [`Gesture`]s they drive;
//! - deferred fit-content layout of groups through [`Scene::commit`].
//!
//! ## Identifiers
//!
//! Objects are addressed by generational [`ObjectId`]s. Once an object is
//! removed its id goes stale: queries return `None` and mutations return
//! `false` instead of touching whichever object reuses the slot.
//!
//! ## Caching
//!
//! Derived geometry is memoized per object against a geometry stamp. Any
//! change to an object's properties restamps it and its descendants, except
//! padding, which only refreshes the object's handles. Canvas and viewport
//! changes restamp every object. Reads take `&self`. A transform
//! that leaves an object where it was changes nothing, so it neither
//! invalidates caches nor requests a layout.
//!
//! ## Example
//!
//! ```
//! use kurbo::Point;
//! use trellis_scene::{Anchor, Canvas, ControlKey, ObjectProps, Scene, TransformOptions};
//!
//! let mut scene = Scene::new();
//! scene.attach_canvas(Canvas::new(800.0, 600.0));
//! let square = scene
//!     .insert(None, ObjectProps { stroke_width: 0.0, ..ObjectProps::new(150.0, 150.0, 100.0, 100.0) })
//!     .unwrap();
//!
//! // Handles respond once the object is active.
//! scene.set_active_object(Some(square));
//! let hit = scene.find_control(square, Point::new(250.0, 150.0), false);
//! assert_eq!(hit.map(|found| found.key), Some(ControlKey::TR));
//!
//! // Turn a quarter around the center; the center stays put.
//! assert!(scene.rotate(square, 90.0, TransformOptions::around(Anchor::CENTER)));
//! let center = scene.get_center_point(square).unwrap();
//! assert!((center - Point::new(200.0, 200.0)).hypot() < 1e-9);
//! assert!(scene.is_on_screen(square).unwrap());
//! ```
//!
//! ## Features
//!
//! - `std` (default): use the standard library's float functions.
//! - `libm`: use `libm` instead, for `no_std` targets.
//! - `tracing`: emit `tracing` events for ignored operations, no-op transforms,
//!   singular matrices and layout passes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod controls;
mod geometry;
mod gesture;
mod layout;
mod log;
mod props;
mod scene;
mod transform;
mod types;

pub use gesture::{Gesture, GestureKind};
pub use props::ObjectProps;
pub use scene::Scene;
pub use types::{
    Anchor, Axis, Canvas, LayoutReport, LayoutStrategy, ObjectFlags, ObjectId, OriginX, OriginY,
    SavedTransform, SceneConfig, SceneError, TransformOptions,
};

pub use trellis_controls::{
    Control, ControlAction, ControlCoord, ControlCoords, ControlKey, ControlSet, FoundControl,
};
pub use trellis_plane::{BBox, Corners, Plane};
