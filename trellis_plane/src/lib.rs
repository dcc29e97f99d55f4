// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Plane: coordinate planes and oriented bounding boxes for Kurbo.
//!
//! Trellis Plane is the geometric foundation of the Trellis scene crates. It
//! answers three questions about a quadrilateral in a nested scene:
//! where it is, in which coordinate plane, and which way it faces.
//!
//! - [`matrix`]: compose and decompose [`kurbo::Affine`] matrices, guarded inversion,
//!   and chain multiplication with optional factors.
//! - [`plane`]: re-express points and vectors between planes, and build base-change
//!   matrices used to shear along an object's visual edges.
//! - [`intersection`]: inclusive point-in-polygon and polygon intersection tests.
//! - [`BBox`]: an immutable oriented box anchored in a [`Plane`], with corner lookup,
//!   origin translation, plane conversion and overlap predicates.
//!
//! ## Conventions
//!
//! - Matrices multiply right to left: `m1 * m2` applies `m2` first.
//! - A plane is described by the matrix taking it into the scene plane.
//! - Normalized origins range over `[-0.5, 0.5]`: `(-0.5, -0.5)` is the top-left
//!   corner and `(0, 0)` the center.
//! - Corners are always reported as `tl, tr, br, bl`, a consistent traversal of the box.
//!
//! ## Degenerate input
//!
//! Nothing in this crate panics on numeric input. Inverting a singular matrix
//! through [`matrix::invert`] yields the identity (and a `warn` event when the
//! `tracing` feature is on); [`matrix::try_invert`] reports
//! [`MatrixError::Singular`] instead. Scale factors are kept away from zero
//! with [`matrix::constrain_scale`].
//!
//! ## Example
//!
//! ```
//! use kurbo::{Affine, Point, Vec2};
//! use trellis_plane::{BBox, BBoxSource, Plane, PlaneChain};
//!
//! // A 100 × 50 object rotated by 90° and centered at (200, 100),
//! // inside a group that is offset by (10, 0).
//! let own = Affine::translate(Vec2::new(200.0, 100.0)) * Affine::rotate(core::f64::consts::FRAC_PI_2);
//! let group = Affine::translate(Vec2::new(10.0, 0.0));
//! let source = BBoxSource {
//!     size: Vec2::new(100.0, 50.0),
//!     uniform_stroke: 0.0,
//!     chain: PlaneChain::new(vec![own, group], Affine::IDENTITY),
//! };
//!
//! let bbox = BBox::rotated(&source);
//! assert_eq!(bbox.plane(), Plane::Scene);
//! let center = bbox.point_from_origin(Point::ORIGIN);
//! assert!((center - Point::new(210.0, 100.0)).hypot() < 1e-9);
//!
//! // The same box in the group's plane.
//! let local = bbox.send_to_plane(Plane::PARENT);
//! assert!((local.center() - Point::new(200.0, 100.0)).hypot() < 1e-9);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod log;

pub mod bbox;
pub mod intersection;
pub mod matrix;
pub mod plane;
pub mod vector;

pub use bbox::{BBox, BBoxSource, Corners, Plane, PlaneChain};
pub use matrix::{MatrixError, TransformComponents};
