// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stamp-keyed memoization for derived geometry.

use core::cell::RefCell;

use kurbo::Affine;
use trellis_controls::ControlCoords;
use trellis_plane::BBox;

/// A value computed for one geometry stamp.
///
/// Reads with a different stamp recompute. The borrow is released while
/// computing, so computations may read other caches.
#[derive(Debug)]
pub(crate) struct Cached<T>(RefCell<Option<(u64, T)>>);

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self(RefCell::new(None))
    }
}

impl<T> Cached<T> {
    /// Forget the value so the next read recomputes, whatever its stamp.
    pub(crate) fn clear(&mut self) {
        *self.0.get_mut() = None;
    }
}

impl<T: Clone> Cached<T> {
    pub(crate) fn get_or_compute(&self, stamp: u64, compute: impl FnOnce() -> T) -> T {
        if let Some((cached_stamp, value)) = self.0.borrow().as_ref() {
            if *cached_stamp == stamp {
                return value.clone();
            }
        }
        let value = compute();
        *self.0.borrow_mut() = Some((stamp, value.clone()));
        value
    }

    pub(crate) fn is_fresh(&self, stamp: u64) -> bool {
        matches!(self.0.borrow().as_ref(), Some((s, _)) if *s == stamp)
    }
}

/// Derived geometry of one object.
#[derive(Debug, Default)]
pub(crate) struct GeometryCache {
    pub(crate) own_matrix: Cached<Affine>,
    pub(crate) transform_matrix: Cached<Affine>,
    pub(crate) bbox: Cached<BBox>,
    pub(crate) control_coords: Cached<ControlCoords>,
}
