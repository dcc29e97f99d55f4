// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Derived handle coordinates and pointer lookup.

use alloc::vec::Vec;

use kurbo::Point;
use trellis_plane::{BBox, Corners};

use crate::control::{Connection, Control, ControlKey};
use crate::set::ControlSet;

/// Default pointer hit size of a handle, in viewport pixels.
pub const DEFAULT_CORNER_SIZE: f64 = 13.0;
/// Default touch hit size of a handle, in viewport pixels.
pub const DEFAULT_TOUCH_CORNER_SIZE: f64 = 24.0;

/// Object-level handle sizes used when a control does not set its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerSizes {
    /// Pointer hit size.
    pub corner_size: f64,
    /// Touch hit size.
    pub touch_corner_size: f64,
}

impl Default for CornerSizes {
    fn default() -> Self {
        Self {
            corner_size: DEFAULT_CORNER_SIZE,
            touch_corner_size: DEFAULT_TOUCH_CORNER_SIZE,
        }
    }
}

/// Where one handle is and what area activates it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlCoord {
    /// Handle center.
    pub position: Point,
    /// Line from the box to the handle.
    pub connection: Connection,
    /// Pointer hit quadrilateral.
    pub corner: Corners,
    /// Touch hit quadrilateral.
    pub touch_corner: Corners,
}

/// The handle coordinates of one object, in control-set order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlCoords {
    entries: Vec<(ControlKey, ControlCoord)>,
}

/// A control found under the pointer.
#[derive(Clone, Debug)]
pub struct FoundControl {
    /// Key of the control.
    pub key: ControlKey,
    /// The control descriptor.
    pub control: Control,
    /// Its coordinates.
    pub coord: ControlCoord,
}

impl ControlCoords {
    /// Derives the coordinates of every control in `set` from `bbox`.
    ///
    /// Hit quadrilaterals are turned by the box rotation so handles rotate
    /// with the object.
    pub fn calc(set: &ControlSet, bbox: &BBox, sizes: CornerSizes) -> Self {
        let angle = bbox.get_rotation().to_degrees();
        let entries = set
            .iter()
            .map(|(key, control)| {
                let position = control.position(bbox);
                let coord = ControlCoord {
                    position,
                    connection: control.connection(position, bbox),
                    corner: control.corner_coords(angle, sizes.corner_size, position, false),
                    touch_corner: control.corner_coords(
                        angle,
                        sizes.touch_corner_size,
                        position,
                        true,
                    ),
                };
                (key.clone(), coord)
            })
            .collect();
        Self { entries }
    }

    /// Coordinates of `key`.
    pub fn get(&self, key: &ControlKey) -> Option<&ControlCoord> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Entries in control-set order.
    pub fn iter(&self) -> impl Iterator<Item = (&ControlKey, &ControlCoord)> + '_ {
        self.entries.iter().map(|(k, c)| (k, c))
    }

    /// Number of handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no handles.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first control, in set order, whose hit area contains `pointer`.
    ///
    /// `gate` decides whether a control may activate at all (for example the
    /// owning object must be active and the control visible). Controls that
    /// are no longer in `set` are skipped.
    pub fn find(
        &self,
        set: &ControlSet,
        pointer: Point,
        for_touch: bool,
        mut gate: impl FnMut(&ControlKey, &Control) -> bool,
    ) -> Option<FoundControl> {
        self.entries.iter().find_map(|(key, coord)| {
            let control = set.get(key)?;
            let area = if for_touch {
                &coord.touch_corner
            } else {
                &coord.corner
            };
            (gate(key, control) && control.should_activate(pointer, area)).then(|| FoundControl {
                key: key.clone(),
                control: control.clone(),
                coord: *coord,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_plane::matrix::{scale_matrix, translate_matrix};
    use trellis_plane::{Plane, PlaneChain};

    fn box_at(x: f64, y: f64, w: f64, h: f64) -> BBox {
        BBox::from_transform(
            translate_matrix(x + w / 2.0, y + h / 2.0) * scale_matrix(w, h),
            Plane::Viewport,
            PlaneChain::default(),
        )
    }

    fn assert_pt(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn default_handles_on_unrotated_box() {
        let coords = ControlCoords::calc(
            &ControlSet::defaults(),
            &box_at(150.0, 150.0, 100.0, 100.0),
            CornerSizes::default(),
        );
        assert_eq!(coords.len(), 9);
        assert_pt(coords.get(&ControlKey::TL).unwrap().position, Point::new(150.0, 150.0));
        assert_pt(coords.get(&ControlKey::TR).unwrap().position, Point::new(250.0, 150.0));
        let mtr = coords.get(&ControlKey::MTR).unwrap();
        assert_pt(mtr.position, Point::new(200.0, 110.0));
        assert_pt(mtr.connection.from, Point::new(200.0, 150.0));
        assert_pt(mtr.connection.to, mtr.position);
    }

    #[test]
    fn hit_areas_match_corner_sizes() {
        let coords = ControlCoords::calc(
            &ControlSet::defaults(),
            &box_at(10.0, 10.0, 10.0, 10.0),
            CornerSizes::default(),
        );
        let tl = coords.get(&ControlKey::TL).unwrap();
        assert_pt(tl.corner.tl, Point::new(3.5, 3.5));
        assert_pt(tl.corner.br, Point::new(16.5, 16.5));
        assert_pt(tl.touch_corner.tl, Point::new(-2.0, -2.0));
        let bl = coords.get(&ControlKey::BL).unwrap();
        assert_pt(bl.corner.tl, Point::new(3.5, 13.5));
        assert_pt(bl.corner.br, Point::new(16.5, 26.5));
        let mtr = coords.get(&ControlKey::MTR).unwrap();
        assert_pt(mtr.corner.tl, Point::new(8.5, -36.5));
        assert_pt(mtr.corner.br, Point::new(21.5, -23.5));
    }

    #[test]
    fn first_match_in_set_order_wins() {
        let set = ControlSet::defaults();
        // On a tiny box every handle overlaps; `ml` comes first.
        let coords = ControlCoords::calc(&set, &box_at(0.0, 0.0, 2.0, 2.0), CornerSizes::default());
        let found = coords.find(&set, Point::new(1.0, 1.0), false, |_, _| true).unwrap();
        assert_eq!(found.key, ControlKey::ML);
        // Gating out `ml` hands the pointer to the next candidate.
        let found = coords
            .find(&set, Point::new(1.0, 1.0), false, |k, _| *k != ControlKey::ML)
            .unwrap();
        assert_eq!(found.key, ControlKey::MR);
        assert!(coords.find(&set, Point::new(1.0, 1.0), false, |_, _| false).is_none());
    }

    #[test]
    fn boundary_and_touch_sizes() {
        let set = ControlSet::defaults();
        let coords = ControlCoords::calc(&set, &box_at(100.0, 100.0, 100.0, 100.0), CornerSizes::default());
        let on_edge = Point::new(100.0 - 6.5, 100.0 - 6.5);
        let found = coords.find(&set, on_edge, false, |_, _| true).unwrap();
        assert_eq!(found.key, ControlKey::TL);
        let outside = Point::new(100.0 - 10.0, 100.0);
        assert!(coords.find(&set, outside, false, |_, _| true).is_none());
        let found = coords.find(&set, outside, true, |_, _| true).unwrap();
        assert_eq!(found.key, ControlKey::TL);
    }
}
