// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object handles: coordinates, pointer lookup and visibility.

use kurbo::Point;
use trellis_controls::{Control, ControlCoords, ControlKey, ControlSet, CornerSizes, FoundControl};

use crate::log::debug;
use crate::scene::{Interaction, Scene};
use crate::types::{ObjectFlags, ObjectId};

impl Interaction {
    fn is_visible(&self, key: &ControlKey, control: &Control) -> bool {
        self.visibility.get(key).copied().unwrap_or(control.visible)
    }
}

impl Scene {
    /// Handle coordinates of `id` in the viewport plane.
    ///
    /// Handles surround the object's box grown by its padding. Without a
    /// canvas the viewport is the scene itself.
    pub fn get_control_coords(&self, id: ObjectId) -> Option<ControlCoords> {
        let node = self.node(id)?;
        let bbox = self.bbox(id)?;
        Some(node.cache.control_coords.get_or_compute(node.stamp, || {
            let sizes = CornerSizes {
                corner_size: node.interaction.corner_size,
                touch_corner_size: node.interaction.touch_corner_size,
            };
            let bbox = bbox.send_to_viewport().inflate(node.props.padding);
            ControlCoords::calc(&node.interaction.controls, &bbox, sizes)
        }))
    }

    /// The visible control of `id` under `pointer`, given in viewport coordinates.
    ///
    /// Only the active object of a scene with a canvas exposes its controls,
    /// and only when it has [`ObjectFlags::HAS_CONTROLS`]. Controls are tested
    /// in set order and the first hit wins; hit areas include their boundary.
    pub fn find_control(&self, id: ObjectId, pointer: Point, for_touch: bool) -> Option<FoundControl> {
        self.canvas()?;
        let node = self.node(id)?;
        if !node.interaction.flags.contains(ObjectFlags::HAS_CONTROLS) || self.active_object() != Some(id) {
            return None;
        }
        let coords = self.get_control_coords(id)?;
        coords.find(&node.interaction.controls, pointer, for_touch, |key, control| {
            node.interaction.is_visible(key, control)
        })
    }

    /// The control of `id` currently being manipulated.
    pub fn get_active_control(&self, id: ObjectId) -> Option<&ControlKey> {
        self.node(id)?.interaction.active_control.as_ref()
    }

    /// Mark `key` as the control of `id` being manipulated, or clear it.
    ///
    /// Returns `false` for stale ids and keys missing from the object's set.
    pub fn set_active_control(&mut self, id: ObjectId, key: Option<ControlKey>) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if key.as_ref().is_some_and(|k| !node.interaction.controls.contains(k)) {
            debug!(?id, ?key, "unknown control");
            return false;
        }
        node.interaction.active_control = key;
        true
    }

    /// Whether `key` is a visible control of `id`.
    pub fn is_control_visible(&self, id: ObjectId, key: &ControlKey) -> bool {
        self.node(id).is_some_and(|node| {
            node.interaction
                .controls
                .get(key)
                .is_some_and(|control| node.interaction.is_visible(key, control))
        })
    }

    /// Override the visibility of one control on `id`.
    pub fn set_control_visible(&mut self, id: ObjectId, key: ControlKey, visible: bool) -> bool {
        self.set_controls_visibility(id, [(key, visible)])
    }

    /// Override the visibility of several controls on `id`.
    pub fn set_controls_visibility(
        &mut self,
        id: ObjectId,
        visibility: impl IntoIterator<Item = (ControlKey, bool)>,
    ) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.interaction.visibility.extend(visibility);
        true
    }

    /// The control set of `id`.
    pub fn controls(&self, id: ObjectId) -> Option<&ControlSet> {
        Some(&self.node(id)?.interaction.controls)
    }

    /// Replace the control set of `id`.
    pub fn set_controls(&mut self, id: ObjectId, controls: ControlSet) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.interaction.controls = controls;
        if node
            .interaction
            .active_control
            .as_ref()
            .is_some_and(|k| !node.interaction.controls.contains(k))
        {
            node.interaction.active_control = None;
        }
        self.invalidate(id);
        true
    }

    /// Edit one control of `id` without affecting objects that share its set.
    pub fn customize_control(
        &mut self,
        id: ObjectId,
        key: &ControlKey,
        edit: impl FnOnce(&mut Control),
    ) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if !node.interaction.controls.customize(key, edit) {
            return false;
        }
        self.invalidate(id);
        true
    }

    /// Set the pointer and touch hit sizes of the handles of `id`.
    pub fn set_corner_size(&mut self, id: ObjectId, corner_size: f64, touch_corner_size: f64) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.interaction.corner_size = corner_size;
        node.interaction.touch_corner_size = touch_corner_size;
        self.invalidate(id);
        true
    }
}
