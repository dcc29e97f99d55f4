// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: storage, structure, invalidation, canvas state.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Affine;
use trellis_controls::{ControlKey, ControlSet};
use trellis_plane::matrix::{invert, try_invert};

use crate::cache::GeometryCache;
use crate::log::{debug, warn};
use crate::props::ObjectProps;
use crate::types::{Canvas, LayoutStrategy, ObjectFlags, ObjectId, SceneConfig, SceneError};

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// A retained scene of transformable objects.
///
/// Objects live in generational slots; groups own ordered children whose
/// properties are expressed in the group's plane. Derived geometry (matrices,
/// boxes, control coordinates) is computed lazily and memoized against a
/// per-object stamp that every geometric change refreshes for the whole subtree.
pub struct Scene {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    epoch: u64,
    canvas: Option<Canvas>,
    active: Option<ObjectId>,
    config: SceneConfig,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let objects = self.nodes.iter().flatten();
        f.debug_struct("Scene")
            .field("objects", &objects.clone().count())
            .field("groups", &objects.filter(|n| n.group.is_some()).count())
            .field("canvas", &self.canvas)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

/// Interaction state carried by every object.
#[derive(Clone, Debug)]
pub(crate) struct Interaction {
    pub(crate) flags: ObjectFlags,
    pub(crate) corner_size: f64,
    pub(crate) touch_corner_size: f64,
    pub(crate) controls: ControlSet,
    pub(crate) visibility: BTreeMap<ControlKey, bool>,
    pub(crate) active_control: Option<ControlKey>,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct GroupState {
    pub(crate) layout: LayoutStrategy,
    pub(crate) needs_layout: bool,
}

#[derive(Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<ObjectId>,
    pub(crate) children: Vec<ObjectId>,
    pub(crate) props: ObjectProps,
    pub(crate) interaction: Interaction,
    pub(crate) group: Option<GroupState>,
    pub(crate) stamp: u64,
    pub(crate) cache: GeometryCache,
}

impl Scene {
    /// Create an empty scene with default settings.
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty scene with `config`.
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
            canvas: None,
            active: None,
            config,
        }
    }

    /// Scene-wide settings.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Insert an object as a child of `parent` (or as a root if `None`).
    ///
    /// `props` are expressed in the parent's plane.
    pub fn insert(
        &mut self,
        parent: Option<ObjectId>,
        props: ObjectProps,
    ) -> Result<ObjectId, SceneError> {
        self.insert_node(parent, props, None)
    }

    /// Insert a group as a child of `parent` (or as a root if `None`).
    pub fn insert_group(
        &mut self,
        parent: Option<ObjectId>,
        props: ObjectProps,
        layout: LayoutStrategy,
    ) -> Result<ObjectId, SceneError> {
        self.insert_node(
            parent,
            props,
            Some(GroupState {
                layout,
                needs_layout: false,
            }),
        )
    }

    fn insert_node(
        &mut self,
        parent: Option<ObjectId>,
        mut props: ObjectProps,
        group: Option<GroupState>,
    ) -> Result<ObjectId, SceneError> {
        if let Some(p) = parent {
            self.check_group(p)?;
        }
        props.constrain_scales();
        self.epoch += 1;
        let stamp = self.epoch;
        let interaction = Interaction {
            flags: ObjectFlags::default(),
            corner_size: self.config.corner_size,
            touch_corner_size: self.config.touch_corner_size,
            controls: self.config.controls.clone(),
            visibility: BTreeMap::new(),
            active_control: None,
        };
        let make = |generation| Node {
            generation,
            parent: None,
            children: Vec::new(),
            props,
            interaction,
            group,
            stamp,
            cache: GeometryCache::default(),
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(make(generation));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(make(generation)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ObjectId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = ObjectId::new(idx, generation);
        if let Some(p) = parent {
            self.link_parent(id, p);
            self.mark_layout(p);
        }
        Ok(id)
    }

    /// Remove an object (and its subtree) from the scene.
    ///
    /// Returns `false` if `id` was already stale.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            self.unlink_parent(id, parent);
            self.mark_layout(parent);
        }
        self.free_subtree(id);
        true
    }

    fn free_subtree(&mut self, id: ObjectId) {
        let children = self.node(id).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.free_subtree(child);
        }
        if self.active == Some(id) {
            self.active = None;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `child` into `group`, keeping its position in the scene.
    pub fn add_to_group(&mut self, child: ObjectId, group: ObjectId) -> Result<(), SceneError> {
        if !self.is_alive(child) {
            return Err(SceneError::StaleId(child));
        }
        self.check_group(group)?;
        if child == group || self.is_ancestor(child, group) {
            return Err(SceneError::Cycle { child, group });
        }
        if self.parent(child) == Some(group) {
            return Ok(());
        }
        let total = self.calc_transform_matrix(child).unwrap_or(Affine::IDENTITY);
        let group_total = self.calc_transform_matrix(group).unwrap_or(Affine::IDENTITY);
        if let Some(old) = self.parent(child) {
            self.unlink_parent(child, old);
            self.mark_layout(old);
        }
        self.link_parent(child, group);
        self.write_own_matrix(child, invert(group_total) * total);
        self.mark_layout(group);
        Ok(())
    }

    /// Detach `child` from its group, making it a root that keeps its position in the scene.
    pub fn remove_from_group(&mut self, child: ObjectId) -> Result<(), SceneError> {
        if !self.is_alive(child) {
            return Err(SceneError::StaleId(child));
        }
        let Some(group) = self.parent(child) else {
            return Ok(());
        };
        let total = self.calc_transform_matrix(child).unwrap_or(Affine::IDENTITY);
        self.unlink_parent(child, group);
        self.write_own_matrix(child, total);
        self.mark_layout(group);
        Ok(())
    }

    /// Returns true if `id` refers to a live object.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.node(id).is_some()
    }

    /// Returns true if `id` is a live group.
    pub fn is_group(&self, id: ObjectId) -> bool {
        self.node(id).is_some_and(|n| n.group.is_some())
    }

    /// The group containing `id`.
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.node(id)?.parent
    }

    /// Children of `id` in insertion order; empty for objects and stale ids.
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Live objects without a parent, in slot order.
    pub fn roots(&self) -> Vec<ObjectId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "ObjectId uses 32-bit indices by design."
                    )]
                    Some(ObjectId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect()
    }

    /// Layout strategy of a group.
    pub fn layout_strategy(&self, id: ObjectId) -> Option<LayoutStrategy> {
        self.node(id)?.group.map(|g| g.layout)
    }

    /// Change the layout strategy of a group; the next [`commit`](Self::commit) applies it.
    pub fn set_layout_strategy(
        &mut self,
        id: ObjectId,
        layout: LayoutStrategy,
    ) -> Result<(), SceneError> {
        self.check_group(id)?;
        if let Some(group) = self.node_mut(id).and_then(|n| n.group.as_mut()) {
            group.layout = layout;
            group.needs_layout = true;
        }
        Ok(())
    }

    /// Properties of a live object.
    pub fn props(&self, id: ObjectId) -> Option<&ObjectProps> {
        self.node(id).map(|n| &n.props)
    }

    /// Edit the properties of `id`.
    ///
    /// Scales are constrained afterwards. Returns `true` if anything changed;
    /// only then are the cached geometry of the subtree and the parent
    /// group's layout invalidated. Padding only moves the handles, so an edit
    /// of padding alone refreshes the control coordinates and nothing else.
    pub fn update(&mut self, id: ObjectId, edit: impl FnOnce(&mut ObjectProps)) -> bool {
        let Some(node) = self.node_mut(id) else {
            debug!(?id, "update on a stale id");
            return false;
        };
        let mut props = node.props.clone();
        edit(&mut props);
        props.constrain_scales();
        if props == node.props {
            return false;
        }
        let geometric = ObjectProps {
            padding: node.props.padding,
            ..props.clone()
        } != node.props;
        node.props = props;
        if geometric {
            self.geometry_changed(id);
        } else {
            node.cache.control_coords.clear();
        }
        true
    }

    /// Replace all properties of `id`.
    pub fn set_props(&mut self, id: ObjectId, props: ObjectProps) -> bool {
        self.update(id, |p| *p = props)
    }

    /// Set the left coordinate of the origin, in the parent plane.
    pub fn set_left(&mut self, id: ObjectId, left: f64) -> bool {
        self.update(id, |p| p.left = left)
    }

    /// Set the top coordinate of the origin, in the parent plane.
    pub fn set_top(&mut self, id: ObjectId, top: f64) -> bool {
        self.update(id, |p| p.top = top)
    }

    /// Set the angle in degrees; the object turns around its origin.
    pub fn set_angle(&mut self, id: ObjectId, angle: f64) -> bool {
        self.update(id, |p| p.angle = angle)
    }

    /// Set both scale factors.
    pub fn set_scale(&mut self, id: ObjectId, scale_x: f64, scale_y: f64) -> bool {
        self.update(id, |p| {
            p.scale_x = scale_x;
            p.scale_y = scale_y;
        })
    }

    /// Set the intrinsic size.
    pub fn set_size(&mut self, id: ObjectId, width: f64, height: f64) -> bool {
        self.update(id, |p| {
            p.width = width;
            p.height = height;
        })
    }

    /// Set the gap between the object and its controls, in viewport pixels.
    pub fn set_padding(&mut self, id: ObjectId, padding: f64) -> bool {
        self.update(id, |p| p.padding = padding)
    }

    /// Interaction flags of `id`.
    pub fn flags(&self, id: ObjectId) -> Option<ObjectFlags> {
        self.node(id).map(|n| n.interaction.flags)
    }

    /// Replace the interaction flags of `id`.
    pub fn set_flags(&mut self, id: ObjectId, flags: ObjectFlags) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.interaction.flags = flags;
        true
    }

    /// Attach the scene to a canvas, replacing any previous one.
    pub fn attach_canvas(&mut self, canvas: Canvas) {
        self.canvas = Some(canvas);
        self.invalidate_all();
    }

    /// Detach the scene from its canvas.
    pub fn detach_canvas(&mut self) -> Option<Canvas> {
        let canvas = self.canvas.take();
        self.invalidate_all();
        canvas
    }

    /// The attached canvas.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Matrix taking scene coordinates to viewport coordinates; identity without a canvas.
    pub fn viewport_transform(&self) -> Affine {
        self.canvas
            .map(|c| c.viewport_transform)
            .unwrap_or(Affine::IDENTITY)
    }

    /// Device pixel ratio; `1.0` without a canvas.
    pub fn retina_scaling(&self) -> f64 {
        self.canvas.map(|c| c.retina_scaling).unwrap_or(1.0)
    }

    /// Change the viewport transform. Returns `false` without a canvas.
    pub fn set_viewport_transform(&mut self, viewport_transform: Affine) -> bool {
        let Some(canvas) = self.canvas.as_mut() else {
            debug!("viewport change without a canvas");
            return false;
        };
        if canvas.viewport_transform == viewport_transform {
            return true;
        }
        if try_invert(viewport_transform).is_err() {
            warn!(?viewport_transform, "singular viewport transform");
        }
        canvas.viewport_transform = viewport_transform;
        self.invalidate_all();
        true
    }

    /// Set a uniform zoom, keeping the current pan. Returns `false` without a canvas.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let [.., e, f] = self.viewport_transform().as_coeffs();
        self.set_viewport_transform(Affine::new([zoom, 0.0, 0.0, zoom, e, f]))
    }

    /// Resize the canvas. Returns `false` without a canvas.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> bool {
        let Some(canvas) = self.canvas.as_mut() else {
            return false;
        };
        canvas.width = width;
        canvas.height = height;
        true
    }

    /// The active object, whose controls respond to the pointer.
    pub fn active_object(&self) -> Option<ObjectId> {
        self.active.filter(|id| self.is_alive(*id))
    }

    /// Make `id` the active object, or clear the selection with `None`.
    ///
    /// Returns `false` if `id` is stale.
    pub fn set_active_object(&mut self, id: Option<ObjectId>) -> bool {
        if let Some(id) = id {
            if !self.is_alive(id) {
                return false;
            }
        }
        if let Some(previous) = self.active.filter(|p| Some(*p) != id) {
            if let Some(node) = self.node_mut(previous) {
                node.interaction.active_control = None;
            }
        }
        self.active = id;
        true
    }

    /// The geometry stamp of `id`, refreshed whenever its derived geometry may change.
    pub fn geometry_stamp(&self, id: ObjectId) -> Option<u64> {
        self.node(id).map(|n| n.stamp)
    }

    pub(crate) fn node(&self, id: ObjectId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_mut(&mut self, id: ObjectId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn check_group(&self, id: ObjectId) -> Result<(), SceneError> {
        match self.node(id) {
            None => Err(SceneError::StaleId(id)),
            Some(n) if n.group.is_none() => Err(SceneError::NotAGroup(id)),
            Some(_) => Ok(()),
        }
    }

    fn link_parent(&mut self, id: ObjectId, parent: ObjectId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: ObjectId, parent: ObjectId) {
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub(crate) fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            if p == ancestor {
                return true;
            }
            cursor = self.parent(p);
        }
        false
    }

    pub(crate) fn depth(&self, id: ObjectId) -> usize {
        let mut depth = 0;
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            depth += 1;
            cursor = self.parent(p);
        }
        depth
    }

    /// Overwrite the own matrix of `id` without touching its parent's layout.
    pub(crate) fn write_own_matrix(&mut self, id: ObjectId, own: Affine) {
        if let Some(node) = self.node_mut(id) {
            node.props.apply_own_matrix(own);
        }
        self.invalidate(id);
    }

    /// Refresh cached geometry of `id` and flag its group for layout.
    pub(crate) fn geometry_changed(&mut self, id: ObjectId) {
        self.invalidate(id);
        if let Some(parent) = self.parent(id) {
            self.mark_layout(parent);
        }
    }

    pub(crate) fn mark_layout(&mut self, group: ObjectId) {
        if let Some(g) = self.node_mut(group).and_then(|n| n.group.as_mut()) {
            g.needs_layout = true;
        }
    }

    /// Give `id` and its descendants a fresh stamp.
    pub(crate) fn invalidate(&mut self, id: ObjectId) {
        self.epoch += 1;
        let epoch = self.epoch;
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.node_mut(next) {
                node.stamp = epoch;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    fn invalidate_all(&mut self) {
        self.epoch += 1;
        let epoch = self.epoch;
        for node in self.nodes.iter_mut().flatten() {
            node.stamp = epoch;
        }
    }

    /// Live groups waiting for layout.
    pub(crate) fn pending_layouts(&self) -> Vec<ObjectId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                Some(n) if n.group.is_some_and(|g| g.needs_layout) =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "ObjectId uses 32-bit indices by design."
                    )]
                    Some(ObjectId::new(i as u32, n.generation))
                }
                _ => None,
            })
            .collect()
    }
}
