// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred group layout.

use kurbo::{Point, Rect};
use trellis_plane::Plane;

use crate::log::debug;
use crate::scene::Scene;
use crate::types::{LayoutReport, LayoutStrategy, ObjectId};

impl Scene {
    /// Run the layouts requested since the last commit.
    ///
    /// Deeper groups are laid out first, so a group sees the final size of
    /// nested groups. A fit-content group takes the size and center of its
    /// children's boxes while the children stay where they are on the scene.
    pub fn commit(&mut self) -> LayoutReport {
        let mut report = LayoutReport::default();
        while let Some(group) = self
            .pending_layouts()
            .into_iter()
            .max_by_key(|g| self.depth(*g))
        {
            let Some(state) = self.node_mut(group).and_then(|n| n.group.as_mut()) else {
                break;
            };
            state.needs_layout = false;
            let layout = state.layout;
            if layout == LayoutStrategy::FitContent && self.fit_content(group, &mut report) {
                report.groups.push(group);
            }
        }
        report
    }

    fn fit_content(&mut self, group: ObjectId, report: &mut LayoutReport) -> bool {
        let children = self.children(group).to_vec();
        let Some(content) = children
            .iter()
            .filter_map(|c| self.bbox(*c))
            .map(|b| b.send_to_plane(Plane::PARENT).bounding_rect())
            .reduce(|a, b| a.union(b))
        else {
            return false;
        };
        let (Some(props), Some(own), Some(old_rect)) = (
            self.props(group),
            self.calc_own_matrix(group),
            self.get_bounding_rect(group),
        ) else {
            return false;
        };
        let epsilon = self.config().epsilon;
        let center = content.center();
        if center.to_vec2().hypot() < epsilon
            && (props.width - content.width()).abs() < epsilon
            && (props.height - content.height()).abs() < epsilon
        {
            return false;
        }
        debug!(?group, ?content, "fitting group to its content");
        let offset = center.to_vec2();
        for child in &children {
            if let Some(node) = self.node_mut(*child) {
                let moved = node.props.relative_center_point() - offset;
                node.props.set_relative_center_point(moved);
            }
        }
        let new_center: Point = own * center;
        let changed = self.update(group, |p| {
            p.width = content.width();
            p.height = content.height();
            p.set_relative_center_point(new_center);
        });
        if !changed {
            // Children moved.
            self.invalidate(group);
        }
        report.dirty_rects.push(old_rect);
        report
            .dirty_rects
            .push(self.get_bounding_rect(group).unwrap_or(Rect::ZERO));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::ObjectProps;

    fn assert_rect(a: Rect, b: Rect) {
        let d = [a.x0 - b.x0, a.y0 - b.y0, a.x1 - b.x1, a.y1 - b.y1];
        assert!(d.iter().all(|v| v.abs() < 1e-7), "{a:?} != {b:?}");
    }

    fn unstroked(left: f64, top: f64, width: f64, height: f64) -> ObjectProps {
        ObjectProps {
            stroke_width: 0.0,
            ..ObjectProps::new(left, top, width, height)
        }
    }

    fn fit_group(scene: &mut Scene, parent: Option<ObjectId>, props: ObjectProps) -> ObjectId {
        scene
            .insert_group(parent, props, LayoutStrategy::FitContent)
            .unwrap()
    }

    #[test]
    fn group_fits_its_children() {
        let mut scene = Scene::new();
        let group = fit_group(&mut scene, None, unstroked(0.0, 0.0, 0.0, 0.0));
        let a = scene.insert(Some(group), unstroked(10.0, 20.0, 30.0, 40.0)).unwrap();
        let b = scene.insert(Some(group), unstroked(100.0, 100.0, 20.0, 20.0)).unwrap();
        let before = [scene.get_bounding_rect(a).unwrap(), scene.get_bounding_rect(b).unwrap()];

        let report = scene.commit();
        assert_eq!(report.groups, [group]);
        assert_eq!(report.dirty_rects.len(), 2);
        assert_rect(report.union_rect().unwrap(), Rect::new(0.0, 0.0, 120.0, 120.0));

        let props = scene.props(group).unwrap();
        assert_eq!((props.width, props.height), (110.0, 100.0));
        assert_rect(scene.get_bounding_rect(group).unwrap(), Rect::new(10.0, 20.0, 120.0, 120.0));
        assert_rect(scene.get_bounding_rect(a).unwrap(), before[0]);
        assert_rect(scene.get_bounding_rect(b).unwrap(), before[1]);

        assert!(scene.commit().groups.is_empty(), "already fitted");
    }

    #[test]
    fn rotated_group_keeps_children_in_place() {
        let mut scene = Scene::new();
        let group = fit_group(
            &mut scene,
            None,
            ObjectProps {
                angle: 30.0,
                scale_x: 2.0,
                ..unstroked(50.0, 50.0, 10.0, 10.0)
            },
        );
        let child = scene.insert(Some(group), unstroked(20.0, -10.0, 30.0, 15.0)).unwrap();
        let before = scene.get_coords(child).unwrap();
        assert_eq!(scene.commit().groups, [group]);
        let after = scene.get_coords(child).unwrap();
        for (p, q) in before.points().into_iter().zip(after.points()) {
            assert!((p - q).hypot() < 1e-7, "{p:?} != {q:?}");
        }
        assert!((scene.total_angle(group).unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn nested_groups_lay_out_inside_out() {
        let mut scene = Scene::new();
        let outer = fit_group(&mut scene, None, unstroked(0.0, 0.0, 0.0, 0.0));
        let inner = fit_group(&mut scene, Some(outer), unstroked(0.0, 0.0, 0.0, 0.0));
        let child = scene.insert(Some(inner), unstroked(0.0, 0.0, 10.0, 10.0)).unwrap();
        let _ = scene.commit();

        assert!(scene.translate(child, 30.0, 0.0, false));
        let report = scene.commit();
        assert_eq!(report.groups, [inner, outer]);
        assert_rect(scene.get_bounding_rect(outer).unwrap(), Rect::new(30.0, 0.0, 40.0, 10.0));
        assert_rect(scene.get_bounding_rect(child).unwrap(), Rect::new(30.0, 0.0, 40.0, 10.0));
    }

    #[test]
    fn fixed_groups_keep_their_size() {
        let mut scene = Scene::new();
        let group = scene
            .insert_group(None, unstroked(0.0, 0.0, 50.0, 50.0), LayoutStrategy::Fixed)
            .unwrap();
        scene.insert(Some(group), unstroked(100.0, 100.0, 10.0, 10.0)).unwrap();
        assert!(scene.commit().groups.is_empty());
        assert_eq!(scene.props(group).unwrap().width, 50.0);

        scene.set_layout_strategy(group, LayoutStrategy::FitContent).unwrap();
        assert_eq!(scene.commit().groups, [group]);
        assert_eq!(scene.props(group).unwrap().width, 10.0);
    }

    #[test]
    fn empty_groups_are_left_alone() {
        let mut scene = Scene::new();
        let group = fit_group(&mut scene, None, unstroked(5.0, 5.0, 20.0, 20.0));
        let child = scene.insert(Some(group), unstroked(0.0, 0.0, 1.0, 1.0)).unwrap();
        scene.remove(child);
        assert!(scene.commit().groups.is_empty());
        assert_eq!(scene.props(group).unwrap().width, 20.0);
    }
}
