// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **TOPOLOGY**: if any chain or enabled flag changed, rebuild the
//!    depth-first render traversal.
//! 2. **TRANSFORM**: drain dirty indices (with their descendants) in
//!    parent-before-child order and recompute each node's world transform as
//!    `parent_world * translate * rotate * scale`.
//! 3. **PROPERTY**: drain dirty indices; no recomputation, renderers read the
//!    current values from the pool.
//!
//! [`FrameChanges`] uses raw slot indices so that renderers can index the
//! pool's arrays through the `*_at()` accessors without generation checks.

use alloc::vec::Vec;

use kurbo::Affine;

use super::Scene;
use crate::dirty;
use crate::error::SceneError;
use crate::node::{Handle, INVALID, NodePool, Property};

/// The set of changes produced by a single [`Scene::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Nodes whose world transform was recomputed.
    pub transforms: Vec<u32>,
    /// Nodes with at least one property, text or resource write.
    pub properties: Vec<u32>,
    /// Nodes allocated since the last evaluate.
    pub added: Vec<u32>,
    /// Slots released by sweeps since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the render traversal was rebuilt.
    pub topology_changed: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.properties.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.properties.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl NodePool {
    /// Evaluates the pool, recomputing dirty world transforms and returning
    /// the set of changes.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        let dirty_transforms: Vec<u32> = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_transforms {
            let parent = self.parent[idx as usize];
            let parent_world = if parent != INVALID {
                self.world_transform[parent as usize]
            } else {
                Affine::IDENTITY
            };
            self.world_transform[idx as usize] = parent_world * self.local_transform(idx);
        }
        changes.transforms = dirty_transforms;

        changes.properties = self
            .dirty
            .drain(dirty::PROPERTY)
            .deterministic()
            .run()
            .collect();

        // Structural changes are already reflected in the traversal.
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Returns the render traversal: enabled, non-deleted nodes in depth-first
    /// pre-order, bottom first.
    ///
    /// Only current after [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// The node's transform relative to its parent. Rotation is the `z`
    /// component of [`Property::Rotation`], in degrees.
    fn local_transform(&self, idx: u32) -> Affine {
        let props = &self.properties[idx as usize];
        let position = props[Property::Position.id() as usize];
        let rotation = props[Property::Rotation.id() as usize];
        let scale = props[Property::Scale.id() as usize];
        let radians = f64::from(rotation.z) * (core::f64::consts::PI / 180.0);
        Affine::translate((f64::from(position.x), f64::from(position.y)))
            * Affine::rotate(radians)
            * Affine::scale_non_uniform(f64::from(scale.x), f64::from(scale.y))
    }

    /// Depth-first pre-order collection starting at the render chain.
    ///
    /// Disabled nodes are skipped with their subtrees. A node pending deletion
    /// is skipped but its children are kept, matching where the sweep will
    /// splice them.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        // Each entry is the next node to visit in some chain.
        let mut stack = alloc::vec![self.render_head];
        while let Some(cur) = stack.pop() {
            if cur == INVALID {
                continue;
            }
            let i = cur as usize;
            stack.push(self.next_sibling[i]);
            if self.enabled[i] {
                if !self.deleted[i] {
                    self.traversal_order.push(cur);
                }
                stack.push(self.first_child[i]);
            }
        }
    }
}

impl Scene {
    /// Evaluates the scene, recomputing dirty world transforms and returning
    /// the set of changes since the last evaluate.
    pub fn evaluate(&mut self) -> FrameChanges {
        self.pool.evaluate()
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        self.pool.evaluate_into(changes);
    }

    /// Returns the world transform of a node as of the last evaluate.
    pub fn world_transform(&self, node: Handle) -> Result<Affine, SceneError> {
        self.pool.world_transform(node)
    }

    /// Returns the render traversal as of the last evaluate.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        self.pool.traversal_order()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;
    use crate::math::Vec4;

    fn assert_point_near(actual: Point, expected: Point) {
        assert!(
            (actual - expected).hypot() < 1e-9,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn world_transform_composes_with_parent() {
        let mut scene = Scene::default();
        let parent = scene
            .new_box_node(Vec4::new(10.0, 0.0, 0.0, 0.0), Vec4::ONE)
            .unwrap();
        let child = scene
            .new_box_node(Vec4::new(0.0, 5.0, 0.0, 0.0), Vec4::ONE)
            .unwrap();
        scene.set_parent(child, Some(parent)).unwrap();
        scene
            .set_property(parent, Property::Scale, Vec4::new(2.0, 2.0, 1.0, 1.0))
            .unwrap();

        scene.evaluate();
        let world = scene.world_transform(child).unwrap();
        assert_point_near(world * Point::ORIGIN, Point::new(10.0, 10.0));
    }

    #[test]
    fn rotation_is_in_degrees_around_z() {
        let mut scene = Scene::default();
        let node = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        scene
            .set_property(node, Property::Rotation, Vec4::new(0.0, 0.0, 90.0, 0.0))
            .unwrap();
        scene.evaluate();
        let world = scene.world_transform(node).unwrap();
        assert_point_near(world * Point::new(1.0, 0.0), Point::new(0.0, 1.0));
    }

    #[test]
    fn parent_move_recomputes_descendants() {
        let mut scene = Scene::default();
        let parent = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        let child = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        scene.set_parent(child, Some(parent)).unwrap();
        scene.evaluate();

        scene
            .set_property(parent, Property::Position, Vec4::new(3.0, 4.0, 0.0, 0.0))
            .unwrap();
        let changes = scene.evaluate();
        assert!(changes.transforms.contains(&child.slot()));
        assert!(!changes.topology_changed);
        assert_point_near(
            scene.world_transform(child).unwrap() * Point::ORIGIN,
            Point::new(3.0, 4.0),
        );
    }

    #[test]
    fn no_change_evaluate_is_empty() {
        let mut scene = Scene::default();
        let node = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        let first = scene.evaluate();
        assert_eq!(first.added, [node.slot()]);
        assert!(first.topology_changed);

        assert!(scene.evaluate().is_empty());
    }

    #[test]
    fn property_writes_are_reported() {
        let mut scene = Scene::default();
        let node = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        scene.evaluate();
        scene
            .set_property(node, Property::Color, Vec4::splat(0.5))
            .unwrap();
        let changes = scene.evaluate();
        assert_eq!(changes.properties, [node.slot()]);
        assert!(changes.transforms.is_empty());
    }

    #[test]
    fn traversal_is_depth_first_and_skips_disabled_subtrees() {
        let mut scene = Scene::default();
        let a = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        let b = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        let c = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        let d = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        let e = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();

        // a -> [b -> [d], c], e
        scene.set_parent(b, Some(a)).unwrap();
        scene.set_parent(c, Some(a)).unwrap();
        scene.set_parent(d, Some(b)).unwrap();
        scene.evaluate();
        assert_eq!(
            scene.traversal_order(),
            [a.slot(), b.slot(), d.slot(), c.slot(), e.slot()]
        );

        scene.set_enabled(b, false).unwrap();
        scene.delete_node(c).unwrap();
        assert!(scene.evaluate().topology_changed);
        assert_eq!(scene.traversal_order(), [a.slot(), e.slot()]);
    }

    #[test]
    fn traversal_of_a_deep_chain_is_in_depth_order() {
        let mut scene = Scene::default();
        let mut chain = Vec::new();
        let mut parent = None;
        for _ in 0..300 {
            let node = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
            scene.set_parent(node, parent).unwrap();
            chain.push(node.slot());
            parent = Some(node);
        }
        let sibling = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        chain.push(sibling.slot());

        scene.evaluate();
        assert_eq!(scene.traversal_order(), chain.as_slice());
    }

    #[test]
    fn raw_accessors_read_along_the_traversal() {
        let mut scene = Scene::default();
        let parent = scene
            .new_box_node(Vec4::new(2.0, 0.0, 0.0, 0.0), Vec4::ONE)
            .unwrap();
        let child = scene
            .new_box_node(Vec4::new(0.0, 3.0, 0.0, 0.0), Vec4::ONE)
            .unwrap();
        scene.set_parent(child, Some(parent)).unwrap();
        scene
            .set_property(child, Property::Color, Vec4::new(0.1, 0.2, 0.3, 0.4))
            .unwrap();
        scene.evaluate();

        let pool = scene.pool();
        let origins: Vec<Point> = scene
            .traversal_order()
            .iter()
            .map(|&idx| pool.world_transform_at(idx) * Point::ORIGIN)
            .collect();
        assert_eq!(origins.len(), 2);
        assert_point_near(origins[0], Point::new(2.0, 0.0));
        assert_point_near(origins[1], Point::new(2.0, 3.0));
        assert_eq!(
            pool.property_at(child.slot(), Property::Color).to_array(),
            [0.1, 0.2, 0.3, 0.4]
        );
    }

    #[test]
    fn swept_slots_are_reported_as_removed() {
        let mut scene = Scene::default();
        let node = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        scene.evaluate();
        scene.delete_node(node).unwrap();
        scene.sweep();
        let changes = scene.evaluate();
        assert_eq!(changes.removed, [node.slot()]);
        assert!(scene.traversal_order().is_empty());
    }
}
