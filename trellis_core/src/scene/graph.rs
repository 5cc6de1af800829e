// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph operations: hierarchy queries, reparenting, reordering,
//! deletion and the sweep.

use super::{Children, Scene};
use crate::error::SceneError;
use crate::node::{Handle, INVALID};
use crate::trace::NodeSweptEvent;

impl Scene {
    // -- Hierarchy queries --

    /// Returns the parent of a node, or `None` for top-level nodes.
    pub fn parent(&self, node: Handle) -> Result<Option<Handle>, SceneError> {
        let p = self.pool.parent[self.pool.resolve(node)? as usize];
        Ok((p != INVALID).then(|| self.pool.handle_at(p)))
    }

    /// Returns an iterator over the direct children of a node, bottom first.
    pub fn children(&self, node: Handle) -> Result<Children<'_>, SceneError> {
        let idx = self.pool.resolve(node)?;
        Ok(Children::new(&self.pool, self.pool.first_child[idx as usize]))
    }

    /// Returns an iterator over the top-level render chain, bottom first.
    #[must_use]
    pub fn top_level(&self) -> Children<'_> {
        Children::new(&self.pool, self.pool.render_head)
    }

    /// Returns the position of a node among its siblings (`0` is the bottom).
    pub fn sibling_index(&self, node: Handle) -> Result<usize, SceneError> {
        let idx = self.pool.resolve(node)?;
        Ok(self.pool.chain_index(idx))
    }

    // -- Structure mutation --

    /// Moves `node` to the top of `new_parent`'s child chain, or of the
    /// top-level chain for `None`.
    ///
    /// Fails with [`SceneError::InfiniteRecursion`], changing nothing, if
    /// `node` is `new_parent` or one of its ancestors. Reparenting a bone node
    /// does nothing.
    pub fn set_parent(
        &mut self,
        node: Handle,
        new_parent: Option<Handle>,
    ) -> Result<(), SceneError> {
        let idx = self.pool.resolve(node)?;
        let p = match new_parent {
            Some(parent) => self.pool.resolve(parent)?,
            None => INVALID,
        };
        if self.pool.node_type[idx as usize].is_bone() {
            return Ok(());
        }
        if p != INVALID && self.pool.is_self_or_ancestor(idx, p) {
            return Err(SceneError::InfiniteRecursion);
        }
        self.pool.unlink(idx);
        self.pool.set_parent_field(idx, p);
        self.pool.link_before(idx, INVALID);
        Ok(())
    }

    /// Moves `node` directly above `reference` in their shared chain.
    ///
    /// With `None`, `node` moves to the bottom of its chain (index `0`). A
    /// reference in another chain, or equal to `node`, leaves the scene
    /// unchanged.
    pub fn move_above(
        &mut self,
        node: Handle,
        reference: Option<Handle>,
    ) -> Result<(), SceneError> {
        let idx = self.pool.resolve(node)?;
        let prev = match reference {
            Some(r) => match self.sibling_slot(idx, r)? {
                Some(r) => r,
                None => return Ok(()),
            },
            None => INVALID,
        };
        self.pool.unlink(idx);
        self.pool.link_after(idx, prev);
        Ok(())
    }

    /// Moves `node` directly below `reference` in their shared chain.
    ///
    /// With `None`, `node` moves to the top of its chain (the last index). A
    /// reference in another chain, or equal to `node`, leaves the scene
    /// unchanged.
    pub fn move_below(
        &mut self,
        node: Handle,
        reference: Option<Handle>,
    ) -> Result<(), SceneError> {
        let idx = self.pool.resolve(node)?;
        let next = match reference {
            Some(r) => match self.sibling_slot(idx, r)? {
                Some(r) => r,
                None => return Ok(()),
            },
            None => INVALID,
        };
        self.pool.unlink(idx);
        self.pool.link_before(idx, next);
        Ok(())
    }

    /// Resolves `reference` and returns its slot if it is a distinct sibling
    /// of `idx`.
    fn sibling_slot(&self, idx: u32, reference: Handle) -> Result<Option<u32>, SceneError> {
        let r = self.pool.resolve(reference)?;
        let same_chain = self.pool.parent[r as usize] == self.pool.parent[idx as usize];
        Ok((r != idx && same_chain).then_some(r))
    }

    // -- Deletion --

    /// Marks a node for deletion.
    ///
    /// The handle is invalid immediately; the slot is reclaimed by the next
    /// [`sweep`](Self::sweep). Bone nodes fail with
    /// [`SceneError::WrongSceneOrType`].
    pub fn delete_node(&mut self, node: Handle) -> Result<(), SceneError> {
        self.pool.mark_deleted(node)
    }

    /// Reclaims every node marked deleted and returns how many were swept.
    ///
    /// Each deleted node's children are spliced, in order, into the position
    /// it held in its chain. Animations targeting swept nodes are cancelled
    /// and their tokens released.
    pub fn sweep(&mut self) -> usize {
        let mut swept = 0;
        self.sweep_each(|_| swept += 1);
        swept
    }

    /// Sweeps deleted nodes, reporting each one to `on_swept`.
    pub(crate) fn sweep_each(&mut self, mut on_swept: impl FnMut(&NodeSweptEvent)) {
        if !self.pool.has_pending_deletes() {
            return;
        }
        for idx in 0..self.pool.len {
            let i = idx as usize;
            if !(self.pool.alive[i] && self.pool.deleted[i]) {
                continue;
            }
            let handle = self.pool.handle_at(idx);
            let id = self.pool.id[i];

            // Splice children into the deleted node's position.
            let parent = self.pool.parent[i];
            let mut promoted_children = 0;
            let mut child = self.pool.first_child[i];
            while child != INVALID {
                let next = self.pool.next_sibling[child as usize];
                self.pool.unlink(child);
                self.pool.set_parent_field(child, parent);
                self.pool.link_before(child, idx);
                promoted_children += 1;
                child = next;
            }

            self.pool.unlink(idx);
            self.pool.set_parent_field(idx, INVALID);
            self.animations.cancel_node(handle);
            if self.ids.get(&id) == Some(&handle) {
                self.ids.remove(&id);
            }
            self.pool.release_slot(idx);

            on_swept(&NodeSweptEvent {
                tick_index: self.tick_index,
                node: handle,
                id,
                promoted_children,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::math::Vec4;
    use crate::node::{NodeType, Property};

    fn boxes(scene: &mut Scene, n: usize) -> Vec<Handle> {
        (0..n)
            .map(|_| scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap())
            .collect()
    }

    fn kids(scene: &Scene, node: Handle) -> Vec<Handle> {
        scene.children(node).unwrap().collect()
    }

    #[test]
    fn set_parent_appends_on_top() {
        let mut scene = Scene::default();
        let n = boxes(&mut scene, 3);
        scene.set_parent(n[1], Some(n[0])).unwrap();
        scene.set_parent(n[2], Some(n[0])).unwrap();

        assert_eq!(kids(&scene, n[0]), [n[1], n[2]]);
        assert_eq!(scene.parent(n[2]), Ok(Some(n[0])));
        assert_eq!(scene.top_level().collect::<Vec<_>>(), [n[0]]);

        scene.set_parent(n[1], None).unwrap();
        assert_eq!(scene.top_level().collect::<Vec<_>>(), [n[0], n[1]]);
        assert_eq!(scene.parent(n[1]), Ok(None));
    }

    #[test]
    fn cycles_are_rejected_without_change() {
        let mut scene = Scene::default();
        let n = boxes(&mut scene, 3);
        scene.set_parent(n[1], Some(n[0])).unwrap();
        scene.set_parent(n[2], Some(n[1])).unwrap();

        assert_eq!(
            scene.set_parent(n[0], Some(n[2])),
            Err(SceneError::InfiniteRecursion)
        );
        assert_eq!(
            scene.set_parent(n[0], Some(n[0])),
            Err(SceneError::InfiniteRecursion)
        );
        assert_eq!(scene.top_level().collect::<Vec<_>>(), [n[0]]);
        assert_eq!(kids(&scene, n[0]), [n[1]]);
        assert_eq!(kids(&scene, n[1]), [n[2]]);
    }

    #[test]
    fn bones_ignore_reparenting() {
        let mut scene = Scene::default();
        let parent = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        let bone = scene.new_node(NodeType::Bone, Vec4::ZERO, Vec4::ONE).unwrap();
        scene.set_parent(bone, Some(parent)).unwrap();
        assert_eq!(scene.parent(bone), Ok(None));
        assert_eq!(scene.delete_node(bone), Err(SceneError::WrongSceneOrType));
    }

    #[test]
    fn move_above_and_below() {
        let mut scene = Scene::default();
        let n = boxes(&mut scene, 4);

        scene.move_above(n[3], None).unwrap();
        assert_eq!(scene.sibling_index(n[3]), Ok(0));

        scene.move_below(n[3], None).unwrap();
        assert_eq!(scene.sibling_index(n[3]), Ok(3));

        scene.move_above(n[0], Some(n[2])).unwrap();
        assert_eq!(
            scene.top_level().collect::<Vec<_>>(),
            [n[1], n[2], n[0], n[3]]
        );

        scene.move_below(n[3], Some(n[1])).unwrap();
        assert_eq!(
            scene.top_level().collect::<Vec<_>>(),
            [n[3], n[1], n[2], n[0]]
        );
    }

    #[test]
    fn move_relative_to_other_chain_is_ignored() {
        let mut scene = Scene::default();
        let n = boxes(&mut scene, 3);
        scene.set_parent(n[2], Some(n[0])).unwrap();

        scene.move_above(n[1], Some(n[2])).unwrap();
        scene.move_below(n[1], Some(n[1])).unwrap();
        assert_eq!(scene.top_level().collect::<Vec<_>>(), [n[0], n[1]]);
        assert_eq!(kids(&scene, n[0]), [n[2]]);
    }

    #[test]
    fn deleted_handles_fail_before_and_after_sweep() {
        let mut scene = Scene::default();
        let node = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        scene.delete_node(node).unwrap();

        let err = Err(SceneError::InvalidHandle(node));
        assert_eq!(scene.property(node, Property::Position), err);
        assert_eq!(scene.sweep(), 1);
        assert_eq!(scene.property(node, Property::Position), err);
        assert_eq!(
            scene.sibling_index(node),
            Err(SceneError::InvalidHandle(node))
        );
    }

    #[test]
    fn reused_slot_rejects_old_handle() {
        let mut scene = Scene::default();
        let old = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        scene.delete_node(old).unwrap();
        scene.sweep();
        let new = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();

        assert_eq!(old.index(), new.index());
        assert!(!scene.is_valid(old));
        assert!(scene.is_valid(new));
        assert_eq!(
            scene.node_type(old),
            Err(SceneError::InvalidHandle(old))
        );
    }

    #[test]
    fn sweep_promotes_children_in_place() {
        let mut scene = Scene::default();
        let n = boxes(&mut scene, 3);
        let mid = n[1];
        let a = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        let b = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        let grandchild = scene.new_box_node(Vec4::ZERO, Vec4::ONE).unwrap();
        scene.set_parent(a, Some(mid)).unwrap();
        scene.set_parent(b, Some(mid)).unwrap();
        scene.set_parent(grandchild, Some(a)).unwrap();

        scene.delete_node(mid).unwrap();
        // Pending nodes are hidden from iteration until swept.
        assert_eq!(scene.top_level().collect::<Vec<_>>(), [n[0], n[2]]);
        assert!(scene.pool().has_pending_deletes());
        assert_eq!(scene.sweep(), 1);
        assert!(!scene.pool().has_pending_deletes());
        assert_eq!(scene.sweep(), 0);

        assert_eq!(scene.top_level().collect::<Vec<_>>(), [n[0], a, b, n[2]]);
        assert_eq!(scene.parent(a), Ok(None));
        assert_eq!(kids(&scene, a), [grandchild]);
        assert_eq!(scene.node_count(), 5);
    }

    #[test]
    fn sweep_of_nested_deletions() {
        let mut scene = Scene::default();
        let n = boxes(&mut scene, 3);
        scene.set_parent(n[1], Some(n[0])).unwrap();
        scene.set_parent(n[2], Some(n[1])).unwrap();

        scene.delete_node(n[1]).unwrap();
        scene.delete_node(n[0]).unwrap();
        assert_eq!(scene.sweep(), 2);
        assert_eq!(scene.top_level().collect::<Vec<_>>(), [n[2]]);
        assert_eq!(scene.parent(n[2]), Ok(None));
    }
}
