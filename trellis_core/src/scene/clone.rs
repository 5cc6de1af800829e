// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cloning and template reset.

use alloc::vec::Vec;

use hashbrown::HashMap;

use super::Scene;
use crate::dirty;
use crate::error::SceneError;
use crate::node::{Handle, INVALID, NodeId, Property};

impl Scene {
    /// Clones a single node (without its children) and places the clone
    /// directly above it.
    ///
    /// The clone copies the type, property values, text, font, texture and
    /// enabled flag. It gets no id and no template reset point.
    pub fn clone_node(&mut self, node: Handle) -> Result<Handle, SceneError> {
        let src = self.pool.resolve(node)?;
        let clone = self.clone_slot(src)?;
        self.pool.set_parent_field(clone, self.pool.parent[src as usize]);
        self.pool.link_after(clone, src);
        Ok(self.pool.handle_at(clone))
    }

    /// Clones `root` and all of its descendants, or every top-level tree for
    /// `None`.
    ///
    /// Each cloned root is placed on top of its source's chain; descendants
    /// keep their structure and sibling order. Nodes pending deletion are not
    /// cloned. Returns a map from each source node's id to its clone.
    ///
    /// Anonymous nodes (those with [`NodeId::NONE`], which includes every
    /// dynamically created node) are cloned but not listed, so a clone of a
    /// purely dynamic tree returns an empty map. Reach such clones through
    /// [`children`](Self::children) of a listed ancestor, or
    /// [`top_level`](Self::top_level) when the clone has no parent.
    ///
    /// If the pool runs out of slots, every clone created so far is marked
    /// deleted (and reclaimed by the next sweep) and
    /// [`SceneError::OutOfResources`] is returned.
    pub fn clone_tree(
        &mut self,
        root: Option<Handle>,
    ) -> Result<HashMap<NodeId, Handle>, SceneError> {
        let roots: Vec<u32> = match root {
            Some(root) => alloc::vec![self.pool.resolve(root)?],
            None => self.top_level().map(|h| h.slot()).collect(),
        };

        let mut map = HashMap::new();
        let mut created = Vec::new();
        for src in roots {
            if let Err(err) = self.clone_subtree(src, &mut created, &mut map) {
                for idx in created {
                    self.pool.deleted[idx as usize] = true;
                    self.pool.dirty.mark(idx, dirty::TOPOLOGY);
                }
                self.pool.traversal_dirty = true;
                return Err(err);
            }
        }
        Ok(map)
    }

    /// Restores every template node to its template property values.
    ///
    /// Dynamically created nodes and clones are unaffected.
    pub fn reset_nodes(&mut self) {
        for idx in 0..self.pool.len {
            let i = idx as usize;
            if !self.pool.alive[i] || self.pool.deleted[i] {
                continue;
            }
            let Some(reset) = self.pool.reset[i].as_deref().copied() else {
                continue;
            };
            for property in Property::ALL {
                self.pool
                    .write_slot(idx, property, reset[property.id() as usize]);
            }
        }
    }

    /// Clones the tree under `root` in pre-order, appending each clone to the
    /// chain of its parent's clone (the root's clone goes on top of the
    /// root's own chain).
    fn clone_subtree(
        &mut self,
        root: u32,
        created: &mut Vec<u32>,
        map: &mut HashMap<NodeId, Handle>,
    ) -> Result<(), SceneError> {
        let mut stack = alloc::vec![(root, self.pool.parent[root as usize])];
        while let Some((src, parent)) = stack.pop() {
            let clone = self.clone_slot(src)?;
            created.push(clone);
            self.pool.set_parent_field(clone, parent);
            self.pool.link_before(clone, INVALID);

            let id = self.pool.id[src as usize];
            if !id.is_none() {
                map.insert(id, self.pool.handle_at(clone));
            }

            // Reversed so siblings pop in chain order.
            let start = stack.len();
            let mut child = self.pool.first_child[src as usize];
            while child != INVALID {
                if !self.pool.deleted[child as usize] {
                    stack.push((child, clone));
                }
                child = self.pool.next_sibling[child as usize];
            }
            stack[start..].reverse();
        }
        Ok(())
    }

    /// Allocates an unlinked copy of slot `src`.
    fn clone_slot(&mut self, src: u32) -> Result<u32, SceneError> {
        let s = src as usize;
        let idx = self.pool.allocate(self.pool.node_type[s])?.slot();
        let i = idx as usize;
        let properties = self.pool.properties[s];
        for property in Property::ALL {
            self.pool
                .write_slot(idx, property, properties[property.id() as usize]);
        }
        self.pool.text[i] = self.pool.text[s].clone();
        self.pool.font[i] = self.pool.font[s];
        self.pool.texture[i] = self.pool.texture[s];
        self.pool.enabled[i] = self.pool.enabled[s];
        Ok(idx)
    }
}
