// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intrusive chain primitives over pool slots.
//!
//! Every linked slot sits in exactly one chain: the child chain of its parent,
//! or the scene's top-level render chain when it has no parent. Chains are
//! doubly linked through `next_sibling` / `prev_sibling`; the first entry is
//! drawn first (bottom) and the last entry on top.
//!
//! These helpers keep the links consistent but do not validate handles or
//! check for cycles; callers in [`graph`](super::graph) do.

use understory_dirty::EagerPolicy;

use crate::dirty;
use crate::node::{INVALID, NodePool};

impl NodePool {
    /// Returns the first slot of the chain owned by `parent` (or the top-level
    /// chain for [`INVALID`]).
    pub(crate) fn chain_head(&self, parent: u32) -> u32 {
        if parent == INVALID {
            self.render_head
        } else {
            self.first_child[parent as usize]
        }
    }

    fn set_chain_head(&mut self, parent: u32, head: u32) {
        if parent == INVALID {
            self.render_head = head;
        } else {
            self.first_child[parent as usize] = head;
        }
    }

    /// Returns the last slot of the chain owned by `parent`.
    pub(crate) fn chain_last(&self, parent: u32) -> u32 {
        let mut last = self.chain_head(parent);
        if last == INVALID {
            return INVALID;
        }
        while self.next_sibling[last as usize] != INVALID {
            last = self.next_sibling[last as usize];
        }
        last
    }

    /// Removes `idx` from its chain. Its `parent` field is left untouched.
    pub(crate) fn unlink(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else if self.chain_head(p) == idx {
            // Was first in its chain.
            self.set_chain_head(p, next);
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
        self.traversal_dirty = true;
        if p != INVALID {
            self.dirty.mark(p, dirty::TOPOLOGY);
        }
    }

    /// Inserts an unlinked `idx` right after `prev` in the chain owned by
    /// `parent[idx]`. `prev == INVALID` inserts at the front.
    pub(crate) fn link_after(&mut self, idx: u32, prev: u32) {
        let p = self.parent[idx as usize];
        let next = if prev == INVALID {
            let head = self.chain_head(p);
            self.set_chain_head(p, idx);
            head
        } else {
            let next = self.next_sibling[prev as usize];
            self.next_sibling[prev as usize] = idx;
            next
        };
        self.prev_sibling[idx as usize] = prev;
        self.next_sibling[idx as usize] = next;
        if next != INVALID {
            self.prev_sibling[next as usize] = idx;
        }

        self.traversal_dirty = true;
        self.dirty.mark(idx, dirty::TOPOLOGY);
        if p != INVALID {
            self.dirty.mark(p, dirty::TOPOLOGY);
        }
    }

    /// Inserts an unlinked `idx` right before `next` in the chain owned by
    /// `parent[idx]`. `next == INVALID` appends at the end.
    pub(crate) fn link_before(&mut self, idx: u32, next: u32) {
        let prev = if next == INVALID {
            self.chain_last(self.parent[idx as usize])
        } else {
            self.prev_sibling[next as usize]
        };
        self.link_after(idx, prev);
    }

    /// Sets the parent field of an unlinked `idx`, moving its TRANSFORM
    /// dependency edge from the old parent to `new_parent`.
    ///
    /// Marks the subtree's transforms dirty since the ancestry changed.
    pub(crate) fn set_parent_field(&mut self, idx: u32, new_parent: u32) {
        let old = self.parent[idx as usize];
        if old == new_parent {
            return;
        }
        if old != INVALID {
            self.dirty.remove_dependency(idx, old, dirty::TRANSFORM);
        }
        self.parent[idx as usize] = new_parent;
        if new_parent != INVALID {
            let _ = self.dirty.add_dependency(idx, new_parent, dirty::TRANSFORM);
        }
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
    }

    /// Returns the position of `idx` within its chain, not counting nodes
    /// pending deletion.
    pub(crate) fn chain_index(&self, idx: u32) -> usize {
        let mut i = 0;
        let mut cur = self.chain_head(self.parent[idx as usize]);
        while cur != INVALID && cur != idx {
            if !self.deleted[cur as usize] {
                i += 1;
            }
            cur = self.next_sibling[cur as usize];
        }
        debug_assert!(cur == idx, "slot {idx} missing from its chain");
        i
    }

    /// Returns whether `ancestor` is `idx` or one of its ancestors.
    pub(crate) fn is_self_or_ancestor(&self, ancestor: u32, idx: u32) -> bool {
        let mut cur = idx;
        while cur != INVALID {
            if cur == ancestor {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }
}
