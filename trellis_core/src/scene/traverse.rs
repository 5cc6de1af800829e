// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chain iteration.

use crate::node::{Handle, INVALID, NodePool};

/// An iterator over one chain, in render order (bottom first).
///
/// Nodes pending deletion are skipped. Created by
/// [`Scene::children`](super::Scene::children) and
/// [`Scene::top_level`](super::Scene::top_level).
#[derive(Debug)]
pub struct Children<'a> {
    pool: &'a NodePool,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(pool: &'a NodePool, first: u32) -> Self {
        Self {
            pool,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        while self.current != INVALID {
            let idx = self.current;
            self.current = self.pool.next_sibling[idx as usize];
            if !self.pool.deleted[idx as usize] {
                return Some(self.pool.handle_at(idx));
            }
        }
        None
    }
}
