// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, validation and property
//! management.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Affine;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{FontId, Handle, INVALID, NodeId, TextureId};
use super::kind::{NodeType, Property};
use crate::dirty;
use crate::error::SceneError;
use crate::math::Vec4;

/// Largest number of slots a pool can hold. Index `0xFFFF` is reserved.
pub const MAX_CAPACITY: u16 = u16::MAX - 1;

/// Property values a node was created with from a template.
pub(crate) type ResetPoint = Box<[Vec4; Property::COUNT]>;

/// Struct-of-arrays storage for all nodes of a scene.
///
/// Nodes are addressed by [`Handle`]s. Each node occupies a slot in parallel
/// arrays; freed slots are recycled through a free list and their generation
/// counter is bumped so that stale handles fail validation.
///
/// Chain links (`parent`, `first_child`, `next_sibling`, `prev_sibling`) are
/// maintained by the [`scene`](crate::scene) module. A slot with no parent
/// lives in the top-level render chain starting at `render_head`.
#[derive(Debug)]
pub struct NodePool {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,
    pub(crate) render_head: u32,

    // -- Node content (set by callers and animations) --
    pub(crate) node_type: Vec<NodeType>,
    pub(crate) properties: Vec<[Vec4; Property::COUNT]>,
    pub(crate) id: Vec<NodeId>,
    pub(crate) text: Vec<Option<String>>,
    pub(crate) font: Vec<Option<FontId>>,
    pub(crate) texture: Vec<Option<TextureId>>,
    pub(crate) enabled: Vec<bool>,
    pub(crate) reset: Vec<Option<ResetPoint>>,

    // -- Computed (written by evaluate) --
    pub(crate) world_transform: Vec<Affine>,

    // -- Allocation --
    pub(crate) generation: Vec<u16>,
    pub(crate) alive: Vec<bool>,
    pub(crate) deleted: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    capacity: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl NodePool {
    /// Creates an empty pool holding at most `capacity` nodes.
    ///
    /// `capacity` is clamped to [`MAX_CAPACITY`].
    #[must_use]
    pub fn new(capacity: u16) -> Self {
        let capacity = u32::from(capacity.min(MAX_CAPACITY));
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            render_head: INVALID,
            node_type: Vec::new(),
            properties: Vec::new(),
            id: Vec::new(),
            text: Vec::new(),
            font: Vec::new(),
            texture: Vec::new(),
            enabled: Vec::new(),
            reset: Vec::new(),
            world_transform: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            deleted: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            capacity,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Allocates a node of the given type and returns its handle.
    ///
    /// The node starts with default property values, no id, no text and no
    /// chain links. Fails with [`SceneError::OutOfResources`] when every slot
    /// is in use.
    pub fn allocate(&mut self, node_type: NodeType) -> Result<Handle, SceneError> {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped when it was freed.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.node_type[i] = node_type;
            self.properties[i] = Property::defaults();
            self.id[i] = NodeId::NONE;
            self.text[i] = None;
            self.font[i] = None;
            self.texture[i] = None;
            self.enabled[i] = true;
            self.reset[i] = None;
            self.world_transform[i] = Affine::IDENTITY;
            self.alive[i] = true;
            self.deleted[i] = false;
            idx
        } else if self.len < self.capacity {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.node_type.push(node_type);
            self.properties.push(Property::defaults());
            self.id.push(NodeId::NONE);
            self.text.push(None);
            self.font.push(None);
            self.texture.push(None);
            self.enabled.push(true);
            self.reset.push(None);
            self.world_transform.push(Affine::IDENTITY);
            self.generation.push(0);
            self.alive.push(true);
            self.deleted.push(false);
            idx
        } else {
            return Err(SceneError::OutOfResources);
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.dirty.mark(idx, dirty::TRANSFORM);
        self.dirty.mark(idx, dirty::PROPERTY);

        Ok(self.handle_at(idx))
    }

    /// Resolves a handle to its slot index.
    ///
    /// Fails with [`SceneError::InvalidHandle`] if the handle is out of range,
    /// its generation is stale, the slot is free, or the node is marked
    /// deleted.
    pub fn resolve(&self, handle: Handle) -> Result<u32, SceneError> {
        let idx = handle.slot();
        if self.is_valid(handle) {
            Ok(idx)
        } else {
            Err(SceneError::InvalidHandle(handle))
        }
    }

    /// Returns whether the handle refers to a live, non-deleted node.
    #[must_use]
    pub fn is_valid(&self, handle: Handle) -> bool {
        let i = handle.slot() as usize;
        handle.slot() < self.len
            && self.alive[i]
            && !self.deleted[i]
            && self.generation[i] == handle.generation()
    }

    /// Marks a node for deletion at the next sweep.
    ///
    /// The handle becomes invalid immediately. Bone nodes are owned by their
    /// skeleton and fail with [`SceneError::WrongSceneOrType`].
    pub fn mark_deleted(&mut self, handle: Handle) -> Result<(), SceneError> {
        let idx = self.resolve(handle)?;
        if self.node_type[idx as usize].is_bone() {
            return Err(SceneError::WrongSceneOrType);
        }
        self.deleted[idx as usize] = true;
        self.traversal_dirty = true;
        self.dirty.mark(idx, dirty::TOPOLOGY);
        Ok(())
    }

    /// Returns the number of slots in use, including nodes pending a sweep.
    #[must_use]
    pub fn node_count(&self) -> usize {
        (self.len as usize) - self.free_list.len()
    }

    /// Returns the maximum number of nodes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity as usize
    }

    /// Returns whether any node is waiting for a sweep.
    #[must_use]
    pub fn has_pending_deletes(&self) -> bool {
        self.deleted.iter().any(|&d| d)
    }

    // -- Property API --

    /// Returns the type of a node.
    pub fn node_type(&self, handle: Handle) -> Result<NodeType, SceneError> {
        Ok(self.node_type[self.resolve(handle)? as usize])
    }

    /// Returns a property value.
    ///
    /// Fails with [`SceneError::InvalidProperty`] if the property does not
    /// apply to the node's type.
    pub fn property(&self, handle: Handle, property: Property) -> Result<Vec4, SceneError> {
        let idx = self.resolve_property(handle, property)?;
        Ok(self.properties[idx as usize][property.id() as usize])
    }

    /// Sets a property value.
    ///
    /// Writes to bone nodes are accepted and ignored. Position, rotation and
    /// scale writes mark the TRANSFORM channel with eager propagation to
    /// descendants; every write marks the PROPERTY channel.
    pub fn set_property(
        &mut self,
        handle: Handle,
        property: Property,
        value: Vec4,
    ) -> Result<(), SceneError> {
        let idx = self.resolve_property(handle, property)?;
        if self.node_type[idx as usize].is_bone() {
            return Ok(());
        }
        self.write_slot(idx, property, value);
        Ok(())
    }

    /// Returns the computed world transform of a node.
    ///
    /// Only up to date after [`Scene::evaluate`](crate::scene::Scene::evaluate).
    pub fn world_transform(&self, handle: Handle) -> Result<Affine, SceneError> {
        Ok(self.world_transform[self.resolve(handle)? as usize])
    }

    // -- Raw-index accessors --
    //
    // These accept raw slot indices (as found in `FrameChanges` or the
    // traversal order) and skip generation validation.

    /// Returns the computed world transform at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len`.
    #[must_use]
    pub fn world_transform_at(&self, idx: u32) -> Affine {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.world_transform[idx as usize]
    }

    /// Returns the property value at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len`.
    #[must_use]
    pub fn property_at(&self, idx: u32, property: Property) -> Vec4 {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.properties[idx as usize][property.id() as usize]
    }

    // -- Internal helpers --

    /// Builds the current handle for a slot.
    #[inline]
    pub(crate) fn handle_at(&self, idx: u32) -> Handle {
        Handle::new(idx, self.generation[idx as usize])
    }

    /// Resolves a handle and checks that `property` applies to its type.
    pub(crate) fn resolve_property(
        &self,
        handle: Handle,
        property: Property,
    ) -> Result<u32, SceneError> {
        let idx = self.resolve(handle)?;
        if self.node_type[idx as usize].supports(property) {
            Ok(idx)
        } else {
            Err(SceneError::InvalidProperty)
        }
    }

    /// Writes a property without validation and marks dirty channels.
    pub(crate) fn write_slot(&mut self, idx: u32, property: Property, value: Vec4) {
        self.properties[idx as usize][property.id() as usize] = value;
        if property.affects_transform() {
            self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
        }
        self.dirty.mark(idx, dirty::PROPERTY);
    }

    /// Returns a slot to the free list.
    ///
    /// The slot must already be unlinked from every chain.
    pub(crate) fn release_slot(&mut self, idx: u32) {
        let i = idx as usize;
        debug_assert!(
            self.first_child[i] == INVALID,
            "released slot still has children"
        );
        self.dirty.remove_key(idx);

        // Bump generation so old handles fail validation once the slot is reused.
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.alive[i] = false;
        self.deleted[i] = false;
        self.id[i] = NodeId::NONE;
        self.text[i] = None;
        self.font[i] = None;
        self.texture[i] = None;
        self.reset[i] = None;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
    }
}
