// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node, scene and identifier handle types.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

/// Sentinel value indicating "no node" in slot link fields.
///
/// Slot indices never exceed `u16::MAX - 1`; links are stored widened to
/// `u32` to match the dirty tracker's key type.
pub const INVALID: u32 = u32::MAX;

/// A handle to a node in a [`NodePool`](super::NodePool).
///
/// Packs a 16-bit generation counter above a 16-bit slot index so that stale
/// handles can be detected after a node is swept and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u32);

impl Handle {
    #[inline]
    pub(crate) const fn new(idx: u32, generation: u16) -> Self {
        debug_assert!(idx < u16::MAX as u32, "slot index out of handle range");
        Self(((generation as u32) << 16) | (idx & 0xffff))
    }

    /// Slot index widened for indexing the pool arrays.
    #[inline]
    pub(crate) const fn slot(self) -> u32 {
        self.0 & 0xffff
    }

    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        (self.0 & 0xffff) as u16
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Returns the packed `generation:16 | index:16` value.
    #[inline]
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    /// Reconstructs a handle from a value produced by [`to_raw`](Self::to_raw).
    ///
    /// The result is only meaningful to the pool that issued it; validity is
    /// checked on every use.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}@gen{})", self.index(), self.generation())
    }
}

/// Hashed textual identifier of a node.
///
/// Ids are assigned by templates or [`Scene::set_id`](crate::scene::Scene::set_id)
/// and used for lookup and as keys of the mapping returned by
/// [`Scene::clone_tree`](crate::scene::Scene::clone_tree).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The id of anonymous nodes.
    pub const NONE: Self = Self(0);

    /// Hashes a textual id (64-bit FNV-1a).
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let bytes = name.as_bytes();
        let mut hash = OFFSET;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Returns whether this is [`NodeId::NONE`].
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:#018x})", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// Identity of a [`Scene`](crate::scene::Scene), unique per process.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(pub u32);

impl SceneId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneId({})", self.0)
    }
}

/// A node handle tagged with the scene that issued it.
///
/// Embedders that hand node references to scripts should hold `NodeRef`s and
/// resolve them with [`Scene::check`](crate::scene::Scene::check), which
/// rejects references coming from another scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// Scene that issued the handle.
    pub scene: SceneId,
    /// The node within that scene.
    pub handle: Handle,
}

/// An opaque reference to a font owned by the resource layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// An opaque reference to a texture owned by the resource layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_packs_generation_above_index() {
        let h = Handle::new(7, 3);
        assert_eq!(h.index(), 7);
        assert_eq!(h.generation(), 3);
        assert_eq!(h.to_raw(), (3 << 16) | 7);
        assert_eq!(Handle::from_raw(h.to_raw()), h);
    }

    #[test]
    fn node_id_hash_is_stable() {
        assert_eq!(NodeId::from_name(""), NodeId(0xcbf2_9ce4_8422_2325));
        assert_eq!(NodeId::from_name("a"), NodeId(0xaf63_dc4c_8601_ec8c));
        assert_ne!(NodeId::from("box"), NodeId::from("text"));
    }

    #[test]
    fn scene_ids_are_unique() {
        assert_ne!(SceneId::next(), SceneId::next());
    }
}
