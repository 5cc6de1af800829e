// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by scene and animation operations.

use core::fmt;

use crate::node::{Handle, NodeId};

/// Errors returned by [`Scene`](crate::scene::Scene) operations.
///
/// Every error is local to the rejected call: the scene graph and the
/// animation engine are left exactly as they were before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneError {
    /// The node pool or the animation track table is full.
    OutOfResources,
    /// Reparenting would make a node its own ancestor.
    InfiniteRecursion,
    /// The property does not exist or does not apply to the node's type.
    InvalidProperty,
    /// The handle is stale, deleted, or was never issued by this pool.
    InvalidHandle(Handle),
    /// The node belongs to another scene, or its type does not allow the
    /// operation (e.g. deleting a bone node).
    WrongSceneOrType,
    /// A named font or texture is unknown to the scene's resource hooks.
    ResourceNotFound(NodeId),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfResources => f.write_str("not enough resources for the operation"),
            Self::InfiniteRecursion => {
                f.write_str("unable to set parent since it would cause an infinite loop")
            }
            Self::InvalidProperty => f.write_str("property not found for node type"),
            Self::InvalidHandle(handle) => write!(f, "deleted or invalid node {handle:?}"),
            Self::WrongSceneOrType => {
                f.write_str("node used in the wrong scene or with the wrong node type")
            }
            Self::ResourceNotFound(name) => write!(f, "resource {name:?} not found in scene"),
        }
    }
}

impl core::error::Error for SceneError {}
