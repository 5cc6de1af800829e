// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage and identity.
//!
//! A *node* is an element of a GUI scene. Each node has:
//!
//! - An identity ([`Handle`]): a generational handle that becomes invalid as
//!   soon as the node is marked deleted, and stays invalid after its slot is
//!   swept and reused.
//! - A [`NodeType`] that decides which [`Property`] values apply to it.
//! - Property values stored as [`Vec4`](crate::math::Vec4), written by callers
//!   and by the animation engine.
//! - Optional id, text, font, texture and a template reset point.
//!
//! Nodes are stored in struct-of-arrays layout in a fixed-capacity
//! [`NodePool`]. Chain links between slots are maintained by
//! [`scene`](crate::scene).
//!
//! # Dirty tracking
//!
//! Property writes mark dirty channels (see [`dirty`](crate::dirty)):
//! position, rotation and scale mark **TRANSFORM** with eager propagation to
//! descendants, every write marks **PROPERTY**, and allocation or deletion
//! marks **TOPOLOGY**.

mod id;
mod kind;
mod pool;

pub use id::{FontId, Handle, INVALID, NodeId, NodeRef, SceneId, TextureId};
pub use kind::{NodeType, Property};
pub use pool::{MAX_CAPACITY, NodePool};

pub(crate) use pool::ResetPoint;
