// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Trellis uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! find the nodes whose derived state must be recomputed by
//! [`Scene::evaluate`](crate::scene::Scene::evaluate).
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`TRANSFORM`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from child to parent, so moving a node marks its whole subtree.
//!
//! - **Local-only**: [`PROPERTY`] is marked with the default policy on every
//!   property write, including animation writes. Only the written node
//!   appears in the drain output.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on allocation, deletion and every
//!   chain change. It triggers a render traversal rebuild during evaluation.

use understory_dirty::Channel;

/// Position, rotation or scale changed, or the node moved to another parent.
/// Requires world transform recomputation for descendants.
pub const TRANSFORM: Channel = Channel::new(0);

/// Any property value changed. No propagation.
pub const PROPERTY: Channel = Channel::new(1);

/// Chain structure changed; triggers render traversal rebuild.
pub const TOPOLOGY: Channel = Channel::new(2);
