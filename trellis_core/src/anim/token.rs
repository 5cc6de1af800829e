// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Completion notification.

use alloc::boxed::Box;
use core::fmt;

use crate::node::{Handle, Property};
use crate::scene::Scene;

/// Passed to a [`CompletionToken`] when its track finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationEnd {
    /// The animated node.
    pub node: Handle,
    /// The animated property.
    pub property: Property,
    /// Whether the track ran to its natural end.
    pub finished: bool,
}

/// A callback owned by an animation track.
///
/// The token is consumed exactly once: [`fire`](Self::fire) runs the callback
/// when the track completes; dropping the token (on cancellation, replacement
/// or deletion of the target) releases it without running the callback.
/// Anything the closure captures is dropped in either case.
pub struct CompletionToken(Box<dyn FnOnce(&mut Scene, AnimationEnd)>);

impl CompletionToken {
    /// Wraps a completion callback.
    ///
    /// The callback receives the scene, so it may start animations, cancel
    /// them, or create and delete nodes.
    pub fn new(callback: impl FnOnce(&mut Scene, AnimationEnd) + 'static) -> Self {
        Self(Box::new(callback))
    }

    /// Consumes the token and runs the callback.
    pub fn fire(self, scene: &mut Scene, end: AnimationEnd) {
        (self.0)(scene, end);
    }
}

impl fmt::Debug for CompletionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionToken").finish_non_exhaustive()
    }
}
