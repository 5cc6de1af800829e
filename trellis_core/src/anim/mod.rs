// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property animation.
//!
//! An *animation track* moves one [`Property`](crate::node::Property) of one
//! node from the value it had when the animation started towards a target
//! value. Every tick the track:
//!
//! 1. consumes its start delay, if any (leftover time carries over),
//! 2. computes raw progress `t = elapsed / duration` (`1` for zero duration),
//! 3. folds `t` through its [`Playback`] mode,
//! 4. maps the result through its [`Curve`] (overshoot is kept), and
//! 5. writes `from * (1 - f) + to * f` into the node.
//!
//! Once-mode tracks complete when `t` reaches `1` and fire their
//! [`CompletionToken`] after every track has been advanced for the tick.
//! Tracks are replaced by starting another animation on the same
//! `(node, property)`, removed by cancellation, and dropped when their node is
//! deleted; in each of those cases the token is released without firing.

mod curve;
mod easing;
mod engine;
mod playback;
mod token;
mod track;

pub use curve::{Curve, ReleaseHook, SampledCurve};
pub use easing::{Easing, EasingDirection, EasingFamily};
pub use engine::AnimationEngine;
pub use playback::Playback;
pub use token::{AnimationEnd, CompletionToken};
pub use track::{Animation, AnimationTarget, TrackState};

pub(crate) use engine::TickLog;
