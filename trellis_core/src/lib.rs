// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node pool, scene graph and property animation for embedded GUI scenes.
//!
//! `trellis_core` manages a scene of hierarchical visual nodes and animates
//! their properties over time. It is `no_std` compatible (with `alloc`) and
//! stores nodes in struct-of-arrays slots addressed by generational handles.
//!
//! # Architecture
//!
//! The host drives the scene once per frame:
//!
//! ```text
//!   host frame (dt)
//!       │
//!       ▼
//!   Scene::update(dt) ──► AnimationEngine::advance ──► property writes
//!       │                        │
//!       │                        └──► completed tracks ──► CompletionToken::fire
//!       ▼
//!   Scene::sweep() ──► deleted slots unlinked, generations bumped
//!       │
//!       ▼
//!   Scene::evaluate() ──► FrameChanges (world transforms, render order)
//! ```
//!
//! **[`node`]** — Handles, node types, property identifiers and the
//! generation-checked [`NodePool`](node::NodePool).
//!
//! **[`scene`]** — The [`Scene`](scene::Scene): parent/child chains, the
//! top-level render chain, reparenting with cycle detection, cloning,
//! template reset, deferred deletion and world-transform evaluation.
//!
//! **[`anim`]** — Easing curves, playback modes, animation tracks and the
//! [`AnimationEngine`](anim::AnimationEngine).
//!
//! **[`dirty`]** — Dirty-tracking channels (via `understory_dirty`).
//!
//! **[`config`]** — [`SceneConfig`](config::SceneConfig) and the
//! [`SceneHooks`](config::SceneHooks) capabilities injected at construction.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! per-tick instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-track
//!   property write events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod anim;
pub mod config;
pub mod dirty;
pub mod error;
pub mod math;
pub mod node;
pub mod scene;
pub mod trace;

pub use error::SceneError;
