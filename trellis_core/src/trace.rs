// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the scene tick.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`Scene::update_with`](crate::scene::Scene::update_with) calls at each
//! stage of a tick. All method bodies default to no-ops, so implementing only
//! the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`TickSummaryBuilder`] collects counters during a tick and produces a
//! [`TickSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`PropertyWrite`] events and the
//!   corresponding `TraceSink` method.

use crate::node::{Handle, NodeId, Property};

#[cfg(feature = "trace-rich")]
use crate::math::Vec4;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why an animation track ended during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// A once-mode track reached the end of its trajectory. Its completion
    /// token is fired.
    Completed,
    /// The target node was deleted or its handle became stale. The completion
    /// token is released without being invoked.
    TargetInvalid,
}

/// A non-fatal condition reported during scene manipulation.
///
/// Warnings raised outside a tick are queued and emitted at the start of the
/// next traced tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Warning {
    /// [`Scene::set_render_order`](crate::scene::Scene::set_render_order)
    /// received a value outside `0..=15`.
    RenderOrderClamped {
        /// The requested order.
        requested: u32,
        /// The order that was applied.
        applied: u8,
    },
    /// A text node has a font but the host could not measure its text.
    TextMetricsUnavailable {
        /// The text node.
        node: Handle,
    },
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of every tick.
#[derive(Clone, Copy, Debug)]
pub struct TickBeginEvent {
    /// Monotonic tick counter.
    pub tick_index: u64,
    /// Time step in seconds.
    pub dt: f32,
    /// Tracks held by the engine before advancing.
    pub active_tracks: usize,
}

/// Emitted when an animation track leaves the engine during a tick.
#[derive(Clone, Copy, Debug)]
pub struct AnimationEndEvent {
    /// Tick counter.
    pub tick_index: u64,
    /// The animated node (possibly no longer valid).
    pub node: Handle,
    /// The animated property.
    pub property: Property,
    /// Why the track ended.
    pub reason: EndReason,
}

/// Emitted for every slot reclaimed by the sweep.
#[derive(Clone, Copy, Debug)]
pub struct NodeSweptEvent {
    /// Tick counter.
    pub tick_index: u64,
    /// The handle the node had before it was swept.
    pub node: Handle,
    /// The node's id, or [`NodeId::NONE`].
    pub id: NodeId,
    /// Number of children promoted into the node's former position.
    pub promoted_children: u32,
}

/// Emitted for a [`Warning`].
#[derive(Clone, Copy, Debug)]
pub struct WarningEvent {
    /// Tick counter of the tick that emitted the warning.
    pub tick_index: u64,
    /// The warning.
    pub warning: Warning,
}

/// Per-tick summary produced by [`TickSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickSummary {
    /// Tick counter.
    pub tick_index: u64,
    /// Time step in seconds.
    pub dt: f32,
    /// Tracks that were advanced.
    pub tracks_advanced: u32,
    /// Property values written by animations.
    pub property_writes: u32,
    /// Once-mode tracks that completed (their tokens, if any, were fired).
    pub completions: u32,
    /// Tracks released because their target became invalid.
    pub released: u32,
    /// Slots reclaimed by the sweep.
    pub nodes_swept: u32,
    /// Tracks still held by the engine at the end of the tick.
    pub active_tracks: usize,
}

/// A single animation write (requires `trace-rich` feature).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct PropertyWrite {
    /// The written node.
    pub node: Handle,
    /// The written property.
    pub property: Property,
    /// The value written.
    pub value: Vec4,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the scene tick.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called at the start of a tick.
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        _ = e;
    }

    /// Called when a track completes or is dropped for an invalid target.
    fn on_animation_end(&mut self, e: &AnimationEndEvent) {
        _ = e;
    }

    /// Called for every node reclaimed by the sweep.
    fn on_node_swept(&mut self, e: &NodeSweptEvent) {
        _ = e;
    }

    /// Called for every queued warning.
    fn on_warning(&mut self, e: &WarningEvent) {
        _ = e;
    }

    /// Called with the per-tick summary.
    fn on_tick_summary(&mut self, s: &TickSummary) {
        _ = s;
    }

    /// Called with the tick's animation writes (requires `trace-rich`
    /// feature).
    #[cfg(feature = "trace-rich")]
    fn on_property_writes(&mut self, tick_index: u64, writes: &[PropertyWrite]) {
        _ = (tick_index, writes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Returns whether events reach a sink.
    ///
    /// Always `false` without the `trace` feature.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits a [`TickBeginEvent`].
    #[inline]
    pub fn tick_begin(&mut self, e: &TickBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_tick_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AnimationEndEvent`].
    #[inline]
    pub fn animation_end(&mut self, e: &AnimationEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_animation_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NodeSweptEvent`].
    #[inline]
    pub fn node_swept(&mut self, e: &NodeSweptEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node_swept(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`WarningEvent`].
    #[inline]
    pub fn warning(&mut self, e: &WarningEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_warning(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickSummary`].
    #[inline]
    pub fn tick_summary(&mut self, s: &TickSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_tick_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits animation writes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn property_writes(&mut self, tick_index: u64, writes: &[PropertyWrite]) {
        if let Some(s) = &mut self.sink {
            s.on_property_writes(tick_index, writes);
        }
    }
}

// ---------------------------------------------------------------------------
// TickSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects counters during a tick and produces a [`TickSummary`].
#[derive(Debug)]
pub struct TickSummaryBuilder {
    summary: TickSummary,
}

impl TickSummaryBuilder {
    /// Starts building a summary for the given tick.
    #[must_use]
    pub fn new(tick_index: u64, dt: f32) -> Self {
        Self {
            summary: TickSummary {
                tick_index,
                dt,
                ..TickSummary::default()
            },
        }
    }

    /// Records the number of tracks advanced and values written.
    pub fn record_advance(&mut self, tracks_advanced: u32, property_writes: u32) {
        self.summary.tracks_advanced += tracks_advanced;
        self.summary.property_writes += property_writes;
    }

    /// Records a fired completion token.
    pub fn record_completion(&mut self) {
        self.summary.completions += 1;
    }

    /// Records a track released for an invalid target.
    pub fn record_release(&mut self) {
        self.summary.released += 1;
    }

    /// Records a swept node.
    pub fn record_sweep(&mut self) {
        self.summary.nodes_swept += 1;
    }

    /// Consumes the builder and produces the final [`TickSummary`].
    #[must_use]
    pub fn finish(self, active_tracks: usize) -> TickSummary {
        TickSummary {
            active_tracks,
            ..self.summary
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> TickBeginEvent {
        TickBeginEvent {
            tick_index: 42,
            dt: 1.0 / 60.0,
            active_tracks: 3,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_tick_begin(&sample_begin());
        sink.on_warning(&WarningEvent {
            tick_index: 0,
            warning: Warning::RenderOrderClamped {
                requested: 99,
                applied: 15,
            },
        });
        sink.on_tick_summary(&TickSummary::default());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        assert!(!tracer.is_active());
        tracer.tick_begin(&sample_begin());
        tracer.tick_summary(&TickSummary::default());
    }

    #[test]
    fn summary_builder_accumulates() {
        let mut builder = TickSummaryBuilder::new(7, 0.5);
        builder.record_advance(3, 2);
        builder.record_advance(1, 1);
        builder.record_completion();
        builder.record_release();
        builder.record_sweep();
        builder.record_sweep();

        let summary = builder.finish(4);
        assert_eq!(summary.tick_index, 7);
        assert_eq!(summary.dt, 0.5);
        assert_eq!(summary.tracks_advanced, 4);
        assert_eq!(summary.property_writes, 3);
        assert_eq!(summary.completions, 1);
        assert_eq!(summary.released, 1);
        assert_eq!(summary.nodes_swept, 2);
        assert_eq!(summary.active_tracks, 4);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            ticks: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_tick_begin(&mut self, e: &TickBeginEvent) {
                self.ticks.push(e.tick_index);
            }
        }

        let mut sink = RecordingSink { ticks: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        assert!(tracer.is_active());
        tracer.tick_begin(&sample_begin());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.ticks, &[42]);
    }
}
