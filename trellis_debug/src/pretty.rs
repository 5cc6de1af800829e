// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use trellis_core::node::Handle;
use trellis_core::trace::{
    AnimationEndEvent, EndReason, NodeSweptEvent, PropertyWrite, TickBeginEvent, TickSummary,
    TraceSink, Warning, WarningEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Also prints every individual property write, not just their count.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

struct ShowHandle(Handle);

impl std::fmt::Display for ShowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}@{}", self.0.index(), self.0.generation())
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] #{} dt={:.2}ms tracks={}",
            e.tick_index,
            e.dt * 1000.0,
            e.active_tracks,
        );
    }

    fn on_animation_end(&mut self, e: &AnimationEndEvent) {
        let reason = match e.reason {
            EndReason::Completed => "completed",
            EndReason::TargetInvalid => "RELEASED (target invalid)",
        };
        let _ = writeln!(
            self.writer,
            "[anim:end] tick={} node={} {} {reason}",
            e.tick_index,
            ShowHandle(e.node),
            e.property.name(),
        );
    }

    fn on_node_swept(&mut self, e: &NodeSweptEvent) {
        let _ = writeln!(
            self.writer,
            "[sweep] tick={} node={} id={:?} promoted={}",
            e.tick_index,
            ShowHandle(e.node),
            e.id,
            e.promoted_children,
        );
    }

    fn on_warning(&mut self, e: &WarningEvent) {
        let _ = match e.warning {
            Warning::RenderOrderClamped { requested, applied } => writeln!(
                self.writer,
                "[warn] tick={} render order {requested} clamped to {applied}",
                e.tick_index,
            ),
            Warning::TextMetricsUnavailable { node } => writeln!(
                self.writer,
                "[warn] tick={} no text metrics for node={}",
                e.tick_index,
                ShowHandle(node),
            ),
        };
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] tick={} advanced={} writes={} completed={} \
             released={} swept={} active={}",
            s.tick_index,
            s.tracks_advanced,
            s.property_writes,
            s.completions,
            s.released,
            s.nodes_swept,
            s.active_tracks,
        );
    }

    fn on_property_writes(&mut self, tick_index: u64, writes: &[PropertyWrite]) {
        let _ = writeln!(
            self.writer,
            "[writes] tick={tick_index} count={}",
            writes.len(),
        );
        if self.verbose {
            for write in writes {
                let [x, y, z, w] = write.value.to_array();
                let _ = writeln!(
                    self.writer,
                    "    node={} {} = ({x:.3}, {y:.3}, {z:.3}, {w:.3})",
                    ShowHandle(write.node),
                    write.property.name(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::math::Vec4;
    use trellis_core::node::{NodeId, Property};

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_tick_begin(&TickBeginEvent {
            tick_index: 1,
            dt: 0.016,
            active_tracks: 2,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[tick]"), "got: {output}");
        assert!(output.contains("#1"), "got: {output}");
        assert!(output.contains("tracks=2"), "got: {output}");
    }

    #[test]
    fn pretty_print_release_and_sweep() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let node = Handle::from_raw(3);
        sink.on_animation_end(&AnimationEndEvent {
            tick_index: 4,
            node,
            property: Property::FillAngle,
            reason: EndReason::TargetInvalid,
        });
        sink.on_node_swept(&NodeSweptEvent {
            tick_index: 4,
            node,
            id: NodeId::NONE,
            promoted_children: 1,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2, "got: {output}");
        assert!(lines[0].contains("fill_angle"), "got: {output}");
        assert!(lines[0].contains("RELEASED"), "got: {output}");
        assert!(lines[1].starts_with("[sweep]"), "got: {output}");
        assert!(lines[1].contains("promoted=1"), "got: {output}");
    }

    #[test]
    fn verbose_lists_each_write() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).verbose(true);
        let write = PropertyWrite {
            node: Handle::from_raw(0),
            property: Property::Position,
            value: Vec4::new(1.0, 2.0, 0.0, 0.0),
        };
        sink.on_property_writes(2, &[write, write]);
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 3, "got: {output}");
        assert!(output.contains("(1.000, 2.000"), "got: {output}");
    }
}
