// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Property writes ([`on_property_writes`](TraceSink::on_property_writes))
//! store only the count.

use trellis_core::node::{Handle, NodeId, Property};
use trellis_core::trace::{
    AnimationEndEvent, EndReason, NodeSweptEvent, PropertyWrite, TickBeginEvent, TickSummary,
    TraceSink, Warning, WarningEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TICK_BEGIN: u8 = 1;
const TAG_ANIMATION_END: u8 = 2;
const TAG_NODE_SWEPT: u8 = 3;
const TAG_WARNING: u8 = 4;
const TAG_TICK_SUMMARY: u8 = 5;
const TAG_PROPERTY_WRITES_COUNT: u8 = 6;

const WARNING_RENDER_ORDER: u8 = 0;
const WARNING_TEXT_METRICS: u8 = 1;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    fn write_handle(&mut self, h: Handle) {
        self.write_u32(h.to_raw());
    }

    fn write_count(&mut self, n: usize) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "counts capped at u32::MAX for recording"
        )]
        self.write_u32(n.min(u32::MAX as usize) as u32);
    }

    fn write_end_reason(&mut self, r: EndReason) {
        self.write_u8(match r {
            EndReason::Completed => 0,
            EndReason::TargetInvalid => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        self.write_u8(TAG_TICK_BEGIN);
        self.write_u64(e.tick_index);
        self.write_f32(e.dt);
        self.write_count(e.active_tracks);
    }

    fn on_animation_end(&mut self, e: &AnimationEndEvent) {
        self.write_u8(TAG_ANIMATION_END);
        self.write_u64(e.tick_index);
        self.write_handle(e.node);
        self.write_u8(e.property.id());
        self.write_end_reason(e.reason);
    }

    fn on_node_swept(&mut self, e: &NodeSweptEvent) {
        self.write_u8(TAG_NODE_SWEPT);
        self.write_u64(e.tick_index);
        self.write_handle(e.node);
        self.write_u64(e.id.0);
        self.write_u32(e.promoted_children);
    }

    fn on_warning(&mut self, e: &WarningEvent) {
        self.write_u8(TAG_WARNING);
        self.write_u64(e.tick_index);
        // Both variants use the same record size: kind, u32, u8.
        match e.warning {
            Warning::RenderOrderClamped { requested, applied } => {
                self.write_u8(WARNING_RENDER_ORDER);
                self.write_u32(requested);
                self.write_u8(applied);
            }
            Warning::TextMetricsUnavailable { node } => {
                self.write_u8(WARNING_TEXT_METRICS);
                self.write_handle(node);
                self.write_u8(0);
            }
        }
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.write_u8(TAG_TICK_SUMMARY);
        self.write_u64(s.tick_index);
        self.write_f32(s.dt);
        self.write_u32(s.tracks_advanced);
        self.write_u32(s.property_writes);
        self.write_u32(s.completions);
        self.write_u32(s.released);
        self.write_u32(s.nodes_swept);
        self.write_count(s.active_tracks);
    }

    fn on_property_writes(&mut self, tick_index: u64, writes: &[PropertyWrite]) {
        self.write_u8(TAG_PROPERTY_WRITES_COUNT);
        self.write_u64(tick_index);
        self.write_count(writes.len());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`TickBeginEvent`].
    TickBegin(TickBeginEvent),
    /// An [`AnimationEndEvent`].
    AnimationEnd(AnimationEndEvent),
    /// A [`NodeSweptEvent`].
    NodeSwept(NodeSweptEvent),
    /// A [`WarningEvent`].
    Warning(WarningEvent),
    /// A [`TickSummary`].
    TickSummary(TickSummary),
    /// Property-write count for a tick.
    PropertyWritesCount {
        /// Tick counter.
        tick_index: u64,
        /// Number of property writes.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f32(&mut self) -> Option<f32> {
        self.read_u32().map(f32::from_bits)
    }

    fn read_handle(&mut self) -> Option<Handle> {
        self.read_u32().map(Handle::from_raw)
    }

    fn read_property(&mut self) -> Option<Property> {
        Property::from_id(self.read_u8()?)
    }

    fn read_end_reason(&mut self) -> Option<EndReason> {
        Some(match self.read_u8()? {
            0 => EndReason::Completed,
            _ => EndReason::TargetInvalid,
        })
    }

    fn decode_tick_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TickBegin(TickBeginEvent {
            tick_index: self.read_u64()?,
            dt: self.read_f32()?,
            active_tracks: self.read_u32()? as usize,
        }))
    }

    fn decode_animation_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::AnimationEnd(AnimationEndEvent {
            tick_index: self.read_u64()?,
            node: self.read_handle()?,
            property: self.read_property()?,
            reason: self.read_end_reason()?,
        }))
    }

    fn decode_node_swept(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::NodeSwept(NodeSweptEvent {
            tick_index: self.read_u64()?,
            node: self.read_handle()?,
            id: NodeId(self.read_u64()?),
            promoted_children: self.read_u32()?,
        }))
    }

    fn decode_warning(&mut self) -> Option<RecordedEvent> {
        let tick_index = self.read_u64()?;
        let kind = self.read_u8()?;
        let payload = self.read_u32()?;
        let extra = self.read_u8()?;
        let warning = match kind {
            WARNING_RENDER_ORDER => Warning::RenderOrderClamped {
                requested: payload,
                applied: extra,
            },
            WARNING_TEXT_METRICS => Warning::TextMetricsUnavailable {
                node: Handle::from_raw(payload),
            },
            _ => return None,
        };
        Some(RecordedEvent::Warning(WarningEvent {
            tick_index,
            warning,
        }))
    }

    fn decode_tick_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TickSummary(TickSummary {
            tick_index: self.read_u64()?,
            dt: self.read_f32()?,
            tracks_advanced: self.read_u32()?,
            property_writes: self.read_u32()?,
            completions: self.read_u32()?,
            released: self.read_u32()?,
            nodes_swept: self.read_u32()?,
            active_tracks: self.read_u32()? as usize,
        }))
    }

    fn decode_property_writes_count(&mut self) -> Option<RecordedEvent> {
        let tick_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::PropertyWritesCount { tick_index, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_TICK_BEGIN => self.decode_tick_begin(),
            TAG_ANIMATION_END => self.decode_animation_end(),
            TAG_NODE_SWEPT => self.decode_node_swept(),
            TAG_WARNING => self.decode_warning(),
            TAG_TICK_SUMMARY => self.decode_tick_summary(),
            TAG_PROPERTY_WRITES_COUNT => self.decode_property_writes_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> TickSummary {
        TickSummary {
            tick_index: 7,
            dt: 1.0 / 60.0,
            tracks_advanced: 4,
            property_writes: 3,
            completions: 1,
            released: 1,
            nodes_swept: 2,
            active_tracks: 2,
        }
    }

    #[test]
    fn records_a_tick_in_order() {
        let mut rec = RecorderSink::new();
        let node = Handle::from_raw(0x0002_0005);
        rec.on_tick_begin(&TickBeginEvent {
            tick_index: 7,
            dt: 1.0 / 60.0,
            active_tracks: 4,
        });
        rec.on_animation_end(&AnimationEndEvent {
            tick_index: 7,
            node,
            property: Property::Color,
            reason: EndReason::Completed,
        });
        rec.on_node_swept(&NodeSweptEvent {
            tick_index: 7,
            node,
            id: NodeId::from_name("panel"),
            promoted_children: 3,
        });
        rec.on_tick_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        match &events[0] {
            RecordedEvent::TickBegin(e) => {
                assert_eq!(e.tick_index, 7);
                assert_eq!(e.dt, 1.0 / 60.0);
                assert_eq!(e.active_tracks, 4);
            }
            other => panic!("expected TickBegin, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::AnimationEnd(e) => {
                assert_eq!(e.node, node);
                assert_eq!(e.property, Property::Color);
                assert_eq!(e.reason, EndReason::Completed);
            }
            other => panic!("expected AnimationEnd, got {other:?}"),
        }
        match &events[2] {
            RecordedEvent::NodeSwept(e) => {
                assert_eq!(e.id, NodeId::from_name("panel"));
                assert_eq!(e.promoted_children, 3);
            }
            other => panic!("expected NodeSwept, got {other:?}"),
        }
        match &events[3] {
            RecordedEvent::TickSummary(s) => assert_eq!(*s, sample_summary()),
            other => panic!("expected TickSummary, got {other:?}"),
        }
    }

    #[test]
    fn warnings_keep_their_payload() {
        let mut rec = RecorderSink::new();
        let node = Handle::from_raw(9);
        rec.on_warning(&WarningEvent {
            tick_index: 1,
            warning: Warning::RenderOrderClamped {
                requested: 40,
                applied: 15,
            },
        });
        rec.on_warning(&WarningEvent {
            tick_index: 1,
            warning: Warning::TextMetricsUnavailable { node },
        });

        let warnings: Vec<_> = decode(rec.as_bytes())
            .map(|e| match e {
                RecordedEvent::Warning(w) => w.warning,
                other => panic!("expected Warning, got {other:?}"),
            })
            .collect();
        assert_eq!(
            warnings,
            [
                Warning::RenderOrderClamped {
                    requested: 40,
                    applied: 15
                },
                Warning::TextMetricsUnavailable { node },
            ]
        );
    }

    #[test]
    fn property_writes_store_only_the_count() {
        let mut rec = RecorderSink::new();
        let write = PropertyWrite {
            node: Handle::from_raw(1),
            property: Property::Position,
            value: trellis_core::math::Vec4::ONE,
        };
        rec.on_property_writes(3, &[write, write]);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match events.as_slice() {
            [RecordedEvent::PropertyWritesCount { tick_index, count }] => {
                assert_eq!((*tick_index, *count), (3, 2));
            }
            other => panic!("expected one PropertyWritesCount, got {other:?}"),
        }
    }

    #[test]
    fn truncated_recording_stops_cleanly() {
        let mut rec = RecorderSink::new();
        rec.on_tick_summary(&sample_summary());
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 0);
        assert_eq!(decode(&[0xFF, 1, 2]).count(), 0);
    }
}
