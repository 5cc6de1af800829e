// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Scene ticks carry no wall-clock timestamps, so the exporter places them on
//! a timeline built from the accumulated `dt` of each tick. Every tick becomes
//! a complete (`"X"`) event spanning its `dt`; the events it emitted are
//! instants at the tick's start.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    // Start of the current tick, in microseconds.
    let mut tick_start_us = 0.0_f64;
    let mut clock_us = 0.0_f64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::TickBegin(e) => {
                let dur = f64::from(e.dt) * 1_000_000.0;
                tick_start_us = clock_us;
                clock_us += dur;
                events.push(json!({
                    "ph": "X",
                    "name": "Tick",
                    "cat": "Scene",
                    "ts": tick_start_us,
                    "dur": dur,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "tick_index": e.tick_index,
                        "active_tracks": e.active_tracks,
                    }
                }));
            }
            RecordedEvent::AnimationEnd(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.reason),
                    "cat": "Animation",
                    "ts": tick_start_us,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "tick_index": e.tick_index,
                        "node": e.node.index(),
                        "generation": e.node.generation(),
                        "property": e.property.name(),
                    }
                }));
            }
            RecordedEvent::NodeSwept(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "NodeSwept",
                    "cat": "Scene",
                    "ts": tick_start_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "tick_index": e.tick_index,
                        "node": e.node.index(),
                        "id": format!("{:#018x}", e.id.0),
                        "promoted_children": e.promoted_children,
                    }
                }));
            }
            RecordedEvent::Warning(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Warning",
                    "cat": "Scene",
                    "ts": tick_start_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "tick_index": e.tick_index,
                        "warning": format!("{:?}", e.warning),
                    }
                }));
            }
            RecordedEvent::TickSummary(s) => {
                events.push(json!({
                    "ph": "C",
                    "name": "Tracks",
                    "cat": "Summary",
                    "ts": tick_start_us,
                    "pid": 0,
                    "args": {
                        "active": s.active_tracks,
                        "writes": s.property_writes,
                        "completions": s.completions,
                        "released": s.released,
                        "swept": s.nodes_swept,
                    }
                }));
            }
            RecordedEvent::PropertyWritesCount { tick_index, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "PropertyWrites",
                    "cat": "Rich",
                    "ts": tick_start_us,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "tick_index": tick_index,
                        "count": count,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use trellis_core::node::{Handle, Property};
    use trellis_core::trace::{AnimationEndEvent, EndReason, TickBeginEvent, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_tick_begin(&TickBeginEvent {
            tick_index: 1,
            dt: 0.5,
            active_tracks: 1,
        });
        rec.on_tick_begin(&TickBeginEvent {
            tick_index: 2,
            dt: 0.25,
            active_tracks: 1,
        });
        rec.on_animation_end(&AnimationEndEvent {
            tick_index: 2,
            node: Handle::from_raw(0),
            property: Property::Scale,
            reason: EndReason::Completed,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "X");
        assert_eq!(parsed[0]["dur"], 500_000.0);

        // The second tick starts where the first one ended.
        assert_eq!(parsed[1]["ts"], 500_000.0);

        assert_eq!(parsed[2]["name"], "Completed");
        assert_eq!(parsed[2]["ts"], 500_000.0);
        assert_eq!(parsed[2]["args"]["property"], "scale");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
