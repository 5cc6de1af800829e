// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame tick: advance animations, fire completions, sweep.

use super::Scene;
use crate::anim::{AnimationEnd, TickLog};
use crate::trace::{
    AnimationEndEvent, EndReason, TickBeginEvent, TickSummary, TickSummaryBuilder, Tracer,
    WarningEvent,
};

impl Scene {
    /// Advances the scene by `dt` seconds.
    ///
    /// See [`update_with`](Self::update_with).
    pub fn update(&mut self, dt: f32) -> TickSummary {
        self.update_with(dt, &mut Tracer::none())
    }

    /// Advances the scene by `dt` seconds, reporting to `tracer`.
    ///
    /// 1. Every track is stepped and its value written. Tracks whose node is
    ///    no longer valid are dropped and their tokens released.
    /// 2. Tracks that completed are removed from the engine, then their
    ///    completion tokens are fired in track order. Callbacks receive the
    ///    scene and may animate, cancel, create or delete nodes; tracks they
    ///    start are first stepped on the next tick.
    /// 3. Nodes marked deleted are swept.
    ///
    /// Negative or non-finite `dt` is treated as zero.
    pub fn update_with(&mut self, dt: f32, tracer: &mut Tracer<'_>) -> TickSummary {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.tick_index += 1;
        let tick_index = self.tick_index;
        let mut summary = TickSummaryBuilder::new(tick_index, dt);

        tracer.tick_begin(&TickBeginEvent {
            tick_index,
            dt,
            active_tracks: self.animations.len(),
        });
        for warning in core::mem::take(&mut self.warnings) {
            tracer.warning(&WarningEvent {
                tick_index,
                warning,
            });
        }

        let mut log = TickLog::default();
        self.animations.advance(dt, &mut self.pool, &mut log);
        summary.record_advance(log.advanced, log.writes);
        #[cfg(feature = "trace-rich")]
        if !log.property_writes.is_empty() {
            tracer.property_writes(tick_index, &log.property_writes);
        }

        for (node, property) in log.released {
            summary.record_release();
            tracer.animation_end(&AnimationEndEvent {
                tick_index,
                node,
                property,
                reason: EndReason::TargetInvalid,
            });
        }

        for mut track in log.finished {
            summary.record_completion();
            tracer.animation_end(&AnimationEndEvent {
                tick_index,
                node: track.node,
                property: track.property,
                reason: EndReason::Completed,
            });
            if let Some(token) = track.token.take() {
                token.fire(
                    self,
                    AnimationEnd {
                        node: track.node,
                        property: track.property,
                        finished: true,
                    },
                );
            }
            // Releases the curve.
            drop(track);
        }

        self.sweep_each(|e| {
            summary.record_sweep();
            tracer.node_swept(e);
        });

        let summary = summary.finish(self.animations.len());
        tracer.tick_summary(&summary);
        summary
    }
}
