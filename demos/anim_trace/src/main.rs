// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated tick loop that exercises the scene, the animation engine and the
//! tracing pipeline.
//!
//! Builds a small panel with three pie gauges, animates them with different
//! easings and playback modes, chains a follow-up animation from a completion
//! callback and deletes a gauge mid-flight. Events go to both a
//! [`PrettyPrintSink`](trellis_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](trellis_debug::recorder::RecorderSink); the recording is
//! exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use trellis_core::anim::{
    Animation, CompletionToken, Easing, EasingDirection, EasingFamily, Playback,
};
use trellis_core::config::SceneConfig;
use trellis_core::math::Vec4;
use trellis_core::node::{NodeId, NodeType, Property};
use trellis_core::scene::{NodeTemplate, Scene};
use trellis_core::trace::{
    AnimationEndEvent, NodeSweptEvent, PropertyWrite, TickBeginEvent, TickSummary, TraceSink,
    Tracer, WarningEvent,
};

use trellis_debug::pretty::PrettyPrintSink;
use trellis_debug::recorder::RecorderSink;

const TICK_COUNT: u64 = 90;
/// 60 Hz frame step in seconds.
const DT: f32 = 1.0 / 60.0;

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_tick_begin(&mut self, e: &TickBeginEvent) {
        self.a.on_tick_begin(e);
        self.b.on_tick_begin(e);
    }

    fn on_animation_end(&mut self, e: &AnimationEndEvent) {
        self.a.on_animation_end(e);
        self.b.on_animation_end(e);
    }

    fn on_node_swept(&mut self, e: &NodeSweptEvent) {
        self.a.on_node_swept(e);
        self.b.on_node_swept(e);
    }

    fn on_warning(&mut self, e: &WarningEvent) {
        self.a.on_warning(e);
        self.b.on_warning(e);
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.a.on_tick_summary(s);
        self.b.on_tick_summary(s);
    }

    fn on_property_writes(&mut self, tick_index: u64, writes: &[PropertyWrite]) {
        self.a.on_property_writes(tick_index, writes);
        self.b.on_property_writes(tick_index, writes);
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- scene -------------------------------------------------------------
    let mut scene = Scene::new(SceneConfig::embedded());
    let panel = scene
        .add_template_node(
            &NodeTemplate::new(NodeId::from_name("panel"), NodeType::Box)
                .with_property(Property::Position, Vec4::new(40.0, 40.0, 0.0, 0.0))
                .with_property(Property::Size, Vec4::new(240.0, 80.0, 0.0, 0.0)),
        )
        .expect("panel fits in an empty scene");

    let mut gauges = Vec::new();
    for (i, name) in ["cpu", "mem", "net"].into_iter().enumerate() {
        let gauge = scene
            .add_template_node(
                &NodeTemplate::new(NodeId::from_name(name), NodeType::Pie)
                    .with_parent(panel)
                    .with_property(
                        Property::Position,
                        Vec4::new(40.0 + 80.0 * i as f32, 40.0, 0.0, 0.0),
                    )
                    .with_property(Property::FillAngle, Vec4::ZERO),
            )
            .expect("gauge fits");
        gauges.push(gauge);
    }

    // Fill the first gauge, then spin it once the fill completes.
    scene
        .animate(
            gauges[0],
            Property::FillAngle,
            Animation::scalar(360.0, 0.5)
                .with_curve(Easing::Eased(EasingFamily::Cubic, EasingDirection::Out))
                .on_complete(CompletionToken::new(|scene, end| {
                    let spin = Animation::vec3([0.0, 0.0, 360.0], 0.5)
                        .with_curve(Easing::Eased(EasingFamily::Back, EasingDirection::InOut));
                    let _ = scene.animate(end.node, Property::Rotation, spin);
                })),
        )
        .expect("track table has room");

    // Pulse the second gauge forever.
    scene
        .animate(
            gauges[1],
            Property::Scale,
            Animation::vec3([1.2, 1.2, 1.0], 0.4).with_playback(Playback::LoopPingpong),
        )
        .expect("track table has room");

    // Fade the third gauge after a delay; it is deleted before finishing.
    scene
        .animate(
            gauges[2],
            Property::Color,
            Animation::vec4(Vec4::new(1.0, 1.0, 1.0, 0.0), 1.0)
                .with_delay(0.25)
                .with_curve(Easing::Eased(EasingFamily::Bounce, EasingDirection::Out)),
        )
        .expect("track table has room");

    // Out-of-range order: produces a warning on the first tick.
    scene.set_render_order(32);

    // -- simulated loop ----------------------------------------------------
    for tick in 0..TICK_COUNT {
        if tick == 45 {
            scene.delete_node(gauges[2]).expect("gauge is live");
        }

        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        scene.update_with(DT, &mut Tracer::new(&mut tee));
        let changes = scene.evaluate();
        if changes.topology_changed {
            println!(
                "[evaluate] tick={} traversal={:?}",
                tick + 1,
                scene.traversal_order()
            );
        }
    }

    let spun = scene
        .world_transform(gauges[0])
        .expect("first gauge is still live");
    println!("first gauge world transform: {:?}", spun.as_coeffs());

    // -- render readout ----------------------------------------------------
    let pool = scene.pool();
    for &idx in scene.traversal_order() {
        let origin = pool.world_transform_at(idx).translation();
        let [r, g, b, a] = pool.property_at(idx, Property::Color).to_array();
        println!(
            "[draw] slot={idx} at=({:.1}, {:.1}) color=({r:.2}, {g:.2}, {b:.2}, {a:.2})",
            origin.x, origin.y,
        );
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    trellis_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({TICK_COUNT} ticks)");
}
