// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation requests and the per-property tracks built from them.

use super::curve::Curve;
use super::playback::Playback;
use super::token::CompletionToken;
use crate::math::Vec4;
use crate::node::{Handle, Property};

/// The value an animation moves a property towards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationTarget {
    /// Splatted to all four components.
    Scalar(f32),
    /// Sets `x`, `y` and `z`; `w` keeps the property's current value.
    Vec3([f32; 3]),
    /// Sets all four components.
    Vec4(Vec4),
}

impl AnimationTarget {
    /// Resolves the target against the property's current value.
    #[must_use]
    pub fn resolve(self, current: Vec4) -> Vec4 {
        match self {
            Self::Scalar(v) => Vec4::splat(v),
            Self::Vec3(xyz) => Vec4::from_xyz(xyz, current.w),
            Self::Vec4(v) => v,
        }
    }
}

impl From<f32> for AnimationTarget {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl From<[f32; 3]> for AnimationTarget {
    fn from(v: [f32; 3]) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for AnimationTarget {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

/// Parameters of an animation, passed to
/// [`Scene::animate`](crate::scene::Scene::animate).
///
/// ```
/// use trellis_core::anim::{Animation, Easing, EasingDirection, EasingFamily, Playback};
///
/// let fade_in = Animation::scalar(1.0, 0.25)
///     .with_curve(Easing::Eased(EasingFamily::Quad, EasingDirection::Out))
///     .with_playback(Playback::OnceForward)
///     .with_delay(0.1);
/// assert_eq!(fade_in.duration(), 0.25);
/// ```
#[derive(Debug)]
pub struct Animation {
    to: AnimationTarget,
    curve: Curve,
    playback: Playback,
    duration: f32,
    delay: f32,
    on_complete: Option<CompletionToken>,
}

impl Animation {
    /// A linear, once-forward animation towards `to` lasting `duration`
    /// seconds.
    ///
    /// Negative or non-finite durations are treated as zero.
    #[must_use]
    pub fn new(to: AnimationTarget, duration: f32) -> Self {
        Self {
            to,
            curve: Curve::default(),
            playback: Playback::default(),
            duration: sanitize(duration),
            delay: 0.0,
            on_complete: None,
        }
    }

    /// Shorthand for [`new`](Self::new) with [`AnimationTarget::Scalar`].
    #[must_use]
    pub fn scalar(to: f32, duration: f32) -> Self {
        Self::new(AnimationTarget::Scalar(to), duration)
    }

    /// Shorthand for [`new`](Self::new) with [`AnimationTarget::Vec3`].
    #[must_use]
    pub fn vec3(to: [f32; 3], duration: f32) -> Self {
        Self::new(AnimationTarget::Vec3(to), duration)
    }

    /// Shorthand for [`new`](Self::new) with [`AnimationTarget::Vec4`].
    #[must_use]
    pub fn vec4(to: Vec4, duration: f32) -> Self {
        Self::new(AnimationTarget::Vec4(to), duration)
    }

    /// Sets the easing curve.
    #[must_use]
    pub fn with_curve(mut self, curve: impl Into<Curve>) -> Self {
        self.curve = curve.into();
        self
    }

    /// Sets the playback mode.
    #[must_use]
    pub fn with_playback(mut self, playback: Playback) -> Self {
        self.playback = playback;
        self
    }

    /// Sets the start delay in seconds.
    ///
    /// Negative or non-finite delays are treated as zero.
    #[must_use]
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = sanitize(delay);
        self
    }

    /// Attaches a completion token.
    #[must_use]
    pub fn on_complete(mut self, token: CompletionToken) -> Self {
        self.on_complete = Some(token);
        self
    }

    /// Returns the sanitized duration.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Returns the sanitized delay.
    #[must_use]
    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Builds the track for `node` starting from `current`.
    pub(crate) fn into_track(self, node: Handle, property: Property, current: Vec4) -> Track {
        Track {
            node,
            property,
            from: current,
            to: self.to.resolve(current),
            curve: self.curve,
            playback: self.playback,
            duration: self.duration,
            delay: self.delay,
            elapsed: 0.0,
            state: if self.delay > 0.0 {
                TrackState::Pending
            } else {
                TrackState::Running
            },
            token: self.on_complete,
        }
    }
}

fn sanitize(seconds: f32) -> f32 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Lifecycle of a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackState {
    /// Waiting for its delay to elapse.
    Pending,
    /// Writing interpolated values every tick.
    Running,
    /// Reached the end of a once-mode trajectory.
    Completed,
}

/// An active animation of one property of one node.
#[derive(Debug)]
pub(crate) struct Track {
    pub(crate) node: Handle,
    pub(crate) property: Property,
    from: Vec4,
    to: Vec4,
    curve: Curve,
    playback: Playback,
    duration: f32,
    delay: f32,
    elapsed: f64,
    pub(crate) state: TrackState,
    pub(crate) token: Option<CompletionToken>,
}

impl Track {
    /// Advances the track by `dt` seconds.
    ///
    /// Returns the value to write, or `None` while the track is still
    /// delayed. Leftover time after the delay runs out carries into the
    /// animation clock.
    pub(crate) fn step(&mut self, dt: f32) -> Option<Vec4> {
        let mut dt = dt;
        if self.state == TrackState::Pending {
            if dt < self.delay {
                self.delay -= dt;
                return None;
            }
            dt -= self.delay;
            self.delay = 0.0;
            self.state = TrackState::Running;
        }
        if self.state != TrackState::Running {
            return None;
        }

        self.elapsed += f64::from(dt);
        let (u, finished) = if self.duration > 0.0 {
            self.playback.fold(self.progress())
        } else if self.playback.is_loop() {
            // A zero-length lap has no interior; hold the end of the shape.
            (self.playback.shape(1.0), false)
        } else {
            self.playback.fold(1.0)
        };
        if finished {
            self.state = TrackState::Completed;
        }
        Some(self.from.lerp(self.to, self.curve.evaluate(u)))
    }

    /// Raw progress `elapsed / duration`.
    ///
    /// Frame steps such as `1/60` are not exact in binary, so a once-mode
    /// track whose steps add up to its duration can land a few ulps short of
    /// `1`. Progress within [`END_TOLERANCE`] of the end snaps to `1`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "progress is accumulated in f64 and only narrowed for the curve"
    )]
    fn progress(&self) -> f32 {
        let t = self.elapsed / f64::from(self.duration);
        if !self.playback.is_loop() && t >= 1.0 - END_TOLERANCE {
            1.0
        } else {
            t as f32
        }
    }
}

/// Distance from the end of a once-mode track that counts as finished.
const END_TOLERANCE: f64 = 4.0 * f32::EPSILON as f64;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::easing::Easing;

    fn track(anim: Animation) -> Track {
        anim.into_track(Handle::from_raw(0), Property::Position, Vec4::ZERO)
    }

    #[test]
    fn vec3_target_keeps_current_w() {
        let current = Vec4::new(1.0, 2.0, 3.0, 0.5);
        let to = AnimationTarget::Vec3([4.0, 5.0, 6.0]).resolve(current);
        assert_eq!(to, Vec4::new(4.0, 5.0, 6.0, 0.5));
        assert_eq!(
            AnimationTarget::Scalar(2.0).resolve(current),
            Vec4::splat(2.0)
        );
    }

    #[test]
    fn invalid_durations_become_zero() {
        assert_eq!(Animation::scalar(1.0, -3.0).duration(), 0.0);
        assert_eq!(Animation::scalar(1.0, f32::NAN).duration(), 0.0);
        assert_eq!(Animation::scalar(1.0, 1.0).with_delay(f32::INFINITY).delay(), 0.0);
    }

    #[test]
    fn delay_carries_leftover_time() {
        let mut t = track(Animation::scalar(10.0, 1.0).with_delay(0.5));
        assert_eq!(t.state, TrackState::Pending);
        assert_eq!(t.step(0.25), None);
        assert_eq!(t.state, TrackState::Pending);
        // 0.25 of delay left, 0.5 carries into the clock.
        let v = t.step(0.75).unwrap();
        assert_eq!(t.state, TrackState::Running);
        assert!((v.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn exhausted_delay_writes_start_value() {
        let mut t = track(Animation::scalar(10.0, 1.0).with_delay(0.5));
        assert_eq!(t.step(0.5), Some(Vec4::ZERO));
        assert_eq!(t.state, TrackState::Running);
    }

    #[test]
    fn frame_steps_summing_to_duration_complete() {
        for hz in [50_u16, 60, 120, 144] {
            let dt = 1.0 / f32::from(hz);
            let mut t = track(Animation::scalar(10.0, 1.0));
            for _ in 1..hz {
                t.step(dt);
                assert_eq!(t.state, TrackState::Running, "{hz} Hz finished early");
            }
            assert_eq!(t.step(dt), Some(Vec4::splat(10.0)), "{hz} Hz");
            assert_eq!(t.state, TrackState::Completed, "{hz} Hz");
        }
    }

    #[test]
    fn zero_duration_completes_on_first_step() {
        let mut t = track(Animation::scalar(3.0, 0.0));
        assert_eq!(t.step(0.0), Some(Vec4::splat(3.0)));
        assert_eq!(t.state, TrackState::Completed);
        assert_eq!(t.step(1.0), None);
    }

    #[test]
    fn zero_duration_loop_holds_shape_end() {
        let mut t = track(
            Animation::scalar(3.0, 0.0)
                .with_playback(Playback::LoopForward)
                .with_curve(Easing::Linear),
        );
        assert_eq!(t.step(0.1), Some(Vec4::splat(3.0)));
        assert_eq!(t.state, TrackState::Running);
    }
}
