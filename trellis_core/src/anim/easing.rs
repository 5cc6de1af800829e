// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builtin parametric easing curves.
//!
//! Each non-linear curve is a [`EasingFamily`] (the shape of the "ease in"
//! half) combined with an [`EasingDirection`]:
//!
//! - `In`: the family's base function `f(t)`.
//! - `Out`: `1 - f(1 - t)`.
//! - `InOut`: `In` compressed into the first half, `Out` into the second.
//! - `OutIn`: `Out` compressed into the first half, `In` into the second.
//!
//! Every curve maps `0 -> 0` and `1 -> 1` exactly. Elastic and back curves
//! overshoot inside the interval; the overshoot is preserved.

use core::f32::consts::PI;

/// Shape of the "ease in" half of a curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EasingFamily {
    /// `t^2`
    Quad,
    /// `t^3`
    Cubic,
    /// `t^4`
    Quart,
    /// `t^5`
    Quint,
    /// Quarter cosine wave.
    Sine,
    /// `2^(10(t - 1))`
    Expo,
    /// Quarter circle.
    Circ,
    /// Decaying sine wave (period 0.3).
    Elastic,
    /// Pulls back before moving forward (overshoot 1.70158).
    Back,
    /// Bouncing ball.
    Bounce,
}

impl EasingFamily {
    const ALL: [Self; 10] = [
        Self::Quad,
        Self::Cubic,
        Self::Quart,
        Self::Quint,
        Self::Sine,
        Self::Expo,
        Self::Circ,
        Self::Elastic,
        Self::Back,
        Self::Bounce,
    ];

    /// The base "in" function for `t` in `[0, 1]`.
    fn ease_in(self, t: f32) -> f32 {
        match self {
            Self::Quad => t * t,
            Self::Cubic => t * t * t,
            Self::Quart => t * t * t * t,
            Self::Quint => t * t * t * t * t,
            Self::Sine => 1.0 - libm::cosf(t * PI * 0.5),
            Self::Expo => {
                if t <= 0.0 {
                    0.0
                } else {
                    libm::powf(2.0, 10.0 * (t - 1.0))
                }
            }
            Self::Circ => 1.0 - libm::sqrtf((1.0 - t * t).max(0.0)),
            Self::Elastic => {
                if t <= 0.0 || t >= 1.0 {
                    return t.clamp(0.0, 1.0);
                }
                const PERIOD: f32 = 0.3;
                let s = PERIOD / 4.0;
                let t = t - 1.0;
                -(libm::powf(2.0, 10.0 * t) * libm::sinf((t - s) * (2.0 * PI) / PERIOD))
            }
            Self::Back => {
                const S: f32 = 1.701_58;
                t * t * ((S + 1.0) * t - S)
            }
            Self::Bounce => 1.0 - bounce_out(1.0 - t),
        }
    }
}

/// Standard four-arc bounce.
fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984_375
    }
}

/// How a family's base function is applied over the interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EasingDirection {
    /// Slow start.
    In,
    /// Slow end.
    Out,
    /// Slow start and end.
    InOut,
    /// Fast start and end.
    OutIn,
}

impl EasingDirection {
    const ALL: [Self; 4] = [Self::In, Self::Out, Self::InOut, Self::OutIn];
}

/// A builtin easing curve.
///
/// Numeric ids are stable: [`Easing::Linear`] is `0`, then family-major,
/// direction-minor (`1` is quad-in, `2` quad-out, `3` quad-in-out,
/// `4` quad-out-in, `5` cubic-in, ..., `40` bounce-out-in).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Identity.
    #[default]
    Linear,
    /// A family applied in a direction.
    Eased(EasingFamily, EasingDirection),
}

impl Easing {
    /// Number of builtin curves.
    pub const COUNT: u8 = 41;

    /// Returns the stable numeric id.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::Linear => 0,
            Self::Eased(family, direction) => 1 + family as u8 * 4 + direction as u8,
        }
    }

    /// Looks up a curve by numeric id.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Linear),
            1..Self::COUNT => {
                let k = usize::from(id - 1);
                Some(Self::Eased(
                    EasingFamily::ALL[k / 4],
                    EasingDirection::ALL[k % 4],
                ))
            }
            _ => None,
        }
    }

    /// Maps normalized progress `t` to eased progress.
    ///
    /// Inputs outside `[0, 1]` are clamped; the endpoints are exact.
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let Self::Eased(family, direction) = self else {
            return t;
        };
        let ease_out = |t: f32| 1.0 - family.ease_in(1.0 - t);
        match direction {
            EasingDirection::In => family.ease_in(t),
            EasingDirection::Out => ease_out(t),
            EasingDirection::InOut => {
                if t < 0.5 {
                    family.ease_in(2.0 * t) * 0.5
                } else {
                    0.5 + ease_out(2.0 * t - 1.0) * 0.5
                }
            }
            EasingDirection::OutIn => {
                if t < 0.5 {
                    ease_out(2.0 * t) * 0.5
                } else {
                    0.5 + family.ease_in(2.0 * t - 1.0) * 0.5
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn all() -> impl Iterator<Item = Easing> {
        (0..Easing::COUNT).map(|id| Easing::from_id(id).unwrap())
    }

    #[test]
    fn ids_are_stable() {
        assert_eq!(Easing::Linear.id(), 0);
        assert_eq!(
            Easing::from_id(1),
            Some(Easing::Eased(EasingFamily::Quad, EasingDirection::In))
        );
        assert_eq!(
            Easing::from_id(8),
            Some(Easing::Eased(EasingFamily::Cubic, EasingDirection::OutIn))
        );
        assert_eq!(
            Easing::from_id(40),
            Some(Easing::Eased(EasingFamily::Bounce, EasingDirection::OutIn))
        );
        assert_eq!(Easing::from_id(41), None);
        for e in all() {
            assert_eq!(Easing::from_id(e.id()), Some(e));
        }
    }

    #[test]
    fn endpoints_are_exact() {
        for e in all() {
            assert_eq!(e.evaluate(0.0), 0.0, "{e:?} at 0");
            assert_eq!(e.evaluate(1.0), 1.0, "{e:?} at 1");
            assert_eq!(e.evaluate(-3.0), 0.0, "{e:?} below 0");
            assert_eq!(e.evaluate(2.0), 1.0, "{e:?} above 1");
        }
    }

    #[test]
    fn halves_meet_at_midpoint() {
        for e in all() {
            let a = e.evaluate(0.5 - 1e-4);
            let b = e.evaluate(0.5);
            let c = e.evaluate(0.5 + 1e-4);
            assert!((a - b).abs() < 0.01 && (b - c).abs() < 0.01, "{e:?}");
        }
    }

    #[test]
    fn known_values() {
        let quad_in = Easing::Eased(EasingFamily::Quad, EasingDirection::In);
        let quad_out = Easing::Eased(EasingFamily::Quad, EasingDirection::Out);
        let cubic_in_out = Easing::Eased(EasingFamily::Cubic, EasingDirection::InOut);
        assert!((quad_in.evaluate(0.5) - 0.25).abs() < EPS);
        assert!((quad_out.evaluate(0.5) - 0.75).abs() < EPS);
        assert!((cubic_in_out.evaluate(0.25) - 0.0625).abs() < EPS);
        assert!((Easing::Linear.evaluate(0.3) - 0.3).abs() < EPS);

        let bounce_out = Easing::Eased(EasingFamily::Bounce, EasingDirection::Out);
        assert!((bounce_out.evaluate(1.0 / 2.75) - 1.0).abs() < EPS);
    }

    #[test]
    fn back_and_elastic_overshoot() {
        let back_in = Easing::Eased(EasingFamily::Back, EasingDirection::In);
        assert!(back_in.evaluate(0.2) < 0.0, "back-in dips below zero");
        let back_out = Easing::Eased(EasingFamily::Back, EasingDirection::Out);
        assert!(back_out.evaluate(0.8) > 1.0, "back-out overshoots one");
        let elastic_out = Easing::Eased(EasingFamily::Elastic, EasingDirection::Out);
        assert!(
            (0..100).any(|i| elastic_out.evaluate(i as f32 / 100.0) > 1.0),
            "elastic-out overshoots one"
        );
    }
}
