// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves attached to animation tracks.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use super::easing::Easing;

/// Hook run exactly once when a [`SampledCurve`] is dropped.
pub type ReleaseHook = Box<dyn FnOnce()>;

/// A curve given as evenly spaced samples over normalized time `[0, 1]`.
///
/// Values between samples are interpolated linearly. The optional release hook
/// lets the owner of the sample data (for example a script-side vector) learn
/// when the engine no longer references it.
pub struct SampledCurve {
    samples: Vec<f32>,
    on_release: Option<ReleaseHook>,
}

impl SampledCurve {
    /// Creates a sampled curve.
    #[must_use]
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            on_release: None,
        }
    }

    /// Attaches a hook invoked when the curve is dropped.
    #[must_use]
    pub fn with_release_hook(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }

    /// Evaluates the curve at `u`.
    ///
    /// `u` outside `[0, 1]` clamps to the first or last sample. An empty curve
    /// is the identity; a single sample is constant.
    #[must_use]
    pub fn evaluate(&self, u: f32) -> f32 {
        match self.samples.as_slice() {
            [] => u,
            [only] => *only,
            samples => {
                let last = samples.len() - 1;
                let pos = u.clamp(0.0, 1.0) * last as f32;
                let i = (libm::floorf(pos) as usize).min(last - 1);
                let frac = pos - i as f32;
                samples[i] * (1.0 - frac) + samples[i + 1] * frac
            }
        }
    }
}

impl Drop for SampledCurve {
    fn drop(&mut self) {
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}

impl fmt::Debug for SampledCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampledCurve")
            .field("samples", &self.samples.len())
            .field("has_release_hook", &self.on_release.is_some())
            .finish()
    }
}

/// The curve of an animation track.
#[derive(Debug)]
pub enum Curve {
    /// A builtin parametric curve.
    Builtin(Easing),
    /// A sampled curve.
    Sampled(SampledCurve),
}

impl Curve {
    /// Maps playback progress `u` to the blend factor.
    #[must_use]
    pub fn evaluate(&self, u: f32) -> f32 {
        match self {
            Self::Builtin(easing) => easing.evaluate(u),
            Self::Sampled(curve) => curve.evaluate(u),
        }
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::Builtin(Easing::Linear)
    }
}

impl From<Easing> for Curve {
    fn from(easing: Easing) -> Self {
        Self::Builtin(easing)
    }
}

impl From<SampledCurve> for Curve {
    fn from(curve: SampledCurve) -> Self {
        Self::Sampled(curve)
    }
}
