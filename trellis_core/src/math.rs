// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Four-component vector used for every animatable node property.

use core::ops::{Add, Mul, Sub};

/// A four-component `f32` vector.
///
/// Positions, rotations (Euler degrees), scales, colors, sizes and the scalar
/// pie parameters are all stored as `Vec4` so the animation engine can blend
/// any property with the same arithmetic. Scalar properties use `x`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec4 {
    /// First component.
    pub x: f32,
    /// Second component.
    pub y: f32,
    /// Third component.
    pub z: f32,
    /// Fourth component.
    pub w: f32,
}

impl Vec4 {
    /// All components zero.
    pub const ZERO: Self = Self::splat(0.0);

    /// All components one.
    pub const ONE: Self = Self::splat(1.0);

    /// Creates a vector from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a vector with every component set to `v`.
    #[inline]
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Creates a vector from three components and an explicit `w`.
    #[inline]
    #[must_use]
    pub const fn from_xyz(xyz: [f32; 3], w: f32) -> Self {
        Self::new(xyz[0], xyz[1], xyz[2], w)
    }

    /// Returns the components as an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Blends towards `to` by factor `f`, component-wise.
    ///
    /// Evaluated as `self * (1 - f) + to * f` so that `f == 0` and `f == 1`
    /// reproduce the endpoints exactly. `f` is not clamped.
    #[inline]
    #[must_use]
    pub fn lerp(self, to: Self, f: f32) -> Self {
        self * (1.0 - f) + to * f
    }
}

impl From<[f32; 4]> for Vec4 {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl Add for Vec4 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Sub for Vec4 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}
