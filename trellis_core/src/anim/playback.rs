// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Playback modes.

/// How raw track progress maps onto curve progress.
///
/// Once modes finish when raw progress reaches `1`; loop modes repeat their
/// shape on the fractional part of the progress and never finish.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Playback {
    /// `0 -> 1`, then finish.
    #[default]
    OnceForward,
    /// `1 -> 0`, then finish.
    OnceBackward,
    /// `0 -> 1 -> 0`, then finish.
    OncePingpong,
    /// `0 -> 1` forever.
    LoopForward,
    /// `1 -> 0` forever.
    LoopBackward,
    /// `0 -> 1 -> 0` forever.
    LoopPingpong,
}

impl Playback {
    /// Returns the stable numeric id (declaration order, from `0`).
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Looks up a playback mode by numeric id.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            0 => Self::OnceForward,
            1 => Self::OnceBackward,
            2 => Self::OncePingpong,
            3 => Self::LoopForward,
            4 => Self::LoopBackward,
            5 => Self::LoopPingpong,
            _ => return None,
        })
    }

    /// Returns whether the mode repeats forever.
    #[inline]
    #[must_use]
    pub fn is_loop(self) -> bool {
        matches!(
            self,
            Self::LoopForward | Self::LoopBackward | Self::LoopPingpong
        )
    }

    /// Applies the mode's shape to progress `t` in `[0, 1]`.
    #[must_use]
    pub fn shape(self, t: f32) -> f32 {
        match self {
            Self::OnceForward | Self::LoopForward => t,
            Self::OnceBackward | Self::LoopBackward => 1.0 - t,
            Self::OncePingpong | Self::LoopPingpong => {
                if t < 0.5 {
                    2.0 * t
                } else {
                    2.0 * (1.0 - t)
                }
            }
        }
    }

    /// Folds raw progress `t >= 0` into curve progress.
    ///
    /// Returns `(u, finished)`. Once modes clamp `t` to `1` and report
    /// `finished` when `t >= 1`. Loop modes wrap `t` to its fractional part;
    /// `t` exactly on a whole lap past the first wraps to `0`.
    #[must_use]
    pub fn fold(self, t: f32) -> (f32, bool) {
        if self.is_loop() {
            (self.shape(t - libm::floorf(t)), false)
        } else if t >= 1.0 {
            (self.shape(1.0), true)
        } else {
            (self.shape(t), false)
        }
    }
}
