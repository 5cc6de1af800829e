// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The animation engine: the table of active tracks.

use alloc::vec::Vec;

use super::track::{Track, TrackState};
use crate::error::SceneError;
use crate::node::{Handle, NodePool, Property};

#[cfg(feature = "trace-rich")]
use crate::trace::PropertyWrite;

/// Owns every active animation track.
///
/// At most one track exists per `(node, property)` pair. Tracks are kept in
/// start order; a replacing track takes the place of the one it replaces.
#[derive(Debug)]
pub struct AnimationEngine {
    tracks: Vec<Track>,
    capacity: usize,
}

/// Outcome of one [`AnimationEngine::advance`] call.
#[derive(Debug, Default)]
pub(crate) struct TickLog {
    /// Tracks that were stepped.
    pub(crate) advanced: u32,
    /// Values written into the pool.
    pub(crate) writes: u32,
    /// Once-mode tracks that reached their end, in track order. Their tokens
    /// have not been fired yet.
    pub(crate) finished: Vec<Track>,
    /// Tracks dropped because their target became invalid.
    pub(crate) released: Vec<(Handle, Property)>,
    #[cfg(feature = "trace-rich")]
    pub(crate) property_writes: Vec<PropertyWrite>,
}

impl AnimationEngine {
    /// Creates an engine holding at most `capacity` tracks.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            tracks: Vec::new(),
            capacity,
        }
    }

    /// Returns the number of active tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Returns whether no track is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Returns the state of the track animating `property` of `node`.
    #[must_use]
    pub fn state(&self, node: Handle, property: Property) -> Option<TrackState> {
        self.position(node, property).map(|i| self.tracks[i].state)
    }

    /// Adds a track, replacing any track on the same `(node, property)`.
    ///
    /// The replaced track's token is released without being fired. Fails with
    /// [`SceneError::OutOfResources`] if the table is full and nothing is
    /// replaced; the new track (and its token) is dropped in that case.
    pub(crate) fn start(&mut self, track: Track) -> Result<(), SceneError> {
        if let Some(i) = self.position(track.node, track.property) {
            self.tracks[i] = track;
            return Ok(());
        }
        if self.tracks.len() >= self.capacity {
            return Err(SceneError::OutOfResources);
        }
        self.tracks.push(track);
        Ok(())
    }

    /// Removes the track animating `property` of `node`, releasing its token.
    ///
    /// Returns whether a track was removed.
    pub fn cancel(&mut self, node: Handle, property: Property) -> bool {
        match self.position(node, property) {
            Some(i) => {
                self.tracks.remove(i);
                true
            }
            None => false,
        }
    }

    /// Removes every track targeting `node`, releasing their tokens.
    ///
    /// Returns the number of tracks removed.
    pub fn cancel_node(&mut self, node: Handle) -> usize {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.node != node);
        before - self.tracks.len()
    }

    /// Steps every track by `dt` and writes the results into `pool`.
    ///
    /// Tracks whose target is no longer valid are dropped (and listed in
    /// `log.released`). Tracks that complete are moved into `log.finished`
    /// in track order.
    pub(crate) fn advance(&mut self, dt: f32, pool: &mut NodePool, log: &mut TickLog) {
        let tracks = core::mem::take(&mut self.tracks);
        self.tracks.reserve(tracks.len());
        for mut track in tracks {
            let Ok(idx) = pool.resolve(track.node) else {
                log.released.push((track.node, track.property));
                continue;
            };
            log.advanced += 1;
            if let Some(value) = track.step(dt) {
                pool.write_slot(idx, track.property, value);
                log.writes += 1;
                #[cfg(feature = "trace-rich")]
                log.property_writes.push(PropertyWrite {
                    node: track.node,
                    property: track.property,
                    value,
                });
            }
            if track.state == TrackState::Completed {
                log.finished.push(track);
            } else {
                self.tracks.push(track);
            }
        }
    }

    fn position(&self, node: Handle, property: Property) -> Option<usize> {
        self.tracks
            .iter()
            .position(|t| t.node == node && t.property == property)
    }
}
