// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene configuration and injected capabilities.

use crate::node::{FontId, NodeId, TextureId};

/// Fixed limits and defaults of a [`Scene`](crate::scene::Scene).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    /// Maximum number of nodes (at most
    /// [`MAX_CAPACITY`](crate::node::MAX_CAPACITY)).
    pub max_nodes: u16,
    /// Maximum number of simultaneously active animation tracks.
    pub max_animations: u16,
    /// Font given to nodes created with
    /// [`Scene::new_text_node`](crate::scene::Scene::new_text_node).
    pub default_font: Option<FontId>,
}

impl SceneConfig {
    /// Limits sized for microcontroller-class targets.
    #[must_use]
    pub const fn embedded() -> Self {
        Self {
            max_nodes: 512,
            max_animations: 128,
            default_font: None,
        }
    }

    /// Limits sized for desktop and tooling hosts.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            max_nodes: 8192,
            max_animations: 2048,
            default_font: None,
        }
    }

    /// Returns this configuration with `font` as the default font.
    #[must_use]
    pub const fn with_default_font(mut self, font: FontId) -> Self {
        self.default_font = Some(font);
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Layout metrics of a run of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f32,
    /// Maximum ascent above the baseline.
    pub max_ascent: f32,
    /// Maximum descent below the baseline.
    pub max_descent: f32,
}

impl TextMetrics {
    /// Line height (`max_ascent + max_descent`).
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_ascent + self.max_descent
    }
}

/// Capabilities the host injects into a scene.
///
/// Every method has a default that reports "unavailable", so a scene without
/// text or resources can use [`NoHooks`].
pub trait SceneHooks {
    /// Measures `text` laid out with `font`.
    fn text_metrics(&self, font: FontId, text: &str) -> Option<TextMetrics> {
        _ = (font, text);
        None
    }

    /// Resolves a font by name.
    fn resolve_font(&self, name: NodeId) -> Option<FontId> {
        _ = name;
        None
    }

    /// Resolves a texture by name.
    fn resolve_texture(&self, name: NodeId) -> Option<TextureId> {
        _ = name;
        None
    }
}

/// [`SceneHooks`] with every capability unavailable.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl SceneHooks for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ() {
        assert!(SceneConfig::desktop().max_nodes > SceneConfig::embedded().max_nodes);
        assert_eq!(SceneConfig::default(), SceneConfig::embedded());
    }

    #[test]
    fn no_hooks_resolve_nothing() {
        let hooks = NoHooks;
        assert!(hooks.text_metrics(FontId(0), "hi").is_none());
        assert!(hooks.resolve_font(NodeId::from_name("system")).is_none());
        assert!(hooks.resolve_texture(NodeId::from_name("atlas")).is_none());
    }
}
