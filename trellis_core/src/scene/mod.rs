// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene: node creation, the scene graph and the animation entry points.
//!
//! A [`Scene`] owns a [`NodePool`], the chains that order its slots, an
//! [`AnimationEngine`] and the injected [`SceneHooks`]. All public operations
//! take [`Handle`]s and fail with [`SceneError`] rather than panicking on
//! caller error.
//!
//! # Chains
//!
//! Every live node sits in exactly one chain: its parent's child chain, or the
//! top-level render chain. Chain order is render order; the last entry is
//! drawn on top. See [`set_parent`](Scene::set_parent),
//! [`move_above`](Scene::move_above) and [`move_below`](Scene::move_below).
//!
//! # Deferred deletion
//!
//! [`delete_node`](Scene::delete_node) only marks a node. Its handle is
//! invalid from that moment, but the slot is reclaimed by the
//! [`sweep`](Scene::sweep) that [`update`](Scene::update) runs at the end of
//! every tick. The sweep splices a deleted node's children into its former
//! position.

mod chain;
mod clone;
mod evaluate;
mod graph;
mod tick;
mod traverse;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::anim::{Animation, AnimationEngine, TrackState};
use crate::config::{NoHooks, SceneConfig, SceneHooks};
use crate::dirty;
use crate::error::SceneError;
use crate::math::Vec4;
use crate::node::{
    FontId, Handle, INVALID, NodeId, NodePool, NodeRef, NodeType, Property, SceneId, TextureId,
};
use crate::trace::Warning;

pub use evaluate::FrameChanges;
pub use traverse::Children;

/// Highest render order accepted by [`Scene::set_render_order`].
pub const MAX_RENDER_ORDER: u8 = 15;

/// Description of a node authored ahead of time.
///
/// Nodes created from a template remember its property values as their reset
/// point, restored by [`Scene::reset_nodes`].
#[derive(Clone, Debug, PartialEq)]
pub struct NodeTemplate {
    /// Id used for lookup with [`Scene::get_node`].
    pub id: NodeId,
    /// Node type.
    pub node_type: NodeType,
    /// Parent to attach to, or `None` for the top-level chain.
    pub parent: Option<Handle>,
    /// Property values, indexed by [`Property::id`].
    pub properties: [Vec4; Property::COUNT],
    /// Text content.
    pub text: Option<String>,
    /// Font.
    pub font: Option<FontId>,
    /// Whether the node starts enabled.
    pub enabled: bool,
}

impl NodeTemplate {
    /// A template with default property values.
    #[must_use]
    pub fn new(id: NodeId, node_type: NodeType) -> Self {
        Self {
            id,
            node_type,
            parent: None,
            properties: Property::defaults(),
            text: None,
            font: None,
            enabled: true,
        }
    }

    /// Sets one property value.
    #[must_use]
    pub fn with_property(mut self, property: Property, value: Vec4) -> Self {
        self.properties[property.id() as usize] = value;
        self
    }

    /// Sets the parent.
    #[must_use]
    pub fn with_parent(mut self, parent: Handle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A scene of hierarchical, animatable nodes.
pub struct Scene {
    pub(crate) pool: NodePool,
    pub(crate) animations: AnimationEngine,
    config: SceneConfig,
    hooks: Box<dyn SceneHooks>,
    scene_id: SceneId,
    pub(crate) ids: HashMap<NodeId, Handle>,
    render_order: u8,
    pub(crate) tick_index: u64,
    pub(crate) warnings: Vec<Warning>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("scene_id", &self.scene_id)
            .field("config", &self.config)
            .field("nodes", &self.pool.node_count())
            .field("animations", &self.animations.len())
            .field("tick_index", &self.tick_index)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    /// Creates an empty scene with no text or resource capabilities.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self::with_hooks(config, Box::new(NoHooks))
    }

    /// Creates an empty scene using `hooks` for text metrics and resource
    /// lookup.
    #[must_use]
    pub fn with_hooks(config: SceneConfig, hooks: Box<dyn SceneHooks>) -> Self {
        Self {
            pool: NodePool::new(config.max_nodes),
            animations: AnimationEngine::new(usize::from(config.max_animations)),
            config,
            hooks,
            scene_id: SceneId::next(),
            ids: HashMap::new(),
            render_order: 0,
            tick_index: 0,
            warnings: Vec::new(),
        }
    }

    /// Returns the scene's identity.
    #[must_use]
    pub fn scene_id(&self) -> SceneId {
        self.scene_id
    }

    /// Returns the configuration the scene was created with.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Returns the node storage (for raw-index access after
    /// [`evaluate`](Self::evaluate)).
    #[must_use]
    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    /// Returns the animation engine.
    #[must_use]
    pub fn animations(&self) -> &AnimationEngine {
        &self.animations
    }

    // -- Handles --

    /// Tags a handle with this scene's identity.
    #[must_use]
    pub fn node_ref(&self, node: Handle) -> NodeRef {
        NodeRef {
            scene: self.scene_id,
            handle: node,
        }
    }

    /// Resolves a [`NodeRef`] against this scene.
    ///
    /// Fails with [`SceneError::WrongSceneOrType`] if the reference was issued
    /// by another scene and [`SceneError::InvalidHandle`] if the node was
    /// deleted.
    pub fn check(&self, node: NodeRef) -> Result<Handle, SceneError> {
        if node.scene != self.scene_id {
            return Err(SceneError::WrongSceneOrType);
        }
        self.pool.resolve(node.handle)?;
        Ok(node.handle)
    }

    /// Returns whether the handle refers to a live, non-deleted node.
    #[must_use]
    pub fn is_valid(&self, node: Handle) -> bool {
        self.pool.is_valid(node)
    }

    /// Returns the number of allocated nodes, including nodes pending a sweep.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.pool.node_count()
    }

    /// Returns the maximum number of nodes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    // -- Node creation --

    /// Creates a node at the top of the top-level render chain.
    pub fn new_node(
        &mut self,
        node_type: NodeType,
        position: Vec4,
        size: Vec4,
    ) -> Result<Handle, SceneError> {
        let handle = self.pool.allocate(node_type)?;
        let idx = handle.slot();
        self.pool.write_slot(idx, Property::Position, position);
        self.pool.write_slot(idx, Property::Size, size);
        self.pool.link_before(idx, INVALID);
        Ok(handle)
    }

    /// Creates a box node.
    pub fn new_box_node(&mut self, position: Vec4, size: Vec4) -> Result<Handle, SceneError> {
        self.new_node(NodeType::Box, position, size)
    }

    /// Creates a pie node.
    pub fn new_pie_node(&mut self, position: Vec4, size: Vec4) -> Result<Handle, SceneError> {
        self.new_node(NodeType::Pie, position, size)
    }

    /// Creates a text node using the configured default font.
    ///
    /// The size is measured through [`SceneHooks::text_metrics`] as
    /// `(width, ascent + descent)`. Without a default font the size is
    /// `(1, 1, 1)`.
    pub fn new_text_node(
        &mut self,
        position: Vec4,
        text: impl Into<String>,
    ) -> Result<Handle, SceneError> {
        let text = text.into();
        let font = self.config.default_font;
        let size = font.and_then(|font| {
            self.hooks
                .text_metrics(font, &text)
                .map(|m| Vec4::new(m.width, m.height(), 0.0, 0.0))
        });
        let handle = self.new_node(
            NodeType::Text,
            position,
            size.unwrap_or(Vec4::new(1.0, 1.0, 1.0, 0.0)),
        )?;
        if font.is_some() && size.is_none() {
            self.warnings
                .push(Warning::TextMetricsUnavailable { node: handle });
        }
        let idx = handle.slot() as usize;
        self.pool.text[idx] = Some(text);
        self.pool.font[idx] = font;
        Ok(handle)
    }

    /// Creates a node from a template and records the template values as the
    /// node's reset point.
    ///
    /// The id is registered for [`get_node`](Self::get_node); a previous node
    /// with the same id is no longer found by it.
    pub fn add_template_node(&mut self, template: &NodeTemplate) -> Result<Handle, SceneError> {
        let parent = match template.parent {
            Some(p) => self.pool.resolve(p)?,
            None => INVALID,
        };
        let handle = self.pool.allocate(template.node_type)?;
        let idx = handle.slot();
        for property in Property::ALL {
            self.pool
                .write_slot(idx, property, template.properties[property.id() as usize]);
        }
        let i = idx as usize;
        self.pool.id[i] = template.id;
        self.pool.text[i] = template.text.clone();
        self.pool.font[i] = template.font;
        self.pool.enabled[i] = template.enabled;
        self.pool.reset[i] = Some(Box::new(template.properties));

        self.pool.set_parent_field(idx, parent);
        self.pool.link_before(idx, INVALID);
        if !template.id.is_none() {
            self.ids.insert(template.id, handle);
        }
        Ok(handle)
    }

    // -- Node state --

    /// Returns the type of a node.
    pub fn node_type(&self, node: Handle) -> Result<NodeType, SceneError> {
        self.pool.node_type(node)
    }

    /// Returns a property value.
    pub fn property(&self, node: Handle, property: Property) -> Result<Vec4, SceneError> {
        self.pool.property(node, property)
    }

    /// Sets a property value. Writes to bone nodes are ignored.
    pub fn set_property(
        &mut self,
        node: Handle,
        property: Property,
        value: Vec4,
    ) -> Result<(), SceneError> {
        self.pool.set_property(node, property, value)
    }

    /// Returns the id of a node ([`NodeId::NONE`] for dynamic nodes).
    pub fn id(&self, node: Handle) -> Result<NodeId, SceneError> {
        Ok(self.pool.id[self.pool.resolve(node)? as usize])
    }

    /// Assigns an id to a node, replacing its previous id.
    pub fn set_id(&mut self, node: Handle, id: NodeId) -> Result<(), SceneError> {
        let idx = self.pool.resolve(node)? as usize;
        let old = self.pool.id[idx];
        if self.ids.get(&old) == Some(&node) {
            self.ids.remove(&old);
        }
        self.pool.id[idx] = id;
        if !id.is_none() {
            self.ids.insert(id, node);
        }
        Ok(())
    }

    /// Finds the node registered under `id`.
    #[must_use]
    pub fn get_node(&self, id: NodeId) -> Option<Handle> {
        self.ids
            .get(&id)
            .copied()
            .filter(|&h| self.pool.is_valid(h))
    }

    /// Returns the text of a node.
    pub fn text(&self, node: Handle) -> Result<Option<&str>, SceneError> {
        Ok(self.pool.text[self.pool.resolve(node)? as usize].as_deref())
    }

    /// Sets the text of a node.
    pub fn set_text(&mut self, node: Handle, text: impl Into<String>) -> Result<(), SceneError> {
        let idx = self.pool.resolve(node)?;
        self.pool.text[idx as usize] = Some(text.into());
        self.pool.dirty.mark(idx, dirty::PROPERTY);
        Ok(())
    }

    /// Returns the font of a node.
    pub fn font(&self, node: Handle) -> Result<Option<FontId>, SceneError> {
        Ok(self.pool.font[self.pool.resolve(node)? as usize])
    }

    /// Sets the font of a node by name, resolved through
    /// [`SceneHooks::resolve_font`].
    pub fn set_font(&mut self, node: Handle, name: NodeId) -> Result<(), SceneError> {
        let idx = self.pool.resolve(node)?;
        let font = self
            .hooks
            .resolve_font(name)
            .ok_or(SceneError::ResourceNotFound(name))?;
        self.pool.font[idx as usize] = Some(font);
        self.pool.dirty.mark(idx, dirty::PROPERTY);
        Ok(())
    }

    /// Returns the texture of a node.
    pub fn texture(&self, node: Handle) -> Result<Option<TextureId>, SceneError> {
        Ok(self.pool.texture[self.pool.resolve(node)? as usize])
    }

    /// Sets the texture of a node by name, resolved through
    /// [`SceneHooks::resolve_texture`].
    pub fn set_texture(&mut self, node: Handle, name: NodeId) -> Result<(), SceneError> {
        let idx = self.pool.resolve(node)?;
        let texture = self
            .hooks
            .resolve_texture(name)
            .ok_or(SceneError::ResourceNotFound(name))?;
        self.pool.texture[idx as usize] = Some(texture);
        self.pool.dirty.mark(idx, dirty::PROPERTY);
        Ok(())
    }

    /// Returns whether a node is enabled.
    pub fn is_enabled(&self, node: Handle) -> Result<bool, SceneError> {
        Ok(self.pool.enabled[self.pool.resolve(node)? as usize])
    }

    /// Enables or disables a node. Disabled nodes and their subtrees are left
    /// out of the render traversal but keep animating.
    pub fn set_enabled(&mut self, node: Handle, enabled: bool) -> Result<(), SceneError> {
        let idx = self.pool.resolve(node)?;
        if self.pool.enabled[idx as usize] != enabled {
            self.pool.enabled[idx as usize] = enabled;
            self.pool.traversal_dirty = true;
            self.pool.dirty.mark(idx, dirty::TOPOLOGY);
        }
        Ok(())
    }

    /// Returns the scene's render order.
    #[must_use]
    pub fn render_order(&self) -> u8 {
        self.render_order
    }

    /// Sets the scene's render order relative to other scenes.
    ///
    /// Values above [`MAX_RENDER_ORDER`] are clamped and a
    /// [`Warning::RenderOrderClamped`] is queued for the next traced tick.
    pub fn set_render_order(&mut self, order: u32) {
        let applied = u8::try_from(order)
            .unwrap_or(u8::MAX)
            .min(MAX_RENDER_ORDER);
        if u32::from(applied) != order {
            self.warnings.push(Warning::RenderOrderClamped {
                requested: order,
                applied,
            });
        }
        self.render_order = applied;
    }

    // -- Animation --

    /// Starts animating `property` of `node`.
    ///
    /// The animation starts from the property's current value. An animation
    /// already running on the same `(node, property)` is replaced and its
    /// completion token released without being fired.
    ///
    /// Fails with [`SceneError::InvalidProperty`] if the property does not
    /// apply to the node's type and [`SceneError::OutOfResources`] if the
    /// track table is full.
    pub fn animate(
        &mut self,
        node: Handle,
        property: Property,
        animation: Animation,
    ) -> Result<(), SceneError> {
        let idx = self.pool.resolve_property(node, property)?;
        let current = self.pool.properties[idx as usize][property.id() as usize];
        self.animations
            .start(animation.into_track(node, property, current))
    }

    /// Cancels the animation of `property` of `node`, releasing its
    /// completion token without firing it. Cancelling a property that is not
    /// animated does nothing.
    pub fn cancel(&mut self, node: Handle, property: Property) -> Result<(), SceneError> {
        self.pool.resolve_property(node, property)?;
        self.animations.cancel(node, property);
        Ok(())
    }

    /// Returns the state of the animation of `property` of `node`, if any.
    #[must_use]
    pub fn animation_state(&self, node: Handle, property: Property) -> Option<TrackState> {
        self.animations.state(node, property)
    }

    /// Returns the number of active animation tracks.
    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }
}
