// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: slots, structure, geometry setters, and change notification.

use alloc::vec::Vec;
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;

use crate::damage::Damage;
use crate::types::{Appearance, MorphDesc, MorphKind, NodeFlags, NodeId};

/// Top-level morph tree.
///
/// The tree owns every morph. A morph has at most one parent and an ordered
/// list of children; children are painted back to front in that order.
///
/// Unlike a batched box tree, changes take effect immediately: every mutation
/// that alters what is on screen reports the affected area through
/// [`Tree::changed`], which appends to the [`Damage`] log. Callers drain the
/// log with [`Tree::take_damage`] and repaint each rectangle with
/// [`Tree::paint`].
///
/// ## Example
///
/// ```rust
/// use kurbo::{Rect, Vec2};
/// use understory_morph::{MorphDesc, RecordingCanvas, Tree};
///
/// let mut tree = Tree::new();
/// let world = tree.insert(None, MorphDesc::plain(Rect::new(0.0, 0.0, 100.0, 100.0)));
/// let child = tree.insert(Some(world), MorphDesc::plain(Rect::new(10.0, 10.0, 20.0, 20.0)));
/// let _ = tree.take_damage();
///
/// tree.move_by(child, Vec2::new(5.0, 0.0));
/// let damage = tree.take_damage();
/// assert_eq!(damage.union_rect(), Some(Rect::new(10.0, 10.0, 25.0, 20.0)));
///
/// let mut canvas = RecordingCanvas::new();
/// for rect in damage.dirty_rects {
///     tree.paint(world, &mut canvas, Some(rect));
/// }
/// ```
pub struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    damage: Damage,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("pending_damage", &self.damage.len())
            .finish_non_exhaustive()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) bounds: Rect,
    pub(crate) color: Color,
    pub(crate) alpha: f32,
    pub(crate) flags: NodeFlags,
    pub(crate) kind: MorphKind,
    /// Non-owning link to this morph's shadow, usually its back-most child.
    pub(crate) shadow: Option<NodeId>,
    pub(crate) image: Appearance,
}

impl Node {
    fn new(generation: u32, desc: MorphDesc) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            bounds: desc.bounds,
            color: desc.color,
            alpha: desc.alpha,
            flags: desc.flags,
            kind: desc.kind,
            shadow: None,
            image: Appearance::render(desc.color, desc.alpha, 0),
        }
    }

    /// True for a frame bound to a scroll frame, which must stay a transparent,
    /// non-grabbable clip.
    fn is_bound_frame(&self) -> bool {
        matches!(&self.kind, MorphKind::Frame(frame) if frame.scroll_frame.is_some())
    }

    /// Detached clone used by duplication; structure is relinked by the caller.
    pub(crate) fn detached_copy(&self) -> MorphDesc {
        MorphDesc {
            bounds: self.bounds,
            color: self.color,
            alpha: self.alpha,
            flags: self.flags,
            kind: self.kind.clone(),
        }
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            damage: Damage::default(),
        }
    }

    /// Insert a new morph as the front-most child of `parent` (or as a root if `None`).
    ///
    /// Inserting under a parent reports the new morph's full extent as damage.
    /// A stale `parent` inserts a root.
    pub fn insert(&mut self, parent: Option<NodeId>, desc: MorphDesc) -> NodeId {
        let id = self.alloc(desc);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p, false);
            self.changed(id);
        }
        id
    }

    /// Move `child` to the front of `parent`'s children, detaching it from its old parent.
    ///
    /// This is a no-op if either id is stale or if `child` is `parent` or one of
    /// its ancestors.
    pub fn add(&mut self, parent: NodeId, child: NodeId) {
        self.adopt(parent, child, false);
    }

    /// Like [`Tree::add`], but places `child` behind all existing children.
    pub fn add_back(&mut self, parent: NodeId, child: NodeId) {
        self.adopt(parent, child, true);
    }

    /// Remove a morph (and its subtree) from the tree.
    ///
    /// The morph's full extent is reported as damage before it disappears.
    /// Every `NodeId` in the subtree becomes stale.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.changed(id);
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes[current.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(current.idx());
            }
        }
    }

    /// Returns true if `id` refers to a live morph.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Returns the parent of a morph if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a morph (back to front), or an empty slice if the id is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Returns the bounds of a live morph.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|n| n.bounds)
    }

    /// Returns the role of a live morph.
    pub fn kind(&self, id: NodeId) -> Option<&MorphKind> {
        self.node_opt(id).map(|n| &n.kind)
    }

    /// Returns the flags of a live morph.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.flags)
    }

    /// Returns the color of a live morph.
    pub fn color(&self, id: NodeId) -> Option<Color> {
        self.node_opt(id).map(|n| n.color)
    }

    /// Returns the alpha multiplier of a live morph.
    pub fn alpha(&self, id: NodeId) -> Option<f32> {
        self.node_opt(id).map(|n| n.alpha)
    }

    /// Returns the cached drawable of a live morph.
    pub fn appearance(&self, id: NodeId) -> Option<Appearance> {
        self.node_opt(id).map(|n| n.image)
    }

    /// Returns how many times the morph's image has been regenerated.
    pub fn image_revision(&self, id: NodeId) -> Option<u64> {
        self.node_opt(id).map(|n| n.image.revision)
    }

    /// Returns the shadow of a morph, if it has a live one.
    pub fn shadow_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)
            .and_then(|n| n.shadow)
            .filter(|s| self.is_alive(*s))
    }

    /// Returns true if the morph is visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(NodeFlags::VISIBLE))
    }

    /// Replace the bounds of a morph.
    ///
    /// Reports the old and the new extent and regenerates the image.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        if node.bounds == bounds {
            return;
        }
        self.changed(id);
        self.node_mut(id).bounds = bounds;
        self.redraw(id);
        self.changed(id);
    }

    /// Move a morph so its top-left corner lands on `position`.
    ///
    /// This goes through [`Tree::move_by`], so frames move their contents silently.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        if let Some(bounds) = self.bounds(id) {
            self.move_by(id, position - bounds.origin());
        }
    }

    /// Resize a morph, keeping its top-left corner.
    pub fn set_extent(&mut self, id: NodeId, size: Size) {
        if let Some(bounds) = self.bounds(id) {
            self.set_bounds(id, Rect::from_origin_size(bounds.origin(), size));
        }
    }

    /// Set the width of a morph.
    ///
    /// Text morphs reflow: their height becomes the height of their text
    /// wrapped to the new width.
    pub fn set_width(&mut self, id: NodeId, width: f64) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        let height = match &node.kind {
            MorphKind::Text(flow) => flow.height_for_width(width),
            _ => node.bounds.height(),
        };
        self.set_extent(id, Size::new(width, height));
    }

    /// Set the height of a morph.
    pub fn set_height(&mut self, id: NodeId, height: f64) {
        if let Some(bounds) = self.bounds(id) {
            self.set_extent(id, Size::new(bounds.width(), height));
        }
    }

    /// Change the fill color and regenerate the image.
    pub fn set_color(&mut self, id: NodeId, color: Color) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.color = color;
        self.redraw(id);
        self.changed(id);
    }

    /// Change the alpha multiplier and regenerate the image.
    ///
    /// A frame bound to a scroll frame stays fully transparent.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f32) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.alpha = if node.is_bound_frame() {
            tracing::debug!(?id, "alpha of a bound frame stays 0");
            0.0
        } else {
            alpha
        };
        self.redraw(id);
        self.changed(id);
    }

    /// Show or hide a morph and its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        if node.flags.contains(NodeFlags::VISIBLE) == visible {
            return;
        }
        node.flags.set(NodeFlags::VISIBLE, visible);
        self.changed(id);
    }

    /// Replace the interaction flags of a morph.
    ///
    /// Visibility changes made here are not reported as damage; use
    /// [`Tree::set_visible`] for that. A frame bound to a scroll frame never
    /// regains [`NodeFlags::DRAGGABLE`] or [`NodeFlags::NOTICES_TRANSPARENT_CLICK`].
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(node) = self.node_opt_mut(id) {
            let mut flags = flags;
            if node.is_bound_frame() {
                flags.remove(NodeFlags::DRAGGABLE | NodeFlags::NOTICES_TRANSPARENT_CLICK);
            }
            node.flags = flags;
        }
    }

    /// Regenerate the cached image from the current color and alpha.
    pub fn redraw(&mut self, id: NodeId) {
        if let Some(node) = self.node_opt_mut(id) {
            node.image = Appearance::render(node.color, node.alpha, node.image.revision + 1);
        }
    }

    /// Report the full extent of a morph as damaged.
    pub fn changed(&mut self, id: NodeId) {
        if let Some(rect) = self.full_extent(id) {
            tracing::trace!(?id, ?rect, "damage");
            self.damage.push(rect);
        }
    }

    /// Returns the damage recorded since the last [`Tree::take_damage`].
    pub fn damage(&self) -> &Damage {
        &self.damage
    }

    /// Drain the damage log.
    pub fn take_damage(&mut self) -> Damage {
        core::mem::take(&mut self.damage)
    }

    /// Give a morph a drop shadow offset by `offset`.
    ///
    /// The shadow becomes the morph's back-most child and is linked as its
    /// shadow, so it contributes to the morph's [full extent](Tree::full_extent).
    /// Any previous shadow is removed first.
    pub fn add_shadow(&mut self, id: NodeId, offset: Vec2, color: Color) -> Option<NodeId> {
        let bounds = self.bounds(id)?;
        self.remove_shadow(id);
        let shadow = self.alloc(MorphDesc {
            bounds: bounds + offset,
            color,
            flags: NodeFlags::VISIBLE,
            kind: MorphKind::Shadow,
            ..MorphDesc::default()
        });
        self.link_parent(shadow, id, true);
        self.node_mut(id).shadow = Some(shadow);
        self.changed(id);
        Some(shadow)
    }

    /// Remove a morph's shadow, if any.
    pub fn remove_shadow(&mut self, id: NodeId) {
        let Some(shadow) = self.shadow_of(id) else {
            if let Some(node) = self.node_opt_mut(id) {
                node.shadow = None;
            }
            return;
        };
        self.changed(id);
        self.node_mut(id).shadow = None;
        self.remove(shadow);
    }

    /// Returns true if `ancestor` is `id` or lies on the path from `id` to its root.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_of(c);
        }
        false
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn alloc(&mut self, desc: MorphDesc) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, desc));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, desc)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId stores 32-bit slot indices."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId, back: bool) {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return;
        }
        if self.is_ancestor_or_self(child, parent) {
            tracing::debug!(?parent, ?child, "refusing to add a morph to its own subtree");
            return;
        }
        if let Some(old) = self.node(child).parent {
            self.changed(child);
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent, back);
        self.changed(child);
    }

    pub(crate) fn link_parent(&mut self, id: NodeId, parent: NodeId, back: bool) {
        let parent_node = self.node_mut(parent);
        if back {
            parent_node.children.insert(0, id);
        } else {
            parent_node.children.push(id);
        }
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}
