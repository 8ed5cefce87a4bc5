// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage compositing: full extents, clipped recursive painting, and moves.

use alloc::vec;
use kurbo::{Rect, Vec2};

use crate::canvas::Canvas;
use crate::tree::{Node, Tree};
use crate::types::{MorphKind, NodeFlags, NodeId};
use crate::util::has_area;

impl Tree {
    /// Returns the area a morph may paint: its bounds merged with its shadow's bounds.
    ///
    /// Without a live shadow this is exactly the morph's bounds. Returns `None`
    /// for stale identifiers.
    pub fn full_extent(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id).map(|node| self.full_extent_of(node))
    }

    pub(crate) fn full_extent_of(&self, node: &Node) -> Rect {
        match node.shadow.and_then(|s| self.node_opt(s)) {
            Some(shadow) => node.bounds.union(shadow.bounds),
            None => node.bounds,
        }
    }

    /// Paint a morph and its subtree into `canvas`, limited to `region`.
    ///
    /// `region` defaults to the morph's [full extent](Tree::full_extent).
    ///
    /// - An invisible morph paints nothing, and neither does its subtree.
    /// - Each morph paints only `bounds ∩ region`; if that is empty on either
    ///   axis the morph and its subtree are skipped.
    /// - Children are painted back to front. They receive the parent's clipped
    ///   rectangle, except [shadows](MorphKind::Shadow), which receive the
    ///   parent's unclipped `region` so they can extend past their caster.
    ///
    /// Painting borrows the tree immutably and keeps its traversal state on
    /// the call's own stack, so independent paints can be issued in any order.
    pub fn paint<C: Canvas + ?Sized>(&self, id: NodeId, canvas: &mut C, region: Option<Rect>) {
        let Some(node) = self.node_opt(id) else {
            tracing::warn!(?id, "paint requested for a dead morph");
            return;
        };
        let region = region.unwrap_or_else(|| self.full_extent_of(node));

        let mut stack = vec![(id, region)];
        while let Some((id, region)) = stack.pop() {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            if !node.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            let dirty = node.bounds.intersect(region);
            if !has_area(dirty) {
                continue;
            }
            if !node.image.is_transparent() {
                canvas.fill_rect(dirty, node.image.fill);
            }
            // Reverse so children pop in back-to-front order.
            for &child in node.children.iter().rev() {
                let shadow = self.node_opt(child).is_some_and(|c| c.kind.is_shadow());
                stack.push((child, if shadow { region } else { dirty }));
            }
        }
    }

    /// Move a morph and its subtree by `delta`.
    ///
    /// Frames report their own full extent before and after the move and shift
    /// their contents with [`Tree::translate_silently`], so scrolling a large
    /// contents frame costs two damage rectangles regardless of its size.
    /// Every other morph uses [`Tree::translate_and_notify`].
    pub fn move_by(&mut self, id: NodeId, delta: Vec2) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        if !matches!(node.kind, MorphKind::Frame(_)) {
            self.translate_and_notify(id, delta);
            return;
        }
        self.changed(id);
        let node = self.node_mut(id);
        node.bounds = node.bounds + delta;
        let children = node.children.clone();
        for child in children {
            self.translate_silently(child, delta);
        }
        self.changed(id);
    }

    /// Move a morph by `delta`, reporting damage for it and every descendant.
    ///
    /// Children are moved with [`Tree::move_by`], so a frame nested inside a
    /// plain morph still moves its own contents silently.
    pub fn translate_and_notify(&mut self, id: NodeId, delta: Vec2) {
        if !self.is_alive(id) {
            return;
        }
        self.changed(id);
        let node = self.node_mut(id);
        node.bounds = node.bounds + delta;
        let children = node.children.clone();
        for child in children {
            self.move_by(child, delta);
        }
        self.changed(id);
    }

    /// Move a morph and its whole subtree by `delta` without reporting any damage.
    ///
    /// Callers are responsible for reporting the area covered before and after.
    pub fn translate_silently(&mut self, id: NodeId, delta: Vec2) {
        if !self.is_alive(id) {
            return;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node_mut(current);
            node.bounds = node.bounds + delta;
            stack.extend_from_slice(&node.children);
        }
    }
}
