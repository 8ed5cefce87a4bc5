// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deep copies of subtrees with internal links remapped.

use alloc::vec;
use hashbrown::HashMap;

use crate::tree::Tree;
use crate::types::{MorphKind, NodeId};

/// Mapping from original morphs to their copies, produced by [`Tree::full_copy_with_map`].
#[derive(Clone, Debug, Default)]
pub struct CopyMap {
    map: HashMap<NodeId, NodeId>,
}

impl CopyMap {
    /// The copy of `original`, if it was part of the copied subtree.
    pub fn get(&self, original: NodeId) -> Option<NodeId> {
        self.map.get(&original).copied()
    }

    /// Number of copied morphs.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing was copied.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Pairs of `(original, copy)` in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.map.iter().map(|(&o, &c)| (o, c))
    }

    /// Map `id` to its copy, or leave it alone if it lies outside the copy.
    fn remap(&self, id: NodeId) -> NodeId {
        self.get(id).unwrap_or(id)
    }
}

impl Tree {
    /// Deep-copy a morph and its subtree. See [`Tree::full_copy_with_map`].
    pub fn full_copy(&mut self, id: NodeId) -> Option<NodeId> {
        self.full_copy_with_map(id).map(|(copy, _)| copy)
    }

    /// Deep-copy a morph and its subtree, returning the copy and the mapping.
    ///
    /// The copy is a new root with the same child order. Links between morphs
    /// are rewritten when their target was copied too:
    ///
    /// - a morph's shadow;
    /// - a frame's scroll frame;
    /// - a scroll frame's contents frame.
    ///
    /// Links to morphs outside the subtree keep pointing at the original.
    /// Nothing is reported as damage, since the copy is not attached anywhere.
    pub fn full_copy_with_map(&mut self, id: NodeId) -> Option<(NodeId, CopyMap)> {
        if !self.is_alive(id) {
            return None;
        }
        let mut copies = CopyMap::default();
        let mut root = id;
        let mut stack = vec![(id, None::<NodeId>)];
        while let Some((original, parent_copy)) = stack.pop() {
            let desc = self.node(original).detached_copy();
            let copy = self.alloc(desc);
            match parent_copy {
                Some(parent) => self.link_parent(copy, parent, false),
                None => root = copy,
            }
            copies.map.insert(original, copy);
            for &child in self.node(original).children.iter().rev() {
                stack.push((child, Some(copy)));
            }
        }

        for (original, copy) in copies.iter() {
            let shadow = self.node(original).shadow.map(|s| copies.remap(s));
            let node = self.node_mut(copy);
            node.shadow = shadow;
            match &mut node.kind {
                MorphKind::Frame(frame) => {
                    frame.scroll_frame = frame.scroll_frame.map(|sf| copies.remap(sf));
                }
                MorphKind::ScrollFrame(viewport) => {
                    viewport.contents = viewport.contents.map(|c| copies.remap(c));
                }
                _ => {}
            }
        }
        tracing::trace!(?id, ?root, copied = copies.len(), "full copy");
        Some((root, copies))
    }
}
