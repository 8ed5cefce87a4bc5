// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipping frames: fitting to contents and staying inside a scroll frame.

use core::fmt;

use kurbo::{Rect, Vec2};
use peniko::Color;

use crate::scroll::ViewportOptions;
use crate::tree::Tree;
use crate::types::{MorphKind, NodeFlags, NodeId};
use crate::util::grow_by;

/// Role data of a clipping frame.
///
/// A frame clips the painting of its contents to its own bounds. When bound
/// to a scroll frame it becomes that scroll frame's contents: it fits itself
/// around its children (see [`Tree::adjust_bounds`]) and is kept from
/// exposing empty space inside the scroll frame's window
/// (see [`Tree::keep_in_scroll_frame`]).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub(crate) scroll_frame: Option<NodeId>,
}

impl Frame {
    /// Fill of a freshly created frame.
    pub const DEFAULT_COLOR: Color = Color::from_rgb8(255, 250, 245);

    /// The scroll frame this frame is bound to, if any.
    ///
    /// This is a non-owning link; the scroll frame may have been removed.
    pub fn scroll_frame(&self) -> Option<NodeId> {
        self.scroll_frame
    }
}

/// Error returned by [`Tree::bind_scroll_frame`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum BindError {
    /// The identifier does not refer to a live morph.
    DeadMorph(NodeId),
    /// The morph to bind is not a [`MorphKind::Frame`].
    NotAFrame(NodeId),
    /// The morph to bind to is not a [`MorphKind::ScrollFrame`].
    NotAScrollFrame(NodeId),
}

impl fmt::Debug for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeadMorph(id) => write!(f, "BindError::DeadMorph({id:?})"),
            Self::NotAFrame(id) => write!(f, "BindError::NotAFrame({id:?})"),
            Self::NotAScrollFrame(id) => write!(f, "BindError::NotAScrollFrame({id:?})"),
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeadMorph(id) => write!(f, "{id:?} does not refer to a live morph"),
            Self::NotAFrame(id) => write!(f, "{id:?} is not a frame"),
            Self::NotAScrollFrame(id) => write!(f, "{id:?} is not a scroll frame"),
        }
    }
}

impl core::error::Error for BindError {}

impl Tree {
    /// Bind a frame to a scroll frame, or unbind it with `None`.
    ///
    /// Binding turns the frame into a pure clipping rectangle: it is no longer
    /// draggable, ignores clicks on transparent pixels, and its image becomes
    /// fully transparent. The scroll frame's contents link is pointed at the
    /// frame. Unbinding clears that link but leaves the frame's flags alone.
    ///
    /// A scroll frame should be bound to one frame at a time; binding a second
    /// frame re-points the contents link but leaves the first frame's
    /// back-link in place.
    pub fn bind_scroll_frame(
        &mut self,
        frame: NodeId,
        scroll_frame: Option<NodeId>,
    ) -> Result<(), BindError> {
        let node = self.node_opt(frame).ok_or(BindError::DeadMorph(frame))?;
        let MorphKind::Frame(old) = node.kind else {
            return Err(BindError::NotAFrame(frame));
        };
        if let Some(sf) = scroll_frame {
            let viewport = self
                .node_opt(sf)
                .ok_or(BindError::DeadMorph(sf))?
                .kind
                .as_viewport()
                .ok_or(BindError::NotAScrollFrame(sf))?;
            if let Some(current) = viewport.contents
                && current != frame
                && self.is_alive(current)
            {
                tracing::debug!(?sf, ?current, ?frame, "scroll frame rebound to another frame");
            }
        }

        if let Some(old_sf) = old.scroll_frame
            && Some(old_sf) != scroll_frame
            && let Some(viewport) = self.viewport_mut(old_sf)
            && viewport.contents == Some(frame)
        {
            viewport.contents = None;
        }

        if let MorphKind::Frame(data) = &mut self.node_mut(frame).kind {
            data.scroll_frame = scroll_frame;
        }
        let Some(sf) = scroll_frame else {
            return Ok(());
        };
        if let Some(viewport) = self.viewport_mut(sf) {
            viewport.contents = Some(frame);
        }
        let node = self.node_mut(frame);
        node.flags
            .remove(NodeFlags::DRAGGABLE | NodeFlags::NOTICES_TRANSPARENT_CLICK);
        node.alpha = 0.0;
        self.redraw(frame);
        self.changed(frame);
        Ok(())
    }

    /// Returns the live scroll frame a frame is bound to.
    pub fn scroll_frame_of(&self, frame: NodeId) -> Option<NodeId> {
        self.kind(frame)
            .and_then(MorphKind::as_frame)
            .and_then(Frame::scroll_frame)
            .filter(|sf| self.kind(*sf).is_some_and(|k| k.as_viewport().is_some()))
    }

    /// Returns the union of the full extents of a morph's children.
    ///
    /// `None` when the morph has no children (or is stale), which is distinct
    /// from a zero-area rectangle.
    pub fn submorph_bounds(&self, id: NodeId) -> Option<Rect> {
        self.children_of(id)
            .iter()
            .filter_map(|&child| self.full_extent(child))
            .reduce(|acc, r| acc.union(r))
    }

    /// Keep a bound frame from exposing empty space inside its scroll frame.
    ///
    /// Each edge is checked on its own, against the frame's bounds as left by
    /// the previous correction, and corrected with a separate [`Tree::move_by`]:
    ///
    /// - left edge right of the window's left edge: move left;
    /// - right edge left of the window's right edge: move right;
    /// - top edge below the window's top edge: move up;
    /// - bottom edge above the window's bottom edge: move down.
    ///
    /// A frame at least as large as the window therefore always covers it,
    /// and can scroll freely otherwise. No-op for frames without a scroll frame.
    pub fn keep_in_scroll_frame(&mut self, frame: NodeId) {
        let Some((_, view, _)) = self.bound_viewport(frame) else {
            tracing::debug!(?frame, "keep_in_scroll_frame on an unbound frame");
            return;
        };
        let bounds = self.node(frame).bounds;
        if bounds.x0 > view.x0 {
            self.move_by(frame, Vec2::new(view.x0 - bounds.x0, 0.0));
        }
        let bounds = self.node(frame).bounds;
        if bounds.x1 < view.x1 {
            self.move_by(frame, Vec2::new(view.x1 - bounds.x1, 0.0));
        }
        let bounds = self.node(frame).bounds;
        if bounds.y0 > view.y0 {
            self.move_by(frame, Vec2::new(0.0, view.y0 - bounds.y0));
        }
        let bounds = self.node(frame).bounds;
        if bounds.y1 < view.y1 {
            self.move_by(frame, Vec2::new(0.0, view.y1 - bounds.y1));
        }
    }

    /// Fit a bound frame around its contents.
    ///
    /// 1. Without wrapping, and with children, the new bounds are the children's
    ///    [`submorph_bounds`](Tree::submorph_bounds) expanded by the padding,
    ///    grown at the far corner by the growth, and merged with the window.
    ///    Otherwise the new bounds are the window.
    /// 2. If the bounds changed they are committed (reporting damage and
    ///    regenerating the image) and the frame is clamped with
    ///    [`Tree::keep_in_scroll_frame`].
    /// 3. With wrapping, every text child is set to the frame's width and the
    ///    frame's height becomes the larger of that child's height and the
    ///    window's height.
    /// 4. The scroll frame's ranges are refreshed with [`Tree::adjust_scroll_bars`].
    ///
    /// No-op for frames without a scroll frame.
    pub fn adjust_bounds(&mut self, frame: NodeId) {
        let Some((sf, view, options)) = self.bound_viewport(frame) else {
            tracing::debug!(?frame, "adjust_bounds on an unbound frame");
            return;
        };
        let fitted = match self.submorph_bounds(frame) {
            Some(sub) if !options.text_line_wrapping => {
                grow_by(sub.inset(options.padding), options.growth).union(view)
            }
            _ => view,
        };
        if self.node(frame).bounds != fitted {
            tracing::trace!(?frame, ?fitted, "fitting frame to contents");
            self.set_bounds(frame, fitted);
            self.keep_in_scroll_frame(frame);
        }

        if options.text_line_wrapping {
            let children = self.node(frame).children.clone();
            for child in children {
                if !self.kind(child).is_some_and(MorphKind::is_text) {
                    continue;
                }
                let width = self.node(frame).bounds.width();
                self.set_width(child, width);
                let text_height = self.node(child).bounds.height();
                self.set_height(frame, text_height.max(view.height()));
            }
        }

        self.adjust_scroll_bars(sf);
    }

    /// Something was dropped into the frame.
    pub fn react_to_drop_of(&mut self, frame: NodeId) {
        self.adjust_bounds(frame);
    }

    /// Something was picked up out of the frame.
    pub fn react_to_grab_of(&mut self, frame: NodeId) {
        self.adjust_bounds(frame);
    }

    /// Move every child of `container` back inside its bounds.
    pub fn keep_all_submorphs_within(&mut self, container: NodeId) {
        let Some(bounds) = self.bounds(container) else {
            return;
        };
        let children = self.children_of(container).to_vec();
        for child in children {
            self.keep_within(child, bounds);
        }
    }

    /// Move a morph so its full extent lies inside `container`.
    ///
    /// Edges are corrected one at a time in the order left, right, top,
    /// bottom; a morph larger than `container` ends up aligned with its right
    /// and bottom edges.
    pub fn keep_within(&mut self, id: NodeId, container: Rect) {
        let Some(extent) = self.full_extent(id) else {
            return;
        };
        let left_off = extent.x0 - container.x0;
        if left_off < 0.0 {
            self.move_by(id, Vec2::new(-left_off, 0.0));
        }
        let extent = self.full_extent_of(self.node(id));
        let right_off = extent.x1 - container.x1;
        if right_off > 0.0 {
            self.move_by(id, Vec2::new(-right_off, 0.0));
        }
        let extent = self.full_extent_of(self.node(id));
        let top_off = extent.y0 - container.y0;
        if top_off < 0.0 {
            self.move_by(id, Vec2::new(0.0, -top_off));
        }
        let extent = self.full_extent_of(self.node(id));
        let bottom_off = extent.y1 - container.y1;
        if bottom_off > 0.0 {
            self.move_by(id, Vec2::new(0.0, -bottom_off));
        }
    }

    /// The live scroll frame, its window, and its options for a bound frame.
    fn bound_viewport(&self, frame: NodeId) -> Option<(NodeId, Rect, ViewportOptions)> {
        let sf = self.scroll_frame_of(frame)?;
        let node = self.node_opt(sf)?;
        let viewport = node.kind.as_viewport()?;
        Some((sf, node.bounds, viewport.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MorphDesc;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(x0, y0, x1, y1)
    }

    #[test]
    fn submorph_bounds_is_none_without_children() {
        let mut tree = Tree::new();
        let frame = tree.insert(None, MorphDesc::frame(rect(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(tree.submorph_bounds(frame), None);

        tree.insert(Some(frame), MorphDesc::plain(rect(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(tree.submorph_bounds(frame), Some(rect(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn submorph_bounds_includes_shadows() {
        let mut tree = Tree::new();
        let frame = tree.insert(None, MorphDesc::frame(rect(0.0, 0.0, 100.0, 100.0)));
        let a = tree.insert(Some(frame), MorphDesc::plain(rect(10.0, 10.0, 20.0, 20.0)));
        tree.insert(Some(frame), MorphDesc::plain(rect(30.0, 0.0, 40.0, 5.0)));
        tree.add_shadow(a, Vec2::new(0.0, 50.0), Color::BLACK);
        assert_eq!(tree.submorph_bounds(frame), Some(rect(10.0, 0.0, 40.0, 70.0)));
    }

    #[test]
    fn unbound_frame_ignores_fitting() {
        let mut tree = Tree::new();
        let frame = tree.insert(None, MorphDesc::frame(rect(0.0, 0.0, 10.0, 10.0)));
        tree.insert(Some(frame), MorphDesc::plain(rect(0.0, 0.0, 500.0, 500.0)));
        let _ = tree.take_damage();
        tree.adjust_bounds(frame);
        tree.keep_in_scroll_frame(frame);
        assert_eq!(tree.bounds(frame), Some(rect(0.0, 0.0, 10.0, 10.0)));
        assert!(tree.damage().is_empty());
    }

    #[test]
    fn binding_makes_frame_a_pure_clip() {
        let mut tree = Tree::new();
        let frame = tree.insert(None, MorphDesc::frame(rect(0.0, 0.0, 10.0, 10.0)));
        let options = ViewportOptions::default();
        let sf = tree.insert_scroll_frame(None, rect(0.0, 0.0, 10.0, 10.0), options);
        assert!(tree.flags(frame).unwrap().contains(NodeFlags::DRAGGABLE));

        tree.bind_scroll_frame(frame, Some(sf)).unwrap();
        let flags = tree.flags(frame).unwrap();
        assert!(!flags.contains(NodeFlags::DRAGGABLE));
        assert!(!flags.contains(NodeFlags::NOTICES_TRANSPARENT_CLICK));
        assert!(flags.contains(NodeFlags::ACCEPTS_DROPS));
        assert_eq!(tree.alpha(frame), Some(0.0));
        assert!(tree.appearance(frame).unwrap().is_transparent());
        assert_eq!(tree.scroll_contents(sf), Some(frame));
        assert_eq!(tree.scroll_frame_of(frame), Some(sf));

        tree.bind_scroll_frame(frame, None).unwrap();
        assert_eq!(tree.scroll_frame_of(frame), None);
        assert_eq!(tree.scroll_contents(sf), None);
    }

    #[test]
    fn bound_frame_setters_keep_it_a_pure_clip() {
        let mut tree = Tree::new();
        let options = ViewportOptions::default();
        let sf = tree.insert_scroll_frame(None, rect(0.0, 0.0, 10.0, 10.0), options);
        let contents = tree.scroll_contents(sf).unwrap();

        tree.set_alpha(contents, 1.0);
        tree.set_flags(contents, NodeFlags::all());
        assert_eq!(tree.alpha(contents), Some(0.0));
        assert!(tree.appearance(contents).unwrap().is_transparent());
        let flags = tree.flags(contents).unwrap();
        assert!(!flags.contains(NodeFlags::DRAGGABLE));
        assert!(!flags.contains(NodeFlags::NOTICES_TRANSPARENT_CLICK));
        assert!(flags.contains(NodeFlags::VISIBLE | NodeFlags::ACCEPTS_DROPS));

        // Once unbound, the frame is an ordinary morph again.
        tree.bind_scroll_frame(contents, None).unwrap();
        tree.set_alpha(contents, 1.0);
        tree.set_flags(contents, NodeFlags::all());
        assert_eq!(tree.alpha(contents), Some(1.0));
        assert_eq!(tree.flags(contents), Some(NodeFlags::all()));
    }

    #[test]
    fn binding_checks_roles() {
        let mut tree = Tree::new();
        let plain = tree.insert(None, MorphDesc::plain(rect(0.0, 0.0, 10.0, 10.0)));
        let frame = tree.insert(None, MorphDesc::frame(rect(0.0, 0.0, 10.0, 10.0)));
        assert_eq!(
            tree.bind_scroll_frame(plain, None),
            Err(BindError::NotAFrame(plain))
        );
        assert_eq!(
            tree.bind_scroll_frame(frame, Some(plain)),
            Err(BindError::NotAScrollFrame(plain))
        );
        tree.remove(plain);
        assert_eq!(
            tree.bind_scroll_frame(frame, Some(plain)),
            Err(BindError::DeadMorph(plain))
        );
    }

    #[test]
    fn keep_within_pulls_children_back_inside() {
        let mut tree = Tree::new();
        let frame = tree.insert(None, MorphDesc::frame(rect(0.0, 0.0, 100.0, 100.0)));
        let left = tree.insert(Some(frame), MorphDesc::plain(rect(-30.0, 10.0, -10.0, 20.0)));
        let low = tree.insert(Some(frame), MorphDesc::plain(rect(50.0, 90.0, 60.0, 130.0)));
        let huge = tree.insert(Some(frame), MorphDesc::plain(rect(-10.0, -10.0, 190.0, 40.0)));

        tree.keep_all_submorphs_within(frame);
        assert_eq!(tree.bounds(left), Some(rect(0.0, 10.0, 20.0, 20.0)));
        assert_eq!(tree.bounds(low), Some(rect(50.0, 60.0, 60.0, 100.0)));
        // Wider than the frame: left is fixed first, then right wins.
        assert_eq!(tree.bounds(huge), Some(rect(-100.0, 0.0, 100.0, 50.0)));
    }
}
