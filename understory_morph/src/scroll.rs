// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll frames: a fixed window onto a larger contents frame.
//!
//! A scroll frame is a morph of kind [`MorphKind::ScrollFrame`]. Its bounds
//! are the visible window; its [`Viewport`] data links to the contents
//! [`Frame`](crate::Frame), which is one of its children. Scrolling moves the
//! contents frame, which moves its own contents silently.

use kurbo::{Insets, Rect, Vec2};

use crate::tree::Tree;
use crate::types::{MorphDesc, MorphKind, NodeId};

/// Layout options of a scroll frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportOptions {
    /// Space kept around the contents' bounding box.
    pub padding: Insets,
    /// Extra room added past the contents' far corner.
    pub growth: Vec2,
    /// Wrap text children to the window's width instead of growing sideways.
    pub text_line_wrapping: bool,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            padding: Insets::ZERO,
            growth: Vec2::ZERO,
            text_line_wrapping: false,
        }
    }
}

impl ViewportOptions {
    /// Set the padding. A single number pads every side equally.
    pub fn with_padding(mut self, padding: impl Into<Insets>) -> Self {
        self.padding = padding.into();
        self
    }

    /// Set the growth.
    pub fn with_growth(mut self, growth: Vec2) -> Self {
        self.growth = growth;
        self
    }

    /// Enable or disable text line wrapping.
    pub fn with_text_line_wrapping(mut self, wrap: bool) -> Self {
        self.text_line_wrapping = wrap;
        self
    }
}

/// Range of one scroll bar, in contents units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRange {
    /// Smallest scroll value.
    pub start: f64,
    /// Largest scroll value: contents extent minus window extent.
    pub stop: f64,
    /// Size of the visible part: the window's extent.
    pub size: f64,
    /// Current scroll offset of the window into the contents.
    pub value: f64,
}

/// Scroll bar state of a scroll frame. `None` means the bar is hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollBars {
    /// Horizontal range, shown when the contents are wider than the window.
    pub horizontal: Option<ScrollRange>,
    /// Vertical range, shown when the contents are taller than the window.
    pub vertical: Option<ScrollRange>,
}

/// Role data of a scroll frame.
#[derive(Clone, Debug, Default)]
pub struct Viewport {
    pub(crate) options: ViewportOptions,
    pub(crate) contents: Option<NodeId>,
    pub(crate) scroll_bars: ScrollBars,
}

impl Viewport {
    /// Create viewport data with no contents bound yet.
    pub fn new(options: ViewportOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Layout options.
    pub fn options(&self) -> ViewportOptions {
        self.options
    }

    /// The contents frame, if one is bound. Non-owning.
    pub fn contents(&self) -> Option<NodeId> {
        self.contents
    }

    /// Scroll bar ranges as of the last refit or scroll.
    pub fn scroll_bars(&self) -> ScrollBars {
        self.scroll_bars
    }
}

impl Tree {
    /// Create a scroll frame with the window `bounds` and a bound contents frame.
    ///
    /// The contents frame starts with the same bounds as the window and is the
    /// scroll frame's only child.
    pub fn insert_scroll_frame(
        &mut self,
        parent: Option<NodeId>,
        bounds: Rect,
        options: ViewportOptions,
    ) -> NodeId {
        let sf = self.insert(
            parent,
            MorphDesc {
                bounds,
                kind: MorphKind::ScrollFrame(Viewport::new(options)),
                ..MorphDesc::default()
            },
        );
        let contents = self.insert(Some(sf), MorphDesc::frame(bounds));
        let bound = self.bind_scroll_frame(contents, Some(sf));
        debug_assert!(bound.is_ok(), "fresh frame binds to fresh scroll frame");
        self.adjust_bounds(contents);
        sf
    }

    /// Returns the viewport data of a scroll frame.
    pub fn viewport(&self, sf: NodeId) -> Option<&Viewport> {
        self.kind(sf).and_then(MorphKind::as_viewport)
    }

    pub(crate) fn viewport_mut(&mut self, sf: NodeId) -> Option<&mut Viewport> {
        match &mut self.node_opt_mut(sf)?.kind {
            MorphKind::ScrollFrame(viewport) => Some(viewport),
            _ => None,
        }
    }

    /// Returns the live contents frame of a scroll frame.
    pub fn scroll_contents(&self, sf: NodeId) -> Option<NodeId> {
        self.viewport(sf)?
            .contents
            .filter(|&frame| self.is_alive(frame))
    }

    /// Add `morph` to a scroll frame's contents and refit them.
    pub fn add_contents(&mut self, sf: NodeId, morph: NodeId) {
        let Some(frame) = self.scroll_contents(sf) else {
            tracing::debug!(?sf, "add_contents on a scroll frame without contents");
            return;
        };
        self.add(frame, morph);
        self.adjust_bounds(frame);
    }

    /// Replace a scroll frame's options and refit its contents.
    pub fn set_viewport_options(&mut self, sf: NodeId, options: ViewportOptions) {
        let Some(viewport) = self.viewport_mut(sf) else {
            return;
        };
        viewport.options = options;
        if let Some(frame) = self.scroll_contents(sf) {
            self.adjust_bounds(frame);
        }
    }

    /// Recompute the scroll bar ranges from the window and contents bounds.
    ///
    /// A bar is shown when the contents exceed the window on its axis by more
    /// than the growth on that axis.
    pub fn adjust_scroll_bars(&mut self, sf: NodeId) {
        let Some(view) = self.bounds(sf) else {
            return;
        };
        let Some(growth) = self.viewport(sf).map(|v| v.options.growth) else {
            return;
        };
        let content = self.scroll_contents(sf).and_then(|frame| self.bounds(frame));
        let bars = match content {
            Some(content) => ScrollBars {
                horizontal: (content.width() > view.width() + growth.x).then(|| ScrollRange {
                    start: 0.0,
                    stop: content.width() - view.width(),
                    size: view.width(),
                    value: view.x0 - content.x0,
                }),
                vertical: (content.height() > view.height() + growth.y).then(|| ScrollRange {
                    start: 0.0,
                    stop: content.height() - view.height(),
                    size: view.height(),
                    value: view.y0 - content.y0,
                }),
            },
            None => ScrollBars::default(),
        };
        if let Some(viewport) = self.viewport_mut(sf) {
            viewport.scroll_bars = bars;
        }
    }

    /// Scroll the contents by `delta`, clamped so they keep covering the window.
    ///
    /// Positive deltas move the contents right and down, revealing what lies
    /// to their left and top.
    pub fn scroll_by(&mut self, sf: NodeId, delta: Vec2) {
        let (Some(view), Some(frame)) = (self.bounds(sf), self.scroll_contents(sf)) else {
            return;
        };
        let content = self.node(frame).bounds;

        let mut x = content.x0 + delta.x;
        if x + content.width() < view.x1 {
            x = view.x1 - content.width();
        }
        if x > view.x0 {
            x = view.x0;
        }
        let mut y = content.y0 + delta.y;
        if y + content.height() < view.y1 {
            y = view.y1 - content.height();
        }
        if y > view.y0 {
            y = view.y0;
        }

        let shift = Vec2::new(x - content.x0, y - content.y0);
        if shift != Vec2::ZERO {
            self.move_by(frame, shift);
        }
        self.adjust_scroll_bars(sf);
    }
}
