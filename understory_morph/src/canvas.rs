// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing surface consumed by [`Tree::paint`](crate::Tree::paint).

use alloc::vec::Vec;
use kurbo::Rect;
use peniko::Color;

/// A drawing surface.
///
/// The compositor only ever fills axis-aligned rectangles that have already
/// been clipped to the damaged region, so a backend does not need its own
/// clip stack to honor frame clipping.
pub trait Canvas {
    /// Fill `rect` with `paint`.
    fn fill_rect(&mut self, rect: Rect, paint: Color);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn fill_rect(&mut self, rect: Rect, paint: Color) {
        (**self).fill_rect(rect, paint);
    }
}

/// A single recorded fill.
#[derive(Clone, Copy, Debug)]
pub struct Fill {
    /// Rectangle that was filled.
    pub rect: Rect,
    /// Paint used for the fill.
    pub paint: Color,
}

/// A canvas that records fills instead of rasterizing them.
///
/// Intended for tests and debugging that want to assert on what a paint pass
/// emitted and in which order.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    fills: Vec<Fill>,
}

impl RecordingCanvas {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded fills in the order they were issued.
    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// Returns the rectangles of all recorded fills, in order.
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.fills.iter().map(|f| f.rect)
    }

    /// Returns the union of every filled rectangle.
    pub fn painted_area(&self) -> Option<Rect> {
        let mut it = self.rects();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    /// Clears all recorded fills.
    pub fn clear(&mut self) {
        self.fills.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, paint: Color) {
        self.fills.push(Fill { rect, paint });
    }
}
