// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage log filled by change notifications.

use alloc::vec::Vec;
use kurbo::Rect;

/// Rectangles reported by [`crate::Tree::changed`] since the last drain.
///
/// Every change notification appends exactly one rectangle, in call order.
/// Rectangles may overlap and are not deduplicated or coalesced; callers can
/// merge them with [`Damage::union_rect`] or repaint them one by one with
/// [`crate::Tree::paint`].
#[derive(Clone, Debug, Default)]
pub struct Damage {
    /// World-space rectangles that should be repainted.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// Returns the union of all damage rects.
    pub fn union_rect(&self) -> Option<Rect> {
        let mut it = self.dirty_rects.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    /// Returns true if nothing has been damaged.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Number of recorded rectangles.
    pub fn len(&self) -> usize {
        self.dirty_rects.len()
    }

    pub(crate) fn push(&mut self, rect: Rect) {
        self.dirty_rects.push(rect);
    }
}
