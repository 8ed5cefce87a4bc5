// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Vec2};

/// Move only the far corner of `rect` by `delta`.
pub(crate) fn grow_by(rect: Rect, delta: Vec2) -> Rect {
    Rect::new(rect.x0, rect.y0, rect.x1 + delta.x, rect.y1 + delta.y)
}

/// True if `rect` covers a positive area on both axes.
pub(crate) fn has_area(rect: Rect) -> bool {
    rect.width() > 0.0 && rect.height() > 0.0
}
