// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the morph tree: node identifiers, flags, roles, and construction data.

use kurbo::Rect;
use peniko::Color;

use crate::frame::Frame;
use crate::scroll::Viewport;
use crate::text::TextFlow;

/// Identifier for a morph in the tree.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale `NodeId`s never alias a different live node because the generation must match.
/// Use [`Tree::is_alive`](crate::Tree::is_alive) to check liveness.
///
/// Non-owning references between morphs (a caster's shadow, a frame's scroll
/// frame) are stored as `NodeId`s, so they can dangle without keeping anything alive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Morph flags controlling visibility and interaction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Morph is visible (it and its subtree participate in painting).
        const VISIBLE                   = 0b0000_0001;
        /// Morph can be picked up and dragged by the hand.
        const DRAGGABLE                 = 0b0000_0010;
        /// Clicks on transparent pixels still reach this morph.
        const NOTICES_TRANSPARENT_CLICK = 0b0000_0100;
        /// Other morphs may be dropped into this one.
        const ACCEPTS_DROPS             = 0b0000_1000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::DRAGGABLE
    }
}

/// The role a morph plays in the tree.
///
/// Roles are a closed set checked by pattern matching. Behavior that is not
/// tied to a fixed role is exposed through capability traits such as
/// [`MenuContributor`](crate::MenuContributor); applications can tag their
/// own morphs with [`MorphKind::Other`].
#[derive(Clone, Debug, Default)]
pub enum MorphKind {
    /// An ordinary rectangle.
    #[default]
    Plain,
    /// A drop shadow cast by its parent.
    ///
    /// Shadows are painted with the region requested from their caster,
    /// not the caster's clipped dirty rectangle.
    Shadow,
    /// Wrapping text content whose height follows its width.
    Text(TextFlow),
    /// A clipping container, optionally bound to a scroll frame.
    Frame(Frame),
    /// A scroll frame: a fixed visible window over a contents frame.
    ScrollFrame(Viewport),
    /// An application-defined role.
    Other(u32),
}

impl MorphKind {
    /// Returns true for [`MorphKind::Shadow`].
    pub fn is_shadow(&self) -> bool {
        matches!(self, Self::Shadow)
    }

    /// Returns true for [`MorphKind::Text`].
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns the frame data if this is a [`MorphKind::Frame`].
    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    /// Returns the viewport data if this is a [`MorphKind::ScrollFrame`].
    pub fn as_viewport(&self) -> Option<&Viewport> {
        match self {
            Self::ScrollFrame(viewport) => Some(viewport),
            _ => None,
        }
    }
}

/// Construction data for a morph.
#[derive(Clone, Debug)]
pub struct MorphDesc {
    /// Bounds in world coordinates.
    pub bounds: Rect,
    /// Fill color.
    pub color: Color,
    /// Opacity multiplier applied to `color` when the image is generated.
    pub alpha: f32,
    /// Visibility and interaction flags.
    pub flags: NodeFlags,
    /// Role of the morph.
    pub kind: MorphKind,
}

impl Default for MorphDesc {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            color: Color::from_rgb8(80, 80, 80),
            alpha: 1.0,
            flags: NodeFlags::default(),
            kind: MorphKind::Plain,
        }
    }
}

impl MorphDesc {
    /// A plain morph covering `bounds`.
    pub fn plain(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// A clipping frame covering `bounds`, not bound to any scroll frame.
    pub fn frame(bounds: Rect) -> Self {
        Self {
            bounds,
            color: Frame::DEFAULT_COLOR,
            flags: NodeFlags::default() | NodeFlags::ACCEPTS_DROPS,
            kind: MorphKind::Frame(Frame::default()),
            ..Self::default()
        }
    }

    /// A text morph at `bounds`; the height is reflowed on the next width change.
    pub fn text(bounds: Rect, flow: TextFlow) -> Self {
        Self {
            bounds,
            kind: MorphKind::Text(flow),
            ..Self::default()
        }
    }

    /// Replace the color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Replace the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// The cached drawable of a morph.
///
/// Painting always uses the cached image; changing a morph's color or alpha
/// only shows up after the image is regenerated with
/// [`Tree::redraw`](crate::Tree::redraw).
#[derive(Clone, Copy, Debug)]
pub struct Appearance {
    /// Fill used when painting, with alpha already applied.
    pub fill: Color,
    /// Number of times the image has been regenerated.
    pub revision: u64,
}

impl Appearance {
    pub(crate) fn render(color: Color, alpha: f32, revision: u64) -> Self {
        let alpha = alpha.clamp(0.0, 1.0);
        Self {
            fill: color.multiply_alpha(alpha),
            revision,
        }
    }

    /// Returns true if painting this image would not change any pixel.
    pub fn is_transparent(&self) -> bool {
        self.fill.components[3] <= 0.0
    }
}
