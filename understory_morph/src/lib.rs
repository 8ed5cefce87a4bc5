// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_morph --heading-base-level=0

//! Understory Morph: a retained-mode morph tree with damage-driven compositing.
//!
//! A morph is a rectangle with a cached image, an optional drop shadow, and an
//! ordered list of children painted back to front on top of it. This crate
//! owns the morph tree and answers three questions:
//!
//! - Which area of the screen does a morph cover? See [`Tree::full_extent`].
//! - What changed since the last repaint? Every mutation appends to the
//!   [`Damage`] log through [`Tree::changed`].
//! - How is a damaged rectangle repainted? [`Tree::paint`] walks a subtree and
//!   fills each morph's image into a [`Canvas`], clipped to the requested
//!   region and to every ancestor's bounds.
//!
//! ## Frames and scroll frames
//!
//! A [`Frame`] is a clipping container. Moving it reports two rectangles, its
//! extent before and after, and moves its contents with
//! [`Tree::translate_silently`], so scrolling a large document does not flood
//! the damage log.
//!
//! A scroll frame ([`MorphKind::ScrollFrame`]) is a fixed window over a bound
//! contents frame. The contents frame grows to fit its children plus the
//! [`ViewportOptions`] padding and growth ([`Tree::adjust_bounds`]), is never
//! smaller than the window, and is kept from exposing empty space inside it
//! ([`Tree::keep_in_scroll_frame`]). With text line wrapping enabled, text
//! children are reflowed to the window's width instead.
//!
//! ```rust
//! use kurbo::{Rect, Vec2};
//! use understory_morph::{MorphDesc, Tree, ViewportOptions};
//!
//! let mut tree = Tree::new();
//! let view = Rect::new(0.0, 0.0, 200.0, 200.0);
//! let sf = tree.insert_scroll_frame(None, view, ViewportOptions::default().with_padding(5.0));
//!
//! let page = tree.insert(None, MorphDesc::plain(Rect::new(0.0, 0.0, 180.0, 600.0)));
//! tree.add_contents(sf, page);
//!
//! let contents = tree.scroll_contents(sf).unwrap();
//! assert_eq!(tree.bounds(contents), Some(Rect::new(-5.0, -5.0, 200.0, 605.0)));
//!
//! let _ = tree.take_damage();
//! tree.scroll_by(sf, Vec2::new(0.0, -100.0));
//! // The contents frame reports itself twice; the page is moved silently.
//! assert_eq!(tree.take_damage().len(), 2);
//! ```
//!
//! ## Identifiers and links
//!
//! Morphs are addressed by generational [`NodeId`]s. Links between morphs that
//! are not parent/child edges (a caster's shadow, a frame's scroll frame, a
//! scroll frame's contents) are plain `NodeId`s that may go stale; every
//! operation checks liveness before following one.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `trace` for each damage rectangle and
//! refit, `debug` for operations ignored because their target is unbound or
//! would form a cycle, and `warn` for painting a stale morph.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod canvas;
mod compositor;
mod copy;
mod damage;
mod frame;
mod menu;
mod scroll;
mod text;
mod tree;
mod types;
mod util;

pub use canvas::{Canvas, Fill, RecordingCanvas};
pub use copy::CopyMap;
pub use damage::Damage;
pub use frame::{BindError, Frame};
pub use menu::{Menu, MenuAction, MenuContributor, MenuEntry};
pub use scroll::{ScrollBars, ScrollRange, Viewport, ViewportOptions};
pub use text::TextFlow;
pub use tree::Tree;
pub use types::{Appearance, MorphDesc, MorphKind, NodeFlags, NodeId};
