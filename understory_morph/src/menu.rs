// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context menus contributed by morph roles.

use alloc::vec::Vec;

use crate::frame::Frame;
use crate::tree::Tree;
use crate::types::{MorphKind, NodeId};

/// Something a menu item does when chosen, applied with [`Tree::perform`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// [`Tree::keep_all_submorphs_within`] on the morph the menu was built for.
    KeepAllSubmorphsWithin,
}

/// One row of a [`Menu`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    /// A separator.
    Line,
    /// A selectable item.
    Item {
        /// Text shown in the menu.
        label: &'static str,
        /// Action applied when chosen.
        action: MenuAction,
        /// Help text shown on hover.
        hint: &'static str,
    },
}

/// A context menu under construction.
#[derive(Clone, Debug, Default)]
pub struct Menu {
    entries: Vec<MenuEntry>,
}

impl Menu {
    /// Create an empty menu.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a separator.
    pub fn add_line(&mut self) {
        self.entries.push(MenuEntry::Line);
    }

    /// Append an item.
    pub fn add_item(&mut self, label: &'static str, action: MenuAction, hint: &'static str) {
        self.entries.push(MenuEntry::Item {
            label,
            action,
            hint,
        });
    }

    /// All rows, top to bottom.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Returns true if nothing was added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Actions of every item, top to bottom.
    pub fn actions(&self) -> impl Iterator<Item = MenuAction> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Item { action, .. } => Some(*action),
            MenuEntry::Line => None,
        })
    }
}

/// A role that adds entries to a morph's context menu.
pub trait MenuContributor {
    /// Append this role's entries for the morph `id` to `menu`.
    fn contribute_menu(&self, tree: &Tree, id: NodeId, menu: &mut Menu);
}

impl MenuContributor for Frame {
    fn contribute_menu(&self, tree: &Tree, id: NodeId, menu: &mut Menu) {
        if tree.children_of(id).is_empty() {
            return;
        }
        menu.add_line();
        menu.add_item(
            "move all inside...",
            MenuAction::KeepAllSubmorphsWithin,
            "keep all submorphs\nwithin and visible",
        );
    }
}

impl Tree {
    /// Append the entries contributed by a morph's role to `menu`.
    pub fn context_menu(&self, id: NodeId, menu: &mut Menu) {
        if let Some(MorphKind::Frame(frame)) = self.kind(id) {
            frame.contribute_menu(self, id, menu);
        }
    }

    /// Apply a menu action to the morph the menu was built for.
    pub fn perform(&mut self, id: NodeId, action: MenuAction) {
        match action {
            MenuAction::KeepAllSubmorphsWithin => self.keep_all_submorphs_within(id),
        }
    }
}
