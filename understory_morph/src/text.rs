// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrapping text content.
//!
//! Text shaping is not this crate's business. A [`TextFlow`] only carries the
//! measured advance of each word, which is all a scroll frame needs to find
//! out how tall its text becomes at a given width.

use alloc::vec::Vec;

/// Pre-measured words laid out with greedy line breaking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextFlow {
    word_widths: Vec<f64>,
    space_width: f64,
    line_height: f64,
}

impl TextFlow {
    /// Create a flow from measured word advances.
    pub fn new(word_widths: Vec<f64>, space_width: f64, line_height: f64) -> Self {
        Self {
            word_widths,
            space_width,
            line_height,
        }
    }

    /// Advances of the words, in reading order.
    pub fn word_widths(&self) -> &[f64] {
        &self.word_widths
    }

    /// Height of a single line.
    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Number of lines when wrapped to `width`.
    ///
    /// Always at least one: empty text still occupies a line. A word wider
    /// than `width` gets a line of its own and overflows it.
    pub fn line_count(&self, width: f64) -> usize {
        let mut lines = 1;
        let mut line_width: Option<f64> = None;
        for &word in &self.word_widths {
            line_width = match line_width {
                None => Some(word),
                Some(used) if used + self.space_width + word <= width => {
                    Some(used + self.space_width + word)
                }
                Some(_) => {
                    lines += 1;
                    Some(word)
                }
            };
        }
        lines
    }

    /// Height of the text when wrapped to `width`.
    pub fn height_for_width(&self, width: f64) -> f64 {
        let lines = self.line_count(width) as f64;
        lines * self.line_height
    }
}
