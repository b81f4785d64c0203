//! Positioned text fragments and the rules for fusing them into words.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{HasRect, Rect};

/// Relative tolerance around one space width for space insertion.
pub const SPACE_TOLERANCE: f64 = 0.25;

/// Fragments closer than this many space widths may be fused.
pub const MERGE_FACTOR: f64 = 1.1;

/// A single positioned run of text with the font metrics needed for
/// merge decisions.
///
/// Equality compares trimmed text only; geometry and font are ignored.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextFragment {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub rect: Rect,
    pub text: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub font: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub font_size: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width_of_space: f64,
}

impl TextFragment {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        top: f64,
        left: f64,
        width: f64,
        height: f64,
        font: Option<String>,
        font_size: f64,
        text: impl Into<String>,
        width_of_space: f64,
    ) -> Self {
        Self {
            rect: Rect::new(top, left, width, height),
            text: text.into(),
            font,
            font_size,
            width_of_space,
        }
    }

    /// An empty fragment placed at `rect`, used to fill table holes.
    pub fn empty_at(rect: Rect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    /// True if the text is non-empty and consists only of whitespace.
    pub fn is_blank(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }

    /// Space width used for a pairwise decision: the mean of both
    /// fragments, so that the decision does not depend on argument order.
    fn space_unit(&self, other: &TextFragment) -> f64 {
        (self.width_of_space + other.width_of_space) / 2.0
    }

    /// True if `other` should be fused into `self` without a separator.
    pub fn should_merge(&self, other: &TextFragment) -> bool {
        self.overlaps_vertically(other)
            && self.horizontal_distance(other) < self.space_unit(other) * MERGE_FACTOR
            && !self.should_add_space(other)
    }

    /// True if the gap between the fragments is about one space wide.
    pub fn should_add_space(&self, other: &TextFragment) -> bool {
        let unit = self.space_unit(other);
        let dist = self.horizontal_distance(other).abs();
        self.overlaps_vertically(other)
            && dist >= unit * (1.0 - SPACE_TOLERANCE)
            && dist <= unit * (1.0 + SPACE_TOLERANCE)
    }

    /// Consumes `other`, concatenating its text and growing the box.
    ///
    /// The text order follows position, not call order: `other`'s text is
    /// prepended when it sits above `self` in the same column (a diacritic
    /// or superscript scanned late) or lies entirely to the left of
    /// `self`, and appended otherwise. Prepending left-lying text keeps
    /// the result in reading order whichever side the merge is called on.
    pub fn merge(&mut self, other: TextFragment) {
        let above = self.overlaps_horizontally(&other) && other.top() < self.top();
        let before = !self.overlaps_horizontally(&other) && other.right() <= self.left();
        if above || before {
            self.text.insert_str(0, &other.text);
        } else {
            self.text.push_str(&other.text);
        }
        self.rect.merge(&other.rect);
    }
}

impl HasRect for TextFragment {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl PartialEq for TextFragment {
    fn eq(&self, other: &Self) -> bool {
        self.text.trim() == other.text.trim()
    }
}
