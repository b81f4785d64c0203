//! Row and column accumulators.
//!
//! Both containers own the fragments appended to them and grow their
//! bounding box as they go.

use itertools::{EitherOrBoth, Itertools};

use crate::geometry::{HasRect, Rect};
use crate::text::TextFragment;

/// A horizontal band of the page together with the text found in it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Boundary {
    pub rect: Rect,
    pub texts: Vec<String>,
}

impl Boundary {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            texts: Vec::new(),
        }
    }
}

impl HasRect for Boundary {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

/// One table row.
#[derive(Clone, Debug, Default)]
pub struct Line {
    rect: Rect,
    fragments: Vec<TextFragment>,
    index: Option<usize>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<TextFragment> {
        self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Appends a fragment to the row.
    ///
    /// A fragment that shares a column with one already in the row is
    /// merged into it; if the two are on different text lines (a wrapped
    /// cell) a space is put between them. The row box always grows to
    /// cover the pushed fragment.
    pub fn push(&mut self, mut fragment: TextFragment) {
        if self.fragments.is_empty() {
            self.rect = fragment.rect;
            self.fragments.push(fragment);
            return;
        }
        self.rect.merge(&fragment.rect);
        match self
            .fragments
            .iter_mut()
            .find(|f| f.overlaps_horizontally(&fragment))
        {
            Some(same_column) => {
                if !same_column.overlaps_vertically(&fragment) {
                    fragment.text.insert(0, ' ');
                }
                same_column.merge(fragment);
            }
            None => self.fragments.push(fragment),
        }
    }
}

impl HasRect for Line {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

/// Rows are equal when their fragments match pairwise by trimmed text,
/// with the shorter row padded by empty cells.
impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.fragments
            .iter()
            .zip_longest(other.fragments.iter())
            .all(|pair| match pair {
                EitherOrBoth::Both(a, b) => a == b,
                EitherOrBoth::Left(f) | EitherOrBoth::Right(f) => f.text.trim().is_empty(),
            })
    }
}

/// A vertical band of the page and the fragments inside it, kept sorted
/// by top.
#[derive(Clone, Debug, Default)]
pub struct Column {
    rect: Rect,
    fragments: Vec<TextFragment>,
}

impl Column {
    /// An empty column band starting at `left`.
    pub fn new(left: f64, width: f64) -> Self {
        Self {
            rect: Rect::new(0.0, left, width, 0.0),
            fragments: Vec::new(),
        }
    }

    /// A column seeded by a single fragment.
    pub fn from_fragment(fragment: TextFragment) -> Self {
        Self {
            rect: fragment.rect,
            fragments: vec![fragment],
        }
    }

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<TextFragment> {
        self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn push(&mut self, fragment: TextFragment) {
        if self.fragments.is_empty() {
            self.rect.top = fragment.rect.top;
            self.rect.height = fragment.rect.height;
        }
        self.rect.merge(&fragment.rect);
        let at = self
            .fragments
            .partition_point(|f| f.top() <= fragment.top());
        self.fragments.insert(at, fragment);
    }

    /// True if the two columns could be merged.
    pub fn contains(&self, other: &Column) -> bool {
        self.overlaps_horizontally(other)
    }

    /// Mean top-to-top distance between consecutive fragments, averaged
    /// over the `len() - 1` gaps.
    pub fn average_line_distance(&self) -> f64 {
        if self.fragments.len() < 2 {
            return 0.0;
        }
        let total: f64 = self
            .fragments
            .iter()
            .tuple_windows()
            .map(|(a, b)| b.top() - a.top())
            .sum();
        total / (self.fragments.len() - 1) as f64
    }
}

impl HasRect for Column {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(top: f64, left: f64, width: f64, text: &str) -> TextFragment {
        TextFragment::new(top, left, width, 10.0, None, 10.0, text, 3.0)
    }

    #[test]
    fn test_line_push_grows_box() {
        let mut line = Line::new();
        line.push(frag(0.0, 0.0, 20.0, "a"));
        line.push(frag(2.0, 50.0, 20.0, "b"));
        assert_eq!(line.len(), 2);
        assert_eq!(line.rect(), &Rect::from_edges(0.0, 0.0, 70.0, 12.0));
    }

    #[test]
    fn test_line_merges_wrapped_cell_with_space() {
        let mut line = Line::new();
        line.push(frag(0.0, 0.0, 40.0, "first"));
        line.push(frag(12.0, 0.0, 30.0, "second"));
        assert_eq!(line.len(), 1);
        assert_eq!(line.fragments()[0].text, "first second");
    }

    #[test]
    fn test_line_box_covers_merged_wrapped_line() {
        let mut line = Line::new();
        line.push(frag(0.0, 0.0, 40.0, "first"));
        line.push(frag(12.0, 0.0, 30.0, "second"));
        assert_eq!(line.len(), 1);
        assert_eq!(line.rect(), &Rect::from_edges(0.0, 0.0, 40.0, 22.0));
        assert_eq!(line.rect(), &line.fragments()[0].rect);
    }

    #[test]
    fn test_average_line_distance_over_gaps() {
        let mut col = Column::new(0.0, 50.0);
        col.push(frag(0.0, 5.0, 10.0, "a"));
        col.push(frag(10.0, 5.0, 10.0, "b"));
        col.push(frag(40.0, 5.0, 10.0, "c"));
        assert_eq!(col.average_line_distance(), 20.0);
    }

    #[test]
    fn test_line_equality_pads_with_empty() {
        let mut a = Line::new();
        a.push(frag(0.0, 0.0, 10.0, "x"));
        let mut b = Line::new();
        b.push(frag(0.0, 0.0, 10.0, "x "));
        b.push(frag(0.0, 50.0, 10.0, " "));
        assert_eq!(a, b);
        b.push(frag(0.0, 90.0, 10.0, "y"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_column_keeps_fragments_sorted_by_top() {
        let mut col = Column::new(0.0, 50.0);
        col.push(frag(30.0, 5.0, 10.0, "c"));
        col.push(frag(10.0, 5.0, 10.0, "a"));
        col.push(frag(20.0, 5.0, 10.0, "b"));
        let texts: Vec<&str> = col.fragments().iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(col.top(), 10.0);
        assert_eq!(col.bottom(), 40.0);
        assert_eq!(col.average_line_distance(), 10.0);
    }

    #[test]
    fn test_column_contains() {
        let a = Column::new(0.0, 50.0);
        assert!(a.contains(&Column::new(40.0, 50.0)));
        assert!(!a.contains(&Column::new(50.0, 50.0)));
    }
}
