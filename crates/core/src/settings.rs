//! Extraction settings.

use crate::ruling::Ruling;

/// Parameters for one extraction call.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractionSettings {
    /// Horizontal rulings bounding table rows. Empty means rows are
    /// found by clustering text.
    pub horizontal_rulings: Vec<Ruling>,

    /// Vertical rulings bounding table columns. Empty means columns are
    /// found by clustering text. Words are never merged across one.
    pub vertical_rulings: Vec<Ruling>,

    /// If adjacent fragments should be fused into words before
    /// clustering.
    pub merge_words: bool,

    /// Reserved; multi-line cells are currently always kept together.
    pub split_multiline_cells: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            horizontal_rulings: Vec::new(),
            vertical_rulings: Vec::new(),
            merge_words: true,
            split_multiline_cells: false,
        }
    }
}

impl ExtractionSettings {
    /// Sorts a mixed set of rulings into the horizontal and vertical lists.
    pub fn with_rulings(mut self, rulings: impl IntoIterator<Item = Ruling>) -> Self {
        for r in rulings {
            if r.is_horizontal() {
                self.horizontal_rulings.push(r);
            } else {
                self.vertical_rulings.push(r);
            }
        }
        self
    }

    pub fn has_rulings(&self) -> bool {
        !self.horizontal_rulings.is_empty() || !self.vertical_rulings.is_empty()
    }
}
