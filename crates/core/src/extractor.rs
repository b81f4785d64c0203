//! Extraction orchestrator: word merging, row and column clustering, and
//! the choice between the three table builders.

use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::{debug, trace};

use crate::geometry::{HasRect, Rect};
use crate::output::Tabular;
use crate::ruling::Ruling;
use crate::settings::ExtractionSettings;
use crate::spreadsheet::Spreadsheet;
use crate::table::{RuledTable, Table};
use crate::text::TextFragment;
use crate::zone::{Boundary, Column, Line};

/// Column bands narrower than this between two vertical rulings are skipped.
pub const MIN_COLUMN_WIDTH: f64 = 10.0;

/// Row bands shorter than this between two horizontal rulings are skipped.
pub const MIN_ROW_HEIGHT: f64 = 2.0;

/// A detected table row.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RowBoundary {
    pub top: f64,
    pub bottom: f64,
    #[cfg_attr(feature = "serde", serde(rename = "text"))]
    pub texts: Vec<String>,
}

/// A detected table column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ColumnBoundary {
    pub left: f64,
    pub right: f64,
    pub width: f64,
}

/// Fuses adjacent fragments into words.
///
/// Fragments are scanned in the given order. Each one is merged into the
/// current word when [`TextFragment::should_merge`] holds and no vertical
/// ruling lies between the word's left edge and the fragment's left edge.
/// Otherwise the fragment starts a new word, and the finished word gets a
/// trailing space if the gap is about one space wide and neither side is
/// already a bare space.
///
/// This is not idempotent: run it once per fragment set.
pub fn merge_words(
    fragments: Vec<TextFragment>,
    vertical_rulings: &[Ruling],
) -> Vec<TextFragment> {
    let ruling_xs: Vec<f64> = vertical_rulings.iter().map(|r| r.left()).collect();
    let input_len = fragments.len();
    let mut slots: Vec<Option<TextFragment>> = fragments.into_iter().map(Some).collect();
    let mut anchor = 0;
    let mut previous_is_space = slots
        .first()
        .and_then(Option::as_ref)
        .is_some_and(|f| f.text == " ");

    for i in 1..slots.len() {
        let (head, tail) = slots.split_at_mut(i);
        let Some(candidate) = tail[0].take() else {
            continue;
        };
        let candidate_is_space = candidate.text == " ";
        let Some(word) = head[anchor].as_mut() else {
            tail[0] = Some(candidate);
            anchor = i;
            previous_is_space = candidate_is_space;
            continue;
        };

        let crosses_ruling = ruling_xs
            .iter()
            .any(|&x| word.left() < x && candidate.left() > x);
        if word.should_merge(&candidate) && !crosses_ruling {
            trace!(word = %word.text, next = %candidate.text, "merging fragment into word");
            word.merge(candidate);
        } else {
            if !previous_is_space && !candidate_is_space && word.should_add_space(&candidate) {
                word.text.push(' ');
            }
            tail[0] = Some(candidate);
            anchor = i;
        }
        previous_is_space = candidate_is_space;
    }

    let words: Vec<TextFragment> = slots.into_iter().flatten().collect();
    debug!(fragments = input_len, words = words.len(), "merged words");
    words
}

/// The table produced by [`TableExtractor::extract`].
#[derive(Clone, Debug)]
pub enum Extracted {
    Gap(Table),
    Ruled(RuledTable),
    Spreadsheet(Spreadsheet),
}

impl Tabular for Extracted {
    fn to_rows(&self) -> Vec<Vec<String>> {
        match self {
            Extracted::Gap(t) => t.to_rows(),
            Extracted::Ruled(t) => t.to_rows(),
            Extracted::Spreadsheet(s) => s.to_rows(),
        }
    }
}

/// Clusters one region's fragments into rows, columns and tables.
#[derive(Clone, Debug)]
pub struct TableExtractor {
    fragments: Vec<TextFragment>,
    settings: ExtractionSettings,
}

impl TableExtractor {
    /// Creates an extractor, merging words once if the settings ask for it.
    pub fn new(fragments: Vec<TextFragment>, settings: ExtractionSettings) -> Self {
        let fragments = if settings.merge_words {
            merge_words(fragments, &settings.vertical_rulings)
        } else {
            fragments
        };
        Self {
            fragments,
            settings,
        }
    }

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    pub fn into_fragments(self) -> Vec<TextFragment> {
        self.fragments
    }

    /// Groups fragments into columns, sorted by left.
    ///
    /// With vertical rulings, the columns are the bands between
    /// consecutive rulings and fragments that fit no band are dropped.
    pub fn group_by_columns(&self) -> Vec<Column> {
        cluster_columns(&self.fragments, &self.settings.vertical_rulings).0
    }

    pub fn columns(&self) -> Vec<ColumnBoundary> {
        self.group_by_columns()
            .iter()
            .map(|c| ColumnBoundary {
                left: c.left(),
                right: c.right(),
                width: c.width(),
            })
            .collect()
    }

    /// Horizontal bands that hold table rows.
    ///
    /// Without horizontal rulings, bands grow by vertical overlap between
    /// fragments. With them, each pair of consecutive rulings bounds one
    /// band spanning both rulings' x extents.
    pub fn line_boundaries(&self) -> Vec<Boundary> {
        if self.settings.horizontal_rulings.is_empty() {
            let mut boundaries: Vec<Boundary> = Vec::new();
            for f in &self.fragments {
                match boundaries.iter_mut().find(|b| b.overlaps_vertically(f)) {
                    Some(b) => {
                        b.rect.merge(&f.rect);
                        b.texts.push(f.text.clone());
                    }
                    None => {
                        let mut b = Boundary::new(f.rect);
                        b.texts.push(f.text.clone());
                        boundaries.push(b);
                    }
                }
            }
            return boundaries;
        }

        self.settings
            .horizontal_rulings
            .iter()
            .sorted_by(|a, b| a.top().total_cmp(&b.top()))
            .tuple_windows()
            .filter_map(|(above, below)| {
                let rect = Rect::from_edges(
                    above.left().min(below.left()),
                    above.bottom(),
                    above.right().max(below.right()),
                    below.top(),
                );
                if rect.height < MIN_ROW_HEIGHT {
                    return None;
                }
                let mut b = Boundary::new(rect);
                b.texts = self
                    .fragments
                    .iter()
                    .filter(|f| f.overlaps_vertically(&b))
                    .map(|f| f.text.clone())
                    .collect();
                Some(b)
            })
            .collect()
    }

    /// Row boundaries sorted by top.
    pub fn rows(&self) -> Vec<RowBoundary> {
        self.line_boundaries()
            .into_iter()
            .sorted_by(|a, b| a.top().total_cmp(&b.top()))
            .map(|b| RowBoundary {
                top: b.top(),
                bottom: b.bottom(),
                texts: b.texts,
            })
            .collect()
    }

    pub fn gap_table(&self) -> Table {
        Table::from_fragments(self.fragments.clone())
    }

    /// Builds a table from row bands and column clustering.
    ///
    /// Each fragment belongs to the first band it vertically overlaps.
    /// Rows get an empty cell for every column they have no fragment in,
    /// fragments of one row that land in the same column are merged, and
    /// a row repeating a cell of the kept row directly above it is dropped.
    pub fn ruled_table(&self) -> RuledTable {
        let mut remaining = self.fragments.clone();
        let mut lines: Vec<Line> = Vec::new();
        for boundary in self.line_boundaries() {
            let (members, rest): (Vec<TextFragment>, Vec<TextFragment>) = remaining
                .into_iter()
                .partition(|f| f.overlaps_vertically(&boundary));
            remaining = rest;

            let mut line = Line::new();
            for f in members
                .into_iter()
                .filter(|f| !f.is_blank())
                .sorted_by(|a, b| a.left().total_cmp(&b.left()))
            {
                line.push(f);
            }
            if !line.is_empty() {
                lines.push(line);
            }
        }
        if !remaining.is_empty() {
            debug!(unplaced = remaining.len(), "fragments outside every row band");
        }
        lines.sort_by(|a, b| a.top().total_cmp(&b.top()));

        let flat: Vec<TextFragment> = lines.iter().flat_map(|l| l.fragments()).cloned().collect();
        let (columns, assignment) = cluster_columns(&flat, &self.settings.vertical_rulings);

        let mut assignment = assignment.into_iter();
        let mut rows: Vec<Vec<TextFragment>> = Vec::with_capacity(lines.len());
        for line in &lines {
            let mut cells: Vec<(TextFragment, Option<usize>)> = line
                .fragments()
                .iter()
                .cloned()
                .zip(assignment.by_ref())
                .collect();
            cells.sort_by(|a, b| a.0.left().total_cmp(&b.0.left()));

            for (i, column) in columns.iter().enumerate() {
                let occupied = cells
                    .iter()
                    .any(|(f, _)| f.left() >= column.left() && f.right() <= column.right());
                if !occupied {
                    let empty = TextFragment::empty_at(Rect::new(
                        line.top(),
                        column.left(),
                        column.width(),
                        line.height(),
                    ));
                    cells.insert(i.min(cells.len()), (empty, None));
                }
            }
            rows.push(merge_same_column(cells));
        }

        let mut kept: Vec<Option<Vec<TextFragment>>> = rows.into_iter().map(Some).collect();
        for i in 1..kept.len() {
            let duplicate = match (&kept[i - 1], &kept[i]) {
                (Some(above), Some(row)) => above
                    .iter()
                    .zip(row)
                    .any(|(a, b)| !a.text.trim().is_empty() && a == b),
                _ => false,
            };
            if duplicate {
                trace!(row = i, "dropping duplicate row");
                kept[i] = None;
            }
        }

        RuledTable {
            rows: kept
                .into_iter()
                .flatten()
                .map(|mut row| {
                    row.sort_by(|a, b| a.left().total_cmp(&b.left()));
                    row
                })
                .collect(),
        }
    }

    /// Builds the ruling grid from both ruling sets and fills it with the
    /// fragments.
    pub fn spreadsheet(&self) -> Spreadsheet {
        let rulings = self
            .settings
            .horizontal_rulings
            .iter()
            .chain(&self.settings.vertical_rulings)
            .cloned();
        let mut sheet = Spreadsheet::new(rulings);
        sheet.populate(self.fragments.clone());
        sheet
    }

    /// Picks a builder from the rulings at hand: a spreadsheet when both
    /// orientations are present, ruled rows when only vertical rulings
    /// are, and the gap-based table otherwise.
    pub fn extract(&self) -> Extracted {
        let has_h = !self.settings.horizontal_rulings.is_empty();
        let has_v = !self.settings.vertical_rulings.is_empty();
        match (has_h, has_v) {
            (true, true) => Extracted::Spreadsheet(self.spreadsheet()),
            (false, true) => Extracted::Ruled(self.ruled_table()),
            _ => Extracted::Gap(self.gap_table()),
        }
    }
}

/// Clusters fragments into columns sorted by left and reports the column
/// each input fragment went to.
fn cluster_columns(
    fragments: &[TextFragment],
    vertical_rulings: &[Ruling],
) -> (Vec<Column>, Vec<Option<usize>>) {
    let order: Vec<usize> = (0..fragments.len())
        .sorted_by(|&a, &b| fragments[a].left().total_cmp(&fragments[b].left()))
        .collect();
    let mut assignment = vec![None; fragments.len()];

    if vertical_rulings.is_empty() {
        let mut columns: Vec<Column> = Vec::new();
        for i in order {
            let f = &fragments[i];
            match columns.iter().position(|c| f.overlaps_horizontally(c)) {
                Some(c) => {
                    columns[c].push(f.clone());
                    assignment[i] = Some(c);
                }
                None => {
                    assignment[i] = Some(columns.len());
                    columns.push(Column::from_fragment(f.clone()));
                }
            }
        }
        return (columns, assignment);
    }

    let mut columns = column_bands(vertical_rulings);
    let mut dropped = 0;
    for i in order {
        let f = &fragments[i];
        match columns.iter().position(|c| f.overlaps_horizontally(c)) {
            Some(c) => {
                columns[c].push(f.clone());
                assignment[i] = Some(c);
            }
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!(dropped, "fragments outside every column band");
    }
    (columns, assignment)
}

fn column_bands(vertical_rulings: &[Ruling]) -> Vec<Column> {
    vertical_rulings
        .iter()
        .map(|r| r.left())
        .sorted_by(f64::total_cmp)
        .tuple_windows()
        .filter(|(a, b)| b - a > MIN_COLUMN_WIDTH)
        .map(|(a, b)| Column::new(a, b - a))
        .collect()
}

/// Merges non-empty cells of one row that were clustered into the same
/// column. The upper cell absorbs the lower one.
fn merge_same_column(cells: Vec<(TextFragment, Option<usize>)>) -> Vec<TextFragment> {
    let mut slots: Vec<Option<(TextFragment, Option<usize>)>> = cells.into_iter().map(Some).collect();
    for (a, b) in (0..slots.len()).tuple_combinations() {
        let (keep, absorb) = match (&slots[a], &slots[b]) {
            (Some((fa, Some(ca))), Some((fb, Some(cb))))
                if ca == cb && !fa.text.is_empty() && !fb.text.is_empty() =>
            {
                if fa.bottom() <= fb.bottom() {
                    (a, b)
                } else {
                    (b, a)
                }
            }
            _ => continue,
        };
        let Some((absorbed, _)) = slots[absorb].take() else {
            continue;
        };
        if let Some((target, _)) = slots[keep].as_mut() {
            target.merge(absorbed);
        }
    }
    slots.into_iter().flatten().map(|(f, _)| f).collect()
}
