//! Gap-based table reconstruction for pages without ruling lines.
//!
//! Rows come from vertical overlap between fragments. Column separators
//! are the x positions where a left-to-right sweep over the fragments
//! finds horizontal whitespace that no fragment crosses.

use itertools::{EitherOrBoth, Itertools};
use tracing::debug;

use crate::extractor::merge_words;
use crate::geometry::HasRect;
use crate::output::Tabular;
use crate::settings::ExtractionSettings;
use crate::text::TextFragment;
use crate::zone::Line;

/// Two fragments share a row when the vertical overlap covers at least
/// this fraction of the shorter one.
pub const MIN_LINE_OVERLAP: f64 = 0.01;

/// A grid of optional fragments with the column separators that produced it.
#[derive(Clone, Debug, Default)]
pub struct Table {
    rows: Vec<Vec<Option<TextFragment>>>,
    separators: Vec<f64>,
}

impl Table {
    /// An empty table with `row_count` rows.
    pub fn new(row_count: usize, separators: Vec<f64>) -> Self {
        Self {
            rows: vec![Vec::new(); row_count],
            separators,
        }
    }

    /// A table holding plain text cells, mainly for comparisons.
    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|text| {
                            Some(TextFragment {
                                text: text.as_ref().to_string(),
                                ..TextFragment::default()
                            })
                        })
                        .collect()
                })
                .collect(),
            separators: Vec::new(),
        }
    }

    /// Builds a table from already merged fragments.
    pub fn from_fragments(fragments: Vec<TextFragment>) -> Self {
        if fragments.is_empty() {
            return Self::default();
        }

        let lines = group_by_lines(fragments.clone());
        let top = lines.first().map_or(0.0, |l| l.top());
        let separators = column_separators(&fragments, top);
        let mut table = Self::new(lines.len(), separators);
        for (i, line) in lines.into_iter().enumerate() {
            let row = line.index().unwrap_or(i);
            for fragment in line.into_fragments() {
                let column = table.column_index(&fragment);
                table.add_fragment(fragment, row, column);
            }
        }

        for row in &mut table.rows {
            for cell in row.iter_mut().filter(|c| c.is_none()) {
                *cell = Some(TextFragment::default());
            }
        }
        table.rows.sort_by(|a, b| row_top(a).total_cmp(&row_top(b)));
        debug!(
            rows = table.rows.len(),
            separators = table.separators.len(),
            "built gap table"
        );
        table
    }

    pub fn rows(&self) -> &[Vec<Option<TextFragment>>] {
        &self.rows
    }

    /// Column separators, rightmost first.
    pub fn separators(&self) -> &[f64] {
        &self.separators
    }

    /// Places `fragment` at row `i`, column `j`, merging into any
    /// fragment already there.
    pub fn add_fragment(&mut self, fragment: TextFragment, i: usize, j: usize) {
        if self.rows.len() <= i {
            self.rows.resize_with(i + 1, Vec::new);
        }
        let row = &mut self.rows[i];
        if row.len() <= j {
            row.resize_with(j + 1, || None);
        }
        if let Some(existing) = &mut row[j] {
            existing.merge(fragment);
        } else {
            row[j] = Some(fragment);
        }
    }

    /// Rows with the leading columns that are empty in every row removed.
    pub fn lstrip_lines(&self) -> Vec<Vec<Option<TextFragment>>> {
        let leading = self
            .rows
            .iter()
            .map(|row| row.iter().position(|c| !cell_is_empty(c)).unwrap_or(row.len()))
            .min()
            .unwrap_or(0);
        self.rows
            .iter()
            .map(|row| row.iter().skip(leading).cloned().collect())
            .collect()
    }

    /// Separators are sorted descending, so the index of the first one the
    /// fragment lies right of counts columns from the right.
    fn column_index(&self, fragment: &TextFragment) -> usize {
        let count = self.separators.len();
        let j = self
            .separators
            .iter()
            .position(|&s| fragment.left() > s)
            .unwrap_or(count);
        count - j
    }
}

impl Tabular for Table {
    fn to_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.as_ref().map(|f| f.text.trim().to_string()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

/// Tables are equal when their left-stripped rows match cell by cell on
/// trimmed text. Missing rows and cells count as empty.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        let mine = self.lstrip_lines();
        let yours = other.lstrip_lines();
        mine.iter().zip_longest(yours.iter()).all(|pair| match pair {
            EitherOrBoth::Both(a, b) => rows_match(a, b),
            EitherOrBoth::Left(row) | EitherOrBoth::Right(row) => row.iter().all(cell_is_empty),
        })
    }
}

/// Row-ordered table produced from line boundaries and column clustering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuledTable {
    pub rows: Vec<Vec<TextFragment>>,
}

impl Tabular for RuledTable {
    fn to_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|f| f.text.trim().to_string()).collect())
            .collect()
    }
}

/// Builds a gap-based table, merging words first if the settings ask
/// for it. Empty input gives an empty table.
pub fn make_table(fragments: Vec<TextFragment>, settings: &ExtractionSettings) -> Table {
    let fragments = if settings.merge_words {
        merge_words(fragments, &settings.vertical_rulings)
    } else {
        fragments
    };
    Table::from_fragments(fragments)
}

/// Groups non-blank fragments into rows, in input order.
pub fn group_by_lines(fragments: Vec<TextFragment>) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    for fragment in fragments.into_iter().filter(|f| !f.is_blank()) {
        match lines
            .iter_mut()
            .find(|l| l.vertical_overlap_ratio(&fragment) >= MIN_LINE_OVERLAP)
        {
            Some(line) => line.push(fragment),
            None => {
                let mut line = Line::with_index(lines.len());
                line.push(fragment);
                lines.push(line);
            }
        }
    }
    lines
}

/// Sweeps fragments at or below `top` by left edge and records the
/// running right edge each time a fragment starts past it.
fn column_separators(fragments: &[TextFragment], top: f64) -> Vec<f64> {
    let mut separators = Vec::new();
    let mut right: Option<f64> = None;
    for f in fragments
        .iter()
        .filter(|f| !f.is_blank() && f.top() >= top)
        .sorted_by(|a, b| a.left().total_cmp(&b.left()))
    {
        match right {
            Some(r) if f.left() > r => {
                separators.push(r);
                right = Some(f.right());
            }
            Some(r) => right = Some(r.max(f.right())),
            None => right = Some(f.right()),
        }
    }
    separators.sort_by(|a, b| b.total_cmp(a));
    separators
}

fn row_top(row: &[Option<TextFragment>]) -> f64 {
    row.iter()
        .flatten()
        .map(|f| f.top())
        .fold(0.0, f64::max)
}

fn cell_is_empty(cell: &Option<TextFragment>) -> bool {
    cell.as_ref().is_none_or(|f| f.text.trim().is_empty())
}

fn rows_match(a: &[Option<TextFragment>], b: &[Option<TextFragment>]) -> bool {
    a.iter().zip_longest(b.iter()).all(|pair| match pair {
        EitherOrBoth::Both(x, y) => match (x, y) {
            (Some(x), Some(y)) => x == y,
            (x, y) => cell_is_empty(x) && cell_is_empty(y),
        },
        EitherOrBoth::Left(c) | EitherOrBoth::Right(c) => cell_is_empty(c),
    })
}
