//! Table reconstruction from a lattice of ruling lines.
//!
//! Every cell is bounded by a left and a top ruling that nearly meet, the
//! closest vertical ruling to the right that reaches the top ruling, and
//! the closest horizontal ruling below that reaches both verticals. A
//! cell that spans interior ruling offsets is marked merged and followed
//! by zero-area placeholder cells, so that the row and column
//! projections stay rectangular:
//!
//! ```text
//! -------------------
//! | C |  C |  C | C |
//! |-----------------|
//! | C | MC    P | C |   MC  merged cell holding all text in its bounds
//! |----    +    ----|   P   placeholder (zero width or zero height)
//! | C | P    DP | C |   DP  double placeholder (zero width and height)
//! |-----------------|
//! ```
//!
//! The candidate search is quadratic in the number of rulings per axis.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::geometry::{HasRect, Rect};
use crate::output::Tabular;
use crate::ruling::Ruling;
use crate::text::TextFragment;

/// A table cell bounded by rulings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    rect: Rect,
    fragments: Vec<TextFragment>,
    /// Zero-area filler standing in for a grid slot covered by a spanning cell.
    pub placeholder: bool,
    /// Set on a real cell that spans one or more interior ruling offsets.
    pub merged: bool,
}

impl Cell {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            rect: Rect::new(top, left, width, height),
            ..Self::default()
        }
    }

    fn placeholder(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            placeholder: true,
            ..Self::new(top, left, width, height)
        }
    }

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    pub fn push(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }

    /// Contained text ordered top to bottom, then left to right.
    /// Placeholders have no text.
    pub fn text(&self) -> String {
        if self.placeholder {
            return String::new();
        }
        self.fragments
            .iter()
            .sorted_by(|a, b| {
                a.top()
                    .total_cmp(&b.top())
                    .then(a.left().total_cmp(&b.left()))
            })
            .map(|f| f.text.as_str())
            .collect()
    }
}

impl HasRect for Cell {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

/// A table whose grid comes from ruling lines.
#[derive(Clone, Debug, Default)]
pub struct Spreadsheet {
    rect: Rect,
    cells: Vec<Cell>,
    horizontal_rulings: Vec<Ruling>,
    vertical_rulings: Vec<Ruling>,
}

impl Spreadsheet {
    /// Builds the cell grid from a region's rulings.
    ///
    /// Rulings are expected to have been through
    /// [`clean_rulings`](crate::ruling::clean_rulings); exact duplicates
    /// are dropped here.
    pub fn new(rulings: impl IntoIterator<Item = Ruling>) -> Self {
        let (mut horizontal, mut vertical): (Vec<Ruling>, Vec<Ruling>) =
            rulings.into_iter().partition(Ruling::is_horizontal);
        horizontal.sort_by(|a, b| {
            a.top()
                .total_cmp(&b.top())
                .then(a.left().total_cmp(&b.left()))
                .then(a.right().total_cmp(&b.right()))
        });
        vertical.sort_by(|a, b| {
            a.left()
                .total_cmp(&b.left())
                .then(a.top().total_cmp(&b.top()))
                .then(a.bottom().total_cmp(&b.bottom()))
        });
        horizontal.dedup_by(|a, b| a.rect() == b.rect());
        vertical.dedup_by(|a, b| a.rect() == b.rect());

        let rect = horizontal
            .iter()
            .chain(&vertical)
            .map(|r| *r.rect())
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or_default();

        let cells = build_cells(&horizontal, &vertical);
        debug!(
            horizontal = horizontal.len(),
            vertical = vertical.len(),
            cells = cells.len(),
            "built spreadsheet"
        );

        Self {
            rect,
            cells,
            horizontal_rulings: horizontal,
            vertical_rulings: vertical,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn horizontal_rulings(&self) -> &[Ruling] {
        &self.horizontal_rulings
    }

    pub fn vertical_rulings(&self) -> &[Ruling] {
        &self.vertical_rulings
    }

    /// Assigns each fragment to the first real cell containing its centre
    /// point. Fragments that fit no cell are handed back.
    pub fn populate(
        &mut self,
        fragments: impl IntoIterator<Item = TextFragment>,
    ) -> Vec<TextFragment> {
        let mut unplaced = Vec::new();
        for fragment in fragments {
            let center = fragment.rect.center();
            match self
                .cells
                .iter_mut()
                .find(|c| !c.placeholder && c.rect.contains_point(center))
            {
                Some(cell) => cell.push(fragment),
                None => unplaced.push(fragment),
            }
        }
        if !unplaced.is_empty() {
            debug!(unplaced = unplaced.len(), "fragments outside every cell");
        }
        unplaced
    }

    /// Cells grouped by top, each row sorted by left.
    ///
    /// When the first row has fewer distinct left offsets than the second
    /// (a top border drawn without some interior verticals), zero-size
    /// filler cells are added to the first row at the missing offsets.
    pub fn rows(&self) -> Vec<Vec<Cow<'_, Cell>>> {
        let mut rows: Vec<Vec<Cow<'_, Cell>>> = group_cells(&self.cells, |c| c.top())
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .sorted_by(|a, b| a.left().total_cmp(&b.left()))
                    .map(Cow::Borrowed)
                    .collect()
            })
            .collect();

        if rows.len() >= 2 {
            let first = distinct_lefts(&rows[0]);
            let second = distinct_lefts(&rows[1]);
            if first.len() < second.len() {
                let top = rows[0][0].top();
                for missing in second.difference(&first) {
                    rows[0].push(Cow::Owned(Cell::placeholder(
                        top,
                        missing.into_inner(),
                        0.0,
                        0.0,
                    )));
                }
                rows[0].sort_by(|a, b| a.left().total_cmp(&b.left()));
            }
        }
        rows
    }

    /// Cells grouped by left, each column sorted by top.
    pub fn cols(&self) -> Vec<Vec<&Cell>> {
        group_cells(&self.cells, |c| c.left())
            .into_iter()
            .map(|col| {
                col.into_iter()
                    .sorted_by(|a, b| a.top().total_cmp(&b.top()))
                    .collect()
            })
            .collect()
    }
}

impl HasRect for Spreadsheet {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

impl Tabular for Spreadsheet {
    fn to_rows(&self) -> Vec<Vec<String>> {
        self.rows()
            .iter()
            .map(|row| row.iter().map(|c| c.text()).collect())
            .collect()
    }
}

fn group_cells(cells: &[Cell], key: impl Fn(&Cell) -> f64) -> Vec<Vec<&Cell>> {
    let mut grouped: BTreeMap<OrderedFloat<f64>, Vec<&Cell>> = BTreeMap::new();
    for c in cells {
        grouped.entry(OrderedFloat(key(c))).or_default().push(c);
    }
    grouped.into_values().collect()
}

fn distinct_lefts(row: &[Cow<'_, Cell>]) -> BTreeSet<OrderedFloat<f64>> {
    row.iter().map(|c| OrderedFloat(c.left())).collect()
}

fn unique_offsets(rulings: &[Ruling]) -> Vec<f64> {
    rulings
        .iter()
        .map(|r| OrderedFloat(r.offset()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(OrderedFloat::into_inner)
        .collect()
}

fn build_cells(horizontal: &[Ruling], vertical: &[Ruling]) -> Vec<Cell> {
    let v_offsets = unique_offsets(vertical);
    let h_offsets = unique_offsets(horizontal);
    let (Some(&last_x), Some(&last_y)) = (v_offsets.last(), h_offsets.last()) else {
        return Vec::new();
    };

    let mut cells = Vec::new();
    for (i, left) in vertical.iter().enumerate() {
        if left.left() == last_x {
            continue;
        }
        for (j, top) in horizontal.iter().enumerate() {
            if top.top() == last_y || !top.nearly_intersects(left) {
                continue;
            }

            let Some(right) = vertical[i + 1..]
                .iter()
                .filter(|r| {
                    r.left() > left.left() && r.nearly_intersects(top) && r.bottom() > top.top()
                })
                .min_by(|a, b| a.left().total_cmp(&b.left()))
            else {
                continue;
            };

            let Some(bottom) = horizontal[j + 1..]
                .iter()
                .filter(|r| {
                    r.top() > top.top() && r.nearly_intersects(left) && r.nearly_intersects(right)
                })
                .min_by(|a, b| a.top().total_cmp(&b.top()))
            else {
                continue;
            };

            let cell = Cell::new(
                top.top(),
                left.left(),
                right.right() - left.left(),
                bottom.bottom() - top.top(),
            );
            push_with_placeholders(&mut cells, cell, &v_offsets, &h_offsets);
        }
    }
    cells
}

fn push_with_placeholders(
    cells: &mut Vec<Cell>,
    mut cell: Cell,
    v_offsets: &[f64],
    h_offsets: &[f64],
) {
    let spanned_x: Vec<f64> = v_offsets
        .iter()
        .copied()
        .filter(|&x| x > cell.left() && x < cell.right())
        .collect();
    let spanned_y: Vec<f64> = h_offsets
        .iter()
        .copied()
        .filter(|&y| y > cell.top() && y < cell.bottom())
        .collect();
    cell.merged = !spanned_x.is_empty() || !spanned_y.is_empty();
    let spanning = cell.rect;
    cells.push(cell);

    for &x in &spanned_x {
        cells.push(Cell::placeholder(spanning.top, x, 0.0, spanning.height));
    }
    for &y in &spanned_y {
        cells.push(Cell::placeholder(y, spanning.left, spanning.width, 0.0));
    }
    for (&x, &y) in spanned_x.iter().cartesian_product(&spanned_y) {
        cells.push(Cell::placeholder(y, x, 0.0, 0.0));
    }
}
