//! Ruling lines: drawn horizontal or vertical segments used as table borders.
//!
//! A ruling is a rectangle that is degenerate on exactly one axis. This
//! module covers the strict and tolerant intersection tests and the
//! cleanup pass that consolidates split or doubled segments.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::error::{GridError, Result};
use crate::geometry::{HasRect, Orientation, Rect};

/// Distance a ruling is extended in each direction along its own axis
/// before the tolerant intersection test.
pub const BLOOP_AMOUNT: f64 = 2.0;

/// Collinear segments separated by less than this are joined.
pub const JOIN_GAP: f64 = 7.0;

/// Parallel rulings closer than this are collapsed into one.
pub const DEFAULT_MAX_DISTANCE: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Ruling {
    rect: Rect,
    orientation: Orientation,
    pub stroking_color: Option<String>,
}

impl Ruling {
    /// Creates a ruling, rejecting input that is neither horizontal
    /// (zero height) nor vertical (zero width).
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Result<Self> {
        let degenerate = || GridError::DegenerateRuling {
            top,
            left,
            width,
            height,
        };
        if ![top, left, width, height].iter().all(|v| v.is_finite()) {
            return Err(degenerate());
        }
        let orientation = match (width == 0.0, height == 0.0) {
            (false, true) => Orientation::Horizontal,
            (true, false) => Orientation::Vertical,
            _ => return Err(degenerate()),
        };
        Ok(Self {
            rect: Rect::new(top, left, width, height),
            orientation,
            stroking_color: None,
        })
    }

    /// A horizontal ruling at `top` spanning `left..right`.
    pub fn horizontal(top: f64, left: f64, right: f64) -> Result<Self> {
        Self::new(top, left, right - left, 0.0)
    }

    /// A vertical ruling at `left` spanning `top..bottom`.
    pub fn vertical(left: f64, top: f64, bottom: f64) -> Result<Self> {
        Self::new(top, left, 0.0, bottom - top)
    }

    pub fn with_stroking_color(mut self, color: impl Into<String>) -> Self {
        self.stroking_color = Some(color.into());
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    /// Position across the ruling's axis: `top` for horizontal rulings,
    /// `left` for vertical ones.
    pub fn offset(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.rect.top,
            Orientation::Vertical => self.rect.left,
        }
    }

    /// Start coordinate along the ruling's own axis.
    pub fn start(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.rect.left,
            Orientation::Vertical => self.rect.top,
        }
    }

    /// End coordinate along the ruling's own axis.
    pub fn end(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.right(),
            Orientation::Vertical => self.bottom(),
        }
    }

    pub fn length(&self) -> f64 {
        self.end() - self.start()
    }

    fn set_offset(&mut self, offset: f64) {
        match self.orientation {
            Orientation::Horizontal => self.rect.top = offset,
            Orientation::Vertical => self.rect.left = offset,
        }
    }

    fn set_span(&mut self, start: f64, end: f64) {
        match self.orientation {
            Orientation::Horizontal => {
                self.rect.left = start;
                self.rect.width = end - start;
            }
            Orientation::Vertical => {
                self.rect.top = start;
                self.rect.height = end - start;
            }
        }
    }

    /// Segment endpoints as (x0, y0, x1, y1).
    fn segment(&self) -> (f64, f64, f64, f64) {
        (self.left(), self.top(), self.right(), self.bottom())
    }

    /// Strict segment intersection.
    ///
    /// Solves for the parameters `r` (along `self`) and `s` (along
    /// `other`) and accepts only `0 <= r < 1` and `0 <= s < 1`. Parallel
    /// rulings never intersect.
    pub fn intersects(&self, other: &Ruling) -> bool {
        let (sx0, sy0, sx1, sy1) = self.segment();
        let (ox0, oy0, ox1, oy1) = other.segment();
        let denom = (sx1 - sx0) * (oy1 - oy0) - (sy1 - sy0) * (ox1 - ox0);
        if denom == 0.0 {
            return false;
        }
        let r = ((sy0 - oy0) * (ox1 - ox0) - (sx0 - ox0) * (oy1 - oy0)) / denom;
        let s = ((sy0 - oy0) * (sx1 - sx0) - (sx0 - ox0) * (sy1 - sy0)) / denom;
        (0.0..1.0).contains(&r) && (0.0..1.0).contains(&s)
    }

    /// Copy of this ruling extended by [`BLOOP_AMOUNT`] at both ends.
    pub fn bloop(&self) -> Ruling {
        let mut expanded = self.clone();
        expanded.set_span(self.start() - BLOOP_AMOUNT, self.end() + BLOOP_AMOUNT);
        expanded
    }

    /// Intersection test tolerant of segments that stop just short of
    /// each other.
    pub fn nearly_intersects(&self, other: &Ruling) -> bool {
        self.intersects(other) || self.bloop().intersects(&other.bloop())
    }
}

impl HasRect for Ruling {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

/// Consolidates rulings that were drawn as several pieces.
///
/// Horizontal and vertical rulings are cleaned separately: collinear
/// segments closer than [`JOIN_GAP`] are joined, then parallel rulings
/// whose offsets differ by less than `max_distance` collapse into one
/// ruling at their midpoint spanning both extents. Both steps repeat
/// until nothing changes, so cleaning an already clean set is a no-op.
/// The result lists horizontal rulings (by top, then left) followed by
/// vertical rulings (by left, then top).
pub fn clean_rulings(rulings: Vec<Ruling>, max_distance: f64) -> Vec<Ruling> {
    let input_len = rulings.len();
    let (horizontal, vertical): (Vec<Ruling>, Vec<Ruling>) =
        rulings.into_iter().partition(Ruling::is_horizontal);

    let mut cleaned = clean_parallel(horizontal, max_distance);
    cleaned.extend(clean_parallel(vertical, max_distance));
    debug!(
        input = input_len,
        output = cleaned.len(),
        "cleaned rulings"
    );
    cleaned
}

fn clean_parallel(mut rulings: Vec<Ruling>, max_distance: f64) -> Vec<Ruling> {
    loop {
        let next = clean_pass(&rulings, max_distance);
        if next == rulings {
            return next;
        }
        rulings = next;
    }
}

fn clean_pass(rulings: &[Ruling], max_distance: f64) -> Vec<Ruling> {
    let mut grouped: BTreeMap<OrderedFloat<f64>, Vec<Ruling>> = BTreeMap::new();
    for r in rulings {
        grouped
            .entry(OrderedFloat(r.offset()))
            .or_default()
            .push(r.clone());
    }

    let joined: Vec<(f64, Vec<Ruling>)> = grouped
        .into_iter()
        .map(|(offset, group)| (offset.into_inner(), join_collinear(group)))
        .collect();

    let mut out = Vec::with_capacity(rulings.len());
    let mut i = 0;
    while i < joined.len() {
        let (offset, group) = &joined[i];
        match joined.get(i + 1) {
            Some((next_offset, next_group)) if next_offset - offset < max_distance => {
                let mid = offset + (next_offset - offset) / 2.0;
                let members = || group.iter().chain(next_group);
                let start = members().map(Ruling::start).fold(f64::INFINITY, f64::min);
                let end = members().map(Ruling::end).fold(f64::NEG_INFINITY, f64::max);
                if let Some(first) = group.first() {
                    let mut spanning = first.clone();
                    spanning.set_offset(mid);
                    spanning.set_span(start, end);
                    out.push(spanning);
                }
                i += 2;
            }
            _ => {
                out.extend(group.iter().cloned());
                i += 1;
            }
        }
    }
    out
}

/// Joins runs of segments on one line whose gaps are below [`JOIN_GAP`].
fn join_collinear(mut group: Vec<Ruling>) -> Vec<Ruling> {
    group.sort_by(|a, b| {
        a.start()
            .total_cmp(&b.start())
            .then(a.end().total_cmp(&b.end()))
    });
    let mut joined: Vec<Ruling> = Vec::with_capacity(group.len());
    for r in group {
        match joined.last_mut() {
            Some(last) if r.start() - last.end() < JOIN_GAP => {
                if r.end() > last.end() {
                    let start = last.start();
                    last.set_span(start, r.end());
                }
            }
            _ => joined.push(r),
        }
    }
    joined
}
