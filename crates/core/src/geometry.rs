//! Axis-aligned rectangle primitive shared by every layout entity.
//!
//! Coordinates use a top-left origin: `y` grows downward, so `bottom` is
//! always numerically greater than or equal to `top`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D point (x, y).
pub type Point = (f64, f64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Axis-aligned rectangle stored as origin plus extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle, normalizing negative extents so that
    /// `width >= 0` and `height >= 0`.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        let (left, width) = if width < 0.0 {
            (left + width, -width)
        } else {
            (left, width)
        };
        let (top, height) = if height < 0.0 {
            (top + height, -height)
        } else {
            (top, height)
        };
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Creates a rectangle from its four edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(top, left, right - left, bottom - top)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> Point {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Returns the smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect {
            top,
            left,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Grows `self` in place to cover `other`.
    ///
    /// All four edges are read before any field is written.
    pub fn merge(&mut self, other: &Rect) {
        *self = self.union(other);
    }

    /// Half-open containment: the left and top edges belong to the
    /// rectangle, the right and bottom edges do not.
    pub fn contains_point(&self, (x, y): Point) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Returns true if `other` lies entirely within `self` (edges inclusive).
    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right() <= self.right()
            && other.top >= self.top
            && other.bottom() <= self.bottom()
    }
}

/// Capability trait for entities that have a bounding rectangle.
///
/// Overlap and distance queries are provided on top of [`HasRect::rect`],
/// so any two entities can be compared regardless of their concrete type.
pub trait HasRect {
    fn rect(&self) -> &Rect;

    fn top(&self) -> f64 {
        self.rect().top
    }

    fn left(&self) -> f64 {
        self.rect().left
    }

    fn width(&self) -> f64 {
        self.rect().width
    }

    fn height(&self) -> f64 {
        self.rect().height
    }

    fn right(&self) -> f64 {
        self.rect().left + self.rect().width
    }

    fn bottom(&self) -> f64 {
        self.rect().top + self.rect().height
    }

    /// True if the `[left, right)` intervals intersect.
    fn overlaps_horizontally<R: HasRect + ?Sized>(&self, other: &R) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    /// True if the `[top, bottom)` intervals intersect.
    fn overlaps_vertically<R: HasRect + ?Sized>(&self, other: &R) -> bool {
        self.top() < other.bottom() && other.top() < self.bottom()
    }

    /// Length of the shared horizontal extent, zero when disjoint.
    fn horizontal_overlap<R: HasRect + ?Sized>(&self, other: &R) -> f64 {
        (self.right().min(other.right()) - self.left().max(other.left())).max(0.0)
    }

    /// Length of the shared vertical extent, zero when disjoint.
    fn vertical_overlap<R: HasRect + ?Sized>(&self, other: &R) -> f64 {
        (self.bottom().min(other.bottom()) - self.top().max(other.top())).max(0.0)
    }

    /// Horizontal overlap relative to the narrower of the two widths.
    fn horizontal_overlap_ratio<R: HasRect + ?Sized>(&self, other: &R) -> f64 {
        let base = self.width().min(other.width());
        if base <= 0.0 {
            return 0.0;
        }
        self.horizontal_overlap(other) / base
    }

    /// Vertical overlap relative to the shorter of the two heights.
    ///
    /// This is the "same text line" signal used when grouping fragments
    /// into rows.
    fn vertical_overlap_ratio<R: HasRect + ?Sized>(&self, other: &R) -> f64 {
        let base = self.height().min(other.height());
        if base <= 0.0 {
            return 0.0;
        }
        self.vertical_overlap(other) / base
    }

    /// Signed gap between the boxes along x: positive when they are
    /// apart, negative when they overlap. Symmetric in its arguments.
    fn horizontal_distance<R: HasRect + ?Sized>(&self, other: &R) -> f64 {
        self.left().max(other.left()) - self.right().min(other.right())
    }
}

impl HasRect for Rect {
    fn rect(&self) -> &Rect {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_negative_extent() {
        let r = Rect::new(10.0, 20.0, -5.0, -4.0);
        assert_eq!(r, Rect::new(6.0, 15.0, 5.0, 4.0));
    }

    #[test]
    fn test_union_grows_only() {
        let a = Rect::new(10.0, 10.0, 10.0, 10.0);
        let b = Rect::new(5.0, 15.0, 20.0, 2.0);
        let u = a.union(&b);
        assert_eq!(u.left, 10.0);
        assert_eq!(u.top, 5.0);
        assert_eq!(u.right(), 35.0);
        assert_eq!(u.bottom(), 20.0);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
    }

    #[test]
    fn test_merge_matches_union_regardless_of_order() {
        let a = Rect::new(0.0, 50.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        let mut ab = a;
        ab.merge(&b);
        let mut ba = b;
        ba.merge(&a);
        assert_eq!(ab, ba);
        assert_eq!(ab, Rect::from_edges(0.0, 0.0, 60.0, 30.0));
    }

    #[test]
    fn test_touching_is_not_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps_horizontally(&b));
        assert!(a.overlaps_vertically(&b));
        assert_eq!(a.horizontal_distance(&b), 0.0);
    }

    #[test]
    fn test_overlap_ratios() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 8.0, 4.0, 20.0);
        assert_eq!(a.horizontal_overlap_ratio(&b), 0.5);
        assert_eq!(a.vertical_overlap_ratio(&b), 0.5);
        let flat = Rect::new(0.0, 0.0, 10.0, 0.0);
        assert_eq!(a.vertical_overlap_ratio(&flat), 0.0);
    }

    #[test]
    fn test_horizontal_distance_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 8.0, 10.0);
        let b = Rect::new(0.0, 10.0, 8.0, 10.0);
        assert_eq!(a.horizontal_distance(&b), 2.0);
        assert_eq!(b.horizontal_distance(&a), 2.0);
        let c = Rect::new(0.0, 4.0, 8.0, 10.0);
        assert_eq!(a.horizontal_distance(&c), -4.0);
    }

    #[test]
    fn test_contains_point_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point((0.0, 0.0)));
        assert!(r.contains_point((9.99, 5.0)));
        assert!(!r.contains_point((10.0, 5.0)));
        assert!(!Rect::new(5.0, 5.0, 0.0, 0.0).contains_point((5.0, 5.0)));
    }
}
