//! Read-only container for one page's text fragments.

use crate::error::{GridError, Result};
use crate::geometry::{HasRect, Rect};
use crate::text::TextFragment;

/// Page numbering base.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Indexing {
    #[default]
    One,
    Zero,
}

/// An area of a page given as its four edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Area {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

#[derive(Clone, Debug)]
pub struct Page {
    rect: Rect,
    rotation: i32,
    number: usize,
    fragments: Vec<TextFragment>,
}

impl Page {
    /// Creates a page. `number` is one-indexed; zero is rejected.
    pub fn new(
        width: f64,
        height: f64,
        rotation: i32,
        number: usize,
        fragments: Vec<TextFragment>,
    ) -> Result<Self> {
        if number < 1 {
            return Err(GridError::InvalidPageNumber(number));
        }
        Ok(Self {
            rect: Rect::new(0.0, 0.0, width, height),
            rotation,
            number,
            fragments,
        })
    }

    pub fn number(&self, indexing: Indexing) -> usize {
        match indexing {
            Indexing::One => self.number,
            Indexing::Zero => self.number - 1,
        }
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    /// Fragments lying strictly inside `area`, or the whole page when no
    /// area is given.
    pub fn fragments_in(&self, area: Option<Area>) -> Vec<&TextFragment> {
        let area = area.unwrap_or(Area {
            top: 0.0,
            left: 0.0,
            bottom: self.height(),
            right: self.width(),
        });
        self.fragments
            .iter()
            .filter(|f| {
                f.top() > area.top
                    && f.bottom() < area.bottom
                    && f.left() > area.left
                    && f.right() < area.right
            })
            .collect()
    }
}

impl HasRect for Page {
    fn rect(&self) -> &Rect {
        &self.rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(top: f64, left: f64, text: &str) -> TextFragment {
        TextFragment::new(top, left, 10.0, 10.0, None, 10.0, text, 3.0)
    }

    #[test]
    fn test_page_numbers_are_one_indexed() {
        assert!(matches!(
            Page::new(100.0, 100.0, 0, 0, Vec::new()),
            Err(GridError::InvalidPageNumber(0))
        ));
        let page = Page::new(100.0, 100.0, 0, 3, Vec::new()).unwrap();
        assert_eq!(page.number(Indexing::One), 3);
        assert_eq!(page.number(Indexing::Zero), 2);
    }

    #[test]
    fn test_fragments_in_area() {
        let page = Page::new(
            200.0,
            200.0,
            0,
            1,
            vec![frag(10.0, 10.0, "in"), frag(150.0, 150.0, "out")],
        )
        .unwrap();
        let area = Area {
            top: 0.0,
            left: 0.0,
            bottom: 100.0,
            right: 100.0,
        };
        let found: Vec<&str> = page
            .fragments_in(Some(area))
            .iter()
            .map(|f| f.text.as_str())
            .collect();
        assert_eq!(found, vec!["in"]);
        assert_eq!(page.fragments_in(None).len(), 2);
    }
}
