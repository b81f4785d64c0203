//! gridline - table reconstruction from positioned text and ruling lines.
//!
//! The input is one page region: text fragments with their boxes and font
//! metrics, plus the straight ruling segments drawn on it. Fragments are
//! merged into words, then arranged into rows and columns either by the
//! whitespace between them or by the grid the rulings form.

pub mod error;
pub mod extractor;
pub mod geometry;
pub mod output;
pub mod page;
pub mod ruling;
pub mod settings;
pub mod spreadsheet;
pub mod table;
pub mod text;
pub mod zone;

pub use error::{GridError, Result};
pub use extractor::{ColumnBoundary, Extracted, RowBoundary, TableExtractor, merge_words};
pub use geometry::{HasRect, Orientation, Point, Rect};
pub use output::Tabular;
pub use page::{Area, Indexing, Page};
pub use ruling::{Ruling, clean_rulings};
pub use settings::ExtractionSettings;
pub use spreadsheet::{Cell, Spreadsheet};
pub use table::{RuledTable, Table, make_table};
pub use text::TextFragment;
pub use zone::{Boundary, Column, Line};
