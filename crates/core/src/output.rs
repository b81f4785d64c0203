//! Text-grid rendering shared by every table type.

use crate::error::Result;

/// A table that can be rendered as a grid of cell strings.
pub trait Tabular {
    /// Cell text, row by row.
    fn to_rows(&self) -> Vec<Vec<String>>;

    fn to_csv(&self) -> Result<String> {
        write_delimited(&self.to_rows(), b',')
    }

    fn to_tsv(&self) -> Result<String> {
        write_delimited(&self.to_rows(), b'\t')
    }
}

/// Writes rows as delimited text with CRLF row terminators. Rows may
/// have different lengths.
pub fn write_delimited(rows: &[Vec<String>], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
