//! Error types for gridline table reconstruction.

use thiserror::Error;

/// Primary error type for table reconstruction.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("page numbers are one-indexed; {0} is invalid")]
    InvalidPageNumber(usize),

    #[error(
        "ruling at top={top}, left={left} with size {width}x{height} is neither horizontal nor vertical"
    )]
    DegenerateRuling {
        top: f64,
        left: f64,
        width: f64,
        height: f64,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("delimited output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Convenience Result type alias for GridError.
pub type Result<T> = std::result::Result<T, GridError>;
