//! Error types for FITS file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing FITS files.
#[derive(Debug, Error)]
pub enum FitsError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Invalid FITS file structure.
    #[error("invalid FITS file: {message}")]
    InvalidFormat { message: String },

    /// A header card could not be parsed.
    #[error("invalid header card {index}: {message}")]
    InvalidCard { index: usize, message: String },

    /// Required keyword missing from a header.
    #[error("missing keyword: {keyword}")]
    MissingKeyword { keyword: String },

    /// Header ran past the end of the data without an END card.
    #[error("header at offset {offset} has no END card")]
    MissingEnd { offset: usize },

    /// Column format (TFORM) not supported by this codec.
    #[error("unsupported column format: {tform}")]
    UnsupportedFormat { tform: String },

    /// Keyword is empty, too long or contains invalid characters.
    #[error("invalid keyword: '{keyword}'")]
    InvalidKeyword { keyword: String },

    /// Keyword is managed by the writer and cannot be set by callers.
    #[error("keyword {keyword} is reserved for the table structure")]
    ReservedKeyword { keyword: String },

    /// Header value does not fit in a single card.
    #[error("value of {keyword} does not fit in one card")]
    ValueTooLong { keyword: String },

    /// Invalid column name (empty).
    #[error("column name must not be empty")]
    InvalidColumnName { name: String },

    /// Duplicate column name.
    #[error("duplicate column name: {name}")]
    DuplicateColumn { name: String },

    /// Columns of one table have different lengths.
    #[error("column {column} has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Column data does not match its declared format.
    #[error("column {column} data does not match format {format}")]
    FormatMismatch { column: String, format: char },

    /// Integer value does not fit the declared column width.
    #[error("value {value} does not fit column {column}")]
    ValueOutOfRange { column: String, value: i64 },

    /// Read past the end of the data.
    #[error("data out of bounds at offset {offset}")]
    OutOfBounds { offset: usize },

    /// Polars conversion error.
    #[cfg(feature = "polars")]
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Polars column type with no FITS counterpart.
    #[cfg(feature = "polars")]
    #[error("column {column} has unsupported dtype {dtype}")]
    UnsupportedDtype { column: String, dtype: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for FITS operations.
pub type Result<T> = std::result::Result<T, FitsError>;

impl FitsError {
    /// Create an InvalidFormat error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Create an InvalidCard error.
    pub fn invalid_card(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidCard {
            index,
            message: message.into(),
        }
    }

    /// Create a MissingKeyword error.
    pub fn missing_keyword(keyword: impl Into<String>) -> Self {
        Self::MissingKeyword {
            keyword: keyword.into(),
        }
    }

    /// Create an InvalidKeyword error.
    pub fn invalid_keyword(keyword: impl Into<String>) -> Self {
        Self::InvalidKeyword {
            keyword: keyword.into(),
        }
    }

    /// Create a DuplicateColumn error.
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::DuplicateColumn { name: name.into() }
    }
}
