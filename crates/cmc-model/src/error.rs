use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("column {column} has {actual} values, expected {expected}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("column {column} row {row}: {value} is not a stellar type (0-14)")]
    InvalidStellarType {
        column: &'static str,
        row: usize,
        value: i64,
    },
    #[error("binind row {row}: {value} is negative")]
    NegativeBinaryIndex { row: usize, value: i64 },
    #[error("duplicate id {id}")]
    DuplicateId { id: i64 },
    #[error("missing column {name}")]
    MissingColumn { name: String },
    #[error("column {column} contains null values")]
    NullValues { column: String },
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, ModelError>;
