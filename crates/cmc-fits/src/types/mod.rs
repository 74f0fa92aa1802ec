//! Core types for FITS file handling.
//!
//! This module provides the data structures for representing FITS files,
//! binary tables, columns, and writer options.

mod column;
mod options;
mod table;

pub use column::{ColumnData, ColumnFormat, FitsColumn};
pub use options::FitsWriterOptions;
pub use table::{BinTable, FitsFile};
