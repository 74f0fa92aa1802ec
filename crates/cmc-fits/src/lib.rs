//! FITS reader and writer for binary tables.
//!
//! Covers the subset of FITS used by cluster initial-condition files: an
//! empty primary HDU carrying comment cards, followed by BINTABLE extensions
//! with scalar integer and floating point columns.
//!
//! # Features
//!
//! - Fixed-format header cards (logical, integer, float, string, undefined)
//! - Big-endian column data in 2880-byte blocks
//! - Reads `B`, `I`, `J`, `K`, `E` and `D` columns; writes any of them
//! - Optional Polars DataFrame integration (with `polars` feature)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cmc_fits::{BinTable, Card, FitsColumn, FitsFile, read_fits, write_fits};
//!
//! let mut table = BinTable::with_columns(
//!     "CLUS_OBJ_DATA",
//!     vec![
//!         FitsColumn::int64("id", vec![1, 2]),
//!         FitsColumn::float64("m", vec![0.5, 0.5]),
//!     ],
//! );
//! table.header.set("NOBJ", 2_i64);
//!
//! let mut file = FitsFile::new();
//! file.primary.push(Card::comment("example"));
//! file.add_table(table);
//! write_fits(Path::new("cluster.fits"), &file).unwrap();
//!
//! let back = read_fits(Path::new("cluster.fits")).unwrap();
//! assert_eq!(back.tables[0].num_rows(), 2);
//! ```

mod error;
pub mod header;
mod reader;
mod types;
mod writer;

#[cfg(feature = "polars")]
mod polars_ext;

pub use error::{FitsError, Result};

pub use header::{Card, CardValue, Header};

pub use types::{BinTable, ColumnData, ColumnFormat, FitsColumn, FitsFile, FitsWriterOptions};

pub use reader::{FitsReader, parse_fits_data, read_fits};

pub use writer::{FitsWriter, write_fits, write_fits_with_options};

#[cfg(feature = "polars")]
pub use polars_ext::{dataframe_to_table, table_to_dataframe};
