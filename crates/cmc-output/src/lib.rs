//! Cluster initial-condition files.
//!
//! Writes and reads the singles/binaries table pair in the layout the
//! simulator expects, as FITS (always available) or HDF5 (with the `hdf5`
//! feature). The format follows the file extension.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use cmc_model::{BinariesTable, SinglesTable};
//! use cmc_output::{WriteOverrides, read_cluster, strip_sentinels, write_cluster};
//!
//! # fn tables() -> (SinglesTable, BinariesTable) { unimplemented!() }
//! let (mut singles, mut binaries) = tables();
//! let overrides = WriteOverrides::new().with_metallicity(0.02);
//! write_cluster(&mut singles, &mut binaries, Path::new("ic.fits"), &overrides).unwrap();
//!
//! let (stored, stored_binaries) = read_cluster(Path::new("ic.fits")).unwrap();
//! let (singles, binaries) = strip_sentinels(&stored, &stored_binaries).unwrap();
//! ```

pub mod error;
mod fits;
pub mod format;
#[cfg(feature = "hdf5")]
mod h5;
pub mod layout;
pub mod options;
mod reader;
mod writer;

pub use error::{OutputError, Result};
pub use format::FileKind;
pub use layout::{ClusterHeader, strip_sentinels};
pub use options::WriteOverrides;
pub use reader::{ClusterFile, ClusterFileSummary, read_cluster, read_cluster_file};
pub use writer::write_cluster;
