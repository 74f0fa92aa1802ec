//! Cluster file reader.

use std::path::Path;

use cmc_model::columns::M;
use cmc_model::{BinariesTable, SinglesTable};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::format::FileKind;
use crate::layout::ClusterHeader;

/// Tables read from a cluster file, sentinel rows included.
#[derive(Debug, Clone)]
pub struct ClusterFile {
    pub singles: SinglesTable,
    pub binaries: BinariesTable,
    pub header: ClusterHeader,
}

/// Header plus row counts, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterFileSummary<'a> {
    pub header: &'a ClusterHeader,
    pub central_bh: f64,
    pub stored_singles_rows: usize,
    pub stored_binary_rows: usize,
}

impl ClusterFile {
    #[must_use]
    pub fn summary(&self) -> ClusterFileSummary<'_> {
        ClusterFileSummary {
            header: &self.header,
            central_bh: self.singles.meta.central_bh,
            stored_singles_rows: self.singles.height(),
            stored_binary_rows: self.binaries.height(),
        }
    }
}

/// Read a cluster file with its header.
///
/// Singles metadata is restored from the header; the central black hole mass
/// comes from the first (sentinel) row.
pub fn read_cluster_file(path: &Path) -> Result<ClusterFile> {
    let kind = FileKind::from_path(path)?;
    kind.ensure_available()?;
    let (singles, binaries, header) = read_tables(kind, path)?;

    let central_bh = cmc_model::frame::f64_values(&singles, M)?
        .first()
        .copied()
        .unwrap_or(0.0);
    let singles = SinglesTable::from_frame(&singles, header.to_meta(central_bh))?;
    let binaries = BinariesTable::from_frame(&binaries, true)?;

    if singles.height() != header.nobj + 2 || binaries.height() != header.nbinary + 1 {
        warn!(
            nobj = header.nobj,
            nbinary = header.nbinary,
            singles_rows = singles.height(),
            binary_rows = binaries.height(),
            "row counts do not match the header"
        );
    }
    info!(
        path = %path.display(),
        format = %kind,
        singles = singles.height(),
        binaries = binaries.height(),
        "read cluster file"
    );

    Ok(ClusterFile {
        singles,
        binaries,
        header,
    })
}

/// Read a cluster file as stored, sentinel rows included.
pub fn read_cluster(path: &Path) -> Result<(SinglesTable, BinariesTable)> {
    let file = read_cluster_file(path)?;
    Ok((file.singles, file.binaries))
}

fn read_tables(kind: FileKind, path: &Path) -> Result<(DataFrame, DataFrame, ClusterHeader)> {
    match kind {
        FileKind::Fits => crate::fits::read_tables(path),
        #[cfg(feature = "hdf5")]
        FileKind::Hdf5 => crate::h5::read_tables(path),
        #[cfg(not(feature = "hdf5"))]
        FileKind::Hdf5 => Err(crate::error::OutputError::Hdf5Unavailable),
    }
}
