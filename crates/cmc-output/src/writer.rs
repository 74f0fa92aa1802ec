//! Cluster file writer.

use std::path::Path;

use cmc_core::{ScalingParams, scale_to_nbody_units};
use cmc_model::{BinariesTable, SinglesTable};
use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::error::{OutputError, Result};
use crate::format::FileKind;
use crate::layout::{ClusterHeader, OBJ_EXTNAME, pad_binaries, pad_singles};
use crate::options::WriteOverrides;

/// Virial radius used when neither the overrides nor the table record one.
const DEFAULT_VIRIAL_RADIUS: f64 = 1.0;

/// Write a cluster file, scaling the tables to N-body units first if needed.
///
/// The format follows the file extension. All checks run before the tables
/// or the file are touched:
///
/// 1. the extension is `fits`, `hdf5` or `h5`;
/// 2. a metallicity is known;
/// 3. tables already in N-body units record the physical cluster mass;
/// 4. HDF5 support is compiled in when writing HDF5.
///
/// Unscaled tables without a recorded cluster mass get
/// `mass_of_cluster = sum(m) + central_bh` before scaling.
pub fn write_cluster(
    singles: &mut SinglesTable,
    binaries: &mut BinariesTable,
    path: &Path,
    overrides: &WriteOverrides,
) -> Result<()> {
    let kind = FileKind::from_path(path)?;
    let meta = &singles.meta;
    let metallicity = overrides
        .metallicity
        .or(meta.metallicity)
        .ok_or(OutputError::MissingMetallicity)?;
    if meta.scaled_to_nbody_units && meta.mass_of_cluster.is_none() {
        return Err(OutputError::ScaledWithoutClusterMass);
    }
    kind.ensure_available()?;

    let virial_radius = overrides
        .virial_radius
        .or(meta.virial_radius)
        .unwrap_or_else(|| {
            warn!(
                virial_radius = DEFAULT_VIRIAL_RADIUS,
                "virial radius not set, using the default"
            );
            DEFAULT_VIRIAL_RADIUS
        });
    let tidal_radius = overrides.tidal_radius.or(meta.tidal_radius);

    if !singles.meta.scaled_to_nbody_units {
        let params = ScalingParams {
            virial_radius,
            central_bh: overrides.central_bh.unwrap_or(singles.meta.central_bh),
            scale_with_central_bh: overrides
                .scale_with_central_bh
                .unwrap_or(singles.meta.scale_with_central_bh),
        };
        if singles.meta.mass_of_cluster.is_none() {
            let total = singles.total_mass()? + params.central_bh;
            singles.meta.mass_of_cluster = Some(total);
        }
        scale_to_nbody_units(singles, binaries, &params)?;
    }

    singles.meta.metallicity = Some(metallicity);
    singles.meta.virial_radius = Some(virial_radius);
    singles.meta.tidal_radius = tidal_radius;

    let header = ClusterHeader {
        extname: OBJ_EXTNAME.to_string(),
        nobj: singles.height(),
        nbinary: binaries.height(),
        mass_of_cluster: singles
            .meta
            .mass_of_cluster
            .ok_or(OutputError::ScaledWithoutClusterMass)?,
        virial_radius,
        tidal_radius,
        metallicity,
    };
    let padded_singles = pad_singles(singles)?;
    let padded_binaries = pad_binaries(binaries)?;

    write_tables(kind, path, &padded_singles, &padded_binaries, &header)?;
    info!(
        path = %path.display(),
        format = %kind,
        singles = header.nobj,
        binaries = header.nbinary,
        "wrote cluster file"
    );
    Ok(())
}

fn write_tables(
    kind: FileKind,
    path: &Path,
    singles: &DataFrame,
    binaries: &DataFrame,
    header: &ClusterHeader,
) -> Result<()> {
    match kind {
        FileKind::Fits => crate::fits::write_tables(path, singles, binaries, header),
        #[cfg(feature = "hdf5")]
        FileKind::Hdf5 => crate::h5::write_tables(path, singles, binaries, header),
        #[cfg(not(feature = "hdf5"))]
        FileKind::Hdf5 => Err(OutputError::Hdf5Unavailable),
    }
}
