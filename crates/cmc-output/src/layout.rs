//! On-disk table layout.
//!
//! The simulator expects each singles block to be framed by two all-zero
//! sentinel rows: the first sits at `r = f64::MIN_POSITIVE` and carries the
//! central black hole mass, the last sits at `r = 1e40`. The binaries block
//! starts with one all-zero row so `binind` can index it from 1.

use cmc_model::columns::{ColumnKind, ID1, ID2, M, R};
use cmc_model::frame::{f64_values, frame_from_columns, i64_values};
use cmc_model::{
    BINARIES_SCHEMA, BinariesTable, ClusterMeta, ColumnSpec, SINGLES_SCHEMA, SinglesTable,
};
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};

use crate::error::{OutputError, Result};

/// Name of the singles table.
pub const OBJ_EXTNAME: &str = "CLUS_OBJ_DATA";
/// Name of the binaries table.
pub const BINARY_EXTNAME: &str = "CLUS_BINARY_DATA";

/// Radius of the leading singles sentinel.
pub const INNER_SENTINEL_RADIUS: f64 = f64::MIN_POSITIVE;
/// Radius of the trailing singles sentinel.
pub const OUTER_SENTINEL_RADIUS: f64 = 1e40;

pub const KEY_EXTNAME: &str = "EXTNAME";
pub const KEY_NOBJ: &str = "NOBJ";
pub const KEY_NBINARY: &str = "NBINARY";
pub const KEY_MCLUS: &str = "MCLUS";
pub const KEY_RVIR: &str = "RVIR";
pub const KEY_RTID: &str = "RTID";
pub const KEY_Z: &str = "Z";

/// Header attributes stored with the singles table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterHeader {
    pub extname: String,
    /// Real singles, sentinels excluded.
    pub nobj: usize,
    /// Real binaries, sentinel excluded.
    pub nbinary: usize,
    /// Total physical mass in solar masses.
    pub mass_of_cluster: f64,
    /// Virial radius in parsecs.
    pub virial_radius: f64,
    /// Tidal radius in parsecs, if known.
    pub tidal_radius: Option<f64>,
    pub metallicity: f64,
}

impl ClusterHeader {
    /// Metadata of a table read back from disk.
    ///
    /// Stored tables are always in N-body units; `central_bh` comes from the
    /// leading sentinel row.
    #[must_use]
    pub fn to_meta(&self, central_bh: f64) -> ClusterMeta {
        ClusterMeta {
            scaled_to_nbody_units: true,
            metallicity: Some(self.metallicity),
            mass_of_cluster: Some(self.mass_of_cluster),
            virial_radius: Some(self.virial_radius),
            tidal_radius: self.tidal_radius,
            central_bh,
            scale_with_central_bh: false,
        }
    }
}

/// One sentinel row for `schema`, zero except for the given float columns.
fn sentinel_row(schema: &[ColumnSpec], values: &[(&str, f64)]) -> Result<DataFrame> {
    let columns = schema
        .iter()
        .map(|spec| {
            let name = spec.name.into();
            match spec.kind {
                ColumnKind::Int => Column::new(name, [0_i64]),
                ColumnKind::Float => {
                    let value = values
                        .iter()
                        .find(|(column, _)| *column == spec.name)
                        .map_or(0.0, |(_, value)| *value);
                    Column::new(name, [value])
                }
            }
        })
        .collect();
    Ok(frame_from_columns(columns)?)
}

/// Singles frame framed by its two sentinel rows.
pub fn pad_singles(singles: &SinglesTable) -> Result<DataFrame> {
    let mut padded = sentinel_row(
        SINGLES_SCHEMA,
        &[(M, singles.meta.central_bh), (R, INNER_SENTINEL_RADIUS)],
    )?;
    padded.vstack_mut(&singles.data)?;
    padded.vstack_mut(&sentinel_row(SINGLES_SCHEMA, &[(R, OUTER_SENTINEL_RADIUS)])?)?;
    Ok(padded)
}

/// Binaries frame with its leading sentinel row.
pub fn pad_binaries(binaries: &BinariesTable) -> Result<DataFrame> {
    let mut padded = sentinel_row(BINARIES_SCHEMA, &[])?;
    padded.vstack_mut(&binaries.data)?;
    Ok(padded)
}

/// Check the sentinel framing of tables read from disk.
pub(crate) fn check_layout(singles: &DataFrame, binaries: &DataFrame) -> Result<()> {
    let height = singles.height();
    if height < 2 {
        return Err(OutputError::invalid_layout(format!(
            "{OBJ_EXTNAME} has {height} rows, expected at least the two sentinel rows"
        )));
    }
    let r = f64_values(singles, R)?;
    if r[0] != INNER_SENTINEL_RADIUS {
        return Err(OutputError::invalid_layout(format!(
            "first {OBJ_EXTNAME} row has r = {}, expected the inner sentinel",
            r[0]
        )));
    }
    if r[height - 1] != OUTER_SENTINEL_RADIUS {
        return Err(OutputError::invalid_layout(format!(
            "last {OBJ_EXTNAME} row has r = {}, expected {OUTER_SENTINEL_RADIUS:e}",
            r[height - 1]
        )));
    }

    if binaries.height() == 0 {
        return Err(OutputError::invalid_layout(format!(
            "{BINARY_EXTNAME} is missing its sentinel row"
        )));
    }
    let id1 = i64_values(binaries, ID1)?;
    let id2 = i64_values(binaries, ID2)?;
    if id1[0] != 0 || id2[0] != 0 {
        return Err(OutputError::invalid_layout(format!(
            "first {BINARY_EXTNAME} row is not a sentinel"
        )));
    }
    Ok(())
}

/// Remove the sentinel rows, keeping metadata.
///
/// The result can be scaled or written again.
pub fn strip_sentinels(
    singles: &SinglesTable,
    binaries: &BinariesTable,
) -> Result<(SinglesTable, BinariesTable)> {
    check_layout(&singles.data, &binaries.data)?;
    let singles_rows = singles.height() - 2;
    let binary_rows = binaries.height() - 1;

    let stripped_singles = SinglesTable {
        data: singles.data.slice(1, singles_rows),
        meta: singles.meta.clone(),
    };
    let stripped_binaries = BinariesTable {
        data: binaries.data.slice(1, binary_rows),
        scaled_to_nbody_units: binaries.scaled_to_nbody_units,
    };
    Ok((stripped_singles, stripped_binaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmc_model::SinglesArrays;

    fn singles() -> SinglesTable {
        let mut table = SinglesTable::from_arrays(SinglesArrays {
            id: vec![1, 2],
            k: vec![1, 1],
            m: vec![0.5, 0.5],
            reff: vec![0.0, 0.0],
            r: vec![0.5, 1.0],
            vr: vec![0.1, 0.1],
            vt: vec![0.1, 0.1],
            binind: vec![0, 0],
        })
        .unwrap();
        table.meta.central_bh = 0.25;
        table
    }

    #[test]
    fn singles_sentinels() {
        let padded = pad_singles(&singles()).unwrap();
        assert_eq!(padded.height(), 4);
        let r = f64_values(&padded, R).unwrap();
        assert_eq!(r, vec![f64::MIN_POSITIVE, 0.5, 1.0, 1e40]);
        let m = f64_values(&padded, M).unwrap();
        assert_eq!(m, vec![0.25, 0.5, 0.5, 0.0]);
        assert_eq!(i64_values(&padded, "id").unwrap(), vec![0, 1, 2, 0]);
    }

    #[test]
    fn binaries_sentinel() {
        let padded = pad_binaries(&BinariesTable::empty().unwrap()).unwrap();
        assert_eq!(padded.height(), 1);
        assert_eq!(f64_values(&padded, "a").unwrap(), vec![0.0]);
    }

    #[test]
    fn strip_roundtrip() {
        let table = singles();
        let padded = SinglesTable::from_frame(&pad_singles(&table).unwrap(), table.meta.clone())
            .unwrap();
        let binaries = BinariesTable::from_frame(
            &pad_binaries(&BinariesTable::empty().unwrap()).unwrap(),
            true,
        )
        .unwrap();

        let (s, b) = strip_sentinels(&padded, &binaries).unwrap();
        assert!(s.data.equals(&table.data));
        assert!(b.is_empty());
        assert!(b.scaled_to_nbody_units);
        assert_eq!(s.meta.central_bh, 0.25);
    }

    #[test]
    fn strip_rejects_unpadded() {
        let table = singles();
        let binaries = BinariesTable::empty().unwrap();
        assert!(matches!(
            strip_sentinels(&table, &binaries),
            Err(OutputError::InvalidLayout { .. })
        ));
    }
}
