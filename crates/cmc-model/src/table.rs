//! Singles and binaries tables.
//!
//! Each table wraps a polars [`DataFrame`] with a fixed schema (see
//! [`crate::columns`]) plus its metadata. The singles table owns the
//! [`ClusterMeta`]; the binaries table only tracks its unit system, which is
//! kept in lock-step with the paired singles table.

use std::collections::HashSet;

use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::columns::{self, BINARIES_SCHEMA, SINGLES_SCHEMA};
use crate::error::{ModelError, Result};
use crate::frame::{conform_to_schema, f64_values, frame_from_columns, i64_values, max_i64};
use crate::meta::ClusterMeta;
use crate::stellar::check_codes;

/// Parallel arrays for a singles table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinglesArrays {
    pub id: Vec<i64>,
    pub k: Vec<i64>,
    pub m: Vec<f64>,
    pub reff: Vec<f64>,
    pub r: Vec<f64>,
    pub vr: Vec<f64>,
    pub vt: Vec<f64>,
    /// 1-based index into the binaries table, 0 for unpaired stars.
    pub binind: Vec<i64>,
}

/// Parallel arrays for a binaries table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinariesArrays {
    pub index: Vec<i64>,
    pub id1: Vec<i64>,
    pub k1: Vec<i64>,
    pub m1: Vec<f64>,
    pub reff1: Vec<f64>,
    pub id2: Vec<i64>,
    pub k2: Vec<i64>,
    pub m2: Vec<f64>,
    pub reff2: Vec<f64>,
    pub a: Vec<f64>,
    pub e: Vec<f64>,
}

fn check_len(column: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ModelError::LengthMismatch {
            column,
            expected,
            actual,
        })
    }
}

/// Single stars of a cluster.
#[derive(Debug, Clone)]
pub struct SinglesTable {
    /// Table contents in schema order.
    pub data: DataFrame,
    pub meta: ClusterMeta,
}

impl SinglesTable {
    /// Build a table from parallel arrays.
    ///
    /// Checks that all arrays have the same length, stellar types are 0-14,
    /// `binind` is non-negative and ids are unique.
    pub fn from_arrays(arrays: SinglesArrays) -> Result<Self> {
        let n = arrays.id.len();
        check_len(columns::K, n, arrays.k.len())?;
        check_len(columns::M, n, arrays.m.len())?;
        check_len(columns::REFF, n, arrays.reff.len())?;
        check_len(columns::R, n, arrays.r.len())?;
        check_len(columns::VR, n, arrays.vr.len())?;
        check_len(columns::VT, n, arrays.vt.len())?;
        check_len(columns::BININD, n, arrays.binind.len())?;

        check_codes(columns::K, &arrays.k)?;
        if let Some((row, value)) = arrays.binind.iter().enumerate().find(|(_, b)| **b < 0) {
            return Err(ModelError::NegativeBinaryIndex { row, value: *value });
        }
        let mut seen = HashSet::with_capacity(n);
        if let Some(id) = arrays.id.iter().find(|id| !seen.insert(**id)) {
            return Err(ModelError::DuplicateId { id: *id });
        }

        let data = frame_from_columns(vec![
            Column::new(columns::ID.into(), arrays.id),
            Column::new(columns::K.into(), arrays.k),
            Column::new(columns::M.into(), arrays.m),
            Column::new(columns::REFF.into(), arrays.reff),
            Column::new(columns::R.into(), arrays.r),
            Column::new(columns::VR.into(), arrays.vr),
            Column::new(columns::VT.into(), arrays.vt),
            Column::new(columns::BININD.into(), arrays.binind),
        ])?;
        debug!(rows = n, "built singles table");

        Ok(Self {
            data,
            meta: ClusterMeta::default(),
        })
    }

    /// Adopt an existing frame, casting schema columns and rejecting nulls.
    ///
    /// No range checks: frames read from disk carry sentinel rows.
    pub fn from_frame(df: &DataFrame, meta: ClusterMeta) -> Result<Self> {
        Ok(Self {
            data: conform_to_schema(df, SINGLES_SCHEMA)?,
            meta,
        })
    }

    /// An empty table with default metadata.
    pub fn empty() -> Result<Self> {
        Self::from_arrays(SinglesArrays::default())
    }

    #[must_use]
    pub fn with_meta(mut self, meta: ClusterMeta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.data.height()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Sum of the `m` column.
    pub fn total_mass(&self) -> Result<f64> {
        Ok(f64_values(&self.data, columns::M)?.iter().sum())
    }

    pub fn ids(&self) -> Result<Vec<i64>> {
        i64_values(&self.data, columns::ID)
    }

    pub fn max_id(&self) -> Result<Option<i64>> {
        max_i64(&self.data, columns::ID)
    }

    pub fn f64_column(&self, name: &str) -> Result<Vec<f64>> {
        f64_values(&self.data, name)
    }

    pub fn i64_column(&self, name: &str) -> Result<Vec<i64>> {
        i64_values(&self.data, name)
    }
}

/// Binary systems of a cluster.
#[derive(Debug, Clone)]
pub struct BinariesTable {
    /// Table contents in schema order.
    pub data: DataFrame,
    /// Mirrors the paired singles table's unit system.
    pub scaled_to_nbody_units: bool,
}

impl BinariesTable {
    /// Build a table from parallel arrays.
    ///
    /// Checks that all arrays have the same length and stellar types are 0-14.
    pub fn from_arrays(arrays: BinariesArrays) -> Result<Self> {
        let n = arrays.index.len();
        check_len(columns::ID1, n, arrays.id1.len())?;
        check_len(columns::K1, n, arrays.k1.len())?;
        check_len(columns::M1, n, arrays.m1.len())?;
        check_len(columns::REFF1, n, arrays.reff1.len())?;
        check_len(columns::ID2, n, arrays.id2.len())?;
        check_len(columns::K2, n, arrays.k2.len())?;
        check_len(columns::M2, n, arrays.m2.len())?;
        check_len(columns::REFF2, n, arrays.reff2.len())?;
        check_len(columns::A, n, arrays.a.len())?;
        check_len(columns::E, n, arrays.e.len())?;

        check_codes(columns::K1, &arrays.k1)?;
        check_codes(columns::K2, &arrays.k2)?;

        let data = frame_from_columns(vec![
            Column::new(columns::INDEX.into(), arrays.index),
            Column::new(columns::ID1.into(), arrays.id1),
            Column::new(columns::K1.into(), arrays.k1),
            Column::new(columns::M1.into(), arrays.m1),
            Column::new(columns::REFF1.into(), arrays.reff1),
            Column::new(columns::ID2.into(), arrays.id2),
            Column::new(columns::K2.into(), arrays.k2),
            Column::new(columns::M2.into(), arrays.m2),
            Column::new(columns::REFF2.into(), arrays.reff2),
            Column::new(columns::A.into(), arrays.a),
            Column::new(columns::E.into(), arrays.e),
        ])?;
        debug!(rows = n, "built binaries table");

        Ok(Self {
            data,
            scaled_to_nbody_units: false,
        })
    }

    /// Adopt an existing frame, casting schema columns and rejecting nulls.
    pub fn from_frame(df: &DataFrame, scaled_to_nbody_units: bool) -> Result<Self> {
        Ok(Self {
            data: conform_to_schema(df, BINARIES_SCHEMA)?,
            scaled_to_nbody_units,
        })
    }

    /// An empty, unscaled table.
    pub fn empty() -> Result<Self> {
        Self::from_arrays(BinariesArrays::default())
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.data.height()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Largest id over both members, `None` when empty.
    pub fn max_id(&self) -> Result<Option<i64>> {
        Ok(max_i64(&self.data, columns::ID1)?.max(max_i64(&self.data, columns::ID2)?))
    }

    pub fn f64_column(&self, name: &str) -> Result<Vec<f64>> {
        f64_values(&self.data, name)
    }

    pub fn i64_column(&self, name: &str) -> Result<Vec<i64>> {
        i64_values(&self.data, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singles(n: usize) -> SinglesArrays {
        SinglesArrays {
            id: (1..=n as i64).collect(),
            k: vec![1; n],
            m: vec![1.0; n],
            reff: vec![1.0; n],
            r: (1..=n).map(|i| i as f64).collect(),
            vr: vec![0.1; n],
            vt: vec![0.2; n],
            binind: vec![0; n],
        }
    }

    #[test]
    fn builds_in_schema_order() {
        let table = SinglesTable::from_arrays(singles(3)).unwrap();
        let names: Vec<_> = table
            .data
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, columns::names(SINGLES_SCHEMA).collect::<Vec<_>>());
        assert_eq!(table.height(), 3);
        assert_eq!(table.total_mass().unwrap(), 3.0);
        assert_eq!(table.max_id().unwrap(), Some(3));
        assert!(!table.meta.scaled_to_nbody_units);
    }

    #[test]
    fn rejects_length_mismatch() {
        let mut arrays = singles(3);
        arrays.vt.pop();
        let err = SinglesTable::from_arrays(arrays).unwrap_err();
        assert!(matches!(
            err,
            ModelError::LengthMismatch {
                column: "vt",
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut arrays = singles(3);
        arrays.id = vec![4, 5, 4];
        assert!(matches!(
            SinglesTable::from_arrays(arrays),
            Err(ModelError::DuplicateId { id: 4 })
        ));
    }

    #[test]
    fn rejects_bad_codes_and_binind() {
        let mut arrays = singles(2);
        arrays.k = vec![1, 15];
        assert!(matches!(
            SinglesTable::from_arrays(arrays),
            Err(ModelError::InvalidStellarType { row: 1, .. })
        ));

        let mut arrays = singles(2);
        arrays.binind = vec![0, -1];
        assert!(matches!(
            SinglesTable::from_arrays(arrays),
            Err(ModelError::NegativeBinaryIndex { row: 1, value: -1 })
        ));
    }

    #[test]
    fn binaries_max_id_spans_both_members() {
        let table = BinariesTable::from_arrays(BinariesArrays {
            index: vec![1],
            id1: vec![10],
            k1: vec![1],
            m1: vec![1.0],
            reff1: vec![1.0],
            id2: vec![11],
            k2: vec![0],
            m2: vec![0.5],
            reff2: vec![0.5],
            a: vec![10.0],
            e: vec![0.1],
        })
        .unwrap();
        assert_eq!(table.max_id().unwrap(), Some(11));
        assert_eq!(BinariesTable::empty().unwrap().max_id().unwrap(), None);
    }

    #[test]
    fn from_frame_keeps_meta() {
        let table = SinglesTable::from_arrays(singles(2)).unwrap();
        let meta = ClusterMeta::new().with_metallicity(0.001);
        let adopted = SinglesTable::from_frame(&table.data, meta.clone()).unwrap();
        assert_eq!(adopted.meta, meta);
        assert_eq!(adopted.ids().unwrap(), vec![1, 2]);
    }
}
