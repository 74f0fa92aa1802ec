//! HDF5 backend.
//!
//! Each table is a group in the pandas "fixed" frame layout: `axis0` and
//! `block0_items` hold the column names, `axis1` the row index and
//! `block0_values` a rows x columns float matrix. Index nodes carry their
//! `kind` and the matrix is flagged `transposed`, since pandas stores blocks
//! columns-first. Header attributes are attached to
//! `CLUS_OBJ_DATA/block0_values`.

use std::path::Path;

use hdf5::types::{FixedAscii, VarLenUnicode};
use hdf5::{Dataset, File, H5Type, Location};
use ndarray::{Array1, Array2};
use polars::prelude::{Column, DataFrame, DataType};
use tracing::debug;

use crate::error::{OutputError, Result};
use crate::layout::{
    BINARY_EXTNAME, ClusterHeader, KEY_EXTNAME, KEY_MCLUS, KEY_NBINARY, KEY_NOBJ, KEY_RTID,
    KEY_RVIR, KEY_Z, OBJ_EXTNAME,
};

/// Marks `block0_values` as rows x columns.
const TRANSPOSED: i64 = 1;

/// Stored width of column names.
const NAME_LEN: usize = 16;

type ColumnName = FixedAscii<NAME_LEN>;

fn column_names(df: &DataFrame) -> Result<Array1<ColumnName>> {
    df.get_column_names()
        .iter()
        .map(|name| {
            ColumnName::from_ascii(name.as_bytes()).map_err(|e| {
                OutputError::invalid_layout(format!("column name {name} cannot be stored: {e}"))
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Array1::from)
}

/// Rows x columns matrix of every column cast to f64.
fn values_matrix(df: &DataFrame) -> Result<Array2<f64>> {
    let (rows, cols) = df.shape();
    let mut matrix = Array2::<f64>::zeros((rows, cols));
    for (j, column) in df.get_columns().iter().enumerate() {
        let cast = column.cast(&DataType::Float64)?;
        for (i, value) in cast.f64()?.into_iter().enumerate() {
            matrix[[i, j]] = value.unwrap_or(f64::NAN);
        }
    }
    Ok(matrix)
}

fn write_str_attr(location: &Location, name: &str, value: &str) -> Result<()> {
    let value: VarLenUnicode = value
        .parse()
        .map_err(|e| OutputError::invalid_layout(format!("attribute {name}: {e}")))?;
    location
        .new_attr::<VarLenUnicode>()
        .shape(())
        .create(name)?
        .write_scalar(&value)?;
    Ok(())
}

fn write_scalar_attr<T: H5Type>(location: &Location, name: &str, value: &T) -> Result<()> {
    location
        .new_attr::<T>()
        .shape(())
        .create(name)?
        .write_scalar(value)?;
    Ok(())
}

/// Write one frame as a pandas fixed-format group.
fn write_frame(file: &File, name: &str, df: &DataFrame) -> Result<Dataset> {
    let group = file.create_group(name)?;
    for (attr, value) in [
        ("pandas_type", "frame"),
        ("pandas_version", "0.15.2"),
        ("encoding", "UTF-8"),
        ("axis0_variety", "regular"),
        ("axis1_variety", "regular"),
        ("block0_items_variety", "regular"),
    ] {
        write_str_attr(&group, attr, value)?;
    }
    write_scalar_attr(&group, "ndim", &2_i64)?;
    write_scalar_attr(&group, "nblocks", &1_i64)?;

    let names = column_names(df)?;
    let index = Array1::from_iter(0..df.height() as i64);
    for (node, kind) in [("axis0", "string"), ("block0_items", "string")] {
        let dataset = group.new_dataset_builder().with_data(&names).create(node)?;
        write_str_attr(&dataset, "kind", kind)?;
    }
    let axis1 = group.new_dataset_builder().with_data(&index).create("axis1")?;
    write_str_attr(&axis1, "kind", "integer")?;
    let values = group
        .new_dataset_builder()
        .with_data(&values_matrix(df)?)
        .create("block0_values")?;
    write_scalar_attr(&values, "transposed", &TRANSPOSED)?;
    Ok(values)
}

/// Write padded tables and their header.
pub(crate) fn write_tables(
    path: &Path,
    singles: &DataFrame,
    binaries: &DataFrame,
    header: &ClusterHeader,
) -> Result<()> {
    let file = File::create(path)?;
    let values = write_frame(&file, OBJ_EXTNAME, singles)?;
    write_frame(&file, BINARY_EXTNAME, binaries)?;

    let extname: VarLenUnicode = header
        .extname
        .parse()
        .map_err(|e| OutputError::invalid_layout(format!("{KEY_EXTNAME}: {e}")))?;
    write_scalar_attr(&values, KEY_EXTNAME, &extname)?;
    write_scalar_attr(&values, KEY_NOBJ, &(header.nobj as i64))?;
    write_scalar_attr(&values, KEY_NBINARY, &(header.nbinary as i64))?;
    write_scalar_attr(&values, KEY_MCLUS, &header.mass_of_cluster)?;
    write_scalar_attr(&values, KEY_RVIR, &header.virial_radius)?;
    write_scalar_attr(&values, KEY_RTID, &header.tidal_radius.unwrap_or(f64::NAN))?;
    write_scalar_attr(&values, KEY_Z, &header.metallicity)?;

    debug!(path = %path.display(), "wrote HDF5 tables");
    Ok(())
}

fn read_frame(file: &File, name: &str) -> Result<(DataFrame, Dataset)> {
    let group = file.group(name).map_err(|_| OutputError::MissingTable {
        name: name.to_string(),
    })?;
    let names = group.dataset("block0_items")?.read_1d::<ColumnName>()?;
    let values_ds = group.dataset("block0_values")?;
    let values = values_ds.read_2d::<f64>()?;
    if values.ncols() != names.len() {
        return Err(OutputError::invalid_layout(format!(
            "{name} has {} value columns but {} names",
            values.ncols(),
            names.len()
        )));
    }

    let columns = names
        .iter()
        .zip(values.columns())
        .map(|(col_name, col)| Column::new(col_name.as_str().into(), col.to_vec()))
        .collect();
    Ok((DataFrame::new(columns)?, values_ds))
}

fn read_count(dataset: &Dataset, name: &str) -> Result<usize> {
    let value = dataset.attr(name)?.read_scalar::<i64>()?;
    usize::try_from(value)
        .map_err(|_| OutputError::invalid_layout(format!("{name} is negative ({value})")))
}

/// Read padded tables and their header.
pub(crate) fn read_tables(path: &Path) -> Result<(DataFrame, DataFrame, ClusterHeader)> {
    let file = File::open(path)?;
    let (singles, values) = read_frame(&file, OBJ_EXTNAME)?;
    let (binaries, _) = read_frame(&file, BINARY_EXTNAME)?;

    let extname = match values.attr(KEY_EXTNAME) {
        Ok(attr) => attr.read_scalar::<VarLenUnicode>()?.as_str().to_string(),
        Err(_) => OBJ_EXTNAME.to_string(),
    };
    let f64_attr = |name: &str| -> Result<f64> {
        values
            .attr(name)
            .map_err(|_| OutputError::missing_keyword(name))?
            .read_scalar::<f64>()
            .map_err(OutputError::from)
    };
    let tidal_radius = f64_attr(KEY_RTID)?;
    let header = ClusterHeader {
        extname,
        nobj: read_count(&values, KEY_NOBJ)?,
        nbinary: read_count(&values, KEY_NBINARY)?,
        mass_of_cluster: f64_attr(KEY_MCLUS)?,
        virial_radius: f64_attr(KEY_RVIR)?,
        tidal_radius: tidal_radius.is_finite().then_some(tidal_radius),
        metallicity: f64_attr(KEY_Z)?,
    };
    Ok((singles, binaries, header))
}
