//! Column helpers over polars frames.
//!
//! Tables keep a fixed schema, so these helpers read whole columns into
//! vectors and write them back under the same name.

use polars::prelude::{Column, DataFrame};

use crate::columns::ColumnSpec;
use crate::error::{ModelError, Result};

/// Read a float column, rejecting nulls.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    df.column(name)?
        .f64()?
        .into_iter()
        .map(|v| v.ok_or_else(|| null_values(name)))
        .collect()
}

/// Read an integer column, rejecting nulls.
pub fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<i64>> {
    df.column(name)?
        .i64()?
        .into_iter()
        .map(|v| v.ok_or_else(|| null_values(name)))
        .collect()
}

/// Replace a float column in place.
pub fn set_f64_values(df: &mut DataFrame, name: &str, values: Vec<f64>) -> Result<()> {
    df.with_column(Column::new(name.into(), values))?;
    Ok(())
}

/// Largest value of an integer column, `None` when empty.
pub fn max_i64(df: &DataFrame, name: &str) -> Result<Option<i64>> {
    Ok(i64_values(df, name)?.into_iter().max())
}

/// Build a frame from ordered columns.
pub fn frame_from_columns(columns: Vec<Column>) -> Result<DataFrame> {
    Ok(DataFrame::new(columns)?)
}

/// Select, cast and null-check the schema columns of `df`, in schema order.
///
/// Extra columns are dropped.
pub fn conform_to_schema(df: &DataFrame, schema: &[ColumnSpec]) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(schema.len());
    for spec in schema {
        let column = df
            .column(spec.name)
            .map_err(|_| ModelError::MissingColumn {
                name: spec.name.to_string(),
            })?;
        if column.null_count() > 0 {
            return Err(null_values(spec.name));
        }
        let cast = if column.dtype() == &spec.kind.dtype() {
            column.clone()
        } else {
            column.cast(&spec.kind.dtype())?
        };
        // Values the cast could not represent come back as nulls.
        if cast.null_count() > 0 {
            return Err(null_values(spec.name));
        }
        columns.push(cast);
    }
    frame_from_columns(columns)
}

fn null_values(name: &str) -> ModelError {
    ModelError::NullValues {
        column: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{ColumnKind, SINGLES_SCHEMA};

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("id".into(), &[3_i64, 1, 2]),
            Column::new("m".into(), &[0.5_f64, 0.25, 0.25]),
        ])
        .unwrap()
    }

    #[test]
    fn read_and_replace() {
        let mut df = frame();
        set_f64_values(&mut df, "m", vec![1.0, 0.5, 0.5]).unwrap();
        assert_eq!(f64_values(&df, "m").unwrap(), vec![1.0, 0.5, 0.5]);
        assert_eq!(max_i64(&df, "id").unwrap(), Some(3));
    }

    #[test]
    fn wrong_dtype_is_error() {
        let df = frame();
        assert!(f64_values(&df, "id").is_err());
        assert!(i64_values(&df, "missing").is_err());
    }

    #[test]
    fn conform_casts_floats_to_ints() {
        let names = ["id", "k", "m", "Reff", "r", "vr", "vt", "binind"];
        let columns = names
            .iter()
            .map(|name| Column::new((*name).into(), &[1.0_f64, 2.0]))
            .collect();
        let df = DataFrame::new(columns).unwrap();

        let conformed = conform_to_schema(&df, SINGLES_SCHEMA).unwrap();
        for (dtype, spec) in conformed.dtypes().iter().zip(SINGLES_SCHEMA) {
            assert_eq!(dtype, &spec.kind.dtype());
        }
        assert_eq!(i64_values(&conformed, "id").unwrap(), vec![1, 2]);
        assert_eq!(SINGLES_SCHEMA[0].kind, ColumnKind::Int);
    }

    #[test]
    fn conform_reports_missing_column() {
        let err = conform_to_schema(&frame(), SINGLES_SCHEMA).unwrap_err();
        assert!(matches!(err, ModelError::MissingColumn { name } if name == "k"));
    }
}
