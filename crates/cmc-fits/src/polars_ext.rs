//! Polars DataFrame conversion.

use polars::prelude::{Column, DataFrame, DataType};

use crate::error::{FitsError, Result};
use crate::types::{BinTable, ColumnData, FitsColumn};

/// Convert a binary table into a DataFrame.
///
/// Integer columns become `Int64`, float columns `Float64`.
pub fn table_to_dataframe(table: &BinTable) -> Result<DataFrame> {
    let columns = table
        .columns
        .iter()
        .map(|column| match &column.data {
            ColumnData::Int(values) => Column::new(column.name.as_str().into(), values.as_slice()),
            ColumnData::Float(values) => {
                Column::new(column.name.as_str().into(), values.as_slice())
            }
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Convert a DataFrame into a named binary table.
///
/// Integer dtypes are stored as `1K` and float dtypes as `1D`. Nulls and
/// other dtypes are rejected.
pub fn dataframe_to_table(df: &DataFrame, name: &str) -> Result<BinTable> {
    let mut table = BinTable::new(name);
    for column in df.get_columns() {
        let col_name = column.name().to_string();
        let dtype = column.dtype();
        if column.null_count() > 0 {
            return Err(FitsError::invalid_format(format!(
                "column {col_name} contains null values"
            )));
        }
        let fits_column = if dtype.is_integer() {
            let cast = column.cast(&DataType::Int64)?;
            // Strict overflow shows up as new nulls.
            if cast.null_count() > 0 {
                return Err(FitsError::UnsupportedDtype {
                    column: col_name,
                    dtype: dtype.to_string(),
                });
            }
            let values = cast.i64()?.into_no_null_iter().collect();
            FitsColumn::int64(col_name, values)
        } else if dtype.is_float() {
            let cast = column.cast(&DataType::Float64)?;
            let values = cast.f64()?.into_no_null_iter().collect();
            FitsColumn::float64(col_name, values)
        } else {
            return Err(FitsError::UnsupportedDtype {
                column: col_name,
                dtype: dtype.to_string(),
            });
        };
        table.add_column(fits_column);
    }
    Ok(table)
}
