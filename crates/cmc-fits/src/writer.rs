//! FITS file writer.
//!
//! Writes an empty primary HDU followed by one BINTABLE extension per table.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{FitsError, Result};
use crate::header::{BLOCK_LEN, Card, Header, build_header_block, validate_keyword};
use crate::types::{BinTable, ColumnData, ColumnFormat, FitsColumn, FitsFile, FitsWriterOptions};

/// FITS file writer.
pub struct FitsWriter<W: Write> {
    writer: BufWriter<W>,
    options: FitsWriterOptions,
}

impl<W: Write> FitsWriter<W> {
    /// Create a new FITS writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options: FitsWriterOptions::default(),
        }
    }

    /// Create a new FITS writer with options.
    pub fn with_options(writer: W, options: FitsWriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
        }
    }

    /// Write a complete file.
    ///
    /// Every table is validated before the first byte is written.
    pub fn write_file(mut self, file: &FitsFile) -> Result<()> {
        for table in &file.tables {
            validate_table(table)?;
        }
        for card in file.primary.cards() {
            check_caller_card(card, PRIMARY_RESERVED)?;
        }

        let primary = build_primary_header(&file.primary, &self.options);
        self.writer.write_all(&build_header_block(&primary)?)?;

        for table in &file.tables {
            let header = build_table_header(table);
            self.writer.write_all(&build_header_block(&header)?)?;
            self.write_table_data(table)?;
            debug!(
                table = table.name.as_deref().unwrap_or(""),
                rows = table.num_rows(),
                columns = table.columns.len(),
                "wrote binary table HDU"
            );
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Write row-major, big-endian table data padded to the block size.
    fn write_table_data(&mut self, table: &BinTable) -> Result<()> {
        let mut block_writer = BlockWriter::new(&mut self.writer);
        let mut row = Vec::with_capacity(table.row_width());

        for row_idx in 0..table.num_rows() {
            row.clear();
            for column in &table.columns {
                encode_cell(column, row_idx, &mut row)?;
            }
            block_writer.write_bytes(&row)?;
        }

        block_writer.finish()
    }
}

impl FitsWriter<File> {
    /// Create a FITS file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }

    /// Create a FITS file with options.
    pub fn create_with_options(path: &Path, options: FitsWriterOptions) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_options(file, options))
    }
}

/// Write a FITS file.
pub fn write_fits(path: &Path, file: &FitsFile) -> Result<()> {
    FitsWriter::create(path)?.write_file(file)
}

/// Write a FITS file with options.
pub fn write_fits_with_options(
    path: &Path,
    file: &FitsFile,
    options: &FitsWriterOptions,
) -> Result<()> {
    FitsWriter::create_with_options(path, options.clone())?.write_file(file)
}

const PRIMARY_RESERVED: &[&str] = &["SIMPLE", "BITPIX", "NAXIS", "EXTEND", "END"];

const TABLE_RESERVED: &[&str] = &[
    "XTENSION", "BITPIX", "NAXIS", "NAXIS1", "NAXIS2", "PCOUNT", "GCOUNT", "TFIELDS", "EXTNAME",
    "END",
];

/// Whether a keyword is written by the codec itself.
pub(crate) fn is_structural(keyword: &str, reserved: &[&str]) -> bool {
    reserved.contains(&keyword)
        || ["TTYPE", "TFORM"].iter().any(|prefix| {
            keyword
                .strip_prefix(prefix)
                .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        })
}

pub(crate) fn is_table_structural(keyword: &str) -> bool {
    is_structural(keyword, TABLE_RESERVED)
}

pub(crate) fn is_primary_structural(keyword: &str) -> bool {
    is_structural(keyword, PRIMARY_RESERVED)
}

fn check_caller_card(card: &Card, reserved: &[&str]) -> Result<()> {
    validate_keyword(card.keyword())?;
    match card {
        Card::End => Err(FitsError::ReservedKeyword {
            keyword: "END".to_string(),
        }),
        Card::Value { keyword, .. } if is_structural(keyword, reserved) => {
            Err(FitsError::ReservedKeyword {
                keyword: keyword.clone(),
            })
        }
        _ => Ok(()),
    }
}

fn build_primary_header(caller: &Header, options: &FitsWriterOptions) -> Header {
    let mut header = Header::new();
    header.push(Card::value("SIMPLE", true).with_comment("conforms to FITS standard"));
    header.push(Card::value("BITPIX", 8_i64).with_comment("array data type"));
    header.push(Card::value("NAXIS", 0_i64).with_comment("number of array dimensions"));
    header.push(Card::value("EXTEND", true));
    if caller.get("DATE").is_none()
        && let Some(date) = options.format_date()
    {
        header.push(Card::value("DATE", date).with_comment("file creation date (UTC)"));
    }
    for card in caller.cards() {
        header.push(card.clone());
    }
    header
}

fn build_table_header(table: &BinTable) -> Header {
    let mut header = Header::new();
    header.push(Card::value("XTENSION", "BINTABLE").with_comment("binary table extension"));
    header.push(Card::value("BITPIX", 8_i64).with_comment("array data type"));
    header.push(Card::value("NAXIS", 2_i64).with_comment("number of array dimensions"));
    header.push(Card::value("NAXIS1", table.row_width() as i64).with_comment("length of dimension 1"));
    header.push(Card::value("NAXIS2", table.num_rows() as i64).with_comment("length of dimension 2"));
    header.push(Card::value("PCOUNT", 0_i64).with_comment("number of group parameters"));
    header.push(Card::value("GCOUNT", 1_i64).with_comment("number of groups"));
    header.push(Card::value("TFIELDS", table.columns.len() as i64).with_comment("number of table fields"));
    for (idx, column) in table.columns.iter().enumerate() {
        let n = idx + 1;
        header.push(Card::value(format!("TTYPE{n}"), column.name.as_str()));
        header.push(Card::value(format!("TFORM{n}"), column.format.tform()));
    }
    if let Some(name) = &table.name {
        header.push(Card::value("EXTNAME", name.as_str()).with_comment("extension name"));
    }
    for card in table.header.cards() {
        header.push(card.clone());
    }
    header
}

/// Validate a table before writing.
fn validate_table(table: &BinTable) -> Result<()> {
    let mut seen = BTreeSet::new();
    let rows = table.num_rows();

    for column in &table.columns {
        let name = column.name.trim();
        if name.is_empty() {
            return Err(FitsError::InvalidColumnName {
                name: column.name.clone(),
            });
        }
        if !seen.insert(name.to_string()) {
            return Err(FitsError::duplicate_column(&column.name));
        }
        if column.len() != rows {
            return Err(FitsError::ColumnLengthMismatch {
                column: column.name.clone(),
                expected: rows,
                actual: column.len(),
            });
        }
        let matches_format = match column.data {
            ColumnData::Int(_) => column.format.is_integer(),
            ColumnData::Float(_) => !column.format.is_integer(),
        };
        if !matches_format {
            return Err(FitsError::FormatMismatch {
                column: column.name.clone(),
                format: column.format.code(),
            });
        }
    }

    for card in table.header.cards() {
        check_caller_card(card, TABLE_RESERVED)?;
    }

    Ok(())
}

/// Append one big-endian cell to `out`.
fn encode_cell(column: &FitsColumn, row: usize, out: &mut Vec<u8>) -> Result<()> {
    let out_of_range = |value: i64| FitsError::ValueOutOfRange {
        column: column.name.clone(),
        value,
    };
    match (&column.data, column.format) {
        (ColumnData::Int(values), format) => {
            let value = values[row];
            match format {
                ColumnFormat::UInt8 => {
                    out.push(u8::try_from(value).map_err(|_| out_of_range(value))?);
                }
                ColumnFormat::Int16 => out.extend_from_slice(
                    &i16::try_from(value)
                        .map_err(|_| out_of_range(value))?
                        .to_be_bytes(),
                ),
                ColumnFormat::Int32 => out.extend_from_slice(
                    &i32::try_from(value)
                        .map_err(|_| out_of_range(value))?
                        .to_be_bytes(),
                ),
                _ => out.extend_from_slice(&value.to_be_bytes()),
            }
        }
        (ColumnData::Float(values), ColumnFormat::Float32) => {
            out.extend_from_slice(&(values[row] as f32).to_be_bytes());
        }
        (ColumnData::Float(values), _) => out.extend_from_slice(&values[row].to_be_bytes()),
    }
    Ok(())
}

/// Helper for writing data padded with zeros to a whole block.
struct BlockWriter<'a, W: Write> {
    writer: &'a mut W,
    written: usize,
}

impl<'a, W: Write> BlockWriter<'a, W> {
    fn new(writer: &'a mut W) -> Self {
        Self { writer, written: 0 }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let remainder = self.written % BLOCK_LEN;
        if remainder > 0 {
            self.writer.write_all(&vec![0u8; BLOCK_LEN - remainder])?;
            self.written += BLOCK_LEN - remainder;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::CardValue;

    #[test]
    fn test_block_writer_pads_with_zeros() {
        let mut output = Vec::new();
        {
            let mut writer = BlockWriter::new(&mut output);
            writer.write_bytes(&[0xAB; 100]).unwrap();
            writer.finish().unwrap();
        }
        assert_eq!(output.len(), BLOCK_LEN);
        assert!(output[100..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_block_writer_empty_data() {
        let mut output = Vec::new();
        BlockWriter::new(&mut output).finish().unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_encode_cell_big_endian() {
        let column = FitsColumn::float64("m", vec![1.0]);
        let mut out = Vec::new();
        encode_cell(&column, 0, &mut out).unwrap();
        assert_eq!(out, 1.0_f64.to_be_bytes());
    }

    #[test]
    fn test_encode_cell_out_of_range() {
        let column = FitsColumn {
            name: "k".to_string(),
            format: ColumnFormat::Int16,
            data: ColumnData::Int(vec![1 << 20]),
        };
        let mut out = Vec::new();
        assert!(matches!(
            encode_cell(&column, 0, &mut out),
            Err(FitsError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_table_length_mismatch() {
        let table = BinTable::with_columns(
            "T",
            vec![
                FitsColumn::int64("id", vec![1, 2]),
                FitsColumn::float64("m", vec![0.5]),
            ],
        );
        assert!(matches!(
            validate_table(&table),
            Err(FitsError::ColumnLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_table_duplicate_columns() {
        let table = BinTable::with_columns(
            "T",
            vec![FitsColumn::int64("id", vec![1]), FitsColumn::int64("id", vec![2])],
        );
        assert!(validate_table(&table).is_err());
    }

    #[test]
    fn test_validate_table_format_mismatch() {
        let table = BinTable::with_columns(
            "T",
            vec![FitsColumn {
                name: "m".to_string(),
                format: ColumnFormat::Int64,
                data: ColumnData::Float(vec![1.0]),
            }],
        );
        assert!(matches!(
            validate_table(&table),
            Err(FitsError::FormatMismatch { format: 'K', .. })
        ));
    }

    #[test]
    fn test_reserved_keyword_rejected() {
        let mut table = BinTable::new("T");
        table.header.set("NAXIS2", 5_i64);
        assert!(matches!(
            validate_table(&table),
            Err(FitsError::ReservedKeyword { .. })
        ));

        let mut table = BinTable::new("T");
        table.header.set("TFORM3", "1D");
        assert!(validate_table(&table).is_err());

        let mut table = BinTable::new("T");
        table.header.set("TFORMAT", CardValue::Undefined);
        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_structural_keywords() {
        assert!(is_table_structural("TTYPE12"));
        assert!(!is_table_structural("TTYPE"));
        assert!(!is_table_structural("NOBJ"));
        assert!(is_primary_structural("SIMPLE"));
        assert!(!is_primary_structural("DATE"));
    }
}
