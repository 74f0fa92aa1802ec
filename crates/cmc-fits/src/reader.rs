//! FITS file reader.
//!
//! Reads the primary header and every BINTABLE extension. Other extension
//! types are skipped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{FitsError, Result};
use crate::header::{CARD_LEN, Header, align_to_block, parse_header_block};
use crate::types::{BinTable, ColumnData, ColumnFormat, FitsColumn, FitsFile};
use crate::writer::{is_primary_structural, is_table_structural};

/// FITS file reader.
pub struct FitsReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> FitsReader<R> {
    /// Create a new FITS reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read the entire file into memory and parse it.
    pub fn read_file(mut self) -> Result<FitsFile> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        parse_fits_data(&data)
    }
}

impl FitsReader<File> {
    /// Open a FITS file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FitsError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                FitsError::Io(e)
            }
        })?;
        Ok(Self::new(file))
    }
}

/// Read a FITS file from a path.
pub fn read_fits(path: &Path) -> Result<FitsFile> {
    FitsReader::open(path)?.read_file()
}

/// Parse FITS data from bytes.
pub fn parse_fits_data(data: &[u8]) -> Result<FitsFile> {
    if data.len() < CARD_LEN {
        return Err(FitsError::invalid_format("file too small"));
    }

    let (mut primary, mut offset) = parse_header_block(data, 0)?;
    if primary.get_bool("SIMPLE") != Some(true) {
        return Err(FitsError::invalid_format("primary header must start with SIMPLE = T"));
    }
    offset += align_to_block(hdu_data_len(&primary)?);
    primary.retain(|card| !is_primary_structural(card.keyword()));

    let mut file = FitsFile {
        primary,
        tables: Vec::new(),
    };

    // Trailing bytes shorter than a card are tolerated padding.
    while offset + CARD_LEN <= data.len() {
        let (header, data_start) = parse_header_block(data, offset)?;
        let data_len = hdu_data_len(&header)?;
        let next = data_start + align_to_block(data_len);

        match header.get_str("XTENSION").map(str::trim) {
            Some("BINTABLE") => {
                let table = parse_bintable(header, data, data_start)?;
                debug!(
                    table = table.name.as_deref().unwrap_or(""),
                    rows = table.num_rows(),
                    columns = table.columns.len(),
                    "read binary table HDU"
                );
                file.tables.push(table);
            }
            Some(other) => debug!(xtension = other, offset, "skipped extension"),
            None => return Err(FitsError::missing_keyword("XTENSION")),
        }
        offset = next;
    }

    Ok(file)
}

/// Size of an HDU data unit in bytes, before block padding.
fn hdu_data_len(header: &Header) -> Result<usize> {
    let bitpix = required_i64(header, "BITPIX")?;
    let naxis = required_i64(header, "NAXIS")?;
    if naxis == 0 {
        return Ok(0);
    }

    let mut elements: usize = 1;
    for axis in 1..=naxis {
        let len = required_usize(header, &format!("NAXIS{axis}"))?;
        elements = elements
            .checked_mul(len)
            .ok_or_else(|| FitsError::invalid_format("data size overflow"))?;
    }
    let pcount = header.get_i64("PCOUNT").unwrap_or(0);
    let gcount = header.get_i64("GCOUNT").unwrap_or(1);
    let (Ok(pcount), Ok(gcount)) = (usize::try_from(pcount), usize::try_from(gcount)) else {
        return Err(FitsError::invalid_format("negative PCOUNT or GCOUNT"));
    };

    let bytes_per_element = bitpix.unsigned_abs() as usize / 8;
    elements
        .checked_add(pcount)
        .and_then(|n| n.checked_mul(gcount))
        .and_then(|n| n.checked_mul(bytes_per_element))
        .ok_or_else(|| FitsError::invalid_format("data size overflow"))
}

fn parse_bintable(mut header: Header, data: &[u8], data_start: usize) -> Result<BinTable> {
    let row_width = required_usize(&header, "NAXIS1")?;
    let num_rows = required_usize(&header, "NAXIS2")?;
    let num_fields = required_usize(&header, "TFIELDS")?;

    let mut layout = Vec::with_capacity(num_fields);
    for n in 1..=num_fields {
        let name = header
            .get_str(&format!("TTYPE{n}"))
            .map_or_else(|| format!("COL{n}"), |s| s.trim_end().to_string());
        let tform = header
            .get_str(&format!("TFORM{n}"))
            .ok_or_else(|| FitsError::missing_keyword(format!("TFORM{n}")))?;
        layout.push((name, ColumnFormat::from_tform(tform)?));
    }

    let declared: usize = layout.iter().map(|(_, format)| format.width()).sum();
    if declared != row_width {
        return Err(FitsError::invalid_format(format!(
            "column widths sum to {declared} bytes but NAXIS1 is {row_width}"
        )));
    }

    let table_len = row_width
        .checked_mul(num_rows)
        .ok_or_else(|| FitsError::invalid_format("data size overflow"))?;
    let table_data = data
        .get(data_start..data_start + table_len)
        .ok_or(FitsError::OutOfBounds { offset: data_start })?;

    let mut columns = Vec::with_capacity(layout.len());
    let mut col_offset = 0usize;
    for (name, format) in layout {
        let cells = (0..num_rows).map(|row| {
            let start = row * row_width + col_offset;
            &table_data[start..start + format.width()]
        });
        let data = decode_column(format, cells);
        columns.push(FitsColumn { name, format, data });
        col_offset += format.width();
    }

    let name = header.get_str("EXTNAME").map(|s| s.trim_end().to_string());
    header.retain(|card| !is_table_structural(card.keyword()));

    Ok(BinTable {
        name,
        header,
        columns,
    })
}

fn decode_column<'a>(format: ColumnFormat, cells: impl Iterator<Item = &'a [u8]>) -> ColumnData {
    // Cell slices always have the exact format width.
    match format {
        ColumnFormat::UInt8 => ColumnData::Int(cells.map(|b| i64::from(b[0])).collect()),
        ColumnFormat::Int16 => {
            ColumnData::Int(cells.map(|b| i64::from(i16::from_be_bytes([b[0], b[1]]))).collect())
        }
        ColumnFormat::Int32 => ColumnData::Int(
            cells
                .map(|b| i64::from(i32::from_be_bytes([b[0], b[1], b[2], b[3]])))
                .collect(),
        ),
        ColumnFormat::Int64 => ColumnData::Int(cells.map(|b| i64::from_be_bytes(array8(b))).collect()),
        ColumnFormat::Float32 => ColumnData::Float(
            cells
                .map(|b| f64::from(f32::from_be_bytes([b[0], b[1], b[2], b[3]])))
                .collect(),
        ),
        ColumnFormat::Float64 => {
            ColumnData::Float(cells.map(|b| f64::from_be_bytes(array8(b))).collect())
        }
    }
}

fn array8(bytes: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(&bytes[..8]);
    out
}

fn required_i64(header: &Header, keyword: &str) -> Result<i64> {
    header
        .get_i64(keyword)
        .ok_or_else(|| FitsError::missing_keyword(keyword))
}

fn required_usize(header: &Header, keyword: &str) -> Result<usize> {
    let value = required_i64(header, keyword)?;
    usize::try_from(value)
        .map_err(|_| FitsError::invalid_format(format!("{keyword} must not be negative")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{BLOCK_LEN, Card, build_header_block};
    use crate::types::FitsWriterOptions;
    use crate::writer::FitsWriter;

    fn write_to_vec(file: &FitsFile) -> Vec<u8> {
        let mut buffer = Vec::new();
        FitsWriter::with_options(&mut buffer, FitsWriterOptions::new().without_date())
            .write_file(file)
            .unwrap();
        buffer
    }

    #[test]
    fn test_reject_small_file() {
        assert!(parse_fits_data(&[0u8; 10]).is_err());
    }

    #[test]
    fn test_reject_missing_simple() {
        let mut header = Header::new();
        header.set("BITPIX", 8_i64);
        header.set("NAXIS", 0_i64);
        let bytes = build_header_block(&header).unwrap();
        assert!(matches!(
            parse_fits_data(&bytes),
            Err(FitsError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_structural_keywords_stripped() {
        let mut table = BinTable::with_columns("DATA", vec![FitsColumn::int64("id", vec![7])]);
        table.header.set("NOBJ", 1_i64);
        let mut file = FitsFile::new();
        file.primary.push(Card::comment("hello"));
        file.add_table(table);

        let parsed = parse_fits_data(&write_to_vec(&file)).unwrap();
        assert_eq!(parsed.primary.get("SIMPLE"), None);
        assert_eq!(parsed.primary.comments().collect::<Vec<_>>(), vec!["hello"]);

        let table = &parsed.tables[0];
        assert_eq!(table.name.as_deref(), Some("DATA"));
        assert_eq!(table.header.get_i64("NOBJ"), Some(1));
        assert_eq!(table.header.get("NAXIS2"), None);
        assert_eq!(table.header.get("TTYPE1"), None);
        assert_eq!(table.header.get("EXTNAME"), None);
    }

    #[test]
    fn test_truncated_data() {
        let file = FitsFile {
            primary: Header::new(),
            tables: vec![BinTable::with_columns(
                "DATA",
                vec![FitsColumn::float64("m", vec![1.0; 10])],
            )],
        };
        let bytes = write_to_vec(&file);
        // Primary block, table header block, one data block.
        assert_eq!(bytes.len(), 3 * BLOCK_LEN);
        let truncated = &bytes[..2 * BLOCK_LEN + 40];
        assert!(matches!(
            parse_fits_data(truncated),
            Err(FitsError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_row_width_mismatch() {
        let mut header = Header::new();
        header.set("XTENSION", "BINTABLE");
        header.set("BITPIX", 8_i64);
        header.set("NAXIS", 2_i64);
        header.set("NAXIS1", 12_i64);
        header.set("NAXIS2", 0_i64);
        header.set("TFIELDS", 1_i64);
        header.set("TFORM1", "1D");
        assert!(matches!(
            parse_bintable(header, &[], 0),
            Err(FitsError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_narrow_formats_decode() {
        let cells: Vec<[u8; 2]> = vec![(-2_i16).to_be_bytes(), 300_i16.to_be_bytes()];
        let data = decode_column(ColumnFormat::Int16, cells.iter().map(|c| &c[..]));
        assert_eq!(data, ColumnData::Int(vec![-2, 300]));

        let cells: Vec<[u8; 4]> = vec![1.5_f32.to_be_bytes()];
        let data = decode_column(ColumnFormat::Float32, cells.iter().map(|c| &c[..]));
        assert_eq!(data, ColumnData::Float(vec![1.5]));
    }

    #[test]
    fn test_missing_file() {
        let result = read_fits(Path::new("/nonexistent/cluster.fits"));
        assert!(matches!(result, Err(FitsError::FileNotFound { .. })));
    }
}
