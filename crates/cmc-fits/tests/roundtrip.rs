//! Integration tests for FITS write/read round trips.

use std::io::Cursor;
use std::path::PathBuf;

use chrono::NaiveDate;
use cmc_fits::{
    BinTable, Card, CardValue, ColumnData, ColumnFormat, FitsColumn, FitsError, FitsFile,
    FitsReader, FitsWriter, FitsWriterOptions, read_fits, write_fits,
};
use proptest::prelude::*;

const BLOCK_LEN: usize = 2880;

fn fixed_options() -> FitsWriterOptions {
    let date = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(12, 30, 5)
        .unwrap();
    FitsWriterOptions::new().with_date(date)
}

fn to_bytes(file: &FitsFile, options: FitsWriterOptions) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let writer = FitsWriter::with_options(Cursor::new(&mut buffer), options);
        writer.write_file(file).unwrap();
    }
    buffer
}

/// Helper to write and read back a file.
fn roundtrip(file: &FitsFile) -> FitsFile {
    let buffer = to_bytes(file, fixed_options());
    FitsReader::new(Cursor::new(&buffer)).read_file().unwrap()
}

fn cluster_file() -> FitsFile {
    let mut objects = BinTable::with_columns(
        "CLUS_OBJ_DATA",
        vec![
            FitsColumn::int64("id", vec![0, 1, 2]),
            FitsColumn::float64("m", vec![0.0, 0.25, 0.75]),
            FitsColumn::float64("r", vec![f64::MIN_POSITIVE, 0.5, 1.5]),
        ],
    );
    objects.header.set("NOBJ", 2_i64);
    objects.header.set("MCLUS", 1200.5);
    objects.header.set("RTID", CardValue::Undefined);

    let binaries = BinTable::with_columns(
        "CLUS_BINARY_DATA",
        vec![
            FitsColumn::int64("id1", vec![0]),
            FitsColumn::float64("a", vec![0.0]),
        ],
    );

    let mut file = FitsFile::new();
    file.primary.push(Card::comment("example file"));
    file.add_table(objects);
    file.add_table(binaries);
    file
}

#[test]
fn test_cluster_roundtrip() {
    let file = cluster_file();
    let back = roundtrip(&file);

    assert_eq!(back.tables.len(), 2);
    let objects = back.table("CLUS_OBJ_DATA").unwrap();
    assert_eq!(objects.num_rows(), 3);
    assert_eq!(objects.column("id").unwrap().as_i64(), Some(&[0, 1, 2][..]));
    assert_eq!(
        objects.column("r").unwrap().as_f64(),
        Some(&[f64::MIN_POSITIVE, 0.5, 1.5][..])
    );
    assert_eq!(objects.header.get_i64("NOBJ"), Some(2));
    assert_eq!(objects.header.get_f64("MCLUS"), Some(1200.5));
    assert_eq!(objects.header.get("RTID"), Some(&CardValue::Undefined));

    let binaries = back.table("CLUS_BINARY_DATA").unwrap();
    assert_eq!(binaries.num_rows(), 1);
    assert_eq!(binaries.columns[0].format, ColumnFormat::Int64);
    assert_eq!(binaries.columns[1].format, ColumnFormat::Float64);

    assert_eq!(back.primary.get_str("DATE"), Some("2024-03-09T12:30:05"));
}

#[test]
fn test_file_is_block_aligned() {
    let buffer = to_bytes(&cluster_file(), fixed_options());
    assert_eq!(buffer.len() % BLOCK_LEN, 0);
    // Primary, then header and data for each table.
    assert_eq!(buffer.len(), 5 * BLOCK_LEN);
}

#[test]
fn test_primary_header_snapshot() {
    let mut file = FitsFile::new();
    file.primary.push(Card::comment("example file"));
    let buffer = to_bytes(&file, fixed_options());
    assert_eq!(buffer.len(), BLOCK_LEN);

    let rendered: Vec<String> = buffer
        .chunks(80)
        .map(|card| String::from_utf8_lossy(card).trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    insta::assert_snapshot!(rendered.join("\n"), @r"
    SIMPLE  =                    T / conforms to FITS standard
    BITPIX  =                    8 / array data type
    NAXIS   =                    0 / number of array dimensions
    EXTEND  =                    T
    DATE    = '2024-03-09T12:30:05' / file creation date (UTC)
    COMMENT example file
    END
    ");
}

#[test]
fn test_caller_date_not_duplicated() {
    let mut file = FitsFile::new();
    file.primary.set("DATE", "2001-01-01");
    let buffer = to_bytes(&file, fixed_options());
    let back = FitsReader::new(Cursor::new(&buffer)).read_file().unwrap();
    assert_eq!(back.primary.get_str("DATE"), Some("2001-01-01"));
    assert_eq!(back.primary.len(), 1);
}

#[test]
fn test_empty_table_roundtrip() {
    let mut file = FitsFile::new();
    file.add_table(BinTable::with_columns(
        "CLUS_BINARY_DATA",
        vec![
            FitsColumn::int64("id1", vec![]),
            FitsColumn::float64("m1", vec![]),
        ],
    ));
    let buffer = to_bytes(&file, FitsWriterOptions::new().without_date());
    assert_eq!(buffer.len(), 2 * BLOCK_LEN);

    let back = FitsReader::new(Cursor::new(&buffer)).read_file().unwrap();
    let table = &back.tables[0];
    assert_eq!(table.num_rows(), 0);
    assert_eq!(table.columns.len(), 2);
    assert_eq!(table.columns[1].data, ColumnData::Float(vec![]));
}

#[test]
fn test_non_finite_header_value_written_undefined() {
    let mut file = FitsFile::new();
    let mut table = BinTable::with_columns("T", vec![FitsColumn::int64("id", vec![1])]);
    table.header.set("RTID", f64::NAN);
    file.add_table(table);

    let back = roundtrip(&file);
    assert_eq!(back.tables[0].header.get("RTID"), Some(&CardValue::Undefined));
}

#[test]
fn test_write_and_read_path() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("cluster.fits");
    write_fits(&path, &cluster_file()).unwrap();

    let back = read_fits(&path).unwrap();
    assert_eq!(back.tables.len(), 2);
    assert_eq!(back.primary.comments().next(), Some("example file"));
}

#[test]
fn test_invalid_table_writes_nothing() {
    let mut file = FitsFile::new();
    file.add_table(BinTable::with_columns(
        "T",
        vec![
            FitsColumn::int64("id", vec![1, 2]),
            FitsColumn::float64("m", vec![1.0]),
        ],
    ));
    let mut buffer = Vec::new();
    let result = FitsWriter::new(Cursor::new(&mut buffer)).write_file(&file);
    assert!(matches!(result, Err(FitsError::ColumnLengthMismatch { .. })));
    assert!(buffer.is_empty());
}

proptest! {
    #[test]
    fn prop_columns_roundtrip(
        ints in prop::collection::vec(any::<i64>(), 0..50),
        seed in any::<u64>(),
    ) {
        let floats: Vec<f64> = ints
            .iter()
            .enumerate()
            .map(|(i, v)| (*v as f64) * 1e-3 + (seed as f64) / (i as f64 + 1.0))
            .collect();
        let mut file = FitsFile::new();
        file.add_table(BinTable::with_columns(
            "DATA",
            vec![
                FitsColumn::int64("k", ints.clone()),
                FitsColumn::float64("d", floats.clone()),
            ],
        ));

        let back = roundtrip(&file);
        let table = &back.tables[0];
        prop_assert_eq!(table.column("k").unwrap().as_i64().unwrap(), ints.as_slice());
        prop_assert_eq!(table.column("d").unwrap().as_f64().unwrap(), floats.as_slice());
    }
}
