//! FITS backend.
//!
//! An empty primary HDU with two comment cards, then `CLUS_OBJ_DATA` and
//! `CLUS_BINARY_DATA` as binary table extensions. Header attributes live on
//! `CLUS_OBJ_DATA`.

use std::path::Path;

use cmc_fits::{
    BinTable, Card, CardValue, FitsFile, Header, dataframe_to_table, read_fits,
    table_to_dataframe, write_fits,
};
use polars::prelude::DataFrame;
use tracing::debug;

use crate::error::{OutputError, Result};
use crate::layout::{
    BINARY_EXTNAME, ClusterHeader, KEY_MCLUS, KEY_NBINARY, KEY_NOBJ, KEY_RTID, KEY_RVIR, KEY_Z,
    OBJ_EXTNAME,
};

const PRIMARY_COMMENTS: [&str; 2] = ["CMC Configured Initial Conditions", "Produced by cmc-ic"];

fn header_cards(header: &ClusterHeader) -> Vec<Card> {
    vec![
        Card::value(KEY_NOBJ, header.nobj as i64).with_comment("number of single stars"),
        Card::value(KEY_NBINARY, header.nbinary as i64).with_comment("number of binaries"),
        Card::value(KEY_MCLUS, header.mass_of_cluster).with_comment("cluster mass [Msun]"),
        Card::value(KEY_RVIR, header.virial_radius).with_comment("virial radius [pc]"),
        Card::value(KEY_RTID, header.tidal_radius).with_comment("tidal radius [pc]"),
        Card::value(KEY_Z, header.metallicity).with_comment("metallicity"),
    ]
}

/// Write padded tables and their header.
pub(crate) fn write_tables(
    path: &Path,
    singles: &DataFrame,
    binaries: &DataFrame,
    header: &ClusterHeader,
) -> Result<()> {
    let mut objects = dataframe_to_table(singles, OBJ_EXTNAME)?;
    for card in header_cards(header) {
        objects.header.push(card);
    }
    let binary_table = dataframe_to_table(binaries, BINARY_EXTNAME)?;

    let mut file = FitsFile::new();
    for comment in PRIMARY_COMMENTS {
        file.primary.push(Card::comment(comment));
    }
    file.add_table(objects);
    file.add_table(binary_table);

    write_fits(path, &file)?;
    debug!(path = %path.display(), "wrote FITS tables");
    Ok(())
}

fn required_f64(header: &Header, keyword: &str) -> Result<f64> {
    header
        .get_f64(keyword)
        .ok_or_else(|| OutputError::missing_keyword(keyword))
}

fn required_count(header: &Header, keyword: &str) -> Result<usize> {
    let value = header
        .get_i64(keyword)
        .ok_or_else(|| OutputError::missing_keyword(keyword))?;
    usize::try_from(value)
        .map_err(|_| OutputError::invalid_layout(format!("{keyword} is negative ({value})")))
}

fn parse_header(table: &BinTable) -> Result<ClusterHeader> {
    let header = &table.header;
    let tidal_radius = match header.get(KEY_RTID) {
        Some(CardValue::Undefined) | None => None,
        Some(value) => value.as_f64().filter(|v| v.is_finite()),
    };
    Ok(ClusterHeader {
        extname: table.name.clone().unwrap_or_else(|| OBJ_EXTNAME.to_string()),
        nobj: required_count(header, KEY_NOBJ)?,
        nbinary: required_count(header, KEY_NBINARY)?,
        mass_of_cluster: required_f64(header, KEY_MCLUS)?,
        virial_radius: required_f64(header, KEY_RVIR)?,
        tidal_radius,
        metallicity: required_f64(header, KEY_Z)?,
    })
}

/// Table by EXTNAME, else the binary table extension at `position`.
///
/// Files from older writers leave the binaries extension unnamed.
fn find_table<'a>(file: &'a FitsFile, name: &str, position: usize) -> Result<&'a BinTable> {
    if let Some(table) = file.table(name) {
        return Ok(table);
    }
    let table = file
        .tables
        .get(position)
        .ok_or_else(|| OutputError::MissingTable {
            name: name.to_string(),
        })?;
    debug!(
        name,
        position,
        found = table.name.as_deref().unwrap_or(""),
        "table located by position"
    );
    Ok(table)
}

/// Read padded tables and their header.
pub(crate) fn read_tables(path: &Path) -> Result<(DataFrame, DataFrame, ClusterHeader)> {
    let file = read_fits(path)?;
    let objects = find_table(&file, OBJ_EXTNAME, 0)?;
    let binaries = find_table(&file, BINARY_EXTNAME, 1)?;

    let header = parse_header(objects)?;
    Ok((
        table_to_dataframe(objects)?,
        table_to_dataframe(binaries)?,
        header,
    ))
}
