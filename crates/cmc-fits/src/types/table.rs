//! Binary table and file containers.

use crate::header::Header;

use super::column::FitsColumn;

/// A BINTABLE extension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BinTable {
    /// Extension name (`EXTNAME`).
    pub name: Option<String>,
    /// Caller-managed cards. Structural keywords are produced by the writer.
    pub header: Header,
    /// Columns in storage order.
    pub columns: Vec<FitsColumn>,
}

impl BinTable {
    /// Create an empty named table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Create a named table with columns.
    pub fn with_columns(name: impl Into<String>, columns: Vec<FitsColumn>) -> Self {
        Self {
            name: Some(name.into()),
            header: Header::new(),
            columns,
        }
    }

    pub fn add_column(&mut self, column: FitsColumn) {
        self.columns.push(column);
    }

    /// Number of rows (length of the first column).
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, FitsColumn::len)
    }

    /// Row width in bytes (`NAXIS1`).
    #[must_use]
    pub fn row_width(&self) -> usize {
        self.columns.iter().map(|c| c.format.width()).sum()
    }

    /// Look up a column by exact name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&FitsColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A FITS file: primary header plus binary table extensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitsFile {
    /// Caller-managed primary cards (comments, history, `DATE`).
    pub primary: Header,
    /// Binary table extensions in file order.
    pub tables: Vec<BinTable>,
}

impl FitsFile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: BinTable) {
        self.tables.push(table);
    }

    /// Look up an extension by `EXTNAME`.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&BinTable> {
        self.tables.iter().find(|t| t.name.as_deref() == Some(name))
    }
}
