//! Binary table column definitions.

use crate::error::{FitsError, Result};

/// Column storage format (`TFORMn` type code).
///
/// Only scalar cells (repeat count 1) are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    /// `B`: unsigned byte.
    UInt8,
    /// `I`: 16-bit integer.
    Int16,
    /// `J`: 32-bit integer.
    Int32,
    /// `K`: 64-bit integer.
    Int64,
    /// `E`: single precision float.
    Float32,
    /// `D`: double precision float.
    Float64,
}

impl ColumnFormat {
    /// The TFORM type code.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::UInt8 => 'B',
            Self::Int16 => 'I',
            Self::Int32 => 'J',
            Self::Int64 => 'K',
            Self::Float32 => 'E',
            Self::Float64 => 'D',
        }
    }

    /// Cell width in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::UInt8 => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
        }
    }

    #[must_use]
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::Float32 | Self::Float64)
    }

    /// TFORM value written to the header, e.g. `1K`.
    #[must_use]
    pub fn tform(self) -> String {
        format!("1{}", self.code())
    }

    /// Parse a TFORM value such as `K`, `1D` or `1J`.
    pub fn from_tform(tform: &str) -> Result<Self> {
        let trimmed = tform.trim();
        let unsupported = || FitsError::UnsupportedFormat {
            tform: tform.to_string(),
        };
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(unsupported)?;
        let (repeat, rest) = trimmed.split_at(split);
        if !(repeat.is_empty() || repeat == "1") {
            return Err(unsupported());
        }
        let mut chars = rest.chars();
        let format = match chars.next() {
            Some('B') => Self::UInt8,
            Some('I') => Self::Int16,
            Some('J') => Self::Int32,
            Some('K') => Self::Int64,
            Some('E') => Self::Float32,
            Some('D') => Self::Float64,
            _ => return Err(unsupported()),
        };
        if chars.next().is_some() {
            return Err(unsupported());
        }
        Ok(format)
    }
}

/// Column values.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl ColumnData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int(values) => values.len(),
            Self::Float(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named binary table column.
#[derive(Debug, Clone, PartialEq)]
pub struct FitsColumn {
    /// Column name (`TTYPEn`).
    pub name: String,
    /// Storage format (`TFORMn`).
    pub format: ColumnFormat,
    /// Cell values, one per row.
    pub data: ColumnData,
}

impl FitsColumn {
    /// Create a 64-bit integer column.
    pub fn int64(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            format: ColumnFormat::Int64,
            data: ColumnData::Int(values),
        }
    }

    /// Create a double precision column.
    pub fn float64(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            format: ColumnFormat::Float64,
            data: ColumnData::Float(values),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<&[i64]> {
        match &self.data {
            ColumnData::Int(values) => Some(values),
            ColumnData::Float(_) => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Float(values) => Some(values),
            ColumnData::Int(_) => None,
        }
    }
}
