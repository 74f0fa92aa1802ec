//! Column names and table schemas.
//!
//! Column order is part of the on-disk layout, so the schema slices below
//! list columns in storage order.

use polars::prelude::DataType;

pub const ID: &str = "id";
pub const K: &str = "k";
pub const M: &str = "m";
pub const REFF: &str = "Reff";
pub const R: &str = "r";
pub const VR: &str = "vr";
pub const VT: &str = "vt";
pub const BININD: &str = "binind";

pub const INDEX: &str = "index";
pub const ID1: &str = "id1";
pub const K1: &str = "k1";
pub const M1: &str = "m1";
pub const REFF1: &str = "Reff1";
pub const ID2: &str = "id2";
pub const K2: &str = "k2";
pub const M2: &str = "m2";
pub const REFF2: &str = "Reff2";
pub const A: &str = "a";
pub const E: &str = "e";

/// Storage class of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
}

impl ColumnKind {
    #[must_use]
    pub fn dtype(self) -> DataType {
        match self {
            Self::Int => DataType::Int64,
            Self::Float => DataType::Float64,
        }
    }
}

/// A named schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn int(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind: ColumnKind::Int,
    }
}

const fn float(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind: ColumnKind::Float,
    }
}

/// Singles table columns.
pub const SINGLES_SCHEMA: &[ColumnSpec] = &[
    int(ID),
    int(K),
    float(M),
    float(REFF),
    float(R),
    float(VR),
    float(VT),
    int(BININD),
];

/// Binaries table columns.
pub const BINARIES_SCHEMA: &[ColumnSpec] = &[
    int(INDEX),
    int(ID1),
    int(K1),
    float(M1),
    float(REFF1),
    int(ID2),
    int(K2),
    float(M2),
    float(REFF2),
    float(A),
    float(E),
];

/// Column names of a schema, in order.
pub fn names(schema: &[ColumnSpec]) -> impl Iterator<Item = &'static str> + '_ {
    schema.iter().map(|spec| spec.name)
}
