//! Cluster data model: table schemas, stellar types and metadata.

pub mod columns;
pub mod error;
pub mod frame;
pub mod meta;
pub mod stellar;
pub mod table;

pub use columns::{BINARIES_SCHEMA, ColumnKind, ColumnSpec, SINGLES_SCHEMA};
pub use error::{ModelError, Result};
pub use meta::ClusterMeta;
pub use stellar::StellarType;
pub use table::{BinariesArrays, BinariesTable, SinglesArrays, SinglesTable};
