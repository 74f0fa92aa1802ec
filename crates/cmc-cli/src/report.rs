//! Per-stellar-type breakdown of a cluster file.

use std::collections::BTreeMap;

use cmc_model::columns::{K, M};
use cmc_model::{ModelError, SinglesTable, StellarType};
use cmc_output::{ClusterFile, ClusterFileSummary, OutputError, strip_sentinels};
use serde::Serialize;

/// Label for codes outside the stellar type table.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Count and total mass of the singles of one stellar type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSummary {
    pub code: i64,
    pub label: &'static str,
    pub count: usize,
    /// Sum of `m` in N-body units.
    pub mass: f64,
}

/// What `inspect` prints.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport<'a> {
    #[serde(flatten)]
    pub file: ClusterFileSummary<'a>,
    pub stellar_types: Vec<TypeSummary>,
}

/// Group singles by `k`, in code order.
pub fn summarize_types(singles: &SinglesTable) -> Result<Vec<TypeSummary>, ModelError> {
    let codes = singles.i64_column(K)?;
    let masses = singles.f64_column(M)?;

    let mut groups: BTreeMap<i64, (usize, f64)> = BTreeMap::new();
    for (code, mass) in codes.into_iter().zip(masses) {
        let entry = groups.entry(code).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += mass;
    }
    Ok(groups
        .into_iter()
        .map(|(code, (count, mass))| TypeSummary {
            code,
            label: StellarType::from_code(code).map_or(UNKNOWN_TYPE, StellarType::label),
            count,
            mass,
        })
        .collect())
}

/// Summarize a file read with [`cmc_output::read_cluster_file`].
///
/// Sentinel rows are excluded from the stellar type counts.
pub fn build_report(file: &ClusterFile) -> Result<InspectReport<'_>, OutputError> {
    let (singles, _) = strip_sentinels(&file.singles, &file.binaries)?;
    Ok(InspectReport {
        file: file.summary(),
        stellar_types: summarize_types(&singles)?,
    })
}
