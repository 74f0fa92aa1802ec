//! Integration tests for the inspect report.

use cmc_cli::report::build_report;
use cmc_model::{BinariesTable, ClusterMeta, SinglesArrays, SinglesTable};
use cmc_output::{WriteOverrides, read_cluster_file, write_cluster};
use tempfile::TempDir;

#[test]
fn report_excludes_sentinels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ic.fits");
    let mut singles = SinglesTable::from_arrays(SinglesArrays {
        id: vec![1, 2, 3],
        k: vec![1, 1, 14],
        m: vec![1.0, 1.0, 2.0],
        reff: vec![1.0, 1.0, 0.0],
        r: vec![0.5, 1.0, 2.0],
        vr: vec![0.1, -0.1, 0.0],
        vt: vec![0.2, 0.3, 0.1],
        binind: vec![0, 0, 0],
    })
    .unwrap()
    .with_meta(ClusterMeta::new().with_metallicity(0.02));
    let mut binaries = BinariesTable::empty().unwrap();
    write_cluster(&mut singles, &mut binaries, &path, &WriteOverrides::new()).unwrap();

    let file = read_cluster_file(&path).unwrap();
    let report = build_report(&file).unwrap();
    assert_eq!(report.stellar_types.len(), 2);
    assert_eq!(report.stellar_types[0].code, 1);
    assert_eq!(report.stellar_types[0].count, 2);
    assert_eq!(report.stellar_types[1].label, "BH");
    assert_eq!(report.stellar_types[1].mass, 0.5);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["header"]["nobj"], 3);
    assert_eq!(json["header"]["nbinary"], 0);
    assert_eq!(json["stored_singles_rows"], 5);
    assert_eq!(json["stored_binary_rows"], 1);
    assert_eq!(json["stellar_types"][1]["count"], 1);
}
