//! Integration tests for N-body unit scaling.

use cmc_core::{
    PARSEC_PER_RSUN, ScalingParams, cluster_energies, scale_to_nbody_units,
    scaled_to_nbody_units,
};
use cmc_model::columns::{A, M, M1, M2, R, REFF, REFF1};
use cmc_model::{BinariesArrays, BinariesTable, SinglesArrays, SinglesTable};
use proptest::prelude::*;

const TOL: f64 = 1e-9;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOL * b.abs().max(1.0)
}

fn singles(m: Vec<f64>, r: Vec<f64>, v: Vec<f64>) -> SinglesTable {
    let n = m.len();
    SinglesTable::from_arrays(SinglesArrays {
        id: (1..=n as i64).collect(),
        k: vec![1; n],
        reff: vec![1.0; n],
        vr: v.clone(),
        vt: v.iter().map(|x| 0.5 * x).collect(),
        binind: vec![0; n],
        m,
        r,
    })
    .unwrap()
}

fn binaries() -> BinariesTable {
    BinariesTable::from_arrays(BinariesArrays {
        index: vec![1],
        id1: vec![100],
        k1: vec![1],
        m1: vec![2.0],
        reff1: vec![1.0],
        id2: vec![101],
        k2: vec![1],
        m2: vec![1.0],
        reff2: vec![0.5],
        a: vec![50.0],
        e: vec![0.3],
    })
    .unwrap()
}

fn small_cluster() -> SinglesTable {
    singles(
        vec![1.0, 2.0, 3.0, 4.0],
        vec![0.1, 0.4, 0.9, 2.0],
        vec![0.3, 0.2, 0.5, 0.1],
    )
}

#[test]
fn reaches_nbody_units() {
    let mut s = small_cluster();
    let mut b = binaries();
    let report = scale_to_nbody_units(&mut s, &mut b, &ScalingParams::default()).unwrap();

    assert_eq!(report.total_mass, 10.0);
    assert!(close(s.total_mass().unwrap(), 1.0));
    let energies = cluster_energies(&s).unwrap();
    assert!(close(energies.kinetic, 0.25));
    assert!(close(energies.potential, 0.5));
    assert!(close(energies.virial_ratio(), 0.5));

    assert!(s.meta.scaled_to_nbody_units);
    assert!(b.scaled_to_nbody_units);
    assert_eq!(s.meta.virial_radius, Some(1.0));
}

#[test]
fn binaries_follow_singles() {
    let mut s = small_cluster();
    let mut b = binaries();
    let params = ScalingParams::new().with_virial_radius(2.0);
    scale_to_nbody_units(&mut s, &mut b, &params).unwrap();

    assert!(close(b.f64_column(M1).unwrap()[0], 0.2));
    assert!(close(b.f64_column(M2).unwrap()[0], 0.1));
    let dist_conv = PARSEC_PER_RSUN / 2.0;
    assert!(close(b.f64_column(A).unwrap()[0], 50.0 * dist_conv));
    assert!(close(b.f64_column(REFF1).unwrap()[0], dist_conv));
    assert!(close(s.f64_column(REFF).unwrap()[0], dist_conv));
}

#[test]
fn central_black_hole_is_normalized() {
    let mut s = small_cluster();
    let mut b = binaries();
    let params = ScalingParams::new().with_central_bh(5.0, true);
    scale_to_nbody_units(&mut s, &mut b, &params).unwrap();

    assert!(close(s.meta.central_bh, 0.5));
    assert!(s.meta.scale_with_central_bh);
    let energies = cluster_energies(&s).unwrap();
    assert!(close(energies.potential, 0.5));
    assert!(close(energies.kinetic, 0.25));
}

#[test]
fn cloning_variant_leaves_inputs() {
    let s = small_cluster();
    let b = binaries();
    let (scaled, scaled_b) = scaled_to_nbody_units(&s, &b, &ScalingParams::default()).unwrap();

    assert_eq!(s.f64_column(M).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    assert!(!s.meta.scaled_to_nbody_units);
    assert!(!b.scaled_to_nbody_units);
    assert!(scaled.meta.scaled_to_nbody_units);
    assert!(scaled_b.scaled_to_nbody_units);
}

#[test]
fn zero_radius_propagates_non_finite() {
    let mut s = singles(vec![1.0, 1.0], vec![0.0, 1.0], vec![0.1, 0.2]);
    let mut b = BinariesTable::empty().unwrap();
    let report = scale_to_nbody_units(&mut s, &mut b, &ScalingParams::default()).unwrap();
    assert!(!report.rfac.is_finite());
    assert!(s.f64_column(R).unwrap().iter().any(|r| !r.is_finite()));
}

#[test]
fn zero_total_mass_propagates_non_finite() {
    let mut s = singles(vec![0.0, 0.0, 0.0], vec![0.2, 0.5, 1.0], vec![0.1, 0.2, 0.3]);
    let mut b = binaries();
    let report = scale_to_nbody_units(&mut s, &mut b, &ScalingParams::default()).unwrap();

    assert_eq!(report.total_mass, 0.0);
    assert!(s.f64_column(M).unwrap().iter().all(|m| !m.is_finite()));
    assert!(s.f64_column(R).unwrap().iter().all(|r| !r.is_finite()));
    assert!(b.f64_column(M1).unwrap().iter().all(|m| !m.is_finite()));
    assert!(b.f64_column(M2).unwrap().iter().all(|m| !m.is_finite()));
    assert!(s.meta.scaled_to_nbody_units);
}

proptest! {
    #[test]
    fn prop_scaled_energies(
        stars in prop::collection::vec((0.1f64..10.0, 0.01f64..1.0, 0.01f64..1.0), 2..40),
        central_bh in 0.0f64..50.0,
        with_bh in any::<bool>(),
    ) {
        let mut radius = 0.0;
        let mut m = Vec::new();
        let mut r = Vec::new();
        let mut v = Vec::new();
        for (mass, step, speed) in stars {
            radius += step;
            m.push(mass);
            r.push(radius);
            v.push(speed);
        }
        let mut s = singles(m, r, v);
        let mut b = binaries();
        let params = ScalingParams::new().with_central_bh(central_bh, with_bh);
        scale_to_nbody_units(&mut s, &mut b, &params).unwrap();

        prop_assert!(close(s.total_mass().unwrap(), 1.0));
        let energies = cluster_energies(&s).unwrap();
        prop_assert!(close(energies.kinetic, 0.25));
        prop_assert!(close(energies.potential, 0.5));

        let radii = s.f64_column(R).unwrap();
        prop_assert!(radii.windows(2).all(|w| w[0] < w[1]));
    }
}
