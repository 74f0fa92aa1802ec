//! Black hole injection.

use cmc_model::columns::{R, VR, VT};
use cmc_model::{BinariesTable, SinglesArrays, SinglesTable, StellarType};
use polars::prelude::SortMultipleOptions;
use tracing::{info, warn};

use crate::error::InjectionError;

/// G Msun / c^2 in solar radii.
const GRAVITATIONAL_RADIUS_RSUN: f64 = 2.122e-6;

/// Injected velocities are this fraction of the reference speed.
const VELOCITY_FRACTION: f64 = 0.01;

/// Reference speed used when the column minima give zero.
const FALLBACK_MIN_VELOCITY: f64 = 1e-6;

/// One value or a list of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantities(Vec<f64>);

impl Quantities {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<f64> for Quantities {
    fn from(value: f64) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<f64>> for Quantities {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for Quantities {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl From<&Vec<f64>> for Quantities {
    fn from(values: &Vec<f64>) -> Self {
        Self(values.clone())
    }
}

impl<const N: usize> From<[f64; N]> for Quantities {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

/// What an injection added.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionSummary {
    /// Ids given to the new black holes, in input order.
    pub ids: Vec<i64>,
    pub total_mass: f64,
    /// Radial and tangential velocity given to every black hole.
    pub velocity: f64,
}

fn validate(name: &'static str, values: &Quantities) -> Result<(), InjectionError> {
    if values.is_empty() {
        return Err(InjectionError::Empty { name });
    }
    if let Some((index, value)) = values
        .as_slice()
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
    {
        return Err(InjectionError::NonNumeric {
            name,
            index,
            value: *value,
        });
    }
    if let Some((index, value)) = values
        .as_slice()
        .iter()
        .enumerate()
        .find(|(_, v)| **v <= 0.0)
    {
        return Err(InjectionError::NonPositive {
            name,
            index,
            value: *value,
        });
    }
    Ok(())
}

/// Reference speed `min(|min(vr)|, |min(vt)|)`.
///
/// The column minima are signed, so a strongly negative `vr` can exceed a
/// small positive `vt`. A zero or missing result falls back to the floor.
fn reference_speed(singles: &SinglesTable) -> Result<f64, InjectionError> {
    let lowest = |values: Vec<f64>| values.into_iter().min_by(f64::total_cmp).map(f64::abs);
    let speed = match (lowest(singles.f64_column(VR)?), lowest(singles.f64_column(VT)?)) {
        (Some(vr), Some(vt)) => vr.min(vt),
        _ => 0.0,
    };
    Ok(if speed > 0.0 {
        speed
    } else {
        FALLBACK_MIN_VELOCITY
    })
}

/// Add black holes at the given radii.
///
/// Masses are in the table's current mass unit. New rows get fresh ids above
/// every singles and binaries id, stellar type 14 and a small velocity, and
/// the singles table is re-sorted by `r`. Inputs are validated before the
/// table is touched.
pub fn add_black_holes(
    singles: &mut SinglesTable,
    binaries: &BinariesTable,
    masses: impl Into<Quantities>,
    radii: impl Into<Quantities>,
    print_bhs: bool,
) -> Result<InjectionSummary, InjectionError> {
    let masses = masses.into();
    let radii = radii.into();
    validate("masses", &masses)?;
    validate("radii", &radii)?;
    if masses.len() != radii.len() {
        return Err(InjectionError::LengthMismatch {
            masses: masses.len(),
            radii: radii.len(),
        });
    }

    if singles.meta.scaled_to_nbody_units {
        warn!("injecting black holes into a table already in N-body units");
    }

    let start_id = singles
        .max_id()?
        .max(binaries.max_id()?)
        .map_or(1, |max| max + 1);
    let velocity = VELOCITY_FRACTION * reference_speed(singles)?;

    let n = masses.len();
    let ids: Vec<i64> = (start_id..).take(n).collect();
    let masses = masses.as_slice().to_vec();
    let total_mass: f64 = masses.iter().sum();
    let injected = SinglesTable::from_arrays(SinglesArrays {
        id: ids.clone(),
        k: vec![StellarType::BlackHole.code(); n],
        reff: masses
            .iter()
            .map(|m| 2.0 * GRAVITATIONAL_RADIUS_RSUN * m)
            .collect(),
        m: masses,
        r: radii.as_slice().to_vec(),
        vr: vec![velocity; n],
        vt: vec![velocity; n],
        binind: vec![0; n],
    })?;

    if print_bhs {
        println!("{}", injected.data);
    }

    let mut data = singles.data.clone();
    data.vstack_mut(&injected.data)?;
    singles.data = data.sort([R], SortMultipleOptions::default().with_maintain_order(true))?;

    if let Some(mass) = singles.meta.mass_of_cluster.as_mut() {
        *mass += total_mass;
    }

    info!(
        count = n,
        first_id = start_id,
        total_mass,
        velocity,
        "added black holes"
    );

    Ok(InjectionSummary {
        ids,
        total_mass,
        velocity,
    })
}
