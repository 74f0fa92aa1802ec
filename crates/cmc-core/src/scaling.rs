//! Conversion to N-body units.
//!
//! N-body units fix the total mass to 1, the kinetic energy to 0.25 and the
//! potential energy to -0.5. Stars are treated as spherical shells sorted by
//! radius, so the potential follows from the enclosed mass alone.

use cmc_model::columns::{A, M, M1, M2, R, REFF, REFF1, REFF2, VR, VT};
use cmc_model::frame::{f64_values, set_f64_values};
use cmc_model::{BinariesTable, SinglesTable};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ScalingError;

/// Parsecs per solar radius.
pub const PARSEC_PER_RSUN: f64 = 2.2546101516664447e-08;

/// Radius of the shell beyond the outermost star.
const OUTER_SHELL_RADIUS: f64 = 1e100;

/// Parameters of a scaling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingParams {
    /// Virial radius in parsecs.
    pub virial_radius: f64,
    /// Central black hole mass in solar masses.
    pub central_bh: f64,
    /// Add the central black hole to the potential.
    pub scale_with_central_bh: bool,
}

impl Default for ScalingParams {
    fn default() -> Self {
        Self {
            virial_radius: 1.0,
            central_bh: 0.0,
            scale_with_central_bh: false,
        }
    }
}

impl ScalingParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_virial_radius(mut self, virial_radius: f64) -> Self {
        self.virial_radius = virial_radius;
        self
    }

    #[must_use]
    pub fn with_central_bh(mut self, central_bh: f64, scale_with_central_bh: bool) -> Self {
        self.central_bh = central_bh;
        self.scale_with_central_bh = scale_with_central_bh;
        self
    }
}

/// Kinetic and potential energy of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Energies {
    pub kinetic: f64,
    /// Magnitude of the (negative) potential energy.
    pub potential: f64,
}

impl Energies {
    /// Kinetic over potential energy; 0.5 in virial equilibrium.
    #[must_use]
    pub fn virial_ratio(&self) -> f64 {
        self.kinetic / self.potential
    }
}

/// Diagnostics of a scaling pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalingReport {
    /// Total singles mass before normalization.
    pub total_mass: f64,
    /// Energies after mass normalization, before rescaling positions and
    /// velocities.
    pub energies: Energies,
    pub rfac: f64,
    pub vfac: f64,
    /// Solar radii to N-body length units.
    pub dist_conv: f64,
}

/// Energies from the shell discretization.
///
/// `central_bh` adds a point mass at the center to the potential.
pub(crate) fn shell_energies(
    m: &[f64],
    r: &[f64],
    vr: &[f64],
    vt: &[f64],
    central_bh: Option<f64>,
) -> Energies {
    let kinetic = 0.5
        * m.iter()
            .zip(vr.iter().zip(vt))
            .map(|(m, (vr, vt))| m * (vr * vr + vt * vt))
            .sum::<f64>();

    let mut enclosed = 0.0;
    let shells: Vec<f64> = m
        .iter()
        .enumerate()
        .map(|(i, mass)| {
            enclosed += mass;
            let r_next = r.get(i + 1).copied().unwrap_or(OUTER_SHELL_RADIUS);
            enclosed * (1.0 / r[i] - 1.0 / r_next)
        })
        .collect();

    let mut outer_sum = 0.0;
    let mut potential = 0.0;
    for (mass, shell) in m.iter().zip(&shells).rev() {
        outer_sum += shell;
        potential += mass * outer_sum;
    }
    potential *= 0.5;

    if let Some(bh) = central_bh {
        potential += m.iter().zip(r).map(|(m, r)| bh * m / r).sum::<f64>();
    }

    Energies { kinetic, potential }
}

/// Energies of a singles table in its current units.
///
/// The central black hole term is included when the metadata asks for it.
pub fn cluster_energies(singles: &SinglesTable) -> Result<Energies, ScalingError> {
    let central_bh = singles
        .meta
        .scale_with_central_bh
        .then_some(singles.meta.central_bh);
    Ok(shell_energies(
        &f64_values(&singles.data, M)?,
        &f64_values(&singles.data, R)?,
        &f64_values(&singles.data, VR)?,
        &f64_values(&singles.data, VT)?,
        central_bh,
    ))
}

/// Rescale both tables to N-body units in place.
///
/// Singles must be sorted by `r`. Degenerate input (zero mass, zero or
/// repeated radii) is not rejected: non-finite factors are logged and
/// propagate into the tables.
pub fn scale_to_nbody_units(
    singles: &mut SinglesTable,
    binaries: &mut BinariesTable,
    params: &ScalingParams,
) -> Result<ScalingReport, ScalingError> {
    if singles.meta.scaled_to_nbody_units {
        warn!("singles table is already in N-body units; scaling again");
    }

    // Read every column up front so a missing column leaves both tables untouched.
    let m = f64_values(&singles.data, M)?;
    let r = f64_values(&singles.data, R)?;
    let vr = f64_values(&singles.data, VR)?;
    let vt = f64_values(&singles.data, VT)?;
    let reff = f64_values(&singles.data, REFF)?;
    let m1 = f64_values(&binaries.data, M1)?;
    let m2 = f64_values(&binaries.data, M2)?;
    let a = f64_values(&binaries.data, A)?;
    let reff1 = f64_values(&binaries.data, REFF1)?;
    let reff2 = f64_values(&binaries.data, REFF2)?;

    let total_mass: f64 = m.iter().sum();
    let normalize = |values: Vec<f64>| -> Vec<f64> {
        values.into_iter().map(|v| v / total_mass).collect()
    };
    let m = normalize(m);
    let central_bh = params.central_bh / total_mass;
    debug!(total_mass, central_bh, "normalized masses");

    let energies = shell_energies(
        &m,
        &r,
        &vr,
        &vt,
        params.scale_with_central_bh.then_some(central_bh),
    );
    let rfac = 2.0 * energies.potential;
    let vfac = 1.0 / (4.0 * energies.kinetic).sqrt();
    let dist_conv = PARSEC_PER_RSUN / params.virial_radius;
    debug!(
        kinetic = energies.kinetic,
        potential = energies.potential,
        rfac,
        vfac,
        dist_conv,
        "scale factors"
    );
    if !(rfac.is_finite() && vfac.is_finite() && dist_conv.is_finite()) {
        warn!(
            rfac,
            vfac, dist_conv, "non-finite scale factor, values will propagate into the tables"
        );
    }

    let scale = |values: Vec<f64>, factor: f64| -> Vec<f64> {
        values.into_iter().map(|v| v * factor).collect()
    };

    set_f64_values(&mut singles.data, M, m)?;
    set_f64_values(&mut singles.data, R, scale(r, rfac))?;
    set_f64_values(&mut singles.data, VR, scale(vr, vfac))?;
    set_f64_values(&mut singles.data, VT, scale(vt, vfac))?;
    set_f64_values(&mut singles.data, REFF, scale(reff, dist_conv))?;

    set_f64_values(&mut binaries.data, M1, normalize(m1))?;
    set_f64_values(&mut binaries.data, M2, normalize(m2))?;
    set_f64_values(&mut binaries.data, A, scale(a, dist_conv))?;
    set_f64_values(&mut binaries.data, REFF1, scale(reff1, dist_conv))?;
    set_f64_values(&mut binaries.data, REFF2, scale(reff2, dist_conv))?;

    singles.meta.central_bh = central_bh;
    singles.meta.scale_with_central_bh = params.scale_with_central_bh;
    singles.meta.virial_radius = Some(params.virial_radius);
    singles.meta.scaled_to_nbody_units = true;
    binaries.scaled_to_nbody_units = true;

    info!(
        singles = singles.height(),
        binaries = binaries.height(),
        total_mass,
        "scaled cluster to N-body units"
    );

    Ok(ScalingReport {
        total_mass,
        energies,
        rfac,
        vfac,
        dist_conv,
    })
}

/// Scaled copies of both tables; the inputs are left as they are.
pub fn scaled_to_nbody_units(
    singles: &SinglesTable,
    binaries: &BinariesTable,
    params: &ScalingParams,
) -> Result<(SinglesTable, BinariesTable), ScalingError> {
    let mut singles = singles.clone();
    let mut binaries = binaries.clone();
    scale_to_nbody_units(&mut singles, &mut binaries, params)?;
    Ok((singles, binaries))
}
