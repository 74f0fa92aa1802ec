//! Cluster metadata carried alongside the singles table.

use serde::{Deserialize, Serialize};

/// Physical and unit-system metadata of a cluster.
///
/// Unset values are `None` until a scaling pass, a write or a read records
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterMeta {
    /// Whether masses, radii and velocities are in N-body units.
    pub scaled_to_nbody_units: bool,
    /// Metallicity Z.
    pub metallicity: Option<f64>,
    /// Total physical mass in solar masses, central black hole included.
    pub mass_of_cluster: Option<f64>,
    /// Virial radius in parsecs.
    pub virial_radius: Option<f64>,
    /// Tidal radius in parsecs.
    pub tidal_radius: Option<f64>,
    /// Central black hole mass. Solar masses before scaling, N-body units after.
    pub central_bh: f64,
    /// Include the central black hole potential when scaling.
    pub scale_with_central_bh: bool,
}

impl ClusterMeta {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_metallicity(mut self, metallicity: f64) -> Self {
        self.metallicity = Some(metallicity);
        self
    }

    #[must_use]
    pub fn with_virial_radius(mut self, virial_radius: f64) -> Self {
        self.virial_radius = Some(virial_radius);
        self
    }

    #[must_use]
    pub fn with_tidal_radius(mut self, tidal_radius: f64) -> Self {
        self.tidal_radius = Some(tidal_radius);
        self
    }

    #[must_use]
    pub fn with_central_bh(mut self, mass: f64, scale_with_central_bh: bool) -> Self {
        self.central_bh = mass;
        self.scale_with_central_bh = scale_with_central_bh;
        self
    }
}
