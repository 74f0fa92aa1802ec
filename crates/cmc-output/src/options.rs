//! Write overrides.

/// Values that take precedence over the singles table metadata on write.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WriteOverrides {
    /// Virial radius in parsecs.
    pub virial_radius: Option<f64>,
    /// Tidal radius in parsecs.
    pub tidal_radius: Option<f64>,
    pub metallicity: Option<f64>,
    /// Central black hole mass in solar masses. Only used when the tables
    /// still need scaling.
    pub central_bh: Option<f64>,
    pub scale_with_central_bh: Option<bool>,
}

impl WriteOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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
    pub fn with_metallicity(mut self, metallicity: f64) -> Self {
        self.metallicity = Some(metallicity);
        self
    }

    #[must_use]
    pub fn with_central_bh(mut self, central_bh: f64) -> Self {
        self.central_bh = Some(central_bh);
        self
    }

    #[must_use]
    pub fn with_scale_with_central_bh(mut self, enabled: bool) -> Self {
        self.scale_with_central_bh = Some(enabled);
        self
    }
}
