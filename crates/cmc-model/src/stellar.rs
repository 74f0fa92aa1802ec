//! BSE stellar type codes.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Stellar evolution phase, using the BSE integer codes 0-14.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i64)]
pub enum StellarType {
    /// Deeply or fully convective low mass main sequence star.
    LowMassMainSequence = 0,
    MainSequence = 1,
    HertzsprungGap = 2,
    FirstGiantBranch = 3,
    CoreHeliumBurning = 4,
    EarlyAsymptoticGiantBranch = 5,
    ThermallyPulsingAsymptoticGiantBranch = 6,
    NakedHeliumMainSequence = 7,
    NakedHeliumHertzsprungGap = 8,
    NakedHeliumGiantBranch = 9,
    HeliumWhiteDwarf = 10,
    CarbonOxygenWhiteDwarf = 11,
    OxygenNeonWhiteDwarf = 12,
    NeutronStar = 13,
    BlackHole = 14,
}

impl StellarType {
    pub const ALL: [Self; 15] = [
        Self::LowMassMainSequence,
        Self::MainSequence,
        Self::HertzsprungGap,
        Self::FirstGiantBranch,
        Self::CoreHeliumBurning,
        Self::EarlyAsymptoticGiantBranch,
        Self::ThermallyPulsingAsymptoticGiantBranch,
        Self::NakedHeliumMainSequence,
        Self::NakedHeliumHertzsprungGap,
        Self::NakedHeliumGiantBranch,
        Self::HeliumWhiteDwarf,
        Self::CarbonOxygenWhiteDwarf,
        Self::OxygenNeonWhiteDwarf,
        Self::NeutronStar,
        Self::BlackHole,
    ];

    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Stellar type for a code, if it is one of 0-14.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Short label used in summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowMassMainSequence => "MS (M < 0.7)",
            Self::MainSequence => "MS",
            Self::HertzsprungGap => "HG",
            Self::FirstGiantBranch => "GB",
            Self::CoreHeliumBurning => "CHeB",
            Self::EarlyAsymptoticGiantBranch => "EAGB",
            Self::ThermallyPulsingAsymptoticGiantBranch => "TPAGB",
            Self::NakedHeliumMainSequence => "HeMS",
            Self::NakedHeliumHertzsprungGap => "HeHG",
            Self::NakedHeliumGiantBranch => "HeGB",
            Self::HeliumWhiteDwarf => "HeWD",
            Self::CarbonOxygenWhiteDwarf => "COWD",
            Self::OxygenNeonWhiteDwarf => "ONeWD",
            Self::NeutronStar => "NS",
            Self::BlackHole => "BH",
        }
    }
}

impl std::fmt::Display for StellarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Check one stellar type column, reporting the first bad row.
pub(crate) fn check_codes(column: &'static str, codes: &[i64]) -> Result<(), ModelError> {
    match codes
        .iter()
        .enumerate()
        .find(|(_, code)| StellarType::from_code(**code).is_none())
    {
        Some((row, value)) => Err(ModelError::InvalidStellarType {
            column,
            row,
            value: *value,
        }),
        None => Ok(()),
    }
}
