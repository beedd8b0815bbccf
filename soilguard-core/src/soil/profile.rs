//! Soil profile selection

use core::fmt;

use crate::errors::ValidationError;

/// Coarse soil classification selecting which coefficients apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SoilProfile {
    /// Coarse mineral soil, low porosity
    Sand,
    /// Balanced mineral soil
    #[default]
    Loam,
    /// Organic substrate, very high porosity
    Peat,
    /// Fine mineral soil, high cation exchange
    Clay,
    /// Mixed potting substrate
    SandPeat,
}

impl SoilProfile {
    /// Number of profiles
    pub const COUNT: usize = 5;

    /// All profiles in configuration-index order
    pub const ALL: [SoilProfile; SoilProfile::COUNT] = [
        SoilProfile::Sand,
        SoilProfile::Loam,
        SoilProfile::Peat,
        SoilProfile::Clay,
        SoilProfile::SandPeat,
    ];

    /// Index stored in configuration
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sand => "sand",
            Self::Loam => "loam",
            Self::Peat => "peat",
            Self::Clay => "clay",
            Self::SandPeat => "sand_peat",
        }
    }

    /// Resolve a stored configuration index
    ///
    /// Unknown indices select loam and return the warning to record.
    pub fn from_index_or_loam(index: u8) -> (SoilProfile, Option<ValidationError>) {
        match SoilProfile::try_from(index) {
            Ok(profile) => (profile, None),
            Err(err) => (SoilProfile::Loam, Some(err)),
        }
    }
}

impl TryFrom<u8> for SoilProfile {
    type Error = ValidationError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        SoilProfile::ALL
            .get(index as usize)
            .copied()
            .ok_or(ValidationError::UnknownSoilProfile { requested: index })
    }
}

impl fmt::Display for SoilProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SoilProfile {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.name())
    }
}
