//! Immutable registry of per-profile coefficients
//!
//! ## Coefficient Table
//!
//! | Profile  | φ    | m   | n   | N / P / K baseline (mg/kg) |
//! |----------|------|-----|-----|----------------------------|
//! | Sand     | 0.35 | 1.3 | 2.0 | 20 / 10 / 80               |
//! | Loam     | 0.45 | 1.5 | 2.0 | 40 / 20 / 150              |
//! | Peat     | 0.80 | 1.8 | 2.2 | 60 / 15 / 100              |
//! | Clay     | 0.50 | 2.0 | 2.5 | 50 / 25 / 250              |
//! | SandPeat | 0.60 | 1.6 | 2.1 | 40 / 12 / 90               |
//!
//! Nutrient slopes are shared across profiles: N 0.010, P 0.006, K 0.008
//! fractional change per percent moisture away from the reference. Built-in
//! temperature and moisture offsets are zero; custom registries may set them
//! for a sensor with a known bias.
//!
//! ## Fallback
//!
//! A registry may be built with only some profiles defined. Looking up a
//! missing profile returns the loam entry (the built-in loam if the registry
//! has none) with `fell_back` set, so the caller can record an
//! `UnknownSoilProfile` warning while the sensor keeps producing readings.

use super::SoilProfile;
use crate::channel::Channel;

/// Archie's-law parameters of a porous medium
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchieCoefficients {
    /// Porosity φ, fraction in (0, 1)
    pub porosity: f32,
    /// Cementation exponent m
    pub cementation: f32,
    /// Saturation exponent n
    pub saturation: f32,
}

impl ArchieCoefficients {
    /// Coefficients from porosity, cementation and saturation exponents
    pub const fn new(porosity: f32, cementation: f32, saturation: f32) -> Self {
        Self {
            porosity,
            cementation,
            saturation,
        }
    }
}

/// Baseline concentration and moisture slope of one nutrient
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpkReference {
    /// Typical concentration in this soil (mg/kg)
    pub baseline: f32,
    /// Fractional change of the reading per percent moisture
    pub slope: f32,
}

impl NpkReference {
    /// Reference from baseline and slope
    pub const fn new(baseline: f32, slope: f32) -> Self {
        Self { baseline, slope }
    }
}

/// Nutrient references of one profile
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpkReferences {
    /// Nitrogen
    pub nitrogen: NpkReference,
    /// Phosphorus
    pub phosphorus: NpkReference,
    /// Potassium
    pub potassium: NpkReference,
}

impl NpkReferences {
    const N_SLOPE: f32 = 0.010;
    const P_SLOPE: f32 = 0.006;
    const K_SLOPE: f32 = 0.008;

    /// References with the shared slopes and the given baselines
    pub const fn with_baselines(nitrogen: f32, phosphorus: f32, potassium: f32) -> Self {
        Self {
            nitrogen: NpkReference::new(nitrogen, Self::N_SLOPE),
            phosphorus: NpkReference::new(phosphorus, Self::P_SLOPE),
            potassium: NpkReference::new(potassium, Self::K_SLOPE),
        }
    }

    /// Reference of a nutrient channel, `None` for other channels
    pub fn get(&self, channel: Channel) -> Option<&NpkReference> {
        match channel {
            Channel::Nitrogen => Some(&self.nitrogen),
            Channel::Phosphorus => Some(&self.phosphorus),
            Channel::Potassium => Some(&self.potassium),
            _ => None,
        }
    }
}

/// Everything the compensation engine needs about a soil
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileParameters {
    /// Archie's-law coefficients
    pub archie: ArchieCoefficients,
    /// Nutrient references
    pub npk: NpkReferences,
    /// Added to the filtered temperature (°C)
    pub temperature_offset: f32,
    /// Added to the filtered moisture (%)
    pub moisture_offset: f32,
}

impl ProfileParameters {
    /// Built-in parameters of a profile
    pub const fn builtin(profile: SoilProfile) -> Self {
        match profile {
            SoilProfile::Sand => Self::without_offsets(
                ArchieCoefficients::new(0.35, 1.3, 2.0),
                NpkReferences::with_baselines(20.0, 10.0, 80.0),
            ),
            SoilProfile::Loam => Self::without_offsets(
                ArchieCoefficients::new(0.45, 1.5, 2.0),
                NpkReferences::with_baselines(40.0, 20.0, 150.0),
            ),
            SoilProfile::Peat => Self::without_offsets(
                ArchieCoefficients::new(0.80, 1.8, 2.2),
                NpkReferences::with_baselines(60.0, 15.0, 100.0),
            ),
            SoilProfile::Clay => Self::without_offsets(
                ArchieCoefficients::new(0.50, 2.0, 2.5),
                NpkReferences::with_baselines(50.0, 25.0, 250.0),
            ),
            SoilProfile::SandPeat => Self::without_offsets(
                ArchieCoefficients::new(0.60, 1.6, 2.1),
                NpkReferences::with_baselines(40.0, 12.0, 90.0),
            ),
        }
    }

    const fn without_offsets(archie: ArchieCoefficients, npk: NpkReferences) -> Self {
        Self {
            archie,
            npk,
            temperature_offset: 0.0,
            moisture_offset: 0.0,
        }
    }
}

/// Result of a registry lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileLookup {
    /// Parameters to use
    pub parameters: ProfileParameters,
    /// The requested profile was undefined and loam was used
    pub fell_back: bool,
}

/// Per-profile parameters, fixed after construction
#[derive(Debug, Clone, PartialEq)]
pub struct SoilProfileRegistry {
    entries: [Option<ProfileParameters>; SoilProfile::COUNT],
}

impl Default for SoilProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SoilProfileRegistry {
    /// Registry holding the built-in table for all five profiles
    pub fn builtin() -> Self {
        Self {
            entries: SoilProfile::ALL.map(|p| Some(ProfileParameters::builtin(p))),
        }
    }

    /// Registry with no profile defined
    pub fn empty() -> Self {
        Self {
            entries: [None; SoilProfile::COUNT],
        }
    }

    /// Define or override one profile
    pub fn with_profile(mut self, profile: SoilProfile, parameters: ProfileParameters) -> Self {
        self.entries[profile.index()] = Some(parameters);
        self
    }

    /// True if the profile has its own entry
    pub fn contains(&self, profile: SoilProfile) -> bool {
        self.entries[profile.index()].is_some()
    }

    /// Parameters of a profile, loam if undefined
    pub fn lookup(&self, profile: SoilProfile) -> ProfileLookup {
        match self.entries[profile.index()] {
            Some(parameters) => ProfileLookup {
                parameters,
                fell_back: false,
            },
            None => {
                log_warn!("soil profile {} undefined, using loam", profile);
                ProfileLookup {
                    parameters: self.entries[SoilProfile::Loam.index()]
                        .unwrap_or(ProfileParameters::builtin(SoilProfile::Loam)),
                    fell_back: true,
                }
            }
        }
    }

    /// Archie coefficients of a profile
    pub fn coefficients_for(&self, profile: SoilProfile) -> ArchieCoefficients {
        self.lookup(profile).parameters.archie
    }

    /// Nutrient references of a profile
    pub fn references_for(&self, profile: SoilProfile) -> NpkReferences {
        self.lookup(profile).parameters.npk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_coefficients() {
        let registry = SoilProfileRegistry::builtin();

        assert_eq!(
            registry.coefficients_for(SoilProfile::Sand),
            ArchieCoefficients::new(0.35, 1.3, 2.0)
        );
        assert_eq!(registry.coefficients_for(SoilProfile::Clay).saturation, 2.5);
        assert_eq!(registry.references_for(SoilProfile::Clay).potassium.baseline, 250.0);
    }

    #[test]
    fn every_builtin_profile_is_physical() {
        for profile in SoilProfile::ALL {
            let archie = ProfileParameters::builtin(profile).archie;
            assert!(archie.porosity > 0.0 && archie.porosity < 1.0, "{profile}");
            assert!(archie.cementation > 0.0);
            assert!(archie.saturation > 0.0);
        }
    }

    #[test]
    fn builtin_offsets_are_zero() {
        for profile in SoilProfile::ALL {
            let parameters = ProfileParameters::builtin(profile);
            assert_eq!(parameters.temperature_offset, 0.0, "{profile}");
            assert_eq!(parameters.moisture_offset, 0.0, "{profile}");
        }
    }

    #[test]
    fn missing_profile_falls_back_to_loam() {
        let registry = SoilProfileRegistry::empty()
            .with_profile(SoilProfile::Sand, ProfileParameters::builtin(SoilProfile::Sand));

        let lookup = registry.lookup(SoilProfile::Peat);
        assert!(lookup.fell_back);
        assert_eq!(lookup.parameters, ProfileParameters::builtin(SoilProfile::Loam));

        let lookup = registry.lookup(SoilProfile::Sand);
        assert!(!lookup.fell_back);
    }

    #[test]
    fn fallback_prefers_registry_loam() {
        let custom = ProfileParameters {
            temperature_offset: 0.5,
            ..ProfileParameters::builtin(SoilProfile::Loam)
        };
        let registry = SoilProfileRegistry::empty().with_profile(SoilProfile::Loam, custom);

        assert_eq!(registry.lookup(SoilProfile::Clay).parameters, custom);
    }

    #[test]
    fn nutrient_reference_by_channel() {
        let refs = NpkReferences::with_baselines(1.0, 2.0, 3.0);
        assert_eq!(refs.get(Channel::Phosphorus).map(|r| r.baseline), Some(2.0));
        assert!(refs.get(Channel::Ph).is_none());
    }
}
