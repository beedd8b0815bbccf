//! Physics-Based Compensation Engine
//!
//! ## Overview
//!
//! Compensation corrects a filtered reading for the conditions it was taken
//! in, so that values from different temperatures, moisture levels and soils
//! become comparable. Each channel has its own pure correction:
//!
//! | Channel        | Correction                                        |
//! |----------------|---------------------------------------------------|
//! | EC             | temperature factor, then Archie moisture ratio    |
//! | pH             | linear temperature coefficient                    |
//! | N / P / K      | reading × (1 − slope × moisture deviation)        |
//! | Temperature    | profile offset (zero for all built-in profiles)   |
//! | Moisture       | profile offset (zero for all built-in profiles)   |
//!
//! All corrections are no-ops at the reference temperature (25 °C) and
//! reference moisture (40 %).
//!
//! ## Seasonal EC Coefficient
//!
//! Outdoors, [`CompensationConfig::seasonal_adjustment`] swaps the fixed EC
//! temperature coefficient for a rainy-season (April, May, June, October) or
//! dry-season value, chosen from the month of the reading. Conditions without
//! a month use the fixed coefficient.
//!
//! ## Input Validation
//!
//! [`validate_compensation_inputs`] runs before any formula. Non-physical
//! conditions or coefficients (temperature outside −50..100 °C, porosity
//! outside (0, 1), saturation ≤ 0, ...) make the engine return the filtered
//! value unchanged together with a `CompensationInputInvalid` error instead
//! of letting a NaN reach the published reading.
//!
//! ## Usage Example
//!
//! ```rust
//! use soilguard_core::Channel;
//! use soilguard_core::compensation::{CompensationEngine, EnvironmentalConditions};
//! use soilguard_core::soil::SoilProfile;
//!
//! let engine = CompensationEngine::default();
//! let env = EnvironmentalConditions::new(25.0, 40.0, SoilProfile::Sand);
//!
//! let outcome = engine.compensate(Channel::ElectricalConductivity, 1200.0, &env);
//! assert_eq!(outcome.value, 1200.0);
//! assert!(outcome.error.is_none());
//! ```

mod ec;
mod npk;
mod ph;

pub use ec::{
    applies_archie_correction, archie_attenuation, bulk_from_fluid, compensate_ec,
    temperature_factor,
};
pub use npk::{compensate_nutrient, nutrient_moisture_factor};
pub use ph::compensate_ph;

use crate::{
    channel::Channel,
    constants::physics::*,
    errors::{ConfigError, ValidationError, ValidationResult},
    soil::{ProfileLookup, ProfileParameters, SoilProfile, SoilProfileRegistry},
};

/// Where the sensor is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnvironmentType {
    /// Field soil
    #[default]
    Outdoor,
    /// Greenhouse beds, warmer and fertigated
    Greenhouse,
    /// Potted substrate
    Indoor,
}

impl EnvironmentType {
    /// EC temperature coefficient α (per °C)
    pub const fn ec_temperature_coefficient(self) -> f32 {
        match self {
            Self::Outdoor => EC_TEMP_COEFF_OUTDOOR,
            Self::Greenhouse => EC_TEMP_COEFF_GREENHOUSE,
            Self::Indoor => EC_TEMP_COEFF_INDOOR,
        }
    }

    /// Whether EC gets the Archie moisture correction
    ///
    /// Potted substrate is not a field-saturation medium.
    pub const fn applies_moisture_correction(self) -> bool {
        !matches!(self, Self::Indoor)
    }
}

/// Reference conditions and coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompensationConfig {
    /// T0 in °C
    pub reference_temperature: f32,
    /// Reference moisture in %
    pub reference_moisture: f32,
    /// pH drift per °C
    pub ph_temperature_coefficient: f32,
    /// Installation environment
    pub environment: EnvironmentType,
    /// Pick the outdoor EC coefficient by rainy or dry season
    pub seasonal_adjustment: bool,
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            reference_temperature: REFERENCE_TEMPERATURE_C,
            reference_moisture: REFERENCE_MOISTURE_PCT,
            ph_temperature_coefficient: PH_TEMP_COEFF_PER_C,
            environment: EnvironmentType::Outdoor,
            seasonal_adjustment: false,
        }
    }
}

impl CompensationConfig {
    /// EC temperature coefficient α for a reading taken in `month` (1..=12)
    pub fn ec_temperature_coefficient(&self, month: Option<u8>) -> f32 {
        match (self.environment, self.seasonal_adjustment, month) {
            (EnvironmentType::Outdoor, true, Some(month)) if RAINY_MONTHS.contains(&month) => {
                EC_TEMP_COEFF_OUTDOOR_RAINY
            }
            (EnvironmentType::Outdoor, true, Some(_)) => EC_TEMP_COEFF_OUTDOOR_DRY,
            (environment, _, _) => environment.ec_temperature_coefficient(),
        }
    }

    /// Check reference values before installing the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temperature_range = COMPENSATION_TEMP_MIN_C..=COMPENSATION_TEMP_MAX_C;
        if !temperature_range.contains(&self.reference_temperature) {
            return Err(ConfigError::InvalidParameter {
                field: "reference_temperature",
                reason: "outside -50..100 °C",
            });
        }
        if !(self.reference_moisture > 0.0 && self.reference_moisture <= 100.0) {
            return Err(ConfigError::InvalidParameter {
                field: "reference_moisture",
                reason: "must be in (0, 100] %",
            });
        }
        if !self.ph_temperature_coefficient.is_finite() {
            return Err(ConfigError::InvalidParameter {
                field: "ph_temperature_coefficient",
                reason: "not finite",
            });
        }
        Ok(())
    }
}

/// Per-cycle conditions handed to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentalConditions {
    /// Soil temperature (°C)
    pub temperature: f32,
    /// Volumetric soil moisture (%), the sensor's "humidity"
    pub moisture: f32,
    /// Active soil profile
    pub profile: SoilProfile,
    /// Calendar month of the reading (1 = January), if known
    pub month: Option<u8>,
}

impl EnvironmentalConditions {
    /// Conditions from temperature, moisture and profile, month unknown
    pub const fn new(temperature: f32, moisture: f32, profile: SoilProfile) -> Self {
        Self {
            temperature,
            moisture,
            profile,
            month: None,
        }
    }

    /// Same conditions in the given month
    pub const fn with_month(mut self, month: Option<u8>) -> Self {
        self.month = month;
        self
    }
}

/// Output of one compensation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompensationOutcome {
    /// Compensated value, or the filtered value when inputs were rejected
    pub value: f32,
    /// Why the correction was skipped
    pub error: Option<ValidationError>,
}

impl CompensationOutcome {
    fn applied(value: f32) -> Self {
        Self { value, error: None }
    }

    fn skipped(value: f32, error: ValidationError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }
}

/// Reject conditions or coefficients the channel's formula cannot use
pub fn validate_compensation_inputs(
    channel: Channel,
    env: &EnvironmentalConditions,
    parameters: &ProfileParameters,
    config: &CompensationConfig,
) -> ValidationResult<()> {
    let invalid = |reason: &'static str| -> ValidationResult<()> {
        Err(ValidationError::CompensationInputInvalid { channel, reason })
    };

    match channel {
        Channel::Temperature | Channel::Moisture => Ok(()),
        Channel::Ph => check_temperature(channel, env.temperature),
        Channel::Nitrogen | Channel::Phosphorus | Channel::Potassium => {
            if !(env.moisture > 0.0 && env.moisture <= 100.0) {
                return invalid("moisture outside (0, 100] %");
            }
            Ok(())
        }
        Channel::ElectricalConductivity => {
            check_temperature(channel, env.temperature)?;

            let alpha = config.ec_temperature_coefficient(env.month);
            if temperature_factor(env.temperature, config.reference_temperature, alpha) <= 0.0 {
                return invalid("temperature factor not positive");
            }
            if !applies_archie_correction(env.moisture, config) {
                return Ok(());
            }

            let archie = &parameters.archie;
            if !(archie.porosity > 0.0 && archie.porosity < 1.0) {
                return invalid("porosity outside (0, 1)");
            }
            if !(archie.cementation > 0.0) {
                return invalid("cementation exponent not positive");
            }
            if !(archie.saturation > 0.0) {
                return invalid("saturation exponent not positive");
            }
            let saturation = env.moisture / 100.0;
            if !(saturation > 0.0 && saturation <= 1.0) {
                return invalid("saturation outside (0, 1]");
            }
            Ok(())
        }
    }
}

fn check_temperature(channel: Channel, temperature: f32) -> ValidationResult<()> {
    if (COMPENSATION_TEMP_MIN_C..=COMPENSATION_TEMP_MAX_C).contains(&temperature) {
        Ok(())
    } else {
        Err(ValidationError::CompensationInputInvalid {
            channel,
            reason: "temperature outside -50..100 °C",
        })
    }
}

/// Applies per-channel corrections using the soil registry
#[derive(Debug, Clone, Default)]
pub struct CompensationEngine {
    registry: SoilProfileRegistry,
    config: CompensationConfig,
}

impl CompensationEngine {
    /// Engine over a registry with the given reference conditions
    pub fn new(registry: SoilProfileRegistry, config: CompensationConfig) -> Self {
        Self { registry, config }
    }

    /// Active configuration
    pub fn config(&self) -> &CompensationConfig {
        &self.config
    }

    /// Soil registry
    pub fn registry(&self) -> &SoilProfileRegistry {
        &self.registry
    }

    /// Registry entry of a profile, loam on fallback
    pub fn profile(&self, profile: SoilProfile) -> ProfileLookup {
        self.registry.lookup(profile)
    }

    /// Compensate one filtered value
    pub fn compensate(
        &self,
        channel: Channel,
        filtered: f32,
        env: &EnvironmentalConditions,
    ) -> CompensationOutcome {
        let parameters = self.registry.lookup(env.profile).parameters;
        self.compensate_with(channel, filtered, env, &parameters)
    }

    /// Compensate with parameters already resolved for this cycle
    pub fn compensate_with(
        &self,
        channel: Channel,
        filtered: f32,
        env: &EnvironmentalConditions,
        parameters: &ProfileParameters,
    ) -> CompensationOutcome {
        if let Err(err) = validate_compensation_inputs(channel, env, parameters, &self.config) {
            return CompensationOutcome::skipped(filtered, err);
        }

        let value = match channel {
            Channel::Temperature => filtered + parameters.temperature_offset,
            Channel::Moisture => filtered + parameters.moisture_offset,
            Channel::ElectricalConductivity => {
                compensate_ec(filtered, env, &parameters.archie, &self.config)
            }
            Channel::Ph => compensate_ph(filtered, env.temperature, &self.config),
            Channel::Nitrogen | Channel::Phosphorus | Channel::Potassium => {
                match parameters.npk.get(channel) {
                    Some(reference) => compensate_nutrient(
                        filtered,
                        reference,
                        env.moisture,
                        self.config.reference_moisture,
                    ),
                    None => filtered,
                }
            }
        };

        if value.is_finite() {
            CompensationOutcome::applied(value)
        } else {
            CompensationOutcome::skipped(
                filtered,
                ValidationError::CompensationInputInvalid {
                    channel,
                    reason: "correction produced a non-finite value",
                },
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::soil::ArchieCoefficients;

    fn reference_env(profile: SoilProfile) -> EnvironmentalConditions {
        EnvironmentalConditions::new(REFERENCE_TEMPERATURE_C, REFERENCE_MOISTURE_PCT, profile)
    }

    #[test]
    fn no_op_at_reference_conditions() {
        let engine = CompensationEngine::default();

        for profile in SoilProfile::ALL {
            let env = reference_env(profile);
            for (channel, value) in [
                (Channel::ElectricalConductivity, 1200.0),
                (Channel::Ph, 6.4),
                (Channel::Nitrogen, 45.0),
                (Channel::Phosphorus, 18.0),
                (Channel::Potassium, 160.0),
            ] {
                let outcome = engine.compensate(channel, value, &env);
                assert_eq!(outcome.value, value, "{profile} {channel}");
                assert!(outcome.error.is_none());
            }
        }
    }

    #[test]
    fn builtin_offsets_are_identity() {
        let engine = CompensationEngine::default();
        for profile in SoilProfile::ALL {
            let env = reference_env(profile);
            assert_eq!(engine.compensate(Channel::Moisture, 50.0, &env).value, 50.0);
            assert_eq!(engine.compensate(Channel::Temperature, 18.0, &env).value, 18.0);
        }
    }

    #[test]
    fn custom_offset_applied() {
        let biased = ProfileParameters {
            moisture_offset: -2.5,
            ..ProfileParameters::builtin(SoilProfile::Peat)
        };
        let engine = CompensationEngine::new(
            SoilProfileRegistry::builtin().with_profile(SoilProfile::Peat, biased),
            CompensationConfig::default(),
        );
        let env = reference_env(SoilProfile::Peat);
        assert_eq!(engine.compensate(Channel::Moisture, 50.0, &env).value, 47.5);
    }

    #[test]
    fn saturation_above_one_rejected_for_ec() {
        let engine = CompensationEngine::default();
        let env = EnvironmentalConditions::new(25.0, 120.0, SoilProfile::Loam);

        let outcome = engine.compensate(Channel::ElectricalConductivity, 900.0, &env);
        assert_eq!(outcome.value, 900.0);
        assert_eq!(
            outcome.error,
            Some(ValidationError::CompensationInputInvalid {
                channel: Channel::ElectricalConductivity,
                reason: "saturation outside (0, 1]",
            })
        );
    }

    #[test]
    fn dry_soil_ec_only_temperature_corrected() {
        let engine = CompensationEngine::default();
        let env = EnvironmentalConditions::new(25.0, 5.0, SoilProfile::Clay);

        let outcome = engine.compensate(Channel::ElectricalConductivity, 500.0, &env);
        assert_eq!(outcome, CompensationOutcome { value: 500.0, error: None });
    }

    #[test]
    fn nutrients_never_negative_for_valid_inputs() {
        let engine = CompensationEngine::default();
        for profile in SoilProfile::ALL {
            for moisture in [1.0, 40.0, 70.0, 100.0] {
                let env = EnvironmentalConditions::new(25.0, moisture, profile);
                for channel in [Channel::Nitrogen, Channel::Phosphorus, Channel::Potassium] {
                    for value in [0.0, 1.0, 20.0, 9999.0] {
                        let outcome = engine.compensate(channel, value, &env);
                        assert!(outcome.value >= 0.0, "{profile} {channel} {moisture} {value}");
                        assert!(outcome.error.is_none());
                    }
                }
            }
        }
    }

    #[test]
    fn seasonal_coefficient_outdoor_only() {
        let seasonal = CompensationConfig {
            seasonal_adjustment: true,
            ..CompensationConfig::default()
        };
        assert_eq!(seasonal.ec_temperature_coefficient(Some(4)), EC_TEMP_COEFF_OUTDOOR_RAINY);
        assert_eq!(seasonal.ec_temperature_coefficient(Some(10)), EC_TEMP_COEFF_OUTDOOR_RAINY);
        assert_eq!(seasonal.ec_temperature_coefficient(Some(1)), EC_TEMP_COEFF_OUTDOOR_DRY);
        assert_eq!(seasonal.ec_temperature_coefficient(None), EC_TEMP_COEFF_OUTDOOR);

        let greenhouse = CompensationConfig {
            environment: EnvironmentType::Greenhouse,
            ..seasonal
        };
        assert_eq!(greenhouse.ec_temperature_coefficient(Some(5)), EC_TEMP_COEFF_GREENHOUSE);

        let fixed = CompensationConfig::default();
        assert_eq!(fixed.ec_temperature_coefficient(Some(5)), EC_TEMP_COEFF_OUTDOOR);
    }

    #[test]
    fn bad_porosity_rejected() {
        let broken = ProfileParameters {
            archie: ArchieCoefficients::new(0.0, 1.5, 2.0),
            ..ProfileParameters::builtin(SoilProfile::Loam)
        };
        let engine = CompensationEngine::new(
            SoilProfileRegistry::builtin().with_profile(SoilProfile::Clay, broken),
            CompensationConfig::default(),
        );
        let env = EnvironmentalConditions::new(20.0, 30.0, SoilProfile::Clay);

        let outcome = engine.compensate(Channel::ElectricalConductivity, 900.0, &env);
        assert_eq!(outcome.value, 900.0);
        assert_eq!(outcome.error.map(|e| e.kind()), Some(ErrorKind::CompensationInputInvalid));
    }

    #[test]
    fn extreme_temperature_skips_ph() {
        let engine = CompensationEngine::default();
        let env = EnvironmentalConditions::new(120.0, 40.0, SoilProfile::Loam);

        let outcome = engine.compensate(Channel::Ph, 6.0, &env);
        assert_eq!(outcome.value, 6.0);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn indoor_ec_ignores_zero_moisture() {
        let config = CompensationConfig {
            environment: EnvironmentType::Indoor,
            ..CompensationConfig::default()
        };
        let engine = CompensationEngine::new(SoilProfileRegistry::builtin(), config);
        let env = EnvironmentalConditions::new(25.0, 0.0, SoilProfile::Loam);

        let outcome = engine.compensate(Channel::ElectricalConductivity, 900.0, &env);
        assert_eq!(outcome, CompensationOutcome { value: 900.0, error: None });
    }

    #[test]
    fn config_validation() {
        assert!(CompensationConfig::default().validate().is_ok());

        let config = CompensationConfig {
            reference_moisture: 0.0,
            ..CompensationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
