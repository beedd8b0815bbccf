//! Pipeline configuration
//!
//! Everything an operator can change lives in [`PipelineConfig`]. It is
//! validated as a whole before installation; a rejected configuration leaves
//! the running pipeline untouched.
//!
//! ```rust
//! use soilguard_core::{Channel, PipelineConfig};
//! use soilguard_core::soil::SoilProfile;
//!
//! let mut config = PipelineConfig::for_profile(SoilProfile::Clay);
//! config.limits = config.limits.with_max_delta(Channel::Ph, 0.5);
//! assert!(config.validate().is_ok());
//! ```

use crate::{
    calibration::ExtrapolationPolicy,
    compensation::CompensationConfig,
    constants::time::{DEFAULT_SAMPLE_INTERVAL_MS, MAX_SAMPLE_INTERVAL_MS, MIN_SAMPLE_INTERVAL_MS},
    errors::ConfigError,
    irrigation::IrrigationConfig,
    soil::SoilProfile,
    validators::ValidationLimits,
};

/// Operator-facing pipeline settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Soil the sensor is installed in
    pub soil_profile: SoilProfile,
    /// Physical ranges and delta thresholds
    pub limits: ValidationLimits,
    /// Reference conditions and coefficients
    pub compensation: CompensationConfig,
    /// Calibration behaviour outside the table range
    pub extrapolation: ExtrapolationPolicy,
    /// Run the compensation stage; when off, filtered values pass through
    pub compensation_enabled: bool,
    /// Run the calibration stage; when off, compensated values pass through
    pub calibration_enabled: bool,
    /// Irrigation detector thresholds
    pub irrigation: IrrigationConfig,
    /// Interval between acquisition cycles
    pub sample_interval_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            soil_profile: SoilProfile::Loam,
            limits: ValidationLimits::default(),
            compensation: CompensationConfig::default(),
            extrapolation: ExtrapolationPolicy::EdgeSlope,
            compensation_enabled: true,
            calibration_enabled: true,
            irrigation: IrrigationConfig::default(),
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
        }
    }
}

impl PipelineConfig {
    /// Defaults with the given soil profile
    pub fn for_profile(soil_profile: SoilProfile) -> Self {
        Self {
            soil_profile,
            ..Self::default()
        }
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        self.compensation.validate()?;
        self.irrigation.validate()?;

        if !(MIN_SAMPLE_INTERVAL_MS..=MAX_SAMPLE_INTERVAL_MS).contains(&self.sample_interval_ms) {
            return Err(ConfigError::InvalidParameter {
                field: "sample_interval_ms",
                reason: "must be between 1 s and 1 h",
            });
        }

        Ok(())
    }
}
