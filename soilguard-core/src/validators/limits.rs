//! Per-channel validation limits

use crate::{
    channel::{Channel, ChannelMap},
    constants::sensors::*,
    errors::ConfigError,
};

/// Inclusive physical bounds of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationRange {
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
}

impl ValidationRange {
    /// Range from two bounds
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// True if `value` lies within the bounds
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Physical range and delta threshold of every channel
///
/// Defaults follow the sensor datasheet: temperature −40..80 °C, moisture
/// 0..100 %, EC 0..20000 µS/cm, pH 0..14 and NPK 0..9999 mg/kg.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationLimits {
    /// Physical range per channel
    pub ranges: ChannelMap<ValidationRange>,
    /// Largest plausible change between two cycles
    pub max_delta: ChannelMap<f32>,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        let npk = ValidationRange::new(NPK_SENSOR_MIN_MG_KG, NPK_SENSOR_MAX_MG_KG);
        Self {
            ranges: ChannelMap::from_array([
                ValidationRange::new(TEMP_SENSOR_MIN_C, TEMP_SENSOR_MAX_C),
                ValidationRange::new(MOISTURE_SENSOR_MIN_PCT, MOISTURE_SENSOR_MAX_PCT),
                ValidationRange::new(EC_SENSOR_MIN_US_CM, EC_SENSOR_MAX_US_CM),
                ValidationRange::new(PH_SENSOR_MIN, PH_SENSOR_MAX),
                npk,
                npk,
                npk,
            ]),
            max_delta: ChannelMap::from_array([
                TEMP_MAX_DELTA_C,
                MOISTURE_MAX_DELTA_PCT,
                EC_MAX_DELTA_US_CM,
                PH_MAX_DELTA,
                NPK_MAX_DELTA_MG_KG,
                NPK_MAX_DELTA_MG_KG,
                NPK_MAX_DELTA_MG_KG,
            ]),
        }
    }
}

impl ValidationLimits {
    /// Replace the range of one channel
    pub fn with_range(mut self, channel: Channel, min: f32, max: f32) -> Self {
        self.ranges[channel] = ValidationRange::new(min, max);
        self
    }

    /// Replace the delta threshold of one channel
    pub fn with_max_delta(mut self, channel: Channel, max_delta: f32) -> Self {
        self.max_delta[channel] = max_delta;
        self
    }

    /// Reject inverted or non-finite ranges and non-positive thresholds
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (channel, range) in self.ranges.iter() {
            if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                return Err(ConfigError::InvalidRange {
                    channel,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        for (channel, &threshold) in self.max_delta.iter() {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(ConfigError::InvalidDeltaThreshold { channel, threshold });
            }
        }

        Ok(())
    }
}
