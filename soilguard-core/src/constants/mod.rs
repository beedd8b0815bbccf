//! Constants for SoilGuard Core
//!
//! Centralized, documented constants for the measurement pipeline. Every
//! numeric default lives here so that configuration presets and tests refer
//! to the same values.
//!
//! ## Organization
//!
//! - **Physics**: reference conditions and compensation coefficients
//! - **Sensors**: sensor limits, delta thresholds and register scaling
//! - **Time**: acquisition intervals and unit conversions
//! - **Buffers**: fixed capacities for windows, tables and error lists

/// Reference conditions and compensation coefficients.
pub mod physics;

/// Sensor operating limits, delta thresholds and register scaling.
pub mod sensors;

/// Time-related constants for intervals and unit conversions.
pub mod time;

/// Buffer sizes and fixed capacities.
pub mod buffers;

pub use physics::{
    REFERENCE_TEMPERATURE_C, REFERENCE_MOISTURE_PCT, KELVIN_OFFSET,
    EC_TEMP_COEFF_OUTDOOR, EC_TEMP_COEFF_GREENHOUSE, EC_TEMP_COEFF_INDOOR,
    PH_TEMP_COEFF_PER_C,
};

pub use sensors::{
    TEMP_SENSOR_MIN_C, TEMP_SENSOR_MAX_C,
    MOISTURE_SENSOR_MIN_PCT, MOISTURE_SENSOR_MAX_PCT,
    EC_SENSOR_MIN_US_CM, EC_SENSOR_MAX_US_CM,
    PH_SENSOR_MIN, PH_SENSOR_MAX,
    NPK_SENSOR_MIN_MG_KG, NPK_SENSOR_MAX_MG_KG,
};

pub use time::{MS_PER_SECOND, MS_PER_MINUTE, DEFAULT_SAMPLE_INTERVAL_MS};

pub use buffers::{DEFAULT_WINDOW_SIZE, MAX_CALIBRATION_POINTS, MAX_CYCLE_ERRORS};
