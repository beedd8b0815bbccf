//! Sensor Specifications and Limits
//!
//! Operating ranges, per-cycle delta thresholds and register scaling for
//! the RS-485 7-in-1 soil sensor.

// ===== PHYSICAL RANGES =====

/// Minimum soil temperature the sensor reports (°C).
///
/// Source: sensor datasheet (-40 °C to 80 °C)
pub const TEMP_SENSOR_MIN_C: f32 = -40.0;

/// Maximum soil temperature the sensor reports (°C).
pub const TEMP_SENSOR_MAX_C: f32 = 80.0;

/// Minimum volumetric moisture (%).
pub const MOISTURE_SENSOR_MIN_PCT: f32 = 0.0;

/// Maximum volumetric moisture (%).
pub const MOISTURE_SENSOR_MAX_PCT: f32 = 100.0;

/// Minimum electrical conductivity (µS/cm).
pub const EC_SENSOR_MIN_US_CM: f32 = 0.0;

/// Maximum electrical conductivity (µS/cm).
///
/// Source: sensor datasheet (0-20000 µS/cm)
pub const EC_SENSOR_MAX_US_CM: f32 = 20_000.0;

/// Minimum pH.
pub const PH_SENSOR_MIN: f32 = 0.0;

/// Maximum pH.
pub const PH_SENSOR_MAX: f32 = 14.0;

/// Minimum nutrient concentration (mg/kg).
pub const NPK_SENSOR_MIN_MG_KG: f32 = 0.0;

/// Maximum nutrient concentration (mg/kg).
///
/// Source: sensor datasheet (0-9999 mg/kg)
pub const NPK_SENSOR_MAX_MG_KG: f32 = 9_999.0;

// ===== DELTA THRESHOLDS =====
//
// Largest plausible change of the calibrated value between two consecutive
// acquisition cycles (default interval 5 s). Soil is a large thermal and
// hydraulic mass, so anything above these is a sensor or bus glitch.

/// Temperature delta threshold (°C per cycle).
pub const TEMP_MAX_DELTA_C: f32 = 5.0;

/// Moisture delta threshold (% per cycle). Irrigation can add ~10 % quickly.
pub const MOISTURE_MAX_DELTA_PCT: f32 = 20.0;

/// EC delta threshold (µS/cm per cycle).
pub const EC_MAX_DELTA_US_CM: f32 = 500.0;

/// pH delta threshold (pH units per cycle).
pub const PH_MAX_DELTA: f32 = 1.0;

/// Nutrient delta threshold (mg/kg per cycle).
pub const NPK_MAX_DELTA_MG_KG: f32 = 100.0;

// ===== REGISTER SCALING =====

/// Temperature register resolution (°C per LSB, signed register).
pub const TEMP_REGISTER_SCALE: f32 = 0.1;

/// Moisture register resolution (% per LSB).
pub const MOISTURE_REGISTER_SCALE: f32 = 0.1;

/// EC register resolution (µS/cm per LSB).
pub const EC_REGISTER_SCALE: f32 = 1.0;

/// pH register resolution (pH per LSB).
pub const PH_REGISTER_SCALE: f32 = 0.01;

/// Nutrient register resolution (mg/kg per LSB).
pub const NPK_REGISTER_SCALE: f32 = 1.0;

// ===== REGISTER MAP =====

/// pH register
pub const REG_PH: u16 = 0x0006;

/// Soil moisture register
pub const REG_SOIL_MOISTURE: u16 = 0x0012;

/// Soil temperature register (two's complement)
pub const REG_SOIL_TEMPERATURE: u16 = 0x0013;

/// Conductivity register
pub const REG_CONDUCTIVITY: u16 = 0x0015;

/// Nitrogen register
pub const REG_NITROGEN: u16 = 0x001E;

/// Phosphorus register
pub const REG_PHOSPHORUS: u16 = 0x001F;

/// Potassium register
pub const REG_POTASSIUM: u16 = 0x0020;
