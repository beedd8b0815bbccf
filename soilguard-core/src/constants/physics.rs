//! Physical Constants and Compensation Coefficients
//!
//! Reference conditions the sensor's factory calibration assumes, plus the
//! coefficients of the correction models in [`crate::compensation`].

// ===== REFERENCE CONDITIONS =====

/// Reference temperature T0 for EC and pH compensation (°C).
///
/// Conductivity is conventionally reported as its 25 °C equivalent (EC25).
///
/// Source: ISO 7888:1985
pub const REFERENCE_TEMPERATURE_C: f32 = 25.0;

/// Reference soil moisture for saturation and nutrient corrections (%).
///
/// Moisture at which the sensor's EC and NPK electrodes were characterised.
/// Readings taken at this moisture need no saturation correction.
pub const REFERENCE_MOISTURE_PCT: f32 = 40.0;

/// Offset between Celsius and Kelvin.
pub const KELVIN_OFFSET: f32 = 273.15;

// ===== EC TEMPERATURE COEFFICIENTS =====

/// EC temperature coefficient for outdoor field soil (fraction per °C).
///
/// Conductivity of soil solutions rises roughly 1.9 %/°C near 25 °C.
///
/// Source: USDA Handbook 60, soil salinity methods
pub const EC_TEMP_COEFF_OUTDOOR: f32 = 0.019;

/// EC temperature coefficient for greenhouse substrate (fraction per °C).
pub const EC_TEMP_COEFF_GREENHOUSE: f32 = 0.021;

/// EC temperature coefficient for indoor / potted substrate (fraction per °C).
pub const EC_TEMP_COEFF_INDOOR: f32 = 0.020;

/// Outdoor EC temperature coefficient in the rainy season (fraction per °C).
///
/// Used instead of [`EC_TEMP_COEFF_OUTDOOR`] when seasonal adjustment is on.
pub const EC_TEMP_COEFF_OUTDOOR_RAINY: f32 = 0.015;

/// Outdoor EC temperature coefficient in the dry season (fraction per °C).
pub const EC_TEMP_COEFF_OUTDOOR_DRY: f32 = 0.022;

/// Months (1 = January) counted as rainy season by seasonal adjustment.
pub const RAINY_MONTHS: [u8; 4] = [4, 5, 6, 10];

// ===== ARCHIE MOISTURE CORRECTION =====

/// Moisture (%) at or below which EC skips the Archie moisture correction.
///
/// The ratio `(S_ref / S)^n` grows without bound in dry soil; below this
/// level only the temperature correction is applied.
pub const ARCHIE_MIN_MOISTURE_PCT: f32 = 20.0;

// ===== pH =====

/// Linear pH electrode drift with temperature (pH units per °C).
///
/// Added to the reading scaled by `(T - T0)`; negative because the electrode
/// over-reads in warm soil.
pub const PH_TEMP_COEFF_PER_C: f32 = -0.03;

// ===== COMPENSATION INPUT LIMITS =====

/// Lowest temperature the correction models are valid for (°C).
pub const COMPENSATION_TEMP_MIN_C: f32 = -50.0;

/// Highest temperature the correction models are valid for (°C).
pub const COMPENSATION_TEMP_MAX_C: f32 = 100.0;
