//! Electrical conductivity compensation
//!
//! ## Model
//!
//! The sensor measures bulk EC: the conductivity of the pore solution scaled
//! by temperature and attenuated by the soil matrix.
//!
//! ```text
//! bulk = fluid · f(T) · A(S) / A(S_ref)
//!
//! f(T) = 1 + α · (T_K − T0_K)        linear temperature response
//! A(S) = φ^m · S^n                   Archie attenuation, S = moisture / 100
//! ```
//!
//! Compensation inverts this: the reading is first scaled back to the
//! reference temperature, then the moisture dependence is removed by the
//! ratio of Archie attenuations at reference and current saturation. At the
//! reference temperature and moisture both factors are exactly one, so the
//! reading passes through unchanged.
//!
//! The ratio `(S_ref / S)^n` diverges as the soil dries out. At or below
//! [`ARCHIE_MIN_MOISTURE_PCT`] the moisture stage is skipped and only the
//! temperature correction applies. Indoor installations never apply it.
//!
//! α comes from [`CompensationConfig::ec_temperature_coefficient`], which
//! follows the environment type and, outdoors with seasonal adjustment, the
//! month of the reading.
//!
//! [`bulk_from_fluid`] applies the forward model; it is the exact inverse of
//! [`compensate_ec`] and is used by simulation and tests.

use libm::powf;

use super::{CompensationConfig, EnvironmentalConditions};
use crate::{
    constants::physics::{ARCHIE_MIN_MOISTURE_PCT, KELVIN_OFFSET},
    soil::ArchieCoefficients,
};

/// Temperature response factor `1 + α·(T − T0)`, computed on the Kelvin scale
pub fn temperature_factor(temperature_c: f32, reference_c: f32, alpha: f32) -> f32 {
    let temperature_k = temperature_c + KELVIN_OFFSET;
    let reference_k = reference_c + KELVIN_OFFSET;
    1.0 + alpha * (temperature_k - reference_k)
}

/// Archie attenuation `φ^m · S^n`
pub fn archie_attenuation(archie: &ArchieCoefficients, saturation: f32) -> f32 {
    powf(archie.porosity, archie.cementation) * powf(saturation, archie.saturation)
}

/// True if the Archie moisture stage runs for this moisture
pub fn applies_archie_correction(moisture_pct: f32, config: &CompensationConfig) -> bool {
    config.environment.applies_moisture_correction() && moisture_pct > ARCHIE_MIN_MOISTURE_PCT
}

/// Ratio `A(S_ref) / A(S)` removing the moisture dependence
fn moisture_factor(
    archie: &ArchieCoefficients,
    moisture_pct: f32,
    config: &CompensationConfig,
) -> f32 {
    let saturation = moisture_pct / 100.0;
    let reference = config.reference_moisture / 100.0;
    archie_attenuation(archie, reference) / archie_attenuation(archie, saturation)
}

/// Fluid-equivalent EC at reference conditions from a bulk reading
///
/// Inputs must have passed
/// [`validate_compensation_inputs`](super::validate_compensation_inputs).
pub fn compensate_ec(
    bulk: f32,
    env: &EnvironmentalConditions,
    archie: &ArchieCoefficients,
    config: &CompensationConfig,
) -> f32 {
    let alpha = config.ec_temperature_coefficient(env.month);
    let factor = temperature_factor(env.temperature, config.reference_temperature, alpha);
    let at_reference_temp = bulk / factor;

    if applies_archie_correction(env.moisture, config) {
        at_reference_temp * moisture_factor(archie, env.moisture, config)
    } else {
        at_reference_temp
    }
}

/// Bulk reading the sensor would report for a given fluid-equivalent EC
pub fn bulk_from_fluid(
    fluid: f32,
    env: &EnvironmentalConditions,
    archie: &ArchieCoefficients,
    config: &CompensationConfig,
) -> f32 {
    let alpha = config.ec_temperature_coefficient(env.month);
    let at_temp = fluid * temperature_factor(env.temperature, config.reference_temperature, alpha);

    if applies_archie_correction(env.moisture, config) {
        at_temp / moisture_factor(archie, env.moisture, config)
    } else {
        at_temp
    }
}
