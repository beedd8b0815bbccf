//! pH temperature compensation
//!
//! Glass electrodes drift roughly linearly with temperature. The correction
//! is `pH + k · (T − T0)` with `k` = −0.03 pH/°C by default.

use super::CompensationConfig;

/// pH referenced to the compensation reference temperature
pub fn compensate_ph(ph: f32, temperature_c: f32, config: &CompensationConfig) -> f32 {
    ph + config.ph_temperature_coefficient * (temperature_c - config.reference_temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_change_at_reference() {
        assert_eq!(compensate_ph(6.5, 25.0, &CompensationConfig::default()), 6.5);
    }

    #[test]
    fn linear_in_temperature() {
        let config = CompensationConfig::default();
        let ph = compensate_ph(7.0, 35.0, &config);
        assert!((ph - 6.7).abs() < 1e-5);

        let ph = compensate_ph(7.0, 15.0, &config);
        assert!((ph - 7.3).abs() < 1e-5);
    }
}
