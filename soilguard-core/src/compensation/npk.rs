//! Nutrient moisture compensation
//!
//! Ion mobility, and with it the sensor's nutrient response, rises with soil
//! moisture. Each nutrient reading is scaled by a factor that falls linearly
//! with moisture above the reference and rises below it:
//!
//! ```text
//! v_comp = v · max(0, 1 − slope · (moisture − moisture_ref))
//! ```
//!
//! The correction is proportional to the reading, so a non-negative reading
//! never becomes negative. The profile baseline is the soil's typical
//! concentration and does not enter the correction.

use crate::soil::NpkReference;

/// Moisture factor `max(0, 1 − slope·(moisture − moisture_ref))`
pub fn nutrient_moisture_factor(
    reference: &NpkReference,
    moisture_pct: f32,
    reference_moisture: f32,
) -> f32 {
    (1.0 - reference.slope * (moisture_pct - reference_moisture)).max(0.0)
}

/// Nutrient concentration referenced to `reference_moisture`
pub fn compensate_nutrient(
    value: f32,
    reference: &NpkReference,
    moisture_pct: f32,
    reference_moisture: f32,
) -> f32 {
    value * nutrient_moisture_factor(reference, moisture_pct, reference_moisture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_at_reference_moisture() {
        let reference = NpkReference::new(150.0, 0.008);
        assert_eq!(compensate_nutrient(180.0, &reference, 40.0, 40.0), 180.0);
    }

    #[test]
    fn wet_soil_reads_high() {
        let reference = NpkReference::new(40.0, 0.010);
        // 20 % above reference: factor 0.8
        let n = compensate_nutrient(50.0, &reference, 60.0, 40.0);
        assert!((n - 40.0).abs() < 1e-4, "{n}");
    }

    #[test]
    fn dry_soil_reads_low() {
        let reference = NpkReference::new(20.0, 0.006);
        // 30 % below reference: factor 1.18
        let p = compensate_nutrient(10.0, &reference, 10.0, 40.0);
        assert!((p - 11.8).abs() < 1e-4, "{p}");
    }

    #[test]
    fn low_readings_in_wet_soil_stay_positive() {
        let reference = NpkReference::new(150.0, 0.008);
        // 70 % moisture, K = 20 mg/kg: factor 0.76
        let k = compensate_nutrient(20.0, &reference, 70.0, 40.0);
        assert!((k - 15.2).abs() < 1e-4, "{k}");
    }

    #[test]
    fn steep_slope_clamps_at_zero() {
        let reference = NpkReference::new(40.0, 0.05);
        assert_eq!(compensate_nutrient(30.0, &reference, 100.0, 40.0), 0.0);
    }
}
